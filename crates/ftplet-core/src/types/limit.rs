//! Connection limit type.

use serde::{Deserialize, Serialize};

/// Maximum number of concurrently admitted sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionLimit {
    /// A fixed maximum number of concurrent sessions.
    Fixed(u32),
    /// No limit.
    Unlimited,
}

impl ConnectionLimit {
    /// Check whether admitting one more session on top of `active_count`
    /// would exceed this limit.
    pub fn is_exceeded_by(&self, active_count: u32) -> bool {
        match self {
            Self::Fixed(max) => active_count >= *max,
            Self::Unlimited => false,
        }
    }

    /// Return the numeric limit, or `None` for unlimited.
    pub fn as_max(&self) -> Option<u32> {
        match self {
            Self::Fixed(max) => Some(*max),
            Self::Unlimited => None,
        }
    }
}

impl From<u32> for ConnectionLimit {
    /// Convert a `u32` to a `ConnectionLimit`. `0` means unlimited.
    fn from(value: u32) -> Self {
        if value == 0 {
            Self::Unlimited
        } else {
            Self::Fixed(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_limit() {
        let limit = ConnectionLimit::Fixed(3);
        assert!(!limit.is_exceeded_by(2));
        assert!(limit.is_exceeded_by(3));
        assert!(limit.is_exceeded_by(4));
        assert_eq!(limit.as_max(), Some(3));
    }

    #[test]
    fn test_unlimited() {
        let limit = ConnectionLimit::Unlimited;
        assert!(!limit.is_exceeded_by(0));
        assert!(!limit.is_exceeded_by(u32::MAX));
        assert_eq!(limit.as_max(), None);
    }

    #[test]
    fn test_from_u32() {
        assert_eq!(ConnectionLimit::from(0), ConnectionLimit::Unlimited);
        assert_eq!(ConnectionLimit::from(5), ConnectionLimit::Fixed(5));
    }
}
