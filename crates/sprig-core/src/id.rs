//! Resource identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resource identifier handed out by a [`ResourceRegistry`](crate::ResourceRegistry).
///
/// Ids are monotonic and never reissued, so an id held past its resource's
/// removal resolves to "absent" instead of aliasing a newer resource.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u64);

impl ResourceId {
    /// Create a ResourceId from a raw value (for deserialization/testing)
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceId({})", self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        let id = ResourceId::from_raw(42);
        assert_eq!(id.raw(), 42);
    }

    #[test]
    fn test_ordering_follows_raw_value() {
        assert!(ResourceId(3) < ResourceId(7));
        assert_eq!(format!("{}", ResourceId(9)), "9");
        assert_eq!(format!("{:?}", ResourceId(9)), "ResourceId(9)");
    }
}
