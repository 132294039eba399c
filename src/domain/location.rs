//! Location domain entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// An organizational site (e.g., a department) that owns service requests.
///
/// Name, city and state are case-normalized to uppercase on persistence so
/// city/state lookups stay consistent regardless of how callers typed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub id: Uuid,
    #[schema(example = "SECRETARIA A")]
    pub name: String,
    #[schema(example = "SPRINGFIELD")]
    pub city: String,
    #[schema(example = "IL")]
    pub state: String,
}

/// Fields for a location not yet persisted
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub name: String,
    pub city: String,
    pub state: String,
}

impl NewLocation {
    pub fn new(name: impl Into<String>, city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            city: city.into(),
            state: state.into(),
        }
    }

    /// Uppercase all lookup-relevant fields.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.to_uppercase(),
            city: self.city.to_uppercase(),
            state: self.state.to_uppercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_uppercases_all_fields() {
        let loc = NewLocation::new("Secretaria a", "Springfield", "il").normalized();
        assert_eq!(loc.name, "SECRETARIA A");
        assert_eq!(loc.city, "SPRINGFIELD");
        assert_eq!(loc.state, "IL");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = NewLocation::new("A", "B", "C").normalized();
        let twice = once.clone().normalized();
        assert_eq!(once.city, twice.city);
        assert_eq!(once.state, twice.state);
    }
}
