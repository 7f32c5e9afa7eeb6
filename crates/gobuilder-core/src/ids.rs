//! Build run identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies one `build_all` run in log lines and in its summary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildId(String);

impl BuildId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random (UUID v4) id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_uuids() {
        let id1 = BuildId::generate();
        let id2 = BuildId::generate();
        assert_ne!(id1, id2);
        assert!(Uuid::parse_str(&id1.to_string()).is_ok());
    }

    #[test]
    fn test_display_is_the_raw_id() {
        assert_eq!(BuildId::new("build-123").to_string(), "build-123");
    }
}
