//! SPDI variant notation
//!
//! SPDI (Sequence, Position, Deletion, Insertion) describes a variant as a
//! replacement of `deletion` by `insertion` at a 0-based `position`. It is
//! the interchange format used when comparing against external validation
//! sets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A variant in SPDI form: `sequence:position:deletion:insertion`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpdiVariant {
    pub sequence: String,
    /// 0-based position of the first deleted base (or the insertion point)
    pub position: i64,
    pub deletion: String,
    pub insertion: String,
}

impl SpdiVariant {
    pub fn new(
        sequence: impl Into<String>,
        position: i64,
        deletion: impl Into<String>,
        insertion: impl Into<String>,
    ) -> Self {
        Self {
            sequence: sequence.into(),
            position,
            deletion: deletion.into(),
            insertion: insertion.into(),
        }
    }
}

impl fmt::Display for SpdiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.sequence, self.position, self.deletion, self.insertion
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let spdi = SpdiVariant::new("NC_000001.11", 12344, "A", "G");
        assert_eq!(spdi.to_string(), "NC_000001.11:12344:A:G");
    }

    #[test]
    fn test_empty_fields_render() {
        let del = SpdiVariant::new("NC_000001.11", 10, "AG", "");
        assert_eq!(del.to_string(), "NC_000001.11:10:AG:");
        let ins = SpdiVariant::new("NC_000001.11", 10, "", "T");
        assert_eq!(ins.to_string(), "NC_000001.11:10::T");
    }
}
