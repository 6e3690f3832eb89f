//! Predicted-consequence wrapper
//!
//! HGVS wraps a description in parentheses when it is predicted rather than
//! observed, e.g. `p.(Lys41Arg)` for a consequence inferred from a `c.`
//! variant. The wrapper applies to the whole position+edit body.

use serde::{Deserialize, Serialize};

/// A value that is either observed as written or predicted (parenthesised).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mu<T> {
    /// Observed: rendered without parentheses
    Certain(T),
    /// Predicted: rendered inside parentheses
    Uncertain(T),
}

impl<T> Mu<T> {
    pub fn inner(&self) -> &T {
        match self {
            Mu::Certain(v) | Mu::Uncertain(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Mu::Certain(v) | Mu::Uncertain(v) => v,
        }
    }

    pub fn is_certain(&self) -> bool {
        matches!(self, Mu::Certain(_))
    }

    pub fn is_uncertain(&self) -> bool {
        matches!(self, Mu::Uncertain(_))
    }

    /// Re-wrap a value with the same certainty as `self`.
    pub fn rewrap<U>(&self, value: U) -> Mu<U> {
        match self {
            Mu::Certain(_) => Mu::Certain(value),
            Mu::Uncertain(_) => Mu::Uncertain(value),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Mu<U> {
        match self {
            Mu::Certain(v) => Mu::Certain(f(v)),
            Mu::Uncertain(v) => Mu::Uncertain(f(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certainty_predicates() {
        assert!(Mu::Certain(1).is_certain());
        assert!(Mu::Uncertain(1).is_uncertain());
        assert!(!Mu::Uncertain(1).is_certain());
    }

    #[test]
    fn test_map_preserves_wrapper() {
        assert_eq!(Mu::Certain(2).map(|x| x * 2), Mu::Certain(4));
        assert_eq!(Mu::Uncertain(2).map(|x| x * 2), Mu::Uncertain(4));
    }
}
