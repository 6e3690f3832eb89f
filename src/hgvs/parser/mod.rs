//! HGVS parser built on nom
//!
//! Recursive descent with one-token lookahead, split by grammar stage:
//! accession, position, edit, and the top-level variant assembly. Parse
//! failures report the byte offset where the input stopped matching.

pub mod accession;
pub mod edit;
pub mod position;
pub mod variant;

use crate::error::ForgeError;
use crate::hgvs::HgvsVariant;

/// Parse an HGVS string into a variant.
///
/// # Example
///
/// ```
/// use hgvs_forge::parse_hgvs;
///
/// let variant = parse_hgvs("NM_000051.3:c.123A>G").unwrap();
/// assert_eq!(variant.kind(), "c");
/// ```
pub fn parse_hgvs(input: &str) -> Result<HgvsVariant, ForgeError> {
    variant::parse_variant(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_substitution() {
        assert!(parse_hgvs("NC_000001.11:g.12345A>G").is_ok());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_hgvs("not an hgvs string").is_err());
        assert!(parse_hgvs("").is_err());
    }
}
