//! Data provider traits
//!
//! A [`DataProvider`] supplies transcript models, reference sequence, and
//! identifier classification. Implementations might wrap a local sequence
//! store, a database, or canned fixtures ([`super::MockProvider`]).
//!
//! Within a single engine call, provider operations are invoked in a
//! deterministic order derived from the inputs, so implementations are free
//! to batch or memoize.

use crate::error::ForgeError;
use crate::reference::transcript::TranscriptData;
use serde::{Deserialize, Serialize};

/// Classification of an identifier string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierType {
    GenomicAccession,
    TranscriptAccession,
    ProteinAccession,
    GeneSymbol,
    Unknown,
}

/// The coordinate family an accession belongs to; used when expanding gene
/// symbols toward a target kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierKind {
    Genomic,
    Transcript,
    Protein,
}

impl IdentifierKind {
    /// The identifier type an accession of this kind carries.
    pub fn identifier_type(self) -> IdentifierType {
        match self {
            IdentifierKind::Genomic => IdentifierType::GenomicAccession,
            IdentifierKind::Transcript => IdentifierType::TranscriptAccession,
            IdentifierKind::Protein => IdentifierType::ProteinAccession,
        }
    }
}

/// Supplies transcript models and reference sequence to the engine.
///
/// All coordinates are 0-based; `get_seq` spans are half-open.
pub trait DataProvider {
    /// Retrieve the transcript model for an accession.
    ///
    /// When `reference_ac` is given, the returned alignment must be against
    /// that reference. Fails with [`ForgeError::NotFound`] for unknown
    /// accessions.
    fn get_transcript(
        &self,
        transcript_ac: &str,
        reference_ac: Option<&str>,
    ) -> Result<TranscriptData, ForgeError>;

    /// Fetch the `[start, end)` subsequence of `ac` in the provider's native
    /// alphabet. `end == -1` means "to the end of the sequence". A span that
    /// starts past the end of the sequence yields an empty string.
    fn get_seq(
        &self,
        ac: &str,
        start: i64,
        end: i64,
        kind: IdentifierType,
    ) -> Result<String, ForgeError>;

    /// Resolve a symbol (or accession) to related accessions of the target
    /// kind, e.g. gene symbol to transcripts, or transcript to its protein.
    fn get_symbol_accessions(
        &self,
        symbol: &str,
        source_kind: IdentifierKind,
        target_kind: IdentifierKind,
    ) -> Result<Vec<(IdentifierType, String)>, ForgeError>;

    /// Classify an identifier string.
    fn get_identifier_type(&self, identifier: &str) -> Result<IdentifierType, ForgeError>;
}

/// Regional transcript discovery, used by `g_to_c_all` and g-vs-p
/// equivalence.
pub trait TranscriptSearch {
    /// Transcript accessions overlapping the 0-based half-open genomic span.
    fn transcripts_for_region(
        &self,
        reference_ac: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<String>, ForgeError>;
}

impl<T: DataProvider + ?Sized> DataProvider for &T {
    fn get_transcript(
        &self,
        transcript_ac: &str,
        reference_ac: Option<&str>,
    ) -> Result<TranscriptData, ForgeError> {
        (**self).get_transcript(transcript_ac, reference_ac)
    }

    fn get_seq(
        &self,
        ac: &str,
        start: i64,
        end: i64,
        kind: IdentifierType,
    ) -> Result<String, ForgeError> {
        (**self).get_seq(ac, start, end, kind)
    }

    fn get_symbol_accessions(
        &self,
        symbol: &str,
        source_kind: IdentifierKind,
        target_kind: IdentifierKind,
    ) -> Result<Vec<(IdentifierType, String)>, ForgeError> {
        (**self).get_symbol_accessions(symbol, source_kind, target_kind)
    }

    fn get_identifier_type(&self, identifier: &str) -> Result<IdentifierType, ForgeError> {
        (**self).get_identifier_type(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_kind_to_type() {
        assert_eq!(
            IdentifierKind::Genomic.identifier_type(),
            IdentifierType::GenomicAccession
        );
        assert_eq!(
            IdentifierKind::Protein.identifier_type(),
            IdentifierType::ProteinAccession
        );
    }
}
