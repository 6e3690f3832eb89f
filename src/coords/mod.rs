//! Type-safe coordinate system wrappers
//!
//! Every position in the engine carries its coordinate space in its type.
//! Mixing spaces is a compile error; crossing between them goes through
//! explicit conversion methods, and the transcript-relative conversions
//! additionally require a transcript model (see [`crate::reference`]).
//!
//! | Type | Basis | Origin |
//! |------|-------|--------|
//! | [`GenomicPos`] | 0-based | chromosome start |
//! | [`TranscriptPos`] | 0-based | transcription start |
//! | [`ProteinPos`] | 0-based | first residue |
//! | [`HgvsGenomicPos`] | 1-based | chromosome start |
//! | [`HgvsTranscriptPos`] | 1-based, skips 0 | A of the start codon for `c.` |
//! | [`HgvsProteinPos`] | 1-based | first residue |
//!
//! Inner values are private: construction goes through `new`/`try_new`, so
//! invalid positions (zero in a 1-based space) are rejected at the boundary.
//!
//! `HgvsTranscriptPos` is the one oddity: HGVS coding coordinates have no
//! position zero, so `c.-1` is immediately followed by `c.1`. The skip is
//! implemented in [`HgvsTranscriptPos::to_index`] and
//! [`TranscriptPos::to_hgvs`] and nowhere else.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 0-based position on a genomic reference sequence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GenomicPos(i64);

/// A 0-based position on a transcript, from the transcription start.
///
/// Also used for anchor-relative indices during `c.` conversion, where the
/// value may be negative (upstream of the anchor).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TranscriptPos(i64);

/// A 0-based residue index on a protein.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ProteinPos(i64);

/// A 1-based HGVS genomic position (`g.`/`m.`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct HgvsGenomicPos(i64);

/// A 1-based HGVS transcript-relative position (`c.`/`n.`/`r.`).
///
/// Negative values are upstream of the anchor (5' UTR for `c.`). The value
/// zero does not exist: the successor of -1 is 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct HgvsTranscriptPos(i64);

/// A 1-based HGVS protein position (`p.`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct HgvsProteinPos(i64);

/// Signed distance into an intron from the anchoring exon boundary.
///
/// Never zero; an exonic position has no offset at all.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct IntronicOffset(pub i64);

/// Which transcript landmark a `c.`/`n.` position counts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CdsAnchor {
    /// `n.` positions: counted from the transcription start
    TranscriptStart,
    /// `c.` body and 5' UTR positions: counted from the A of the start codon
    CdsStart,
    /// `c.*` positions: counted past the last base of the stop codon
    CdsEnd,
}

impl GenomicPos {
    #[inline]
    pub const fn new(pos: i64) -> Self {
        Self(pos)
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Convert to the 1-based HGVS representation.
    #[inline]
    pub const fn to_hgvs(self) -> HgvsGenomicPos {
        HgvsGenomicPos(self.0 + 1)
    }

    /// Use as a slice index.
    #[inline]
    pub const fn as_index(self) -> usize {
        self.0 as usize
    }
}

impl TranscriptPos {
    #[inline]
    pub const fn new(pos: i64) -> Self {
        Self(pos)
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Convert to the 1-based HGVS representation, skipping zero.
    ///
    /// Index 0 becomes position 1; index -1 stays -1.
    #[inline]
    pub const fn to_hgvs(self) -> HgvsTranscriptPos {
        if self.0 >= 0 {
            HgvsTranscriptPos(self.0 + 1)
        } else {
            HgvsTranscriptPos(self.0)
        }
    }
}

impl ProteinPos {
    #[inline]
    pub const fn new(pos: i64) -> Self {
        Self(pos)
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn to_hgvs(self) -> HgvsProteinPos {
        HgvsProteinPos(self.0 + 1)
    }

    #[inline]
    pub const fn as_index(self) -> usize {
        self.0 as usize
    }
}

impl HgvsGenomicPos {
    /// Create a 1-based genomic position.
    ///
    /// # Panics
    ///
    /// Panics for values below 1, which do not exist in 1-based
    /// coordinates. Use [`HgvsGenomicPos::try_new`] for fallible
    /// construction from unvalidated input.
    #[inline]
    pub fn new(pos: i64) -> Self {
        assert!(pos >= 1, "1-based genomic position must be >= 1");
        Self(pos)
    }

    /// Create a 1-based genomic position, or `None` for values below 1.
    #[inline]
    pub const fn try_new(pos: i64) -> Option<Self> {
        if pos >= 1 {
            Some(Self(pos))
        } else {
            None
        }
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Convert to the 0-based index.
    #[inline]
    pub const fn to_index(self) -> GenomicPos {
        GenomicPos(self.0 - 1)
    }
}

impl HgvsTranscriptPos {
    /// Create a 1-based transcript position.
    ///
    /// # Panics
    ///
    /// Panics for zero, which is not representable in HGVS coding
    /// coordinates. Use [`HgvsTranscriptPos::try_new`] for fallible
    /// construction from unvalidated input.
    #[inline]
    pub fn new(pos: i64) -> Self {
        assert!(pos != 0, "HGVS transcript position 0 does not exist");
        Self(pos)
    }

    /// Create a 1-based transcript position, or `None` for zero.
    #[inline]
    pub const fn try_new(pos: i64) -> Option<Self> {
        if pos != 0 {
            Some(Self(pos))
        } else {
            None
        }
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Convert to the 0-based anchor-relative index.
    ///
    /// Position 1 becomes index 0; position -1 stays index -1. Together with
    /// [`TranscriptPos::to_hgvs`] this encodes the zero skip.
    #[inline]
    pub const fn to_index(self) -> TranscriptPos {
        if self.0 > 0 {
            TranscriptPos(self.0 - 1)
        } else {
            TranscriptPos(self.0)
        }
    }

    /// The next HGVS position; the successor of -1 is 1.
    #[inline]
    pub const fn succ(self) -> Self {
        if self.0 == -1 {
            Self(1)
        } else {
            Self(self.0 + 1)
        }
    }
}

impl HgvsProteinPos {
    /// Create a 1-based protein position.
    ///
    /// # Panics
    ///
    /// Panics for values below 1. Use [`HgvsProteinPos::try_new`] for
    /// fallible construction from unvalidated input.
    #[inline]
    pub fn new(pos: i64) -> Self {
        assert!(pos >= 1, "1-based protein position must be >= 1");
        Self(pos)
    }

    /// Create a 1-based protein position, or `None` for values below 1.
    #[inline]
    pub const fn try_new(pos: i64) -> Option<Self> {
        if pos >= 1 {
            Some(Self(pos))
        } else {
            None
        }
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn to_index(self) -> ProteinPos {
        ProteinPos(self.0 - 1)
    }
}

impl IntronicOffset {
    #[inline]
    pub const fn new(offset: i64) -> Self {
        Self(offset)
    }

    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for HgvsGenomicPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for HgvsTranscriptPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for HgvsProteinPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for IntronicOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
