//! Location types for the variant AST
//!
//! Each coordinate kind gets its own interval type built from the tagged
//! positions in [`crate::coords`]. A single position is an interval with no
//! end; a range renders as `start_end`; an uncertain interval is wrapped in
//! parentheses.

use crate::coords::{CdsAnchor, HgvsGenomicPos, HgvsProteinPos, HgvsTranscriptPos, IntronicOffset};
use crate::sequence::Residue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interval on a genomic (`g.`/`m.`) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomeInterval {
    pub start: HgvsGenomicPos,
    pub end: Option<HgvsGenomicPos>,
    /// Wrapped in parentheses on output
    pub uncertain: bool,
}

impl GenomeInterval {
    pub fn point(pos: HgvsGenomicPos) -> Self {
        Self {
            start: pos,
            end: None,
            uncertain: false,
        }
    }

    pub fn range(start: HgvsGenomicPos, end: HgvsGenomicPos) -> Self {
        Self {
            start,
            end: Some(end),
            uncertain: false,
        }
    }

    /// End position, falling back to the start for a point interval.
    pub fn end_or_start(&self) -> HgvsGenomicPos {
        self.end.unwrap_or(self.start)
    }

    /// Number of reference bases covered (1 for a point).
    pub fn len(&self) -> i64 {
        self.end_or_start().value() - self.start.value() + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }
}

impl fmt::Display for GenomeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.uncertain {
            write!(f, "(")?;
        }
        write!(f, "{}", self.start)?;
        if let Some(end) = &self.end {
            write!(f, "_{}", end)?;
        }
        if self.uncertain {
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// A transcript-relative position (`c.`/`n.`/`r.`): anchored base plus an
/// optional intronic offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxPos {
    pub base: HgvsTranscriptPos,
    pub offset: Option<IntronicOffset>,
    pub anchor: CdsAnchor,
}

impl TxPos {
    /// Exonic position counted from the anchor.
    pub fn new(base: HgvsTranscriptPos, anchor: CdsAnchor) -> Self {
        Self {
            base,
            offset: None,
            anchor,
        }
    }

    pub fn with_offset(base: HgvsTranscriptPos, offset: IntronicOffset, anchor: CdsAnchor) -> Self {
        Self {
            base,
            offset: Some(offset),
            anchor,
        }
    }

    pub fn is_intronic(&self) -> bool {
        self.offset.is_some()
    }
}

impl fmt::Display for TxPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.anchor == CdsAnchor::CdsEnd {
            write!(f, "*")?;
        }
        write!(f, "{}", self.base)?;
        if let Some(offset) = &self.offset {
            write!(f, "{}", offset)?;
        }
        Ok(())
    }
}

/// Interval on a transcript-relative (`c.`/`n.`/`r.`) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxInterval {
    pub start: TxPos,
    pub end: Option<TxPos>,
    pub uncertain: bool,
}

impl TxInterval {
    pub fn point(pos: TxPos) -> Self {
        Self {
            start: pos,
            end: None,
            uncertain: false,
        }
    }

    pub fn range(start: TxPos, end: TxPos) -> Self {
        Self {
            start,
            end: Some(end),
            uncertain: false,
        }
    }

    pub fn end_or_start(&self) -> TxPos {
        self.end.unwrap_or(self.start)
    }

    /// True if either endpoint carries an intronic offset.
    pub fn has_intronic(&self) -> bool {
        self.start.is_intronic() || self.end.map(|e| e.is_intronic()).unwrap_or(false)
    }
}

impl fmt::Display for TxInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.uncertain {
            write!(f, "(")?;
        }
        write!(f, "{}", self.start)?;
        if let Some(end) = &self.end {
            write!(f, "_{}", end)?;
        }
        if self.uncertain {
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// A protein position: residue plus 1-based number.
///
/// The residue is optional on input (e.g. repeat notation `p.2346GT[3]`),
/// but mapper output always carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtPos {
    pub aa: Option<Residue>,
    pub base: HgvsProteinPos,
}

impl ProtPos {
    pub fn new(aa: Residue, base: HgvsProteinPos) -> Self {
        Self {
            aa: Some(aa),
            base,
        }
    }

    pub fn bare(base: HgvsProteinPos) -> Self {
        Self { aa: None, base }
    }
}

impl fmt::Display for ProtPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(aa) = &self.aa {
            write!(f, "{}", aa)?;
        }
        write!(f, "{}", self.base)
    }
}

/// Interval on a protein (`p.`) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtInterval {
    pub start: ProtPos,
    pub end: Option<ProtPos>,
    pub uncertain: bool,
}

impl ProtInterval {
    pub fn point(pos: ProtPos) -> Self {
        Self {
            start: pos,
            end: None,
            uncertain: false,
        }
    }

    pub fn range(start: ProtPos, end: ProtPos) -> Self {
        Self {
            start,
            end: Some(end),
            uncertain: false,
        }
    }

    pub fn end_or_start(&self) -> ProtPos {
        self.end.unwrap_or(self.start)
    }
}

impl fmt::Display for ProtInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.uncertain {
            write!(f, "(")?;
        }
        write!(f, "{}", self.start)?;
        if let Some(end) = &self.end {
            write!(f, "_{}", end)?;
        }
        if self.uncertain {
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genome_interval_display() {
        let point = GenomeInterval::point(HgvsGenomicPos::new(12345));
        assert_eq!(point.to_string(), "12345");

        let range = GenomeInterval::range(HgvsGenomicPos::new(10), HgvsGenomicPos::new(11));
        assert_eq!(range.to_string(), "10_11");
        assert_eq!(range.len(), 2);
    }

    #[test]
    fn test_tx_pos_display() {
        let p = TxPos::new(HgvsTranscriptPos::new(123), CdsAnchor::CdsStart);
        assert_eq!(p.to_string(), "123");

        let utr5 = TxPos::new(HgvsTranscriptPos::new(-14), CdsAnchor::CdsStart);
        assert_eq!(utr5.to_string(), "-14");

        let utr3 = TxPos::new(HgvsTranscriptPos::new(1), CdsAnchor::CdsEnd);
        assert_eq!(utr3.to_string(), "*1");

        let intronic = TxPos::with_offset(
            HgvsTranscriptPos::new(123),
            IntronicOffset(5),
            CdsAnchor::CdsStart,
        );
        assert_eq!(intronic.to_string(), "123+5");

        let intronic_neg = TxPos::with_offset(
            HgvsTranscriptPos::new(124),
            IntronicOffset(-3),
            CdsAnchor::CdsStart,
        );
        assert_eq!(intronic_neg.to_string(), "124-3");
    }

    #[test]
    fn test_prot_pos_display() {
        let p = ProtPos::new(Residue::Lys, HgvsProteinPos::new(41));
        assert_eq!(p.to_string(), "Lys41");
        assert_eq!(ProtPos::bare(HgvsProteinPos::new(2346)).to_string(), "2346");
    }

    #[test]
    fn test_uncertain_interval_display() {
        let mut range = GenomeInterval::range(HgvsGenomicPos::new(100), HgvsGenomicPos::new(200));
        range.uncertain = true;
        assert_eq!(range.to_string(), "(100_200)");
    }
}
