//! Transcript model and position projection
//!
//! # Coordinate system
//!
//! All model coordinates are **0-based**:
//!
//! | Field | Convention |
//! |-------|------------|
//! | `ExonData.transcript_start` | inclusive |
//! | `ExonData.transcript_end` | exclusive |
//! | `ExonData.reference_start` | inclusive |
//! | `ExonData.reference_end` | inclusive |
//! | `cds_start_index` | first base of the start codon |
//! | `cds_end_index` | last base of the stop codon |
//!
//! Exons must tile the transcript contiguously in transcript coordinates;
//! intron spans are implied by the gaps between consecutive exons' reference
//! coordinates.

use crate::coords::{CdsAnchor, GenomicPos, IntronicOffset, TranscriptPos};
use crate::error::ForgeError;
use log::trace;
use serde::{Deserialize, Serialize};

/// Strand orientation of a transcript on its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Strand {
    #[serde(rename = "+")]
    #[default]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}

/// One exon of a transcript-to-reference alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExonData {
    /// Transcript start (inclusive)
    pub transcript_start: TranscriptPos,
    /// Transcript end (exclusive)
    pub transcript_end: TranscriptPos,
    /// Reference start (inclusive)
    pub reference_start: GenomicPos,
    /// Reference end (inclusive)
    pub reference_end: GenomicPos,
}

impl ExonData {
    pub fn tx_len(&self) -> i64 {
        self.transcript_end.value() - self.transcript_start.value()
    }

    pub fn genomic_len(&self) -> i64 {
        self.reference_end.value() - self.reference_start.value() + 1
    }

    pub fn contains_genomic(&self, g: GenomicPos) -> bool {
        g.value() >= self.reference_start.value() && g.value() <= self.reference_end.value()
    }

    pub fn contains_transcript(&self, n: TranscriptPos) -> bool {
        n.value() >= self.transcript_start.value() && n.value() < self.transcript_end.value()
    }
}

/// A full transcript model as supplied by the data provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptData {
    pub ac: String,
    pub gene: Option<String>,
    /// 0-based index of the first base of the start codon, if coding
    pub cds_start_index: Option<TranscriptPos>,
    /// 0-based index of the last base of the stop codon, if coding
    pub cds_end_index: Option<TranscriptPos>,
    pub strand: Strand,
    /// Genomic accession the exons are aligned to
    pub reference_accession: String,
    /// Exons in transcript order
    pub exons: Vec<ExonData>,
}

impl TranscriptData {
    pub fn is_coding(&self) -> bool {
        self.cds_start_index.is_some() && self.cds_end_index.is_some()
    }

    /// Total transcript length in bases.
    pub fn tx_len(&self) -> i64 {
        self.exons.last().map(|e| e.transcript_end.value()).unwrap_or(0)
    }
}

/// Projects positions between the transcript and its reference.
///
/// Construction validates exon contiguity and builds a genomic-order index
/// once, so lookups in both directions are O(log n).
pub struct TranscriptMapper {
    data: TranscriptData,
    /// Exon indices sorted by reference_start
    genomic_order: Vec<usize>,
}

impl TranscriptMapper {
    pub fn new(data: TranscriptData) -> Result<Self, ForgeError> {
        if data.exons.is_empty() {
            return Err(ForgeError::Mapping(format!(
                "transcript {} has no exons",
                data.ac
            )));
        }

        let mut cursor = 0i64;
        for (i, exon) in data.exons.iter().enumerate() {
            if exon.transcript_start.value() != cursor {
                return Err(ForgeError::Mapping(format!(
                    "transcript {}: exon {} starts at {} but the previous exon ends at {}",
                    data.ac,
                    i,
                    exon.transcript_start.value(),
                    cursor
                )));
            }
            if exon.tx_len() != exon.genomic_len() {
                return Err(ForgeError::Mapping(format!(
                    "transcript {}: exon {} spans {} transcript bases but {} reference bases",
                    data.ac,
                    i,
                    exon.tx_len(),
                    exon.genomic_len()
                )));
            }
            cursor = exon.transcript_end.value();
        }

        let mut genomic_order: Vec<usize> = (0..data.exons.len()).collect();
        genomic_order
            .sort_by_key(|&i| data.exons[i].reference_start.value());

        Ok(Self {
            data,
            genomic_order,
        })
    }

    pub fn data(&self) -> &TranscriptData {
        &self.data
    }

    pub fn strand(&self) -> Strand {
        self.data.strand
    }

    pub fn tx_len(&self) -> i64 {
        self.data.tx_len()
    }

    /// Project a genomic position into transcript space.
    ///
    /// Exonic positions return a zero offset. Intronic positions anchor at
    /// the nearest exon boundary with a signed transcript-direction offset;
    /// the midpoint of an intron anchors upstream (positive offset).
    pub fn g_to_n(
        &self,
        g: GenomicPos,
    ) -> Result<(TranscriptPos, IntronicOffset), ForgeError> {
        // Binary search for the rightmost exon starting at or before g
        let idx = self
            .genomic_order
            .partition_point(|&i| self.data.exons[i].reference_start.value() <= g.value());

        if idx > 0 {
            let exon = &self.data.exons[self.genomic_order[idx - 1]];
            if exon.contains_genomic(g) {
                let n = self.exonic_g_to_n(exon, g);
                trace!("{}: g.{} -> n.{} (exonic)", self.data.ac, g.value(), n.value());
                return Ok((n, IntronicOffset(0)));
            }
        }

        // Intronic: needs a genomic predecessor and successor exon
        if idx == 0 || idx >= self.genomic_order.len() {
            return Err(ForgeError::Mapping(format!(
                "genomic position {} is outside transcript {}",
                g.value(),
                self.data.ac
            )));
        }

        let prev = &self.data.exons[self.genomic_order[idx - 1]];
        let next = &self.data.exons[self.genomic_order[idx]];
        let dist_prev = g.value() - prev.reference_end.value();
        let dist_next = next.reference_start.value() - g.value();
        debug_assert!(dist_prev > 0 && dist_next > 0);

        let (n, offset) = match self.data.strand {
            Strand::Plus => {
                // prev exon is transcript-upstream
                if dist_prev <= dist_next {
                    (
                        TranscriptPos::new(prev.transcript_end.value() - 1),
                        IntronicOffset(dist_prev),
                    )
                } else {
                    (next.transcript_start, IntronicOffset(-dist_next))
                }
            }
            Strand::Minus => {
                // next exon (genomically right) is transcript-upstream
                if dist_next <= dist_prev {
                    (
                        TranscriptPos::new(next.transcript_end.value() - 1),
                        IntronicOffset(dist_next),
                    )
                } else {
                    (prev.transcript_start, IntronicOffset(-dist_prev))
                }
            }
        };
        trace!(
            "{}: g.{} -> n.{}{:+} (intronic)",
            self.data.ac,
            g.value(),
            n.value(),
            offset.value()
        );
        Ok((n, offset))
    }

    fn exonic_g_to_n(&self, exon: &ExonData, g: GenomicPos) -> TranscriptPos {
        match self.data.strand {
            Strand::Plus => TranscriptPos::new(
                exon.transcript_start.value() + (g.value() - exon.reference_start.value()),
            ),
            Strand::Minus => TranscriptPos::new(
                exon.transcript_start.value() + (exon.reference_end.value() - g.value()),
            ),
        }
    }

    /// Project a transcript position (plus optional intronic offset) onto
    /// the reference.
    pub fn n_to_g(
        &self,
        n: TranscriptPos,
        offset: IntronicOffset,
    ) -> Result<GenomicPos, ForgeError> {
        if n.value() < 0 || n.value() >= self.tx_len() {
            return Err(ForgeError::Mapping(format!(
                "transcript position {} is outside transcript {} (length {})",
                n.value(),
                self.data.ac,
                self.tx_len()
            )));
        }

        let idx = self
            .data
            .exons
            .partition_point(|e| e.transcript_start.value() <= n.value());
        let exon = &self.data.exons[idx - 1];
        debug_assert!(exon.contains_transcript(n));

        let within = n.value() - exon.transcript_start.value();
        let g = match self.data.strand {
            Strand::Plus => exon.reference_start.value() + within + offset.value(),
            Strand::Minus => exon.reference_end.value() - within - offset.value(),
        };
        let g = GenomicPos::new(g);
        // A non-zero offset must land in an intron, not back inside an exon
        if offset.value() != 0 && self.data.exons.iter().any(|e| e.contains_genomic(g)) {
            return Err(ForgeError::Mapping(format!(
                "offset {:+} from transcript position {} of {} resolves to exonic reference position {}",
                offset.value(),
                n.value(),
                self.data.ac,
                g.value()
            )));
        }
        Ok(g)
    }

    /// Convert an anchor-relative index (`c.`-style) to a transcript index.
    pub fn c_to_n(
        &self,
        idx: TranscriptPos,
        anchor: CdsAnchor,
    ) -> Result<TranscriptPos, ForgeError> {
        let n = match anchor {
            CdsAnchor::TranscriptStart => idx.value(),
            CdsAnchor::CdsStart => {
                let cds_start = self.require_cds_start()?;
                cds_start.value() + idx.value()
            }
            CdsAnchor::CdsEnd => {
                let cds_end = self.require_cds_end()?;
                // *1 is the first base past the stop codon
                cds_end.value() + idx.value() + 1
            }
        };
        if n < 0 || n >= self.tx_len() {
            return Err(ForgeError::Coordinate(format!(
                "position resolves to transcript index {} outside {} (length {})",
                n,
                self.data.ac,
                self.tx_len()
            )));
        }
        Ok(TranscriptPos::new(n))
    }

    /// Convert a transcript index into the anchor-relative (`c.`) form.
    ///
    /// Non-coding transcripts always anchor at the transcription start.
    pub fn n_to_c(&self, n: TranscriptPos) -> (TranscriptPos, CdsAnchor) {
        let (Some(cds_start), Some(cds_end)) =
            (self.data.cds_start_index, self.data.cds_end_index)
        else {
            return (n, CdsAnchor::TranscriptStart);
        };

        if n.value() > cds_end.value() {
            (
                TranscriptPos::new(n.value() - cds_end.value() - 1),
                CdsAnchor::CdsEnd,
            )
        } else {
            (TranscriptPos::new(n.value() - cds_start.value()), CdsAnchor::CdsStart)
        }
    }

    fn require_cds_start(&self) -> Result<TranscriptPos, ForgeError> {
        self.data.cds_start_index.ok_or_else(|| {
            ForgeError::Coordinate(format!("transcript {} has no CDS", self.data.ac))
        })
    }

    fn require_cds_end(&self) -> Result<TranscriptPos, ForgeError> {
        self.data.cds_end_index.ok_or_else(|| {
            ForgeError::Coordinate(format!("transcript {} has no CDS", self.data.ac))
        })
    }
}
