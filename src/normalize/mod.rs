//! Variant normalization: 3'-most canonical form
//!
//! In repetitive sequence an indel has many equivalent descriptions; HGVS
//! canonicalizes to the 3'-most one relative to the variant's own axis
//! (transcript for `c.`/`n.`/`r.`, plus strand for `g.`/`m.`). Shifting works
//! on a window of reference sequence fetched from the provider, growing the
//! window geometrically when a repeat run reaches its edge.
//!
//! The 5' shift and the two-sided expansion exist for unambiguous SPDI
//! emission and are not part of the public normalization surface.

use crate::coords::{CdsAnchor, HgvsGenomicPos, HgvsTranscriptPos, TranscriptPos};
use crate::error::ForgeError;
use crate::hgvs::edit::NaEdit;
use crate::hgvs::location::{GenomeInterval, TxInterval, TxPos};
use crate::hgvs::variant::{HgvsVariant, PosEdit};
use crate::reference::{DataProvider, IdentifierType, TranscriptMapper};
use crate::sequence::Sequence;
use log::debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Configuration for normalization and projection windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Initial reference window fetched per shift step; grows geometrically
    /// (capped at 4096) when a repeat run reaches the window edge.
    pub window: usize,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self { window: 50 }
    }
}

impl NormalizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window.max(1);
        self
    }
}

/// Shifts variants to their 3'-most representation.
pub struct Normalizer<'a> {
    provider: &'a dyn DataProvider,
    config: NormalizeConfig,
}

/// Result of a shift: the new half-open span, and the rotated insertion
/// sequence when the edit was an insertion.
struct Shifted {
    start: i64,
    end: i64,
    rotated_ins: Option<Sequence>,
}

impl<'a> Normalizer<'a> {
    pub fn new(provider: &'a dyn DataProvider) -> Self {
        Self {
            provider,
            config: NormalizeConfig::default(),
        }
    }

    pub fn with_config(provider: &'a dyn DataProvider, config: NormalizeConfig) -> Self {
        Self { provider, config }
    }

    /// Normalize a variant on its own coordinate axis.
    ///
    /// Substitutions, identities, and inversions are returned unchanged;
    /// intronic transcript variants are returned unchanged because the
    /// transcript axis has no sequence for them. The operation is
    /// idempotent.
    pub fn normalize(&self, var: &HgvsVariant) -> Result<HgvsVariant, ForgeError> {
        match var {
            HgvsVariant::Genome(v) => {
                let pos_edit = self.normalize_genomic(
                    &v.accession.full(),
                    IdentifierType::GenomicAccession,
                    &v.pos_edit,
                )?;
                Ok(HgvsVariant::Genome(crate::hgvs::variant::GenomeVariant {
                    pos_edit,
                    ..v.clone()
                }))
            }
            HgvsVariant::Mt(v) => {
                let pos_edit = self.normalize_genomic(
                    &v.accession.full(),
                    IdentifierType::GenomicAccession,
                    &v.pos_edit,
                )?;
                Ok(HgvsVariant::Mt(crate::hgvs::variant::MtVariant {
                    pos_edit,
                    ..v.clone()
                }))
            }
            HgvsVariant::Cds(v) => {
                let pos_edit =
                    self.normalize_tx(&v.accession.full(), &v.pos_edit, true)?;
                Ok(HgvsVariant::Cds(crate::hgvs::variant::CdsVariant {
                    pos_edit,
                    ..v.clone()
                }))
            }
            HgvsVariant::Tx(v) => {
                let pos_edit =
                    self.normalize_tx(&v.accession.full(), &v.pos_edit, false)?;
                Ok(HgvsVariant::Tx(crate::hgvs::variant::TxVariant {
                    pos_edit,
                    ..v.clone()
                }))
            }
            HgvsVariant::Rna(v) => {
                let pos_edit =
                    self.normalize_tx(&v.accession.full(), &v.pos_edit, false)?;
                Ok(HgvsVariant::Rna(crate::hgvs::variant::RnaVariant {
                    pos_edit,
                    ..v.clone()
                }))
            }
            HgvsVariant::Protein(_) => Ok(var.clone()),
        }
    }

    fn normalize_genomic(
        &self,
        ac: &str,
        kind: IdentifierType,
        pos_edit: &PosEdit<GenomeInterval, NaEdit>,
    ) -> Result<PosEdit<GenomeInterval, NaEdit>, ForgeError> {
        let Some(loc) = &pos_edit.loc else {
            return Ok(pos_edit.clone());
        };
        let edit = pos_edit.edit.inner();
        if !is_shiftable(edit) {
            return Ok(pos_edit.clone());
        }
        // An insertion needs its flanking pair to define the gap
        if edit.is_insertion() && loc.end.is_none() {
            return Ok(pos_edit.clone());
        }

        let (start, end) = genome_span(loc, edit);
        let shifted = self.shift_3prime(ac, kind, start, end, edit)?;

        let new_loc = if edit.is_insertion() {
            GenomeInterval::range(
                HgvsGenomicPos::new(shifted.start),
                HgvsGenomicPos::new(shifted.start + 1),
            )
        } else {
            let start_pos = HgvsGenomicPos::new(shifted.start + 1);
            if shifted.end - shifted.start > 1 {
                GenomeInterval::range(start_pos, HgvsGenomicPos::new(shifted.end))
            } else {
                GenomeInterval::point(start_pos)
            }
        };

        let new_edit = self.refresh_edit(ac, kind, edit, &shifted)?;
        Ok(PosEdit {
            loc: Some(new_loc),
            edit: pos_edit.edit.rewrap(new_edit),
        })
    }

    fn normalize_tx(
        &self,
        ac: &str,
        pos_edit: &PosEdit<TxInterval, NaEdit>,
        cds_anchored: bool,
    ) -> Result<PosEdit<TxInterval, NaEdit>, ForgeError> {
        let Some(loc) = &pos_edit.loc else {
            return Ok(pos_edit.clone());
        };
        let edit = pos_edit.edit.inner();
        if !is_shiftable(edit) {
            return Ok(pos_edit.clone());
        }
        if loc.has_intronic() {
            debug!("{}: intronic span, left unnormalized", ac);
            return Ok(pos_edit.clone());
        }
        if edit.is_insertion() && loc.end.is_none() {
            return Ok(pos_edit.clone());
        }

        let tm = TranscriptMapper::new(self.provider.get_transcript(ac, None)?)?;
        let n_start = tm.c_to_n(loc.start.base.to_index(), loc.start.anchor)?;
        let n_end = tm.c_to_n(
            loc.end_or_start().base.to_index(),
            loc.end_or_start().anchor,
        )?;

        let (start, end) = if edit.is_insertion() {
            (n_end.value(), n_end.value())
        } else {
            (n_start.value(), n_end.value() + 1)
        };

        let shifted = self.shift_3prime(
            ac,
            IdentifierType::TranscriptAccession,
            start,
            end,
            edit,
        )?;

        let to_tx_pos = |n: i64| -> TxPos {
            if cds_anchored {
                let (idx, anchor) = tm.n_to_c(TranscriptPos::new(n));
                TxPos::new(idx.to_hgvs(), anchor)
            } else {
                TxPos::new(
                    HgvsTranscriptPos::new(n + 1),
                    CdsAnchor::TranscriptStart,
                )
            }
        };

        let new_loc = if edit.is_insertion() {
            TxInterval::range(to_tx_pos(shifted.start - 1), to_tx_pos(shifted.start))
        } else if shifted.end - shifted.start > 1 {
            TxInterval::range(to_tx_pos(shifted.start), to_tx_pos(shifted.end - 1))
        } else {
            TxInterval::point(to_tx_pos(shifted.start))
        };

        let new_edit = self.refresh_edit(
            ac,
            IdentifierType::TranscriptAccession,
            edit,
            &shifted,
        )?;
        Ok(PosEdit {
            loc: Some(new_loc),
            edit: pos_edit.edit.rewrap(new_edit),
        })
    }

    /// After a shift, restate any explicit sequences at the new location.
    fn refresh_edit(
        &self,
        ac: &str,
        kind: IdentifierType,
        edit: &NaEdit,
        shifted: &Shifted,
    ) -> Result<NaEdit, ForgeError> {
        match edit {
            NaEdit::Insertion { .. } => {
                let sequence = shifted
                    .rotated_ins
                    .clone()
                    .expect("insertion shift returns a sequence");
                Ok(NaEdit::Insertion { sequence })
            }
            NaEdit::Deletion {
                sequence: Some(_),
                length,
            } => {
                let seq = self
                    .provider
                    .get_seq(ac, shifted.start, shifted.end, kind)?;
                Ok(NaEdit::Deletion {
                    sequence: Some(Sequence::from_str(&seq)?),
                    length: *length,
                })
            }
            NaEdit::Duplication {
                sequence: Some(_),
                length,
            } => {
                let seq = self
                    .provider
                    .get_seq(ac, shifted.start, shifted.end, kind)?;
                Ok(NaEdit::Duplication {
                    sequence: Some(Sequence::from_str(&seq)?),
                    length: *length,
                })
            }
            other => Ok(other.clone()),
        }
    }

    /// Slide the edit as far 3' as the reference allows.
    ///
    /// Deletions, duplications, repeats, and length-changing delins slide
    /// while the base after the span matches the first base of the span.
    /// Insertions slide while the base at the gap matches the first base of
    /// the (rotating) inserted sequence.
    fn shift_3prime(
        &self,
        ac: &str,
        kind: IdentifierType,
        start: i64,
        end: i64,
        edit: &NaEdit,
    ) -> Result<Shifted, ForgeError> {
        match edit {
            NaEdit::Insertion { sequence } => {
                let mut alt: Vec<u8> = sequence.to_string().into_bytes();
                if alt.is_empty() {
                    return Ok(Shifted {
                        start,
                        end,
                        rotated_ins: Some(sequence.clone()),
                    });
                }
                let mut gap = start;
                let mut reader = ChunkedReader::new(self.provider, ac, kind, gap, self.config.window);
                while let Some(next) = reader.next_base()? {
                    if next == alt[0] {
                        gap += 1;
                        alt.rotate_left(1);
                    } else {
                        break;
                    }
                }
                let rotated = Sequence::from_str(std::str::from_utf8(&alt).expect("ascii"))?;
                Ok(Shifted {
                    start: gap,
                    end: gap,
                    rotated_ins: Some(rotated),
                })
            }
            NaEdit::Deletion { sequence, .. }
            | NaEdit::Duplication { sequence, .. }
            | NaEdit::Repeat { unit: sequence, .. } => {
                let span = match sequence {
                    Some(s) => s.to_string(),
                    None => self.provider.get_seq(ac, start, end, kind)?,
                };
                self.slide_span(ac, kind, start, end, span)
            }
            NaEdit::Delins { sequence } => {
                if sequence.len() as i64 == end - start {
                    return Ok(Shifted {
                        start,
                        end,
                        rotated_ins: None,
                    });
                }
                let span = self.provider.get_seq(ac, start, end, kind)?;
                self.slide_span(ac, kind, start, end, span)
            }
            _ => Ok(Shifted {
                start,
                end,
                rotated_ins: None,
            }),
        }
    }

    fn slide_span(
        &self,
        ac: &str,
        kind: IdentifierType,
        start: i64,
        end: i64,
        span: String,
    ) -> Result<Shifted, ForgeError> {
        let mut window: Vec<u8> = span.into_bytes();
        if window.is_empty() {
            return Ok(Shifted {
                start,
                end,
                rotated_ins: None,
            });
        }
        let mut s = start;
        let mut e = end;
        let mut reader = ChunkedReader::new(self.provider, ac, kind, e, self.config.window);
        while let Some(next) = reader.next_base()? {
            if next == window[0] {
                s += 1;
                e += 1;
                window.rotate_left(1);
                *window.last_mut().expect("non-empty") = next;
            } else {
                break;
            }
        }
        Ok(Shifted {
            start: s,
            end: e,
            rotated_ins: None,
        })
    }

    /// Slide the edit as far 5' as the reference allows (internal; used by
    /// the unambiguous SPDI expansion).
    pub(crate) fn shift_5prime(
        &self,
        ac: &str,
        kind: IdentifierType,
        start: i64,
        end: i64,
        edit: &NaEdit,
    ) -> Result<(i64, i64), ForgeError> {
        let mut window: Vec<u8> = match edit {
            NaEdit::Insertion { sequence } => sequence.to_string().into_bytes(),
            NaEdit::Deletion { sequence, .. }
            | NaEdit::Duplication { sequence, .. }
            | NaEdit::Repeat { unit: sequence, .. } => match sequence {
                Some(s) => s.to_string().into_bytes(),
                None => self
                    .provider
                    .get_seq(ac, start, end, kind)?
                    .into_bytes(),
            },
            NaEdit::Delins { sequence } => {
                if sequence.len() as i64 == end - start {
                    return Ok((start, end));
                }
                self.provider.get_seq(ac, start, end, kind)?.into_bytes()
            }
            _ => return Ok((start, end)),
        };
        if window.is_empty() {
            return Ok((start, end));
        }

        let is_ins = edit.is_insertion();
        let mut s = start;
        let mut e = end;
        // Fetch leftward in blocks; the run is usually short.
        let mut block_start = s.saturating_sub(self.config.window as i64);
        let mut block = self
            .provider
            .get_seq(ac, block_start, s, kind)?
            .into_bytes();
        loop {
            if s == 0 {
                break;
            }
            if block.is_empty() {
                if block_start == 0 {
                    break;
                }
                let new_start = block_start.saturating_sub(self.config.window as i64);
                block = self
                    .provider
                    .get_seq(ac, new_start, block_start, kind)?
                    .into_bytes();
                block_start = new_start;
                continue;
            }
            let prev = *block.last().expect("non-empty");
            if prev != *window.last().expect("non-empty") {
                break;
            }
            block.pop();
            s -= 1;
            if !is_ins {
                e -= 1;
            }
            window.rotate_right(1);
            if !is_ins {
                window[0] = prev;
            }
        }
        if is_ins {
            e = s;
        }
        Ok((s, e))
    }

    /// Expand a length-changing edit to the full span of its ambiguity,
    /// 5'-most start to 3'-most end.
    pub(crate) fn expand_unambiguous(
        &self,
        ac: &str,
        kind: IdentifierType,
        start: i64,
        end: i64,
        edit: &NaEdit,
    ) -> Result<(i64, i64), ForgeError> {
        if !is_shiftable(edit) {
            return Ok((start, end));
        }
        let (s5, _) = self.shift_5prime(ac, kind, start, end, edit)?;
        let shifted = self.shift_3prime(ac, kind, start, end, edit)?;
        Ok((s5, shifted.end))
    }
}

/// Length-changing edits can shift; substitutions, inversions, identities,
/// and unknowns cannot.
fn is_shiftable(edit: &NaEdit) -> bool {
    match edit {
        NaEdit::Deletion { .. }
        | NaEdit::Insertion { .. }
        | NaEdit::Duplication { .. }
        | NaEdit::Repeat { .. } => true,
        NaEdit::Delins { .. } => true,
        NaEdit::Substitution { .. }
        | NaEdit::Inversion { .. }
        | NaEdit::Identity
        | NaEdit::Unknown => false,
    }
}

/// Half-open span of a genomic location; insertions become the empty gap
/// before the second flanking base.
fn genome_span(loc: &GenomeInterval, edit: &NaEdit) -> (i64, i64) {
    if edit.is_insertion() {
        let gap = loc.end_or_start().to_index().value();
        (gap, gap)
    } else {
        (
            loc.start.to_index().value(),
            loc.end_or_start().to_index().value() + 1,
        )
    }
}

/// Streams reference bases forward from a position, fetching in growing
/// chunks so long repeat runs do not mean one provider call per base.
struct ChunkedReader<'a> {
    provider: &'a dyn DataProvider,
    ac: &'a str,
    kind: IdentifierType,
    pos: i64,
    chunk: Vec<u8>,
    chunk_offset: usize,
    chunk_size: usize,
    exhausted: bool,
}

impl<'a> ChunkedReader<'a> {
    fn new(
        provider: &'a dyn DataProvider,
        ac: &'a str,
        kind: IdentifierType,
        pos: i64,
        chunk_size: usize,
    ) -> Self {
        Self {
            provider,
            ac,
            kind,
            pos,
            chunk: Vec::new(),
            chunk_offset: 0,
            chunk_size: chunk_size.max(1),
            exhausted: false,
        }
    }

    fn next_base(&mut self) -> Result<Option<u8>, ForgeError> {
        if self.chunk_offset >= self.chunk.len() {
            if self.exhausted {
                return Ok(None);
            }
            let fetched = self.provider.get_seq(
                self.ac,
                self.pos,
                self.pos + self.chunk_size as i64,
                self.kind,
            )?;
            if fetched.len() < self.chunk_size {
                self.exhausted = true;
            }
            if fetched.is_empty() {
                return Ok(None);
            }
            self.pos += fetched.len() as i64;
            self.chunk = fetched.into_bytes();
            self.chunk_offset = 0;
            self.chunk_size = (self.chunk_size * 2).min(4096);
        }
        let base = self.chunk[self.chunk_offset];
        self.chunk_offset += 1;
        Ok(Some(base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hgvs::parser::parse_hgvs;
    use crate::reference::MockProvider;

    fn normalize(provider: &MockProvider, input: &str) -> String {
        let var = parse_hgvs(input).unwrap();
        Normalizer::new(provider).normalize(&var).unwrap().to_string()
    }

    #[test]
    fn test_substitution_untouched() {
        let provider = MockProvider::with_test_data();
        assert_eq!(
            normalize(&provider, "NC_TEST.1:g.100A>G"),
            "NC_TEST.1:g.100A>G"
        );
    }

    #[test]
    fn test_deletion_shifts_to_run_end() {
        let provider = MockProvider::with_test_data();
        // NC_RUN.1 = ACG TTTTT ACG...; the T run is g.4-8
        assert_eq!(
            normalize(&provider, "NC_RUN.1:g.4_5del"),
            "NC_RUN.1:g.7_8del"
        );
        // Single-base deletion inside the run
        assert_eq!(normalize(&provider, "NC_RUN.1:g.4del"), "NC_RUN.1:g.8del");
    }

    #[test]
    fn test_normalization_idempotent() {
        let provider = MockProvider::with_test_data();
        let once = normalize(&provider, "NC_RUN.1:g.4_5del");
        let twice = normalize(&provider, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_duplication_shifts() {
        let provider = MockProvider::with_test_data();
        assert_eq!(normalize(&provider, "NC_RUN.1:g.4dup"), "NC_RUN.1:g.8dup");
    }

    #[test]
    fn test_insertion_shifts_and_converges() {
        let provider = MockProvider::with_test_data();
        // Inside the T run, both descriptions slide to the run's 3' end
        let a = normalize(&provider, "NC_RUN.1:g.4_5insT");
        let b = normalize(&provider, "NC_RUN.1:g.5_6insT");
        assert_eq!(a, b);
        assert_eq!(a, "NC_RUN.1:g.8_9insT");
    }

    #[test]
    fn test_insertion_not_in_run_stays() {
        let provider = MockProvider::with_test_data();
        assert_eq!(
            normalize(&provider, "NC_DUP.1:g.10_11insA"),
            "NC_DUP.1:g.10_11insA"
        );
    }

    #[test]
    fn test_multibase_insertion_rotates() {
        let provider = MockProvider::with_test_data();
        // NC_TEST.1 = ACGT repeated; inserting "GT" after g.3 (..CG|T..)
        // slides through the periodic sequence to its very end, rotating
        // the inserted unit as it goes. Use a bounded fixture instead:
        // NC_RUN.1 g.2_3insGT -> G matches g.3 ('G'), then T matches g.4.
        let out = normalize(&provider, "NC_RUN.1:g.2_3insGT");
        // After sliding over G (g.3) and the T run (g.4-8), the insertion
        // lands at the run end with the unit rotated back to TG -> GT order
        // preserved modulo rotation.
        let reparsed = parse_hgvs(&out).unwrap();
        let again = Normalizer::new(&provider).normalize(&reparsed).unwrap();
        assert_eq!(out, again.to_string());
    }

    #[test]
    fn test_stated_deletion_sequence_restated() {
        let provider = MockProvider::with_test_data();
        assert_eq!(
            normalize(&provider, "NC_RUN.1:g.4_5delTT"),
            "NC_RUN.1:g.7_8delTT"
        );
    }

    #[test]
    fn test_cds_deletion_shifts_in_transcript_space() {
        let provider = MockProvider::with_test_data();
        // NM_000051.3 CDS is ATG then a long A run (c.4 onward); deleting
        // two A's shifts to the 3' end of the run (c.180, followed by TAA
        // whose T stops the slide... the run includes the TAA's A's only
        // after the T).
        let out = normalize(&provider, "NM_000051.3:c.4_5del");
        assert_eq!(out, "NM_000051.3:c.179_180del");
    }

    #[test]
    fn test_intronic_variant_left_alone() {
        let provider = MockProvider::with_test_data();
        assert_eq!(
            normalize(&provider, "NM_000051.3:c.4+5del"),
            "NM_000051.3:c.4+5del"
        );
    }

    #[test]
    fn test_expand_unambiguous_covers_run() {
        let provider = MockProvider::with_test_data();
        let norm = Normalizer::new(&provider);
        let edit = NaEdit::Deletion {
            sequence: None,
            length: None,
        };
        // g.5_6del (0-based [4, 6)) inside the T run at 0-based 3..8
        let (s, e) = norm
            .expand_unambiguous("NC_RUN.1", IdentifierType::GenomicAccession, 4, 6, &edit)
            .unwrap();
        assert_eq!((s, e), (3, 8));
    }
}
