//! Variant mapping across coordinate systems
//!
//! [`VariantMapper`] projects variants between the genomic, transcript, and
//! protein axes using transcript models from a [`DataProvider`]. Interval
//! endpoints are mapped independently; on minus-strand transcripts the
//! endpoints swap and edit sequences are reverse-complemented.

use crate::coords::{GenomicPos, HgvsGenomicPos, IntronicOffset};
use crate::error::ForgeError;
use crate::hgvs::edit::NaEdit;
use crate::hgvs::location::{GenomeInterval, TxInterval, TxPos};
use crate::hgvs::variant::{
    Accession, CdsVariant, GenomeVariant, HgvsVariant, PosEdit, ProteinVariant, TxVariant,
};
use crate::normalize::Normalizer;
use crate::reference::{
    DataProvider, IdentifierKind, IdentifierType, Strand, TranscriptMapper, TranscriptSearch,
};
use crate::sequence::translate_cds;
use crate::spdi::SpdiVariant;
use log::debug;

use super::altseq::apply_na_edit;
use super::protein::{build_protein_variant, ProteinDiff};

/// High-level mapper between coordinate systems.
pub struct VariantMapper<'a> {
    provider: &'a dyn DataProvider,
}

impl<'a> VariantMapper<'a> {
    pub fn new(provider: &'a dyn DataProvider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &'a dyn DataProvider {
        self.provider
    }

    /// Map a genomic variant onto a transcript (`g.` to `c.`).
    pub fn g_to_c(
        &self,
        var_g: &GenomeVariant,
        transcript_ac: &str,
    ) -> Result<CdsVariant, ForgeError> {
        let reference_ac = var_g.accession.full();
        let tm = TranscriptMapper::new(
            self.provider
                .get_transcript(transcript_ac, Some(&reference_ac))?,
        )?;
        let loc = require_loc(&var_g.pos_edit.loc, "genomic")?;

        let start = self.g_pos_to_tx(&tm, loc.start)?;
        let end = match loc.end {
            Some(end) => Some(self.g_pos_to_tx(&tm, end)?),
            None => None,
        };

        // Transcript order may be the reverse of genomic order
        let (start, end) = match end {
            Some(end) if tx_key(&end) < tx_key(&start) => (end, Some(start)),
            other => (start, other),
        };

        let mut edit = var_g.pos_edit.edit.inner().clone();
        if tm.strand() == Strand::Minus {
            edit = edit.reverse_complement();
        }

        Ok(CdsVariant {
            accession: Accession::from_full(transcript_ac),
            reference: None,
            gene_symbol: tm.data().gene.clone(),
            pos_edit: PosEdit {
                loc: Some(TxInterval {
                    start,
                    end,
                    uncertain: loc.uncertain,
                }),
                edit: var_g.pos_edit.edit.rewrap(edit),
            },
        })
    }

    fn g_pos_to_tx(
        &self,
        tm: &TranscriptMapper,
        pos: HgvsGenomicPos,
    ) -> Result<TxPos, ForgeError> {
        let (n, offset) = tm.g_to_n(pos.to_index())?;
        let (idx, anchor) = tm.n_to_c(n);
        Ok(TxPos {
            base: idx.to_hgvs(),
            offset: (offset.value() != 0).then_some(offset),
            anchor,
        })
    }

    /// Map a coding variant onto its reference (`c.` to `g.`).
    pub fn c_to_g(
        &self,
        var_c: &CdsVariant,
        reference_ac: Option<&str>,
    ) -> Result<GenomeVariant, ForgeError> {
        self.tx_to_g(
            &var_c.accession,
            var_c.gene_symbol.clone(),
            &var_c.pos_edit,
            reference_ac,
        )
    }

    /// Map a non-coding transcript variant onto its reference (`n.` to `g.`).
    pub fn n_to_g(
        &self,
        var_n: &TxVariant,
        reference_ac: Option<&str>,
    ) -> Result<GenomeVariant, ForgeError> {
        self.tx_to_g(
            &var_n.accession,
            var_n.gene_symbol.clone(),
            &var_n.pos_edit,
            reference_ac,
        )
    }

    fn tx_to_g(
        &self,
        accession: &Accession,
        gene_symbol: Option<String>,
        pos_edit: &PosEdit<TxInterval, NaEdit>,
        reference_ac: Option<&str>,
    ) -> Result<GenomeVariant, ForgeError> {
        let tm = TranscriptMapper::new(
            self.provider
                .get_transcript(&accession.full(), reference_ac)?,
        )?;
        let loc = require_loc(&pos_edit.loc, "transcript")?;

        let g_start = self.tx_pos_to_g(&tm, &loc.start)?;
        let g_end = match &loc.end {
            Some(end) => Some(self.tx_pos_to_g(&tm, end)?),
            None => None,
        };

        let (g_start, g_end) = match g_end {
            Some(end) if end.value() < g_start.value() => (end, Some(g_start)),
            other => (g_start, other),
        };

        let mut edit = pos_edit.edit.inner().clone();
        if tm.strand() == Strand::Minus {
            edit = edit.reverse_complement();
        }

        let reference = reference_ac
            .map(str::to_string)
            .unwrap_or_else(|| tm.data().reference_accession.clone());

        Ok(GenomeVariant {
            accession: Accession::from_full(&reference),
            reference: None,
            gene_symbol,
            pos_edit: PosEdit {
                loc: Some(GenomeInterval {
                    start: g_start.to_hgvs(),
                    end: g_end.map(|g| g.to_hgvs()),
                    uncertain: loc.uncertain,
                }),
                edit: pos_edit.edit.rewrap(edit),
            },
        })
    }

    fn tx_pos_to_g(
        &self,
        tm: &TranscriptMapper,
        pos: &TxPos,
    ) -> Result<GenomicPos, ForgeError> {
        let n = tm.c_to_n(pos.base.to_index(), pos.anchor)?;
        tm.n_to_g(n, pos.offset.unwrap_or(IntronicOffset(0)))
    }

    /// All transcript consequences of a genomic variant, via regional
    /// discovery.
    pub fn g_to_c_all(
        &self,
        var_g: &GenomeVariant,
        searcher: &dyn TranscriptSearch,
    ) -> Result<Vec<CdsVariant>, ForgeError> {
        let loc = require_loc(&var_g.pos_edit.loc, "genomic")?;
        let start = loc.start.to_index().value();
        let end = loc.end_or_start().to_index().value() + 1;

        let transcripts =
            searcher.transcripts_for_region(&var_g.accession.full(), start, end)?;
        let mut results = Vec::new();
        for tx_ac in transcripts {
            match self.g_to_c(var_g, &tx_ac) {
                Ok(vc) => results.push(vc),
                Err(e) => debug!("g_to_c onto {} failed: {}", tx_ac, e),
            }
        }
        Ok(results)
    }

    /// Project a coding variant to its protein consequence (`c.` to `p.`).
    ///
    /// The result is a predicted consequence (`p.(…)`); callers wanting the
    /// observed form can clear the flag on the returned variant.
    pub fn c_to_p(
        &self,
        var_c: &CdsVariant,
        protein_ac: Option<&str>,
    ) -> Result<ProteinVariant, ForgeError> {
        let transcript_ac = var_c.accession.full();
        let protein_ac = match protein_ac {
            Some(ac) => ac.to_string(),
            None => self
                .provider
                .get_symbol_accessions(
                    &transcript_ac,
                    IdentifierKind::Transcript,
                    IdentifierKind::Protein,
                )?
                .first()
                .map(|(_, ac)| ac.clone())
                .ok_or_else(|| {
                    ForgeError::Translation(format!(
                        "no protein accession known for {}",
                        transcript_ac
                    ))
                })?,
        };

        let tm = TranscriptMapper::new(self.provider.get_transcript(&transcript_ac, None)?)?;
        let (Some(cds_start), Some(cds_end)) = (
            tm.data().cds_start_index,
            tm.data().cds_end_index,
        ) else {
            return Err(ForgeError::Translation(format!(
                "{} has no CDS",
                transcript_ac
            )));
        };

        let ref_seq = self.provider.get_seq(
            &transcript_ac,
            0,
            -1,
            IdentifierType::TranscriptAccession,
        )?;
        if (ref_seq.len() as i64) <= cds_end.value() {
            return Err(ForgeError::Translation(format!(
                "transcript sequence for {} is shorter than its CDS",
                transcript_ac
            )));
        }

        let loc = require_loc(&var_c.pos_edit.loc, "coding")?;
        if loc.has_intronic() {
            return Err(ForgeError::Mapping(
                "intronic variants have no transcript-sequence projection".into(),
            ));
        }

        let edit = var_c.pos_edit.edit.inner();
        let n_start = tm.c_to_n(loc.start.base.to_index(), loc.start.anchor)?;
        let n_end = tm.c_to_n(
            loc.end_or_start().base.to_index(),
            loc.end_or_start().anchor,
        )?;
        let (span_start, span_end) = if edit.is_insertion() {
            (n_end.value(), n_end.value())
        } else {
            (n_start.value(), n_end.value() + 1)
        };

        let edited = apply_na_edit(
            &transcript_ac,
            &ref_seq,
            span_start as usize,
            span_end as usize,
            edit,
        )?;

        let cds_start_idx = cds_start.value() as usize;
        // An edit wholly upstream of the CDS shifts the CDS start instead
        // of changing the frame
        let alt_cds_start = if span_end as i64 <= cds_start.value() {
            (cds_start.value() + edited.net_change) as usize
        } else {
            cds_start_idx
        };

        let ref_aa = translate_cds(&ref_seq[cds_start_idx..]);
        let alt_aa = if alt_cds_start < edited.sequence.len() {
            translate_cds(&edited.sequence[alt_cds_start..])
        } else {
            String::new()
        };

        let cds_overlap =
            span_end as i64 > cds_start.value() && (span_start as i64) <= cds_end.value();
        let diff = ProteinDiff {
            protein_ac: &protein_ac,
            ref_aa: &ref_aa,
            alt_aa: &alt_aa,
            variant_start_aa: ((span_start as i64 - cds_start.value()).max(0) / 3) as usize,
            variant_end_cds: span_end as i64 - 1 - cds_start.value(),
            official_stop_idx: (cds_end.value() - cds_start.value()) / 3,
            is_frameshift: edited.net_change % 3 != 0,
            may_introduce_stop: matches!(
                edit,
                NaEdit::Substitution { .. } | NaEdit::Delins { .. } | NaEdit::Insertion { .. }
            ),
            cds_overlap,
        };

        let mut var_p = build_protein_variant(&diff)?;
        var_p.pos_edit.set_predicted(true);
        Ok(var_p)
    }

    /// Normalize a variant to its 3'-most form (convenience wrapper around
    /// [`Normalizer`] with the default configuration).
    pub fn normalize(&self, var: &HgvsVariant) -> Result<HgvsVariant, ForgeError> {
        Normalizer::new(self.provider).normalize(var)
    }

    /// Check a variant's stated reference allele against the provider.
    ///
    /// Variants that state no reference sequence validate trivially.
    pub fn validate(&self, var: &HgvsVariant) -> Result<bool, ForgeError> {
        match var {
            HgvsVariant::Genome(v) => {
                self.validate_genomic(&v.accession.full(), &v.pos_edit)
            }
            HgvsVariant::Mt(v) => self.validate_genomic(&v.accession.full(), &v.pos_edit),
            HgvsVariant::Cds(v) => {
                let Some(loc) = &v.pos_edit.loc else {
                    return Ok(true);
                };
                if loc.has_intronic() {
                    return Ok(true);
                }
                let tm = TranscriptMapper::new(
                    self.provider.get_transcript(&v.accession.full(), None)?,
                )?;
                let n_start = tm.c_to_n(loc.start.base.to_index(), loc.start.anchor)?;
                let n_end = tm.c_to_n(
                    loc.end_or_start().base.to_index(),
                    loc.end_or_start().anchor,
                )?;
                self.check_stated_reference(
                    &v.accession.full(),
                    IdentifierType::TranscriptAccession,
                    n_start.value(),
                    n_end.value() + 1,
                    v.pos_edit.edit.inner(),
                )
            }
            _ => Ok(true),
        }
    }

    fn validate_genomic(
        &self,
        ac: &str,
        pos_edit: &PosEdit<GenomeInterval, NaEdit>,
    ) -> Result<bool, ForgeError> {
        let Some(loc) = &pos_edit.loc else {
            return Ok(true);
        };
        let start = loc.start.to_index().value();
        let end = loc.end_or_start().to_index().value() + 1;
        self.check_stated_reference(
            ac,
            IdentifierType::GenomicAccession,
            start,
            end,
            pos_edit.edit.inner(),
        )
    }

    fn check_stated_reference(
        &self,
        ac: &str,
        kind: IdentifierType,
        start: i64,
        end: i64,
        edit: &NaEdit,
    ) -> Result<bool, ForgeError> {
        let stated = match edit {
            NaEdit::Substitution { reference, .. } => reference.to_string(),
            NaEdit::Deletion {
                sequence: Some(s), ..
            }
            | NaEdit::Duplication {
                sequence: Some(s), ..
            } => s.to_string(),
            _ => return Ok(true),
        };
        let actual = self.provider.get_seq(ac, start, end, kind)?;
        Ok(stated == actual)
    }

    /// Convert a variant to SPDI on the genomic axis, normalizing first.
    ///
    /// With `unambiguous`, the span is expanded over the whole ambiguous
    /// region so the representation is independent of shifting convention.
    pub fn to_spdi(
        &self,
        var: &HgvsVariant,
        unambiguous: bool,
    ) -> Result<SpdiVariant, ForgeError> {
        let var_g = match var {
            HgvsVariant::Genome(v) => v.clone(),
            HgvsVariant::Mt(v) => GenomeVariant {
                accession: v.accession.clone(),
                reference: v.reference.clone(),
                gene_symbol: v.gene_symbol.clone(),
                pos_edit: v.pos_edit.clone(),
            },
            HgvsVariant::Cds(v) => self.c_to_g(v, None)?,
            HgvsVariant::Tx(v) => self.n_to_g(v, None)?,
            _ => {
                return Err(ForgeError::Unsupported(
                    "SPDI is defined for nucleic-acid variants only".into(),
                ))
            }
        };

        let normalizer = Normalizer::new(self.provider);
        let normalized = normalizer.normalize(&HgvsVariant::Genome(var_g))?;
        let HgvsVariant::Genome(var_g) = normalized else {
            unreachable!("normalization preserves the variant kind");
        };

        let ac = var_g.accession.full();
        let loc = require_loc(&var_g.pos_edit.loc, "genomic")?;
        let edit = var_g.pos_edit.edit.inner();
        let kind = IdentifierType::GenomicAccession;

        let (start, end) = if edit.is_insertion() {
            let gap = loc.end_or_start().to_index().value();
            (gap, gap)
        } else {
            (
                loc.start.to_index().value(),
                loc.end_or_start().to_index().value() + 1,
            )
        };

        let span_seq = |s: i64, e: i64| self.provider.get_seq(&ac, s, e, kind);

        if unambiguous {
            let (u_start, u_end) =
                normalizer.expand_unambiguous(&ac, kind, start, end, edit)?;
            let r_seq = span_seq(u_start, u_end)?;
            let rel_start = (start - u_start) as usize;
            let rel_end = (end - u_start) as usize;
            let alt = self.edit_alt_string(&ac, kind, start, end, edit)?;
            let a_seq = format!("{}{}{}", &r_seq[..rel_start], alt, &r_seq[rel_end..]);
            return Ok(SpdiVariant::new(ac, u_start, r_seq, a_seq));
        }

        let deletion = span_seq(start, end)?;
        let insertion = self.edit_alt_string(&ac, kind, start, end, edit)?;
        Ok(SpdiVariant::new(ac, start, deletion, insertion))
    }

    /// The alternate allele over `[start, end)` produced by an edit.
    fn edit_alt_string(
        &self,
        ac: &str,
        kind: IdentifierType,
        start: i64,
        end: i64,
        edit: &NaEdit,
    ) -> Result<String, ForgeError> {
        Ok(match edit {
            NaEdit::Substitution { alternative, .. } => alternative.to_string(),
            NaEdit::Deletion { .. } => String::new(),
            NaEdit::Insertion { sequence } => sequence.to_string(),
            NaEdit::Duplication { .. } => {
                let span = self.provider.get_seq(ac, start, end, kind)?;
                format!("{}{}", span, span)
            }
            NaEdit::Delins { sequence } => sequence.to_string(),
            NaEdit::Repeat { unit, max, .. } => {
                let unit = match unit {
                    Some(u) => u.to_string(),
                    None => self.provider.get_seq(ac, start, end, kind)?,
                };
                unit.repeat(*max as usize)
            }
            NaEdit::Inversion { .. } => {
                let span = self.provider.get_seq(ac, start, end, kind)?;
                crate::sequence::reverse_complement(&span)
            }
            NaEdit::Identity => self.provider.get_seq(ac, start, end, kind)?,
            NaEdit::Unknown => {
                return Err(ForgeError::Unsupported(
                    "unknown edits have no SPDI form".into(),
                ))
            }
        })
    }
}

fn require_loc<'l, L>(loc: &'l Option<L>, what: &str) -> Result<&'l L, ForgeError> {
    loc.as_ref()
        .ok_or_else(|| ForgeError::Mapping(format!("missing {} position", what)))
}

/// Ordering key for transcript positions: anchor-resolved base, then offset.
fn tx_key(pos: &TxPos) -> (i64, i64, i64) {
    let anchor_rank = match pos.anchor {
        crate::coords::CdsAnchor::TranscriptStart => 0,
        crate::coords::CdsAnchor::CdsStart => 0,
        crate::coords::CdsAnchor::CdsEnd => 1,
    };
    (
        anchor_rank,
        pos.base.to_index().value(),
        pos.offset.map(|o| o.value()).unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hgvs::parser::parse_hgvs;
    use crate::reference::MockProvider;

    fn mapper_fixture() -> MockProvider {
        MockProvider::with_test_data()
    }

    fn as_cds(var: &HgvsVariant) -> &CdsVariant {
        var.as_cds().expect("expected c. variant")
    }

    fn as_genome(var: &HgvsVariant) -> &GenomeVariant {
        var.as_genome().expect("expected g. variant")
    }

    #[test]
    fn test_c_to_g_plus_strand() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        // c.1 is n.3 (two-base UTR), genomic offset 5000 -> g.5003
        let var = parse_hgvs("NM_000051.3:c.1A>G").unwrap();
        let g = mapper.c_to_g(as_cds(&var), None).unwrap();
        assert_eq!(g.to_string(), "NC_000011.10:g.5003A>G");
    }

    #[test]
    fn test_c_to_g_utr_positions() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);

        let var = parse_hgvs("NM_000051.3:c.-1G>T").unwrap();
        let g = mapper.c_to_g(as_cds(&var), None).unwrap();
        assert_eq!(g.to_string(), "NC_000011.10:g.5002G>T");

        let var = parse_hgvs("NM_000051.3:c.*1T>C").unwrap();
        let g = mapper.c_to_g(as_cds(&var), None).unwrap();
        assert_eq!(g.to_string(), "NC_000011.10:g.5186T>C");
    }

    #[test]
    fn test_g_to_c_roundtrip() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        for input in [
            "NM_000051.3:c.1A>G",
            "NM_000051.3:c.-1G>T",
            "NM_000051.3:c.*1T>C",
            "NM_000051.3:c.4_6del",
        ] {
            let var = parse_hgvs(input).unwrap();
            let g = mapper.c_to_g(as_cds(&var), None).unwrap();
            let back = mapper.g_to_c(&g, "NM_000051.3").unwrap();
            assert_eq!(back.to_string(), input, "roundtrip of {}", input);
        }
    }

    #[test]
    fn test_minus_strand_revcomp_and_swap() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);

        // Single exon over g.1001-1100, minus strand: c.35_36insT becomes
        // an insA at the swapped genomic interval
        let var = parse_hgvs("NM_999999.1:c.35_36insT").unwrap();
        let g = mapper.c_to_g(as_cds(&var), None).unwrap();
        assert_eq!(g.to_string(), "NC_MINUS.1:g.1065_1066insA");

        // And back
        let back = mapper.g_to_c(&g, "NM_999999.1").unwrap();
        assert_eq!(back.to_string(), "NM_999999.1:c.35_36insT");
    }

    #[test]
    fn test_g_to_c_all() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        let var = parse_hgvs("NC_000011.10:g.5003C>G").unwrap();
        let all = mapper.g_to_c_all(as_genome(&var), &provider).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].accession.full(), "NM_000051.3");
    }

    #[test]
    fn test_c_to_p_missense() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        // Codon 41 is AAA (Lys); the middle base swap gives AGA (Arg)
        let var = parse_hgvs("NM_000051.3:c.122A>G").unwrap();
        let p = mapper.c_to_p(as_cds(&var), None).unwrap();
        assert_eq!(p.to_string(), "NP_000042.3:p.(Lys41Arg)");
    }

    #[test]
    fn test_c_to_p_synonymous() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        // Third-base AAA>AAG keeps Lys
        let var = parse_hgvs("NM_000051.3:c.123A>G").unwrap();
        let p = mapper.c_to_p(as_cds(&var), None).unwrap();
        assert_eq!(p.to_string(), "NP_000042.3:p.(Lys41=)");
    }

    #[test]
    fn test_c_to_p_nonsense() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        // Codon 2 AAA -> TAA
        let var = parse_hgvs("NM_000051.3:c.4A>T").unwrap();
        let p = mapper.c_to_p(as_cds(&var), None).unwrap();
        assert_eq!(p.to_string(), "NP_000042.3:p.(Lys2Ter)");
    }

    #[test]
    fn test_c_to_p_in_frame_deletion() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        // Deleting one AAA codon from the poly-Lys tract: reported at the
        // 3'-most equivalent residue, as a deletion rather than a stop
        let var = parse_hgvs("NM_000051.3:c.4_6del").unwrap();
        let p = mapper.c_to_p(as_cds(&var), None).unwrap();
        assert_eq!(p.to_string(), "NP_000042.3:p.(Lys60del)");
    }

    #[test]
    fn test_c_to_p_frameshift() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        let var = parse_hgvs("NM_000051.3:c.4del").unwrap();
        let p = mapper.c_to_p(as_cds(&var), None).unwrap();
        assert!(p.to_string().contains("fs"), "got {}", p);
    }

    #[test]
    fn test_c_to_p_extension() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        // c.181T>G turns the TAA stop into GAA (Glu); no stop remains
        // before the transcript end
        let var = parse_hgvs("NM_000051.3:c.181T>G").unwrap();
        let p = mapper.c_to_p(as_cds(&var), None).unwrap();
        assert_eq!(p.to_string(), "NP_000042.3:p.(Ter61Gluext*?)");
    }

    #[test]
    fn test_c_to_p_ref_mismatch() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        // c.122 is A, not C
        let var = parse_hgvs("NM_000051.3:c.122C>G").unwrap();
        let err = mapper.c_to_p(as_cds(&var), None).unwrap_err();
        assert!(matches!(err, ForgeError::ReferenceMismatch { .. }));
    }

    #[test]
    fn test_validate() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        let good = parse_hgvs("NM_000051.3:c.122A>G").unwrap();
        assert!(mapper.validate(&good).unwrap());
        let bad = parse_hgvs("NM_000051.3:c.122C>G").unwrap();
        assert!(!mapper.validate(&bad).unwrap());
    }

    #[test]
    fn test_to_spdi_substitution() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        let var = parse_hgvs("NM_000051.3:c.1A>G").unwrap();
        let spdi = mapper.to_spdi(&var, false).unwrap();
        assert_eq!(spdi.to_string(), "NC_000011.10:5002:A:G");
    }

    #[test]
    fn test_to_spdi_unambiguous_expands_run() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        // g.4_5del in the TTTTT run (0-based 3..8)
        let var = parse_hgvs("NC_RUN.1:g.4_5del").unwrap();
        let spdi = mapper.to_spdi(&var, true).unwrap();
        assert_eq!(spdi.sequence, "NC_RUN.1");
        assert_eq!(spdi.position, 3);
        assert_eq!(spdi.deletion, "TTTTT");
        assert_eq!(spdi.insertion, "TTT");
    }

    #[test]
    fn test_missing_transcript_is_not_found() {
        let provider = mapper_fixture();
        let mapper = VariantMapper::new(&provider);
        let var = parse_hgvs("NM_404404.1:c.1A>G").unwrap();
        let err = mapper.c_to_g(as_cds(&var), None).unwrap_err();
        assert!(err.is_data_gap());
    }
}
