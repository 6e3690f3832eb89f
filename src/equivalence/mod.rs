//! Biological equivalence between variant descriptions
//!
//! [`VariantEquivalence::compare`] decides whether two descriptions denote
//! the same event, across heterogeneous coordinate pairings. The verdict is
//! four-valued: exact-notation identity, biological analogy, genuine
//! difference, or unknown when the required reference data is missing.

mod project;

use crate::error::ForgeError;
use crate::hgvs::edit::NaEdit;
use crate::hgvs::location::{GenomeInterval, ProtInterval};
use crate::hgvs::variant::{
    CdsVariant, GenomeVariant, HgvsVariant, ProteinVariant, TxVariant,
};
use crate::convert::VariantMapper;
use crate::normalize::Normalizer;
use crate::reference::{DataProvider, IdentifierKind, IdentifierType, TranscriptSearch};
use crate::sequence::{Base, Sequence};
use log::debug;
use project::{project_aa_variant, project_na_variant, SparseReference};

/// Verdict of an equivalence comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquivalenceLevel {
    /// Identical notation after basic normalization
    Identity,
    /// Biologically the same event in different notation (e.g. ins vs dup)
    Analogous,
    /// Definitively different events
    Different,
    /// Reference data needed for the comparison is unavailable
    Unknown,
}

impl EquivalenceLevel {
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Self::Identity | Self::Analogous)
    }
}

/// Window padding (in bases/residues) around the edits when projecting.
const PROJECTION_PAD: i64 = 2;

/// Decides equivalence of two variants against a data provider.
pub struct VariantEquivalence<'a> {
    provider: &'a dyn DataProvider,
    searcher: &'a dyn TranscriptSearch,
    mapper: VariantMapper<'a>,
    normalizer: Normalizer<'a>,
}

impl<'a> VariantEquivalence<'a> {
    pub fn new(provider: &'a dyn DataProvider, searcher: &'a dyn TranscriptSearch) -> Self {
        Self {
            provider,
            searcher,
            mapper: VariantMapper::new(provider),
            normalizer: Normalizer::new(provider),
        }
    }

    /// True if the variants are Identity- or Analogous-equivalent.
    pub fn equivalent(
        &self,
        a: &HgvsVariant,
        b: &HgvsVariant,
    ) -> Result<bool, ForgeError> {
        Ok(self.compare(a, b)?.is_equivalent())
    }

    /// Compare two variants, expanding gene-symbol accessions first.
    ///
    /// Expansion produces a candidate set per side; the comparison succeeds
    /// if any pair of candidates is equivalent. Data gaps in a single pair
    /// degrade the verdict to `Unknown` rather than failing the call.
    pub fn compare(
        &self,
        a: &HgvsVariant,
        b: &HgvsVariant,
    ) -> Result<EquivalenceLevel, ForgeError> {
        let left = self.expand_if_symbol(a)?;
        let right = self.expand_if_symbol(b)?;

        let mut saw_unknown = false;
        for v1 in &left {
            for v2 in &right {
                match self.compare_single(v1, v2) {
                    Ok(level) if level.is_equivalent() => return Ok(level),
                    Ok(EquivalenceLevel::Unknown) => saw_unknown = true,
                    Ok(_) => {}
                    Err(e) if e.is_data_gap() => {
                        debug!("comparison pair degraded to Unknown: {}", e);
                        saw_unknown = true;
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(if saw_unknown {
            EquivalenceLevel::Unknown
        } else {
            EquivalenceLevel::Different
        })
    }

    fn compare_single(
        &self,
        a: &HgvsVariant,
        b: &HgvsVariant,
    ) -> Result<EquivalenceLevel, ForgeError> {
        if a.to_string() == b.to_string() {
            return Ok(EquivalenceLevel::Identity);
        }

        let a = canonical_axis(a);
        let b = canonical_axis(b);

        use HgvsVariant::*;
        match (&a, &b) {
            (Genome(v1), Genome(v2)) => self.g_vs_g(v1, v2),
            (Cds(v1), Cds(v2)) => {
                let g1 = self.mapper.c_to_g(v1, None)?;
                let g2 = self.mapper.c_to_g(v2, None)?;
                self.g_vs_g(&g1, &g2)
            }
            (Tx(v1), Tx(v2)) => {
                let g1 = self.mapper.n_to_g(v1, None)?;
                let g2 = self.mapper.n_to_g(v2, None)?;
                self.g_vs_g(&g1, &g2)
            }
            (Genome(vg), Cds(vc)) | (Cds(vc), Genome(vg)) => {
                let reference_ac = vg.accession.full();
                let g2 = self.mapper.c_to_g(vc, Some(&reference_ac))?;
                if vg.to_string() == g2.to_string() {
                    return Ok(EquivalenceLevel::Identity);
                }
                self.g_vs_g(vg, &g2).map(demote_identity)
            }
            (Genome(vg), Tx(vn)) | (Tx(vn), Genome(vg)) => {
                let reference_ac = vg.accession.full();
                let g2 = self.mapper.n_to_g(vn, Some(&reference_ac))?;
                if vg.to_string() == g2.to_string() {
                    return Ok(EquivalenceLevel::Identity);
                }
                self.g_vs_g(vg, &g2).map(demote_identity)
            }
            (Cds(vc), Tx(vn)) | (Tx(vn), Cds(vc)) => {
                let g1 = self.mapper.c_to_g(vc, None)?;
                let g2 = self.mapper.n_to_g(vn, None)?;
                self.g_vs_g(&g1, &g2).map(demote_identity)
            }
            (Cds(vc), Protein(vp)) | (Protein(vp), Cds(vc)) => self.c_vs_p(vc, vp),
            (Genome(vg), Protein(vp)) | (Protein(vp), Genome(vg)) => self.g_vs_p(vg, vp),
            (Tx(vn), Protein(vp)) | (Protein(vp), Tx(vn)) => {
                let vg = self.mapper.n_to_g(vn, None)?;
                self.g_vs_p(&vg, vp)
            }
            (Protein(v1), Protein(v2)) => self.p_vs_p(v1, v2),
            // Remaining pairings (post-canonicalization there are none with
            // distinct axes) fall back to notation equality, which already
            // failed above
            _ => Ok(EquivalenceLevel::Different),
        }
    }

    /// Same-axis genomic comparison: normalize, fill implicit sequences,
    /// rewrite insertions as duplications, compare; disagreement falls
    /// through to windowed projection.
    fn g_vs_g(
        &self,
        v1: &GenomeVariant,
        v2: &GenomeVariant,
    ) -> Result<EquivalenceLevel, ForgeError> {
        if v1.accession.full() != v2.accession.full() {
            return Ok(EquivalenceLevel::Different);
        }

        let n1 = self.canonical_genomic(v1)?;
        let n2 = self.canonical_genomic(v2)?;
        if normalize_notation(&n1.to_string()) == normalize_notation(&n2.to_string()) {
            return Ok(EquivalenceLevel::Analogous);
        }

        // Projection over a shared window
        let (Some(loc1), Some(loc2)) = (&n1.pos_edit.loc, &n2.pos_edit.loc) else {
            return Ok(EquivalenceLevel::Different);
        };
        let (s1, e1) = genome_edit_span(loc1, n1.pos_edit.edit.inner());
        let (s2, e2) = genome_edit_span(loc2, n2.pos_edit.edit.inner());
        let view_start = (s1.min(s2) - PROJECTION_PAD).max(0);
        let view_end = e1.max(e2) + PROJECTION_PAD;

        let mut sref = SparseReference::new();
        match self.provider.get_seq(
            &n1.accession.full(),
            view_start,
            view_end + 1,
            IdentifierType::GenomicAccession,
        ) {
            Ok(seq) => {
                if sref.set_str(view_start, &seq).is_err() {
                    return Ok(EquivalenceLevel::Different);
                }
            }
            Err(e) if e.is_data_gap() => {
                debug!("projection window unavailable: {}", e);
            }
            Err(e) => return Err(e),
        }

        let p1 = project_na_variant(
            n1.pos_edit.edit.inner(),
            s1,
            e1,
            view_start,
            view_end,
            &sref,
        );
        let p2 = project_na_variant(
            n2.pos_edit.edit.inner(),
            s2,
            e2,
            view_start,
            view_end,
            &sref,
        );

        if p1.is_analogous_to(&p2) {
            Ok(EquivalenceLevel::Analogous)
        } else {
            Ok(EquivalenceLevel::Different)
        }
    }

    /// Normalize and make implicit sequences explicit; rewrite an insertion
    /// that duplicates the preceding reference into `dup` notation.
    fn canonical_genomic(&self, v: &GenomeVariant) -> Result<GenomeVariant, ForgeError> {
        let normalized = self
            .normalizer
            .normalize(&HgvsVariant::Genome(v.clone()))?;
        let HgvsVariant::Genome(mut v) = normalized else {
            unreachable!("normalization preserves the variant kind");
        };

        let ac = v.accession.full();
        let Some(loc) = v.pos_edit.loc else {
            return Ok(v);
        };
        let kind = IdentifierType::GenomicAccession;

        let edit = v.pos_edit.edit.inner().clone();
        let (new_loc, new_edit) = match &edit {
            NaEdit::Deletion {
                sequence: None,
                length,
            } => {
                let span = self.provider.get_seq(
                    &ac,
                    loc.start.to_index().value(),
                    loc.end_or_start().to_index().value() + 1,
                    kind,
                )?;
                (
                    loc,
                    NaEdit::Deletion {
                        sequence: Some(span.parse()?),
                        length: *length,
                    },
                )
            }
            NaEdit::Duplication {
                sequence: None,
                length,
            } => {
                let span = self.provider.get_seq(
                    &ac,
                    loc.start.to_index().value(),
                    loc.end_or_start().to_index().value() + 1,
                    kind,
                )?;
                (
                    loc,
                    NaEdit::Duplication {
                        sequence: Some(span.parse()?),
                        length: *length,
                    },
                )
            }
            NaEdit::Insertion { sequence } => {
                let gap = loc.end_or_start().to_index().value();
                let len = sequence.len() as i64;
                let check_start = gap - len;
                if check_start >= 0 {
                    let preceding =
                        self.provider.get_seq(&ac, check_start, gap, kind)?;
                    if preceding == sequence.to_string() {
                        let interval = if len == 1 {
                            GenomeInterval::point(
                                crate::coords::GenomicPos::new(check_start).to_hgvs(),
                            )
                        } else {
                            GenomeInterval::range(
                                crate::coords::GenomicPos::new(check_start).to_hgvs(),
                                crate::coords::GenomicPos::new(gap - 1).to_hgvs(),
                            )
                        };
                        (
                            interval,
                            NaEdit::Duplication {
                                sequence: Some(sequence.clone()),
                                length: None,
                            },
                        )
                    } else {
                        (loc, edit.clone())
                    }
                } else {
                    (loc, edit.clone())
                }
            }
            other => (loc, other.clone()),
        };

        v.pos_edit.loc = Some(new_loc);
        v.pos_edit.edit = v.pos_edit.edit.rewrap(new_edit);
        Ok(v)
    }

    fn c_vs_p(
        &self,
        vc: &CdsVariant,
        vp: &ProteinVariant,
    ) -> Result<EquivalenceLevel, ForgeError> {
        let generated = self.mapper.c_to_p(vc, Some(&vp.accession.full()))?;
        if generated.to_string() == vp.to_string() {
            return Ok(EquivalenceLevel::Identity);
        }
        if normalize_notation(&generated.to_string()) == normalize_notation(&vp.to_string()) {
            return Ok(EquivalenceLevel::Analogous);
        }
        self.p_vs_p(&generated, vp)
    }

    fn g_vs_p(
        &self,
        vg: &GenomeVariant,
        vp: &ProteinVariant,
    ) -> Result<EquivalenceLevel, ForgeError> {
        let candidates = self.mapper.g_to_c_all(vg, self.searcher)?;
        if candidates.is_empty() {
            return Ok(EquivalenceLevel::Unknown);
        }
        let mut best = EquivalenceLevel::Different;
        for vc in &candidates {
            match self.c_vs_p(vc, vp)? {
                EquivalenceLevel::Identity => return Ok(EquivalenceLevel::Identity),
                EquivalenceLevel::Analogous => best = EquivalenceLevel::Analogous,
                EquivalenceLevel::Unknown if best == EquivalenceLevel::Different => {
                    best = EquivalenceLevel::Unknown
                }
                _ => {}
            }
        }
        Ok(best)
    }

    fn p_vs_p(
        &self,
        v1: &ProteinVariant,
        v2: &ProteinVariant,
    ) -> Result<EquivalenceLevel, ForgeError> {
        if v1.accession.full() != v2.accession.full() {
            return Ok(EquivalenceLevel::Different);
        }

        if normalize_notation(&v1.to_string()) == normalize_notation(&v2.to_string()) {
            // Same description modulo alphabet; bracket state decides the
            // verdict strength
            return Ok(
                if v1.pos_edit.is_predicted() == v2.pos_edit.is_predicted() {
                    EquivalenceLevel::Identity
                } else {
                    EquivalenceLevel::Analogous
                },
            );
        }

        // Synthesize a span for a whole-protein identity facing a located
        // variant
        let (span1, span2) = match (
            protein_span(v1),
            protein_span(v2),
        ) {
            (Some(s1), Some(s2)) => (s1, s2),
            (Some(s1), None) if v2.pos_edit.edit.inner().is_identity() => (s1, s1),
            (None, Some(s2)) if v1.pos_edit.edit.inner().is_identity() => (s2, s2),
            _ => return Ok(EquivalenceLevel::Different),
        };

        let view_start = (span1.0.min(span2.0) - PROJECTION_PAD).max(0);
        let view_end = span1.1.max(span2.1) + PROJECTION_PAD;

        let mut sref = SparseReference::new();
        match self.provider.get_seq(
            &v1.accession.full(),
            0,
            -1,
            IdentifierType::ProteinAccession,
        ) {
            Ok(seq) => {
                if sref.set_str(0, &seq).is_err() {
                    return Ok(EquivalenceLevel::Different);
                }
            }
            Err(e) if e.is_data_gap() => {
                debug!("protein sequence unavailable, unifying blind: {}", e)
            }
            Err(e) => return Err(e),
        }
        // Residues the descriptions themselves assert about the reference
        for v in [v1, v2] {
            if seed_from_interval(&mut sref, &v.pos_edit.loc).is_err() {
                return Ok(EquivalenceLevel::Different);
            }
        }

        let p1 = project_aa_variant(
            v1.pos_edit.edit.inner(),
            span1.0,
            span1.1,
            view_start,
            view_end,
            &sref,
        )
        .trim_at_stop();
        let p2 = project_aa_variant(
            v2.pos_edit.edit.inner(),
            span2.0,
            span2.1,
            view_start,
            view_end,
            &sref,
        )
        .trim_at_stop();

        if p1.is_analogous_to(&p2) {
            Ok(EquivalenceLevel::Analogous)
        } else {
            Ok(EquivalenceLevel::Different)
        }
    }

    /// Resolve a gene-symbol accession into concrete accessions compatible
    /// with the variant's coordinate kind.
    fn expand_if_symbol(
        &self,
        var: &HgvsVariant,
    ) -> Result<Vec<HgvsVariant>, ForgeError> {
        let accession = var.accession();
        let id_type = match self.provider.get_identifier_type(&accession.full()) {
            Ok(t) => t,
            Err(e) if e.is_data_gap() => return Ok(vec![var.clone()]),
            Err(e) => return Err(e),
        };
        if id_type != IdentifierType::GeneSymbol {
            return Ok(vec![var.clone()]);
        }

        let target_kind = match var {
            HgvsVariant::Protein(_) => IdentifierKind::Protein,
            HgvsVariant::Cds(_) | HgvsVariant::Tx(_) | HgvsVariant::Rna(_) => {
                IdentifierKind::Transcript
            }
            HgvsVariant::Genome(_) | HgvsVariant::Mt(_) => IdentifierKind::Genomic,
        };

        let accessions = self.provider.get_symbol_accessions(
            &accession.full(),
            IdentifierKind::Genomic,
            target_kind,
        )?;

        let expanded: Vec<HgvsVariant> = accessions
            .into_iter()
            .filter(|(acc_type, _)| kind_compatible(var, *acc_type))
            .map(|(_, ac)| {
                var.with_accession(crate::hgvs::variant::Accession::from_full(&ac))
            })
            .collect();

        if expanded.is_empty() {
            Ok(vec![var.clone()])
        } else {
            Ok(expanded)
        }
    }
}

/// An accession type is compatible with a variant kind when the coordinate
/// axes agree. Genomic variants additionally accept transcript accessions
/// (a `g.` on a transcript sequence is well-formed).
fn kind_compatible(var: &HgvsVariant, acc_type: IdentifierType) -> bool {
    matches!(
        (var, acc_type),
        (HgvsVariant::Protein(_), IdentifierType::ProteinAccession)
            | (
                HgvsVariant::Cds(_) | HgvsVariant::Tx(_) | HgvsVariant::Rna(_),
                IdentifierType::TranscriptAccession
            )
            | (
                HgvsVariant::Genome(_) | HgvsVariant::Mt(_),
                IdentifierType::GenomicAccession
            )
            | (HgvsVariant::Genome(_), IdentifierType::TranscriptAccession)
    )
}

/// Identity from a same-axis comparison is meaningful; once a variant has
/// been projected across axes, agreement is analogy.
fn demote_identity(level: EquivalenceLevel) -> EquivalenceLevel {
    match level {
        EquivalenceLevel::Identity => EquivalenceLevel::Analogous,
        other => other,
    }
}

/// Fold `m.` onto the genomic axis and `r.` onto the transcript axis (with
/// the RNA alphabet rewritten as DNA) so the dispatch table stays small.
fn canonical_axis(var: &HgvsVariant) -> HgvsVariant {
    match var {
        HgvsVariant::Mt(v) => HgvsVariant::Genome(GenomeVariant {
            accession: v.accession.clone(),
            reference: v.reference.clone(),
            gene_symbol: v.gene_symbol.clone(),
            pos_edit: v.pos_edit.clone(),
        }),
        HgvsVariant::Rna(v) => {
            let edit = v.pos_edit.edit.inner().map_sequence(|s| {
                Sequence(
                    s.0.iter()
                        .map(|b| if *b == Base::U { Base::T } else { *b })
                        .collect(),
                )
            });
            HgvsVariant::Tx(TxVariant {
                accession: v.accession.clone(),
                reference: v.reference.clone(),
                gene_symbol: v.gene_symbol.clone(),
                pos_edit: crate::hgvs::variant::PosEdit {
                    loc: v.pos_edit.loc,
                    edit: v.pos_edit.edit.rewrap(edit),
                },
            })
        }
        other => other.clone(),
    }
}

/// 0-based inclusive edited span; insertions yield their flanking pair.
fn genome_edit_span(loc: &GenomeInterval, edit: &NaEdit) -> (i64, i64) {
    if edit.is_insertion() {
        let second = loc.end_or_start().to_index().value();
        (second - 1, second)
    } else {
        (
            loc.start.to_index().value(),
            loc.end_or_start().to_index().value(),
        )
    }
}

/// 0-based inclusive residue span of a protein variant, extending repeats
/// to at least one unit length.
fn protein_span(v: &ProteinVariant) -> Option<(i64, i64)> {
    let loc = v.pos_edit.loc.as_ref()?;
    let start = loc.start.base.to_index().value();
    let mut end = loc.end_or_start().base.to_index().value();
    if let crate::hgvs::edit::ProteinEdit::Repeat {
        unit: Some(unit), ..
    } = v.pos_edit.edit.inner()
    {
        let len = unit.len() as i64;
        if end - start + 1 < len {
            end = start + len - 1;
        }
    }
    Some((start, end))
}

/// Record the residues a protein interval asserts about the reference.
fn seed_from_interval(
    sref: &mut SparseReference,
    loc: &Option<ProtInterval>,
) -> Result<(), ()> {
    let Some(loc) = loc else { return Ok(()) };
    for pos in [Some(loc.start), loc.end].into_iter().flatten() {
        if let Some(aa) = pos.aa {
            if aa != crate::sequence::Residue::Xaa {
                sref.set(pos.base.to_index().value(), aa.code1())?;
            }
        }
    }
    Ok(())
}

/// Strip brackets and fold amino-acid names to one-letter codes so notation
/// variants of the same description compare equal.
fn normalize_notation(s: &str) -> String {
    let mut s = s.replace(['(', ')'], "");
    for (from, to) in [
        ("Ala", "A"),
        ("Arg", "R"),
        ("Asn", "N"),
        ("Asp", "D"),
        ("Cys", "C"),
        ("Gln", "Q"),
        ("Glu", "E"),
        ("Gly", "G"),
        ("His", "H"),
        ("Ile", "I"),
        ("Leu", "L"),
        ("Lys", "K"),
        ("Met", "M"),
        ("Phe", "F"),
        ("Pro", "P"),
        ("Sec", "U"),
        ("Ser", "S"),
        ("Thr", "T"),
        ("Trp", "W"),
        ("Tyr", "Y"),
        ("Val", "V"),
        ("Xaa", "X"),
        ("Ter", "*"),
    ] {
        s = s.replace(from, to);
    }
    s
}
