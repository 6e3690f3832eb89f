//! Protein consequence classification
//!
//! Diffs the reference and edited translations and emits the minimal `p.`
//! description: synonymous, missense, nonsense, in-frame del/ins/dup/delins,
//! frameshift, or stop-loss extension.
//!
//! The prefix scan advances through every matching residue before the first
//! difference, so duplications and deletions inside homopolymeric runs come
//! out at their 3'-most position without a separate shifting pass.

use crate::coords::HgvsProteinPos;
use crate::error::ForgeError;
use crate::hgvs::edit::{ProteinEdit, TerDistance};
use crate::hgvs::location::{ProtInterval, ProtPos};
use crate::hgvs::variant::{Accession, PosEdit, ProteinVariant};
use crate::sequence::{AaSequence, Residue};

/// Inputs for the diff: both translations plus enough edit context to
/// disambiguate a trimmed C-terminal stop.
pub(crate) struct ProteinDiff<'a> {
    pub protein_ac: &'a str,
    /// Reference translation, one-letter, ending in `*` if a stop was reached
    pub ref_aa: &'a str,
    /// Edited translation
    pub alt_aa: &'a str,
    /// 0-based codon index of the first codon the edit touches
    pub variant_start_aa: usize,
    /// 0-based CDS-relative index of the last edited base
    pub variant_end_cds: i64,
    /// Codon index of the reference stop
    pub official_stop_idx: i64,
    pub is_frameshift: bool,
    /// True for substitution/delins/insertion edits, which can create a new
    /// stop that the tail alignment would otherwise attribute to the
    /// original one. Deletions and duplications keep the original stop.
    pub may_introduce_stop: bool,
    /// False when the edit lies entirely outside the CDS
    pub cds_overlap: bool,
}

pub(crate) fn build_protein_variant(diff: &ProteinDiff) -> Result<ProteinVariant, ForgeError> {
    let ref_chars: Vec<char> = diff.ref_aa.chars().collect();
    let alt_chars: Vec<char> = diff.alt_aa.chars().collect();

    if diff.ref_aa == diff.alt_aa {
        return Ok(identity_variant(diff, &ref_chars));
    }

    // First differing residue, starting no earlier than the edited codon
    let mut start = diff.variant_start_aa.min(ref_chars.len());
    while start < ref_chars.len()
        && start < alt_chars.len()
        && ref_chars[start] == alt_chars[start]
    {
        start += 1;
    }

    // Differences entirely past the reference stop are 3' UTR noise
    if start as i64 > diff.official_stop_idx {
        return Ok(whole_identity(diff));
    }

    if diff.is_frameshift {
        return frameshift_variant(diff, &ref_chars, &alt_chars, start);
    }

    // Trim the common C-terminal tail
    let mut ref_end = ref_chars.len();
    let mut alt_end = alt_chars.len();
    while ref_end > start && alt_end > start && ref_chars[ref_end - 1] == alt_chars[alt_end - 1]
    {
        ref_end -= 1;
        alt_end -= 1;
    }

    // A tail match consisting only of the stop codon is ambiguous: the stop
    // may be the original one (deletion slid it leftward) or a new one the
    // edit introduced. Only the edits flagged `may_introduce_stop` are
    // reclassified; the affected reference span is then re-derived from the
    // edited CDS span.
    let tail_len = alt_chars.len() - alt_end;
    if tail_len == 1
        && alt_chars.last() == Some(&'*')
        && diff.may_introduce_stop
        && !(ref_end - start == 1 && alt_end - start == 1)
    {
        alt_end += 1;
        let end_codon = (diff.variant_end_cds.max(0) / 3) as usize;
        ref_end = (end_codon + 1).max(start).min(ref_chars.len());
    }

    // Stop-loss: the reference stop itself changed
    if ref_chars.get(start) == Some(&'*') {
        return extension_variant(diff, &alt_chars, start);
    }

    let del: Vec<Residue> = ref_chars[start..ref_end]
        .iter()
        .map(|&c| residue(c))
        .collect();
    let ins: Vec<Residue> = alt_chars[start..alt_end]
        .iter()
        .map(|&c| residue(c))
        .collect();

    // Nonsense: the mismatch block is exactly a new stop
    if ins == [Residue::Ter] && del.len() == 1 {
        return Ok(located_variant(
            diff,
            ProtInterval::point(prot_pos(&ref_chars, start)),
            ProteinEdit::Substitution {
                alternative: Residue::Ter,
            },
        ));
    }

    if del.is_empty() && !ins.is_empty() {
        // Duplication: the inserted block repeats what immediately precedes it
        let k = ins.len();
        if start >= k {
            let prev: Vec<Residue> = ref_chars[start - k..start]
                .iter()
                .map(|&c| residue(c))
                .collect();
            if prev == ins {
                let interval = if k == 1 {
                    ProtInterval::point(prot_pos(&ref_chars, start - 1))
                } else {
                    ProtInterval::range(
                        prot_pos(&ref_chars, start - k),
                        prot_pos(&ref_chars, start - 1),
                    )
                };
                return Ok(located_variant(diff, interval, ProteinEdit::Duplication));
            }
        }
        // Pure insertion between the flanking residues
        if start > 0 && start < ref_chars.len() {
            return Ok(located_variant(
                diff,
                ProtInterval::range(prot_pos(&ref_chars, start - 1), prot_pos(&ref_chars, start)),
                ProteinEdit::Insertion {
                    sequence: AaSequence(ins),
                },
            ));
        }
        // Insertion at the very N terminus has no canonical flank; describe
        // it as a delins over the first residue
        return Ok(located_variant(
            diff,
            ProtInterval::point(prot_pos(&ref_chars, start.min(ref_chars.len() - 1))),
            ProteinEdit::Delins {
                sequence: AaSequence(ins),
            },
        ));
    }

    if del.len() == 1 && ins.len() == 1 {
        return Ok(located_variant(
            diff,
            ProtInterval::point(prot_pos(&ref_chars, start)),
            ProteinEdit::Substitution {
                alternative: ins[0],
            },
        ));
    }

    let interval = if del.len() == 1 {
        ProtInterval::point(prot_pos(&ref_chars, start))
    } else {
        ProtInterval::range(prot_pos(&ref_chars, start), prot_pos(&ref_chars, ref_end - 1))
    };

    if ins.is_empty() {
        Ok(located_variant(diff, interval, ProteinEdit::Deletion))
    } else {
        Ok(located_variant(
            diff,
            interval,
            ProteinEdit::Delins {
                sequence: AaSequence(ins),
            },
        ))
    }
}

fn frameshift_variant(
    diff: &ProteinDiff,
    ref_chars: &[char],
    alt_chars: &[char],
    start: usize,
) -> Result<ProteinVariant, ForgeError> {
    let alt_res = residue(alt_chars.get(start).copied().unwrap_or('X'));

    // A frameshift whose first novel codon is a stop is a nonsense variant
    if alt_res == Residue::Ter {
        return Ok(located_variant(
            diff,
            ProtInterval::point(prot_pos(ref_chars, start)),
            ProteinEdit::Substitution {
                alternative: Residue::Ter,
            },
        ));
    }

    let terminal = alt_chars[start..]
        .iter()
        .position(|&c| c == '*')
        .map(|i| TerDistance::Known(i as u64 + 1))
        .unwrap_or(TerDistance::Unknown);

    Ok(located_variant(
        diff,
        ProtInterval::point(prot_pos(ref_chars, start)),
        ProteinEdit::Frameshift {
            alternative: Some(alt_res),
            terminal: Some(terminal),
        },
    ))
}

fn extension_variant(
    diff: &ProteinDiff,
    alt_chars: &[char],
    start: usize,
) -> Result<ProteinVariant, ForgeError> {
    let alternative = residue(alt_chars.get(start).copied().unwrap_or('X'));

    let mut distance = 0u64;
    let mut found = false;
    for &c in alt_chars.iter().skip(start + 1) {
        distance += 1;
        if c == '*' {
            found = true;
            break;
        }
    }
    let terminal = if found {
        TerDistance::Known(distance)
    } else {
        TerDistance::Unknown
    };

    Ok(located_variant(
        diff,
        ProtInterval::point(ProtPos::new(
            Residue::Ter,
            HgvsProteinPos::new(start as i64 + 1),
        )),
        ProteinEdit::Extension {
            alternative,
            terminal,
        },
    ))
}

fn identity_variant(diff: &ProteinDiff, ref_chars: &[char]) -> ProteinVariant {
    if diff.cds_overlap && diff.variant_start_aa < ref_chars.len() {
        located_variant(
            diff,
            ProtInterval::point(prot_pos(ref_chars, diff.variant_start_aa)),
            ProteinEdit::Identity,
        )
    } else {
        whole_identity(diff)
    }
}

fn whole_identity(diff: &ProteinDiff) -> ProteinVariant {
    ProteinVariant {
        accession: Accession::from_full(diff.protein_ac),
        reference: None,
        gene_symbol: None,
        pos_edit: PosEdit::without_loc(ProteinEdit::Identity),
    }
}

fn located_variant(
    diff: &ProteinDiff,
    interval: ProtInterval,
    edit: ProteinEdit,
) -> ProteinVariant {
    ProteinVariant {
        accession: Accession::from_full(diff.protein_ac),
        reference: None,
        gene_symbol: None,
        pos_edit: PosEdit::new(interval, edit),
    }
}

fn prot_pos(ref_chars: &[char], idx: usize) -> ProtPos {
    ProtPos::new(
        residue(ref_chars.get(idx).copied().unwrap_or('*')),
        HgvsProteinPos::new(idx as i64 + 1),
    )
}

fn residue(c: char) -> Residue {
    Residue::from_code1(c).unwrap_or(Residue::Xaa)
}
