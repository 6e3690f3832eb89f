//! Projection of edits onto a sparse reference, and unification
//!
//! Two variant descriptions are compared by projecting each onto a short
//! window of the (possibly incompletely known) reference and asking whether
//! the resulting token sequences can denote the same final sequence. Unknown
//! reference positions become variables that unification may bind.

use crate::hgvs::edit::{NaEdit, ProteinEdit, TerDistance};
use crate::sequence::Residue;
use std::collections::{BTreeMap, HashMap, HashSet};

/// One position of a projected sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ResidueToken {
    /// A known symbol: one-letter amino acid or uppercase nucleotide
    Known(char),
    /// The (unknown) reference symbol at a specific position
    Unknown(i64),
    /// Matches any single symbol
    Any,
    /// Matches any remaining suffix (open-ended frameshifts)
    Wildcard,
}

impl ResidueToken {
    fn symbol(&self) -> Option<char> {
        match self {
            ResidueToken::Known(c) => Some(*c),
            _ => None,
        }
    }
}

/// A reference sequence known only at some positions.
#[derive(Debug, Default)]
pub(crate) struct SparseReference {
    data: BTreeMap<i64, char>,
}

impl SparseReference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a known symbol; conflicting knowledge fails.
    pub fn set(&mut self, pos: i64, symbol: char) -> Result<(), ()> {
        let symbol = symbol.to_ascii_uppercase();
        match self.data.get(&pos) {
            Some(existing) if *existing != symbol => Err(()),
            _ => {
                self.data.insert(pos, symbol);
                Ok(())
            }
        }
    }

    /// Record a run of symbols starting at `pos`.
    pub fn set_str(&mut self, pos: i64, symbols: &str) -> Result<(), ()> {
        for (i, c) in symbols.chars().enumerate() {
            self.set(pos + i as i64, c)?;
        }
        Ok(())
    }

    pub fn merge(&mut self, other: &SparseReference) -> Result<(), ()> {
        for (&pos, &symbol) in &other.data {
            self.set(pos, symbol)?;
        }
        Ok(())
    }

    /// The inclusive range `[start, end]` as tokens, unknown where unset.
    pub fn project_range(&self, start: i64, end: i64) -> Vec<ResidueToken> {
        (start..=end)
            .map(|p| match self.data.get(&p) {
                Some(&c) => ResidueToken::Known(c),
                None => ResidueToken::Unknown(p),
            })
            .collect()
    }
}

/// A projected window of sequence after applying an edit.
#[derive(Debug)]
pub(crate) struct Projection(pub Vec<ResidueToken>);

impl Projection {
    /// Drop everything from the first known stop onward.
    pub fn trim_at_stop(self) -> Self {
        let mut trimmed = Vec::new();
        for token in self.0 {
            if token.symbol() == Some('*') {
                break;
            }
            trimmed.push(token);
        }
        Projection(trimmed)
    }

    pub fn is_analogous_to(&self, other: &Self) -> bool {
        reconcile_projections(&self.0, &other.0)
    }
}

/// Tokens an amino-acid edit writes over its span.
fn apply_aa_edit(
    edit: &ProteinEdit,
    start: i64,
    end: i64,
    sref: &SparseReference,
) -> Vec<ResidueToken> {
    let known_seq = |residues: &[Residue]| -> Vec<ResidueToken> {
        residues
            .iter()
            .map(|r| ResidueToken::Known(r.code1()))
            .collect()
    };

    match edit {
        ProteinEdit::Substitution { alternative } => {
            vec![ResidueToken::Known(alternative.code1())]
        }
        ProteinEdit::Deletion => Vec::new(),
        ProteinEdit::Insertion { sequence } | ProteinEdit::Delins { sequence } => {
            known_seq(&sequence.0)
        }
        ProteinEdit::Duplication => {
            let mut out = sref.project_range(start, end);
            out.extend(sref.project_range(start, end));
            out
        }
        ProteinEdit::Repeat { max, .. } => {
            let mut out = Vec::new();
            for _ in 0..*max {
                out.extend(sref.project_range(start, end));
            }
            out
        }
        ProteinEdit::Extension { alternative, .. } => {
            vec![ResidueToken::Known(alternative.code1())]
        }
        ProteinEdit::Frameshift {
            alternative,
            terminal,
        } => {
            let mut out = Vec::new();
            if let Some(alt) = alternative {
                out.push(ResidueToken::Known(alt.code1()));
            }
            match terminal {
                Some(TerDistance::Known(n)) => {
                    // n counts new residues up to and including the stop
                    let gap = (*n as usize).saturating_sub(out.len() + 1);
                    out.extend(std::iter::repeat(ResidueToken::Any).take(gap));
                    out.push(ResidueToken::Known('*'));
                }
                _ => out.push(ResidueToken::Wildcard),
            }
            out
        }
        ProteinEdit::Identity => sref.project_range(start, end),
        ProteinEdit::NoProtein | ProteinEdit::UnknownEffect => {
            vec![ResidueToken::Wildcard]
        }
    }
}

/// Tokens a nucleic-acid edit writes over its span.
fn apply_na_edit(
    edit: &NaEdit,
    start: i64,
    end: i64,
    sref: &SparseReference,
) -> Vec<ResidueToken> {
    let known_str = |s: String| -> Vec<ResidueToken> {
        s.chars()
            .map(|c| ResidueToken::Known(c.to_ascii_uppercase()))
            .collect()
    };

    match edit {
        NaEdit::Substitution { alternative, .. } => known_str(alternative.to_string()),
        NaEdit::Deletion { .. } => Vec::new(),
        NaEdit::Insertion { sequence } | NaEdit::Delins { sequence } => {
            known_str(sequence.to_string())
        }
        NaEdit::Duplication { .. } => {
            let mut out = sref.project_range(start, end);
            out.extend(sref.project_range(start, end));
            out
        }
        NaEdit::Repeat { max, .. } => {
            let mut out = Vec::new();
            for _ in 0..*max {
                out.extend(sref.project_range(start, end));
            }
            out
        }
        NaEdit::Inversion { .. } => sref
            .project_range(start, end)
            .into_iter()
            .rev()
            .map(|t| match t {
                ResidueToken::Known(c) => {
                    ResidueToken::Known(crate::sequence::complement_char(c))
                }
                other => other,
            })
            .collect(),
        NaEdit::Identity => sref.project_range(start, end),
        NaEdit::Unknown => vec![ResidueToken::Wildcard],
    }
}

/// Is this edit an insertion between two flanking positions?
enum EditFamily {
    InsertionPoint,
    Span,
}

fn na_family(edit: &NaEdit) -> EditFamily {
    if edit.is_insertion() {
        EditFamily::InsertionPoint
    } else {
        EditFamily::Span
    }
}

fn aa_family(edit: &ProteinEdit) -> EditFamily {
    if matches!(edit, ProteinEdit::Insertion { .. }) {
        EditFamily::InsertionPoint
    } else {
        EditFamily::Span
    }
}

/// Project a variant onto the window `[view_start, view_end]`.
///
/// `edit_start..=edit_end` is the edited span (for insertions, the two
/// flanking positions). Repeats first extend their span over adjacent known
/// copies of the unit so differently-anchored repeat descriptions align.
fn project_variant(
    writes: &dyn Fn(i64, i64) -> Vec<ResidueToken>,
    family: EditFamily,
    unit_extend: Option<i64>,
    edit_start: i64,
    mut edit_end: i64,
    view_start: i64,
    view_end: i64,
    sref: &SparseReference,
) -> Projection {
    let original_edit_end = edit_end;
    if let Some(unit_len) = unit_extend {
        if unit_len > 0 {
            let unit = sref.project_range(edit_start, edit_end);
            loop {
                let next = sref.project_range(edit_end + 1, edit_end + unit_len);
                let matched = next.len() == unit.len()
                    && next.iter().zip(unit.iter()).all(|(a, b)| {
                        a.symbol().is_some() && a.symbol() == b.symbol()
                    });
                if matched {
                    edit_end += unit_len;
                } else {
                    break;
                }
            }
        }
    }

    let (prefix_end, suffix_start) = match family {
        EditFamily::InsertionPoint => (edit_start, edit_end.max(edit_start + 1)),
        EditFamily::Span => (edit_start - 1, edit_end + 1),
    };

    let mut out = Vec::new();
    if view_start <= prefix_end {
        out.extend(sref.project_range(view_start, prefix_end));
    }
    out.extend(writes(edit_start, original_edit_end));
    if suffix_start <= view_end {
        out.extend(sref.project_range(suffix_start, view_end));
    }
    Projection(out)
}

pub(crate) fn project_na_variant(
    edit: &NaEdit,
    edit_start: i64,
    edit_end: i64,
    view_start: i64,
    view_end: i64,
    sref: &SparseReference,
) -> Projection {
    let unit_extend = match edit {
        NaEdit::Repeat { .. } => Some(edit_end - edit_start + 1),
        _ => None,
    };
    project_variant(
        &|s, e| apply_na_edit(edit, s, e, sref),
        na_family(edit),
        unit_extend,
        edit_start,
        edit_end,
        view_start,
        view_end,
        sref,
    )
}

pub(crate) fn project_aa_variant(
    edit: &ProteinEdit,
    edit_start: i64,
    edit_end: i64,
    view_start: i64,
    view_end: i64,
    sref: &SparseReference,
) -> Projection {
    let unit_extend = match edit {
        ProteinEdit::Repeat { .. } => Some(edit_end - edit_start + 1),
        _ => None,
    };
    project_variant(
        &|s, e| apply_aa_edit(edit, s, e, sref),
        aa_family(edit),
        unit_extend,
        edit_start,
        edit_end,
        view_start,
        view_end,
        sref,
    )
}

/// Binds unknown reference positions to concrete symbols while walking two
/// projections in lockstep.
struct UnificationEnv {
    aliases: HashMap<i64, ResidueToken>,
}

impl UnificationEnv {
    fn new() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    fn resolve(&self, token: &ResidueToken) -> ResidueToken {
        let ResidueToken::Unknown(mut pos) = token else {
            return token.clone();
        };
        let mut visited = HashSet::new();
        visited.insert(pos);
        while let Some(next) = self.aliases.get(&pos) {
            match next {
                ResidueToken::Unknown(next_pos) => {
                    if !visited.insert(*next_pos) {
                        break;
                    }
                    pos = *next_pos;
                }
                other => return other.clone(),
            }
        }
        ResidueToken::Unknown(pos)
    }

    fn unify(&mut self, a: &ResidueToken, b: &ResidueToken) -> bool {
        let ra = self.resolve(a);
        let rb = self.resolve(b);
        match (ra, rb) {
            (ResidueToken::Any, _) | (_, ResidueToken::Any) => true,
            (ResidueToken::Wildcard, _) | (_, ResidueToken::Wildcard) => true,
            (ResidueToken::Known(ka), ResidueToken::Known(kb)) => ka == kb,
            (ResidueToken::Unknown(p), known @ ResidueToken::Known(_))
            | (known @ ResidueToken::Known(_), ResidueToken::Unknown(p)) => {
                self.aliases.insert(p, known);
                true
            }
            (ResidueToken::Unknown(pa), ResidueToken::Unknown(pb)) => {
                if pa != pb {
                    self.aliases.insert(pa, ResidueToken::Unknown(pb));
                }
                true
            }
        }
    }
}

/// Decide whether two projections can denote the same sequence under a
/// single consistent binding of unknown positions.
pub(crate) fn reconcile_projections(a: &[ResidueToken], b: &[ResidueToken]) -> bool {
    let mut env = UnificationEnv::new();

    let mut i = 0;
    while i < a.len() && i < b.len() {
        if matches!(a[i], ResidueToken::Wildcard) || matches!(b[i], ResidueToken::Wildcard) {
            return true;
        }
        if !env.unify(&a[i], &b[i]) {
            return false;
        }
        i += 1;
    }

    if a.len() != b.len() {
        return false;
    }

    // Bindings made late can invalidate comparisons made early; re-check the
    // whole walk under the final environment.
    for j in 0..i {
        let ra = env.resolve(&a[j]);
        let rb = env.resolve(&b[j]);
        match (ra, rb) {
            (ResidueToken::Any, _) | (_, ResidueToken::Any) => {}
            (ResidueToken::Wildcard, _) | (_, ResidueToken::Wildcard) => break,
            (ResidueToken::Known(ka), ResidueToken::Known(kb)) => {
                if ka != kb {
                    return false;
                }
            }
            (ResidueToken::Unknown(pa), ResidueToken::Unknown(pb)) => {
                if pa != pb {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}
