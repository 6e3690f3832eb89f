//! Edit types for nucleic-acid and protein variants
//!
//! One sum type per alphabet; every operation in the engine (formatting,
//! applying to sequence, shifting, projecting) dispatches on the variant tag.

use crate::sequence::{AaSequence, Base, Residue, Sequence};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A nucleic-acid edit (`g.`/`m.`/`c.`/`n.`/`r.`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NaEdit {
    /// Single-base substitution, e.g. `A>G`
    Substitution { reference: Base, alternative: Base },

    /// Deletion, optionally restating the deleted sequence or its length,
    /// e.g. `del`, `delAG`, `del2`
    Deletion {
        sequence: Option<Sequence>,
        length: Option<u64>,
    },

    /// Insertion between two flanking positions, e.g. `insATG`
    Insertion { sequence: Sequence },

    /// Duplication, optionally restating the duplicated sequence or length
    Duplication {
        sequence: Option<Sequence>,
        length: Option<u64>,
    },

    /// Inversion of the located span, e.g. `inv`, `inv3`
    Inversion { length: Option<u64> },

    /// Deletion-insertion, e.g. `delinsTT`
    Delins { sequence: Sequence },

    /// Tandem repeat, e.g. `TG[12]` or `[10_12]` with the unit implied by
    /// the location
    Repeat {
        unit: Option<Sequence>,
        min: u64,
        max: u64,
    },

    /// No change at the located position, `=`
    Identity,

    /// Effect unknown, `?`
    Unknown,
}

impl NaEdit {
    /// Apply `f` to every literal sequence the edit carries.
    ///
    /// Used for reverse-complementing edits when crossing a strand boundary.
    pub fn map_sequence<F: Fn(&Sequence) -> Sequence>(&self, f: F) -> Self {
        match self {
            NaEdit::Substitution {
                reference,
                alternative,
            } => NaEdit::Substitution {
                reference: f(&Sequence(vec![*reference])).0[0],
                alternative: f(&Sequence(vec![*alternative])).0[0],
            },
            NaEdit::Deletion { sequence, length } => NaEdit::Deletion {
                sequence: sequence.as_ref().map(&f),
                length: *length,
            },
            NaEdit::Insertion { sequence } => NaEdit::Insertion {
                sequence: f(sequence),
            },
            NaEdit::Duplication { sequence, length } => NaEdit::Duplication {
                sequence: sequence.as_ref().map(&f),
                length: *length,
            },
            NaEdit::Delins { sequence } => NaEdit::Delins {
                sequence: f(sequence),
            },
            NaEdit::Repeat { unit, min, max } => NaEdit::Repeat {
                unit: unit.as_ref().map(&f),
                min: *min,
                max: *max,
            },
            NaEdit::Inversion { .. } | NaEdit::Identity | NaEdit::Unknown => self.clone(),
        }
    }

    /// Reverse-complement all carried sequences (strand flip).
    pub fn reverse_complement(&self) -> Self {
        self.map_sequence(|s| s.reverse_complement())
    }

    /// Reference and alternative allele strings, where statically known.
    ///
    /// Deletions yield an empty alternative; insertions an empty reference.
    /// `None` entries mean the sequence must come from the reference.
    pub fn ref_alt(&self) -> (Option<String>, Option<String>) {
        match self {
            NaEdit::Substitution {
                reference,
                alternative,
            } => (
                Some(reference.to_string()),
                Some(alternative.to_string()),
            ),
            NaEdit::Deletion { sequence, .. } => (
                sequence.as_ref().map(|s| s.to_string()),
                Some(String::new()),
            ),
            NaEdit::Insertion { sequence } => (Some(String::new()), Some(sequence.to_string())),
            NaEdit::Duplication { sequence, .. } => {
                (sequence.as_ref().map(|s| s.to_string()), None)
            }
            NaEdit::Delins { sequence } => (None, Some(sequence.to_string())),
            NaEdit::Repeat { unit, .. } => (unit.as_ref().map(|s| s.to_string()), None),
            NaEdit::Inversion { .. } => (None, None),
            NaEdit::Identity | NaEdit::Unknown => (None, None),
        }
    }

    pub fn is_substitution(&self) -> bool {
        matches!(self, NaEdit::Substitution { .. })
    }

    pub fn is_insertion(&self) -> bool {
        matches!(self, NaEdit::Insertion { .. })
    }

    /// Render with lowercase nucleotides for `r.` output.
    pub fn to_rna_string(&self) -> String {
        match self {
            NaEdit::Substitution {
                reference,
                alternative,
            } => format!(
                "{}>{}",
                reference.to_lowercase_char(),
                alternative.to_lowercase_char()
            ),
            NaEdit::Deletion { sequence, length } => {
                let mut s = String::from("del");
                if let Some(seq) = sequence {
                    s.push_str(&seq.to_lowercase_string());
                } else if let Some(len) = length {
                    s.push_str(&len.to_string());
                }
                s
            }
            NaEdit::Insertion { sequence } => format!("ins{}", sequence.to_lowercase_string()),
            NaEdit::Duplication { sequence, length } => {
                let mut s = String::from("dup");
                if let Some(seq) = sequence {
                    s.push_str(&seq.to_lowercase_string());
                } else if let Some(len) = length {
                    s.push_str(&len.to_string());
                }
                s
            }
            NaEdit::Inversion { length } => {
                let mut s = String::from("inv");
                if let Some(len) = length {
                    s.push_str(&len.to_string());
                }
                s
            }
            NaEdit::Delins { sequence } => format!("delins{}", sequence.to_lowercase_string()),
            NaEdit::Repeat { unit, min, max } => {
                let mut s = String::new();
                if let Some(u) = unit {
                    s.push_str(&u.to_lowercase_string());
                }
                if min == max {
                    s.push_str(&format!("[{}]", min));
                } else {
                    s.push_str(&format!("[{}_{}]", min, max));
                }
                s
            }
            NaEdit::Identity => String::from("="),
            NaEdit::Unknown => String::from("?"),
        }
    }
}

impl fmt::Display for NaEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaEdit::Substitution {
                reference,
                alternative,
            } => write!(f, "{}>{}", reference, alternative),
            NaEdit::Deletion { sequence, length } => {
                write!(f, "del")?;
                if let Some(seq) = sequence {
                    write!(f, "{}", seq)?;
                } else if let Some(len) = length {
                    write!(f, "{}", len)?;
                }
                Ok(())
            }
            NaEdit::Insertion { sequence } => write!(f, "ins{}", sequence),
            NaEdit::Duplication { sequence, length } => {
                write!(f, "dup")?;
                if let Some(seq) = sequence {
                    write!(f, "{}", seq)?;
                } else if let Some(len) = length {
                    write!(f, "{}", len)?;
                }
                Ok(())
            }
            NaEdit::Inversion { length } => {
                write!(f, "inv")?;
                if let Some(len) = length {
                    write!(f, "{}", len)?;
                }
                Ok(())
            }
            NaEdit::Delins { sequence } => write!(f, "delins{}", sequence),
            NaEdit::Repeat { unit, min, max } => {
                if let Some(u) = unit {
                    write!(f, "{}", u)?;
                }
                if min == max {
                    write!(f, "[{}]", min)
                } else {
                    write!(f, "[{}_{}]", min, max)
                }
            }
            NaEdit::Identity => write!(f, "="),
            NaEdit::Unknown => write!(f, "?"),
        }
    }
}

/// Distance from a frameshift or extension to the new stop codon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerDistance {
    /// Stop found `n` residues downstream (counting the stop itself for fs)
    Known(u64),
    /// No stop found before the transcript end
    Unknown,
}

impl fmt::Display for TerDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerDistance::Known(n) => write!(f, "{}", n),
            TerDistance::Unknown => write!(f, "?"),
        }
    }
}

/// A protein edit (`p.`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProteinEdit {
    /// Residue replacement; the reference residue lives in the location,
    /// e.g. `Lys41Arg` (alternative `Ter` is a nonsense variant)
    Substitution { alternative: Residue },

    /// Residue deletion, e.g. `Cys76_Glu79del`
    Deletion,

    /// Residue duplication, e.g. `Ala2_Ala3dup`
    Duplication,

    /// Insertion between two flanking residues, e.g. `Lys2_Gly3insGlnSer`
    Insertion { sequence: AaSequence },

    /// Deletion-insertion, e.g. `Cys28delinsTrpVal`
    Delins { sequence: AaSequence },

    /// Frameshift, e.g. `Arg97ProfsTer23`; `alternative` is the first new
    /// residue, `terminal` the distance to the new stop
    Frameshift {
        alternative: Option<Residue>,
        terminal: Option<TerDistance>,
    },

    /// Stop-loss extension, e.g. `Ter312Argext*5`
    Extension {
        alternative: Residue,
        terminal: TerDistance,
    },

    /// Residue repeat, e.g. `Gln18[23]`
    Repeat {
        unit: Option<AaSequence>,
        min: u64,
        max: u64,
    },

    /// Synonymous change, `=`
    Identity,

    /// No protein is produced, `p.0`
    NoProtein,

    /// Effect cannot be predicted, `p.?`
    UnknownEffect,
}

impl ProteinEdit {
    /// Edits that describe the whole protein and take no position.
    pub fn is_whole_protein(&self) -> bool {
        matches!(self, ProteinEdit::NoProtein | ProteinEdit::UnknownEffect)
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, ProteinEdit::Identity)
    }
}

impl fmt::Display for ProteinEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProteinEdit::Substitution { alternative } => write!(f, "{}", alternative),
            ProteinEdit::Deletion => write!(f, "del"),
            ProteinEdit::Duplication => write!(f, "dup"),
            ProteinEdit::Insertion { sequence } => write!(f, "ins{}", sequence),
            ProteinEdit::Delins { sequence } => write!(f, "delins{}", sequence),
            ProteinEdit::Frameshift {
                alternative,
                terminal,
            } => {
                if let Some(alt) = alternative {
                    write!(f, "{}", alt)?;
                }
                write!(f, "fs")?;
                if let Some(ter) = terminal {
                    write!(f, "Ter{}", ter)?;
                }
                Ok(())
            }
            ProteinEdit::Extension {
                alternative,
                terminal,
            } => write!(f, "{}ext*{}", alternative, terminal),
            ProteinEdit::Repeat { unit, min, max } => {
                if let Some(u) = unit {
                    write!(f, "{}", u)?;
                }
                if min == max {
                    write!(f, "[{}]", min)
                } else {
                    write!(f, "[{}_{}]", min, max)
                }
            }
            ProteinEdit::Identity => write!(f, "="),
            ProteinEdit::NoProtein => write!(f, "0"),
            ProteinEdit::UnknownEffect => write!(f, "?"),
        }
    }
}
