//! HGVS variant types
//!
//! The top-level [`HgvsVariant`] enum and its per-kind structs. `Display` on
//! these types is the canonical formatter: deterministic, three-letter amino
//! acids, lowercase nucleotides for `r.`, and parentheses for predicted
//! consequences.

use super::edit::{NaEdit, ProteinEdit};
use super::location::{GenomeInterval, ProtInterval, TxInterval};
use super::uncertainty::Mu;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Sequence accession, optionally versioned.
///
/// `Arc<str>` keeps cloning cheap: accessions are copied on every mapping
/// and normalization step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Accession {
    pub name: Arc<str>,
    pub version: Option<u32>,
}

impl Accession {
    pub fn new(name: impl Into<Arc<str>>, version: Option<u32>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// Parse `NM_000051.3`-style strings, splitting a trailing `.N` version.
    pub fn from_full(full: &str) -> Self {
        if let Some((name, tail)) = full.rsplit_once('.') {
            if let Ok(version) = tail.parse::<u32>() {
                return Self::new(name, Some(version));
            }
        }
        Self::new(full, None)
    }

    /// Accession without version.
    pub fn base(&self) -> &str {
        &self.name
    }

    /// Accession with version, if present.
    pub fn full(&self) -> String {
        match self.version {
            Some(v) => format!("{}.{}", self.name, v),
            None => self.name.to_string(),
        }
    }

    /// The coordinate kind this accession's prefix implies, if recognizable.
    pub fn inferred_kind(&self) -> Option<&'static str> {
        let prefix = self.name.split('_').next().unwrap_or(&self.name);
        match prefix {
            "NC" | "NG" | "NT" | "NW" => Some("g"),
            "NM" | "XM" => Some("c"),
            "NR" | "XR" => Some("n"),
            "NP" | "XP" => Some("p"),
            p if p.starts_with("ENST") => Some("c"),
            p if p.starts_with("ENSG") => Some("g"),
            p if p.starts_with("ENSP") => Some("p"),
            _ => None,
        }
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(v) = self.version {
            write!(f, ".{}", v)?;
        }
        Ok(())
    }
}

/// A location paired with its edit.
///
/// `loc` is absent only for whole-entity protein edits (`p.=`, `p.0`,
/// `p.?`). A `Mu::Uncertain` edit renders the whole body in parentheses
/// (predicted consequence).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PosEdit<L, E> {
    pub loc: Option<L>,
    pub edit: Mu<E>,
}

impl<L, E> PosEdit<L, E> {
    pub fn new(loc: L, edit: E) -> Self {
        Self {
            loc: Some(loc),
            edit: Mu::Certain(edit),
        }
    }

    /// A predicted consequence, rendered in parentheses.
    pub fn predicted(loc: L, edit: E) -> Self {
        Self {
            loc: Some(loc),
            edit: Mu::Uncertain(edit),
        }
    }

    pub fn without_loc(edit: E) -> Self {
        Self {
            loc: None,
            edit: Mu::Certain(edit),
        }
    }

    pub fn is_predicted(&self) -> bool {
        self.edit.is_uncertain()
    }

    /// Toggle the predicted flag without touching the body.
    pub fn set_predicted(&mut self, predicted: bool)
    where
        E: Clone,
    {
        let inner = self.edit.clone().into_inner();
        self.edit = if predicted {
            Mu::Uncertain(inner)
        } else {
            Mu::Certain(inner)
        };
    }
}

impl<L: fmt::Display, E: fmt::Display> fmt::Display for PosEdit<L, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.edit.is_uncertain() {
            write!(f, "(")?;
        }
        if let Some(loc) = &self.loc {
            write!(f, "{}", loc)?;
        }
        write!(f, "{}", self.edit.inner())?;
        if self.edit.is_uncertain() {
            write!(f, ")")?;
        }
        Ok(())
    }
}

macro_rules! na_variant {
    ($(#[$doc:meta])* $name:ident, $interval:ty, $kind:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            pub accession: Accession,
            /// Outer reference accession for `REF(ACC):kind.` notation
            pub reference: Option<Accession>,
            pub gene_symbol: Option<String>,
            pub pos_edit: PosEdit<$interval, NaEdit>,
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if let Some(reference) = &self.reference {
                    write!(f, "{}({})", reference, self.accession)?;
                } else {
                    write!(f, "{}", self.accession)?;
                }
                write!(f, ":{}.{}", $kind, self.pos_edit)
            }
        }
    };
}

na_variant!(
    /// Genomic variant (`g.`)
    GenomeVariant,
    GenomeInterval,
    "g"
);
na_variant!(
    /// Mitochondrial variant (`m.`)
    MtVariant,
    GenomeInterval,
    "m"
);
na_variant!(
    /// Coding-transcript variant (`c.`)
    CdsVariant,
    TxInterval,
    "c"
);
na_variant!(
    /// Non-coding transcript variant (`n.`)
    TxVariant,
    TxInterval,
    "n"
);

/// RNA variant (`r.`); nucleotides render lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RnaVariant {
    pub accession: Accession,
    pub reference: Option<Accession>,
    pub gene_symbol: Option<String>,
    pub pos_edit: PosEdit<TxInterval, NaEdit>,
}

impl fmt::Display for RnaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(reference) = &self.reference {
            write!(f, "{}({})", reference, self.accession)?;
        } else {
            write!(f, "{}", self.accession)?;
        }
        write!(f, ":r.")?;
        if self.pos_edit.edit.is_uncertain() {
            write!(f, "(")?;
        }
        if let Some(loc) = &self.pos_edit.loc {
            write!(f, "{}", loc)?;
        }
        write!(f, "{}", self.pos_edit.edit.inner().to_rna_string())?;
        if self.pos_edit.edit.is_uncertain() {
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Protein variant (`p.`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProteinVariant {
    pub accession: Accession,
    pub reference: Option<Accession>,
    pub gene_symbol: Option<String>,
    pub pos_edit: PosEdit<ProtInterval, ProteinEdit>,
}

impl fmt::Display for ProteinVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(reference) = &self.reference {
            write!(f, "{}({})", reference, self.accession)?;
        } else {
            write!(f, "{}", self.accession)?;
        }
        write!(f, ":p.{}", self.pos_edit)
    }
}

/// A parsed HGVS variant of any coordinate kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HgvsVariant {
    Genome(GenomeVariant),
    Mt(MtVariant),
    Cds(CdsVariant),
    Tx(TxVariant),
    Rna(RnaVariant),
    Protein(ProteinVariant),
}

impl HgvsVariant {
    /// The variant's accession.
    pub fn accession(&self) -> &Accession {
        match self {
            HgvsVariant::Genome(v) => &v.accession,
            HgvsVariant::Mt(v) => &v.accession,
            HgvsVariant::Cds(v) => &v.accession,
            HgvsVariant::Tx(v) => &v.accession,
            HgvsVariant::Rna(v) => &v.accession,
            HgvsVariant::Protein(v) => &v.accession,
        }
    }

    /// Replace the accession, keeping everything else.
    pub fn with_accession(&self, accession: Accession) -> Self {
        let mut v = self.clone();
        match &mut v {
            HgvsVariant::Genome(x) => x.accession = accession,
            HgvsVariant::Mt(x) => x.accession = accession,
            HgvsVariant::Cds(x) => x.accession = accession,
            HgvsVariant::Tx(x) => x.accession = accession,
            HgvsVariant::Rna(x) => x.accession = accession,
            HgvsVariant::Protein(x) => x.accession = accession,
        }
        v
    }

    /// The coordinate kind letter.
    pub fn kind(&self) -> &'static str {
        match self {
            HgvsVariant::Genome(_) => "g",
            HgvsVariant::Mt(_) => "m",
            HgvsVariant::Cds(_) => "c",
            HgvsVariant::Tx(_) => "n",
            HgvsVariant::Rna(_) => "r",
            HgvsVariant::Protein(_) => "p",
        }
    }

    pub fn as_cds(&self) -> Option<&CdsVariant> {
        match self {
            HgvsVariant::Cds(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_genome(&self) -> Option<&GenomeVariant> {
        match self {
            HgvsVariant::Genome(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_protein(&self) -> Option<&ProteinVariant> {
        match self {
            HgvsVariant::Protein(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for HgvsVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HgvsVariant::Genome(v) => write!(f, "{}", v),
            HgvsVariant::Mt(v) => write!(f, "{}", v),
            HgvsVariant::Cds(v) => write!(f, "{}", v),
            HgvsVariant::Tx(v) => write!(f, "{}", v),
            HgvsVariant::Rna(v) => write!(f, "{}", v),
            HgvsVariant::Protein(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{CdsAnchor, HgvsGenomicPos, HgvsProteinPos, HgvsTranscriptPos};
    use crate::hgvs::location::{ProtPos, TxPos};
    use crate::sequence::{Base, Residue};

    #[test]
    fn test_accession_display() {
        assert_eq!(Accession::new("NM_000051", Some(3)).to_string(), "NM_000051.3");
        assert_eq!(Accession::new("BRAF", None).to_string(), "BRAF");
        assert_eq!(Accession::from_full("NM_000051.3").version, Some(3));
        assert_eq!(Accession::from_full("BRAF").version, None);
    }

    #[test]
    fn test_accession_inferred_kind() {
        assert_eq!(Accession::from_full("NC_000001.11").inferred_kind(), Some("g"));
        assert_eq!(Accession::from_full("NM_000051.3").inferred_kind(), Some("c"));
        assert_eq!(Accession::from_full("NP_000042.3").inferred_kind(), Some("p"));
        assert_eq!(Accession::from_full("BRAF").inferred_kind(), None);
    }

    #[test]
    fn test_genome_variant_display() {
        let v = GenomeVariant {
            accession: Accession::from_full("NC_000001.11"),
            reference: None,
            gene_symbol: None,
            pos_edit: PosEdit::new(
                GenomeInterval::point(HgvsGenomicPos::new(12345)),
                NaEdit::Substitution {
                    reference: Base::A,
                    alternative: Base::G,
                },
            ),
        };
        assert_eq!(v.to_string(), "NC_000001.11:g.12345A>G");
    }

    #[test]
    fn test_cds_variant_display() {
        let v = CdsVariant {
            accession: Accession::from_full("NM_000051.3"),
            reference: None,
            gene_symbol: None,
            pos_edit: PosEdit::new(
                TxInterval::point(TxPos::new(HgvsTranscriptPos::new(459), CdsAnchor::CdsStart)),
                NaEdit::Deletion {
                    sequence: None,
                    length: None,
                },
            ),
        };
        assert_eq!(v.to_string(), "NM_000051.3:c.459del");
    }

    #[test]
    fn test_protein_variant_predicted_display() {
        let v = ProteinVariant {
            accession: Accession::from_full("NP_000042.3"),
            reference: None,
            gene_symbol: None,
            pos_edit: PosEdit::predicted(
                ProtInterval::point(ProtPos::new(Residue::Lys, HgvsProteinPos::new(41))),
                ProteinEdit::Substitution {
                    alternative: Residue::Arg,
                },
            ),
        };
        assert_eq!(v.to_string(), "NP_000042.3:p.(Lys41Arg)");
    }

    #[test]
    fn test_rna_variant_lowercase() {
        let v = RnaVariant {
            accession: Accession::from_full("NM_000051.3"),
            reference: None,
            gene_symbol: None,
            pos_edit: PosEdit::new(
                TxInterval::point(TxPos::new(HgvsTranscriptPos::new(76), CdsAnchor::TranscriptStart)),
                NaEdit::Substitution {
                    reference: Base::A,
                    alternative: Base::U,
                },
            ),
        };
        assert_eq!(v.to_string(), "NM_000051.3:r.76a>u");
    }

    #[test]
    fn test_reference_accession_display() {
        let v = CdsVariant {
            accession: Accession::from_full("NM_000051.3"),
            reference: Some(Accession::from_full("NC_000011.10")),
            gene_symbol: None,
            pos_edit: PosEdit::new(
                TxInterval::point(TxPos::new(HgvsTranscriptPos::new(123), CdsAnchor::CdsStart)),
                NaEdit::Substitution {
                    reference: Base::A,
                    alternative: Base::G,
                },
            ),
        };
        assert_eq!(v.to_string(), "NC_000011.10(NM_000051.3):c.123A>G");
    }

    #[test]
    fn test_whole_protein_edit_display() {
        let v = ProteinVariant {
            accession: Accession::from_full("NP_000042.3"),
            reference: None,
            gene_symbol: None,
            pos_edit: PosEdit::without_loc(ProteinEdit::NoProtein),
        };
        assert_eq!(v.to_string(), "NP_000042.3:p.0");
    }
}
