//! HGVS variant representation: AST, parser, and canonical formatting
//!
//! The formatter is the set of `Display` impls on the AST types; the parser
//! and formatter are inverses on canonical HGVS.

pub mod edit;
pub mod location;
pub mod parser;
pub mod uncertainty;
pub mod variant;

pub use edit::{NaEdit, ProteinEdit, TerDistance};
pub use location::{GenomeInterval, ProtInterval, ProtPos, TxInterval, TxPos};
pub use uncertainty::Mu;
pub use variant::{
    Accession, CdsVariant, GenomeVariant, HgvsVariant, MtVariant, PosEdit, ProteinVariant,
    RnaVariant, TxVariant,
};
