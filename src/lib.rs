//! hgvs-forge: HGVS variant engine
//!
//! Parses HGVS variant descriptions, maps them between genomic, coding, and
//! protein coordinates, normalizes them to their 3'-most representation, and
//! judges biological equivalence between two descriptions.
//!
//! # Example
//!
//! ```
//! use hgvs_forge::parse_hgvs;
//!
//! let variant = parse_hgvs("NM_000051.3:c.123A>G").unwrap();
//! assert_eq!(variant.to_string(), "NM_000051.3:c.123A>G");
//! ```
//!
//! Mapping and equivalence require a [`DataProvider`] that supplies transcript
//! models and reference sequence. [`MockProvider`] ships with the crate for
//! tests and examples:
//!
//! ```
//! use hgvs_forge::{parse_hgvs, HgvsVariant, MockProvider, VariantMapper};
//!
//! let provider = MockProvider::with_test_data();
//! let mapper = VariantMapper::new(&provider);
//!
//! let var_c = parse_hgvs("NM_000051.3:c.4A>T").unwrap();
//! if let HgvsVariant::Cds(v) = &var_c {
//!     let var_p = mapper.c_to_p(v, None).unwrap();
//!     println!("{}", var_p);
//! }
//! ```

pub mod convert;
pub mod coords;
pub mod equivalence;
pub mod error;
pub mod hgvs;
pub mod normalize;
pub mod reference;
pub mod sequence;
pub mod spdi;

// Re-export commonly used types
pub use convert::VariantMapper;
pub use coords::{
    CdsAnchor, GenomicPos, HgvsGenomicPos, HgvsProteinPos, HgvsTranscriptPos, IntronicOffset,
    ProteinPos, TranscriptPos,
};
pub use equivalence::{EquivalenceLevel, VariantEquivalence};
pub use error::ForgeError;
pub use hgvs::parser::parse_hgvs;
pub use hgvs::variant::HgvsVariant;
pub use normalize::{NormalizeConfig, Normalizer};
pub use reference::{
    DataProvider, ExonData, IdentifierKind, IdentifierType, MockProvider, Strand, TranscriptData,
    TranscriptSearch,
};
pub use spdi::SpdiVariant;

/// Result type alias for hgvs-forge operations
pub type Result<T> = std::result::Result<T, ForgeError>;
