//! Error types for hgvs-forge

use thiserror::Error;

/// What the parser was doing when it rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Character not valid at this point in the grammar
    InvalidChar,
    /// Input ended before the variant description was complete
    UnexpectedEnd,
    /// Malformed position (zero, overflow, bad offset)
    BadPosition,
    /// Malformed edit description
    BadEdit,
    /// Feature not allowed for this coordinate kind (e.g. intron offset on g.)
    CoordinateMismatch,
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ParseErrorKind::InvalidChar => "invalid character",
            ParseErrorKind::UnexpectedEnd => "unexpected end of input",
            ParseErrorKind::BadPosition => "invalid position",
            ParseErrorKind::BadEdit => "invalid edit",
            ParseErrorKind::CoordinateMismatch => "not valid for this coordinate kind",
        };
        write!(f, "{}", s)
    }
}

/// Main error type for hgvs-forge operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForgeError {
    /// Malformed HGVS input; `offset` is the byte position of the failure
    #[error("parse error at byte {offset}: {kind}: {msg}")]
    Parse {
        kind: ParseErrorKind,
        offset: usize,
        msg: String,
    },

    /// Accession unknown to the data provider
    #[error("accession not found: {accession}")]
    NotFound { accession: String },

    /// Requested sequence span is outside the reference
    #[error("sequence range {start}..{end} out of bounds for {accession}")]
    OutOfRange {
        accession: String,
        start: i64,
        end: i64,
    },

    /// Data provider failed for a reason other than a missing accession
    #[error("data provider error: {0}")]
    DataProvider(String),

    /// Position arithmetic or conversion failed
    #[error("coordinate error: {0}")]
    Coordinate(String),

    /// Variant cannot be projected onto the requested axis
    #[error("mapping error: {0}")]
    Mapping(String),

    /// The stated reference allele disagrees with the provider's sequence
    #[error("reference mismatch for {accession}: expected {expected}, found {found}")]
    ReferenceMismatch {
        accession: String,
        expected: String,
        found: String,
    },

    /// Protein projection failed (missing CDS, truncated transcript)
    #[error("translation error: {0}")]
    Translation(String),

    /// Operation defined by HGVS but not expressible for this variant
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl ForgeError {
    /// Shorthand for a parse error.
    pub fn parse(kind: ParseErrorKind, offset: usize, msg: impl Into<String>) -> Self {
        ForgeError::Parse {
            kind,
            offset,
            msg: msg.into(),
        }
    }

    /// True for failures that equivalence checking treats as "verdict
    /// unknown" rather than an error: missing data, unmappable coordinates,
    /// failed projections. Only malformed input (a parse error) stays a hard
    /// error, since the inputs to a comparison are already-parsed variants.
    pub fn is_data_gap(&self) -> bool {
        !matches!(self, ForgeError::Parse { .. })
    }
}
