//! Reference data access
//!
//! The engine never touches files or networks; everything it knows about
//! transcripts and sequence comes through the [`DataProvider`] trait.

pub mod mock;
pub mod provider;
pub mod transcript;

pub use mock::MockProvider;
pub use provider::{DataProvider, IdentifierKind, IdentifierType, TranscriptSearch};
pub use transcript::{ExonData, Strand, TranscriptData, TranscriptMapper};
