//! Coordinate mapping between variant kinds

pub mod altseq;
pub mod mapper;
pub mod protein;

pub use mapper::VariantMapper;
