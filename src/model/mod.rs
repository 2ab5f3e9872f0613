//! Data model for merged multi-sample variant records.
//!
//! These types mirror the intermediate record produced by the upstream
//! merge step: an allele list whose order is the single index space for
//! every per-sample vector, an open attribute map, and one genotype per
//! sample. Parsing and serialization of the on-disk variant format live
//! outside this crate.

mod allele;
mod attributes;
mod genotype;
pub mod keys;
mod record;

pub use allele::Allele;
pub use attributes::{AttributeError, AttributeValue};
pub use genotype::SampleGenotype;
pub use record::{RecordBuilder, VariantRecord};
