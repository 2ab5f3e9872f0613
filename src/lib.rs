//! # Joint-Genotype Finalization Engine
//!
//! This library finalizes one merged multi-sample variant record at a
//! time: it recomputes per-sample genotype calls and record-level summary
//! statistics after removing the placeholder "any other possible allele"
//! sentinel that incremental merging leaves behind.
//!
//! ## Pipeline
//!
//! 1. **Quality gate**: sites without real variation, with zero depth, or
//!    below the class-dependent quality threshold are dropped.
//! 2. **Per-sample projection**: depth and likelihood vectors are
//!    truncated onto the placeholder-free allele list and calls are
//!    re-derived from the truncated likelihoods.
//! 3. **Aggregation**: allele counts/frequencies and the 2x2 strand-bias
//!    table are accumulated across samples.
//! 4. **Annotation finalization**: raw reducible annotations are resolved
//!    through a statically assembled registry.
//!
//! ## Usage Example
//!
//! ```ignore
//! use varfin::{FinalizeConfig, RecordFinalizer};
//!
//! let finalizer = RecordFinalizer::new(FinalizeConfig::default());
//! match finalizer.finalize(&merged_record)? {
//!     Some(record) => emit(record),
//!     None => {} // site dropped by the quality gate
//! }
//! ```
//!
//! Records are independent: one `RecordFinalizer` may be shared across
//! worker threads, with per-record state private to each call. Parsing
//! and serialization of the on-disk variant format live outside this
//! crate.

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod annotations; // reducible-annotation finalizers and registry
pub mod engine; // quality gate, projection, aggregation
pub mod likelihoods; // canonical PL vector indexing
pub mod model; // alleles, records, genotypes, attributes
pub mod stats; // strand-bias statistics

// Re-exports for convenience
pub use annotations::{
    AnnotationRegistry, AsFisherStrand, AsMappingQualityRankSum, AsReadPosRankSum,
    AsStrandOddsRatio, ReducibleAnnotation, RmsMappingQuality,
};
pub use engine::{AlleleStatsAggregator, FinalizeConfig, GenotypeProjector, RecordFinalizer};
pub use likelihoods::{AllelePair, LikelihoodIndexTable};
pub use model::{Allele, AttributeValue, RecordBuilder, SampleGenotype, VariantRecord};

use thiserror::Error;

/// Errors that abort finalization of a record.
///
/// Quality-gate rejection is *not* an error: it is reported as an
/// explicit absence by [`RecordFinalizer::finalize`].
#[derive(Error, Debug)]
pub enum FinalizeError {
    /// A real call with a ploidy other than the assumed diploid.
    #[error(
        "joint calling assumes diploid genotypes, but sample {sample} has ploidy {ploidy} \
         at {contig}:{position}"
    )]
    NonDiploidSample {
        /// Offending sample name.
        sample: String,
        /// Contig of the record being finalized.
        contig: String,
        /// Position of the record being finalized.
        position: u64,
        /// The ploidy that was encountered.
        ploidy: usize,
    },

    /// The placeholder allele appeared somewhere other than last.
    #[error(
        "the placeholder allele must be listed last, as in incremental-caller output, \
         but it was not at {contig}:{position}"
    )]
    PlaceholderNotLast {
        /// Contig of the record being finalized.
        contig: String,
        /// Position of the record being finalized.
        position: u64,
    },

    /// A likelihood vector shorter than the target truncation length.
    #[error(
        "sample {sample} carries a likelihood vector of length {actual}, \
         expected at least {expected}"
    )]
    LikelihoodVectorTooShort {
        /// Offending sample name.
        sample: String,
        /// Truncation length implied by the working allele list.
        expected: usize,
        /// Actual vector length.
        actual: usize,
    },

    /// A malformed numeric payload inside an attribute.
    #[error(transparent)]
    Attribute(#[from] model::AttributeError),
}
