//! Reducible annotations and their finalization registry.
//!
//! A reducible annotation is computed in two phases: a cheap raw partial
//! statistic accumulated upstream per sample or site, and a finalization
//! step that combines the raw partials into a record-level value. This
//! module holds the finalization side: an explicit, statically assembled
//! registry mapping each raw attribute key to its finalizer. There is no
//! runtime discovery; callers register exactly the finalizers they want.

mod mapping_quality;
mod rank_sum;
mod strand_bias;

use std::fmt;

pub use mapping_quality::RmsMappingQuality;
pub use rank_sum::{AsMappingQualityRankSum, AsReadPosRankSum};
pub use strand_bias::{AsFisherStrand, AsStrandOddsRatio};

use crate::model::{AttributeValue, RecordBuilder, VariantRecord};
use crate::FinalizeError;

/// Finalization capability of one reducible annotation.
///
/// Implementations claim a single raw attribute key and convert its
/// accumulated payload into finalized record-level attributes. A finalizer
/// that finds the raw value in an encoding it does not handle returns
/// `Ok(None)` ("does not apply") and is skipped leniently; genuinely
/// malformed numeric payloads inside a claimed encoding are fatal.
/// Finalizers must be independent of one another: registry iteration
/// order is unspecified and must not affect output.
pub trait ReducibleAnnotation: Send + Sync + fmt::Debug {
    /// The raw attribute key this finalizer claims.
    fn raw_key(&self) -> &'static str;

    /// Convert the raw payload into finalized attributes, reading the
    /// in-progress builder state and the original pre-finalization record.
    fn finalize_raw(
        &self,
        builder: &RecordBuilder,
        original: &VariantRecord,
    ) -> Result<Option<Vec<(String, AttributeValue)>>, FinalizeError>;
}

/// Statically assembled registry of reducible-annotation finalizers.
#[derive(Debug, Default)]
pub struct AnnotationRegistry {
    finalizers: Vec<Box<dyn ReducibleAnnotation>>,
}

impl AnnotationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            finalizers: Vec::new(),
        }
    }

    /// The standard allele-specific finalizer set.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(AsFisherStrand));
        registry.register(Box::new(AsStrandOddsRatio));
        registry.register(Box::new(AsMappingQualityRankSum));
        registry.register(Box::new(AsReadPosRankSum));
        registry
    }

    /// Register an additional finalizer.
    pub fn register(&mut self, finalizer: Box<dyn ReducibleAnnotation>) {
        self.finalizers.push(finalizer);
    }

    /// Iterate over the registered finalizers.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ReducibleAnnotation> {
        self.finalizers.iter().map(Box::as_ref)
    }

    /// Number of registered finalizers.
    pub fn len(&self) -> usize {
        self.finalizers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.finalizers.is_empty()
    }
}
