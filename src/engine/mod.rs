//! The finalization engine: quality gate, per-sample projection and
//! statistics aggregation over one merged record at a time.

mod aggregate;
mod config;
mod finalizer;
mod projector;

pub use aggregate::AlleleStatsAggregator;
pub use config::FinalizeConfig;
pub use finalizer::RecordFinalizer;
pub use projector::GenotypeProjector;
