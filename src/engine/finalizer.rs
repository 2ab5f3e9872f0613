use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::annotations::{AnnotationRegistry, RmsMappingQuality};
use crate::engine::{AlleleStatsAggregator, FinalizeConfig, GenotypeProjector};
use crate::likelihoods::LikelihoodIndexTable;
use crate::model::{keys, Allele, AttributeError, AttributeValue, RecordBuilder, VariantRecord};
use crate::stats::{fisher_exact_two_sided, phred_scaled_p_value, round3, symmetric_odds_ratio};
use crate::FinalizeError;

/// Orchestrator for joint-genotype finalization of one merged record.
///
/// Applies the quality gate, drives per-sample projection, aggregates
/// allele and strand statistics, resolves raw reducible annotations and
/// assembles the output record. Immutable after construction and safe to
/// share across worker threads; all per-record state is local to one
/// [`finalize`](Self::finalize) call.
#[derive(Debug)]
pub struct RecordFinalizer {
    config: FinalizeConfig,
    table: Arc<LikelihoodIndexTable>,
    registry: AnnotationRegistry,
    mq_finalizer: RmsMappingQuality,
}

impl RecordFinalizer {
    /// Build a finalizer with the standard annotation registry.
    pub fn new(config: FinalizeConfig) -> Self {
        Self::with_registry(config, AnnotationRegistry::standard())
    }

    /// Build a finalizer with a caller-assembled annotation registry.
    pub fn with_registry(config: FinalizeConfig, registry: AnnotationRegistry) -> Self {
        let table = Arc::new(LikelihoodIndexTable::new(config.max_alt_count));
        Self {
            config,
            table,
            registry,
            mq_finalizer: RmsMappingQuality,
        }
    }

    /// Shared handle to the likelihood index table.
    pub fn likelihood_table(&self) -> Arc<LikelihoodIndexTable> {
        Arc::clone(&self.table)
    }

    /// Finalize one merged record. `Ok(None)` means the site should be
    /// dropped (no real variation, zero depth, or below the quality gate)
    /// and is a normal outcome, not an error.
    pub fn finalize(&self, variant: &VariantRecord) -> Result<Option<VariantRecord>, FinalizeError> {
        if !is_properly_polymorphic(variant) {
            debug!(
                contig = variant.contig(),
                position = variant.position(),
                "dropping site without real variation"
            );
            return Ok(None);
        }
        if variant.attribute_as_i64(keys::DEPTH, 0)? == 0 {
            debug!(
                contig = variant.contig(),
                position = variant.position(),
                "dropping site with zero total depth"
            );
            return Ok(None);
        }

        if !variant.has_attribute(keys::RAW_QUAL_APPROX) {
            warn!(
                contig = variant.contig(),
                position = variant.position(),
                "record is missing the {} attribute assigned by the upstream reblocker; \
                 treating it as zero",
                keys::RAW_QUAL_APPROX
            );
        }
        let qual_approx = variant.attribute_as_f64(keys::RAW_QUAL_APPROX, 0.0)?;
        let threshold = if is_indel_like(variant) {
            self.config.indel_qual_threshold()
        } else {
            self.config.snp_qual_threshold()
        };
        if qual_approx < threshold {
            debug!(
                contig = variant.contig(),
                position = variant.position(),
                qual_approx,
                threshold,
                "dropping site below the quality gate"
            );
            return Ok(None);
        }

        let mut builder = RecordBuilder::from_record(variant);

        // The merge step combined raw annotations; mapping quality is
        // finalized up front, everything allele-specific waits for the
        // registry pass below.
        self.mq_finalizer.apply(&mut builder, variant)?;

        let variant_depth = variant.attribute_as_i64(keys::VARIANT_DEPTH, 0)?;
        if variant_depth > 0 {
            builder.set_attribute(keys::QUAL_BY_DEPTH, qual_approx / variant_depth as f64);
        } else {
            warn!(
                contig = variant.contig(),
                position = variant.position(),
                "missing or zero {}; skipping the {} attribute",
                keys::VARIANT_DEPTH,
                keys::QUAL_BY_DEPTH
            );
        }
        builder.set_log10_perror(qual_approx / -10.0);
        // redundant now that it's in the quality field
        builder.remove_attribute(keys::RAW_QUAL_APPROX);

        let placeholder_removed = variant.has_placeholder();
        if placeholder_removed
            && !variant
                .alleles()
                .last()
                .map(Allele::is_placeholder)
                .unwrap_or(false)
        {
            return Err(FinalizeError::PlaceholderNotLast {
                contig: variant.contig().to_string(),
                position: variant.position(),
            });
        }
        let target_alleles: Vec<Allele> = if placeholder_removed {
            variant.alleles()[..variant.alleles().len() - 1].to_vec()
        } else {
            variant.alleles().to_vec()
        };

        let mut stats = AlleleStatsAggregator::new(&target_alleles);
        let projector = GenotypeProjector::new(
            &self.table,
            &self.config,
            variant,
            &target_alleles,
            placeholder_removed,
        );
        let mut called = Vec::with_capacity(variant.genotypes().len());
        for genotype in variant.genotypes() {
            called.push(projector.project(genotype, &mut stats)?);
        }

        if variant.has_genotypes() {
            let allele_number = stats.called_allele_number(&target_alleles);
            let mut counts = Vec::new();
            let mut freqs = Vec::new();
            for allele in &target_alleles {
                if allele.is_reference() {
                    continue;
                }
                let count = stats.count(allele);
                counts.push(i64::from(count));
                freqs.push(if allele_number > 0 {
                    f64::from(count) / f64::from(allele_number)
                } else {
                    0.0
                });
            }
            builder.set_attribute(keys::ALLELE_COUNT, scalar_or_int_list(counts));
            builder.set_attribute(keys::ALLELE_FREQUENCY, scalar_or_float_list(freqs));
            builder.set_attribute(keys::ALLELE_NUMBER, i64::from(allele_number));
        } else if let Some(value) = variant.attribute(keys::STRAND_BIAS_TABLE) {
            stats.set_strand_table(parse_strand_table(value)?);
        }

        let strand = strand_table_counts(stats.strand_table());
        builder.set_attribute(
            keys::FISHER_STRAND,
            round3(phred_scaled_p_value(fisher_exact_two_sided(strand))),
        );
        builder.set_attribute(
            keys::STRAND_ODDS_RATIO,
            round3(symmetric_odds_ratio(strand)),
        );
        builder.set_genotypes(called);
        builder.set_alleles(target_alleles);

        for annotation in self.registry.iter() {
            if !variant.has_attribute(annotation.raw_key()) {
                continue;
            }
            builder.remove_attribute(annotation.raw_key());
            if self.config.strip_as_annotations {
                continue;
            }
            match annotation.finalize_raw(&builder, variant)? {
                Some(values) => {
                    for (key, value) in values {
                        builder.set_attribute(key, value);
                    }
                }
                None => trace!(
                    raw_key = annotation.raw_key(),
                    "annotation finalizer does not apply to this encoding; skipping"
                ),
            }
        }

        Ok(Some(builder.build()))
    }
}

/// A record has real variation only if it carries a concrete alternate:
/// an empty alternate list, or a lone symbolic or spanning-deletion
/// alternate, is not a reportable site.
fn is_properly_polymorphic(record: &VariantRecord) -> bool {
    let alts = record.alternate_alleles();
    match alts.len() {
        0 => false,
        1 => !(alts[0].is_symbolic() || alts[0].is_spanning_deletion()),
        _ => true,
    }
}

/// Indel-like sites gate against the indel threshold: the reference or
/// any alternate longer than one base.
fn is_indel_like(record: &VariantRecord) -> bool {
    record.reference_allele().length() > 1
        || record.alternate_alleles().iter().any(|a| a.length() > 1)
}

fn parse_strand_table(value: &AttributeValue) -> Result<[i64; 4], FinalizeError> {
    let list = value.to_int_list(keys::STRAND_BIAS_TABLE)?;
    let table: [i64; 4] = list.as_slice().try_into().map_err(|_| {
        AttributeError::malformed(
            keys::STRAND_BIAS_TABLE,
            format!("expected 4 strand counts, found {}", list.len()),
        )
    })?;
    Ok(table)
}

fn strand_table_counts(table: [i64; 4]) -> [u64; 4] {
    table.map(|count| count.max(0) as u64)
}

fn scalar_or_int_list(values: Vec<i64>) -> AttributeValue {
    if values.len() == 1 {
        AttributeValue::Int(values[0])
    } else {
        AttributeValue::IntList(values)
    }
}

fn scalar_or_float_list(values: Vec<f64>) -> AttributeValue {
    if values.len() == 1 {
        AttributeValue::Float(values[0])
    } else {
        AttributeValue::FloatList(values)
    }
}
