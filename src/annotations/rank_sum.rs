use super::ReducibleAnnotation;
use crate::model::{keys, AttributeError, AttributeValue, RecordBuilder, VariantRecord};
use crate::FinalizeError;

/// A compressed value histogram: `(value, count)` pairs.
#[derive(Debug, Default)]
struct Histogram {
    bins: Vec<(f64, u64)>,
}

impl Histogram {
    /// Parse one `v1,c1,v2,c2,...` segment. An empty segment is an empty
    /// histogram (no observations for that allele).
    fn parse(raw_key: &'static str, segment: &str) -> Result<Self, FinalizeError> {
        if segment.trim().is_empty() {
            return Ok(Self::default());
        }
        let parts: Vec<&str> = segment.split(',').collect();
        if parts.len() % 2 != 0 {
            return Err(AttributeError::malformed(
                raw_key,
                format!("histogram `{segment}` has an odd number of fields"),
            )
            .into());
        }
        let mut bins = Vec::with_capacity(parts.len() / 2);
        for pair in parts.chunks(2) {
            let value = pair[0]
                .trim()
                .parse::<f64>()
                .map_err(|e| AttributeError::malformed(raw_key, e))?;
            let count = pair[1]
                .trim()
                .parse::<u64>()
                .map_err(|e| AttributeError::malformed(raw_key, e))?;
            bins.push((value, count));
        }
        Ok(Self { bins })
    }

    /// Weighted median of the histogram, or `None` when empty.
    fn median(&self) -> Option<f64> {
        let total: u64 = self.bins.iter().map(|(_, count)| count).sum();
        if total == 0 {
            return None;
        }
        let mut sorted = self.bins.clone();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let lower_rank = (total - 1) / 2;
        let upper_rank = total / 2;
        let mut lower = None;
        let mut upper = None;
        let mut seen = 0u64;
        for (value, count) in sorted {
            if count == 0 {
                continue;
            }
            let last_rank = seen + count - 1;
            if lower.is_none() && last_rank >= lower_rank {
                lower = Some(value);
            }
            if upper.is_none() && last_rank >= upper_rank {
                upper = Some(value);
            }
            seen += count;
        }
        Some((lower? + upper?) / 2.0)
    }
}

/// Finalize a per-allele rank-sum histogram attribute: the raw payload is
/// `ref_hist|alt1_hist|...`; the finalized value is the weighted median
/// per alternate allele, aligned with the builder's alternate order.
/// Alternates without observations report NaN (rendered as missing by the
/// downstream serializer).
fn finalize_rank_sum(
    raw_key: &'static str,
    final_key: &str,
    builder: &RecordBuilder,
    original: &VariantRecord,
) -> Result<Option<Vec<(String, AttributeValue)>>, FinalizeError> {
    let text = match original.attribute(raw_key) {
        Some(AttributeValue::String(text)) => text,
        Some(_) => return Ok(None),
        None => return Ok(None),
    };
    let mut segments: Vec<&str> = text.split('|').collect();
    // a trailing separator leaves one empty segment past the last allele
    if segments.last().is_some_and(|s| s.trim().is_empty()) {
        segments.pop();
    }
    let alt_count = builder.alternate_alleles().len();
    if segments.len() < alt_count + 1 {
        return Ok(None);
    }
    let mut medians = Vec::with_capacity(alt_count);
    for segment in &segments[1..=alt_count] {
        let histogram = Histogram::parse(raw_key, segment)?;
        medians.push(histogram.median().unwrap_or(f64::NAN));
    }
    Ok(Some(vec![(
        final_key.to_string(),
        AttributeValue::FloatList(medians),
    )]))
}

/// Allele-specific mapping-quality rank-sum finalizer.
#[derive(Debug, Clone, Copy)]
pub struct AsMappingQualityRankSum;

impl ReducibleAnnotation for AsMappingQualityRankSum {
    fn raw_key(&self) -> &'static str {
        keys::AS_RAW_MQ_RANK_SUM
    }

    fn finalize_raw(
        &self,
        builder: &RecordBuilder,
        original: &VariantRecord,
    ) -> Result<Option<Vec<(String, AttributeValue)>>, FinalizeError> {
        finalize_rank_sum(self.raw_key(), keys::AS_MQ_RANK_SUM, builder, original)
    }
}

/// Allele-specific read-position rank-sum finalizer.
#[derive(Debug, Clone, Copy)]
pub struct AsReadPosRankSum;

impl ReducibleAnnotation for AsReadPosRankSum {
    fn raw_key(&self) -> &'static str {
        keys::AS_RAW_READ_POS_RANK_SUM
    }

    fn finalize_raw(
        &self,
        builder: &RecordBuilder,
        original: &VariantRecord,
    ) -> Result<Option<Vec<(String, AttributeValue)>>, FinalizeError> {
        finalize_rank_sum(self.raw_key(), keys::AS_READ_POS_RANK_SUM, builder, original)
    }
}
