use super::ReducibleAnnotation;
use crate::model::{keys, AttributeError, AttributeValue, RecordBuilder, VariantRecord};
use crate::stats::{fisher_exact_two_sided, phred_scaled_p_value, round3, symmetric_odds_ratio};
use crate::FinalizeError;

/// Parse the raw allele-specific strand table: per-allele `fwd,rev` pairs
/// joined with `|`, reference row first, e.g. `"20,21|2,9|0,0"`. Returns
/// `None` when the value is not the string encoding this family handles.
fn parse_strand_rows(value: &AttributeValue) -> Result<Option<Vec<[u64; 2]>>, FinalizeError> {
    let text = match value {
        AttributeValue::String(text) => text,
        _ => return Ok(None),
    };
    let mut rows = Vec::new();
    for segment in text.split('|') {
        let mut pair = [0u64; 2];
        let mut parts = segment.split(',');
        for slot in &mut pair {
            let part = parts.next().ok_or_else(|| {
                AttributeError::malformed(
                    keys::AS_STRAND_BIAS_TABLE,
                    format!("strand row `{segment}` is missing a count"),
                )
            })?;
            *slot = part.trim().parse::<u64>().map_err(|e| {
                AttributeError::malformed(keys::AS_STRAND_BIAS_TABLE, e)
            })?;
        }
        if parts.next().is_some() {
            return Err(AttributeError::malformed(
                keys::AS_STRAND_BIAS_TABLE,
                format!("strand row `{segment}` has more than two counts"),
            )
            .into());
        }
        rows.push(pair);
    }
    Ok(Some(rows))
}

/// Per-alternate 2x2 tables (reference row against each alternate row),
/// aligned with the builder's current alternate-allele order. The raw
/// table may carry a trailing placeholder row beyond the retained
/// alternates; rows past the target set are ignored.
fn per_alternate_tables(
    builder: &RecordBuilder,
    value: &AttributeValue,
) -> Result<Option<Vec<[u64; 4]>>, FinalizeError> {
    let rows = match parse_strand_rows(value)? {
        Some(rows) => rows,
        None => return Ok(None),
    };
    let alt_count = builder.alternate_alleles().len();
    if rows.len() < alt_count + 1 {
        // fewer rows than retained alleles: this encoding does not apply
        return Ok(None);
    }
    let reference = rows[0];
    Ok(Some(
        rows[1..=alt_count]
            .iter()
            .map(|alt| [reference[0], reference[1], alt[0], alt[1]])
            .collect(),
    ))
}

/// Allele-specific Fisher strand bias: one Phred-scaled p-value per
/// alternate allele, finalized from the raw strand table.
#[derive(Debug, Clone, Copy)]
pub struct AsFisherStrand;

impl ReducibleAnnotation for AsFisherStrand {
    fn raw_key(&self) -> &'static str {
        keys::AS_STRAND_BIAS_TABLE
    }

    fn finalize_raw(
        &self,
        builder: &RecordBuilder,
        original: &VariantRecord,
    ) -> Result<Option<Vec<(String, AttributeValue)>>, FinalizeError> {
        let value = match original.attribute(self.raw_key()) {
            Some(value) => value,
            None => return Ok(None),
        };
        let tables = match per_alternate_tables(builder, value)? {
            Some(tables) => tables,
            None => return Ok(None),
        };
        let values: Vec<f64> = tables
            .iter()
            .map(|table| round3(phred_scaled_p_value(fisher_exact_two_sided(*table))))
            .collect();
        Ok(Some(vec![(
            keys::AS_FISHER_STRAND.to_string(),
            AttributeValue::FloatList(values),
        )]))
    }
}

/// Allele-specific symmetric odds ratio, one value per alternate allele.
#[derive(Debug, Clone, Copy)]
pub struct AsStrandOddsRatio;

impl ReducibleAnnotation for AsStrandOddsRatio {
    fn raw_key(&self) -> &'static str {
        keys::AS_STRAND_BIAS_TABLE
    }

    fn finalize_raw(
        &self,
        builder: &RecordBuilder,
        original: &VariantRecord,
    ) -> Result<Option<Vec<(String, AttributeValue)>>, FinalizeError> {
        let value = match original.attribute(self.raw_key()) {
            Some(value) => value,
            None => return Ok(None),
        };
        let tables = match per_alternate_tables(builder, value)? {
            Some(tables) => tables,
            None => return Ok(None),
        };
        let values: Vec<f64> = tables
            .iter()
            .map(|table| round3(symmetric_odds_ratio(*table)))
            .collect();
        Ok(Some(vec![(
            keys::AS_STRAND_ODDS_RATIO.to_string(),
            AttributeValue::FloatList(values),
        )]))
    }
}
