use tracing::warn;

use super::ReducibleAnnotation;
use crate::model::{keys, AttributeError, AttributeValue, RecordBuilder, VariantRecord};
use crate::stats::round2;
use crate::FinalizeError;

/// Root-mean-square mapping quality.
///
/// The raw payload is a two-entry aggregate `[sum of squared MQ, depth]`;
/// finalization emits `MQ = sqrt(sum / depth)`. The record finalizer
/// invokes this directly before the registry pass, but it implements the
/// registry capability as well.
#[derive(Debug, Clone, Copy)]
pub struct RmsMappingQuality;

impl RmsMappingQuality {
    /// Finalize the raw mapping quality on the builder: remove the raw
    /// key and set the finalized `MQ` attribute. A record without the raw
    /// key is left unchanged.
    pub fn apply(
        &self,
        builder: &mut RecordBuilder,
        original: &VariantRecord,
    ) -> Result<(), FinalizeError> {
        if !original.has_attribute(self.raw_key()) {
            return Ok(());
        }
        let finalized = self.finalize_raw(builder, original)?;
        builder.remove_attribute(self.raw_key());
        if let Some(values) = finalized {
            for (key, value) in values {
                builder.set_attribute(key, value);
            }
        }
        Ok(())
    }

    fn parse_raw(value: &AttributeValue) -> Result<Option<(f64, i64)>, FinalizeError> {
        let pair = match value {
            AttributeValue::IntList(list) => list.clone(),
            AttributeValue::String(_) => value.to_int_list(keys::RAW_MAPPING_QUALITY_WITH_DEPTH)?,
            _ => return Ok(None),
        };
        if pair.len() != 2 {
            return Err(AttributeError::malformed(
                keys::RAW_MAPPING_QUALITY_WITH_DEPTH,
                format!("expected [squared-MQ sum, depth], found {} entries", pair.len()),
            )
            .into());
        }
        Ok(Some((pair[0] as f64, pair[1])))
    }
}

impl ReducibleAnnotation for RmsMappingQuality {
    fn raw_key(&self) -> &'static str {
        keys::RAW_MAPPING_QUALITY_WITH_DEPTH
    }

    fn finalize_raw(
        &self,
        _builder: &RecordBuilder,
        original: &VariantRecord,
    ) -> Result<Option<Vec<(String, AttributeValue)>>, FinalizeError> {
        let value = match original.attribute(self.raw_key()) {
            Some(value) => value,
            None => return Ok(None),
        };
        let (sum_sq, depth) = match Self::parse_raw(value)? {
            Some(parsed) => parsed,
            None => return Ok(None),
        };
        if depth <= 0 {
            warn!(
                contig = original.contig(),
                position = original.position(),
                "raw mapping-quality aggregate has zero depth; omitting MQ"
            );
            return Ok(Some(Vec::new()));
        }
        let mq = round2((sum_sq / depth as f64).sqrt());
        Ok(Some(vec![(
            keys::MAPPING_QUALITY.to_string(),
            AttributeValue::Float(mq),
        )]))
    }
}
