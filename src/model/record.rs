use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Allele, AttributeError, AttributeValue, SampleGenotype};

/// A multi-sample variant record.
///
/// The allele list (reference first, placeholder last when present) is the
/// sole index space for every per-sample likelihood and depth vector.
/// Records are rewritten through [`RecordBuilder`], never mutated in place.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariantRecord {
    contig: Arc<str>,
    position: u64,
    alleles: Vec<Allele>,
    log10_perror: Option<f64>,
    attributes: BTreeMap<String, AttributeValue>,
    genotypes: Vec<SampleGenotype>,
}

impl VariantRecord {
    /// Contig name.
    pub fn contig(&self) -> &str {
        &self.contig
    }

    /// 1-based position on the contig.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Full allele list, reference first.
    pub fn alleles(&self) -> &[Allele] {
        &self.alleles
    }

    /// The reference allele.
    pub fn reference_allele(&self) -> &Allele {
        &self.alleles[0]
    }

    /// Alternate alleles in record order.
    pub fn alternate_alleles(&self) -> &[Allele] {
        &self.alleles[1..]
    }

    /// Whether the placeholder sentinel appears in the allele list.
    pub fn has_placeholder(&self) -> bool {
        self.alleles.iter().any(Allele::is_placeholder)
    }

    /// Record quality in Phred scale, when set.
    pub fn quality(&self) -> Option<f64> {
        self.log10_perror.map(|lp| lp * -10.0)
    }

    /// Record quality in log10-error convention, when set.
    pub fn log10_perror(&self) -> Option<f64> {
        self.log10_perror
    }

    /// Record-level attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Whether the record carries the given attribute.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// All record-level attributes.
    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    /// Attribute converted to a float, with a default when absent.
    /// Malformed numeric strings are fatal for the record.
    pub fn attribute_as_f64(&self, key: &str, default: f64) -> Result<f64, AttributeError> {
        match self.attributes.get(key) {
            Some(value) => value.to_f64(key),
            None => Ok(default),
        }
    }

    /// Attribute converted to an integer, with a default when absent.
    pub fn attribute_as_i64(&self, key: &str, default: i64) -> Result<i64, AttributeError> {
        match self.attributes.get(key) {
            Some(value) => value.to_i64(key),
            None => Ok(default),
        }
    }

    /// Per-sample genotypes.
    pub fn genotypes(&self) -> &[SampleGenotype] {
        &self.genotypes
    }

    /// Whether the record carries any genotypes (site-only otherwise).
    pub fn has_genotypes(&self) -> bool {
        !self.genotypes.is_empty()
    }
}

/// Builder producing a new [`VariantRecord`], seeded either from scratch
/// or from an existing record.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    contig: Arc<str>,
    position: u64,
    alleles: Vec<Allele>,
    log10_perror: Option<f64>,
    attributes: BTreeMap<String, AttributeValue>,
    genotypes: Vec<SampleGenotype>,
}

impl RecordBuilder {
    /// Start a fresh record from its site coordinates and allele list.
    pub fn new(contig: impl Into<Arc<str>>, position: u64, alleles: Vec<Allele>) -> Self {
        Self {
            contig: contig.into(),
            position,
            alleles,
            log10_perror: None,
            attributes: BTreeMap::new(),
            genotypes: Vec::new(),
        }
    }

    /// Seed the builder from an existing record.
    pub fn from_record(record: &VariantRecord) -> Self {
        Self {
            contig: Arc::clone(&record.contig),
            position: record.position,
            alleles: record.alleles.clone(),
            log10_perror: record.log10_perror,
            attributes: record.attributes.clone(),
            genotypes: record.genotypes.clone(),
        }
    }

    /// Chain an attribute onto the builder.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Chain a genotype onto the builder.
    pub fn with_genotype(mut self, genotype: SampleGenotype) -> Self {
        self.genotypes.push(genotype);
        self
    }

    /// Set or replace an attribute.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Remove an attribute if present.
    pub fn remove_attribute(&mut self, key: &str) {
        self.attributes.remove(key);
    }

    /// Replace the allele list.
    pub fn set_alleles(&mut self, alleles: Vec<Allele>) {
        self.alleles = alleles;
    }

    /// Replace the genotype collection.
    pub fn set_genotypes(&mut self, genotypes: Vec<SampleGenotype>) {
        self.genotypes = genotypes;
    }

    /// Set the record quality in log10-error convention.
    pub fn set_log10_perror(&mut self, log10_perror: f64) {
        self.log10_perror = Some(log10_perror);
    }

    /// Current attribute state, visible to annotation finalizers.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Current allele list.
    pub fn alleles(&self) -> &[Allele] {
        &self.alleles
    }

    /// Alternate alleles of the current allele list.
    pub fn alternate_alleles(&self) -> &[Allele] {
        &self.alleles[1..]
    }

    /// Current genotype collection.
    pub fn genotypes(&self) -> &[SampleGenotype] {
        &self.genotypes
    }

    /// Produce the finished record.
    pub fn build(self) -> VariantRecord {
        VariantRecord {
            contig: self.contig,
            position: self.position,
            alleles: self.alleles,
            log10_perror: self.log10_perror,
            attributes: self.attributes,
            genotypes: self.genotypes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snp_alleles() -> Vec<Allele> {
        vec![Allele::reference("A"), Allele::alternate("T")]
    }

    #[test]
    fn builder_round_trips_a_record() {
        let record = RecordBuilder::new("chr1", 101, snp_alleles())
            .with_attribute("DP", 30)
            .with_genotype(SampleGenotype::new("s1", snp_alleles()))
            .build();

        assert_eq!(record.contig(), "chr1");
        assert_eq!(record.position(), 101);
        assert_eq!(record.alternate_alleles().len(), 1);
        assert!(record.has_genotypes());

        let rebuilt = RecordBuilder::from_record(&record).build();
        assert_eq!(rebuilt, record);
    }

    #[test]
    fn attribute_defaults_apply_when_absent() {
        let record = RecordBuilder::new("chr1", 101, snp_alleles()).build();
        assert_eq!(record.attribute_as_f64("QUALapprox", 0.0).unwrap(), 0.0);
        assert_eq!(record.attribute_as_i64("DP", 0).unwrap(), 0);
    }

    #[test]
    fn quality_follows_log10_convention() {
        let mut builder = RecordBuilder::new("chr1", 101, snp_alleles());
        builder.set_log10_perror(-10.0);
        assert_eq!(builder.build().quality(), Some(100.0));
    }
}
