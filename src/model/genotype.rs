use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Allele, AttributeValue};

/// One sample's genotype within a variant record.
///
/// The called alleles reference the owning record's allele list; the PL
/// vector, when present, is indexed by the canonical diploid enumeration
/// over that same list. Extended attributes hold whatever per-sample
/// fields the upstream producer attached.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleGenotype {
    sample: Arc<str>,
    alleles: Vec<Allele>,
    pls: Option<Vec<i32>>,
    ads: Option<Vec<i32>>,
    gq: Option<i32>,
    log10_perror: Option<f64>,
    attributes: BTreeMap<String, AttributeValue>,
}

impl SampleGenotype {
    /// Construct a genotype with called alleles only.
    pub fn new(sample: impl Into<Arc<str>>, alleles: Vec<Allele>) -> Self {
        Self {
            sample: sample.into(),
            alleles,
            pls: None,
            ads: None,
            gq: None,
            log10_perror: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Attach a Phred-scaled genotype-likelihood vector.
    pub fn with_pls(mut self, pls: Vec<i32>) -> Self {
        self.pls = Some(pls);
        self
    }

    /// Attach a per-allele depth vector.
    pub fn with_ads(mut self, ads: Vec<i32>) -> Self {
        self.ads = Some(ads);
        self
    }

    /// Attach a genotype quality.
    pub fn with_gq(mut self, gq: i32) -> Self {
        self.gq = Some(gq);
        self
    }

    /// Attach an extended attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Sample identifier.
    pub fn sample(&self) -> &str {
        &self.sample
    }

    /// Shared handle to the sample identifier.
    pub fn sample_arc(&self) -> Arc<str> {
        Arc::clone(&self.sample)
    }

    /// Number of allele copies in the call.
    pub fn ploidy(&self) -> usize {
        self.alleles.len()
    }

    /// Called alleles, in call order.
    pub fn alleles(&self) -> &[Allele] {
        &self.alleles
    }

    /// Called allele at the given copy index.
    pub fn allele(&self, index: usize) -> Option<&Allele> {
        self.alleles.get(index)
    }

    /// How many copies of the given allele the call carries.
    pub fn count_allele(&self, allele: &Allele) -> usize {
        self.alleles.iter().filter(|a| *a == allele).count()
    }

    /// Whether the call is heterozygous (assumes diploid).
    pub fn is_het(&self) -> bool {
        self.alleles.len() == 2 && self.alleles[0] != self.alleles[1]
    }

    /// Whether every called allele is the reference allele.
    pub fn is_hom_ref(&self) -> bool {
        !self.alleles.is_empty() && self.alleles.iter().all(Allele::is_reference)
    }

    /// Phred-scaled genotype-likelihood vector, if present.
    pub fn pls(&self) -> Option<&[i32]> {
        self.pls.as_deref()
    }

    /// Per-allele depth vector, if present.
    pub fn ads(&self) -> Option<&[i32]> {
        self.ads.as_deref()
    }

    /// Genotype quality, if present.
    pub fn gq(&self) -> Option<i32> {
        self.gq
    }

    /// Per-sample call quality in log10-error convention, if present.
    pub fn log10_perror(&self) -> Option<f64> {
        self.log10_perror
    }

    /// Extended per-sample attributes.
    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    /// Extended attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub(crate) fn set_alleles(&mut self, alleles: Vec<Allele>) {
        self.alleles = alleles;
    }

    pub(crate) fn set_pls(&mut self, pls: Option<Vec<i32>>) {
        self.pls = pls;
    }

    pub(crate) fn set_ads(&mut self, ads: Option<Vec<i32>>) {
        self.ads = ads;
    }

    pub(crate) fn set_gq(&mut self, gq: Option<i32>) {
        self.gq = gq;
    }

    pub(crate) fn set_log10_perror(&mut self, log10_perror: Option<f64>) {
        self.log10_perror = log10_perror;
    }

    pub(crate) fn set_attribute(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(key.into(), value);
    }

    pub(crate) fn remove_attribute(&mut self, key: &str) {
        self.attributes.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zygosity_helpers() {
        let reference = Allele::reference("A");
        let alt = Allele::alternate("T");
        let het = SampleGenotype::new("s1", vec![reference.clone(), alt.clone()]);
        assert!(het.is_het());
        assert!(!het.is_hom_ref());

        let hom_ref = SampleGenotype::new("s2", vec![reference.clone(), reference.clone()]);
        assert!(hom_ref.is_hom_ref());
        assert_eq!(hom_ref.count_allele(&reference), 2);
        assert_eq!(hom_ref.count_allele(&alt), 0);
    }
}
