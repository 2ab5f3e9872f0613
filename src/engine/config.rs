use crate::likelihoods::ASSUMED_PLOIDY;

/// Default base confidence for emitting a call, in Phred units.
const DEFAULT_STANDARD_CONFIDENCE: f64 = 30.0;
/// Population heterozygosity prior for SNP sites.
const DEFAULT_SNP_HETEROZYGOSITY: f64 = 1e-3;
/// Population heterozygosity prior for indel sites.
const DEFAULT_INDEL_HETEROZYGOSITY: f64 = 1.25e-4;
/// Largest alternate-allele count with precomputed PL bookkeeping.
const DEFAULT_MAX_ALT_COUNT: usize = 6;

/// Configuration for the record finalization engine.
///
/// The defaults carry the production constants; the two boolean modes are
/// opt-in via the `with_*` builders.
#[derive(Debug, Clone)]
pub struct FinalizeConfig {
    /// Base confidence for emitting a call, in Phred units.
    pub standard_confidence: f64,
    /// Heterozygosity prior used for SNP-site thresholds.
    pub snp_heterozygosity: f64,
    /// Heterozygosity prior used for indel-site thresholds.
    pub indel_heterozygosity: f64,
    /// Largest alternate-allele count cached by the likelihood table.
    pub max_alt_count: usize,
    /// Replace PL vectors with summarized quality scalars (RGQ/ABGQ/ALTGQ).
    /// Saves output size for very large cohorts; off by default.
    pub summarize_pls: bool,
    /// Remove raw allele-specific annotations without computing finalized
    /// replacements; off by default.
    pub strip_as_annotations: bool,
}

impl Default for FinalizeConfig {
    fn default() -> Self {
        Self {
            standard_confidence: DEFAULT_STANDARD_CONFIDENCE,
            snp_heterozygosity: DEFAULT_SNP_HETEROZYGOSITY,
            indel_heterozygosity: DEFAULT_INDEL_HETEROZYGOSITY,
            max_alt_count: DEFAULT_MAX_ALT_COUNT,
            summarize_pls: false,
            strip_as_annotations: false,
        }
    }
}

impl FinalizeConfig {
    /// Enable or disable the summarized-PL output mode.
    pub fn with_summarized_pls(mut self, enabled: bool) -> Self {
        self.summarize_pls = enabled;
        self
    }

    /// Enable or disable stripping of raw allele-specific annotations.
    pub fn with_stripped_annotations(mut self, enabled: bool) -> Self {
        self.strip_as_annotations = enabled;
        self
    }

    /// Quality gate for SNP sites: `confidence - 10*log10(prior)`.
    pub fn snp_qual_threshold(&self) -> f64 {
        self.standard_confidence - 10.0 * self.snp_heterozygosity.log10()
    }

    /// Quality gate for indel sites.
    pub fn indel_qual_threshold(&self) -> f64 {
        self.standard_confidence - 10.0 * self.indel_heterozygosity.log10()
    }

    /// Ploidy assumed for every real call.
    pub fn ploidy(&self) -> usize {
        ASSUMED_PLOIDY
    }
}
