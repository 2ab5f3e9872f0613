//! Attribute keys read and written by the finalization engine.

/// Total read depth at the site.
pub const DEPTH: &str = "DP";
/// Raw sum of evidence supporting variation, set by the upstream reblocker.
pub const RAW_QUAL_APPROX: &str = "QUALapprox";
/// Total depth across variant-supporting reads (denominator of QD).
pub const VARIANT_DEPTH: &str = "VarDP";
/// Finalized quality-by-depth.
pub const QUAL_BY_DEPTH: &str = "QD";
/// Allele count per alternate allele.
pub const ALLELE_COUNT: &str = "AC";
/// Allele frequency per alternate allele.
pub const ALLELE_FREQUENCY: &str = "AF";
/// Total number of called alleles.
pub const ALLELE_NUMBER: &str = "AN";
/// Phred-scaled Fisher strand-bias statistic.
pub const FISHER_STRAND: &str = "FS";
/// Symmetric odds ratio strand-bias statistic.
pub const STRAND_ODDS_RATIO: &str = "SOR";
/// Finalized RMS mapping quality.
pub const MAPPING_QUALITY: &str = "MQ";
/// Raw mapping-quality aggregate: squared-MQ sum and depth.
pub const RAW_MAPPING_QUALITY_WITH_DEPTH: &str = "RAW_MQandDP";
/// Record-level 2x2 strand-bias contingency table (site-only records).
pub const STRAND_BIAS_TABLE: &str = "SB_TABLE";
/// Per-sample strand-bias counts, comma-joined.
pub const STRAND_BIAS_BY_SAMPLE: &str = "SB";
/// Upstream-only minimum-depth marker, dropped during finalization.
pub const MIN_DEPTH: &str = "MIN_DP";
/// Reference-homozygous likelihood retained by the summarize mode.
pub const REFERENCE_GENOTYPE_QUALITY: &str = "RGQ";
/// Summarize mode: quality by allele balance.
pub const GQ_BY_ALLELE_BALANCE: &str = "ABGQ";
/// Summarize mode: quality by alternate confidence.
pub const GQ_BY_ALT_CONFIDENCE: &str = "ALTGQ";
/// Raw allele-specific strand-bias table.
pub const AS_STRAND_BIAS_TABLE: &str = "AS_SB_TABLE";
/// Finalized allele-specific Fisher strand statistic.
pub const AS_FISHER_STRAND: &str = "AS_FS";
/// Finalized allele-specific symmetric odds ratio.
pub const AS_STRAND_ODDS_RATIO: &str = "AS_SOR";
/// Raw allele-specific mapping-quality rank-sum histogram.
pub const AS_RAW_MQ_RANK_SUM: &str = "AS_RAW_MQRankSum";
/// Finalized allele-specific mapping-quality rank sum.
pub const AS_MQ_RANK_SUM: &str = "AS_MQRankSum";
/// Raw allele-specific read-position rank-sum histogram.
pub const AS_RAW_READ_POS_RANK_SUM: &str = "AS_RAW_ReadPosRankSum";
/// Finalized allele-specific read-position rank sum.
pub const AS_READ_POS_RANK_SUM: &str = "AS_ReadPosRankSum";
