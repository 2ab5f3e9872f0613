//! Strand-bias statistics over the 2x2 forward/reverse contingency table.
//!
//! The table layout is `[ref_fwd, ref_rev, alt_fwd, alt_rev]` throughout.

use statrs::function::gamma::ln_gamma;

/// Floor applied to p-values before Phred scaling, matching the smallest
/// positive normal double the output format can represent.
const MIN_P_VALUE: f64 = 1e-320;

/// Pseudocount added to every cell of the symmetric-odds-ratio table.
const SOR_PSEUDOCOUNT: f64 = 1.0;

/// Relative slack when comparing hypergeometric probabilities against the
/// observed one, absorbing floating-point noise in the two-sided sum.
const REL_TOLERANCE: f64 = 1e-7;

fn ln_binomial(n: u64, k: u64) -> f64 {
    ln_gamma(n as f64 + 1.0) - ln_gamma(k as f64 + 1.0) - ln_gamma((n - k) as f64 + 1.0)
}

fn hypergeometric_prob(a: u64, row1: u64, row2: u64, col1: u64) -> f64 {
    let total = row1 + row2;
    (ln_binomial(row1, a) + ln_binomial(row2, col1 - a) - ln_binomial(total, col1)).exp()
}

/// Two-sided Fisher exact test p-value for the 2x2 table: the sum of all
/// hypergeometric outcomes no more probable than the observed one.
pub fn fisher_exact_two_sided(table: [u64; 4]) -> f64 {
    let [a, b, c, d] = table;
    let row1 = a + b;
    let row2 = c + d;
    let col1 = a + c;
    let total = row1 + row2;
    if total == 0 {
        return 1.0;
    }

    let observed = hypergeometric_prob(a, row1, row2, col1);
    let lo = col1.saturating_sub(row2);
    let hi = col1.min(row1);

    let mut p = 0.0;
    for k in lo..=hi {
        let prob = hypergeometric_prob(k, row1, row2, col1);
        if prob <= observed * (1.0 + REL_TOLERANCE) {
            p += prob;
        }
    }
    p.min(1.0)
}

/// Symmetric odds ratio of the 2x2 table, in natural-log scale.
///
/// Each cell gets a pseudocount of one; the symmetric ratio `R + 1/R` is
/// scaled by the ratio of row imbalances so that a site biased in both
/// rows equally does not score.
pub fn symmetric_odds_ratio(table: [u64; 4]) -> f64 {
    let t00 = table[0] as f64 + SOR_PSEUDOCOUNT;
    let t01 = table[1] as f64 + SOR_PSEUDOCOUNT;
    let t10 = table[2] as f64 + SOR_PSEUDOCOUNT;
    let t11 = table[3] as f64 + SOR_PSEUDOCOUNT;

    let ratio = (t00 / t01) * (t11 / t10) + (t01 / t00) * (t10 / t11);
    let ref_ratio = t00.min(t01) / t00.max(t01);
    let alt_ratio = t10.min(t11) / t10.max(t11);
    (ratio * ref_ratio / alt_ratio).ln()
}

/// Phred-scale a p-value: `-10 * log10(max(p, floor))`.
pub fn phred_scaled_p_value(p: f64) -> f64 {
    -10.0 * p.max(MIN_P_VALUE).log10()
}

/// Round to three decimals, the precision used for record-level
/// strand-bias attributes.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Round to two decimals, the precision used for the finalized RMS
/// mapping quality.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fisher_matches_hand_computed_table() {
        // margins 4/4/4: p(a) over a=0..4 is {1,16,36,16,1}/70; observing
        // a=3 gives the classic two-sided sum 34/70.
        let p = fisher_exact_two_sided([3, 1, 1, 3]);
        assert_relative_eq!(p, 34.0 / 70.0, epsilon = 1e-9);
    }

    #[test]
    fn fisher_of_empty_or_balanced_tables_is_one() {
        assert_eq!(fisher_exact_two_sided([0, 0, 0, 0]), 1.0);
        assert_relative_eq!(fisher_exact_two_sided([5, 5, 5, 5]), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn fisher_of_extreme_table_is_small() {
        let p = fisher_exact_two_sided([20, 0, 0, 20]);
        assert!(p < 1e-9, "extreme table should be highly significant, got {p}");
    }

    #[test]
    fn sor_of_empty_table_is_ln_two() {
        // all cells become the pseudocount, so R + 1/R = 2 and both row
        // ratios are 1
        assert_relative_eq!(symmetric_odds_ratio([0, 0, 0, 0]), 2f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn sor_grows_with_opposed_row_bias() {
        let balanced = symmetric_odds_ratio([10, 10, 10, 10]);
        let biased = symmetric_odds_ratio([20, 0, 0, 20]);
        assert!(biased > balanced);
    }

    #[test]
    fn phred_scaling_and_rounding() {
        assert_relative_eq!(phred_scaled_p_value(0.01), 20.0, epsilon = 1e-9);
        assert_eq!(round3(1.23456), 1.235);
        assert_eq!(round2(3.14159), 3.14);
        // the floor keeps the scale finite for vanishing p-values
        assert!(phred_scaled_p_value(0.0) <= 3200.0);
    }
}
