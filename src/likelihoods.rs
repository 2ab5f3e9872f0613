//! Canonical indexing of diploid genotype-likelihood vectors.
//!
//! A PL vector for `n` alleles holds one entry per unordered allele pair
//! `(i, j)` with `i <= j`, at position `j(j+1)/2 + i`. Under that ordering
//! the vector for the first `k` alleles is a strict prefix of the vector
//! for `k + 1` alleles, which is what makes positional truncation valid
//! when the trailing placeholder allele is removed.

/// Fixed ploidy assumed for all real calls in this engine.
pub const ASSUMED_PLOIDY: usize = 2;

/// Unordered allele-index pair behind one PL vector position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllelePair {
    /// Smaller allele index.
    pub first: usize,
    /// Larger allele index.
    pub second: usize,
}

#[derive(Debug, Clone)]
struct TableEntry {
    num_genotypes: usize,
    pairs: Vec<AllelePair>,
}

/// Precomputed, immutable table mapping allele count to PL vector length
/// and the canonical enumeration of allele-index pairs.
///
/// Built once at startup for allele counts up to a configured maximum
/// (alternate count + reference); above that it falls back to the general
/// combinatorial formula. Freely shareable across threads.
#[derive(Debug)]
pub struct LikelihoodIndexTable {
    entries: Vec<TableEntry>,
}

impl LikelihoodIndexTable {
    /// Build the table for allele counts up to `max_alt_count + 1`.
    pub fn new(max_alt_count: usize) -> Self {
        let entries = (1..=max_alt_count + 1)
            .map(|allele_count| {
                let num_genotypes = allele_count * (allele_count + 1) / 2;
                let pairs = (0..num_genotypes).map(Self::pair_at).collect();
                TableEntry {
                    num_genotypes,
                    pairs,
                }
            })
            .collect();
        Self { entries }
    }

    /// Largest allele count with a cached enumeration.
    pub fn max_allele_count(&self) -> usize {
        self.entries.len()
    }

    /// PL vector length for the given allele count at the assumed ploidy.
    pub fn num_genotypes(&self, allele_count: usize) -> usize {
        if allele_count == 0 {
            return 0;
        }
        match self.entries.get(allele_count - 1) {
            Some(entry) => entry.num_genotypes,
            None => binomial(allele_count + ASSUMED_PLOIDY - 1, ASSUMED_PLOIDY),
        }
    }

    /// Canonical pair enumeration for the given allele count. Counts above
    /// the cached maximum are enumerated on the fly.
    pub fn pairs(&self, allele_count: usize) -> Vec<AllelePair> {
        match self.entries.get(allele_count.wrapping_sub(1)) {
            Some(entry) => entry.pairs.clone(),
            None => (0..self.num_genotypes(allele_count))
                .map(Self::pair_at)
                .collect(),
        }
    }

    /// Allele-index pair behind a PL vector position (closed form, valid
    /// for any position).
    pub fn pair_at(position: usize) -> AllelePair {
        let mut second = (((8.0 * position as f64 + 1.0).sqrt() - 1.0) / 2.0).floor() as usize;
        // guard against float rounding at triangle boundaries
        while (second + 1) * (second + 2) / 2 <= position {
            second += 1;
        }
        while second * (second + 1) / 2 > position {
            second -= 1;
        }
        AllelePair {
            first: position - second * (second + 1) / 2,
            second,
        }
    }

    /// PL positions whose pair contains the given allele index, for a
    /// vector over `allele_count` alleles, in enumeration order.
    pub fn positions_containing(&self, allele_index: usize, allele_count: usize) -> Vec<usize> {
        (0..self.num_genotypes(allele_count))
            .filter(|&pos| {
                let pair = Self::pair_at(pos);
                pair.first == allele_index || pair.second == allele_index
            })
            .collect()
    }
}

fn binomial(n: usize, k: usize) -> usize {
    let k = k.min(n - k);
    let mut result: usize = 1;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}
