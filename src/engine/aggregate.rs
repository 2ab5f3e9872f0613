use std::collections::HashMap;

use crate::model::Allele;

/// Per-record accumulator for allele counts and the 2x2 strand table.
///
/// Counts are zero-initialized for every target allele so that alleles
/// with no observations still appear in the output summaries. One
/// finalization call owns the aggregator for exactly one record;
/// thread-unsafe by design.
#[derive(Debug)]
pub struct AlleleStatsAggregator {
    counts: HashMap<Allele, u32>,
    strand_table: [i64; 4],
}

impl AlleleStatsAggregator {
    /// Create an aggregator with zeroed counts for the target alleles.
    pub fn new(target_alleles: &[Allele]) -> Self {
        let counts = target_alleles
            .iter()
            .map(|allele| (allele.clone(), 0))
            .collect();
        Self {
            counts,
            strand_table: [0; 4],
        }
    }

    /// Record one called copy of an allele. No-call sentinels are ignored.
    pub fn record_allele(&mut self, allele: &Allele) {
        if allele.is_no_call() {
            return;
        }
        *self.counts.entry(allele.clone()).or_insert(0) += 1;
    }

    /// Observed count for an allele (zero when never recorded).
    pub fn count(&self, allele: &Allele) -> u32 {
        self.counts.get(allele).copied().unwrap_or(0)
    }

    /// Sum of called allele occurrences across the given target alleles.
    pub fn called_allele_number(&self, target_alleles: &[Allele]) -> u32 {
        target_alleles.iter().map(|a| self.count(a)).sum()
    }

    /// Add a per-sample strand contribution element-wise.
    pub fn add_strand_counts(&mut self, counts: &[i64; 4]) {
        for (slot, value) in self.strand_table.iter_mut().zip(counts) {
            *slot += value;
        }
    }

    /// Replace the strand table wholesale (site-only records read it back
    /// from a record attribute instead of accumulating).
    pub fn set_strand_table(&mut self, table: [i64; 4]) {
        self.strand_table = table;
    }

    /// Accumulated strand table.
    pub fn strand_table(&self) -> [i64; 4] {
        self.strand_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strand_contributions_accumulate_element_wise() {
        let mut stats = AlleleStatsAggregator::new(&[]);
        stats.add_strand_counts(&[1, 2, 3, 4]);
        stats.add_strand_counts(&[0, 1, 0, 1]);
        assert_eq!(stats.strand_table(), [1, 3, 3, 5]);
    }

    #[test]
    fn zero_count_alleles_still_present() {
        let reference = Allele::reference("A");
        let alt = Allele::alternate("T");
        let mut stats = AlleleStatsAggregator::new(&[reference.clone(), alt.clone()]);
        stats.record_allele(&reference);
        stats.record_allele(&reference);
        assert_eq!(stats.count(&reference), 2);
        assert_eq!(stats.count(&alt), 0);
        assert_eq!(stats.called_allele_number(&[reference, alt]), 2);
    }

    #[test]
    fn no_call_contributes_nothing() {
        let mut stats = AlleleStatsAggregator::new(&[]);
        stats.record_allele(&Allele::no_call());
        assert_eq!(stats.count(&Allele::no_call()), 0);
    }
}
