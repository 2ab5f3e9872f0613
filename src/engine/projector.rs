use crate::engine::{AlleleStatsAggregator, FinalizeConfig};
use crate::likelihoods::LikelihoodIndexTable;
use crate::model::{keys, Allele, AttributeError, AttributeValue, SampleGenotype, VariantRecord};
use crate::FinalizeError;

/// Per-sample projection: strips the placeholder allele's contribution
/// from one sample's depth/likelihood vectors, re-derives the called
/// genotype and genotype quality, and reports observed alleles and strand
/// counts into the caller's aggregator.
#[derive(Debug)]
pub struct GenotypeProjector<'a> {
    table: &'a LikelihoodIndexTable,
    config: &'a FinalizeConfig,
    record: &'a VariantRecord,
    target_alleles: &'a [Allele],
    placeholder_removed: bool,
    target_pl_len: usize,
}

impl<'a> GenotypeProjector<'a> {
    /// Bind a projector to one record and its working allele list.
    pub fn new(
        table: &'a LikelihoodIndexTable,
        config: &'a FinalizeConfig,
        record: &'a VariantRecord,
        target_alleles: &'a [Allele],
        placeholder_removed: bool,
    ) -> Self {
        let target_pl_len = table.num_genotypes(target_alleles.len());
        Self {
            table,
            config,
            record,
            target_alleles,
            placeholder_removed,
            target_pl_len,
        }
    }

    /// Project one sample onto the working allele list, feeding the
    /// shared per-record aggregator.
    pub fn project(
        &self,
        genotype: &SampleGenotype,
        stats: &mut AlleleStatsAggregator,
    ) -> Result<SampleGenotype, FinalizeError> {
        let merge_no_call = is_merge_no_call(genotype);
        if genotype.ploidy() != self.config.ploidy() && !merge_no_call {
            return Err(FinalizeError::NonDiploidSample {
                sample: genotype.sample().to_string(),
                contig: self.record.contig().to_string(),
                position: self.record.position(),
                ploidy: genotype.ploidy(),
            });
        }

        let mut out = genotype.clone();
        if merge_no_call || genotype.alleles().iter().any(Allele::is_placeholder) {
            out.set_alleles(self.no_call_pair());
            out.set_gq(None);
            out.set_log10_perror(None);
        } else if self.placeholder_removed {
            if let Some(ads) = genotype.ads() {
                let keep = self.target_alleles.len().min(ads.len());
                out.set_ads(Some(ads[..keep].to_vec()));
            }
        }

        // Upstream merges may hand back no-call genotypes with intact
        // likelihoods, so the call is always re-derived from the vector
        // rather than trusted.
        if let Some(pls) = genotype.pls() {
            if self.config.summarize_pls {
                self.summarize_pls(&mut out, genotype, pls);
            } else {
                if pls.len() < self.target_pl_len {
                    return Err(FinalizeError::LikelihoodVectorTooShort {
                        sample: genotype.sample().to_string(),
                        expected: self.target_pl_len,
                        actual: pls.len(),
                    });
                }
                let trimmed = pls[..self.target_pl_len].to_vec();
                out.set_gq(Some(second_smallest_minus_smallest(&trimmed)));
                self.call_from_likelihoods(&mut out, &trimmed);
                out.set_pls(Some(trimmed));
            }
        }

        out.remove_attribute(keys::MIN_DEPTH);

        if let Some(value) = genotype.attribute(keys::STRAND_BIAS_BY_SAMPLE) {
            stats.add_strand_counts(&parse_strand_counts(value)?);
        }
        for allele in out.alleles() {
            stats.record_allele(allele);
        }
        Ok(out)
    }

    /// Re-derive the call from a (possibly truncated) PL vector: the pair
    /// at the minimum-PL position wins, ties to the lowest position.
    fn call_from_likelihoods(&self, out: &mut SampleGenotype, pls: &[i32]) {
        if !is_informative(pls) {
            out.set_alleles(self.no_call_pair());
            out.set_gq(None);
            out.set_log10_perror(None);
            return;
        }
        let best = min_position(pls);
        let pair = LikelihoodIndexTable::pair_at(best);
        out.set_alleles(vec![
            self.target_alleles[pair.first].clone(),
            self.target_alleles[pair.second].clone(),
        ]);
        if self.target_alleles.len() > 1 {
            out.set_log10_perror(Some(-f64::from(pls[0] - pls[best]) / 10.0));
        }
    }

    /// Summarized output mode: replace the PL vector with RGQ (the raw
    /// reference-homozygous likelihood), ABGQ (quality by allele balance)
    /// and ALTGQ (quality by alternate confidence), computed against the
    /// original untruncated vector and full allele list.
    fn summarize_pls(&self, out: &mut SampleGenotype, genotype: &SampleGenotype, pls: &[i32]) {
        let record_alleles = self.record.alleles();
        let allele_count = record_alleles.len();
        let called_indices: Vec<usize> = genotype
            .alleles()
            .iter()
            .filter_map(|allele| record_alleles.iter().position(|a| a == allele))
            .collect();
        let called_positions = self.positions_for_indices(&called_indices, allele_count);

        let mut abgq = i32::MAX;
        let mut altgq = i32::MAX;
        if genotype.is_het() {
            for &pos in &called_positions {
                match pls.get(pos) {
                    Some(&pl) if pl != 0 && pl < abgq => abgq = pl,
                    _ => {}
                }
            }
        } else {
            // homozygous: any position sharing an allele index with the call
            for (pos, &pl) in pls.iter().enumerate() {
                if pl == 0 {
                    continue;
                }
                let pair = LikelihoodIndexTable::pair_at(pos);
                if (called_indices.contains(&pair.first) || called_indices.contains(&pair.second))
                    && pl < abgq
                {
                    abgq = pl;
                }
            }
            if genotype.is_hom_ref() {
                altgq = abgq;
            }
        }

        if !genotype.is_hom_ref() {
            for allele in genotype.alleles() {
                if allele.is_reference() {
                    continue;
                }
                // drop this alternate from the comparison set
                let comparison: Vec<usize> = record_alleles
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| *a != allele)
                    .map(|(idx, _)| idx)
                    .collect();
                for pos in self.positions_for_indices(&comparison, allele_count) {
                    match pls.get(pos) {
                        Some(&pl) if pl < altgq => altgq = pl,
                        _ => {}
                    }
                }
            }
        }

        out.set_attribute(keys::REFERENCE_GENOTYPE_QUALITY, AttributeValue::from(pls[0]));
        out.set_attribute(keys::GQ_BY_ALLELE_BALANCE, AttributeValue::from(abgq));
        out.set_attribute(keys::GQ_BY_ALT_CONFIDENCE, AttributeValue::from(altgq));
        out.set_pls(None);
    }

    /// Distinct PL positions containing any of the given allele indices,
    /// in discovery order.
    fn positions_for_indices(&self, indices: &[usize], allele_count: usize) -> Vec<usize> {
        let mut positions = Vec::new();
        for &index in indices {
            for pos in self.table.positions_containing(index, allele_count) {
                if !positions.contains(&pos) {
                    positions.push(pos);
                }
            }
        }
        positions
    }

    fn no_call_pair(&self) -> Vec<Allele> {
        vec![Allele::no_call(); self.config.ploidy()]
    }
}

/// Upstream merge tools encode no-calls as a ploidy-1 genotype carrying a
/// reference or no-call allele. Required compatibility rule.
fn is_merge_no_call(genotype: &SampleGenotype) -> bool {
    genotype.ploidy() == 1
        && genotype
            .allele(0)
            .map(|a| a.is_reference() || a.is_no_call())
            .unwrap_or(false)
}

/// A PL vector supports a call only when it has at least two entries, is
/// not flat, and carries more than a single Phred unit of signal.
fn is_informative(pls: &[i32]) -> bool {
    if pls.len() < 2 {
        return false;
    }
    let first = pls[0];
    if pls.iter().all(|&pl| pl == first) {
        return false;
    }
    pls.iter().map(|&pl| i64::from(pl)).sum::<i64>() > 1
}

/// Position of the smallest PL (most likely genotype), ties to the lowest
/// position to match the deterministic enumeration.
fn min_position(pls: &[i32]) -> usize {
    let mut best = 0;
    for (pos, &pl) in pls.iter().enumerate() {
        if pl < pls[best] {
            best = pos;
        }
    }
    best
}

/// Genotype quality from a PL vector; zero when fewer than two entries.
fn second_smallest_minus_smallest(pls: &[i32]) -> i32 {
    if pls.len() < 2 {
        return 0;
    }
    let mut smallest = i32::MAX;
    let mut second = i32::MAX;
    for &pl in pls {
        if pl < smallest {
            second = smallest;
            smallest = pl;
        } else if pl < second {
            second = pl;
        }
    }
    second - smallest
}

fn parse_strand_counts(value: &AttributeValue) -> Result<[i64; 4], FinalizeError> {
    let list = value.to_int_list(keys::STRAND_BIAS_BY_SAMPLE)?;
    let counts: [i64; 4] = list.as_slice().try_into().map_err(|_| {
        AttributeError::malformed(
            keys::STRAND_BIAS_BY_SAMPLE,
            format!("expected 4 strand counts, found {}", list.len()),
        )
    })?;
    Ok(counts)
}
