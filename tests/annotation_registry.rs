use varfin::model::keys;
use varfin::stats::{fisher_exact_two_sided, phred_scaled_p_value, round3, symmetric_odds_ratio};
use varfin::{
    Allele, AnnotationRegistry, AsFisherStrand, AsMappingQualityRankSum, AsReadPosRankSum,
    AsStrandOddsRatio, AttributeValue, FinalizeConfig, RecordBuilder, RecordFinalizer,
    SampleGenotype, VariantRecord,
};

fn merged_record_with_raw_annotations() -> VariantRecord {
    RecordBuilder::new(
        "chr12",
        25_398_284,
        vec![
            Allele::reference("C"),
            Allele::alternate("A"),
            Allele::placeholder(),
        ],
    )
    .with_attribute(keys::RAW_QUAL_APPROX, 200.0)
    .with_attribute(keys::DEPTH, 52)
    .with_attribute(keys::VARIANT_DEPTH, 50)
    .with_attribute(keys::AS_STRAND_BIAS_TABLE, "20,21|2,9|0,0")
    .with_attribute(keys::AS_RAW_MQ_RANK_SUM, "|0.0,1,1.0,2|")
    .with_attribute(keys::AS_RAW_READ_POS_RANK_SUM, "|-2.0,1,0.5,2|")
    .with_genotype(
        SampleGenotype::new("s1", vec![Allele::reference("C"), Allele::alternate("A")])
            .with_pls(vec![90, 0, 110, 95, 120, 130]),
    )
    .build()
}

#[test]
fn raw_annotations_finalize_into_their_reduced_keys() {
    let finalizer = RecordFinalizer::new(FinalizeConfig::default());
    let out = finalizer
        .finalize(&merged_record_with_raw_annotations())
        .unwrap()
        .unwrap();

    // raw keys consumed
    assert!(!out.has_attribute(keys::AS_STRAND_BIAS_TABLE));
    assert!(!out.has_attribute(keys::AS_RAW_MQ_RANK_SUM));
    assert!(!out.has_attribute(keys::AS_RAW_READ_POS_RANK_SUM));

    // strand table: reference row (20,21) against the one retained alternate (2,9)
    let table = [20u64, 21, 2, 9];
    assert_eq!(
        out.attribute(keys::AS_FISHER_STRAND),
        Some(&AttributeValue::FloatList(vec![round3(
            phred_scaled_p_value(fisher_exact_two_sided(table))
        )]))
    );
    assert_eq!(
        out.attribute(keys::AS_STRAND_ODDS_RATIO),
        Some(&AttributeValue::FloatList(vec![round3(
            symmetric_odds_ratio(table)
        )]))
    );

    // weighted medians: {0.0 x1, 1.0 x2} -> 1.0 and {-2.0 x1, 0.5 x2} -> 0.5
    assert_eq!(
        out.attribute(keys::AS_MQ_RANK_SUM),
        Some(&AttributeValue::FloatList(vec![1.0]))
    );
    assert_eq!(
        out.attribute(keys::AS_READ_POS_RANK_SUM),
        Some(&AttributeValue::FloatList(vec![0.5]))
    );
}

#[test]
fn registry_order_does_not_affect_output() {
    let mut reversed = AnnotationRegistry::new();
    reversed.register(Box::new(AsReadPosRankSum));
    reversed.register(Box::new(AsMappingQualityRankSum));
    reversed.register(Box::new(AsStrandOddsRatio));
    reversed.register(Box::new(AsFisherStrand));

    let record = merged_record_with_raw_annotations();
    let standard = RecordFinalizer::new(FinalizeConfig::default())
        .finalize(&record)
        .unwrap()
        .unwrap();
    let shuffled = RecordFinalizer::with_registry(FinalizeConfig::default(), reversed)
        .finalize(&record)
        .unwrap()
        .unwrap();

    assert_eq!(shuffled, standard);
}

#[test]
fn unregistered_raw_keys_pass_through_untouched() {
    let record = RecordBuilder::new(
        "chr1",
        500,
        vec![Allele::reference("G"), Allele::alternate("C")],
    )
    .with_attribute(keys::RAW_QUAL_APPROX, 100.0)
    .with_attribute(keys::DEPTH, 20)
    .with_attribute("AS_RAW_BaseQRankSum", "|1.0,3|")
    .build();

    let finalizer = RecordFinalizer::new(FinalizeConfig::default());
    let out = finalizer.finalize(&record).unwrap().unwrap();
    assert_eq!(
        out.attribute("AS_RAW_BaseQRankSum"),
        Some(&AttributeValue::from("|1.0,3|"))
    );
}

#[test]
fn unexpected_encodings_are_skipped_leniently() {
    // the strand-table finalizers handle the string encoding only; an
    // integer list is not theirs to interpret
    let record = RecordBuilder::new(
        "chr1",
        500,
        vec![Allele::reference("G"), Allele::alternate("C")],
    )
    .with_attribute(keys::RAW_QUAL_APPROX, 100.0)
    .with_attribute(keys::DEPTH, 20)
    .with_attribute(keys::AS_STRAND_BIAS_TABLE, vec![20i64, 21, 2, 9])
    .build();

    let finalizer = RecordFinalizer::new(FinalizeConfig::default());
    let out = finalizer.finalize(&record).unwrap().unwrap();
    assert!(!out.has_attribute(keys::AS_STRAND_BIAS_TABLE));
    assert!(!out.has_attribute(keys::AS_FISHER_STRAND));
    assert!(!out.has_attribute(keys::AS_STRAND_ODDS_RATIO));
}

#[test]
fn malformed_claimed_payloads_are_fatal() {
    let record = RecordBuilder::new(
        "chr1",
        500,
        vec![Allele::reference("G"), Allele::alternate("C")],
    )
    .with_attribute(keys::RAW_QUAL_APPROX, 100.0)
    .with_attribute(keys::DEPTH, 20)
    .with_attribute(keys::AS_STRAND_BIAS_TABLE, "20,x|2,9")
    .build();

    let finalizer = RecordFinalizer::new(FinalizeConfig::default());
    assert!(finalizer.finalize(&record).is_err());
}

#[test]
fn strip_mode_drops_raw_keys_without_finalizing() {
    let config = FinalizeConfig::default().with_stripped_annotations(true);
    let finalizer = RecordFinalizer::new(config);
    let out = finalizer
        .finalize(&merged_record_with_raw_annotations())
        .unwrap()
        .unwrap();

    assert!(!out.has_attribute(keys::AS_STRAND_BIAS_TABLE));
    assert!(!out.has_attribute(keys::AS_RAW_MQ_RANK_SUM));
    assert!(!out.has_attribute(keys::AS_FISHER_STRAND));
    assert!(!out.has_attribute(keys::AS_STRAND_ODDS_RATIO));
    assert!(!out.has_attribute(keys::AS_MQ_RANK_SUM));
    assert!(!out.has_attribute(keys::AS_READ_POS_RANK_SUM));
}
