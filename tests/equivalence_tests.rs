//! Equivalence engine integration tests
//!
//! One test per specified scenario plus the cross-kind dispatch table.

use hgvs_forge::{parse_hgvs, EquivalenceLevel, MockProvider, VariantEquivalence};

fn compare(provider: &MockProvider, a: &str, b: &str) -> EquivalenceLevel {
    let eq = VariantEquivalence::new(provider, provider);
    let va = parse_hgvs(a).unwrap();
    let vb = parse_hgvs(b).unwrap();
    eq.compare(&va, &vb).unwrap()
}

#[test]
fn identical_notation_is_identity() {
    let provider = MockProvider::with_test_data();
    assert_eq!(
        compare(&provider, "NM_000051.3:c.122A>G", "NM_000051.3:c.122A>G"),
        EquivalenceLevel::Identity
    );
}

#[test]
fn indel_redundancy_is_analogous() {
    // g.10_11insA vs g.10dup with reference base A at g.10
    let provider = MockProvider::with_test_data();
    assert_eq!(
        compare(&provider, "NC_DUP.1:g.10_11insA", "NC_DUP.1:g.10dup"),
        EquivalenceLevel::Analogous
    );
}

#[test]
fn shifted_descriptions_are_analogous() {
    let provider = MockProvider::with_test_data();
    assert_eq!(
        compare(&provider, "NC_RUN.1:g.4_5del", "NC_RUN.1:g.6_7del"),
        EquivalenceLevel::Analogous
    );
    assert_eq!(
        compare(&provider, "NC_RUN.1:g.4_5insT", "NC_RUN.1:g.7_8insT"),
        EquivalenceLevel::Analogous
    );
}

#[test]
fn c_vs_p_projection_identity() {
    let provider = MockProvider::with_test_data();
    assert_eq!(
        compare(
            &provider,
            "NM_000051.3:c.122A>G",
            "NP_000042.3:p.(Lys41Arg)"
        ),
        EquivalenceLevel::Identity
    );
}

#[test]
fn observed_vs_predicted_protein_is_analogous() {
    let provider = MockProvider::with_test_data();
    assert_eq!(
        compare(&provider, "NM_000051.3:c.122A>G", "NP_000042.3:p.Lys41Arg"),
        EquivalenceLevel::Analogous
    );
}

#[test]
fn different_alternates_are_different() {
    let provider = MockProvider::with_test_data();
    assert_eq!(
        compare(&provider, "NM_000051.3:c.122A>G", "NM_000051.3:c.122A>T"),
        EquivalenceLevel::Different
    );
}

#[test]
fn gene_symbol_expands_to_matching_transcript() {
    let provider = MockProvider::with_test_data();
    assert_eq!(
        compare(&provider, "BRAF:c.1799T>A", "NM_004333.4:c.1799T>A"),
        EquivalenceLevel::Identity
    );
    // A different position through the same expansion is still different
    assert_eq!(
        compare(&provider, "BRAF:c.1799T>A", "NM_004333.4:c.1800T>A"),
        EquivalenceLevel::Different
    );
}

#[test]
fn minus_strand_insertion_matches_genomic_counterpart() {
    let provider = MockProvider::with_test_data();
    assert_eq!(
        compare(
            &provider,
            "NM_999999.1:c.35_36insT",
            "NC_MINUS.1:g.1065_1066insA"
        ),
        EquivalenceLevel::Identity
    );
}

#[test]
fn g_vs_c_same_event() {
    let provider = MockProvider::with_test_data();
    assert_eq!(
        compare(&provider, "NC_000011.10:g.5003A>G", "NM_000051.3:c.1A>G"),
        EquivalenceLevel::Identity
    );
    assert_eq!(
        compare(&provider, "NC_000011.10:g.5003A>T", "NM_000051.3:c.1A>G"),
        EquivalenceLevel::Different
    );
}

#[test]
fn g_vs_p_through_transcript_discovery() {
    let provider = MockProvider::with_test_data();
    assert_eq!(
        compare(
            &provider,
            "NC_000011.10:g.5124A>G",
            "NP_000042.3:p.(Lys41Arg)"
        ),
        EquivalenceLevel::Identity
    );
}

#[test]
fn missing_reference_data_is_unknown() {
    let provider = MockProvider::with_test_data();
    assert_eq!(
        compare(&provider, "NM_404404.1:c.1A>G", "NM_404404.1:c.2A>G"),
        EquivalenceLevel::Unknown
    );
}

#[test]
fn unprojectable_variants_are_unknown_not_errors() {
    let provider = MockProvider::with_test_data();

    // Intronic c. position: c_to_p cannot project it onto the transcript
    // sequence (a mapping failure, not a missing accession)
    assert_eq!(
        compare(
            &provider,
            "NM_000051.3:c.4+5G>A",
            "NP_000042.3:p.(Lys41Arg)"
        ),
        EquivalenceLevel::Unknown
    );

    // Position beyond the transcript end: c_to_g raises a coordinate error
    assert_eq!(
        compare(&provider, "NM_000051.3:c.9999A>G", "NM_000051.3:c.122A>G"),
        EquivalenceLevel::Unknown
    );
}

#[test]
fn protein_dup_ambiguity_in_tract() {
    let provider = MockProvider::with_test_data();
    assert_eq!(
        compare(
            &provider,
            "NP_ALA.1:p.Ala2_Ala3dup",
            "NP_ALA.1:p.Ala3_Ala4dup"
        ),
        EquivalenceLevel::Analogous
    );
    // Duplications of different tract lengths remain different
    assert_eq!(
        compare(
            &provider,
            "NP_ALA.1:p.Ala2_Ala3dup",
            "NP_ALA.1:p.Ala2_Ala4dup"
        ),
        EquivalenceLevel::Different
    );
}

#[test]
fn unification_without_reference_sequence() {
    // No sequence data at all: residues asserted by the two descriptions
    // must unify on their own
    let provider = MockProvider::new();
    assert_eq!(
        compare(
            &provider,
            "NP_0001.1:p.Ala201_Val202insGlyProGlyAla",
            "NP_0001.1:p.Gly198_Ala201dup"
        ),
        EquivalenceLevel::Analogous
    );
}

#[test]
fn verdict_is_symmetric_across_kind_pairings() {
    let provider = MockProvider::with_test_data();
    let eq = VariantEquivalence::new(&provider, &provider);
    let pairs = [
        ("NM_000051.3:c.122A>G", "NP_000042.3:p.(Lys41Arg)"),
        ("NC_000011.10:g.5003A>G", "NM_000051.3:c.1A>G"),
        ("NC_DUP.1:g.10_11insA", "NC_DUP.1:g.10dup"),
        ("NM_000051.3:c.122A>G", "NM_000051.3:c.122A>T"),
    ];
    for (a, b) in pairs {
        let va = parse_hgvs(a).unwrap();
        let vb = parse_hgvs(b).unwrap();
        assert_eq!(
            eq.compare(&va, &vb).unwrap(),
            eq.compare(&vb, &va).unwrap(),
            "asymmetric verdict for {} vs {}",
            a,
            b
        );
    }
}
