//! Mapping integration tests over the shared mock fixtures
//!
//! Fixture layout (see `MockProvider::with_test_data`):
//! - NM_000051.3 on NC_000011.10, plus strand, single exon at g.5001-5189,
//!   two-base 5' UTR, CDS `ATG (AAA x59) TAA`, protein NP_000042.3
//! - NM_999999.1 on NC_MINUS.1, minus strand, single exon at g.1001-1100

use hgvs_forge::{parse_hgvs, HgvsVariant, MockProvider, VariantMapper};

fn cds(var: &HgvsVariant) -> &hgvs_forge::hgvs::variant::CdsVariant {
    var.as_cds().expect("expected c. variant")
}

#[test]
fn c_to_g_and_back_is_identity() {
    let provider = MockProvider::with_test_data();
    let mapper = VariantMapper::new(&provider);

    for input in [
        "NM_000051.3:c.1A>G",
        "NM_000051.3:c.122A>G",
        "NM_000051.3:c.-2G>A",
        "NM_000051.3:c.*4T>A",
        "NM_000051.3:c.4_6del",
        "NM_000051.3:c.10_11insTT",
        "NM_000051.3:c.10dup",
        "NM_000051.3:c.10_12inv",
        "NM_999999.1:c.10A>G",
        "NM_999999.1:c.35_36insT",
        "NM_999999.1:c.10_12del",
    ] {
        let var = parse_hgvs(input).unwrap();
        let tx_ac = var.accession().full();
        let g = mapper.c_to_g(cds(&var), None).unwrap();
        let back = mapper.g_to_c(&g, &tx_ac).unwrap();
        assert_eq!(back.to_string(), input, "g round-trip of {}", input);
    }
}

#[test]
fn minus_strand_edits_are_reverse_complemented() {
    let provider = MockProvider::with_test_data();
    let mapper = VariantMapper::new(&provider);

    let var = parse_hgvs("NM_999999.1:c.35_36insT").unwrap();
    let g = mapper.c_to_g(cds(&var), None).unwrap();
    // T on the transcript is A on the plus strand of the reference
    assert!(g.to_string().ends_with("insA"), "got {}", g);

    let var = parse_hgvs("NM_999999.1:c.10_12delinsACG").unwrap();
    let g = mapper.c_to_g(cds(&var), None).unwrap();
    assert!(g.to_string().ends_with("delinsCGT"), "got {}", g);
}

#[test]
fn intronic_positions_map_through_exon_boundaries() {
    let provider = MockProvider::with_test_data();
    let mapper = VariantMapper::new(&provider);

    // The NM_000051.3 exon is g.5001-5189; there are no introns, so an
    // intronic c. position must fail to map
    let var = parse_hgvs("NM_000051.3:c.4+10del").unwrap();
    assert!(mapper.c_to_g(cds(&var), None).is_err());
}

#[test]
fn g_to_c_assigns_utr_anchors() {
    let provider = MockProvider::with_test_data();
    let mapper = VariantMapper::new(&provider);

    // g.5002 is the last 5' UTR base (n.2)
    let var = parse_hgvs("NC_000011.10:g.5002G>T").unwrap();
    let c = mapper.g_to_c(var.as_genome().unwrap(), "NM_000051.3").unwrap();
    assert_eq!(c.to_string(), "NM_000051.3:c.-1G>T");

    // g.5186 is the first base after the stop codon
    let var = parse_hgvs("NC_000011.10:g.5186T>C").unwrap();
    let c = mapper.g_to_c(var.as_genome().unwrap(), "NM_000051.3").unwrap();
    assert_eq!(c.to_string(), "NM_000051.3:c.*1T>C");
}

#[test]
fn c_to_p_scenarios() {
    let provider = MockProvider::with_test_data();
    let mapper = VariantMapper::new(&provider);

    for (input, expected) in [
        // Missense: middle base of the Lys41 codon
        ("NM_000051.3:c.122A>G", "NP_000042.3:p.(Lys41Arg)"),
        // Synonymous: wobble base of the same codon
        ("NM_000051.3:c.123A>G", "NP_000042.3:p.(Lys41=)"),
        // Nonsense
        ("NM_000051.3:c.4A>T", "NP_000042.3:p.(Lys2Ter)"),
        // In-frame deletion in the poly-Lys run, 3'-shifted, reported as a
        // deletion rather than a spurious stop
        ("NM_000051.3:c.4_6del", "NP_000042.3:p.(Lys60del)"),
        // In-frame duplication
        ("NM_000051.3:c.4_6dup", "NP_000042.3:p.(Lys60dup)"),
        // Stop loss
        ("NM_000051.3:c.181T>G", "NP_000042.3:p.(Ter61Gluext*?)"),
        // UTR change leaves the protein alone
        ("NM_000051.3:c.-2G>A", "NP_000042.3:p.(=)"),
    ] {
        let var = parse_hgvs(input).unwrap();
        let p = mapper.c_to_p(cds(&var), None).unwrap();
        assert_eq!(p.to_string(), expected, "projection of {}", input);
    }
}

#[test]
fn c_to_p_frameshift_reports_new_stop_distance() {
    let provider = MockProvider::with_test_data();
    let mapper = VariantMapper::new(&provider);

    let var = parse_hgvs("NM_000051.3:c.4del").unwrap();
    let p = mapper.c_to_p(cds(&var), None).unwrap();
    let text = p.to_string();
    assert!(text.contains("fs"), "expected frameshift, got {}", text);
}

#[test]
fn c_to_p_uses_linked_protein_accession() {
    let provider = MockProvider::with_test_data();
    let mapper = VariantMapper::new(&provider);

    let var = parse_hgvs("NM_000051.3:c.122A>G").unwrap();
    // Explicit accession wins over the provider link
    let p = mapper.c_to_p(cds(&var), Some("NP_OTHER.1")).unwrap();
    assert!(p.to_string().starts_with("NP_OTHER.1:"));
}

#[test]
fn to_spdi_forms() {
    let provider = MockProvider::with_test_data();
    let mapper = VariantMapper::new(&provider);

    let var = parse_hgvs("NC_RUN.1:g.4del").unwrap();
    // Normalizes to g.8del first; SPDI position is 0-based
    let spdi = mapper.to_spdi(&var, false).unwrap();
    assert_eq!(spdi.to_string(), "NC_RUN.1:7:T:");

    let spdi = mapper.to_spdi(&var, true).unwrap();
    assert_eq!(spdi.to_string(), "NC_RUN.1:3:TTTTT:TTTT");
}

#[test]
fn protein_variants_have_no_spdi() {
    let provider = MockProvider::with_test_data();
    let mapper = VariantMapper::new(&provider);
    let var = parse_hgvs("NP_000042.3:p.Lys41Arg").unwrap();
    assert!(mapper.to_spdi(&var, false).is_err());
}
