//! Parser and formatter integration tests
//!
//! Every canonical string here must survive a parse/format round-trip
//! unchanged; malformed inputs must be rejected with a parse error, never
//! silently accepted.

use hgvs_forge::error::{ForgeError, ParseErrorKind};
use hgvs_forge::parse_hgvs;
use rstest::rstest;

#[rstest]
// Genomic
#[case("NC_000001.11:g.12345A>G")]
#[case("NC_000001.11:g.10_11insA")]
#[case("NC_000001.11:g.10dup")]
#[case("NC_000001.11:g.100_200del")]
#[case("NC_000001.11:g.100_200inv")]
#[case("NC_000001.11:g.100_200delinsTT")]
#[case("NC_000001.11:g.100del")]
#[case("NC_000001.11:g.100_102TG[12]")]
#[case("NC_000001.11:g.100=")]
// Mitochondrial
#[case("NC_012920.1:m.8993T>G")]
// Coding, including UTRs and introns
#[case("NM_000051.3:c.123A>G")]
#[case("NM_000051.3:c.123+5G>A")]
#[case("NM_000051.3:c.124-3C>T")]
#[case("NM_000051.3:c.-14G>C")]
#[case("NM_000051.3:c.*6del")]
#[case("NM_000051.3:c.4_5del")]
#[case("NM_000051.3:c.35_36insT")]
#[case("NM_000051.3:c.5dup")]
#[case("NM_000051.3:c.123_124delinsAG")]
#[case("NM_000051.3:c.123CAG[10]")]
#[case("NM_000051.3:c.123CAG[10_12]")]
#[case("NM_000051.3:c.(100_200)del")]
// Non-coding and RNA
#[case("NR_003287.4:n.601G>A")]
#[case("NM_000051.3:r.76a>u")]
#[case("NM_000051.3:r.76_77insu")]
// Protein
#[case("NP_000042.3:p.Lys41Arg")]
#[case("NP_000042.3:p.(Lys41Arg)")]
#[case("NP_000042.3:p.Trp26Ter")]
#[case("NP_000042.3:p.Cys76_Glu79del")]
#[case("NP_000042.3:p.Lys2_Gly3insGlnSer")]
#[case("NP_000042.3:p.Ala2_Ala3dup")]
#[case("NP_000042.3:p.Cys28delinsTrpVal")]
#[case("NP_000042.3:p.Arg97ProfsTer23")]
#[case("NP_000042.3:p.Arg97fs")]
#[case("NP_000042.3:p.Ter312Argext*5")]
#[case("NP_000042.3:p.Lys41=")]
#[case("NP_000042.3:p.=")]
#[case("NP_000042.3:p.0")]
#[case("NP_000042.3:p.?")]
// Gene symbols and double accessions
#[case("BRAF:c.1799T>A")]
#[case("NC_000011.10(NM_000051.3):c.123A>G")]
fn roundtrip(#[case] input: &str) {
    let variant = parse_hgvs(input)
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", input, e));
    assert_eq!(variant.to_string(), input, "round-trip of {:?}", input);
}

#[rstest]
// One-letter amino acids normalize to three-letter
#[case("NP_000042.3:p.K41R", "NP_000042.3:p.Lys41Arg")]
#[case("NP_000042.3:p.W26*", "NP_000042.3:p.Trp26Ter")]
// Counted insertions expand
#[case("NM_000051.3:c.10_11insN[4]", "NM_000051.3:c.10_11insNNNN")]
// Restated identity sequences are dropped
#[case("NM_000051.3:c.123A=", "NM_000051.3:c.123=")]
fn normalizing_roundtrip(#[case] input: &str, #[case] canonical: &str) {
    let variant = parse_hgvs(input).unwrap();
    assert_eq!(variant.to_string(), canonical);
}

#[rstest]
#[case("")]
#[case("NM_000051.3")]
#[case("NM_000051.3:")]
#[case("NM_000051.3:c")]
#[case("NM_000051.3:c.")]
#[case("NM_000051.3:q.123A>G")]
#[case("NM_000051.3:c.0A>G")]
#[case("NM_000051.3:c.*0del")]
#[case("NM_000051.3:c.123A>")]
#[case("NM_000051.3:c.123A>G extra")]
#[case("NM_000051.3:c.123ins")]
#[case("NM_000051.3:c.123A>Gx")]
#[case("NM_000051.3:r.76A>G")] // DNA alphabet in r. context
#[case("NC_000001.11:g.0A>G")]
fn rejected(#[case] input: &str) {
    assert!(parse_hgvs(input).is_err(), "accepted {:?}", input);
}

#[test]
fn intron_offsets_only_on_transcript_kinds() {
    // c. and n. take offsets
    assert!(parse_hgvs("NM_000051.3:c.123+5G>A").is_ok());
    assert!(parse_hgvs("NR_003287.4:n.601+2G>A").is_ok());

    // g., m., r. do not
    for input in [
        "NC_000001.11:g.123+5A>G",
        "NC_012920.1:m.100-2T>G",
        "NM_000051.3:r.76+5a>g",
    ] {
        match parse_hgvs(input) {
            Err(ForgeError::Parse { kind, .. }) => {
                assert_eq!(
                    kind,
                    ParseErrorKind::CoordinateMismatch,
                    "wrong error kind for {:?}",
                    input
                );
            }
            other => panic!("expected parse error for {:?}, got {:?}", input, other),
        }
    }
}

#[test]
fn parse_error_reports_byte_offset() {
    let err = parse_hgvs("NM_000051.3:c.123A>!").unwrap_err();
    match err {
        ForgeError::Parse { offset, .. } => {
            assert!(offset >= 14, "offset {} points before the edit", offset);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn predicted_na_body_roundtrip() {
    let variant = parse_hgvs("NM_000051.3:c.(9740C>A)").unwrap();
    assert_eq!(variant.to_string(), "NM_000051.3:c.(9740C>A)");
}

#[test]
fn variants_serialize_through_json() {
    for input in [
        "NC_000001.11:g.12345A>G",
        "NM_000051.3:c.123+5G>A",
        "NP_000042.3:p.Arg97ProfsTer23",
    ] {
        let variant = parse_hgvs(input).unwrap();
        let json = serde_json::to_string(&variant).unwrap();
        let back: hgvs_forge::HgvsVariant = serde_json::from_str(&json).unwrap();
        assert_eq!(back, variant);
        assert_eq!(back.to_string(), input);
    }
}
