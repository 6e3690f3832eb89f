//! Top-level variant parsing
//!
//! Assembles accession, kind, location, and edit into an [`HgvsVariant`],
//! converting nom failures into byte-offset parse errors.

use crate::error::{ForgeError, ParseErrorKind};
use crate::hgvs::edit::{NaEdit, ProteinEdit};
use crate::hgvs::location::TxInterval;
use crate::hgvs::uncertainty::Mu;
use crate::hgvs::variant::{
    Accession, CdsVariant, GenomeVariant, HgvsVariant, MtVariant, PosEdit, ProteinVariant,
    RnaVariant, TxVariant,
};
use nom::{character::complete::char, combinator::opt, Parser};

use super::accession::{looks_like_accession, parse_accession};
use super::edit::{parse_na_edit, parse_protein_edit, NaAlphabet};
use super::position::{
    parse_genome_interval, parse_prot_interval, parse_tx_interval, TxPosKind,
};

/// Byte offset of `rest` within `input`.
fn offset_of(input: &str, rest: &str) -> usize {
    input.len() - rest.len()
}

fn nom_offset(input: &str, err: nom::Err<nom::error::Error<&str>>) -> usize {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => offset_of(input, e.input),
        nom::Err::Incomplete(_) => input.len(),
    }
}

/// Parse a complete HGVS variant string.
pub fn parse_variant(input: &str) -> Result<HgvsVariant, ForgeError> {
    if input.is_empty() {
        return Err(ForgeError::parse(
            ParseErrorKind::UnexpectedEnd,
            0,
            "empty input",
        ));
    }

    let (rest, outer) = parse_accession(input).map_err(|e| {
        ForgeError::parse(
            ParseErrorKind::InvalidChar,
            nom_offset(input, e),
            "expected an accession or gene symbol",
        )
    })?;

    // REF(ACC) or ACC(GENE)
    let (rest, inner) = opt(|i| {
        let (i, _) = char::<_, nom::error::Error<&str>>('(').parse(i)?;
        let (i, acc) = parse_accession(i)?;
        let (i, _) = char(')').parse(i)?;
        Ok((i, acc))
    })
    .parse(rest)
    .map_err(|e: nom::Err<nom::error::Error<&str>>| {
        ForgeError::parse(
            ParseErrorKind::InvalidChar,
            nom_offset(input, e),
            "malformed parenthesised accession",
        )
    })?;

    let (accession, reference, gene_symbol) = match inner {
        Some(inner) if looks_like_accession(&inner) => (inner, Some(outer), None),
        Some(inner) => (outer, None, Some(inner.full())),
        None => (outer, None, None),
    };

    let rest = expect_char(input, rest, ':')?;
    let (rest, kind) = parse_kind(input, rest)?;
    let rest = expect_char(input, rest, '.')?;

    if rest.is_empty() {
        return Err(ForgeError::parse(
            ParseErrorKind::UnexpectedEnd,
            input.len(),
            "expected a variant description after the kind",
        ));
    }

    match kind {
        'g' => {
            let pos_edit = parse_na_body(input, rest)?;
            Ok(HgvsVariant::Genome(GenomeVariant {
                accession,
                reference,
                gene_symbol,
                pos_edit,
            }))
        }
        'm' => {
            let pos_edit = parse_na_body(input, rest)?;
            Ok(HgvsVariant::Mt(MtVariant {
                accession,
                reference,
                gene_symbol,
                pos_edit,
            }))
        }
        'c' => {
            let pos_edit = parse_tx_body(input, rest, TxPosKind::Cds)?;
            Ok(HgvsVariant::Cds(CdsVariant {
                accession,
                reference,
                gene_symbol,
                pos_edit,
            }))
        }
        'n' => {
            let pos_edit = parse_tx_body(input, rest, TxPosKind::NonCoding)?;
            Ok(HgvsVariant::Tx(TxVariant {
                accession,
                reference,
                gene_symbol,
                pos_edit,
            }))
        }
        'r' => {
            let pos_edit = parse_tx_body(input, rest, TxPosKind::Rna)?;
            Ok(HgvsVariant::Rna(RnaVariant {
                accession,
                reference,
                gene_symbol,
                pos_edit,
            }))
        }
        'p' => {
            let pos_edit = parse_protein_body(input, rest)?;
            Ok(HgvsVariant::Protein(ProteinVariant {
                accession,
                reference,
                gene_symbol,
                pos_edit,
            }))
        }
        _ => unreachable!("parse_kind only yields known kinds"),
    }
}

fn expect_char<'a>(input: &str, rest: &'a str, expected: char) -> Result<&'a str, ForgeError> {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c == expected => Ok(chars.as_str()),
        Some(_) => Err(ForgeError::parse(
            ParseErrorKind::InvalidChar,
            offset_of(input, rest),
            format!("expected '{}'", expected),
        )),
        None => Err(ForgeError::parse(
            ParseErrorKind::UnexpectedEnd,
            input.len(),
            format!("expected '{}'", expected),
        )),
    }
}

fn parse_kind<'a>(input: &str, rest: &'a str) -> Result<(&'a str, char), ForgeError> {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c @ ('g' | 'm' | 'c' | 'n' | 'r' | 'p')) => Ok((chars.as_str(), c)),
        Some(c) => Err(ForgeError::parse(
            ParseErrorKind::InvalidChar,
            offset_of(input, rest),
            format!("unknown coordinate kind '{}'", c),
        )),
        None => Err(ForgeError::parse(
            ParseErrorKind::UnexpectedEnd,
            input.len(),
            "expected a coordinate kind",
        )),
    }
}

/// `g.`/`m.` body: interval + edit, with predicted parentheses around the
/// whole body as an alternative.
fn parse_na_body(
    input: &str,
    rest: &str,
) -> Result<PosEdit<crate::hgvs::location::GenomeInterval, NaEdit>, ForgeError> {
    // Observed form, including "(100_200)del" uncertain intervals
    if let Ok((after, interval)) = parse_genome_interval(rest) {
        reject_stray_offset(input, after)?;
        if let Ok((after, edit)) = parse_na_edit(after, NaAlphabet::Dna) {
            finish(input, after)?;
            return Ok(PosEdit {
                loc: Some(interval),
                edit: Mu::Certain(edit),
            });
        }
    }

    // Predicted form: "(12345A>G)"
    if let Some(body) = rest.strip_prefix('(') {
        let (after, interval) = parse_genome_interval(body).map_err(|e| bad_position(input, e))?;
        let (after, edit) =
            parse_na_edit(after, NaAlphabet::Dna).map_err(|e| bad_edit(input, e))?;
        let after = expect_char(input, after, ')')?;
        finish(input, after)?;
        return Ok(PosEdit {
            loc: Some(interval),
            edit: Mu::Uncertain(edit),
        });
    }

    // Re-run the observed path for a precise error offset
    let (after, interval) = parse_genome_interval(rest).map_err(|e| bad_position(input, e))?;
    reject_stray_offset(input, after)?;
    let (after, edit) = parse_na_edit(after, NaAlphabet::Dna).map_err(|e| bad_edit(input, e))?;
    finish(input, after)?;
    Ok(PosEdit {
        loc: Some(interval),
        edit: Mu::Certain(edit),
    })
}

/// `c.`/`n.`/`r.` body.
fn parse_tx_body(
    input: &str,
    rest: &str,
    kind: TxPosKind,
) -> Result<PosEdit<TxInterval, NaEdit>, ForgeError> {
    let alphabet = if kind == TxPosKind::Rna {
        NaAlphabet::Rna
    } else {
        NaAlphabet::Dna
    };

    if let Ok((after, interval)) = parse_tx_interval(rest, kind) {
        if kind == TxPosKind::Rna {
            reject_stray_offset(input, after)?;
        }
        if let Ok((after, edit)) = parse_na_edit(after, alphabet) {
            finish(input, after)?;
            return Ok(PosEdit {
                loc: Some(interval),
                edit: Mu::Certain(edit),
            });
        }
    }

    if let Some(body) = rest.strip_prefix('(') {
        let (after, interval) =
            parse_tx_interval(body, kind).map_err(|e| bad_position(input, e))?;
        let (after, edit) = parse_na_edit(after, alphabet).map_err(|e| bad_edit(input, e))?;
        let after = expect_char(input, after, ')')?;
        finish(input, after)?;
        return Ok(PosEdit {
            loc: Some(interval),
            edit: Mu::Uncertain(edit),
        });
    }

    let (after, interval) = parse_tx_interval(rest, kind).map_err(|e| bad_position(input, e))?;
    if kind == TxPosKind::Rna {
        reject_stray_offset(input, after)?;
    }
    let (after, edit) = parse_na_edit(after, alphabet).map_err(|e| bad_edit(input, e))?;
    finish(input, after)?;
    Ok(PosEdit {
        loc: Some(interval),
        edit: Mu::Certain(edit),
    })
}

/// `p.` body: whole-protein specials, then located edits, each optionally
/// parenthesised as a predicted consequence.
fn parse_protein_body(
    input: &str,
    rest: &str,
) -> Result<PosEdit<crate::hgvs::location::ProtInterval, ProteinEdit>, ForgeError> {
    match rest {
        "=" => {
            return Ok(PosEdit {
                loc: None,
                edit: Mu::Certain(ProteinEdit::Identity),
            })
        }
        "(=)" => {
            return Ok(PosEdit {
                loc: None,
                edit: Mu::Uncertain(ProteinEdit::Identity),
            })
        }
        "0" => {
            return Ok(PosEdit {
                loc: None,
                edit: Mu::Certain(ProteinEdit::NoProtein),
            })
        }
        "?" => {
            return Ok(PosEdit {
                loc: None,
                edit: Mu::Certain(ProteinEdit::UnknownEffect),
            })
        }
        _ => {}
    }

    let (body, predicted) = match rest.strip_prefix('(') {
        Some(inner) => match inner.strip_suffix(')') {
            Some(core) => (core, true),
            None => {
                return Err(ForgeError::parse(
                    ParseErrorKind::InvalidChar,
                    input.len().saturating_sub(1),
                    "unclosed parenthesis in protein description",
                ))
            }
        },
        None => (rest, false),
    };

    let (after, interval) = parse_prot_interval(body).map_err(|e| bad_position(input, e))?;
    let (after, edit) = parse_protein_edit(after).map_err(|e| bad_edit(input, e))?;
    if !after.is_empty() {
        return Err(ForgeError::parse(
            ParseErrorKind::InvalidChar,
            offset_of(input, after),
            "trailing input after protein edit",
        ));
    }

    Ok(PosEdit {
        loc: Some(interval),
        edit: if predicted {
            Mu::Uncertain(edit)
        } else {
            Mu::Certain(edit)
        },
    })
}

/// Intron offsets are only defined for `c.` and `n.`; reject them elsewhere
/// instead of mis-parsing the sign as an edit.
fn reject_stray_offset(input: &str, rest: &str) -> Result<(), ForgeError> {
    let mut chars = rest.chars();
    if let (Some(sign), Some(digit)) = (chars.next(), chars.next()) {
        if (sign == '+' || sign == '-') && digit.is_ascii_digit() {
            return Err(ForgeError::parse(
                ParseErrorKind::CoordinateMismatch,
                offset_of(input, rest),
                "intron offsets are not valid for this coordinate kind",
            ));
        }
    }
    Ok(())
}

fn finish(input: &str, rest: &str) -> Result<(), ForgeError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ForgeError::parse(
            ParseErrorKind::InvalidChar,
            offset_of(input, rest),
            "trailing input after variant description",
        ))
    }
}

fn bad_position(input: &str, err: nom::Err<nom::error::Error<&str>>) -> ForgeError {
    ForgeError::parse(
        ParseErrorKind::BadPosition,
        nom_offset(input, err),
        "malformed position",
    )
}

fn bad_edit(input: &str, err: nom::Err<nom::error::Error<&str>>) -> ForgeError {
    ForgeError::parse(
        ParseErrorKind::BadEdit,
        nom_offset(input, err),
        "malformed edit",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{CdsAnchor, HgvsTranscriptPos, IntronicOffset};
    use crate::error::ParseErrorKind;
    use crate::sequence::{Base, Residue};

    #[test]
    fn test_parse_substitution_fields() {
        let v = parse_variant("NM_000051.3:c.123A>G").unwrap();
        let HgvsVariant::Cds(cds) = &v else {
            panic!("expected c. variant");
        };
        assert_eq!(cds.accession.full(), "NM_000051.3");
        let loc = cds.pos_edit.loc.unwrap();
        assert_eq!(loc.start.base, HgvsTranscriptPos::new(123));
        assert_eq!(loc.start.anchor, CdsAnchor::CdsStart);
        match cds.pos_edit.edit.inner() {
            NaEdit::Substitution {
                reference,
                alternative,
            } => {
                assert_eq!(*reference, Base::A);
                assert_eq!(*alternative, Base::G);
            }
            other => panic!("expected substitution, got {:?}", other),
        }
        assert_eq!(v.to_string(), "NM_000051.3:c.123A>G");
    }

    #[test]
    fn test_parse_intronic_position() {
        let v = parse_variant("NM_000051.3:c.123+5G>A").unwrap();
        let loc = v.as_cds().unwrap().pos_edit.loc.unwrap();
        assert_eq!(loc.start.offset, Some(IntronicOffset(5)));
        assert_eq!(v.to_string(), "NM_000051.3:c.123+5G>A");
    }

    #[test]
    fn test_parse_utr_positions() {
        let v = parse_variant("NM_000051.3:c.-14G>C").unwrap();
        assert_eq!(v.to_string(), "NM_000051.3:c.-14G>C");

        let v = parse_variant("NM_000051.3:c.*6del").unwrap();
        assert_eq!(v.to_string(), "NM_000051.3:c.*6del");
    }

    #[test]
    fn test_parse_genomic_offset_rejected() {
        let err = parse_variant("NC_000001.11:g.123+5A>G").unwrap_err();
        match err {
            ForgeError::Parse { kind, .. } => {
                assert_eq!(kind, ParseErrorKind::CoordinateMismatch)
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rna_offset_rejected() {
        assert!(parse_variant("NM_000051.3:r.76+5a>g").is_err());
    }

    #[test]
    fn test_parse_protein_variants() {
        let v = parse_variant("NP_000042.3:p.Lys41Arg").unwrap();
        assert_eq!(v.to_string(), "NP_000042.3:p.Lys41Arg");

        let v = parse_variant("NP_000042.3:p.(Lys41Arg)").unwrap();
        assert!(v.as_protein().unwrap().pos_edit.is_predicted());
        assert_eq!(v.to_string(), "NP_000042.3:p.(Lys41Arg)");

        let v = parse_variant("NP_000042.3:p.K41R").unwrap();
        // One-letter input formats back as three-letter
        assert_eq!(v.to_string(), "NP_000042.3:p.Lys41Arg");

        let v = parse_variant("NP_000042.3:p.Arg97ProfsTer23").unwrap();
        assert_eq!(v.to_string(), "NP_000042.3:p.Arg97ProfsTer23");

        let v = parse_variant("NP_000042.3:p.Ter312Argext*5").unwrap();
        assert_eq!(v.to_string(), "NP_000042.3:p.Ter312Argext*5");
    }

    #[test]
    fn test_parse_protein_specials() {
        assert_eq!(
            parse_variant("NP_1.1:p.=").unwrap().to_string(),
            "NP_1.1:p.="
        );
        assert_eq!(
            parse_variant("NP_1.1:p.0").unwrap().to_string(),
            "NP_1.1:p.0"
        );
        assert_eq!(
            parse_variant("NP_1.1:p.?").unwrap().to_string(),
            "NP_1.1:p.?"
        );
    }

    #[test]
    fn test_parse_gene_symbol_accession() {
        let v = parse_variant("BRAF:c.1799T>A").unwrap();
        assert_eq!(v.accession().base(), "BRAF");
        assert_eq!(v.to_string(), "BRAF:c.1799T>A");
    }

    #[test]
    fn test_parse_reference_accession() {
        let v = parse_variant("NC_000011.10(NM_000051.3):c.123A>G").unwrap();
        assert_eq!(v.accession().full(), "NM_000051.3");
        assert_eq!(v.to_string(), "NC_000011.10(NM_000051.3):c.123A>G");
    }

    #[test]
    fn test_parse_gene_in_parens() {
        let v = parse_variant("NM_000051.3(ATM):c.123A>G").unwrap();
        assert_eq!(v.accession().full(), "NM_000051.3");
        let HgvsVariant::Cds(cds) = &v else { panic!() };
        assert_eq!(cds.gene_symbol.as_deref(), Some("ATM"));
    }

    #[test]
    fn test_parse_rna_lowercase() {
        let v = parse_variant("NM_000051.3:r.76a>u").unwrap();
        assert_eq!(v.to_string(), "NM_000051.3:r.76a>u");
    }

    #[test]
    fn test_parse_error_offsets() {
        let err = parse_variant("NM_000051.3:c.").unwrap_err();
        assert!(matches!(err, ForgeError::Parse { .. }));

        let err = parse_variant("NM_000051.3:x.100A>G").unwrap_err();
        match err {
            ForgeError::Parse { offset, .. } => assert_eq!(offset, 12),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_never_accepts_trailing_garbage() {
        assert!(parse_variant("NM_000051.3:c.123A>Gx").is_err());
        assert!(parse_variant("NM_000051.3:c.123A>G extra").is_err());
    }
}
