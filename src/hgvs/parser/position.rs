//! Position and interval parsing
//!
//! Positions are validated structurally here: 1-based coordinates reject
//! zero, `c.` positions accept `-`/`*` anchors and intronic offsets, and
//! kinds without introns reject offsets outright.

use crate::coords::{CdsAnchor, HgvsGenomicPos, HgvsProteinPos, HgvsTranscriptPos, IntronicOffset};
use crate::hgvs::location::{GenomeInterval, ProtInterval, ProtPos, TxInterval, TxPos};
use crate::sequence::Residue;
use nom::{
    branch::alt,
    character::complete::{char, digit1},
    combinator::opt,
    IResult, Parser,
};

fn parse_u64(input: &str) -> IResult<&str, u64> {
    let (rest, s) = digit1.parse(input)?;
    let value = s.parse::<u64>().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Digit))
    })?;
    Ok((rest, value))
}

/// Parse a 1-based genomic position; zero is rejected.
pub fn parse_genome_pos(input: &str) -> IResult<&str, HgvsGenomicPos> {
    let (rest, value) = parse_u64(input)?;
    let pos = HgvsGenomicPos::try_new(value as i64).ok_or_else(|| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify))
    })?;
    Ok((rest, pos))
}

/// Parse an intronic offset (`+5`, `-10`).
pub fn parse_offset(input: &str) -> IResult<&str, IntronicOffset> {
    let (rest, sign) = alt((char('+'), char('-'))).parse(input)?;
    let (rest, value) = parse_u64(rest)?;
    if value == 0 {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    let signed = if sign == '-' {
        -(value as i64)
    } else {
        value as i64
    };
    Ok((rest, IntronicOffset(signed)))
}

/// Parse a `c.` position: `123`, `-14`, `*6`, each with an optional offset.
pub fn parse_cds_pos(input: &str) -> IResult<&str, TxPos> {
    // *6 or *6+5 (3' UTR, counted past the stop codon)
    if let Ok((rest, _)) = char::<_, nom::error::Error<&str>>('*').parse(input) {
        let (rest, value) = parse_u64(rest)?;
        let base = HgvsTranscriptPos::try_new(value as i64).ok_or_else(|| {
            nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify))
        })?;
        let (rest, offset) = opt(parse_offset).parse(rest)?;
        return Ok((
            rest,
            TxPos {
                base,
                offset,
                anchor: CdsAnchor::CdsEnd,
            },
        ));
    }

    // -14 or -14+3 (5' UTR)
    if input.starts_with('-') {
        let (rest, _) = char::<_, nom::error::Error<&str>>('-').parse(input)?;
        let (rest, value) = parse_u64(rest)?;
        let base = HgvsTranscriptPos::try_new(-(value as i64)).ok_or_else(|| {
            nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify))
        })?;
        let (rest, offset) = opt(parse_offset).parse(rest)?;
        return Ok((
            rest,
            TxPos {
                base,
                offset,
                anchor: CdsAnchor::CdsStart,
            },
        ));
    }

    // 123 or 123+5
    let (rest, value) = parse_u64(input)?;
    let base = HgvsTranscriptPos::try_new(value as i64).ok_or_else(|| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify))
    })?;
    let (rest, offset) = opt(parse_offset).parse(rest)?;
    Ok((
        rest,
        TxPos {
            base,
            offset,
            anchor: CdsAnchor::CdsStart,
        },
    ))
}

/// Parse an `n.`/`r.` position: plain 1-based, optional intronic offset for
/// `n.` only (`allow_offset`).
pub fn parse_tx_pos(input: &str, allow_offset: bool) -> IResult<&str, TxPos> {
    let (rest, value) = parse_u64(input)?;
    let base = HgvsTranscriptPos::try_new(value as i64).ok_or_else(|| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify))
    })?;
    let (rest, offset) = if allow_offset {
        opt(parse_offset).parse(rest)?
    } else {
        (rest, None)
    };
    Ok((
        rest,
        TxPos {
            base,
            offset,
            anchor: CdsAnchor::TranscriptStart,
        },
    ))
}

/// Parse a genomic interval: `12345` or `100_200`, optionally parenthesised.
pub fn parse_genome_interval(input: &str) -> IResult<&str, GenomeInterval> {
    let (rest, open) = opt(char('(')).parse(input)?;
    let (rest, start) = parse_genome_pos(rest)?;
    let (rest, end) = opt(|i| {
        let (i, _) = char('_').parse(i)?;
        parse_genome_pos(i)
    })
    .parse(rest)?;
    let rest = if open.is_some() {
        let (rest, _) = char(')').parse(rest)?;
        rest
    } else {
        rest
    };
    Ok((
        rest,
        GenomeInterval {
            start,
            end,
            uncertain: open.is_some(),
        },
    ))
}

/// Parse a transcript-relative interval for the given kind.
pub fn parse_tx_interval(input: &str, kind: TxPosKind) -> IResult<&str, TxInterval> {
    let pos_parser = |i| match kind {
        TxPosKind::Cds => parse_cds_pos(i),
        TxPosKind::NonCoding => parse_tx_pos(i, true),
        TxPosKind::Rna => parse_tx_pos(i, false),
    };

    let (rest, open) = opt(char('(')).parse(input)?;
    let (rest, start) = pos_parser(rest)?;
    let (rest, end) = opt(|i| {
        let (i, _) = char('_').parse(i)?;
        pos_parser(i)
    })
    .parse(rest)?;
    let rest = if open.is_some() {
        let (rest, _) = char(')').parse(rest)?;
        rest
    } else {
        rest
    };
    Ok((
        rest,
        TxInterval {
            start,
            end,
            uncertain: open.is_some(),
        },
    ))
}

/// Which grammar a transcript-relative position follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxPosKind {
    /// `c.`: anchors and offsets
    Cds,
    /// `n.`: offsets, no anchors
    NonCoding,
    /// `r.`: neither
    Rna,
}

/// Parse a single residue token: three-letter (`Ala`, `Ter`, `Xaa`)
/// preferred, one-letter (`A`, `*`, `X`) accepted.
pub fn parse_residue(input: &str) -> IResult<&str, Residue> {
    if input.len() >= 3 && input.is_char_boundary(3) {
        if let Some(res) = Residue::from_code3(&input[..3]) {
            return Ok((&input[3..], res));
        }
    }
    let mut chars = input.chars();
    if let Some(c) = chars.next() {
        // '?' is reserved for unknown-effect edits, not residues
        if c != '?' {
            if let Some(res) = Residue::from_code1(c) {
                return Ok((chars.as_str(), res));
            }
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Tag,
    )))
}

/// Parse a protein position: optional residue then a 1-based number.
pub fn parse_prot_pos(input: &str) -> IResult<&str, ProtPos> {
    let (rest, aa) = opt(parse_residue).parse(input)?;
    let (rest, value) = parse_u64(rest)?;
    let base = HgvsProteinPos::try_new(value as i64).ok_or_else(|| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify))
    })?;
    Ok((rest, ProtPos { aa, base }))
}

/// Parse a protein interval: `Lys41` or `Cys76_Glu79`.
pub fn parse_prot_interval(input: &str) -> IResult<&str, ProtInterval> {
    let (rest, start) = parse_prot_pos(input)?;
    let (rest, end) = opt(|i| {
        let (i, _) = char('_').parse(i)?;
        parse_prot_pos(i)
    })
    .parse(rest)?;
    Ok((
        rest,
        ProtInterval {
            start,
            end,
            uncertain: false,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genome_pos_rejects_zero() {
        assert!(parse_genome_pos("0").is_err());
        assert!(parse_genome_pos("12345").is_ok());
    }

    #[test]
    fn test_cds_pos_forms() {
        let (_, p) = parse_cds_pos("123").unwrap();
        assert_eq!(p.base, HgvsTranscriptPos::new(123));
        assert_eq!(p.anchor, CdsAnchor::CdsStart);
        assert!(p.offset.is_none());

        let (_, p) = parse_cds_pos("-14").unwrap();
        assert_eq!(p.base, HgvsTranscriptPos::new(-14));

        let (_, p) = parse_cds_pos("*6").unwrap();
        assert_eq!(p.anchor, CdsAnchor::CdsEnd);
        assert_eq!(p.base, HgvsTranscriptPos::new(6));

        let (_, p) = parse_cds_pos("123+5").unwrap();
        assert_eq!(p.offset, Some(IntronicOffset(5)));

        let (_, p) = parse_cds_pos("124-3").unwrap();
        assert_eq!(p.offset, Some(IntronicOffset(-3)));
    }

    #[test]
    fn test_cds_pos_rejects_zero() {
        assert!(parse_cds_pos("0").is_err());
        assert!(parse_cds_pos("*0").is_err());
    }

    #[test]
    fn test_rna_pos_leaves_offset_unconsumed() {
        // r. positions take no offsets; the trailing +5 is left for the
        // caller, which then fails to find a valid edit there.
        let (rest, _) = parse_tx_pos("76+5", false).unwrap();
        assert_eq!(rest, "+5");
    }

    #[test]
    fn test_genome_interval() {
        let (_, iv) = parse_genome_interval("10_11").unwrap();
        assert_eq!(iv.start, HgvsGenomicPos::new(10));
        assert_eq!(iv.end, Some(HgvsGenomicPos::new(11)));
        assert!(!iv.uncertain);

        let (_, iv) = parse_genome_interval("(100_200)").unwrap();
        assert!(iv.uncertain);
    }

    #[test]
    fn test_prot_pos() {
        let (_, p) = parse_prot_pos("Lys41").unwrap();
        assert_eq!(p.aa, Some(Residue::Lys));
        assert_eq!(p.base, HgvsProteinPos::new(41));

        let (_, p) = parse_prot_pos("V600").unwrap();
        assert_eq!(p.aa, Some(Residue::Val));

        let (_, p) = parse_prot_pos("2346").unwrap();
        assert_eq!(p.aa, None);
    }

    #[test]
    fn test_prot_interval() {
        let (_, iv) = parse_prot_interval("Cys76_Glu79").unwrap();
        assert_eq!(iv.start.aa, Some(Residue::Cys));
        assert_eq!(iv.end.unwrap().aa, Some(Residue::Glu));
    }

    #[test]
    fn test_residue_three_letter_wins() {
        // "Ala" must parse as one residue, not 'A' + garbage
        let (rest, r) = parse_residue("Ala2").unwrap();
        assert_eq!(r, Residue::Ala);
        assert_eq!(rest, "2");
    }
}
