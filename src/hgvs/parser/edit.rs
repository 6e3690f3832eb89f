//! Edit parsing
//!
//! Keyword edits (`delins`, `del`, `ins`, `dup`, `inv`) are tried longest
//! first; the remaining alternatives (`=`, substitution, repeat, `?`) are
//! disambiguated by backtracking on the bracket or `>` that follows the
//! leading sequence.

use crate::hgvs::edit::{NaEdit, ProteinEdit, TerDistance};
use crate::sequence::{AaSequence, Base, Residue, Sequence};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1},
    combinator::opt,
    multi::many1,
    IResult, Parser,
};

use super::position::parse_residue;

/// Which nucleotide alphabet the edit uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaAlphabet {
    /// Uppercase `ACGTN` for `g.`/`m.`/`c.`/`n.`
    Dna,
    /// Lowercase `acgun` for `r.`
    Rna,
}

impl NaAlphabet {
    fn contains(self, c: char) -> bool {
        match self {
            NaAlphabet::Dna => matches!(c, 'A' | 'C' | 'G' | 'T' | 'N'),
            NaAlphabet::Rna => matches!(c, 'a' | 'c' | 'g' | 'u' | 'n'),
        }
    }
}

fn parse_u64(input: &str) -> IResult<&str, u64> {
    let (rest, s) = digit1.parse(input)?;
    let value = s.parse::<u64>().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Digit))
    })?;
    Ok((rest, value))
}

fn parse_seq(input: &str, alphabet: NaAlphabet) -> IResult<&str, Sequence> {
    let (rest, s) = take_while1(|c| alphabet.contains(c)).parse(input)?;
    let bases = s
        .chars()
        .map(|c| Base::from_char(c).expect("alphabet-checked"))
        .collect();
    Ok((rest, Sequence(bases)))
}

fn parse_base(input: &str, alphabet: NaAlphabet) -> IResult<&str, Base> {
    let mut chars = input.chars();
    match chars.next() {
        Some(c) if alphabet.contains(c) => Ok((chars.as_str(), Base::from_char(c).unwrap())),
        _ => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        ))),
    }
}

/// `[12]` or `[10_12]`
fn parse_bracket_count(input: &str) -> IResult<&str, (u64, u64)> {
    let (rest, _) = char('[').parse(input)?;
    let (rest, min) = parse_u64(rest)?;
    let (rest, max) = opt(|i| {
        let (i, _) = char('_').parse(i)?;
        parse_u64(i)
    })
    .parse(rest)?;
    let (rest, _) = char(']').parse(rest)?;
    Ok((rest, (min, max.unwrap_or(min))))
}

/// Parse a nucleic-acid edit.
pub fn parse_na_edit(input: &str, alphabet: NaAlphabet) -> IResult<&str, NaEdit> {
    // delins before del; both before the sequence-led alternatives
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("delins").parse(input) {
        let (rest, sequence) = parse_seq(rest, alphabet)?;
        return Ok((rest, NaEdit::Delins { sequence }));
    }

    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("del").parse(input) {
        let (rest, sequence) = opt(|i| parse_seq(i, alphabet)).parse(rest)?;
        let (rest, length) = if sequence.is_none() {
            opt(parse_u64).parse(rest)?
        } else {
            (rest, None)
        };
        return Ok((rest, NaEdit::Deletion { sequence, length }));
    }

    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("ins").parse(input) {
        let (rest, sequence) = parse_seq(rest, alphabet)?;
        // insN[10] and friends: expand the counted unit
        let (rest, count) = opt(parse_bracket_count).parse(rest)?;
        let sequence = match count {
            Some((min, max)) if min == max => {
                let mut bases = Vec::with_capacity(sequence.len() * min as usize);
                for _ in 0..min {
                    bases.extend_from_slice(sequence.bases());
                }
                Sequence(bases)
            }
            Some(_) => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Verify,
                )))
            }
            None => sequence,
        };
        return Ok((rest, NaEdit::Insertion { sequence }));
    }

    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("dup").parse(input) {
        let (rest, sequence) = opt(|i| parse_seq(i, alphabet)).parse(rest)?;
        let (rest, length) = if sequence.is_none() {
            opt(parse_u64).parse(rest)?
        } else {
            (rest, None)
        };
        return Ok((rest, NaEdit::Duplication { sequence, length }));
    }

    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("inv").parse(input) {
        let (rest, length) = opt(parse_u64).parse(rest)?;
        return Ok((rest, NaEdit::Inversion { length }));
    }

    alt((
        |i| parse_na_identity(i, alphabet),
        |i| parse_na_substitution(i, alphabet),
        |i| parse_na_repeat(i, alphabet),
        parse_na_unknown,
    ))
    .parse(input)
}

/// `=`, optionally preceded by a restated sequence (`c.123A=`); the restated
/// sequence is not retained.
fn parse_na_identity(input: &str, alphabet: NaAlphabet) -> IResult<&str, NaEdit> {
    let (rest, _) = opt(|i| parse_seq(i, alphabet)).parse(input)?;
    let (rest, _) = char('=').parse(rest)?;
    Ok((rest, NaEdit::Identity))
}

fn parse_na_substitution(input: &str, alphabet: NaAlphabet) -> IResult<&str, NaEdit> {
    let (rest, reference) = parse_base(input, alphabet)?;
    let (rest, _) = char('>').parse(rest)?;
    let (rest, alternative) = parse_base(rest, alphabet)?;
    Ok((
        rest,
        NaEdit::Substitution {
            reference,
            alternative,
        },
    ))
}

fn parse_na_repeat(input: &str, alphabet: NaAlphabet) -> IResult<&str, NaEdit> {
    let (rest, unit) = opt(|i| parse_seq(i, alphabet)).parse(input)?;
    let (rest, (min, max)) = parse_bracket_count(rest)?;
    Ok((rest, NaEdit::Repeat { unit, min, max }))
}

fn parse_na_unknown(input: &str) -> IResult<&str, NaEdit> {
    let (rest, _) = char('?').parse(input)?;
    Ok((rest, NaEdit::Unknown))
}

fn parse_aa_seq(input: &str) -> IResult<&str, AaSequence> {
    let (rest, residues) = many1(parse_residue).parse(input)?;
    Ok((rest, AaSequence(residues)))
}

/// `Ter23`, `*23`, `Ter?`, `*?` after `fs`; `*5`, `*?` after `ext`.
fn parse_ter_distance(input: &str) -> IResult<&str, TerDistance> {
    if let Ok((rest, _)) = char::<_, nom::error::Error<&str>>('?').parse(input) {
        return Ok((rest, TerDistance::Unknown));
    }
    let (rest, n) = parse_u64(input)?;
    Ok((rest, TerDistance::Known(n)))
}

/// Parse a protein edit (everything after the location).
pub fn parse_protein_edit(input: &str) -> IResult<&str, ProteinEdit> {
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("delins").parse(input) {
        let (rest, sequence) = parse_aa_seq(rest)?;
        return Ok((rest, ProteinEdit::Delins { sequence }));
    }
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("del").parse(input) {
        return Ok((rest, ProteinEdit::Deletion));
    }
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("dup").parse(input) {
        return Ok((rest, ProteinEdit::Duplication));
    }
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&str>>("ins").parse(input) {
        let (rest, sequence) = parse_aa_seq(rest)?;
        return Ok((rest, ProteinEdit::Insertion { sequence }));
    }

    alt((
        parse_protein_fs,
        parse_protein_ext,
        parse_protein_repeat,
        parse_protein_identity,
        parse_protein_unknown,
        parse_protein_substitution,
    ))
    .parse(input)
}

/// `fs`, `ProfsTer23`, `PfsTer?`, `Argfs`
fn parse_protein_fs(input: &str) -> IResult<&str, ProteinEdit> {
    let (rest, alternative) = opt(parse_residue).parse(input)?;
    let (rest, _) = tag("fs").parse(rest)?;
    let (rest, terminal) = opt(|i| {
        let (i, _) = alt((tag("Ter"), tag("*"))).parse(i)?;
        parse_ter_distance(i)
    })
    .parse(rest)?;
    Ok((
        rest,
        ProteinEdit::Frameshift {
            alternative,
            terminal,
        },
    ))
}

/// `Argext*5`, `Argext*?`
fn parse_protein_ext(input: &str) -> IResult<&str, ProteinEdit> {
    let (rest, alternative) = parse_residue(input)?;
    let (rest, _) = tag("ext").parse(rest)?;
    let (rest, _) = alt((tag("*"), tag("Ter"))).parse(rest)?;
    let (rest, terminal) = parse_ter_distance(rest)?;
    Ok((
        rest,
        ProteinEdit::Extension {
            alternative,
            terminal,
        },
    ))
}

fn parse_protein_repeat(input: &str) -> IResult<&str, ProteinEdit> {
    let (rest, unit) = opt(parse_aa_seq).parse(input)?;
    let (rest, _) = char('[').parse(rest)?;
    let (rest, min) = parse_u64(rest)?;
    let (rest, max) = opt(|i| {
        let (i, _) = char('_').parse(i)?;
        parse_u64(i)
    })
    .parse(rest)?;
    let (rest, _) = char(']').parse(rest)?;
    Ok((
        rest,
        ProteinEdit::Repeat {
            unit,
            min,
            max: max.unwrap_or(min),
        },
    ))
}

fn parse_protein_identity(input: &str) -> IResult<&str, ProteinEdit> {
    let (rest, _) = char('=').parse(input)?;
    Ok((rest, ProteinEdit::Identity))
}

fn parse_protein_unknown(input: &str) -> IResult<&str, ProteinEdit> {
    let (rest, _) = char('?').parse(input)?;
    Ok((rest, ProteinEdit::UnknownEffect))
}

fn parse_protein_substitution(input: &str) -> IResult<&str, ProteinEdit> {
    let (rest, alternative) = parse_residue(input)?;
    Ok((rest, ProteinEdit::Substitution { alternative }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dna(input: &str) -> NaEdit {
        let (rest, edit) = parse_na_edit(input, NaAlphabet::Dna).unwrap();
        assert!(rest.is_empty(), "unconsumed input: {:?}", rest);
        edit
    }

    #[rstest]
    #[case("A>G", "A>G")]
    #[case("del", "del")]
    #[case("delAG", "delAG")]
    #[case("del2", "del2")]
    #[case("insATG", "insATG")]
    #[case("dup", "dup")]
    #[case("dupTG", "dupTG")]
    #[case("inv", "inv")]
    #[case("inv3", "inv3")]
    #[case("delinsTT", "delinsTT")]
    #[case("TG[12]", "TG[12]")]
    #[case("CAG[10_12]", "CAG[10_12]")]
    #[case("=", "=")]
    #[case("?", "?")]
    fn test_na_edit_roundtrip(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(dna(input).to_string(), expected);
    }

    #[test]
    fn test_ins_counted_unit_expands() {
        let edit = dna("insN[4]");
        assert_eq!(edit.to_string(), "insNNNN");
    }

    #[test]
    fn test_restated_identity_sequence_dropped() {
        assert_eq!(dna("A=").to_string(), "=");
    }

    #[test]
    fn test_rna_alphabet() {
        let (rest, edit) = parse_na_edit("a>g", NaAlphabet::Rna).unwrap();
        assert!(rest.is_empty());
        assert_eq!(edit.to_rna_string(), "a>g");
        // DNA letters are not valid in r. context
        assert!(parse_na_edit("A>G", NaAlphabet::Rna).is_err());
    }

    fn prot(input: &str) -> ProteinEdit {
        let (rest, edit) = parse_protein_edit(input).unwrap();
        assert!(rest.is_empty(), "unconsumed input: {:?}", rest);
        edit
    }

    #[rstest]
    #[case("Arg", "Arg")]
    #[case("Ter", "Ter")]
    #[case("del", "del")]
    #[case("dup", "dup")]
    #[case("insGlnSer", "insGlnSer")]
    #[case("delinsTrpVal", "delinsTrpVal")]
    #[case("ProfsTer23", "ProfsTer23")]
    #[case("fs", "fs")]
    #[case("ProfsTer?", "ProfsTer?")]
    #[case("Argext*5", "Argext*5")]
    #[case("=", "=")]
    #[case("?", "?")]
    fn test_protein_edit_roundtrip(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(prot(input).to_string(), expected);
    }

    #[test]
    fn test_protein_one_letter_stop() {
        // p.Trp2* == p.Trp2Ter
        assert_eq!(prot("*").to_string(), "Ter");
    }

    #[test]
    fn test_protein_repeat() {
        let edit = prot("GT[3]");
        match edit {
            ProteinEdit::Repeat { unit, min, max } => {
                assert_eq!(unit.unwrap().to_string(), "GlyThr");
                assert_eq!((min, max), (3, 3));
            }
            other => panic!("expected repeat, got {:?}", other),
        }
    }
}
