//! Accession parsing

use crate::hgvs::variant::Accession;
use nom::{
    bytes::complete::take_while1,
    character::complete::{char, digit1},
    combinator::opt,
    sequence::preceded,
    IResult, Parser,
};

fn is_accession_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Parse an accession or gene symbol, splitting a trailing `.N` version.
///
/// Accepts RefSeq (`NM_000051.3`), Ensembl (`ENST00000278616.4`), and bare
/// gene symbols (`BRAF`); classification of symbols against accessions is the
/// data provider's job, not the grammar's.
pub fn parse_accession(input: &str) -> IResult<&str, Accession> {
    let (rest, name) = take_while1(is_accession_char).parse(input)?;
    let (rest, version) = opt(preceded(char('.'), digit1)).parse(rest)?;

    let version = match version {
        Some(digits) => Some(digits.parse::<u32>().map_err(|_| {
            nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Digit))
        })?),
        None => None,
    };

    Ok((rest, Accession::new(name, version)))
}

/// True if a parenthesised inner token looks like a sequence accession
/// rather than a gene symbol.
pub fn looks_like_accession(acc: &Accession) -> bool {
    acc.version.is_some() || acc.name.contains('_') || acc.name.starts_with("ENS")
}
