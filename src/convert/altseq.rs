//! Applying a nucleic-acid edit to a transcript sequence
//!
//! `c_to_p` works by editing the reference transcript and re-translating;
//! this module performs the edit itself. Spans are 0-based half-open
//! transcript indices; insertions use an empty span at the gap.

use crate::error::ForgeError;
use crate::hgvs::edit::NaEdit;
use crate::sequence::reverse_complement;

/// The edited transcript plus the net length change of the edit.
#[derive(Debug)]
pub(crate) struct EditedTranscript {
    pub sequence: String,
    pub net_change: i64,
}

/// Apply `edit` to `seq` over `[start, end)`.
///
/// Stated reference sequences are checked against the transcript; a
/// disagreement is a [`ForgeError::ReferenceMismatch`].
pub(crate) fn apply_na_edit(
    ac: &str,
    seq: &str,
    start: usize,
    end: usize,
    edit: &NaEdit,
) -> Result<EditedTranscript, ForgeError> {
    if start > seq.len() || end > seq.len() || start > end {
        return Err(ForgeError::Coordinate(format!(
            "edit span {}..{} outside transcript {} (length {})",
            start,
            end,
            ac,
            seq.len()
        )));
    }
    let span = &seq[start..end];

    // Validate any restated reference against the actual transcript
    match edit {
        NaEdit::Substitution { reference, .. } => {
            if span.len() != 1 {
                return Err(ForgeError::Coordinate(format!(
                    "substitution span {}..{} covers {} bases",
                    start,
                    end,
                    span.len()
                )));
            }
            if span != reference.to_string() {
                return Err(ForgeError::ReferenceMismatch {
                    accession: ac.to_string(),
                    expected: reference.to_string(),
                    found: span.to_string(),
                });
            }
        }
        NaEdit::Deletion {
            sequence: Some(stated),
            ..
        }
        | NaEdit::Duplication {
            sequence: Some(stated),
            ..
        } => {
            let stated = stated.to_string();
            if stated != span {
                return Err(ForgeError::ReferenceMismatch {
                    accession: ac.to_string(),
                    expected: stated,
                    found: span.to_string(),
                });
            }
        }
        _ => {}
    }

    let (edited, net_change) = match edit {
        NaEdit::Substitution { alternative, .. } => {
            let mut s = String::with_capacity(seq.len());
            s.push_str(&seq[..start]);
            s.push(alternative.to_char());
            s.push_str(&seq[end..]);
            (s, 0)
        }
        NaEdit::Deletion { .. } => {
            let mut s = String::with_capacity(seq.len() - span.len());
            s.push_str(&seq[..start]);
            s.push_str(&seq[end..]);
            (s, -(span.len() as i64))
        }
        NaEdit::Insertion { sequence } => {
            let alt = sequence.to_string();
            let mut s = String::with_capacity(seq.len() + alt.len());
            s.push_str(&seq[..start]);
            s.push_str(&alt);
            s.push_str(&seq[start..]);
            (s, alt.len() as i64)
        }
        NaEdit::Duplication { .. } => {
            let mut s = String::with_capacity(seq.len() + span.len());
            s.push_str(&seq[..end]);
            s.push_str(span);
            s.push_str(&seq[end..]);
            (s, span.len() as i64)
        }
        NaEdit::Delins { sequence } => {
            let alt = sequence.to_string();
            let mut s = String::with_capacity(seq.len() - span.len() + alt.len());
            s.push_str(&seq[..start]);
            s.push_str(&alt);
            s.push_str(&seq[end..]);
            (s, alt.len() as i64 - span.len() as i64)
        }
        NaEdit::Inversion { .. } => {
            let mut s = String::with_capacity(seq.len());
            s.push_str(&seq[..start]);
            s.push_str(&reverse_complement(span));
            s.push_str(&seq[end..]);
            (s, 0)
        }
        NaEdit::Repeat { unit, min, .. } => {
            let unit = match unit {
                Some(u) => u.to_string(),
                None => span.to_string(),
            };
            if unit.is_empty() {
                return Err(ForgeError::Coordinate("empty repeat unit".into()));
            }
            // Extend over the existing run of the unit, then write `min`
            // copies in its place
            let mut run_end = start;
            while run_end + unit.len() <= seq.len() && seq[run_end..].starts_with(&unit) {
                run_end += unit.len();
            }
            let replacement = unit.repeat(*min as usize);
            let mut s =
                String::with_capacity(seq.len() - (run_end - start) + replacement.len());
            s.push_str(&seq[..start]);
            s.push_str(&replacement);
            s.push_str(&seq[run_end..]);
            let net = replacement.len() as i64 - (run_end - start) as i64;
            (s, net)
        }
        NaEdit::Identity => (seq.to_string(), 0),
        NaEdit::Unknown => {
            return Err(ForgeError::Unsupported(
                "cannot apply an unknown edit to a sequence".into(),
            ))
        }
    };

    Ok(EditedTranscript {
        sequence: edited,
        net_change,
    })
}
