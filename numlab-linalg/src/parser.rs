//! Text matrix literal parser (spec C9): `[1 2 3; 4 5 6]`.
//!
//! The separator is auto-detected from whichever of comma, tab, or space
//! occurs first in the literal's body; if more than one of those characters
//! is actually being used to split fields, the literal is mixing separators,
//! a warning is emitted, and the first-occurring one still wins. Rows are
//! separated by `;` or a newline.

use numlab_core::diagnostics::default_diagnostics;

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::Matrix;

const FIELD_SEPARATORS: [char; 3] = [',', '\t', ' '];

/// Parses a bracketed matrix literal such as `"[1 2; 3 4]"` or `"[1,2;3,4]"`.
pub fn parse_matrix(text: &str) -> LinalgResult<Matrix> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| LinalgError::ParseError {
            offset: 0,
            message: "matrix literal must be wrapped in '[' ... ']'".to_string(),
        })?;

    let row_texts: Vec<&str> = body.split(|c| c == ';' || c == '\n').map(str::trim).filter(|s| !s.is_empty()).collect();
    if row_texts.is_empty() {
        return Err(LinalgError::ParseError {
            offset: 0,
            message: "matrix literal has no rows".to_string(),
        });
    }

    let (separator, mixed) = detect_separator(body);
    if mixed {
        default_diagnostics().warn("parse_matrix: literal mixes separators; falling back to the first-occurring one");
    }
    let mut rows = Vec::with_capacity(row_texts.len());
    let mut offset = 1;
    for row_text in row_texts {
        let fields: Vec<&str> = row_text.split(separator).map(str::trim).filter(|s| !s.is_empty()).collect();
        let mut row = Vec::with_capacity(fields.len());
        for field in fields {
            let value = field.parse::<f64>().map_err(|_| LinalgError::ParseError {
                offset,
                message: format!("'{field}' is not a valid number"),
            })?;
            row.push(value);
            offset += field.len() + 1;
        }
        rows.push(row);
    }

    Matrix::from_table(rows)
}

/// Picks the separator among [`FIELD_SEPARATORS`] that occurs earliest in
/// `text` among those that actually split it into more than one field, and
/// reports whether a second candidate also does (mixing).
fn detect_separator(text: &str) -> (char, bool) {
    let mut occurrences: Vec<(usize, char)> = FIELD_SEPARATORS
        .iter()
        .filter(|&&candidate| text.split(candidate).filter(|s| !s.trim().is_empty()).count() > 1)
        .filter_map(|&candidate| text.find(candidate).map(|pos| (pos, candidate)))
        .collect();
    occurrences.sort_by_key(|&(pos, _)| pos);

    match occurrences.first() {
        Some(&(_, separator)) => (separator, occurrences.len() > 1),
        None => (' ', false),
    }
}

/// Renders `m` back into the literal syntax [`parse_matrix`] accepts.
pub fn format_matrix(m: &Matrix) -> String {
    let rows: Vec<String> = (0..m.rows())
        .map(|i| {
            (0..m.cols())
                .map(|j| m.get(i, j).to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    format!("[{}]", rows.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_space_separated_literal() {
        let m = parse_matrix("[1 2; 3 4]").unwrap();
        assert_eq!(m.elements(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn parses_comma_separated_literal() {
        let m = parse_matrix("[1,2;3,4]").unwrap();
        assert_eq!(m.elements(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn rejects_missing_brackets() {
        assert!(parse_matrix("1 2; 3 4").is_err());
    }

    #[test]
    fn rejects_non_numeric_field() {
        let err = parse_matrix("[1 x; 3 4]").unwrap_err();
        assert!(matches!(err, LinalgError::ParseError { .. }));
    }

    #[test]
    fn round_trips_through_format_matrix() {
        let original = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let text = format_matrix(&original);
        let reparsed = parse_matrix(&text).unwrap();
        assert_eq!(original, reparsed);
    }
}
