//! CSV loading/saving (spec C9).
//!
//! Separator is auto-detected the same way as [`crate::parser`], from the set
//! { comma, tab, space }. A leading line that does not parse entirely as
//! numbers is treated as an optional header and skipped. A short row is
//! rejected with [`LinalgError::RaggedInput`]; a long row is accepted with
//! the extra fields dropped and a warning. An unreadable token becomes `NaN`
//! with a warning rather than aborting the whole load.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use numlab_core::config::BUFFER_SIZE;
use numlab_core::diagnostics::default_diagnostics;

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::Matrix;

const SEPARATOR_CANDIDATES: [char; 3] = [',', '\t', ' '];

/// Loads a dense matrix from a CSV file. When `transpose` is set, the file's
/// columns become the matrix's rows.
pub fn load_csv<P: AsRef<Path>>(path: P, transpose: bool) -> LinalgResult<Matrix> {
    let file = File::open(path)?;
    let reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let lines: Vec<String> = reader.lines().collect::<std::io::Result<_>>()?;
    let mut lines: Vec<&str> = lines.iter().map(String::as_str).filter(|l| !l.trim().is_empty()).collect();

    if lines.is_empty() {
        return Matrix::from_row_major(0, 0, Vec::new());
    }

    let separator = detect_separator(lines[0]);
    if is_header_line(lines[0], separator) {
        lines.remove(0);
    }
    if lines.is_empty() {
        return Matrix::from_row_major(0, 0, Vec::new());
    }

    let expected = lines[0].split(separator).count();

    let mut rows = Vec::with_capacity(lines.len());
    for (row_idx, line) in lines.iter().enumerate() {
        let mut fields: Vec<&str> = line.split(separator).collect();
        if fields.len() < expected {
            return Err(LinalgError::RaggedInput {
                row: row_idx,
                found: fields.len(),
                expected,
            });
        }
        if fields.len() > expected {
            default_diagnostics().warn(&format!(
                "load_csv: row {row_idx} has {} fields, expected {expected}; extra fields dropped",
                fields.len()
            ));
            fields.truncate(expected);
        }
        let row: Vec<f64> = fields
            .iter()
            .map(|field| {
                field.trim().parse::<f64>().unwrap_or_else(|_| {
                    default_diagnostics().warn(&format!("load_csv: unreadable field '{field}' coerced to NaN"));
                    f64::NAN
                })
            })
            .collect();
        rows.push(row);
    }

    let matrix = Matrix::from_table(rows)?;
    Ok(if transpose { matrix.transpose() } else { matrix })
}

/// Saves `matrix` as comma-separated rows. When `transpose` is set, the
/// matrix's columns are written as rows.
pub fn save_csv<P: AsRef<Path>>(path: P, matrix: &Matrix, transpose: bool) -> LinalgResult<()> {
    let to_write = if transpose { matrix.transpose() } else { matrix.clone() };
    let file = File::create(path)?;
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);
    for i in 0..to_write.rows() {
        let line: Vec<String> = (0..to_write.cols()).map(|j| to_write.get(i, j).to_string()).collect();
        writeln!(writer, "{}", line.join(","))?;
    }
    writer.flush()?;
    Ok(())
}

fn detect_separator(first_line: &str) -> char {
    for candidate in SEPARATOR_CANDIDATES {
        if first_line.split(candidate).count() > 1 {
            return candidate;
        }
    }
    ','
}

/// A line is a header only when none of its fields parse as a number; a
/// single malformed numeric field (the `unreadable field` case) still counts
/// as data, not a header.
fn is_header_line(line: &str, separator: char) -> bool {
    line.split(separator).all(|field| field.trim().parse::<f64>().is_err())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn round_trips_through_a_temp_file() {
        let dir = std::env::temp_dir();
        let path = dir.join("numlab_csv_roundtrip_test.csv");
        let m = Matrix::from_row_major(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        save_csv(&path, &m, false).unwrap();
        let loaded = load_csv(&path, false).unwrap();
        assert!(loaded.approx_eq(&m, 1e-9));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn short_row_is_rejected() {
        let dir = std::env::temp_dir();
        let path = dir.join("numlab_csv_ragged_short_test.csv");
        std::fs::File::create(&path).unwrap().write_all(b"1,2,3\n4,5\n").unwrap();
        let err = load_csv(&path, false).unwrap_err();
        assert!(matches!(err, LinalgError::RaggedInput { .. }));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn long_row_is_truncated_with_a_warning() {
        let dir = std::env::temp_dir();
        let path = dir.join("numlab_csv_ragged_long_test.csv");
        std::fs::File::create(&path).unwrap().write_all(b"1,2\n3,4,5\n").unwrap();
        let loaded = load_csv(&path, false).unwrap();
        assert_eq!(loaded.dims().as_tuple(), (2, 2));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn header_line_is_skipped() {
        let dir = std::env::temp_dir();
        let path = dir.join("numlab_csv_header_test.csv");
        std::fs::File::create(&path).unwrap().write_all(b"x,y\n1,2\n3,4\n").unwrap();
        let loaded = load_csv(&path, false).unwrap();
        assert_eq!(loaded.dims().as_tuple(), (2, 2));
        assert_eq!(loaded.elements(), &[1.0, 2.0, 3.0, 4.0]);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn unreadable_field_becomes_nan() {
        let dir = std::env::temp_dir();
        let path = dir.join("numlab_csv_nan_test.csv");
        std::fs::File::create(&path).unwrap().write_all(b"1,oops\n3,4\n").unwrap();
        let loaded = load_csv(&path, false).unwrap();
        assert!(loaded.get(0, 1).is_nan());
        std::fs::remove_file(path).unwrap();
    }
}
