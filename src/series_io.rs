//! Loading series from plain text.
//!
//! One value per line or whitespace/comma separated. Blank lines and lines
//! starting with `#` are skipped.

use crate::errors::{MfdfaError, MfdfaResult};
use log::debug;
use std::path::Path;
use std::sync::Arc;

/// Parse every number in `text`.
///
/// # Example
/// ```rust
/// use mfdfa_toolkit::series_io::parse_series;
///
/// let series = parse_series("# returns\n0.5, -1.25\n3e-2\n").unwrap();
/// assert_eq!(series, vec![0.5, -1.25, 0.03]);
/// ```
pub fn parse_series(text: &str) -> MfdfaResult<Vec<f64>> {
    let mut values = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for token in line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let value = token.parse::<f64>().map_err(|_| MfdfaError::ParseError {
                line: index + 1,
                token: token.to_string(),
            })?;
            values.push(value);
        }
    }
    Ok(values)
}

/// Read and parse a series file.
pub fn load_series<P: AsRef<Path>>(path: P) -> MfdfaResult<Vec<f64>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| MfdfaError::IoError {
        operation: format!("reading {}", path.display()),
        source: Some(Arc::new(e)),
    })?;
    let series = parse_series(&text)?;
    debug!("Loaded {} values from {}", series.len(), path.display());
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_separators() {
        let text = "1 2\t3\n\n4,5 , 6\n# comment 7\n  -8.5  \n";
        assert_eq!(
            parse_series(text).unwrap(),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, -8.5]
        );
    }

    #[test]
    fn test_bad_token_reports_line() {
        match parse_series("1.0\n2.0\nthree\n") {
            Err(MfdfaError::ParseError { line, token }) => {
                assert_eq!(line, 3);
                assert_eq!(token, "three");
            }
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_series("").unwrap().is_empty());
        assert!(parse_series("# nothing here\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = load_series("/nonexistent/definitely/missing.txt").unwrap_err();
        assert!(matches!(err, MfdfaError::IoError { source: Some(_), .. }));
    }

    #[test]
    fn test_load_round_trip() {
        let path = std::env::temp_dir().join(format!("mfdfa_series_{}.txt", std::process::id()));
        std::fs::write(&path, "0.25\n0.5\n0.75\n").unwrap();
        let loaded = load_series(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, vec![0.25, 0.5, 0.75]);
    }
}
