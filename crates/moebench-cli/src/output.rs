//! Text formatting and parsing of numeric tables.

use std::path::Path;
use std::time::Duration;

use moebench_core::error::EvalError;
use moebench_core::indicator::Measurement;

/// Marker printed for undefined indicator cells.
pub const UNDEFINED_MARKER: &str = "-";

/// Marker printed for statistics that are not applicable.
pub const NOT_APPLICABLE_MARKER: &str = "NA";

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.0}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.1}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.2}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        format!("{mins}m{:.0}s", secs - mins as f64 * 60.0)
    }
}

/// Format an indicator score in scientific notation.
#[must_use]
pub fn format_score(value: f64) -> String {
    format!("{value:.4e}")
}

/// Format a cell, printing [`UNDEFINED_MARKER`] for undefined values.
#[must_use]
pub fn format_measurement(value: Measurement) -> String {
    value
        .value()
        .map_or_else(|| UNDEFINED_MARKER.to_string(), format_score)
}

/// Format a p-value with fixed precision, switching to scientific notation
/// for very small values.
#[must_use]
pub fn format_p_value(p: f64) -> String {
    if p < 1e-4 {
        format!("{p:.2e}")
    } else {
        format!("{p:.4}")
    }
}

/// One vector per line, components separated by tabs.
#[must_use]
pub fn format_vectors(vectors: &[Vec<f64>]) -> String {
    let mut out = String::new();
    for v in vectors {
        let line: Vec<String> = v.iter().map(f64::to_string).collect();
        out.push_str(&line.join("\t"));
        out.push('\n');
    }
    out
}

/// Parse vectors separated by newlines, components by whitespace or commas.
///
/// Blank lines and lines starting with `#` are skipped. Every vector must
/// have the same length.
pub fn parse_vectors(text: &str) -> Result<Vec<Vec<f64>>, EvalError> {
    let mut vectors: Vec<Vec<f64>> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let vector = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<f64>().map_err(|e| {
                    EvalError::Io(format!("line {}: invalid number {t:?}: {e}", lineno + 1))
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        if let Some(first) = vectors.first() {
            if first.len() != vector.len() {
                return Err(EvalError::DimensionMismatch {
                    expected: first.len(),
                    found: vector.len(),
                });
            }
        }
        vectors.push(vector);
    }
    Ok(vectors)
}

/// Read a front file.
pub fn read_front(path: &Path) -> Result<Vec<Vec<f64>>, EvalError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| EvalError::Io(format!("{}: {e}", path.display())))?;
    parse_vectors(&text)
}
