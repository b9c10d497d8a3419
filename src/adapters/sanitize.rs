//! Log sanitization for patient metrics.
//!
//! Formatted log lines pass through [`SanitizingMakeWriter`] before they reach
//! the sink. It redacts:
//! - named metric values (`glucose=148`, `bmi: 33.6`, ...)
//! - five-element numeric vectors (a feature row printed with `{:?}`)
//! - email addresses
//!
//! Call sites should still avoid logging metric values; this is the fallback.
//!
//! `sanitize()` caps its input (see `GLYCOSCOPE_SANITIZE_MAX_BYTES`) so a
//! runaway log line cannot stall the writer.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static METRIC_PATTERNS: OnceLock<MetricPatterns> = OnceLock::new();

/// Defaults to 16 KiB; can be overridden via `GLYCOSCOPE_SANITIZE_MAX_BYTES`.
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct MetricPattern {
    regex: Regex,
    replacement: &'static str,
}

struct MetricPatterns {
    set: RegexSet,
    patterns: Vec<MetricPattern>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var("GLYCOSCOPE_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn get_patterns() -> &'static MetricPatterns {
    METRIC_PATTERNS.get_or_init(|| {
        let rules: Vec<(&'static str, &'static str)> = vec![
            // Named metrics, as written by `field=value` or `field: value`
            (
                r"(?i)\b(glucose|blood_pressure|insulin|bmi|age)(\s*[=:]\s*)-?\d+(?:\.\d+)?",
                "${1}${2}[REDACTED]",
            ),
            // Feature rows: exactly five numbers in brackets
            (
                r"\[\s*-?\d+(?:\.\d+)?(?:\s*,\s*-?\d+(?:\.\d+)?){4}\s*\]",
                "[REDACTED-FEATURES]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let patterns = rules
            .into_iter()
            .map(|(pattern, replacement)| MetricPattern {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        MetricPatterns { set, patterns }
    })
}

/// Replace patient metrics in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let pattern = &patterns.patterns[idx];
        result = pattern
            .regex
            .replace_all(&result, pattern.replacement)
            .into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check if a string contains anything `sanitize` would redact.
#[must_use]
pub fn contains_metrics(input: &str) -> bool {
    let (prefix, _) = truncate_to_char_boundary(input, max_sanitize_bytes());
    get_patterns().set.is_match(prefix)
}

/// A `tracing_subscriber` writer wrapper that sanitizes formatted log output
/// before it is written to the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W> SanitizingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let sanitized = sanitize(&String::from_utf8_lossy(&line));
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A line with no newline still gets written once it grows past the cap.
        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n[TRUNCATED]\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;

        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }

        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sanitize_named_metrics() {
        let sanitized = sanitize("submission glucose=148 bmi: 33.6 age=50");
        assert!(!sanitized.contains("148"));
        assert!(!sanitized.contains("33.6"));
        assert!(!sanitized.contains("50"));
        assert!(sanitized.contains("glucose=[REDACTED]"));
        assert!(sanitized.contains("bmi: [REDACTED]"));
    }

    #[test]
    fn test_sanitize_feature_row() {
        let sanitized = sanitize("features [120.0, 70.0, 80.0, 25.0, 30.0] sent");
        assert_eq!(sanitized, "features [REDACTED-FEATURES] sent");
    }

    #[test]
    fn test_other_vectors_untouched() {
        let input = "labels [1] shape [2, 3]";
        assert_eq!(sanitize(input), input);
        assert!(!contains_metrics(input));
    }

    #[test]
    fn test_sanitize_email() {
        let sanitized = sanitize("contact clinician@example.org");
        assert!(sanitized.contains("[REDACTED-EMAIL]"));
    }

    #[test]
    fn test_plain_text_passes() {
        assert_eq!(sanitize("Loaded model from \"x.json\""), "Loaded model from \"x.json\"");
        assert!(contains_metrics("insulin=80"));
    }

    #[test]
    fn test_sanitize_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("glucose=148 and a long tail", 8);
        assert!(sanitized.ends_with("[TRUNCATED]"));
    }

    #[test]
    fn test_writer_sanitizes_per_line() {
        let mut sink = Vec::new();
        {
            let mut writer = SanitizingWriter::new(&mut sink);
            writer.write_all(b"insulin=").expect("write");
            writer.write_all(b"85\nok\n").expect("write");
            writer.flush().expect("flush");
        }
        let out = String::from_utf8(sink).expect("utf8");
        assert_eq!(out, "insulin=[REDACTED]\nok\n");
    }
}
