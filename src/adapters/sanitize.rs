//! Log redaction for personal data.
//!
//! Voice transcripts and typed input end up in log lines, and users say all
//! sorts of things. Formatted log output is passed through [`Redactor`]
//! before it reaches the sink, replacing:
//! - email addresses
//! - phone numbers
//! - UUIDs
//! - SSN-like identifiers (xxx-xx-xxxx)
//! - long digit runs (card, account or record numbers)
//!
//! Input beyond `max_bytes` is dropped and marked `[TRUNCATED]`
//! (`DOBBY_SANITIZE_MAX_BYTES`, default 16 KiB).

use std::sync::OnceLock;

use regex::{Regex, RegexSet};
use tracing_subscriber::fmt::MakeWriter;

/// Default cap on bytes redacted per line.
pub const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

const TRUNCATED_MARKER: &str = " [TRUNCATED]";

static RULES: OnceLock<Rules> = OnceLock::new();

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Rules {
    any: RegexSet,
    ordered: Vec<Rule>,
}

// Applied in order: UUIDs and SSNs before phones, phones before bare digits.
const PATTERNS: [(&str, &str); 5] = [
    (
        r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b",
        "[REDACTED-UUID]",
    ),
    (
        r"(?i)\b[a-z0-9][a-z0-9._%+-]{0,63}@(?:[a-z0-9-]{1,63}\.)+[a-z]{2,}\b",
        "[REDACTED-EMAIL]",
    ),
    (r"\b\d{3}-\d{2}-\d{4}\b", "[REDACTED-SSN]"),
    (
        r"(?:\+\d{1,3}[-.\s]?)?\(?\b\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b",
        "[REDACTED-PHONE]",
    ),
    (r"\b\d{9,}\b", "[REDACTED-NUMBER]"),
];

#[allow(clippy::expect_used)]
fn rules() -> &'static Rules {
    RULES.get_or_init(|| {
        // Patterns are compile-time constants covered by the tests below.
        let any = RegexSet::new(PATTERNS.iter().map(|(p, _)| *p)).expect("valid pattern set");
        let ordered = PATTERNS
            .iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(pattern).expect("valid pattern"),
                replacement,
            })
            .collect();
        Rules { any, ordered }
    })
}

fn split_at_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Replaces personal data in free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redactor {
    max_bytes: usize,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DEFAULT_SANITIZE_MAX_BYTES)
    }
}

impl Redactor {
    /// A zero limit falls back to the default.
    #[must_use]
    pub fn new(max_bytes: usize) -> Self {
        let max_bytes = if max_bytes == 0 {
            DEFAULT_SANITIZE_MAX_BYTES
        } else {
            max_bytes
        };
        Self { max_bytes }
    }

    #[must_use]
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Redact `input`, truncating it to the configured size first.
    #[must_use]
    pub fn redact(&self, input: &str) -> String {
        let (head, truncated) = split_at_char_boundary(input, self.max_bytes);
        let rules = rules();

        let mut out = if rules.any.is_match(head) {
            let hits = rules.any.matches(head);
            let mut text = head.to_string();
            for (idx, rule) in rules.ordered.iter().enumerate() {
                // Later rules may still match what earlier ones left behind
                if hits.matched(idx) || rule.regex.is_match(&text) {
                    text = rule.regex.replace_all(&text, rule.replacement).into_owned();
                }
            }
            text
        } else {
            head.to_string()
        };

        if truncated {
            out.push_str(TRUNCATED_MARKER);
        }
        out
    }

    /// Whether anything in the first `max_bytes` of `input` would be redacted.
    #[must_use]
    pub fn contains_personal_data(&self, input: &str) -> bool {
        let (head, _) = split_at_char_boundary(input, self.max_bytes);
        rules().any.is_match(head)
    }
}

/// Redact with the default size limit.
#[must_use]
pub fn redact(input: &str) -> String {
    Redactor::default().redact(input)
}

/// `MakeWriter` wrapper that redacts each formatted log line.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
    redactor: Redactor,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M, redactor: Redactor) -> Self {
        Self { inner, redactor }
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            redactor: self.redactor,
            pending: Vec::new(),
        }
    }
}

/// Line-buffering writer produced by [`SanitizingMakeWriter`].
pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    redactor: Redactor,
    pending: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn emit(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        let redacted = self.redactor.redact(&text);
        self.inner.write_all(redacted.as_bytes())?;
        if !redacted.ends_with('\n') {
            self.inner.write_all(b"\n")?;
        }
        Ok(())
    }

    fn emit_complete_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.emit_complete_lines()?;

        // A line with no newline in sight is flushed once it passes twice the cap.
        if self.pending.len() > self.redactor.max_bytes().saturating_mul(2) {
            let line = std::mem::take(&mut self.pending);
            self.emit(&line)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.emit_complete_lines()?;
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}
