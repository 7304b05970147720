pub mod patterns;

use std::fmt;
use log::debug;
use regex::Regex;
use crate::error::{Result, ScanError};

/// Turns the captured text into a number.
pub type ValueParser = fn(&str) -> Option<f64>;

pub fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// One named value to pull out of a log.
#[derive(Clone)]
pub struct FieldPattern {
    pub label: String,
    regex: Regex,
    parser: ValueParser,
}

impl fmt::Debug for FieldPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPattern")
            .field("label", &self.label)
            .field("pattern", &self.regex.as_str())
            .finish()
    }
}

impl FieldPattern {
    pub fn new(label: impl Into<String>, pattern: &str) -> Result<Self> {
        Self::with_parser(label, pattern, parse_float)
    }

    /// The pattern must contain exactly one capture group.
    pub fn with_parser(label: impl Into<String>, pattern: &str, parser: ValueParser) -> Result<Self> {
        let label = label.into();
        let regex = Regex::new(pattern).map_err(|e| ScanError::InvalidPattern {
            label: label.clone(),
            reason: e.to_string(),
        })?;

        // captures_len counts the implicit whole-match group
        if regex.captures_len() != 2 {
            return Err(ScanError::InvalidPattern {
                label,
                reason: format!("expected exactly one capture group, found {}", regex.captures_len() - 1),
            });
        }

        Ok(Self { label, regex, parser })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Value from the first match only; later occurrences are ignored.
    pub fn extract(&self, text: &str) -> Option<f64> {
        let caps = self.regex.captures(text)?;
        let raw = caps.get(1)?.as_str();
        let value = (self.parser)(raw);
        if value.is_none() {
            debug!("{}: could not parse '{}' as a number", self.label, raw);
        }
        value
    }
}

/// Values found in one file, in pattern order. `None` means the field was not
/// present, which is distinct from a zero value.
pub type ExtractedFields = Vec<(String, Option<f64>)>;

/// The fixed set of patterns applied to every file of a run.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    patterns: Vec<FieldPattern>,
}

impl FieldSet {
    pub fn new(patterns: Vec<FieldPattern>) -> Self {
        Self { patterns }
    }

    pub fn push(&mut self, pattern: FieldPattern) {
        self.patterns.retain(|p| p.label != pattern.label);
        self.patterns.push(pattern);
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.label.as_str())
    }

    pub fn patterns(&self) -> &[FieldPattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn extract(&self, text: &str) -> ExtractedFields {
        self.patterns
            .iter()
            .map(|p| (p.label.clone(), p.extract(text)))
            .collect()
    }
}
