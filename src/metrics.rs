//! Metric Records and Text Rendering
//!
//! This module defines the records produced by the translators and renders them
//! in the line-oriented text format scraped by Prometheus.
//!
//! # Line Format
//!
//! ```text
//! nimble_connections 5
//! nimble_srt_sender_link_rtt { stream_id="live/cam1", id="42"} 12.5
//! ```
//!
//! - Records without labels render as `name value`
//! - Labeled records render as `name { k1="v1", k2="v2"} value`
//!
//! # Value Types
//!
//! - **Integer**: counters and sizes, rendered without a decimal point
//! - **Float**: rates and round-trip times, rendered in the shortest form that
//!   parses back to the same `f64`
//! - **Text**: string fields such as the scaling mode, rendered as a bare token
//!   with line breaks escaped as `\n` and `\r`
//!
//! All metrics use the `nimble_` namespace prefix.

use std::fmt::{self, Write};

/// Value carried by a single metric line
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{}", v),
            MetricValue::Float(v) if v.is_nan() => f.write_str("NaN"),
            MetricValue::Float(v) if v.is_infinite() => {
                f.write_str(if v.is_sign_positive() { "+Inf" } else { "-Inf" })
            }
            // Debug keeps a `.0` on integral values and is round-trip exact
            MetricValue::Float(v) => write!(f, "{:?}", v),
            MetricValue::Text(v) => {
                // A bare token must stay on its own line
                for c in v.chars() {
                    match c {
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        c => f.write_char(c)?,
                    }
                }
                Ok(())
            }
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Integer(v)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

impl From<String> for MetricValue {
    fn from(v: String) -> Self {
        MetricValue::Text(v)
    }
}

/// Ordered label set with unique keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels(Vec<(String, String)>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label, replacing the value in place if the key already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A single metric line before rendering
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub name: String,
    pub labels: Labels,
    pub value: MetricValue,
}

impl MetricRecord {
    pub fn new(name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        Self {
            name: name.into(),
            labels: Labels::new(),
            value: value.into(),
        }
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Append this record as one line, including the trailing newline.
    pub fn write_line(&self, out: &mut String) {
        out.push_str(&self.name);
        if !self.labels.is_empty() {
            out.push_str(" {");
            for (i, (key, value)) in self.labels.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                escape_label_value(value, out);
                out.push('"');
            }
            out.push('}');
        }
        // Writing into a String cannot fail
        let _ = writeln!(out, " {}", self.value);
    }
}

/// Render a batch of records, one line each
pub fn render(records: &[MetricRecord]) -> String {
    let mut out = String::with_capacity(records.len() * 64);
    for record in records {
        record.write_line(&mut out);
    }
    out
}

fn escape_label_value(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
}
