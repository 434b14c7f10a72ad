//! Metric extraction from the host binary's standard output.
//!
//! The host reports its results as labelled lines:
//!
//! ```text
//! Average cycles per DPU: 1234
//! Overall throughput: 5.6 MB/s
//! ```
//!
//! Values are kept as the text following the label up to the end of its line.
//! A missing label yields `None`; the line order is irrelevant.

use std::fmt;

pub const CYCLES_LABEL: &str = "Average cycles per DPU: ";
pub const THROUGHPUT_LABEL: &str = "Overall throughput: ";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metrics {
    pub cycles: Option<String>,
    pub throughput: Option<String>,
}

impl Metrics {
    /// Both labels were found.
    pub fn is_complete(&self) -> bool {
        self.cycles.is_some() && self.throughput.is_some()
    }

    pub fn cycles_value(&self) -> Option<f64> {
        self.cycles.as_deref().and_then(leading_number)
    }

    pub fn throughput_value(&self) -> Option<f64> {
        self.throughput.as_deref().and_then(leading_number)
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "cycles={}, throughput={}",
            self.cycles.as_deref().unwrap_or("<absent>"),
            self.throughput.as_deref().unwrap_or("<absent>")
        )
    }
}

/// Pull both metrics out of `raw`.
pub fn extract(raw: &str) -> Metrics {
    Metrics {
        cycles: find_labelled(raw, CYCLES_LABEL),
        throughput: find_labelled(raw, THROUGHPUT_LABEL),
    }
}

/// Value after the first occurrence of `label`, up to the end of that line.
pub fn find_labelled(raw: &str, label: &str) -> Option<String> {
    raw.lines().find_map(|line| {
        line.find(label)
            .map(|start| line[start + label.len()..].to_string())
    })
}

/// Parse the decimal number a metric starts with, e.g. `5.6` in `"5.6 MB/s"`.
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse().ok()
}
