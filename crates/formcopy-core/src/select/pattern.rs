//! Pattern recovery of field values from a JSON rendering.
//!
//! Works on text rather than on a parsed map, so it also accepts dumps from
//! backends that only produce something JSON-shaped.

use regex::Regex;
use tracing::{debug, trace};

use super::{FieldSelector, Selection};
use crate::error::Result;
use crate::models::fields::{AllowList, FieldValues};

/// Finds `"name": "value"` pairs, with the key optionally bracket-wrapped.
///
/// Only the first occurrence of a key is used; later duplicates are ignored.
pub struct PatternSelector;

impl PatternSelector {
    /// Create a new pattern selector.
    pub fn new() -> Self {
        Self
    }

    /// Select allowed fields from JSON text such as a checkpoint file.
    pub fn select_text(&self, allow: &AllowList, text: &str) -> Result<Selection> {
        let mut selection = Selection::default();
        for name in allow.iter() {
            let pattern = key_pattern(name)?;
            selection.record(name, capture_value(&pattern, text));
        }
        debug!(
            "Pattern selection kept {} of {} allowed fields",
            selection.values.len(),
            allow.len()
        );
        Ok(selection)
    }
}

impl Default for PatternSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSelector for PatternSelector {
    fn select(&self, allow: &AllowList, extracted: &FieldValues) -> Result<Selection> {
        let text = serde_json::to_string_pretty(extracted)?;
        self.select_text(allow, &text)
    }
}

/// Regex matching `name` as a JSON key in any bracket form, followed by a
/// string or `null` value.
///
/// The key must open an object member, right after `{` or `,`, so a longer
/// key ending in an escaped quote and `name` never matches.
fn key_pattern(name: &str) -> Result<Regex> {
    // Match the key as it appears once JSON-escaped.
    let quoted = serde_json::to_string(name).unwrap_or_else(|_| format!("\"{name}\""));
    let escaped_key = &quoted[1..quoted.len() - 1];

    let pattern = format!(
        r#"[{{,]\s*"\[?{}\]?"\s*:\s*(?:"((?:[^"\\]|\\.)*)"|(null))"#,
        regex::escape(escaped_key)
    );
    Ok(Regex::new(&pattern)?)
}

/// `Some(value)` for the first match, `None` when the key never appears.
fn capture_value(pattern: &Regex, text: &str) -> Option<Option<String>> {
    let caps = pattern.captures(text)?;

    if caps.get(2).is_some() {
        return Some(None);
    }

    let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let value = serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|e| {
        trace!("Keeping raw value, JSON unescape failed: {}", e);
        raw.to_string()
    });
    Some(Some(value))
}
