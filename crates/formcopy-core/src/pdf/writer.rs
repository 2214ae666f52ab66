//! Writing field values into a destination document.

use std::path::Path;

use lopdf::{Document, Object, ObjectId};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::widgets::page_widgets;
use super::{encode_text_string, open_document, FieldSink};
use crate::error::{FormCopyError, Result};
use crate::matcher;
use crate::models::fields::{coerce_value, FieldValues};

/// A field that received a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenField {
    /// Canonical name from the filtered set.
    pub name: String,
    /// Value written after coercion.
    pub value: String,
    /// Number of distinct destination field objects updated.
    pub occurrences: usize,
}

/// Outcome of a write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    /// Fields written, in filtered-set order.
    pub written: Vec<WrittenField>,
    /// Filtered names with no matching destination field.
    pub skipped: Vec<String>,
}

/// Fills widget-backed fields and saves the document atomically.
pub struct AcroFormWriter {
    need_appearances: bool,
}

impl AcroFormWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self {
            need_appearances: true,
        }
    }

    /// Set whether `/NeedAppearances` is raised so viewers redraw the fields.
    pub fn with_need_appearances(mut self, enabled: bool) -> Self {
        self.need_appearances = enabled;
        self
    }

    /// Fill an open document in place.
    ///
    /// Every destination field whose name matches a key, under any accepted
    /// decoration, gets the coerced value. Each field object is updated once
    /// even when several widgets share it.
    pub fn fill_document(&self, doc: &mut Document, values: &FieldValues) -> WriteReport {
        let mut targets: Vec<(ObjectId, String)> = Vec::new();
        for widget in page_widgets(doc) {
            if !targets.iter().any(|(id, _)| *id == widget.field_id) {
                targets.push((widget.field_id, widget.name));
            }
        }

        let mut report = WriteReport::default();

        for (name, value) in values {
            let text = coerce_value(value.as_deref());
            let mut occurrences = 0;

            for (field_id, _) in targets.iter().filter(|(_, field)| matcher::matches(name, field)) {
                match doc.get_dictionary_mut(*field_id) {
                    Ok(field) => {
                        field.set("V", encode_text_string(&text));
                        occurrences += 1;
                    }
                    Err(e) => warn!("Cannot update field {} ({:?}): {}", name, field_id, e),
                }
            }

            if occurrences == 0 {
                debug!("No destination field named {}", name);
                report.skipped.push(name.clone());
                continue;
            }

            info!("Wrote field {} = {:?} ({} occurrence(s))", name, text, occurrences);
            report.written.push(WrittenField {
                name: name.clone(),
                value: text,
                occurrences,
            });
        }

        if self.need_appearances && !report.written.is_empty() {
            set_need_appearances(doc);
        }

        report
    }
}

impl Default for AcroFormWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSink for AcroFormWriter {
    fn write(&self, destination: &Path, output: &Path, values: &FieldValues) -> Result<WriteReport> {
        let mut doc = open_document(destination)?;
        let report = self.fill_document(&mut doc, values);
        save_atomically(&mut doc, output)?;

        info!(
            "Saved {} with {} field(s) written, {} skipped",
            output.display(),
            report.written.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}

fn set_need_appearances(doc: &mut Document) {
    let Ok(root_id) = doc.trailer.get(b"Root").and_then(Object::as_reference) else {
        return;
    };
    let acroform = doc
        .get_dictionary(root_id)
        .and_then(|catalog| catalog.get(b"AcroForm"))
        .cloned();

    match acroform {
        Ok(Object::Reference(acroform_id)) => {
            if let Ok(acroform) = doc.get_dictionary_mut(acroform_id) {
                acroform.set("NeedAppearances", true);
            }
        }
        Ok(Object::Dictionary(_)) => {
            if let Ok(Object::Dictionary(acroform)) = doc
                .get_dictionary_mut(root_id)
                .and_then(|catalog| catalog.get_mut(b"AcroForm"))
            {
                acroform.set("NeedAppearances", true);
            }
        }
        _ => debug!("No AcroForm dictionary to flag for appearance regeneration"),
    }
}

/// Save through a temporary file in the output directory, then rename.
///
/// A failed save leaves no file at `output`.
fn save_atomically(doc: &mut Document, output: &Path) -> Result<()> {
    let write_error = |reason: String| FormCopyError::OutputWrite {
        path: output.to_path_buf(),
        reason,
    };

    let dir = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_error(e.to_string()))?;
    doc.save_to(staged.as_file_mut())
        .map_err(|e| write_error(e.to_string()))?;
    staged
        .persist(output)
        .map_err(|e| write_error(e.error.to_string()))?;
    Ok(())
}
