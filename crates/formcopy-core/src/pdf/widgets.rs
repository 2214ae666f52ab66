//! Page widget traversal.

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::trace;

use super::{partial_name, value_text, FieldSource};
use crate::models::fields::{FieldValues, NOT_AVAILABLE};

/// A fillable field reached through a page's widget annotation.
#[derive(Debug, Clone)]
pub(crate) struct WidgetField {
    /// Page number (1-indexed).
    pub page: u32,
    /// The object carrying `/T`: the widget itself, or its parent field.
    pub field_id: ObjectId,
    /// Partial field name.
    pub name: String,
    /// Current value, if any.
    pub value: Option<String>,
}

/// Extracts fields by visiting every widget annotation on every page.
///
/// Fields without a value are recorded as [`NOT_AVAILABLE`] so "never filled"
/// stays distinguishable from "filled with an empty string". The pipeline
/// folds the marker back into an absent value before writing.
pub struct WidgetSource;

impl WidgetSource {
    /// Create a new widget traversal source.
    pub fn new() -> Self {
        Self
    }
}

impl Default for WidgetSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSource for WidgetSource {
    fn extract_document(&self, doc: &Document) -> FieldValues {
        let mut fields = FieldValues::new();
        for widget in page_widgets(doc) {
            let value = widget.value.unwrap_or_else(|| NOT_AVAILABLE.to_string());
            fields.entry(widget.name).or_insert(Some(value));
        }
        fields
    }
}

/// Every widget-backed field of the document, in page order.
///
/// Widgets are terminal fields when they carry `/T`; otherwise their `/Parent`
/// is the field and supplies the name and inherited value.
pub(crate) fn page_widgets(doc: &Document) -> Vec<WidgetField> {
    let mut widgets = Vec::new();

    for (page_number, page_id) in doc.get_pages() {
        let Ok(page) = doc.get_dictionary(page_id) else {
            continue;
        };
        let Some(annots) = page
            .get(b"Annots")
            .ok()
            .and_then(|annots| doc.dereference(annots).ok())
            .and_then(|(_, annots)| annots.as_array().ok())
        else {
            continue;
        };

        for annot in annots {
            let Object::Reference(annot_id) = annot else {
                trace!("Skipping inline annotation on page {}", page_number);
                continue;
            };
            let Ok(dict) = doc.get_dictionary(*annot_id) else {
                continue;
            };
            if !is_widget(dict) {
                continue;
            }

            if let Some(field) = resolve_field(doc, *annot_id, dict, page_number) {
                trace!("Page {}: widget {:?} -> field {}", field.page, annot_id, field.name);
                widgets.push(field);
            }
        }
    }

    widgets
}

fn is_widget(dict: &Dictionary) -> bool {
    dict.get(b"Subtype")
        .and_then(Object::as_name)
        .map(|subtype| subtype == b"Widget")
        .unwrap_or(false)
}

fn resolve_field(
    doc: &Document,
    widget_id: ObjectId,
    widget: &Dictionary,
    page: u32,
) -> Option<WidgetField> {
    if let Some(name) = partial_name(doc, widget) {
        let value = widget.get(b"V").ok().and_then(|v| value_text(doc, v));
        return Some(WidgetField {
            page,
            field_id: widget_id,
            name,
            value,
        });
    }

    let parent_id = widget.get(b"Parent").and_then(Object::as_reference).ok()?;
    let parent = doc.get_dictionary(parent_id).ok()?;
    let name = partial_name(doc, parent)?;
    let value = widget
        .get(b"V")
        .or_else(|_| parent.get(b"V"))
        .ok()
        .and_then(|v| value_text(doc, v));

    Some(WidgetField {
        page,
        field_id: parent_id,
        name,
        value,
    })
}
