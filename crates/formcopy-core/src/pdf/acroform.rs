//! Structural extraction through the document's AcroForm field tree.

use lopdf::{Document, Object};
use tracing::{debug, trace, warn};

use super::{partial_name, value_text, FieldSource};
use crate::models::fields::FieldValues;

/// Field trees deeper than this are treated as cyclic.
const MAX_DEPTH: usize = 32;

/// Extracts fields by walking `/AcroForm /Fields` and its `/Kids`.
///
/// Terminal fields are keyed by their partial name, the same name the page
/// widgets expose, so extraction and writing agree. Absent values stay `None`.
pub struct AcroFormSource;

impl AcroFormSource {
    /// Create a new AcroForm source.
    pub fn new() -> Self {
        Self
    }

    fn walk<'a>(
        &self,
        doc: &'a Document,
        node: &'a Object,
        inherited: Option<&'a Object>,
        depth: usize,
        fields: &mut FieldValues,
    ) {
        if depth > MAX_DEPTH {
            warn!("Field tree deeper than {} levels, stopping descent", MAX_DEPTH);
            return;
        }

        let Ok((_, Object::Dictionary(dict))) = doc.dereference(node) else {
            return;
        };

        // /V is inheritable from ancestors.
        let value = dict.get(b"V").ok().or(inherited);

        let kids: Vec<&Object> = dict
            .get(b"Kids")
            .ok()
            .and_then(|kids| doc.dereference(kids).ok())
            .and_then(|(_, kids)| kids.as_array().ok())
            .map(|kids| kids.iter().collect())
            .unwrap_or_default();

        let (field_kids, widget_kids): (Vec<&Object>, Vec<&Object>) =
            kids.into_iter().partition(|kid| is_named(doc, kid));

        for kid in field_kids.iter().copied() {
            self.walk(doc, kid, value, depth + 1, fields);
        }

        let terminal = field_kids.is_empty() || !widget_kids.is_empty();
        if !terminal {
            return;
        }

        if let Some(name) = partial_name(doc, dict) {
            let text = value.and_then(|v| value_text(doc, v));
            trace!("Field {} = {:?}", name, text);
            fields.entry(name).or_insert(text);
        }
    }
}

impl Default for AcroFormSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSource for AcroFormSource {
    fn extract_document(&self, doc: &Document) -> FieldValues {
        let mut fields = FieldValues::new();

        let Some(roots) = root_fields(doc) else {
            debug!("Document has no AcroForm fields");
            return fields;
        };

        for root in roots {
            self.walk(doc, root, None, 0, &mut fields);
        }

        fields
    }
}

fn root_fields(doc: &Document) -> Option<&Vec<Object>> {
    let acroform = doc.catalog().ok()?.get(b"AcroForm").ok()?;
    let (_, acroform) = doc.dereference(acroform).ok()?;
    let fields = acroform.as_dict().ok()?.get(b"Fields").ok()?;
    let (_, fields) = doc.dereference(fields).ok()?;
    fields.as_array().ok()
}

fn is_named(doc: &Document, node: &Object) -> bool {
    doc.dereference(node)
        .ok()
        .and_then(|(_, node)| node.as_dict().ok())
        .map(|dict| dict.has(b"T"))
        .unwrap_or(false)
}
