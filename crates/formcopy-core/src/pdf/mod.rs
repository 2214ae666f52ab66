//! PDF form access: field extraction and field writing.

mod acroform;
mod text;
mod widgets;
mod writer;

pub use acroform::AcroFormSource;
pub use text::{decode_text_string, encode_text_string};
pub use widgets::WidgetSource;
pub use writer::{AcroFormWriter, WriteReport, WrittenField};

use std::path::Path;

use lopdf::{Document, Object};
use tracing::debug;

use crate::error::{FormCopyError, Result};
use crate::models::config::ExtractionStrategy;
use crate::models::fields::FieldValues;

/// Produces the name to value mapping of every fillable field in a document.
pub trait FieldSource {
    /// Extract fields from an already opened document.
    fn extract_document(&self, doc: &Document) -> FieldValues;

    /// Open `path` read-only and extract its fields.
    ///
    /// The document is dropped before returning on every path.
    fn extract(&self, path: &Path) -> Result<FieldValues> {
        let doc = open_document(path)?;
        let fields = self.extract_document(&doc);
        debug!("Extracted {} fields from {}", fields.len(), path.display());
        Ok(fields)
    }
}

/// Writes field values into a destination document and persists the result.
pub trait FieldSink {
    /// Fill `destination` with `values` and save it to `output`.
    ///
    /// `output` may equal `destination`.
    fn write(&self, destination: &Path, output: &Path, values: &FieldValues) -> Result<WriteReport>;
}

/// Build the field source for a configured strategy.
pub fn source_for(strategy: ExtractionStrategy) -> Box<dyn FieldSource> {
    match strategy {
        ExtractionStrategy::AcroForm => Box::new(AcroFormSource::new()),
        ExtractionStrategy::Widgets => Box::new(WidgetSource::new()),
    }
}

/// Load a PDF from disk.
///
/// Documents encrypted with an empty user password are decrypted in place.
pub fn open_document(path: &Path) -> Result<Document> {
    let open_error = |reason: String| FormCopyError::DocumentOpen {
        path: path.to_path_buf(),
        reason,
    };

    let mut doc = Document::load(path).map_err(|e| open_error(e.to_string()))?;

    if doc.is_encrypted() {
        if doc.decrypt("").is_err() {
            return Err(open_error("document is encrypted".to_string()));
        }
        debug!("Decrypted {} with empty password", path.display());
    }

    Ok(doc)
}

/// Render a field value object as text.
///
/// Strings are decoded, names pass through (checkbox and radio states), and
/// arrays of either are joined with `, `. Other kinds have no text form.
pub(crate) fn value_text(doc: &Document, value: &Object) -> Option<String> {
    let (_, value) = doc.dereference(value).ok()?;
    match value {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(|item| value_text(doc, item)).collect();
            Some(parts.join(", "))
        }
        _ => None,
    }
}

/// Decode the `/T` partial name of a field dictionary.
pub(crate) fn partial_name(doc: &Document, dict: &lopdf::Dictionary) -> Option<String> {
    let name = dict.get(b"T").ok()?;
    let (_, name) = doc.dereference(name).ok()?;
    name.as_str().ok().map(decode_text_string)
}
