//! Builder for small fillable PDFs used by tests.

use std::path::Path;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::{FormCopyError, Result};
use crate::pdf::encode_text_string;

/// Builds an in-memory document with text fields on A4 pages.
///
/// Page numbers are 1-indexed; pages referenced before they were added are
/// created empty.
pub struct FormBuilder {
    doc: Document,
    pages_id: ObjectId,
    pages: Vec<Vec<Object>>,
    fields: Vec<Object>,
    acroform: bool,
}

impl FormBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            pages: Vec::new(),
            fields: Vec::new(),
            acroform: true,
        }
    }

    /// Append a page holding one text field per entry.
    pub fn page(mut self, fields: &[(&str, Option<&str>)]) -> Self {
        let page = self.pages.len() + 1;
        self.ensure_page(page);
        for (name, value) in fields {
            let id = self.widget(Some(encode_text_string(name)), *value, None);
            self.pages[page - 1].push(id.into());
            self.fields.push(id.into());
        }
        self
    }

    /// Add a field whose `/T` is given as raw string bytes.
    pub fn raw_field(mut self, page: usize, name: Vec<u8>, value: Option<&str>) -> Self {
        self.ensure_page(page);
        let name = Object::String(name, StringFormat::Hexadecimal);
        let id = self.widget(Some(name), value, None);
        self.pages[page - 1].push(id.into());
        self.fields.push(id.into());
        self
    }

    /// Add one field shown by an unnamed widget on each of `pages`.
    pub fn shared_field(mut self, name: &str, value: Option<&str>, pages: &[usize]) -> Self {
        let parent_id = self.doc.new_object_id();
        let mut kids = Vec::new();
        for &page in pages {
            self.ensure_page(page);
            let kid = self.widget(None, None, Some(parent_id));
            self.pages[page - 1].push(kid.into());
            kids.push(kid.into());
        }

        let mut parent = dictionary! {
            "FT" => "Tx",
            "T" => encode_text_string(name),
            "Kids" => kids,
        };
        if let Some(value) = value {
            parent.set("V", encode_text_string(value));
        }
        self.doc.objects.insert(parent_id, Object::Dictionary(parent));
        self.fields.push(parent_id.into());
        self
    }

    /// Add a non-terminal field grouping named children placed on `page`.
    pub fn group(
        mut self,
        name: &str,
        value: Option<&str>,
        children: &[(&str, Option<&str>)],
        page: usize,
    ) -> Self {
        self.ensure_page(page);
        let parent_id = self.doc.new_object_id();
        let mut kids = Vec::new();
        for (child, child_value) in children {
            let kid = self.widget(Some(encode_text_string(child)), *child_value, Some(parent_id));
            self.pages[page - 1].push(kid.into());
            kids.push(kid.into());
        }

        let mut parent = dictionary! {
            "T" => encode_text_string(name),
            "Kids" => kids,
        };
        if let Some(value) = value {
            parent.set("V", encode_text_string(value));
        }
        self.doc.objects.insert(parent_id, Object::Dictionary(parent));
        self.fields.push(parent_id.into());
        self
    }

    /// Add a link annotation, which is not a form widget.
    pub fn link_annotation(mut self, page: usize) -> Self {
        self.ensure_page(page);
        let link = self.doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => rect(),
        });
        self.pages[page - 1].push(link.into());
        self
    }

    /// Leave the catalog without an `/AcroForm` entry.
    pub fn without_acroform(mut self) -> Self {
        self.acroform = false;
        self
    }

    pub fn build(mut self) -> Document {
        let mut kids = Vec::with_capacity(self.pages.len());
        for annots in std::mem::take(&mut self.pages) {
            let content_id = self.doc.add_object(Stream::new(Dictionary::new(), Vec::new()));
            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(595),
                    Object::Integer(842),
                ],
                "Contents" => content_id,
                "Annots" => annots,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        };
        if self.acroform {
            let acroform_id = self.doc.add_object(dictionary! {
                "Fields" => std::mem::take(&mut self.fields),
                "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
            });
            catalog.set("AcroForm", acroform_id);
        }
        let catalog_id = self.doc.add_object(catalog);
        self.doc.trailer.set("Root", catalog_id);

        self.doc
    }

    /// Build and write the document to `path`.
    pub fn save(self, path: &Path) -> Result<()> {
        let mut doc = self.build();
        doc.save(path).map_err(|e| FormCopyError::OutputWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn ensure_page(&mut self, page: usize) {
        while self.pages.len() < page {
            self.pages.push(Vec::new());
        }
    }

    fn widget(&mut self, name: Option<Object>, value: Option<&str>, parent: Option<ObjectId>) -> ObjectId {
        let mut widget = dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "Rect" => rect(),
        };
        if let Some(name) = name {
            widget.set("FT", "Tx");
            widget.set("T", name);
        }
        if let Some(value) = value {
            widget.set("V", encode_text_string(value));
        }
        if let Some(parent) = parent {
            widget.set("Parent", parent);
        }
        self.doc.add_object(widget)
    }
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn rect() -> Object {
    Object::Array(vec![
        Object::Integer(50),
        Object::Integer(700),
        Object::Integer(250),
        Object::Integer(720),
    ])
}
