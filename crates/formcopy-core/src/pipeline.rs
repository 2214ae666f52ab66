//! One transfer run: locate, extract, select, write.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::discover::find_pdf_in_directory;
use crate::error::{FormCopyError, Result};
use crate::models::config::{ExtractionStrategy, PipelineMode, TransferConfig};
use crate::models::fields::{clear_not_available, AllowList, FieldValues};
use crate::pdf::{source_for, AcroFormWriter, FieldSink, WriteReport};
use crate::select::{selector_for, PatternSelector, Selection};
use crate::store;

/// Pipeline states, entered in order. The checkpoint states only occur in
/// two-stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Idle,
    SourceLocated,
    Extracted,
    Persisted,
    FilteredViaPattern,
    Reloaded,
    Filtered,
    Written,
    Done,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReport {
    /// Resolved source document.
    pub source: PathBuf,
    /// Resolved destination document.
    pub destination: PathBuf,
    /// Written document.
    pub output: PathBuf,
    /// Number of fields found in the source.
    pub extracted: usize,
    /// Values selected for transfer, keyed by canonical name.
    pub filtered: FieldValues,
    /// Allowed names not found in the source.
    pub missing: Vec<String>,
    /// Destination write outcome.
    pub write: WriteReport,
    /// States the run went through.
    pub stages: Vec<Stage>,
}

/// Runs a transfer with an explicit configuration.
pub struct Pipeline {
    config: TransferConfig,
}

impl Pipeline {
    /// Create a pipeline for `config`.
    pub fn new(config: TransferConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Execute one run.
    ///
    /// Allow-list and checkpoint failures are logged and replaced with empty
    /// data; locating, opening and saving documents are fatal.
    pub fn run(&self) -> Result<TransferReport> {
        self.config.validate()?;
        let mut stages = Vec::new();
        enter(&mut stages, Stage::Idle);

        let allow = self.load_allow_list();

        let source = find_pdf_in_directory(&self.config.pdf_paths.source_dir)?;
        let destination = find_pdf_in_directory(&self.config.pdf_paths.destination_dir)?;
        info!("Source: {}", source.display());
        info!("Destination: {}", destination.display());
        enter(&mut stages, Stage::SourceLocated);

        let source_fields = source_for(self.config.transfer.extraction);
        let extracted = source_fields.extract(&source)?;
        info!("Extracted {} fields from source", extracted.len());
        enter(&mut stages, Stage::Extracted);

        let mut selection = match self.config.transfer.mode {
            PipelineMode::Single => {
                selector_for(self.config.transfer.selection).select(&allow, &extracted)?
            }
            PipelineMode::TwoStage => self.select_via_checkpoints(&allow, &extracted, &mut stages)?,
        };
        if self.config.transfer.extraction == ExtractionStrategy::Widgets {
            clear_not_available(&mut selection.values);
        }
        if !selection.missing.is_empty() {
            debug!("Allowed fields absent from source: {:?}", selection.missing);
        }
        enter(&mut stages, Stage::Filtered);

        let output = self.config.pdf_paths.output.clone();
        let write = AcroFormWriter::new().write(&destination, &output, &selection.values)?;
        enter(&mut stages, Stage::Written);
        enter(&mut stages, Stage::Done);

        Ok(TransferReport {
            source,
            destination,
            output,
            extracted: extracted.len(),
            filtered: selection.values,
            missing: selection.missing,
            write,
            stages,
        })
    }

    fn load_allow_list(&self) -> AllowList {
        store::load_allow_list(&self.config.json_paths.allow_list).unwrap_or_else(|e| {
            warn!("{}; continuing with an empty field list", e);
            AllowList::default()
        })
    }

    /// Persist the extraction, pattern-select from the persisted text, persist
    /// the selection and reload it.
    fn select_via_checkpoints(
        &self,
        allow: &AllowList,
        extracted: &FieldValues,
        stages: &mut Vec<Stage>,
    ) -> Result<Selection> {
        let pre = checkpoint_path(self.config.json_paths.pre.as_deref(), "pre")?;
        let post = checkpoint_path(self.config.json_paths.post.as_deref(), "post")?;

        for path in [pre, post] {
            if let Err(e) = store::invalidate_checkpoint(path) {
                warn!("{}", e);
            }
        }

        let pre_text = match store::write_checkpoint(pre, extracted) {
            Ok(()) => {
                enter(stages, Stage::Persisted);
                store::read_checkpoint_text(pre).unwrap_or_else(|e| {
                    warn!("{}; continuing with no extracted fields", e);
                    String::from("{}")
                })
            }
            Err(e) => {
                warn!("{}; filtering the in-memory extraction", e);
                serde_json::to_string_pretty(extracted)?
            }
        };

        let selection = PatternSelector::new().select_text(allow, &pre_text)?;
        enter(stages, Stage::FilteredViaPattern);

        let values = match store::write_checkpoint(post, &selection.values) {
            Ok(()) => match store::read_checkpoint(post) {
                Ok(values) => {
                    enter(stages, Stage::Reloaded);
                    values
                }
                Err(e) => {
                    warn!("{}; continuing with no filtered fields", e);
                    FieldValues::new()
                }
            },
            Err(e) => {
                warn!("{}; writing the in-memory selection", e);
                selection.values.clone()
            }
        };

        Ok(Selection {
            values,
            missing: selection.missing,
        })
    }
}

fn checkpoint_path<'a>(path: Option<&'a Path>, name: &str) -> Result<&'a Path> {
    path.ok_or_else(|| FormCopyError::ConfigRead {
        path: PathBuf::new(),
        reason: format!("two-stage mode requires json_paths.{name}"),
    })
}

fn enter(stages: &mut Vec<Stage>, stage: Stage) {
    debug!("Pipeline stage: {:?}", stage);
    stages.push(stage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::fixtures::FormBuilder;
    use crate::models::config::{JsonPaths, PdfPaths, SelectionStrategy, TransferOptions};
    use crate::pdf::{decode_text_string, open_document, AcroFormSource, FieldSource};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            for sub in ["source", "destination", "output", "Config"] {
                fs::create_dir(dir.path().join(sub)).unwrap();
            }
            Self { dir }
        }

        fn path(&self, relative: &str) -> PathBuf {
            self.dir.path().join(relative)
        }

        fn allow(&self, names: &[&str]) {
            let json = serde_json::json!({ "fields_to_copy": names });
            fs::write(self.path("Config/elenco_campi.json"), json.to_string()).unwrap();
        }

        fn source(&self, builder: FormBuilder) {
            builder.save(&self.path("source/modulo.pdf")).unwrap();
        }

        fn destination(&self, builder: FormBuilder) {
            builder.save(&self.path("destination/template.pdf")).unwrap();
        }

        fn config(&self, mode: PipelineMode, extraction: ExtractionStrategy) -> TransferConfig {
            TransferConfig {
                pdf_paths: PdfPaths {
                    source_dir: self.path("source"),
                    destination_dir: self.path("destination"),
                    output: self.path("output/filled.pdf"),
                },
                json_paths: JsonPaths {
                    allow_list: self.path("Config/elenco_campi.json"),
                    pre: Some(self.path("output/pre.json")),
                    post: Some(self.path("output/post.json")),
                },
                transfer: TransferOptions {
                    mode,
                    extraction,
                    selection: SelectionStrategy::Direct,
                },
            }
        }

        fn output_fields(&self) -> FieldValues {
            AcroFormSource::new().extract(&self.path("output/filled.pdf")).unwrap()
        }
    }

    fn values(pairs: &[(&str, Option<&str>)]) -> FieldValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_decorated_source_names_are_selected() {
        let ws = Workspace::new();
        ws.allow(&["Name", "DateOfBirth"]);
        ws.source(FormBuilder::new().page(&[
            ("Name", Some("Alice")),
            ("[DateOfBirth]", Some("1990-01-01")),
            ("Extra", Some("ignored")),
        ]));
        ws.destination(FormBuilder::new().page(&[
            ("Name", None),
            ("DateOfBirth", None),
            ("Extra", Some("original")),
        ]));

        let report = Pipeline::new(ws.config(PipelineMode::Single, ExtractionStrategy::AcroForm))
            .run()
            .unwrap();

        assert_eq!(
            report.filtered,
            values(&[("Name", Some("Alice")), ("DateOfBirth", Some("1990-01-01"))])
        );
        assert_eq!(report.extracted, 3);
        assert_eq!(
            ws.output_fields(),
            values(&[
                ("Name", Some("Alice")),
                ("DateOfBirth", Some("1990-01-01")),
                ("Extra", Some("original")),
            ])
        );
    }

    #[test]
    fn test_missing_field_is_not_an_error() {
        let ws = Workspace::new();
        ws.allow(&["Missing"]);
        ws.source(FormBuilder::new().page(&[]));
        ws.destination(FormBuilder::new().page(&[("Missing", Some("kept"))]));

        let report = Pipeline::new(ws.config(PipelineMode::Single, ExtractionStrategy::AcroForm))
            .run()
            .unwrap();

        assert!(report.filtered.is_empty());
        assert_eq!(report.missing, vec!["Missing".to_string()]);
        assert!(report.write.written.is_empty());
        assert_eq!(ws.output_fields(), values(&[("Missing", Some("kept"))]));
    }

    #[test]
    fn test_null_source_value_written_as_empty_string() {
        let ws = Workspace::new();
        ws.allow(&["Field"]);
        ws.source(FormBuilder::new().page(&[("Field]", None)]));
        ws.destination(FormBuilder::new().page(&[("Field", Some("stale"))]));

        let report = Pipeline::new(ws.config(PipelineMode::TwoStage, ExtractionStrategy::AcroForm))
            .run()
            .unwrap();

        assert_eq!(read_json(&ws.path("output/pre.json")), serde_json::json!({ "Field]": null }));
        assert_eq!(read_json(&ws.path("output/post.json")), serde_json::json!({ "Field": null }));
        assert_eq!(report.write.written[0].value, "");
        assert_eq!(ws.output_fields(), values(&[("Field", Some(""))]));
    }

    #[test]
    fn test_duplicate_destination_fields_all_filled() {
        let ws = Workspace::new();
        ws.allow(&["Signature"]);
        ws.source(FormBuilder::new().page(&[("Signature", Some("John Doe"))]));
        ws.destination(
            FormBuilder::new()
                .page(&[("Signature", None)])
                .page(&[("Signature", None)]),
        );

        let report = Pipeline::new(ws.config(PipelineMode::Single, ExtractionStrategy::Widgets))
            .run()
            .unwrap();
        assert_eq!(report.write.written[0].occurrences, 2);

        // Both occurrences carry the value; the widget view sees both pages.
        let doc = lopdf_reload(&ws.path("output/filled.pdf"));
        let signatures: Vec<String> = doc
            .into_iter()
            .filter(|(name, _)| name == "Signature")
            .map(|(_, value)| value)
            .collect();
        assert_eq!(signatures, vec!["John Doe".to_string(), "John Doe".to_string()]);
    }

    /// Every widget-level `(name, value)` pair, re-read from disk.
    fn lopdf_reload(path: &Path) -> Vec<(String, String)> {
        let doc = open_document(path).unwrap();
        let mut pairs = Vec::new();
        for (_, page_id) in doc.get_pages() {
            let page = doc.get_dictionary(page_id).unwrap();
            let annots = page.get(b"Annots").unwrap().as_array().unwrap();
            for annot in annots {
                let widget = doc.get_dictionary(annot.as_reference().unwrap()).unwrap();
                let name = widget.get(b"T").unwrap().as_str().unwrap();
                let value = widget.get(b"V").unwrap().as_str().unwrap();
                pairs.push((
                    decode_text_string(name),
                    decode_text_string(value),
                ));
            }
        }
        pairs
    }

    #[test]
    fn test_empty_source_directory_aborts_before_extraction() {
        let ws = Workspace::new();
        ws.allow(&["Name"]);
        fs::write(ws.path("source/readme.txt"), "no forms here").unwrap();
        ws.destination(FormBuilder::new().page(&[("Name", None)]));

        let err = Pipeline::new(ws.config(PipelineMode::TwoStage, ExtractionStrategy::AcroForm))
            .run()
            .unwrap_err();

        assert!(matches!(err, FormCopyError::NoMatchingDirectoryFile(ref dir) if dir == &ws.path("source")));
        assert!(!ws.path("output/pre.json").exists());
        assert!(!ws.path("output/filled.pdf").exists());
    }

    #[test]
    fn test_round_trip_preserves_written_values() {
        let ws = Workspace::new();
        let names = ["Name", "City", "Notes"];
        ws.allow(&names);
        ws.source(FormBuilder::new().page(&[
            ("Name", Some("Zoë Müller")),
            ("City", Some("Città di Castello")),
            ("Notes", Some("first line; done")),
        ]));
        ws.destination(
            FormBuilder::new()
                .page(&[("Name", None), ("City", None)])
                .page(&[("Notes", None), ("Unrelated", None)]),
        );

        let report = Pipeline::new(ws.config(PipelineMode::Single, ExtractionStrategy::AcroForm))
            .run()
            .unwrap();

        let output = ws.output_fields();
        for name in names {
            assert_eq!(output.get(name), report.filtered.get(name), "field {name}");
        }
        assert_eq!(output.get("Unrelated"), Some(&None));
    }

    #[test]
    fn test_two_stage_replaces_stale_checkpoints() {
        let ws = Workspace::new();
        ws.allow(&["Name", "Stale"]);
        fs::write(ws.path("output/pre.json"), r#"{"Stale": "from another document"}"#).unwrap();
        fs::write(ws.path("output/post.json"), r#"{"Stale": "from another document"}"#).unwrap();
        ws.source(FormBuilder::new().page(&[("[Name]", Some("Alice"))]));
        ws.destination(FormBuilder::new().page(&[("Name", None), ("Stale", None)]));

        let report = Pipeline::new(ws.config(PipelineMode::TwoStage, ExtractionStrategy::AcroForm))
            .run()
            .unwrap();

        assert_eq!(report.filtered, values(&[("Name", Some("Alice"))]));
        assert_eq!(read_json(&ws.path("output/pre.json")), serde_json::json!({ "[Name]": "Alice" }));
        assert_eq!(read_json(&ws.path("output/post.json")), serde_json::json!({ "Name": "Alice" }));
        assert_eq!(
            report.stages,
            vec![
                Stage::Idle,
                Stage::SourceLocated,
                Stage::Extracted,
                Stage::Persisted,
                Stage::FilteredViaPattern,
                Stage::Reloaded,
                Stage::Filtered,
                Stage::Written,
                Stage::Done,
            ]
        );
        assert_eq!(ws.output_fields().get("Stale"), Some(&None));
    }

    #[test]
    fn test_widget_sentinel_collapses_to_empty_string() {
        let ws = Workspace::new();
        ws.allow(&["Notes"]);
        ws.source(FormBuilder::new().page(&[("Notes", None)]));
        ws.destination(FormBuilder::new().page(&[("Notes", Some("old"))]));

        let report = Pipeline::new(ws.config(PipelineMode::TwoStage, ExtractionStrategy::Widgets))
            .run()
            .unwrap();

        assert_eq!(read_json(&ws.path("output/pre.json")), serde_json::json!({ "Notes": "N/A" }));
        assert_eq!(report.write.written[0].value, "");
        assert_eq!(ws.output_fields(), values(&[("Notes", Some(""))]));
    }

    #[test]
    fn test_unreadable_allow_list_transfers_nothing() {
        let ws = Workspace::new();
        fs::write(ws.path("Config/elenco_campi.json"), "not json").unwrap();
        ws.source(FormBuilder::new().page(&[("Name", Some("Alice"))]));
        ws.destination(FormBuilder::new().page(&[("Name", None)]));

        let report = Pipeline::new(ws.config(PipelineMode::Single, ExtractionStrategy::AcroForm))
            .run()
            .unwrap();

        assert!(report.filtered.is_empty());
        assert_eq!(report.extracted, 1);
        assert_eq!(ws.output_fields(), values(&[("Name", None)]));
    }

    #[test]
    fn test_corrupt_source_document_is_fatal() {
        let ws = Workspace::new();
        ws.allow(&["Name"]);
        fs::write(ws.path("source/broken.pdf"), "%PDF-1.5 truncated").unwrap();
        ws.destination(FormBuilder::new().page(&[("Name", None)]));

        let err = Pipeline::new(ws.config(PipelineMode::Single, ExtractionStrategy::AcroForm))
            .run()
            .unwrap_err();

        assert!(matches!(err, FormCopyError::DocumentOpen { .. }));
        assert!(!ws.path("output/filled.pdf").exists());
    }

    #[test]
    fn test_literal_not_available_value_survives_transfer() {
        let ws = Workspace::new();
        ws.allow(&["Status"]);
        ws.source(FormBuilder::new().page(&[("Status", Some("N/A"))]));
        ws.destination(FormBuilder::new().page(&[("Status", None)]));

        let report = Pipeline::new(ws.config(PipelineMode::Single, ExtractionStrategy::AcroForm))
            .run()
            .unwrap();

        assert_eq!(report.write.written[0].value, "N/A");
        assert_eq!(ws.output_fields(), values(&[("Status", Some("N/A"))]));
    }
}
