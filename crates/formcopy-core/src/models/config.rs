//! Configuration structures for the transfer pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{FormCopyError, Result};

/// Main configuration for a formcopy run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Source, destination and output PDF locations.
    pub pdf_paths: PdfPaths,

    /// Allow-list and checkpoint locations.
    pub json_paths: JsonPaths,

    /// Strategy selection.
    #[serde(default)]
    pub transfer: TransferOptions,
}

/// PDF locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfPaths {
    /// Directory holding the source PDF.
    #[serde(rename = "pdf_sorgente")]
    pub source_dir: PathBuf,

    /// Directory holding the destination PDF.
    #[serde(rename = "pdf_destinazione")]
    pub destination_dir: PathBuf,

    /// Where the filled document is written.
    #[serde(rename = "pdf_output")]
    pub output: PathBuf,
}

impl Default for PdfPaths {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("input/source"),
            destination_dir: PathBuf::from("input/destination"),
            output: PathBuf::from("output/filled.pdf"),
        }
    }
}

/// JSON file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonPaths {
    /// Allow-list of fields to copy.
    #[serde(rename = "json_elenco_campi")]
    pub allow_list: PathBuf,

    /// Checkpoint holding every extracted field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<PathBuf>,

    /// Checkpoint holding the filtered fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<PathBuf>,
}

impl Default for JsonPaths {
    fn default() -> Self {
        Self {
            allow_list: PathBuf::from("Config/elenco_campi.json"),
            pre: Some(PathBuf::from("output/pre.json")),
            post: Some(PathBuf::from("output/post.json")),
        }
    }
}

/// Strategy selection for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferOptions {
    /// Single-stage or checkpointed two-stage run.
    pub mode: PipelineMode,

    /// How fields are read from the source PDF.
    pub extraction: ExtractionStrategy,

    /// How extracted fields are matched against the allow-list.
    /// Two-stage runs always select by pattern.
    pub selection: SelectionStrategy,
}

/// Pipeline shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineMode {
    /// Filter in memory.
    #[default]
    Single,
    /// Persist a JSON checkpoint between extraction and filtering.
    TwoStage,
}

/// Field extraction strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionStrategy {
    /// Walk the document's AcroForm field tree.
    #[default]
    #[serde(rename = "acroform")]
    AcroForm,
    /// Walk every page's widget annotations.
    #[serde(rename = "widgets")]
    Widgets,
}

/// Allow-list selection strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStrategy {
    /// Look up each allowed name in the extracted map.
    #[default]
    Direct,
    /// Recover values from the JSON rendering with regular expressions.
    Pattern,
}

impl TransferConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FormCopyError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            FormCopyError::ConfigRead { reason, .. } => FormCopyError::ConfigRead {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| FormCopyError::ConfigRead {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| FormCopyError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check cross-field requirements.
    pub fn validate(&self) -> Result<()> {
        if self.transfer.mode == PipelineMode::TwoStage
            && (self.json_paths.pre.is_none() || self.json_paths.post.is_none())
        {
            return Err(FormCopyError::ConfigRead {
                path: PathBuf::new(),
                reason: "two-stage mode requires json_paths.pre and json_paths.post".to_string(),
            });
        }
        Ok(())
    }
}
