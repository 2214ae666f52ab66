//! Subcommand implementations.

pub mod config;
pub mod extract;
pub mod transfer;

use clap::ValueEnum;

use formcopy_core::{ExtractionStrategy, PipelineMode, SelectionStrategy};

/// Pipeline shape for `--mode`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    /// Filter in memory
    Single,
    /// Go through the pre/post JSON checkpoints
    TwoStage,
}

impl From<ModeArg> for PipelineMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Single => PipelineMode::Single,
            ModeArg::TwoStage => PipelineMode::TwoStage,
        }
    }
}

/// Extraction strategy for `--extraction`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExtractionArg {
    /// Walk the AcroForm field tree
    Acroform,
    /// Walk every page's widget annotations
    Widgets,
}

impl From<ExtractionArg> for ExtractionStrategy {
    fn from(arg: ExtractionArg) -> Self {
        match arg {
            ExtractionArg::Acroform => ExtractionStrategy::AcroForm,
            ExtractionArg::Widgets => ExtractionStrategy::Widgets,
        }
    }
}

/// Selection strategy for `--selection`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SelectionArg {
    /// Look names up in the extracted map
    Direct,
    /// Recover values from the JSON rendering
    Pattern,
}

impl From<SelectionArg> for SelectionStrategy {
    fn from(arg: SelectionArg) -> Self {
        match arg {
            SelectionArg::Direct => SelectionStrategy::Direct,
            SelectionArg::Pattern => SelectionStrategy::Pattern,
        }
    }
}
