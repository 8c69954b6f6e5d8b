use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::export::ExportError;
use crate::core::io::swc::SwcError;
use crate::core::io::ugx::UgxError;
use crate::core::models::cell::CellError;
use crate::core::ordering::reordering::ReorderingError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Failed to load grid: {source}")]
    Grid {
        #[from]
        source: UgxError,
    },

    #[error("Failed to load morphology: {source}")]
    Morphology {
        #[from]
        source: SwcError,
    },

    #[error("Ordering failed: {source}")]
    Ordering {
        #[from]
        source: ReorderingError,
    },

    #[error("Cell construction failed: {source}")]
    Cell {
        #[from]
        source: CellError,
    },

    #[error("Export failed: {source}")]
    Export {
        #[from]
        source: ExportError,
    },
}
