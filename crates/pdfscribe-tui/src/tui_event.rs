use std::path::PathBuf;

use pdfscribe_core::{ExtractionResult, ProgressEvent};

/// Commands sent from the TUI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Extract the text of one PDF.
    Extract { path: PathBuf },
}

/// Events flowing from the extraction worker to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// The worker picked up the document.
    ExtractionStarted { file_name: String },
    /// Pipeline progress (page count, fallback, OCR page).
    Progress(ProgressEvent),
    /// Extraction finished; the text may be a degraded-OCR message.
    ExtractionComplete(ExtractionResult),
    /// The document could not be validated or loaded.
    ExtractionFailed { error: String },
}
