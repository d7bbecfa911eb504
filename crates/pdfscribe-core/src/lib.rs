use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod input;
pub mod mock;
pub mod ocr;
pub mod pipeline;
pub mod tessdata;

// Re-export for convenience
pub use backend::{BackendError, PageImage, PdfBackend, PdfDocument};
pub use input::{default_output_name, display_name, is_pdf_path, validate_pdf_path};
pub use ocr::{OcrEngine, OcrError};
pub use pipeline::{DEFAULT_DPI, Extractor, OCR_FAILED_PREFIX, OCR_UNAVAILABLE};

/// What the pipeline knows about a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub file_name: String,
    pub page_count: usize,
}

/// How the returned text was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Embedded text layer.
    Direct,
    /// Per-page OCR, one `--- Page N ---` block per page.
    Ocr,
    /// No text layer and no OCR engine; the text is [`OCR_UNAVAILABLE`].
    OcrUnavailable,
    /// OCR aborted on a page; the text starts with [`OCR_FAILED_PREFIX`].
    OcrFailed,
}

impl ExtractionMethod {
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionMethod::Direct => "direct",
            ExtractionMethod::Ocr => "OCR",
            ExtractionMethod::OcrUnavailable => "OCR unavailable",
            ExtractionMethod::OcrFailed => "OCR failed",
        }
    }

    /// Whether the text is a diagnostic message rather than document content.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            ExtractionMethod::OcrUnavailable | ExtractionMethod::OcrFailed
        )
    }
}

/// Result of extracting text from a document: a flat text blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub text: String,
    pub method: ExtractionMethod,
    pub info: DocumentInfo,
}

/// Progress events emitted while a document is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Opening { file_name: String },
    Opened { page_count: usize },
    DirectTextFound,
    FallingBackToOcr,
    /// OCR is starting on `page` (1-based) of `total`.
    OcrPage { page: usize, total: usize },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Opening { file_name } => write!(f, "Processing PDF: {}", file_name),
            ProgressEvent::Opened { page_count } => write!(f, "PDF has {} pages", page_count),
            ProgressEvent::DirectTextFound => {
                write!(f, "Text extracted successfully using direct method")
            }
            ProgressEvent::FallingBackToOcr => {
                write!(f, "No text found with direct extraction, using OCR...")
            }
            ProgressEvent::OcrPage { page, total } => {
                write!(f, "Processing page {} of {}...", page, total)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("PDF file does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("File is not a PDF: {}", .0.display())]
    NotPdf(PathBuf),
    #[error("Error processing PDF: {0}")]
    Load(#[from] BackendError),
}

/// Write `text` to `path` exactly as given.
pub fn save_text(path: &Path, text: &str) -> std::io::Result<()> {
    std::fs::write(path, text.as_bytes())?;
    tracing::info!(path = %path.display(), bytes = text.len(), "saved extracted text");
    Ok(())
}
