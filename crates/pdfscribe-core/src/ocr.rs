use thiserror::Error;

use crate::backend::PageImage;

/// Default Tesseract language.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Default page segmentation mode: automatic with orientation and script detection.
pub const DEFAULT_PAGE_SEGMENTATION_MODE: u32 = 1;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("failed to initialize OCR engine: {0}")]
    Init(String),
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("recognition failed: {0}")]
    Recognition(String),
}

/// Trait for OCR engines.
///
/// An engine is constructed once per extraction run and fed one page bitmap
/// at a time.
pub trait OcrEngine {
    /// Recognize the text in a rendered page.
    fn recognize(&mut self, image: &PageImage) -> Result<String, OcrError>;
}
