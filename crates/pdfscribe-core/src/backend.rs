use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("failed to render page {page}: {message}")]
    RenderError { page: usize, message: String },
}

/// An 8-bit RGB bitmap of a rendered page, row-major with no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub width: u32,
    pub height: u32,
    /// Resolution the page was rasterized at.
    pub dpi: u32,
    pub pixels: Vec<u8>,
}

impl PageImage {
    /// Wrap a raw RGB buffer. Returns `None` if the buffer length does not
    /// match `width * height * 3`.
    pub fn from_rgb(width: u32, height: u32, dpi: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize * 3 {
            return None;
        }
        Some(Self {
            width,
            height,
            dpi,
            pixels,
        })
    }
}

/// An opened PDF document.
///
/// Handles are created by [`PdfBackend::open`] and released when dropped.
pub trait PdfDocument {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Extract the embedded text of every page, concatenated in page order.
    ///
    /// Returns an empty string when the document has no text layer.
    fn extract_text(&self) -> Result<String, BackendError>;

    /// Rasterize the page at `page_index` (0-based) at the given resolution.
    fn render_page(&self, page_index: usize, dpi: u32) -> Result<PageImage, BackendError>;
}

/// Trait for PDF parsing/rendering backends.
///
/// Implementors provide the low-level library calls; the fallback logic
/// (direct text first, OCR when empty) lives in [`crate::pipeline::Extractor`].
pub trait PdfBackend: Send + Sync {
    /// Open the PDF at `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_image_accepts_exact_rgb_buffer() {
        let image = PageImage::from_rgb(2, 3, 300, vec![0; 18]).unwrap();
        assert_eq!(image.width, 2);
        assert_eq!(image.height, 3);
        assert_eq!(image.dpi, 300);
    }

    #[test]
    fn page_image_rejects_short_buffer() {
        assert!(PageImage::from_rgb(2, 3, 300, vec![0; 17]).is_none());
    }

    #[test]
    fn render_error_names_page() {
        let err = BackendError::RenderError {
            page: 4,
            message: "out of memory".into(),
        };
        assert_eq!(err.to_string(), "failed to render page 4: out of memory");
    }
}
