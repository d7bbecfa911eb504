//! In-memory backend and OCR doubles for testing the pipeline without
//! MuPDF or Tesseract.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::backend::{BackendError, PageImage, PdfBackend, PdfDocument};
use crate::ocr::{OcrEngine, OcrError};

/// One page of a [`MockDocument`].
#[derive(Clone, Debug)]
pub struct MockPage {
    renderable: bool,
}

impl MockPage {
    /// A page that renders to a small blank bitmap.
    pub fn image() -> Self {
        Self { renderable: true }
    }

    /// A page whose rendering fails.
    pub fn unrenderable() -> Self {
        Self { renderable: false }
    }
}

/// A document with a fixed text layer and a list of pages.
#[derive(Clone, Debug)]
pub struct MockDocument {
    text: Result<String, String>,
    pages: Vec<MockPage>,
}

impl MockDocument {
    /// A document with no text layer and the given pages.
    pub fn new(pages: Vec<MockPage>) -> Self {
        Self {
            text: Ok(String::new()),
            pages,
        }
    }

    /// A document whose text layer holds `text`.
    pub fn with_text(text: &str, page_count: usize) -> Self {
        Self {
            text: Ok(text.to_string()),
            pages: vec![MockPage::image(); page_count],
        }
    }

    /// A scanned document: renderable pages, empty text layer.
    pub fn image_only(page_count: usize) -> Self {
        Self::new(vec![MockPage::image(); page_count])
    }

    /// Make direct text extraction fail with `message`.
    pub fn failing_text(mut self, message: &str) -> Self {
        self.text = Err(message.to_string());
        self
    }
}

impl PdfDocument for MockDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extract_text(&self) -> Result<String, BackendError> {
        self.text
            .clone()
            .map_err(BackendError::ExtractionError)
    }

    fn render_page(&self, page_index: usize, dpi: u32) -> Result<PageImage, BackendError> {
        match self.pages.get(page_index) {
            Some(page) if page.renderable => Ok(PageImage {
                width: 4,
                height: 4,
                dpi,
                pixels: vec![255; 4 * 4 * 3],
            }),
            _ => Err(BackendError::RenderError {
                page: page_index + 1,
                message: "mock page cannot be rendered".into(),
            }),
        }
    }
}

/// A [`PdfBackend`] that hands out clones of one [`MockDocument`].
pub struct MockBackend {
    document: Result<MockDocument, String>,
    open_count: AtomicUsize,
}

impl MockBackend {
    pub fn new(document: MockDocument) -> Self {
        Self {
            document: Ok(document),
            open_count: AtomicUsize::new(0),
        }
    }

    /// A backend whose `open` always fails with `message`.
    pub fn failing_open(message: &str) -> Self {
        Self {
            document: Err(message.to_string()),
            open_count: AtomicUsize::new(0),
        }
    }

    /// Number of times `open` has been called.
    pub fn open_count(&self) -> usize {
        self.open_count.load(Ordering::SeqCst)
    }
}

impl PdfBackend for MockBackend {
    fn open(&self, _path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        self.open_count.fetch_add(1, Ordering::SeqCst);
        match &self.document {
            Ok(doc) => Ok(Box::new(doc.clone())),
            Err(message) => Err(BackendError::OpenError(message.clone())),
        }
    }
}

/// An [`OcrEngine`] that answers `page N text` for the N-th call.
pub struct MockOcr {
    calls: Arc<AtomicUsize>,
    last_dpi: Arc<AtomicU32>,
    fail_on: Option<(usize, String)>,
}

impl MockOcr {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            last_dpi: Arc::new(AtomicU32::new(0)),
            fail_on: None,
        }
    }

    /// Fail the call for `page` (1-based) with `message`.
    pub fn failing_on_page(mut self, page: usize, message: &str) -> Self {
        self.fail_on = Some((page, message.to_string()));
        self
    }

    /// Shared call counter, readable after the engine has been moved.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Resolution of the last image seen.
    pub fn seen_dpi(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.last_dpi)
    }
}

impl Default for MockOcr {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for MockOcr {
    fn recognize(&mut self, image: &PageImage) -> Result<String, OcrError> {
        let page = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.last_dpi.store(image.dpi, Ordering::SeqCst);
        match &self.fail_on {
            Some((fail_page, message)) if *fail_page == page => {
                Err(OcrError::Recognition(message.clone()))
            }
            _ => Ok(format!("page {} text", page)),
        }
    }
}
