use std::path::Path;

use crate::backend::{PdfBackend, PdfDocument};
use crate::input::{display_name, validate_pdf_path};
use crate::ocr::OcrEngine;
use crate::{DocumentInfo, ExtractError, ExtractionMethod, ExtractionResult, ProgressEvent};

/// Resolution pages are rasterized at before OCR.
pub const DEFAULT_DPI: u32 = 300;

/// Text returned when the document has no text layer and no OCR engine could
/// be initialized.
pub const OCR_UNAVAILABLE: &str = "OCR not available - Tesseract not properly initialized";

/// Prefix of the text returned when OCR of any page fails.
pub const OCR_FAILED_PREFIX: &str = "OCR extraction failed: ";

/// Header written before each page's OCR text.
pub fn page_header(page_number: usize) -> String {
    format!("--- Page {} ---\n", page_number)
}

/// Runs the load → direct text → OCR fallback pipeline for one document at a time.
pub struct Extractor<'a> {
    backend: &'a dyn PdfBackend,
    ocr: Option<Box<dyn OcrEngine + 'a>>,
    dpi: u32,
}

impl<'a> Extractor<'a> {
    /// An extractor with no OCR engine; image-only documents yield [`OCR_UNAVAILABLE`].
    pub fn new(backend: &'a dyn PdfBackend) -> Self {
        Self {
            backend,
            ocr: None,
            dpi: DEFAULT_DPI,
        }
    }

    /// Set the OCR engine. `None` means the engine failed to initialize.
    pub fn with_ocr(mut self, engine: Option<Box<dyn OcrEngine + 'a>>) -> Self {
        self.ocr = engine;
        self
    }

    /// Set the rasterization resolution used for OCR.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi.max(1);
        self
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Extract the text of the PDF at `path`.
    ///
    /// Only input validation and document loading can fail. A failing direct
    /// extraction falls through to OCR, and OCR problems are reported in the
    /// returned text.
    pub fn extract(
        &mut self,
        path: &Path,
        mut progress: impl FnMut(ProgressEvent),
    ) -> Result<ExtractionResult, ExtractError> {
        validate_pdf_path(path)?;

        let file_name = display_name(path);
        progress(ProgressEvent::Opening {
            file_name: file_name.clone(),
        });

        let document = self.backend.open(path)?;
        let page_count = document.page_count();
        tracing::info!(file = %file_name, pages = page_count, "opened document");
        progress(ProgressEvent::Opened { page_count });

        let info = DocumentInfo {
            file_name,
            page_count,
        };

        if let Some(text) = extract_direct(document.as_ref()) {
            tracing::info!(file = %info.file_name, "text extracted using direct method");
            progress(ProgressEvent::DirectTextFound);
            return Ok(ExtractionResult {
                text,
                method: ExtractionMethod::Direct,
                info,
            });
        }

        tracing::info!(file = %info.file_name, "no embedded text, falling back to OCR");
        progress(ProgressEvent::FallingBackToOcr);

        let engine = self.ocr.as_deref_mut();
        let (text, method) = ocr_document(document.as_ref(), engine, self.dpi, &mut progress);
        Ok(ExtractionResult { text, method, info })
    }
}

/// Whole-document text, or `None` when the library reports nothing usable.
///
/// Backend errors are logged and treated as "no text".
pub fn extract_direct(document: &dyn PdfDocument) -> Option<String> {
    match document.extract_text() {
        Ok(text) if !text.trim().is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "direct text extraction failed");
            None
        }
    }
}

/// OCR every page in order, joining the results under page headers.
///
/// Any page failure discards the pages recognized so far.
pub fn ocr_document(
    document: &dyn PdfDocument,
    engine: Option<&mut (dyn OcrEngine + '_)>,
    dpi: u32,
    progress: &mut dyn FnMut(ProgressEvent),
) -> (String, ExtractionMethod) {
    let Some(engine) = engine else {
        tracing::warn!("OCR requested but no engine is available");
        return (OCR_UNAVAILABLE.to_string(), ExtractionMethod::OcrUnavailable);
    };

    let total = document.page_count();
    let mut full_text = String::new();

    for page_index in 0..total {
        let page_number = page_index + 1;
        progress(ProgressEvent::OcrPage {
            page: page_number,
            total,
        });

        let recognized = document
            .render_page(page_index, dpi)
            .map_err(|e| e.to_string())
            .and_then(|image| {
                tracing::debug!(
                    page = page_number,
                    width = image.width,
                    height = image.height,
                    "rendered page"
                );
                engine.recognize(&image).map_err(|e| e.to_string())
            });

        match recognized {
            Ok(page_text) => {
                full_text.push_str(&page_header(page_number));
                full_text.push_str(&page_text);
                full_text.push_str("\n\n");
            }
            Err(message) => {
                tracing::warn!(page = page_number, error = %message, "OCR aborted");
                return (
                    format!("{}{}", OCR_FAILED_PREFIX, message),
                    ExtractionMethod::OcrFailed,
                );
            }
        }
    }

    (full_text, ExtractionMethod::Ocr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBackend, MockDocument, MockOcr, MockPage};
    use std::sync::atomic::Ordering;

    fn pdf_file(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        path
    }

    #[test]
    fn embedded_text_skips_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let path = pdf_file(&dir, "text.pdf");
        let backend = MockBackend::new(MockDocument::with_text("Hello world\n", 2));
        let ocr = MockOcr::new();
        let calls = ocr.calls();

        let mut extractor = Extractor::new(&backend).with_ocr(Some(Box::new(ocr)));
        let result = extractor.extract(&path, |_| {}).unwrap();

        assert_eq!(result.text, "Hello world\n");
        assert_eq!(result.method, ExtractionMethod::Direct);
        assert_eq!(result.info.page_count, 2);
        assert_eq!(result.info.file_name, "text.pdf");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn image_only_document_gets_one_block_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = pdf_file(&dir, "scan.pdf");
        let backend = MockBackend::new(MockDocument::image_only(3));
        let ocr = MockOcr::new();

        let mut extractor = Extractor::new(&backend).with_ocr(Some(Box::new(ocr)));
        let result = extractor.extract(&path, |_| {}).unwrap();

        assert_eq!(result.method, ExtractionMethod::Ocr);
        assert_eq!(
            result.text,
            "--- Page 1 ---\npage 1 text\n\n--- Page 2 ---\npage 2 text\n\n--- Page 3 ---\npage 3 text\n\n"
        );
    }

    #[test]
    fn whitespace_only_text_counts_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = pdf_file(&dir, "blank.pdf");
        let backend = MockBackend::new(MockDocument::with_text(" \n\t\n", 1));

        let mut extractor = Extractor::new(&backend).with_ocr(Some(Box::new(MockOcr::new())));
        let result = extractor.extract(&path, |_| {}).unwrap();

        assert_eq!(result.method, ExtractionMethod::Ocr);
        assert!(result.text.starts_with("--- Page 1 ---\n"));
    }

    #[test]
    fn no_engine_returns_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let path = pdf_file(&dir, "scan.pdf");
        let backend = MockBackend::new(MockDocument::image_only(2));

        let mut extractor = Extractor::new(&backend);
        let result = extractor.extract(&path, |_| {}).unwrap();

        assert_eq!(result.text, OCR_UNAVAILABLE);
        assert_eq!(result.method, ExtractionMethod::OcrUnavailable);
    }

    #[test]
    fn direct_failure_falls_back_to_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let path = pdf_file(&dir, "broken.pdf");
        let backend = MockBackend::new(MockDocument::image_only(1).failing_text("bad stream"));

        let mut extractor = Extractor::new(&backend).with_ocr(Some(Box::new(MockOcr::new())));
        let result = extractor.extract(&path, |_| {}).unwrap();

        assert_eq!(result.method, ExtractionMethod::Ocr);
        assert_eq!(result.text, "--- Page 1 ---\npage 1 text\n\n");
    }

    #[test]
    fn page_failure_discards_partial_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = pdf_file(&dir, "scan.pdf");
        let backend = MockBackend::new(MockDocument::image_only(3));
        let ocr = MockOcr::new().failing_on_page(2, "engine crashed");

        let mut extractor = Extractor::new(&backend).with_ocr(Some(Box::new(ocr)));
        let result = extractor.extract(&path, |_| {}).unwrap();

        assert_eq!(result.method, ExtractionMethod::OcrFailed);
        assert_eq!(
            result.text,
            "OCR extraction failed: recognition failed: engine crashed"
        );
        assert!(!result.text.contains("--- Page 1 ---"));
    }

    #[test]
    fn render_failure_aborts_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = pdf_file(&dir, "scan.pdf");
        let document = MockDocument::new(vec![MockPage::image(), MockPage::unrenderable()]);
        let backend = MockBackend::new(document);

        let mut extractor = Extractor::new(&backend).with_ocr(Some(Box::new(MockOcr::new())));
        let result = extractor.extract(&path, |_| {}).unwrap();

        assert_eq!(result.method, ExtractionMethod::OcrFailed);
        assert!(result.text.starts_with(OCR_FAILED_PREFIX));
        assert!(result.text.contains("failed to render page 2"));
    }

    #[test]
    fn missing_file_is_reported_before_open() {
        let backend = MockBackend::new(MockDocument::with_text("x", 1));
        let mut extractor = Extractor::new(&backend);
        let err = extractor
            .extract(Path::new("/no/such/file.pdf"), |_| {})
            .unwrap_err();

        assert!(matches!(err, ExtractError::NotFound(_)));
        assert_eq!(backend.open_count(), 0);
    }

    #[test]
    fn non_pdf_is_rejected_before_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = pdf_file(&dir, "scan.png");
        let backend = MockBackend::new(MockDocument::with_text("x", 1));
        let mut extractor = Extractor::new(&backend);

        let err = extractor.extract(&path, |_| {}).unwrap_err();

        assert!(matches!(err, ExtractError::NotPdf(_)));
        assert_eq!(backend.open_count(), 0);
    }

    #[test]
    fn open_failure_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = pdf_file(&dir, "corrupt.pdf");
        let backend = MockBackend::failing_open("no objects found");
        let mut extractor = Extractor::new(&backend);

        let err = extractor.extract(&path, |_| {}).unwrap_err();

        assert!(matches!(err, ExtractError::Load(_)));
        assert_eq!(
            err.to_string(),
            "Error processing PDF: failed to open PDF: no objects found"
        );
    }

    #[test]
    fn progress_events_follow_pipeline_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = pdf_file(&dir, "scan.pdf");
        let backend = MockBackend::new(MockDocument::image_only(2));
        let mut extractor = Extractor::new(&backend).with_ocr(Some(Box::new(MockOcr::new())));

        let mut events = Vec::new();
        extractor.extract(&path, |e| events.push(e)).unwrap();

        assert_eq!(
            events,
            vec![
                ProgressEvent::Opening {
                    file_name: "scan.pdf".into()
                },
                ProgressEvent::Opened { page_count: 2 },
                ProgressEvent::FallingBackToOcr,
                ProgressEvent::OcrPage { page: 1, total: 2 },
                ProgressEvent::OcrPage { page: 2, total: 2 },
            ]
        );
    }

    #[test]
    fn pages_render_at_configured_dpi() {
        let dir = tempfile::tempdir().unwrap();
        let path = pdf_file(&dir, "scan.pdf");
        let backend = MockBackend::new(MockDocument::image_only(1));
        let ocr = MockOcr::new();
        let seen = ocr.seen_dpi();

        let mut extractor = Extractor::new(&backend)
            .with_ocr(Some(Box::new(ocr)))
            .with_dpi(150);
        extractor.extract(&path, |_| {}).unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 150);
    }

    #[test]
    fn default_dpi_is_300() {
        let backend = MockBackend::new(MockDocument::image_only(1));
        assert_eq!(Extractor::new(&backend).dpi(), 300);
        assert_eq!(Extractor::new(&backend).with_dpi(0).dpi(), 1);
    }
}
