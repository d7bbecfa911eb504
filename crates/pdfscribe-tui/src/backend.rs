use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use pdfscribe_core::config_file::OcrSettings;
use pdfscribe_core::{Extractor, OcrEngine, PdfBackend, display_name};

use crate::tui_event::BackendEvent;

/// Run one extraction on the blocking pool, forwarding progress to the UI.
///
/// The document handle and the OCR engine are created and dropped inside the
/// blocking task; only events cross back to the UI thread.
pub async fn run_extraction<F>(
    path: PathBuf,
    pdf_backend: Arc<dyn PdfBackend>,
    settings: Arc<OcrSettings>,
    make_engine: F,
    tx: mpsc::UnboundedSender<BackendEvent>,
) where
    F: FnOnce(&OcrSettings) -> Option<Box<dyn OcrEngine>> + Send + 'static,
{
    let _ = tx.send(BackendEvent::ExtractionStarted {
        file_name: display_name(&path),
    });

    let progress_tx = tx.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let engine = make_engine(&settings);
        let mut extractor = Extractor::new(pdf_backend.as_ref())
            .with_ocr(engine)
            .with_dpi(settings.dpi);
        extractor.extract(&path, |event| {
            let _ = progress_tx.send(BackendEvent::Progress(event));
        })
    })
    .await;

    let event = match joined {
        Ok(Ok(result)) => BackendEvent::ExtractionComplete(result),
        Ok(Err(e)) => BackendEvent::ExtractionFailed {
            error: e.to_string(),
        },
        Err(e) => {
            tracing::error!(error = %e, "extraction task panicked");
            BackendEvent::ExtractionFailed {
                error: format!("extraction task failed: {}", e),
            }
        }
    };
    let _ = tx.send(event);
}
