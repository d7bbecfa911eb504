//! Tesseract OCR via `leptess`.
//!
//! One [`TesseractEngine`] is created per extraction run and reused for
//! every page. Pages arrive as packed RGB bitmaps and are handed to
//! Tesseract as in-memory PNGs together with their source resolution, so
//! the engine's size heuristics see the real DPI.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbImage};
use leptess::{LepTess, Variable};

use pdfscribe_core::config_file::OcrSettings;
use pdfscribe_core::tessdata;
use pdfscribe_core::{OcrEngine, OcrError, PageImage};

/// Tesseract-backed [`OcrEngine`].
pub struct TesseractEngine {
    tess: LepTess,
}

impl TesseractEngine {
    /// Initialize Tesseract with the data directory, language and page
    /// segmentation mode.
    ///
    /// The OCR engine mode is left at Tesseract's default; it can only be
    /// chosen at init time and `leptess` does not expose that init variant.
    pub fn new(tessdata: &Path, language: &str, page_segmentation_mode: u32) -> Result<Self, OcrError> {
        let datapath = tessdata
            .to_str()
            .ok_or_else(|| OcrError::Init("tessdata path is not valid UTF-8".into()))?;

        let mut tess = LepTess::new(Some(datapath), language).map_err(|e| {
            OcrError::Init(format!(
                "language '{}' in {}: {}",
                language,
                tessdata.display(),
                e
            ))
        })?;

        tess.set_variable(
            Variable::TesseditPagesegMode,
            &page_segmentation_mode.to_string(),
        )
        .map_err(|e| OcrError::Init(format!("failed to set page segmentation mode: {}", e)))?;

        tracing::info!(
            tessdata = %tessdata.display(),
            language,
            psm = page_segmentation_mode,
            "Tesseract initialized"
        );

        Ok(Self { tess })
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&mut self, image: &PageImage) -> Result<String, OcrError> {
        let png = encode_png(image)?;

        self.tess
            .set_image_from_mem(&png)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        self.tess
            .set_source_resolution(i32::try_from(image.dpi).unwrap_or(i32::MAX));

        let text = self
            .tess
            .get_utf8_text()
            .map_err(|e| OcrError::Recognition(e.to_string()))?;
        tracing::debug!(chars = text.len(), "recognized page");
        Ok(text)
    }
}

/// Encode a packed RGB page as PNG (leptess decodes encoded image data).
pub fn encode_png(image: &PageImage) -> Result<Vec<u8>, OcrError> {
    if image.width == 0 || image.height == 0 {
        return Err(OcrError::InvalidImage(format!(
            "image dimensions must be non-zero (got {}x{})",
            image.width, image.height
        )));
    }

    let rgb = RgbImage::from_raw(image.width, image.height, image.pixels.clone()).ok_or_else(
        || {
            OcrError::InvalidImage(format!(
                "buffer of {} bytes does not fit {}x{} RGB",
                image.pixels.len(),
                image.width,
                image.height
            ))
        },
    )?;

    let mut output = Vec::new();
    DynamicImage::ImageRgb8(rgb)
        .write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| OcrError::InvalidImage(format!("failed to encode PNG: {}", e)))?;
    Ok(output)
}

/// Build an engine from resolved settings, or `None` when OCR is not
/// available.
///
/// Missing language data and initialization failures are logged here; the
/// pipeline then reports the unavailable-OCR text for image-only documents.
pub fn engine_from_settings(settings: &OcrSettings) -> Option<Box<dyn OcrEngine>> {
    let dir = tessdata::locate(settings.tessdata_path.as_deref())?;
    match TesseractEngine::new(&dir, &settings.language, settings.page_segmentation_mode) {
        Ok(engine) => Some(Box::new(engine)),
        Err(e) => {
            tracing::warn!(error = %e, "OCR disabled");
            None
        }
    }
}
