use std::path::Path;

use mupdf::{Colorspace, Document, Matrix, TextPageFlags};

use pdfscribe_core::{BackendError, PageImage, PdfBackend, PdfDocument};

/// PDF user space is 72 units per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that the pipeline and its tests do not
/// transitively depend on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;
        let page_count = document
            .page_count()
            .map_err(|e| BackendError::OpenError(e.to_string()))?;

        Ok(Box::new(MupdfDocument {
            document,
            page_count: usize::try_from(page_count).unwrap_or(0),
        }))
    }
}

/// An open MuPDF document. Closed on drop.
pub struct MupdfDocument {
    document: Document,
    page_count: usize,
}

impl MupdfDocument {
    fn load_page(&self, page_index: usize) -> Result<mupdf::Page, BackendError> {
        let index = i32::try_from(page_index).map_err(|_| BackendError::RenderError {
            page: page_index + 1,
            message: "page index out of range".into(),
        })?;
        self.document
            .load_page(index)
            .map_err(|e| BackendError::RenderError {
                page: page_index + 1,
                message: e.to_string(),
            })
    }
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn extract_text(&self) -> Result<String, BackendError> {
        let mut pages_text = Vec::with_capacity(self.page_count);

        for page_result in self
            .document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            // Block/line iteration keeps one output line per text line
            let mut page_text = String::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    page_text.push_str(&line_text);
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        Ok(pages_text.join("\n"))
    }

    fn render_page(&self, page_index: usize, dpi: u32) -> Result<PageImage, BackendError> {
        let page = self.load_page(page_index)?;
        let render_error = |message: String| BackendError::RenderError {
            page: page_index + 1,
            message,
        };

        let scale = dpi as f32 / POINTS_PER_INCH;
        let matrix = Matrix::new_scale(scale, scale);
        let colorspace = Colorspace::device_rgb();
        let pixmap = page
            .to_pixmap(&matrix, &colorspace, false, false)
            .map_err(|e| render_error(e.to_string()))?;

        let width = pixmap.width() as u32;
        let height = pixmap.height() as u32;
        tracing::debug!(page = page_index + 1, width, height, dpi, "rasterized page");

        let pixels = pack_rgb(pixmap.samples(), width, height, pixmap.n() as usize);
        PageImage::from_rgb(width, height, dpi, pixels)
            .ok_or_else(|| render_error("pixmap size does not match its dimensions".into()))
    }
}

/// Repack `n`-component samples into tightly packed RGB.
///
/// Missing samples read as black; components past the third (alpha) are
/// dropped.
fn pack_rgb(samples: &[u8], width: u32, height: u32, n: usize) -> Vec<u8> {
    let (width, height) = (width as usize, height as usize);
    if n == 3 && samples.len() == width * height * 3 {
        return samples.to_vec();
    }

    let mut rgb = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let offset = (y * width + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let (g, b) = if n >= 3 {
                (
                    samples.get(offset + 1).copied().unwrap_or(0),
                    samples.get(offset + 2).copied().unwrap_or(0),
                )
            } else {
                // Gray
                (r, r)
            };
            rgb.extend_from_slice(&[r, g, b]);
        }
    }
    rgb
}
