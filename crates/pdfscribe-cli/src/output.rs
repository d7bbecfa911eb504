use std::io::Write;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use pdfscribe_core::ProgressEvent;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Renders pipeline progress on stderr.
///
/// On a terminal OCR pages drive a progress bar; otherwise each page gets
/// its own status line.
pub struct StatusReporter {
    color: ColorMode,
    quiet: bool,
    show_bar: bool,
    page_count: usize,
    bar: Option<ProgressBar>,
}

impl StatusReporter {
    pub fn new(color: ColorMode, quiet: bool, show_bar: bool) -> Self {
        Self {
            color,
            quiet,
            show_bar,
            page_count: 0,
            bar: None,
        }
    }

    pub fn handle(&mut self, event: &ProgressEvent) {
        if self.quiet {
            return;
        }
        match event {
            ProgressEvent::Opened { page_count } => {
                self.page_count = *page_count;
                self.line(&event.to_string(), LineKind::Plain);
            }
            ProgressEvent::DirectTextFound => self.line(&event.to_string(), LineKind::Success),
            ProgressEvent::FallingBackToOcr => {
                self.line(&event.to_string(), LineKind::Warning);
                if self.show_bar && self.page_count > 0 {
                    self.bar = Some(page_bar(self.page_count));
                }
            }
            ProgressEvent::OcrPage { page, total } => match &self.bar {
                Some(bar) => {
                    bar.set_position(page.saturating_sub(1) as u64);
                    bar.set_message(format!("page {}/{}", page, total));
                }
                None => self.line(&event.to_string(), LineKind::Dim),
            },
            ProgressEvent::Opening { .. } => self.line(&event.to_string(), LineKind::Plain),
        }
    }

    /// Clear the progress bar, if any.
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn line(&self, msg: &str, kind: LineKind) {
        let styled = if self.color.enabled() {
            match kind {
                LineKind::Plain => msg.to_string(),
                LineKind::Success => msg.green().to_string(),
                LineKind::Warning => msg.yellow().to_string(),
                LineKind::Dim => msg.dimmed().to_string(),
            }
        } else {
            msg.to_string()
        };
        match &self.bar {
            Some(bar) => bar.println(styled),
            None => eprintln!("{}", styled),
        }
    }
}

#[derive(Clone, Copy)]
enum LineKind {
    Plain,
    Success,
    Warning,
    Dim,
}

fn page_bar(total: usize) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{spinner:.green} OCR [{bar:40.green/dim}] {pos}/{len} {msg} (eta {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");
    let bar = ProgressBar::new(total as u64);
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Print the extracted text after its banner.
pub fn print_extracted_text(w: &mut dyn Write, text: &str, color: ColorMode) -> std::io::Result<()> {
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", "=== EXTRACTED TEXT ===".bold())?;
    } else {
        writeln!(w, "=== EXTRACTED TEXT ===")?;
    }
    writeln!(w, "{}", text)?;
    Ok(())
}

/// Print the save confirmation.
pub fn print_saved(w: &mut dyn Write, path: &std::path::Path, color: ColorMode) -> std::io::Result<()> {
    let msg = format!("Text saved to: {}", path.display());
    if color.enabled() {
        writeln!(w, "{}", msg.green())
    } else {
        writeln!(w, "{}", msg)
    }
}

/// Print a fatal error.
pub fn print_error(w: &mut dyn Write, err: &anyhow::Error, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {:#}", "Error:".red().bold(), err)
    } else {
        writeln!(w, "Error: {:#}", err)
    }
}
