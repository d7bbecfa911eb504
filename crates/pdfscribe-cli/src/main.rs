use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;

use pdfscribe_core::config_file::{self, OcrOverrides, OcrSettings};
use pdfscribe_core::{ExtractionMethod, Extractor, save_text};
use pdfscribe_mupdf::MupdfBackend;

mod output;

use output::{ColorMode, StatusReporter};

/// PDF Text Extractor - Extract text from PDFs, with OCR for scanned pages
#[derive(Parser, Debug)]
#[command(name = "pdfscribe", version, about, long_about = None)]
struct Cli {
    /// Path to the PDF file to process
    pdf_file: PathBuf,

    /// Optional path to save extracted text (default: prints to console)
    output_file: Option<PathBuf>,

    /// Tesseract language data directory
    #[arg(long, value_name = "DIR")]
    tessdata: Option<PathBuf>,

    /// OCR language, e.g. "eng" or "eng+deu"
    #[arg(long, value_name = "LANG")]
    lang: Option<String>,

    /// Resolution pages are rendered at for OCR
    #[arg(long, value_name = "N")]
    dpi: Option<u32>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Suppress status lines
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // Usage errors exit with 1 like every other failure.
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let color = ColorMode(!cli.no_color && std::io::stderr().is_terminal());

    match run(cli, color) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = output::print_error(&mut std::io::stderr(), &e, color);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli, color: ColorMode) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > config file > defaults
    let config = config_file::load_config();
    let overrides = OcrOverrides {
        tessdata_path: cli.tessdata,
        language: cli.lang,
        dpi: cli.dpi,
    };
    let settings = OcrSettings::resolve(&overrides, &config);
    tracing::debug!(?settings, "resolved OCR settings");

    let backend = MupdfBackend::new();
    let mut extractor = Extractor::new(&backend)
        .with_ocr(pdfscribe_ocr::engine_from_settings(&settings))
        .with_dpi(settings.dpi);

    let mut reporter = StatusReporter::new(color, cli.quiet, std::io::stderr().is_terminal());
    let result = extractor.extract(&cli.pdf_file, |event| reporter.handle(&event));
    reporter.finish();
    let result = result?;

    if result.method == ExtractionMethod::OcrUnavailable && !cli.quiet {
        eprintln!("Install Tesseract language data or pass --tessdata <DIR> to enable OCR.");
    }

    let stdout_color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());
    let mut stdout = std::io::stdout().lock();
    match cli.output_file {
        Some(path) => {
            save_text(&path, &result.text).context("Error saving text to file")?;
            output::print_saved(&mut stdout, &path, stdout_color)?;
        }
        None => output::print_extracted_text(&mut stdout, &result.text, stdout_color)?,
    }

    Ok(())
}
