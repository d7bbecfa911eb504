use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;

use pdfscribe_core::PdfBackend;
use pdfscribe_core::config_file::{self, OcrOverrides, OcrSettings};
use pdfscribe_mupdf::MupdfBackend;

mod action;
mod app;
mod backend;
mod input;
mod theme;
mod tui_event;
mod view;

use app::App;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// pdfscribe TUI - drop a PDF onto the terminal to extract its text
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// PDF to extract right away
    pdf_file: Option<PathBuf>,

    /// Tesseract language data directory
    #[arg(long, value_name = "DIR")]
    tessdata: Option<PathBuf>,

    /// OCR language, e.g. "eng" or "eng+deu"
    #[arg(long, value_name = "LANG")]
    lang: Option<String>,

    /// Resolution pages are rendered at for OCR
    #[arg(long, value_name = "N")]
    dpi: Option<u32>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,
}

/// Log to a daily file; stdout belongs to the terminal UI.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = dirs::cache_dir()?.join("pdfscribe").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::daily(dir, "pdfscribe-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let _log_guard = init_logging();

    // Resolve config from CLI flags > env vars > config file > defaults
    let config = config_file::load_config();
    let overrides = OcrOverrides {
        tessdata_path: args.tessdata,
        language: args.lang,
        dpi: args.dpi,
    };
    let settings = Arc::new(OcrSettings::resolve(&overrides, &config));
    tracing::info!(?settings, "resolved OCR settings");

    let theme_name = args
        .theme
        .as_deref()
        .or_else(|| config_file::configured_theme(&config))
        .unwrap_or("hacker");
    let theme = theme::Theme::by_name(theme_name);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(theme);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<tui_event::BackendCommand>();
    app.backend_cmd_tx = Some(cmd_tx);

    // Backend command listener: one extraction at a time
    let pdf_backend: Arc<dyn PdfBackend> = Arc::new(MupdfBackend::new());
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                tui_event::BackendCommand::Extract { path } => {
                    backend::run_extraction(
                        path,
                        Arc::clone(&pdf_backend),
                        Arc::clone(&settings),
                        pdfscribe_ocr::engine_from_settings,
                        event_tx.clone(),
                    )
                    .await;
                }
            }
        }
    });

    let size = terminal.size()?;
    app.update(action::Action::Resize(size.width, size.height));

    if let Some(path) = args.pdf_file {
        app.start_extraction(path);
    }

    // Main event loop
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| app.view(f))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(timeout).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    app.update(input::map_event(&evt, &app.input_mode));
                }
            } => {}
        }

        if last_tick.elapsed() >= tick_rate {
            app.update(action::Action::Tick);
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;

    Ok(())
}
