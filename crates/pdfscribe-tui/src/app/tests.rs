use super::*;
use crate::action::Action;
use crate::tui_event::BackendEvent;

use pdfscribe_core::{ExtractionResult, ProgressEvent};

/// Create a minimal App for testing (no backend channel).
fn test_app() -> App {
    App::new(Theme::hacker())
}

fn completed(text: &str, file_name: &str, pages: usize) -> BackendEvent {
    BackendEvent::ExtractionComplete(ExtractionResult {
        text: text.to_string(),
        method: ExtractionMethod::Direct,
        info: DocumentInfo {
            file_name: file_name.to_string(),
            page_count: pages,
        },
    })
}

/// App that has finished extracting `/docs/report.pdf`.
fn app_with_text(text: &str) -> App {
    let mut app = test_app();
    app.start_extraction(PathBuf::from("/docs/report.pdf"));
    app.handle_backend_event(completed(text, "report.pdf", 2));
    app
}

fn tick(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update(Action::Tick);
    }
}

// ── Startup ────────────────────────────────────────────────────

#[test]
fn starts_ready_with_placeholder() {
    let app = test_app();
    assert_eq!(app.screen, Screen::Main);
    assert_eq!(app.status, STATUS_READY);
    assert!(app.text.is_none());
    assert!(!app.busy);
}

// ── Drops ──────────────────────────────────────────────────────

#[test]
fn dropping_a_pdf_starts_extraction() {
    let mut app = test_app();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    app.backend_cmd_tx = Some(tx);

    app.update(Action::Drop("'/tmp/My Scans/a.pdf'".into()));

    assert!(app.busy);
    assert_eq!(app.status, "Extracting text from: a.pdf");
    match rx.try_recv() {
        Ok(BackendCommand::Extract { path }) => {
            assert_eq!(path, PathBuf::from("/tmp/My Scans/a.pdf"))
        }
        other => panic!("expected Extract command, got {:?}", other),
    }
}

#[test]
fn dropping_a_non_pdf_shows_error() {
    let mut app = test_app();
    app.update(Action::Drop("/tmp/photo.png".into()));

    assert!(!app.busy);
    assert_eq!(
        app.popup.as_ref().map(|p| p.message.as_str()),
        Some("Please drop a PDF file (.pdf)")
    );
}

#[test]
fn blank_paste_is_ignored() {
    let mut app = test_app();
    app.update(Action::Drop("   ".into()));
    assert!(app.popup.is_none());
    assert!(!app.busy);
}

#[test]
fn second_document_refused_while_busy() {
    let mut app = test_app();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    app.backend_cmd_tx = Some(tx);

    app.update(Action::Drop("/tmp/a.pdf".into()));
    app.update(Action::Drop("/tmp/b.pdf".into()));
    app.update(Action::OpenFile);

    assert_eq!(app.screen, Screen::Main);
    assert_eq!(app.status, "Extraction already in progress, please wait");
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
}

#[test]
fn closed_backend_channel_is_reported() {
    let mut app = test_app();
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    drop(rx);
    app.backend_cmd_tx = Some(tx);

    app.update(Action::Drop("/tmp/a.pdf".into()));

    assert!(!app.busy);
    assert!(app.popup.is_some());
}

// ── Backend events ─────────────────────────────────────────────

#[test]
fn completion_shows_text_and_page_info() {
    let app = app_with_text("Hello\nWorld\n");

    assert!(!app.busy);
    assert_eq!(app.text.as_deref(), Some("Hello\nWorld\n"));
    assert_eq!(app.doc_info.as_ref().map(|d| d.page_count), Some(2));
    assert_eq!(app.status, "Text extracted successfully from: report.pdf");
    assert_eq!(app.source_path, Some(PathBuf::from("/docs/report.pdf")));
}

#[test]
fn ocr_progress_updates_status() {
    let mut app = test_app();
    app.start_extraction(PathBuf::from("/tmp/scan.pdf"));

    app.handle_backend_event(BackendEvent::Progress(ProgressEvent::FallingBackToOcr));
    assert_eq!(app.status, "No text found, using OCR on images...");

    app.handle_backend_event(BackendEvent::Progress(ProgressEvent::OcrPage {
        page: 3,
        total: 7,
    }));
    assert_eq!(app.ocr_progress, Some((3, 7)));
    assert_eq!(app.status, "Processing page 3 of 7...");
}

#[test]
fn failure_shows_popup_and_frees_worker() {
    let mut app = test_app();
    app.start_extraction(PathBuf::from("/tmp/broken.pdf"));
    app.handle_backend_event(BackendEvent::ExtractionFailed {
        error: "Error processing PDF: failed to open PDF: no objects found".into(),
    });

    assert!(!app.busy);
    assert_eq!(app.status, "Error extracting text");
    assert_eq!(
        app.popup.as_ref().map(|p| p.message.as_str()),
        Some("Failed to extract text: Error processing PDF: failed to open PDF: no objects found")
    );

    // Popup is modal until dismissed
    app.update(Action::OpenFile);
    assert_eq!(app.screen, Screen::Main);
    app.update(Action::DismissPopup);
    assert!(app.popup.is_none());
    app.update(Action::OpenFile);
    assert_eq!(app.screen, Screen::FilePicker);
}

// ── Copy / clear ───────────────────────────────────────────────

#[test]
fn copy_queues_clipboard_and_reverts_status() {
    let mut app = app_with_text("some text");
    app.update(Action::CopyText);

    assert_eq!(app.pending_clipboard.as_deref(), Some("some text"));
    assert_eq!(app.status, "Text copied to clipboard");

    tick(&mut app, SHORT_STATUS_TICKS - 1);
    assert_eq!(app.status, "Text copied to clipboard");
    tick(&mut app, 1);
    assert_eq!(app.status, STATUS_READY);
}

#[test]
fn copy_without_text_does_nothing() {
    let mut app = test_app();
    app.update(Action::CopyText);
    assert!(app.pending_clipboard.is_none());
}

#[test]
fn clear_resets_text_and_page_info() {
    let mut app = app_with_text("some text");
    app.update(Action::ClearText);

    assert!(app.text.is_none());
    assert!(app.doc_info.is_none());
    assert_eq!(app.status, "Text cleared");
    tick(&mut app, SHORT_STATUS_TICKS);
    assert_eq!(app.status, STATUS_READY);
}

// ── Save ───────────────────────────────────────────────────────

#[test]
fn save_without_text_warns() {
    let mut app = test_app();
    app.update(Action::SaveText);

    assert!(app.save_input.is_none());
    assert_eq!(
        app.popup,
        Some(Popup {
            title: "Save Error".into(),
            message: "No text to save".into(),
        })
    );
}

#[test]
fn save_prompt_prefills_default_name() {
    let mut app = app_with_text("some text");
    app.update(Action::SaveText);

    assert_eq!(app.input_mode, InputMode::TextInput);
    let expected = PathBuf::from("/docs").join("report_extracted.txt");
    assert_eq!(app.save_input.as_deref(), Some(expected.to_str().unwrap()));
}

#[test]
fn save_prompt_writes_exact_text() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.txt");
    let mut app = app_with_text("--- Page 1 ---\nünïcode\n\n");

    app.update(Action::SaveText);
    app.save_input = Some(String::new());
    app.update(Action::InputPaste(target.display().to_string()));
    app.update(Action::InputConfirm);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(
        std::fs::read(&target).unwrap(),
        "--- Page 1 ---\nünïcode\n\n".as_bytes()
    );
    assert_eq!(app.status, "Text saved to: out.txt");
    tick(&mut app, LONG_STATUS_TICKS);
    assert_eq!(app.status, STATUS_READY);
}

#[test]
fn save_prompt_typing_and_cancel() {
    let mut app = app_with_text("x");
    app.update(Action::SaveText);
    app.save_input = Some("ab".into());

    app.update(Action::InputBackspace);
    app.update(Action::InputChar('c'));
    assert_eq!(app.save_input.as_deref(), Some("ac"));

    // Normal-mode keys are text while the prompt is open
    app.update(Action::InputChar('q'));
    assert!(!app.should_quit);

    app.update(Action::InputCancel);
    assert!(app.save_input.is_none());
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn save_failure_shows_popup() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_with_text("x");
    app.update(Action::SaveText);
    app.save_input = Some(dir.path().join("missing").join("out.txt").display().to_string());
    app.update(Action::InputConfirm);

    let popup = app.popup.expect("save failure popup");
    assert!(popup.message.starts_with("Failed to save file: "));
}

// ── Scrolling ──────────────────────────────────────────────────

#[test]
fn scrolling_is_clamped_to_text() {
    let text: String = (0..50).map(|i| format!("line {i}\n")).collect();
    let mut app = app_with_text(&text);
    app.update(Action::Resize(80, 18)); // 10 body rows

    app.update(Action::GoBottom);
    assert_eq!(app.scroll, 40);
    app.update(Action::MoveDown);
    assert_eq!(app.scroll, 40);
    app.update(Action::PageUp);
    assert_eq!(app.scroll, 30);
    app.update(Action::GoTop);
    app.update(Action::MoveUp);
    assert_eq!(app.scroll, 0);
}

#[test]
fn long_lines_count_as_wrapped_rows() {
    let mut app = app_with_text(&"x".repeat(100));
    app.update(Action::Resize(52, 20)); // 50 columns
    assert_eq!(app.text_rows(), 2);
}

// ── File picker ────────────────────────────────────────────────

#[test]
fn picker_lists_dirs_then_pdfs_only() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    std::fs::write(dir.path().join("b.pdf"), b"%PDF").unwrap();
    std::fs::write(dir.path().join("A.PDF"), b"%PDF").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
    std::fs::write(dir.path().join(".hidden.pdf"), b"x").unwrap();

    let picker = FilePickerState::in_dir(dir.path().to_path_buf());
    let names: Vec<&str> = picker.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["..", "sub", "A.PDF", "b.pdf"]);
}

#[test]
fn picker_enter_on_pdf_starts_extraction() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("scan.pdf"), b"%PDF").unwrap();

    let mut app = test_app();
    app.update(Action::OpenFile);
    app.file_picker = FilePickerState::in_dir(dir.path().to_path_buf());
    app.update(Action::MoveDown); // skip ".."
    app.update(Action::DrillIn);

    assert_eq!(app.screen, Screen::Main);
    assert!(app.busy);
    assert_eq!(app.pending_path, Some(dir.path().join("scan.pdf")));
}

#[test]
fn picker_esc_returns_to_main() {
    let mut app = test_app();
    app.update(Action::OpenFile);
    assert_eq!(app.screen, Screen::FilePicker);
    app.update(Action::NavigateBack);
    assert_eq!(app.screen, Screen::Main);
}

// ── Help / quit ────────────────────────────────────────────────

#[test]
fn help_is_modal() {
    let mut app = app_with_text("x");
    app.update(Action::ToggleHelp);
    assert!(app.show_help);

    app.update(Action::ClearText);
    assert!(app.text.is_some());

    app.update(Action::ToggleHelp);
    assert!(!app.show_help);
}

#[test]
fn quit_from_main() {
    let mut app = test_app();
    assert!(app.update(Action::Quit));
    assert!(app.should_quit);
}

// ── Rendering ──────────────────────────────────────────────────

fn render_to_string(app: &mut App, width: u16, height: u16) -> String {
    let backend = ratatui::backend::TestBackend::new(width, height);
    let mut terminal = ratatui::Terminal::new(backend).unwrap();
    terminal.draw(|f| app.view(f)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn main_screen_shows_drop_zone_and_placeholder() {
    let mut app = test_app();
    let screen = render_to_string(&mut app, 100, 24);
    assert!(screen.contains("Drag & Drop PDF Here"));
    assert!(screen.contains("Extracted text will appear here..."));
    assert!(screen.contains("Ready"));
}

#[test]
fn page_info_shown_after_extraction() {
    let mut app = app_with_text("Hello");
    let screen = render_to_string(&mut app, 100, 24);
    assert!(screen.contains("Pages: 2 | File: report.pdf"));
    assert!(screen.contains("Hello"));
}

#[test]
fn error_popup_is_drawn() {
    let mut app = test_app();
    app.update(Action::Drop("/tmp/photo.png".into()));
    let screen = render_to_string(&mut app, 100, 24);
    assert!(screen.contains("Please drop a PDF file (.pdf)"));
    assert!(screen.contains("Enter/Esc: dismiss"));
}

#[test]
fn bottom_of_word_wrapped_text_is_reachable() {
    let mut app = app_with_text("aaaaaa bbbbbb cccccc dddddd");
    app.update(Action::Resize(12, 9)); // 10 columns, 1 body row
    assert_eq!(app.text_rows(), 4);

    app.update(Action::GoBottom);
    assert_eq!(app.scroll, 3);
    let screen = render_to_string(&mut app, 12, 9);
    assert!(screen.contains("dddddd"));
}

#[test]
fn error_popup_message_can_be_copied() {
    let mut app = test_app();
    app.update(Action::Drop("/tmp/photo.png".into()));
    app.update(Action::CopyText);

    assert_eq!(
        app.pending_clipboard.as_deref(),
        Some("Please drop a PDF file (.pdf)")
    );
    assert_eq!(app.status, "Error copied to clipboard");
    assert!(app.popup.is_some());
}
