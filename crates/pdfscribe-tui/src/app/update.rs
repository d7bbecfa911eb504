use std::path::{Path, PathBuf};

use pdfscribe_core::{ProgressEvent, display_name, is_pdf_path, save_text};

use super::{
    App, InputMode, LONG_STATUS_TICKS, Popup, SHORT_STATUS_TICKS, STATUS_READY, Screen,
    parse_dropped_path,
};
use crate::action::Action;
use crate::tui_event::{BackendCommand, BackendEvent};

impl App {
    /// Process a user action. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // Ticks and resizes apply whatever is on top.
        match action {
            Action::Tick => {
                self.on_tick();
                return false;
            }
            Action::Resize(w, h) => {
                self.resize(w, h);
                return false;
            }
            _ => {}
        }

        // Error/warning popup is modal
        if self.popup.is_some() {
            match action {
                Action::Quit => self.should_quit = true,
                Action::CopyText => {
                    self.pending_clipboard = self.popup.as_ref().map(|p| p.message.clone());
                    self.set_transient_status("Error copied to clipboard", SHORT_STATUS_TICKS);
                }
                Action::DismissPopup
                | Action::NavigateBack
                | Action::DrillIn
                | Action::InputCancel
                | Action::InputConfirm => self.popup = None,
                _ => {}
            }
            return self.should_quit;
        }

        if self.show_help {
            match action {
                Action::Quit => self.should_quit = true,
                Action::ToggleHelp | Action::NavigateBack | Action::DrillIn => {
                    self.show_help = false
                }
                _ => {}
            }
            return self.should_quit;
        }

        if self.save_input.is_some() {
            self.handle_save_prompt_action(action);
            return self.should_quit;
        }

        if self.screen == Screen::FilePicker {
            self.handle_file_picker_action(action);
            return self.should_quit;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::MoveDown => self.scroll = (self.scroll + 1).min(self.max_scroll()),
            Action::MoveUp => self.scroll = self.scroll.saturating_sub(1),
            Action::PageDown => {
                let page = self.visible_rows.max(1);
                self.scroll = (self.scroll + page).min(self.max_scroll());
            }
            Action::PageUp => {
                let page = self.visible_rows.max(1);
                self.scroll = self.scroll.saturating_sub(page);
            }
            Action::GoTop => self.scroll = 0,
            Action::GoBottom => self.scroll = self.max_scroll(),
            Action::OpenFile => {
                if self.refuse_if_busy() {
                    return false;
                }
                self.file_picker.refresh_entries();
                self.screen = Screen::FilePicker;
            }
            Action::Drop(pasted) => self.handle_drop(&pasted),
            Action::CopyText => self.copy_text(),
            Action::SaveText => self.open_save_prompt(),
            Action::ClearText => self.clear_text(),
            Action::ToggleHelp => self.show_help = true,
            _ => {}
        }
        self.should_quit
    }

    fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if let Some(expires) = self.status_expires_at
            && self.tick >= expires
        {
            self.status = STATUS_READY.to_string();
            self.status_expires_at = None;
        }
    }

    /// Refuse a new document while one is being extracted.
    fn refuse_if_busy(&mut self) -> bool {
        if self.busy {
            self.set_transient_status(
                "Extraction already in progress, please wait",
                SHORT_STATUS_TICKS,
            );
        }
        self.busy
    }

    fn handle_drop(&mut self, pasted: &str) {
        let Some(path) = parse_dropped_path(pasted) else {
            return;
        };
        if self.refuse_if_busy() {
            return;
        }
        if !is_pdf_path(&path) {
            self.popup = Some(Popup::error("Please drop a PDF file (.pdf)"));
            return;
        }
        self.start_extraction(path);
    }

    /// Hand a document to the backend worker.
    pub(crate) fn start_extraction(&mut self, path: PathBuf) {
        if self.refuse_if_busy() {
            return;
        }

        if let Some(tx) = &self.backend_cmd_tx
            && tx
                .send(BackendCommand::Extract { path: path.clone() })
                .is_err()
        {
            tracing::error!("backend command channel closed");
            self.popup = Some(Popup::error("Extraction worker is not running"));
            return;
        }

        tracing::info!(path = %path.display(), "starting extraction");
        self.busy = true;
        self.ocr_progress = None;
        self.set_status(format!("Extracting text from: {}", display_name(&path)));
        self.pending_path = Some(path);
    }

    /// Apply an event from the extraction worker.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::ExtractionStarted { file_name } => {
                self.set_status(format!("Extracting text from: {}", file_name));
            }
            BackendEvent::Progress(progress) => {
                match &progress {
                    ProgressEvent::Opened { page_count } => {
                        self.set_status(format!("Processing {} pages...", page_count));
                    }
                    ProgressEvent::FallingBackToOcr => {
                        self.set_status("No text found, using OCR on images...");
                    }
                    ProgressEvent::OcrPage { page, total } => {
                        self.ocr_progress = Some((*page, *total));
                        self.set_status(progress.to_string());
                    }
                    ProgressEvent::Opening { .. } | ProgressEvent::DirectTextFound => {}
                }
            }
            BackendEvent::ExtractionComplete(result) => {
                self.busy = false;
                self.ocr_progress = None;
                self.source_path = self.pending_path.take();
                self.set_status(format!(
                    "Text extracted successfully from: {}",
                    result.info.file_name
                ));
                self.text = Some(result.text);
                self.method = Some(result.method);
                self.doc_info = Some(result.info);
                self.scroll = 0;
            }
            BackendEvent::ExtractionFailed { error } => {
                self.busy = false;
                self.ocr_progress = None;
                self.pending_path = None;
                self.doc_info = None;
                self.set_status("Error extracting text");
                self.popup = Some(Popup::error(format!("Failed to extract text: {}", error)));
            }
        }
    }

    fn copy_text(&mut self) {
        if !self.has_text() {
            self.set_transient_status("No text to copy", SHORT_STATUS_TICKS);
            return;
        }
        self.pending_clipboard = self.text.clone();
        self.set_transient_status("Text copied to clipboard", SHORT_STATUS_TICKS);
    }

    fn open_save_prompt(&mut self) {
        if !self.has_text() {
            self.popup = Some(Popup {
                title: "Save Error".to_string(),
                message: "No text to save".to_string(),
            });
            return;
        }
        self.save_input = Some(self.default_save_path().display().to_string());
        self.input_mode = InputMode::TextInput;
    }

    fn handle_save_prompt_action(&mut self, action: Action) {
        let Some(input) = self.save_input.as_mut() else {
            return;
        };
        match action {
            Action::Quit => self.should_quit = true,
            Action::InputChar(c) => input.push(c),
            Action::InputPaste(text) => {
                if let Some(line) = text.lines().next() {
                    input.push_str(line);
                }
            }
            Action::InputBackspace => {
                input.pop();
            }
            Action::InputCancel => self.close_save_prompt(),
            Action::InputConfirm => {
                let target = input.trim().to_string();
                self.close_save_prompt();
                if !target.is_empty() {
                    self.save_to(Path::new(&target));
                }
            }
            _ => {}
        }
    }

    fn close_save_prompt(&mut self) {
        self.save_input = None;
        self.input_mode = InputMode::Normal;
    }

    fn save_to(&mut self, path: &Path) {
        let text = self.text.as_deref().unwrap_or_default();
        match save_text(path, text) {
            Ok(()) => self.set_transient_status(
                format!("Text saved to: {}", display_name(path)),
                LONG_STATUS_TICKS,
            ),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "save failed");
                self.popup = Some(Popup::error(format!("Failed to save file: {}", e)));
            }
        }
    }

    fn clear_text(&mut self) {
        self.text = None;
        self.method = None;
        self.doc_info = None;
        self.source_path = None;
        self.scroll = 0;
        self.set_transient_status("Text cleared", SHORT_STATUS_TICKS);
    }
}
