mod update;
mod update_file_picker;
mod util;
use util::*;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use ratatui::Frame;
use ratatui::widgets::{Paragraph, Wrap};
use tokio::sync::mpsc;

use pdfscribe_core::{DocumentInfo, ExtractionMethod, is_pdf_path};

use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Status line text when nothing is going on.
pub const STATUS_READY: &str = "Ready";

/// Ticks (100 ms each) before a transient status reverts to [`STATUS_READY`].
pub const SHORT_STATUS_TICKS: usize = 20;
pub const LONG_STATUS_TICKS: usize = 30;

/// Rows taken by everything on the main screen except the text body.
const MAIN_CHROME_ROWS: usize = 8;

/// Which screen is currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Main,
    FilePicker,
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the save prompt.
    TextInput,
}

/// A modal message box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub message: String,
}

impl Popup {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}

/// State for the file picker screen.
#[derive(Debug, Clone)]
pub struct FilePickerState {
    /// Current directory being browsed.
    pub current_dir: PathBuf,
    /// Entries in the current directory (dirs first, then PDFs).
    pub entries: Vec<FileEntry>,
    /// Cursor position in the entries list.
    pub cursor: usize,
}

/// A single entry in the file picker.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

impl FilePickerState {
    pub fn new() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::in_dir(current_dir)
    }

    pub fn in_dir(current_dir: PathBuf) -> Self {
        let mut state = Self {
            current_dir,
            entries: Vec::new(),
            cursor: 0,
        };
        state.refresh_entries();
        state
    }

    /// Refresh the entries list from the current directory.
    ///
    /// Only directories and PDFs are listed; hidden entries are skipped.
    pub fn refresh_entries(&mut self) {
        let mut entries = Vec::new();

        // Parent directory entry
        if let Some(parent) = self.current_dir.parent() {
            entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
            });
        }

        if let Ok(read_dir) = std::fs::read_dir(&self.current_dir) {
            let mut dirs = Vec::new();
            let mut files = Vec::new();

            for entry in read_dir.flatten() {
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().to_string();

                if name.starts_with('.') {
                    continue;
                }

                if path.is_dir() {
                    dirs.push(FileEntry {
                        name,
                        path,
                        is_dir: true,
                    });
                } else if is_pdf_path(&path) {
                    files.push(FileEntry {
                        name,
                        path,
                        is_dir: false,
                    });
                }
            }

            dirs.sort_by_key(|e| e.name.to_lowercase());
            files.sort_by_key(|e| e.name.to_lowercase());

            entries.extend(dirs);
            entries.extend(files);
        }

        self.entries = entries;
        self.cursor = 0;
    }

    /// Enter the directory at cursor, or return false if not a directory.
    pub fn enter_directory(&mut self) -> bool {
        if let Some(entry) = self.entries.get(self.cursor)
            && entry.is_dir
        {
            self.current_dir = entry.path.clone();
            self.refresh_entries();
            return true;
        }
        false
    }

    pub fn current_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.cursor)
    }
}

impl Default for FilePickerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub tick: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub popup: Option<Popup>,

    /// Extracted text, `None` while the placeholder is shown.
    pub text: Option<String>,
    pub method: Option<ExtractionMethod>,
    /// Page count and file name of the last successful extraction.
    pub doc_info: Option<DocumentInfo>,
    /// Path of the document the current text came from.
    pub source_path: Option<PathBuf>,

    /// Whether an extraction is in flight.
    pub busy: bool,
    /// Path being extracted while `busy`.
    pub pending_path: Option<PathBuf>,
    /// OCR page progress `(page, total)` while busy.
    pub ocr_progress: Option<(usize, usize)>,

    pub status: String,
    /// Tick at which a transient status reverts to [`STATUS_READY`].
    pub status_expires_at: Option<usize>,

    /// Save prompt buffer, `Some` while the prompt is open.
    pub save_input: Option<String>,

    pub scroll: usize,
    /// Height of the text body in rows (set on resize).
    pub visible_rows: usize,
    /// Width of the text body in columns, for wrapped line counting.
    pub text_width: usize,

    pub file_picker: FilePickerState,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
    /// Text waiting to be pushed to the clipboard on the next frame.
    pub pending_clipboard: Option<String>,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            screen: Screen::Main,
            input_mode: InputMode::Normal,
            theme,
            tick: 0,
            should_quit: false,
            show_help: false,
            popup: None,
            text: None,
            method: None,
            doc_info: None,
            source_path: None,
            busy: false,
            pending_path: None,
            ocr_progress: None,
            status: STATUS_READY.to_string(),
            status_expires_at: None,
            save_input: None,
            scroll: 0,
            visible_rows: 20,
            text_width: 80,
            file_picker: FilePickerState::new(),
            backend_cmd_tx: None,
            pending_clipboard: None,
        }
    }

    /// Whether there is extracted text worth copying or saving.
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Set a status that stays until the next change.
    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.status_expires_at = None;
    }

    /// Set a status that reverts to "Ready" after `ticks`.
    pub(crate) fn set_transient_status(&mut self, status: impl Into<String>, ticks: usize) {
        self.status = status.into();
        self.status_expires_at = Some(self.tick.wrapping_add(ticks));
    }

    /// Number of display rows the text takes at the current width, wrapped
    /// at word boundaries the same way the text panel renders it.
    pub fn text_rows(&self) -> usize {
        let Some(text) = self.text.as_deref() else {
            return 0;
        };
        let width = u16::try_from(self.text_width.max(1)).unwrap_or(u16::MAX);
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .line_count(width)
    }

    pub fn max_scroll(&self) -> usize {
        self.text_rows().saturating_sub(self.visible_rows)
    }

    /// Suggested path for the save prompt.
    pub fn default_save_path(&self) -> PathBuf {
        default_save_path(
            self.source_path.as_deref(),
            self.doc_info.as_ref().map(|d| d.file_name.as_str()),
        )
    }

    pub(crate) fn resize(&mut self, width: u16, height: u16) {
        self.visible_rows = (height as usize).saturating_sub(MAIN_CHROME_ROWS).max(1);
        self.text_width = (width as usize).saturating_sub(2).max(1);
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn view(&mut self, f: &mut Frame) {
        if let Some(text) = self.pending_clipboard.take() {
            osc52_copy(&text);
        }

        let area = f.area();
        match self.screen {
            Screen::Main => crate::view::extract::render_in(f, self, area),
            Screen::FilePicker => crate::view::file_picker::render_in(f, self, area),
        }

        if let Some(input) = &self.save_input {
            crate::view::save_prompt::render(f, &self.theme, input);
        }
        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
        if let Some(popup) = &self.popup {
            crate::view::popup::render(f, &self.theme, popup);
        }
    }
}
