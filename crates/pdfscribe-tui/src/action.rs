/// User-level actions produced by the input mapper and consumed by `App::update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    MoveDown,
    MoveUp,
    PageDown,
    PageUp,
    GoTop,
    GoBottom,
    DrillIn,
    NavigateBack,

    // Document actions
    OpenFile,
    /// A path dropped onto the terminal (delivered as a bracketed paste).
    Drop(String),
    CopyText,
    SaveText,
    ClearText,

    // Text input (save prompt)
    InputChar(char),
    InputBackspace,
    InputPaste(String),
    InputConfirm,
    InputCancel,

    // Global
    ToggleHelp,
    DismissPopup,
    Quit,
    Tick,
    Resize(u16, u16),
    None,
}
