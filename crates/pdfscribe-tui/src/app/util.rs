use std::io::Write;
use std::path::{Path, PathBuf};

use pdfscribe_core::default_output_name;

/// Copy text to the system clipboard via OSC 52 escape sequence.
/// Works in Ghostty, iTerm2, kitty, WezTerm, and most modern terminals.
pub(super) fn osc52_copy(text: &str) {
    use base64::Engine;
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    // Write directly to stdout, bypassing the terminal backend buffer
    let _ = std::io::stdout().write_all(format!("\x1b]52;c;{}\x07", encoded).as_bytes());
    let _ = std::io::stdout().flush();
}

/// Turn the text of a drop (bracketed paste) into a path.
///
/// Terminals paste dropped files in different shapes: quoted, with
/// backslash-escaped spaces, or as `file://` URIs. Only the first non-empty
/// line is used when several files are dropped at once.
pub(super) fn parse_dropped_path(pasted: &str) -> Option<PathBuf> {
    let line = pasted.lines().map(str::trim).find(|l| !l.is_empty())?;

    let unquoted = strip_quotes(line);

    if let Some(uri) = unquoted.strip_prefix("file://") {
        // file://host/path is not supported; only local paths.
        let path = uri.strip_prefix("localhost").unwrap_or(uri);
        let decoded = urlencoding::decode(path).ok()?;
        return Some(PathBuf::from(decoded.into_owned()));
    }

    Some(PathBuf::from(unescape_backslashes(unquoted)))
}

fn strip_quotes(s: &str) -> &str {
    for q in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(q).and_then(|r| r.strip_suffix(q)) {
            return inner;
        }
    }
    s
}

/// `\ ` → ` `, `\(` → `(`, etc. A trailing lone backslash is kept.
fn unescape_backslashes(s: &str) -> String {
    if cfg!(windows) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Suggested save path: `<source dir>/<stem>_extracted.txt`.
pub(super) fn default_save_path(source: Option<&Path>, file_name: Option<&str>) -> PathBuf {
    let name = match file_name {
        Some(file_name) => default_output_name(file_name),
        None => "extracted_text.txt".to_string(),
    };
    match source.and_then(|p| p.parent()) {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(name),
        _ => PathBuf::from(name),
    }
}
