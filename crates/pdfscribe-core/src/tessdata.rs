//! Locating Tesseract language data.
//!
//! Tesseract needs a `tessdata` directory holding one `<lang>.traineddata`
//! file per language. Installations put it in different places, so we probe
//! an ordered list of candidates and take the first directory that exists.

use std::path::{Path, PathBuf};

/// Environment variable Tesseract itself honors for the data directory.
pub const TESSDATA_ENV: &str = "TESSDATA_PREFIX";

/// Well-known install locations, probed in order after any explicit path.
pub const WELL_KNOWN_PATHS: &[&str] = &[
    "/opt/homebrew/share/tessdata",           // Apple Silicon Homebrew
    "/usr/local/share/tessdata",              // Intel Homebrew
    "/usr/share/tessdata",                    // System installation
    "/usr/share/tesseract-ocr/5/tessdata",    // Debian/Ubuntu, Tesseract 5
    "/usr/share/tesseract-ocr/4.00/tessdata", // Debian/Ubuntu, Tesseract 4
    "tessdata",                               // Local copy
    "lib/tessdata",                           // Bundled copy
];

/// Build the ordered candidate list: `explicit`, then `$TESSDATA_PREFIX`,
/// then [`WELL_KNOWN_PATHS`].
pub fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let env = std::env::var_os(TESSDATA_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    build_candidates(explicit, env)
}

fn build_candidates(explicit: Option<&Path>, env: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(WELL_KNOWN_PATHS.len() + 2);
    if let Some(p) = explicit {
        paths.push(p.to_path_buf());
    }
    if let Some(p) = env {
        paths.push(p);
    }
    paths.extend(WELL_KNOWN_PATHS.iter().map(PathBuf::from));
    paths
}

/// Return the first candidate that is an existing directory.
pub fn find_tessdata(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_dir()).cloned()
}

/// Probe the default candidate list, logging the outcome.
pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    let candidates = candidate_paths(explicit);
    match find_tessdata(&candidates) {
        Some(path) => {
            tracing::info!(path = %path.display(), "using tessdata directory");
            Some(path)
        }
        None => {
            let tried: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
            tracing::warn!(
                tried = %tried.join(", "),
                "tessdata directory not found; OCR disabled, direct extraction still works"
            );
            None
        }
    }
}
