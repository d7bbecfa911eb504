use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ocr::{DEFAULT_LANGUAGE, DEFAULT_PAGE_SEGMENTATION_MODE};
use crate::pipeline::DEFAULT_DPI;

/// Environment override for the OCR language.
pub const LANG_ENV: &str = "PDFSCRIBE_OCR_LANG";
/// Environment override for the rasterization resolution.
pub const DPI_ENV: &str = "PDFSCRIBE_OCR_DPI";

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub ocr: Option<OcrConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrConfig {
    pub tessdata_path: Option<String>,
    pub language: Option<String>,
    pub dpi: Option<u32>,
    pub page_segmentation_mode: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

/// Platform config path: `<config_dir>/pdfscribe/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdfscribe").join("config.toml"))
}

/// Load config by cascading CWD `.pdfscribe.toml` over the platform config.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pdfscribe.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_ocr = base.ocr.unwrap_or_default();
    let over_ocr = overlay.ocr.unwrap_or_default();
    let base_display = base.display.unwrap_or_default();
    let over_display = overlay.display.unwrap_or_default();

    ConfigFile {
        ocr: Some(OcrConfig {
            tessdata_path: over_ocr.tessdata_path.or(base_ocr.tessdata_path),
            language: over_ocr.language.or(base_ocr.language),
            dpi: over_ocr.dpi.or(base_ocr.dpi),
            page_segmentation_mode: over_ocr
                .page_segmentation_mode
                .or(base_ocr.page_segmentation_mode),
        }),
        display: Some(DisplayConfig {
            theme: over_display.theme.or(base_display.theme),
        }),
    }
}

/// Fully resolved OCR settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrSettings {
    /// Explicit tessdata directory; `None` means probe the usual locations.
    pub tessdata_path: Option<PathBuf>,
    pub language: String,
    pub dpi: u32,
    pub page_segmentation_mode: u32,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            tessdata_path: None,
            language: DEFAULT_LANGUAGE.to_string(),
            dpi: DEFAULT_DPI,
            page_segmentation_mode: DEFAULT_PAGE_SEGMENTATION_MODE,
        }
    }
}

/// Values given on the command line. These win over everything else.
#[derive(Debug, Clone, Default)]
pub struct OcrOverrides {
    pub tessdata_path: Option<PathBuf>,
    pub language: Option<String>,
    pub dpi: Option<u32>,
}

impl OcrSettings {
    /// Resolve settings from CLI overrides, the process environment and
    /// the config file, in that order.
    ///
    /// `$TESSDATA_PREFIX` is not read here: it is its own candidate in
    /// [`crate::tessdata::candidate_paths`].
    pub fn resolve(overrides: &OcrOverrides, config: &ConfigFile) -> Self {
        Self::resolve_with(overrides, config, |key| std::env::var(key).ok())
    }

    fn resolve_with(
        overrides: &OcrOverrides,
        config: &ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let file = config.ocr.clone().unwrap_or_default();
        let defaults = Self::default();

        let env_lang = env(LANG_ENV).filter(|v| !v.trim().is_empty());
        let env_dpi = env(DPI_ENV).and_then(|v| match v.trim().parse::<u32>() {
            Ok(dpi) => Some(dpi),
            Err(_) => {
                tracing::warn!(value = %v, "ignoring invalid {}", DPI_ENV);
                None
            }
        });

        Self {
            tessdata_path: overrides
                .tessdata_path
                .clone()
                .or_else(|| file.tessdata_path.map(PathBuf::from)),
            language: overrides
                .language
                .clone()
                .or(env_lang)
                .or(file.language)
                .unwrap_or(defaults.language),
            dpi: overrides
                .dpi
                .or(env_dpi)
                .or(file.dpi)
                .unwrap_or(defaults.dpi)
                .max(1),
            page_segmentation_mode: file
                .page_segmentation_mode
                .unwrap_or(defaults.page_segmentation_mode),
        }
    }
}

/// Theme name from the config, if set.
pub fn configured_theme(config: &ConfigFile) -> Option<&str> {
    config.display.as_ref().and_then(|d| d.theme.as_deref())
}
