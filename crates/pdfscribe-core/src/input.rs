use std::path::Path;

use crate::ExtractError;

/// Whether the file name ends in `.pdf` (ASCII case-insensitive).
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Check that `path` exists and names a PDF, without opening it.
pub fn validate_pdf_path(path: &Path) -> Result<(), ExtractError> {
    if !path.exists() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }
    if !is_pdf_path(path) {
        return Err(ExtractError::NotPdf(path.to_path_buf()));
    }
    Ok(())
}

/// Display name for a document: the final path component, or the whole
/// path if it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Suggested output name for a document: `report.pdf` -> `report_extracted.txt`.
pub fn default_output_name(file_name: &str) -> String {
    let split = file_name
        .len()
        .checked_sub(4)
        .and_then(|i| file_name.get(i..).map(|ext| (i, ext)));
    let stem = match split {
        Some((i, ext)) if ext.eq_ignore_ascii_case(".pdf") => &file_name[..i],
        _ => file_name,
    };
    format!("{}_extracted.txt", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert!(is_pdf_path(Path::new("scan.pdf")));
        assert!(is_pdf_path(Path::new("SCAN.PDF")));
        assert!(!is_pdf_path(Path::new("scan.txt")));
        assert!(!is_pdf_path(Path::new("pdf")));
        assert!(!is_pdf_path(Path::new("archive.pdf.zip")));
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = PathBuf::from("/definitely/not/here/report.pdf");
        match validate_pdf_path(&path) {
            Err(ExtractError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn existing_non_pdf_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        match validate_pdf_path(&path) {
            Err(ExtractError::NotPdf(p)) => assert_eq!(p, path),
            other => panic!("expected NotPdf, got {:?}", other),
        }
    }

    #[test]
    fn existing_pdf_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Report.PDF");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        assert!(validate_pdf_path(&path).is_ok());
    }

    #[test]
    fn output_name_replaces_pdf_suffix() {
        assert_eq!(default_output_name("report.pdf"), "report_extracted.txt");
        assert_eq!(default_output_name("SCAN.PDF"), "SCAN_extracted.txt");
        assert_eq!(default_output_name("notes"), "notes_extracted.txt");
    }

    #[test]
    fn display_name_uses_file_name() {
        assert_eq!(display_name(Path::new("/tmp/a/b.pdf")), "b.pdf");
    }
}
