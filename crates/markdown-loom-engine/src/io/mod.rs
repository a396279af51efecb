use crate::editing::{Document, EngineError};
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("Page not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Page is not valid UTF-8: {0}")]
    Encoding(PathBuf, #[source] EngineError),
    #[error("Invalid notes directory: {0}")]
    InvalidNotesDir(String),
}

/// Loads a page into a new document, bytes untouched.
pub fn read_page(page: &RelativePath, notes_root: &Path) -> Result<Document, IoError> {
    read_document(&page.to_path(notes_root))
}

/// Loads any markdown file into a new document.
pub fn read_document(path: &Path) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    let doc = Document::from_bytes(&bytes).map_err(|e| IoError::Encoding(path.to_path_buf(), e))?;
    log::debug!("loaded {} ({} bytes)", path.display(), bytes.len());
    Ok(doc)
}

/// Writes a document back to its page
pub fn write_page(page: &RelativePath, notes_root: &Path, doc: &Document) -> Result<(), IoError> {
    write_document(&page.to_path(notes_root), doc)
}

pub fn write_document(path: &Path, doc: &Document) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, doc.to_bytes())?;
    log::debug!("saved {} at v{}", path.display(), doc.version());
    Ok(())
}

/// Every markdown page under the notes directory, as page identifiers
pub fn list_pages(notes_root: &Path) -> Result<Vec<RelativePathBuf>, IoError> {
    validate_notes_dir(notes_root)?;

    let mut files = Vec::new();
    scan_directory_recursive(notes_root, &mut files)?;
    let mut pages: Vec<RelativePathBuf> = files
        .iter()
        .filter_map(|f| f.strip_prefix(notes_root).ok())
        .filter_map(|rel| RelativePathBuf::from_path(rel).ok())
        .collect();
    pages.sort();
    Ok(pages)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_notes_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidNotesDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Transaction;
    use tempfile::TempDir;

    fn notes_dir(files: &[(&str, &[u8])]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn page_round_trips_byte_for_byte() {
        let text = "# Title\r\n\n- [ ] task  \n\t```\n";
        let dir = notes_dir(&[("a.md", text.as_bytes())]);
        let page = RelativePath::new("a.md");

        let doc = read_page(page, dir.path()).unwrap();
        assert_eq!(doc.text(), text);
        write_page(RelativePath::new("copy/a.md"), dir.path(), &doc).unwrap();
        assert_eq!(fs::read(dir.path().join("copy/a.md")).unwrap(), text.as_bytes());
    }

    #[test]
    fn saved_edits_land_on_disk() {
        let dir = notes_dir(&[("p.md", b"- a")]);
        let page = RelativePath::new("p.md");
        let mut doc = read_page(page, dir.path()).unwrap();
        doc.apply(Transaction::insert(3, "\n- b")).unwrap();
        write_page(page, dir.path(), &doc).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("p.md")).unwrap(), "- a\n- b");
    }

    #[test]
    fn missing_page() {
        let dir = notes_dir(&[]);
        let result = read_page(RelativePath::new("nope.md"), dir.path());
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let dir = notes_dir(&[("bad.md", &[0x66, 0xff, 0x66])]);
        let result = read_page(RelativePath::new("bad.md"), dir.path());
        assert!(matches!(result, Err(IoError::Encoding(..))));
    }

    #[test]
    fn lists_nested_markdown_pages_only() {
        let dir = notes_dir(&[
            ("root.md", b"# Root"),
            ("sub/nested.md", b"# Nested"),
            ("image.png", b"fake"),
        ]);
        let pages = list_pages(dir.path()).unwrap();
        assert_eq!(
            pages,
            vec![
                RelativePathBuf::from("root.md"),
                RelativePathBuf::from("sub/nested.md")
            ]
        );
    }

    #[test]
    fn invalid_notes_directory() {
        let result = list_pages(Path::new("/nonexistent/path"));
        assert!(matches!(result, Err(IoError::InvalidNotesDir(_))));
    }
}
