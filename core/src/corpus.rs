//! Loading raw documents from disk.

use crate::error::{Error, Result};
use crate::index::DocId;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Raw text of every document, keyed by identifier.
pub type RawDocuments = BTreeMap<DocId, String>;

/// Reads every `.txt` file directly inside `dir` (subdirectories are not
/// searched). The file name becomes the identifier; content is decoded as
/// UTF-8 with invalid sequences dropped.
///
/// Any unreadable entry fails the whole load.
pub fn load_directory(dir: impl AsRef<Path>) -> Result<RawDocuments> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::Load {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut documents = RawDocuments::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Load {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|s| s.to_str()) != Some("txt") {
            continue;
        }
        let bytes = fs::read(path).map_err(|source| Error::Load { path: path.to_path_buf(), source })?;
        let id = DocId::new(entry.file_name().to_string_lossy());
        documents.insert(id, bytes.utf8_chunks().map(|chunk| chunk.valid()).collect());
    }

    tracing::info!(dir = %dir.display(), num_docs = documents.len(), "loaded corpus");
    Ok(documents)
}
