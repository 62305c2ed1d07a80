//! On-disk snapshot of a frozen engine: raw documents, their token sequences
//! and the document IDF table, so a server can start without re-tokenizing.

use crate::corpus::RawDocuments;
use crate::engine::Engine;
use crate::error::Error;
use crate::idf::IdfTable;
use crate::index::{Corpus, DocId, Documents, TokenSequence, Word};
use crate::tokenizer::{EnglishAnalyzer, Language};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: usize,
    pub num_terms: usize,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn documents(&self) -> PathBuf { self.root.join("documents.bin") }
    fn tokens(&self) -> PathBuf { self.root.join("tokens.bin") }
    fn idf(&self) -> PathBuf { self.root.join("idf.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }

    /// Whether `root` holds a snapshot rather than plain text files.
    pub fn exists(&self) -> bool {
        self.meta().is_file()
    }
}

fn write_bin<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn read_bin<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let value = bincode::deserialize(&buf).with_context(|| format!("decoding {}", path.display()))?;
    Ok(value)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta()).with_context(|| format!("opening {}", paths.meta().display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Writes the engine's document side to `paths`, creating the directory.
pub fn save_engine(paths: &IndexPaths, engine: &Engine) -> Result<MetaFile> {
    create_dir_all(&paths.root)?;
    write_bin(&paths.documents(), engine.documents())?;
    let tokens: BTreeMap<&DocId, &TokenSequence> = engine.corpus().iter().collect();
    write_bin(&paths.tokens(), &tokens)?;
    write_bin(&paths.idf(), engine.idf().values())?;

    let meta = MetaFile {
        num_docs: engine.num_documents(),
        num_terms: engine.idf().len(),
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        version: SNAPSHOT_VERSION,
    };
    save_meta(paths, &meta)?;
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, "saved snapshot");
    Ok(meta)
}

/// Reads a snapshot back and checks that its parts agree with each other.
pub fn load_engine(paths: &IndexPaths) -> Result<Engine> {
    let meta = load_meta(paths)?;
    if meta.version != SNAPSHOT_VERSION {
        return Err(Error::Snapshot(format!("unsupported version {}", meta.version)).into());
    }
    let documents: RawDocuments = read_bin(&paths.documents())?;
    let tokens: BTreeMap<DocId, TokenSequence> = read_bin(&paths.tokens())?;
    let idf: HashMap<Word, f64> = read_bin(&paths.idf())?;

    if documents.len() != meta.num_docs || idf.len() != meta.num_terms {
        return Err(Error::Snapshot(format!(
            "meta.json expects {} documents and {} terms, found {} and {}",
            meta.num_docs,
            meta.num_terms,
            documents.len(),
            idf.len()
        ))
        .into());
    }
    if !tokens.keys().eq(documents.keys()) {
        return Err(Error::Snapshot("token sequences do not match documents".into()).into());
    }

    let total = tokens.len();
    let corpus: Corpus<Documents> = tokens.into_iter().collect();
    tracing::info!(root = %paths.root.display(), num_docs = total, "loaded snapshot");
    Ok(Engine::from_parts(
        EnglishAnalyzer,
        Language::English,
        documents,
        corpus,
        IdfTable::from_parts(idf, total),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AnswerOptions;
    use tempfile::tempdir;

    fn sample() -> Engine {
        let documents: RawDocuments = [
            (DocId::from("a.txt"), "A fast dog runs. The dog barks.".to_string()),
            (DocId::from("b.txt"), "A cat sleeps.".to_string()),
        ]
        .into_iter()
        .collect();
        Engine::new(EnglishAnalyzer, Language::English, documents).unwrap()
    }

    #[test]
    fn snapshot_answers_like_the_original() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path());
        let engine = sample();
        let meta = save_engine(&paths, &engine).unwrap();
        assert_eq!(meta.num_docs, 2);
        assert!(paths.exists());

        let loaded = load_engine(&paths).unwrap();
        let options = AnswerOptions::default();
        let before = engine.answer("barking dog", options).unwrap();
        let after = loaded.answer("barking dog", options).unwrap();
        assert_eq!(before.files, after.files);
        assert_eq!(before.sentences, after.sentences);
        assert_eq!(loaded.idf().get("dog"), engine.idf().get("dog"));
    }

    #[test]
    fn mismatched_meta_is_rejected() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::new(dir.path());
        let mut meta = save_engine(&paths, &sample()).unwrap();
        meta.num_docs = 7;
        save_meta(&paths, &meta).unwrap();
        let err = load_engine(&paths).err().unwrap();
        assert!(err.to_string().contains("7 documents"));
    }

    #[test]
    fn plain_directory_is_not_a_snapshot() {
        let dir = tempdir().unwrap();
        assert!(!IndexPaths::new(dir.path()).exists());
        assert!(load_engine(&IndexPaths::new(dir.path())).is_err());
    }
}
