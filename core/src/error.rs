use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by corpus loading, IDF computation and ranking.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// IDF over an empty corpus would divide by zero.
    #[error("cannot compute IDF over an empty corpus")]
    EmptyCorpus,

    /// A matched word has no IDF entry. The sentence IDF table is built from the
    /// very corpus being ranked, so this points at an internal bug.
    #[error("word {word:?} has no IDF value in the table it was ranked against")]
    MissingIdf { word: String },

    #[error("failed to load corpus from {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid index snapshot: {0}")]
    Snapshot(String),
}
