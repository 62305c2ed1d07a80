//! Two-stage TF-IDF retrieval: rank documents for a query, then pull the
//! best-matching sentence out of the winners.

pub mod corpus;
pub mod engine;
pub mod error;
pub mod idf;
pub mod index;
pub mod persist;
pub mod rank;
pub mod tokenizer;

pub use engine::{Answer, AnswerOptions, Engine, FILE_MATCHES, SENTENCE_MATCHES};
pub use error::{Error, Result};
pub use idf::{compute_idf, IdfTable};
pub use index::{Corpus, DocId, Documents, Granularity, Query, Sentences, TokenSequence, Word};
pub use rank::{rank_files, rank_sentences, top_files, top_sentences, ScoredDocument, ScoredSentence, SentenceScore};
pub use tokenizer::{tokenize, EnglishAnalyzer, Language, TextAnalyzer};
