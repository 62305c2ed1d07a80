use crate::corpus::{load_directory, RawDocuments};
use crate::error::Result;
use crate::idf::{compute_idf, IdfTable};
use crate::index::{Corpus, DocId, Documents, Query, Sentences};
use crate::rank::{rank_files, rank_sentences, ScoredDocument, ScoredSentence};
use crate::tokenizer::{tokenize, EnglishAnalyzer, Language, TextAnalyzer};
use serde::Serialize;
use std::path::Path;

/// Documents kept from the first ranking stage by default.
pub const FILE_MATCHES: usize = 1;
/// Sentences returned by default.
pub const SENTENCE_MATCHES: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOptions {
    pub files: usize,
    pub sentences: usize,
}

impl Default for AnswerOptions {
    fn default() -> Self {
        Self { files: FILE_MATCHES, sentences: SENTENCE_MATCHES }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// Normalized query terms.
    pub terms: Vec<String>,
    pub files: Vec<ScoredDocument>,
    pub sentences: Vec<ScoredSentence>,
}

impl Answer {
    pub fn sentence_texts(&self) -> impl Iterator<Item = &str> {
        self.sentences.iter().map(|s| s.text.as_str())
    }
}

/// A frozen document corpus with its document-level IDF table.
///
/// The document side is computed once and only read afterwards, so one engine
/// can serve any number of queries. Sentence IDF depends on which documents a
/// query selects and is recomputed on every call to [`Engine::answer`].
pub struct Engine<A = EnglishAnalyzer> {
    analyzer: A,
    language: Language,
    documents: RawDocuments,
    corpus: Corpus<Documents>,
    idf: IdfTable<Documents>,
}

impl Engine<EnglishAnalyzer> {
    /// Loads every `.txt` file in `dir` and indexes it with the English analyzer.
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self> {
        Self::new(EnglishAnalyzer, Language::English, load_directory(dir)?)
    }
}

impl<A: TextAnalyzer> Engine<A> {
    pub fn new(analyzer: A, language: Language, documents: RawDocuments) -> Result<Self> {
        let corpus: Corpus<Documents> = documents
            .iter()
            .map(|(id, text)| (id.clone(), tokenize(&analyzer, language, text)))
            .collect();
        let idf = compute_idf(&corpus)?;
        tracing::info!(num_docs = corpus.len(), num_terms = idf.len(), "indexed documents");
        Ok(Self { analyzer, language, documents, corpus, idf })
    }

    /// Assembles an engine from previously computed parts; see [`crate::persist`].
    pub(crate) fn from_parts(
        analyzer: A,
        language: Language,
        documents: RawDocuments,
        corpus: Corpus<Documents>,
        idf: IdfTable<Documents>,
    ) -> Self {
        Self { analyzer, language, documents, corpus, idf }
    }

    /// Normalizes free text into a query with the same analyzer the documents
    /// went through.
    pub fn query(&self, text: &str) -> Query {
        tokenize(&self.analyzer, self.language, text).into()
    }

    pub fn answer(&self, text: &str, options: AnswerOptions) -> Result<Answer> {
        self.answer_query(&self.query(text), options)
    }

    pub fn answer_query(&self, query: &Query, options: AnswerOptions) -> Result<Answer> {
        let files = rank_files(query, &self.corpus, &self.idf, options.files);
        let sentences = self.sentence_corpus(files.iter().map(|f| &f.id));
        tracing::debug!(
            terms = query.len(),
            files = files.len(),
            sentences = sentences.len(),
            "ranked documents"
        );

        let ranked = if sentences.is_empty() {
            Vec::new()
        } else {
            let idf = compute_idf(&sentences)?;
            rank_sentences(query, &sentences, &idf, options.sentences)?
        };

        Ok(Answer {
            terms: query.iter().map(str::to_string).collect(),
            files,
            sentences: ranked,
        })
    }

    /// Breaks the given documents into lines, then sentences, and tokenizes
    /// each one. Sentences left with no tokens are skipped. The corpus is keyed
    /// by sentence text, so a sentence repeated verbatim keeps only the tokens
    /// from its last occurrence.
    pub fn sentence_corpus<'a>(&self, ids: impl IntoIterator<Item = &'a DocId>) -> Corpus<Sentences> {
        let mut sentences: Corpus<Sentences> = Corpus::new();
        for id in ids {
            let Some(text) = self.documents.get(id) else {
                continue;
            };
            for passage in text.split('\n') {
                for sentence in self.analyzer.split_sentences(passage) {
                    let tokens = tokenize(&self.analyzer, self.language, &sentence);
                    if tokens.is_empty() {
                        continue;
                    }
                    if sentences.insert(sentence, tokens).is_some() {
                        tracing::debug!(document = %id, "repeated sentence replaced");
                    }
                }
            }
        }
        sentences
    }

    pub fn document(&self, id: &str) -> Option<&str> {
        self.documents.get(id).map(String::as_str)
    }

    pub fn num_documents(&self) -> usize {
        self.documents.len()
    }

    pub fn documents(&self) -> &RawDocuments {
        &self.documents
    }

    pub fn corpus(&self) -> &Corpus<Documents> {
        &self.corpus
    }

    pub fn idf(&self) -> &IdfTable<Documents> {
        &self.idf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(docs: &[(&str, &str)]) -> Engine {
        let documents = docs.iter().map(|(id, text)| (DocId::from(*id), text.to_string())).collect();
        Engine::new(EnglishAnalyzer, Language::English, documents).unwrap()
    }

    #[test]
    fn answers_from_the_best_document() {
        let e = engine(&[
            ("a.txt", "A fast dog runs.\nThe dog barks at night. Cats are quiet."),
            ("b.txt", "A cat sleeps."),
        ]);
        let answer = e.answer("Which dog barks?", AnswerOptions::default()).unwrap();
        assert_eq!(answer.files.len(), 1);
        assert_eq!(answer.files[0].id.as_str(), "a.txt");
        assert_eq!(answer.sentence_texts().collect::<Vec<_>>(), vec!["The dog barks at night."]);
    }

    #[test]
    fn possessive_form_matches_plain_query_word() {
        let e = engine(&[("a.txt", "The dog's bone is buried."), ("b.txt", "A cat sleeps.")]);
        let answer = e.answer("dog", AnswerOptions::default()).unwrap();
        assert_eq!(answer.files[0].id.as_str(), "a.txt");
        assert!(answer.files[0].score > 0.0);
        assert_eq!(answer.sentence_texts().collect::<Vec<_>>(), vec!["The dog's bone is buried."]);
    }

    #[test]
    fn empty_query_yields_no_sentences() {
        let e = engine(&[("a.txt", "A fast dog runs."), ("b.txt", "A cat sleeps.")]);
        let answer = e.answer("the of and", AnswerOptions { files: 2, sentences: 5 }).unwrap();
        assert!(answer.terms.is_empty());
        assert_eq!(answer.files.len(), 2);
        assert!(answer.sentences.is_empty());
    }

    #[test]
    fn winning_document_without_sentences_is_not_an_error() {
        let e = engine(&[("a.txt", "..."), ("b.txt", "A cat sleeps.")]);
        let answer = e.answer("dog", AnswerOptions::default()).unwrap();
        assert_eq!(answer.files[0].id.as_str(), "a.txt");
        assert!(answer.sentences.is_empty());
    }

    #[test]
    fn sentences_from_several_documents_share_one_corpus() {
        let e = engine(&[
            ("a.txt", "Dogs bark. Shared line here."),
            ("b.txt", "Shared line here. Dogs howl loudly."),
        ]);
        let ids = [DocId::from("a.txt"), DocId::from("b.txt")];
        let corpus = e.sentence_corpus(ids.iter());
        assert_eq!(corpus.len(), 3);
        assert!(corpus.get("Shared line here.").is_some());
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let err = Engine::new(EnglishAnalyzer, Language::English, RawDocuments::new()).err();
        assert!(matches!(err, Some(crate::Error::EmptyCorpus)));
    }
}
