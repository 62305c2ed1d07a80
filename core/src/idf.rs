use crate::error::{Error, Result};
use crate::index::{Corpus, Granularity, Word};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Inverse document frequency per word, `ln(total / containing)`, over the
/// corpus of granularity `G` it was computed from.
///
/// A word is a key iff it occurs in at least one entry of that corpus. Lookups
/// of unseen words return `None`; callers decide what that means.
pub struct IdfTable<G: Granularity> {
    values: HashMap<Word, f64>,
    total: usize,
    _granularity: PhantomData<G>,
}

impl<G: Granularity> IdfTable<G> {
    pub(crate) fn from_parts(values: HashMap<Word, f64>, total: usize) -> Self {
        Self { values, total, _granularity: PhantomData }
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.values.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.values.contains_key(word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of corpus entries the table was computed over.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(w, v)| (w.as_str(), *v))
    }

    pub(crate) fn values(&self) -> &HashMap<Word, f64> {
        &self.values
    }
}

impl<G: Granularity> Clone for IdfTable<G> {
    fn clone(&self) -> Self {
        Self::from_parts(self.values.clone(), self.total)
    }
}

impl<G: Granularity> fmt::Debug for IdfTable<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdfTable")
            .field("granularity", &G::LABEL)
            .field("total", &self.total)
            .field("terms", &self.values.len())
            .finish()
    }
}

/// Count, per word, the entries containing it (each entry counts once however
/// often the word repeats) and turn the counts into `ln(total / count)`.
pub fn compute_idf<G: Granularity>(corpus: &Corpus<G>) -> Result<IdfTable<G>> {
    if corpus.is_empty() {
        return Err(Error::EmptyCorpus);
    }
    let total = corpus.len();

    let mut containing: HashMap<&str, usize> = HashMap::new();
    for (_key, tokens) in corpus {
        for word in tokens.distinct() {
            *containing.entry(word).or_insert(0) += 1;
        }
    }

    let values: HashMap<Word, f64> = containing
        .into_iter()
        .map(|(word, count)| (word.to_string(), (total as f64 / count as f64).ln()))
        .collect();

    tracing::debug!(granularity = G::LABEL, total, terms = values.len(), "computed idf");
    Ok(IdfTable::from_parts(values, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{DocId, Documents, Sentences, TokenSequence};

    fn seq(words: &[&str]) -> TokenSequence {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn idf_is_log_of_inverse_fraction() {
        let corpus: Corpus<Documents> = [
            (DocId::from("a"), seq(&["dog", "dog", "runs"])),
            (DocId::from("b"), seq(&["cat", "runs"])),
        ]
        .into_iter()
        .collect();
        let idf = compute_idf(&corpus).unwrap();
        assert_eq!(idf.len(), 3);
        assert!((idf.get("dog").unwrap() - 2f64.ln()).abs() < 1e-12);
        assert!((idf.get("cat").unwrap() - 2f64.ln()).abs() < 1e-12);
        assert_eq!(idf.get("runs"), Some(0.0));
        assert_eq!(idf.get("bird"), None);
        assert_eq!(idf.total(), 2);
    }

    #[test]
    fn empty_corpus_fails() {
        let corpus: Corpus<Sentences> = Corpus::new();
        assert!(matches!(compute_idf(&corpus), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn empty_entries_still_count_toward_total() {
        let corpus: Corpus<Documents> = [
            (DocId::from("a"), seq(&["dog"])),
            (DocId::from("b"), seq(&[])),
        ]
        .into_iter()
        .collect();
        let idf = compute_idf(&corpus).unwrap();
        assert!((idf.get("dog").unwrap() - 2f64.ln()).abs() < 1e-12);
    }
}
