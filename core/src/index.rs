use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::fmt;

/// A normalized word token.
pub type Word = String;

/// Identifier of a document within a corpus, e.g. its file name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for DocId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DocId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Ordered normalized tokens of one document or sentence. Duplicates are kept:
/// term frequency and sentence length both count them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSequence(Vec<Word>);

impl TokenSequence {
    pub fn new(tokens: Vec<Word>) -> Self {
        Self(tokens)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of occurrences of `word`.
    pub fn count(&self, word: &str) -> usize {
        self.0.iter().filter(|t| t.as_str() == word).count()
    }

    /// Distinct words, duplicates collapsed.
    pub fn distinct(&self) -> BTreeSet<&str> {
        self.iter().collect()
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Word> {
        self.0
    }
}

impl From<Vec<Word>> for TokenSequence {
    fn from(tokens: Vec<Word>) -> Self {
        Self(tokens)
    }
}

impl FromIterator<Word> for TokenSequence {
    fn from_iter<I: IntoIterator<Item = Word>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Query terms as a set; repeated words in the raw query collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(BTreeSet<Word>);

impl Query {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    /// Query words that occur at least once in `tokens`, in query order.
    pub fn matched_in<'q>(&'q self, tokens: &TokenSequence) -> Vec<&'q str> {
        let present = tokens.distinct();
        self.iter().filter(|w| present.contains(w)).collect()
    }
}

impl From<TokenSequence> for Query {
    fn from(tokens: TokenSequence) -> Self {
        tokens.into_inner().into_iter().collect()
    }
}

impl FromIterator<Word> for Query {
    fn from_iter<I: IntoIterator<Item = Word>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for Query {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

/// Tags a corpus and the IDF tables derived from it with the unit being
/// counted, so document-level and sentence-level tables never mix.
pub trait Granularity: 'static {
    type Key: Ord + Clone + fmt::Debug;
    const LABEL: &'static str;
}

/// Whole documents keyed by [`DocId`].
#[derive(Debug)]
pub enum Documents {}

/// Sentences keyed by their verbatim text.
#[derive(Debug)]
pub enum Sentences {}

impl Granularity for Documents {
    type Key = DocId;
    const LABEL: &'static str = "documents";
}

impl Granularity for Sentences {
    type Key = String;
    const LABEL: &'static str = "sentences";
}

/// Mapping from key to token sequence. Ordered so that every consumer sees the
/// same iteration order for the same contents.
pub struct Corpus<G: Granularity> {
    entries: BTreeMap<G::Key, TokenSequence>,
}

impl<G: Granularity> Corpus<G> {
    pub fn new() -> Self {
        Self { entries: BTreeMap::new() }
    }

    /// Inserts or replaces the tokens for `key`, returning the replaced ones.
    pub fn insert(&mut self, key: G::Key, tokens: TokenSequence) -> Option<TokenSequence> {
        self.entries.insert(key, tokens)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&TokenSequence>
    where
        G::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, G::Key, TokenSequence> {
        self.entries.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, G::Key, TokenSequence> {
        self.entries.keys()
    }
}

impl<G: Granularity> Default for Corpus<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Granularity> Clone for Corpus<G> {
    fn clone(&self) -> Self {
        Self { entries: self.entries.clone() }
    }
}

impl<G: Granularity> fmt::Debug for Corpus<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Corpus")
            .field("granularity", &G::LABEL)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<G: Granularity> FromIterator<(G::Key, TokenSequence)> for Corpus<G> {
    fn from_iter<I: IntoIterator<Item = (G::Key, TokenSequence)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl<'a, G: Granularity> IntoIterator for &'a Corpus<G> {
    type Item = (&'a G::Key, &'a TokenSequence);
    type IntoIter = btree_map::Iter<'a, G::Key, TokenSequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
