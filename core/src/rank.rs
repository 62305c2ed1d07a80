//! Document and sentence ranking.
//!
//! Both rankers sort by score descending and fall back to the key ascending
//! (document id, sentence text), so equal scores always come out in the same
//! order regardless of how the inputs were built.

use crate::error::{Error, Result};
use crate::idf::IdfTable;
use crate::index::{Corpus, DocId, Documents, Query, Sentences, TokenSequence};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub id: DocId,
    pub score: f64,
}

/// Ranking key for a sentence, compared field by field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentenceScore {
    /// Sum of the IDF of every distinct query word in the sentence.
    pub idf_sum: f64,
    /// Matched query words over sentence length (duplicates counted).
    pub density: f64,
    pub weighted: f64,
}

impl SentenceScore {
    fn new(idf_sum: f64, density: f64) -> Self {
        Self { idf_sum, density, weighted: idf_sum * density }
    }

    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.idf_sum
            .total_cmp(&other.idf_sum)
            .then_with(|| self.density.total_cmp(&other.density))
            .then_with(|| self.weighted.total_cmp(&other.weighted))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSentence {
    pub text: String,
    #[serde(flatten)]
    pub score: SentenceScore,
}

/// TF-IDF of one document: sum over query words of `count * idf`. Words the
/// table has never seen cannot occur in any document and add nothing.
fn tfidf(query: &Query, tokens: &TokenSequence, idf: &IdfTable<Documents>) -> f64 {
    query
        .iter()
        .filter_map(|word| {
            let weight = idf.get(word)?;
            let tf = tokens.count(word);
            (tf > 0).then(|| tf as f64 * weight)
        })
        .fold(0.0, |acc, s| acc + s)
}

/// Scores every document and returns the best `n`, ties broken by id.
pub fn rank_files(
    query: &Query,
    files: &Corpus<Documents>,
    idf: &IdfTable<Documents>,
    n: usize,
) -> Vec<ScoredDocument> {
    let mut scored: Vec<ScoredDocument> = files
        .iter()
        .map(|(id, tokens)| ScoredDocument { id: id.clone(), score: tfidf(query, tokens, idf) })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    scored.truncate(n);
    scored
}

pub fn top_files(
    query: &Query,
    files: &Corpus<Documents>,
    idf: &IdfTable<Documents>,
    n: usize,
) -> Vec<DocId> {
    rank_files(query, files, idf, n).into_iter().map(|d| d.id).collect()
}

/// Ranks sentences sharing at least one word with the query.
///
/// Sentences without any query word are left out entirely. Every matched word
/// must have an entry in `idf`; a missing one is reported as
/// [`Error::MissingIdf`] rather than scored as zero.
pub fn rank_sentences(
    query: &Query,
    sentences: &Corpus<Sentences>,
    idf: &IdfTable<Sentences>,
    n: usize,
) -> Result<Vec<ScoredSentence>> {
    let mut scored = Vec::new();
    for (text, tokens) in sentences {
        let matched = query.matched_in(tokens);
        if matched.is_empty() {
            continue;
        }
        let mut idf_sum = 0.0;
        for word in &matched {
            idf_sum += idf
                .get(word)
                .ok_or_else(|| Error::MissingIdf { word: word.to_string() })?;
        }
        let density = matched.len() as f64 / tokens.len() as f64;
        scored.push(ScoredSentence { text: text.clone(), score: SentenceScore::new(idf_sum, density) });
    }

    scored.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.text.cmp(&b.text)));
    scored.truncate(n);
    Ok(scored)
}

pub fn top_sentences(
    query: &Query,
    sentences: &Corpus<Sentences>,
    idf: &IdfTable<Sentences>,
    n: usize,
) -> Result<Vec<String>> {
    Ok(rank_sentences(query, sentences, idf, n)?.into_iter().map(|s| s.text).collect())
}
