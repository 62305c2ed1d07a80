use crate::index::TokenSequence;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

lazy_static! {
    static ref ABBREVIATION: Regex =
        Regex::new(r"(?i)(?:^|[\s(])(?:mr|mrs|ms|dr|prof|sr|jr|st|vs|fig|e\.g|i\.e)\.$").expect("valid regex");
    // Unicode punctuation (P*) plus the ASCII punctuation set, which also
    // counts symbols such as `+`, `$` and `|`.
    static ref PUNCTUATION: Regex =
        Regex::new(r"^[\p{P}\x21-\x2F\x3A-\x40\x5B-\x60\x7B-\x7E]*$").expect("valid regex");
    static ref ENGLISH_STOPWORDS: HashSet<String> = {
        let words: &[&str] = &[
            "i","me","my","myself","we","our","ours","ourselves","you","you're","you've","you'll","you'd",
            "your","yours","yourself","yourselves","he","him","his","himself","she","she's","her","hers",
            "herself","it","it's","its","itself","they","them","their","theirs","themselves",
            "what","which","who","whom","this","that","that'll","these","those",
            "am","is","are","was","were","be","been","being","have","has","had","having","do","does","did","doing",
            "a","an","the","and","but","if","or","because","as","until","while","of","at","by","for","with",
            "about","against","between","into","through","during","before","after","above","below",
            "to","from","up","down","in","out","on","off","over","under","again","further","then","once",
            "here","there","when","where","why","how","all","any","both","each","few","more","most","other",
            "some","such","no","nor","not","only","own","same","so","than","too","very",
            "s","t","can","will","just","don","don't","should","should've","now","d","ll","m","o","re","ve","y",
            "ain","aren","aren't","couldn","couldn't","didn","didn't","doesn","doesn't","hadn","hadn't",
            "hasn","hasn't","haven","haven't","isn","isn't","ma","mightn","mightn't","mustn","mustn't",
            "needn","needn't","shan","shan't","shouldn","shouldn't","wasn","wasn't","weren","weren't",
            "won","won't","wouldn","wouldn't"
        ];
        words.iter().map(|w| w.to_string()).collect()
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
}

/// Language capabilities the scoring pipeline depends on. Numeric results are
/// only reproducible while the implementation (and its stopword list) stays
/// the same.
pub trait TextAnalyzer {
    /// Split text into word units in reading order. Punctuation segments may
    /// be returned; [`tokenize`] filters them.
    fn tokenize_words(&self, text: &str) -> Vec<String>;

    fn stopwords(&self, language: Language) -> &HashSet<String>;

    /// Split a passage into sentences, in order, each as it appears in the
    /// passage.
    fn split_sentences(&self, passage: &str) -> Vec<String>;
}

/// Lowercase `text`, split it into words, then drop punctuation-only tokens
/// and stopwords. No stemming.
pub fn tokenize<A: TextAnalyzer + ?Sized>(analyzer: &A, language: Language, text: &str) -> TokenSequence {
    let stopwords = analyzer.stopwords(language);
    analyzer
        .tokenize_words(&text.to_lowercase())
        .into_iter()
        .filter(|token| !is_punctuation(token))
        .filter(|token| !stopwords.contains(token))
        .collect()
}

fn is_punctuation(token: &str) -> bool {
    PUNCTUATION.is_match(token)
}

/// Treebank-style contraction suffixes split off the word they attach to.
const CLITICS: &[&str] = &["n't", "'s", "'re", "'ll", "'ve", "'d", "'m"];

/// Splits `dog's` into `dog` + `'s` and `don't` into `do` + `n't`.
fn split_clitic(word: &str) -> (&str, Option<&str>) {
    for clitic in CLITICS {
        if let Some(stem) = word.strip_suffix(clitic) {
            if stem.chars().any(char::is_alphanumeric) {
                return (stem, Some(&word[stem.len()..]));
            }
        }
    }
    (word, None)
}

/// Unicode (UAX #29) word and sentence boundaries with the NLTK English
/// stopword list.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishAnalyzer;

impl TextAnalyzer for EnglishAnalyzer {
    fn tokenize_words(&self, text: &str) -> Vec<String> {
        // NFKC leaves U+2019 alone; fold it so contractions match the
        // stopword list and the clitic split.
        let normalized = text.nfkc().collect::<String>().to_lowercase().replace('\u{2019}', "'");
        let mut words = Vec::new();
        for segment in normalized.split_word_bounds() {
            if segment.trim().is_empty() {
                continue;
            }
            let (stem, clitic) = split_clitic(segment);
            words.push(stem.to_string());
            words.extend(clitic.map(str::to_string));
        }
        words
    }

    fn stopwords(&self, language: Language) -> &HashSet<String> {
        match language {
            Language::English => &*ENGLISH_STOPWORDS,
        }
    }

    fn split_sentences(&self, passage: &str) -> Vec<String> {
        // (start, end) byte spans of trimmed sentences; a span ending in a
        // known abbreviation absorbs the next one.
        let mut spans: Vec<(usize, usize)> = Vec::new();
        for (offset, segment) in passage.split_sentence_bound_indices() {
            let trimmed = segment.trim();
            if trimmed.is_empty() {
                continue;
            }
            let start = offset + (segment.len() - segment.trim_start().len());
            let end = start + trimmed.len();
            match spans.last_mut() {
                Some(last) if ABBREVIATION.is_match(&passage[last.0..last.1]) => last.1 = end,
                _ => spans.push((start, end)),
            }
        }
        spans.into_iter().map(|(start, end)| passage[start..end].to_string()).collect()
    }
}
