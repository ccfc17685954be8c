//! Text cleaning for short social-media posts.
//!
//! [`Normalizer::normalize`] runs a fixed chain of total sub-transforms:
//! retweet marker, mentions, lowercase (NFKC folded), punctuation, smart
//! quote, URLs, contractions, stop-words, whitespace. Every stage returns a
//! string; none can fail.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

/// ASCII punctuation minus the apostrophe, plus typographic double quotes.
pub const DEFAULT_PUNCTUATION: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\u{201C}\u{201D}\u{2018}";

pub const SMART_QUOTE: char = '\u{2019}';

const RETWEET_MARKERS: &[&str] = &["RT", "RT:"];

const CONTRACTIONS: &[(&str, &str)] = &[
    ("ain't", "is not"),
    ("aren't", "are not"),
    ("can't", "cannot"),
    ("couldn't", "could not"),
    ("didn't", "did not"),
    ("doesn't", "does not"),
    ("don't", "do not"),
    ("hadn't", "had not"),
    ("hasn't", "has not"),
    ("haven't", "have not"),
    ("he'd", "he would"),
    ("he'll", "he will"),
    ("he's", "he is"),
    ("i'd", "i would"),
    ("i'll", "i will"),
    ("i'm", "i am"),
    ("i've", "i have"),
    ("isn't", "is not"),
    ("it'd", "it would"),
    ("it'll", "it will"),
    ("it's", "it is"),
    ("let's", "let us"),
    ("mightn't", "might not"),
    ("mustn't", "must not"),
    ("shan't", "shall not"),
    ("she'd", "she would"),
    ("she'll", "she will"),
    ("she's", "she is"),
    ("shouldn't", "should not"),
    ("that's", "that is"),
    ("there's", "there is"),
    ("they'd", "they would"),
    ("they'll", "they will"),
    ("they're", "they are"),
    ("they've", "they have"),
    ("wasn't", "was not"),
    ("we'd", "we would"),
    ("we'll", "we will"),
    ("we're", "we are"),
    ("we've", "we have"),
    ("weren't", "were not"),
    ("what's", "what is"),
    ("where's", "where is"),
    ("who's", "who is"),
    ("won't", "will not"),
    ("wouldn't", "would not"),
    ("y'all", "you all"),
    ("you'd", "you would"),
    ("you'll", "you will"),
    ("you're", "you are"),
    ("you've", "you have"),
];

// Contractions whose apostrophe-less spelling is not also an ordinary word
// ("its", "well", "were", "shed" are excluded).
const BARE_CONTRACTIONS: &[&str] = &[
    "ain't", "aren't", "can't", "couldn't", "didn't", "doesn't", "don't", "hadn't", "hasn't",
    "haven't", "i'm", "i've", "isn't", "mustn't", "shouldn't", "that's", "they're", "they've",
    "wasn't", "weren't", "what's", "won't", "wouldn't", "you're", "you've",
];

lazy_static! {
    static ref MENTION: Regex = Regex::new(r"@\w+").expect("valid regex");
    static ref URL: Regex = Regex::new(r"http\S*").expect("valid regex");
    static ref CONTRACTION_MAP: HashMap<String, &'static str> = {
        let mut map: HashMap<String, &'static str> =
            CONTRACTIONS.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        for key in BARE_CONTRACTIONS {
            if let Some(expansion) = map.get(*key).copied() {
                map.insert(key.replace('\'', ""), expansion);
            }
        }
        map
    };
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","us","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","will","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

pub fn is_standard_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Step 1. Drops whitespace-delimited `RT` / `RT:` tokens wherever they occur.
/// Words merely containing the letters (e.g. "ART", "RTX") are untouched.
pub fn strip_retweet_marker(text: &str) -> String {
    text.split_whitespace()
        .filter(|tok| !RETWEET_MARKERS.contains(tok))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Step 2.
pub fn remove_mentions(text: &str) -> String {
    MENTION.replace_all(text, "").into_owned()
}

/// Step 3. NFKC-folds compatibility characters (full-width forms, ligatures)
/// before lowercasing.
pub fn lowercase(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Step 4.
pub fn strip_punctuation(text: &str, punctuation: &HashSet<char>) -> String {
    text.chars().filter(|c| !punctuation.contains(c)).collect()
}

/// Step 5.
pub fn strip_smart_quote(text: &str) -> String {
    text.chars().filter(|c| *c != SMART_QUOTE).collect()
}

/// Step 6. Removes `http` and the rest of its non-whitespace run.
pub fn remove_urls(text: &str) -> String {
    URL.replace_all(text, "").into_owned()
}

/// Step 7. Expands known contractions, then drops any apostrophes left over
/// (possessives, quoting). Bare spellings such as "dont" expand too.
pub fn expand_contractions(text: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    for tok in text.split_whitespace() {
        // Dropping apostrophes can join a fresh `http` run ("ht'tp").
        let bare = URL.replace_all(&tok.replace('\'', ""), "").into_owned();
        match CONTRACTION_MAP.get(tok).or_else(|| CONTRACTION_MAP.get(bare.as_str())) {
            Some(expansion) => words.push(expansion.to_string()),
            None if !bare.is_empty() => words.push(bare),
            None => {}
        }
    }
    words.join(" ")
}

/// Step 9.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerOptions {
    pub punctuation: String,
    pub use_standard_stopwords: bool,
    pub exclude_terms: Vec<String>,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self { punctuation: DEFAULT_PUNCTUATION.to_string(), use_standard_stopwords: true, exclude_terms: Vec::new() }
    }
}

/// Stateless cleaner; configuration is fixed at construction.
#[derive(Debug, Clone)]
pub struct Normalizer {
    punctuation: HashSet<char>,
    standard_stopwords: bool,
    exclude: HashSet<String>,
    filter_stopwords: bool,
}

impl Default for Normalizer {
    fn default() -> Self { Self::new(&NormalizerOptions::default()) }
}

impl Normalizer {
    pub fn new(options: &NormalizerOptions) -> Self {
        // Exclusions are compared against lowercased, punctuation-free tokens.
        let punctuation: HashSet<char> = options.punctuation.chars().collect();
        let exclude = options
            .exclude_terms
            .iter()
            .map(|t| strip_punctuation(&lowercase(t), &punctuation).replace('\'', "").nfkc().collect::<String>())
            .filter(|t| !t.is_empty())
            .collect();
        Self { punctuation, standard_stopwords: options.use_standard_stopwords, exclude, filter_stopwords: true }
    }

    /// Same cleaning but keeping every word, including stop-words and the
    /// domain exclusions. Used where negators such as "not" must survive.
    pub fn keeping_stopwords(&self) -> Self {
        Self { filter_stopwords: false, ..self.clone() }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.exclude.contains(token) || (self.standard_stopwords && is_standard_stopword(token))
    }

    /// Step 8.
    pub fn remove_stopwords(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|tok| !self.is_stopword(tok))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn normalize(&self, raw: &str) -> String {
        let text = strip_retweet_marker(raw);
        let text = remove_mentions(&text);
        let text = lowercase(&text);
        let text = strip_punctuation(&text, &self.punctuation);
        let text = strip_smart_quote(&text);
        let text = remove_urls(&text);
        // Deletions above can leave a combining mark next to a new base.
        let text: String = expand_contractions(&text).nfkc().collect();
        let text = if self.filter_stopwords { self.remove_stopwords(&text) } else { text };
        collapse_whitespace(&text)
    }
}

/// Normalizes with default options and no domain exclusions.
pub fn normalize(raw: &str) -> String {
    Normalizer::default().normalize(raw)
}
