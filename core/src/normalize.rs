use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
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
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Word-normalization capability consumed by the token weightor. The default
/// implementation reduces word forms with a Snowball stemmer; a dictionary
/// lemmatizer can be swapped in behind the same seam.
pub trait Normalizer: Send + Sync {
    /// Segment raw text into lowercased candidate words.
    fn tokenize(&self, text: &str) -> Vec<String>;

    fn is_stopword(&self, word: &str) -> bool;

    /// Reduce a word to its canonical form.
    fn lemmatize(&self, word: &str) -> String;
}

/// Default normalizer: NFKC normalization, lowercasing, regex word
/// segmentation, bundled English stopword set, Snowball English stemming.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordNormalizer;

impl Normalizer for WordNormalizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        RE.find_iter(&normalized).map(|m| m.as_str().to_string()).collect()
    }

    fn is_stopword(&self, word: &str) -> bool {
        STOPWORDS.contains(word)
    }

    fn lemmatize(&self, word: &str) -> String {
        STEMMER.stem(word).to_string()
    }
}
