use crate::markup::{HtmlParser, MarkupParser};
use crate::normalize::{Normalizer, WordNormalizer};

/// Weight applied to text that sits under no weighted tag.
pub const PLAIN_WEIGHT: f64 = 1.0;

/// One normalized token with the weight of the tag class it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedToken {
    pub text: String,
    pub weight: f64,
}

/// Ordered weight table over markup tag classes. Declaration order matters:
/// extraction follows it, and it decides where tag tokens land in the
/// output sequence.
#[derive(Debug, Clone)]
pub struct TagWeights {
    entries: Vec<(String, f64)>,
}

impl Default for TagWeights {
    fn default() -> Self {
        Self {
            entries: vec![
                ("title".into(), 2.0),
                ("b".into(), 1.5),
                ("h1".into(), 1.2),
                ("h2".into(), 1.2),
                ("h3".into(), 1.2),
            ],
        }
    }
}

impl TagWeights {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(tag, w)| (tag.as_str(), *w))
    }

    pub fn tags(&self) -> Vec<&str> {
        self.entries.iter().map(|(tag, _)| tag.as_str()).collect()
    }
}

/// Converts one document's raw markup into the ordered (token, weight)
/// sequence the index builder consumes: weighted tag classes first, in
/// declaration order, then the remaining body text at weight 1.0. Tag text
/// therefore precedes body text it was not adjacent to; bigrams formed
/// across that seam are part of the indexing contract, not an accident.
pub struct TokenWeightor<N = WordNormalizer, P = HtmlParser> {
    normalizer: N,
    parser: P,
    weights: TagWeights,
}

impl Default for TokenWeightor {
    fn default() -> Self {
        Self::new(WordNormalizer, HtmlParser, TagWeights::default())
    }
}

impl<N: Normalizer, P: MarkupParser> TokenWeightor<N, P> {
    pub fn new(normalizer: N, parser: P, weights: TagWeights) -> Self {
        Self { normalizer, parser, weights }
    }

    pub fn weigh(&self, content: &str) -> Vec<WeightedToken> {
        let mut out = Vec::new();

        for (tag, weight) in self.weights.iter() {
            let text = self.parser.extract_by_tag(content, tag);
            if text.is_empty() {
                continue;
            }
            for token in self.normalize_text(&text) {
                out.push(WeightedToken { text: token, weight });
            }
        }

        // Weighted tags are already consumed; the body pass must not see them.
        let rest = self.parser.text_without_tags(content, &self.weights.tags());
        for token in self.normalize_text(&rest) {
            out.push(WeightedToken { text: token, weight: PLAIN_WEIGHT });
        }

        out
    }

    /// Alphabetic filter, stopword removal, lemmatization, then ASCII
    /// refinement of each lemma.
    fn normalize_text(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        for word in self.normalizer.tokenize(text) {
            if !word.chars().all(char::is_alphabetic) {
                continue;
            }
            if self.normalizer.is_stopword(&word) {
                continue;
            }
            let lemma = self.normalizer.lemmatize(&word);
            refine_into(&lemma, &mut out);
        }
        out
    }
}

/// Character refinement: keep ASCII lowercase letters only, splitting into
/// sub-tokens at every non-letter boundary. Empty sub-tokens are dropped.
fn refine_into(word: &str, out: &mut Vec<String>) {
    let mut cur = String::new();
    for c in word.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() {
            cur.push(c);
        } else if !cur.is_empty() {
            out.push(std::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() {
        out.push(cur);
    }
}
