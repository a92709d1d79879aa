use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Composite document identifier, `folder/file` (e.g. `"0/42"`).
pub type DocId = String;

/// Two adjacent tokens joined by a single space.
pub type BigramKey = String;

/// Reserved index key holding per-document anchor text. Never collides with
/// a bigram key since bigram keys always contain a space.
pub const ANCHOR_KEY: &str = "anchor_words";

/// Per (bigram, document) statistics. `tf_idf` stays `None` until the
/// corpus-wide scoring pass runs; `None` means unscored, not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub tf: u32,
    pub weighted_sum: f64,
    pub weighted_average: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tf_idf: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingList {
    pub doc_list: BTreeMap<DocId, Posting>,
}

/// The scored, key-ordered index. Anchor words are kept apart in memory and
/// merged under [`ANCHOR_KEY`] only at persistence time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvertedIndex {
    pub postings: BTreeMap<BigramKey, PostingList>,
    pub anchors: BTreeMap<DocId, Vec<String>>,
}

impl InvertedIndex {
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorpusStats {
    pub total_docs: usize,
}

/// Round to 4 decimal places, the precision every stored float carries.
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round4_keeps_four_places() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(3.0 / 4.0), 0.75);
        assert_eq!(round4(4.0 * std::f64::consts::LN_2), 2.7726);
    }

    #[test]
    fn posting_serializes_without_unscored_tf_idf() {
        let p = Posting { tf: 2, weighted_sum: 2.0, weighted_average: 1.0, tf_idf: None };
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("tf_idf"));
        let back: Posting = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
