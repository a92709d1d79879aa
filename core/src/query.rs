use crate::index::{DocId, InvertedIndex, Posting};
use crate::persist;
use anyhow::Result;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// One ranked result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryMatch {
    pub doc_id: DocId,
    pub score: i64,
}

/// Answers keyword queries against a scored index. The index is read-only
/// after construction, so any number of searches may run concurrently.
///
/// Each search scans every bigram key once per query term; the cost is
/// (index keys x query terms) by contract, in exchange for substring
/// matching inside keys.
pub struct QueryEngine {
    index: InvertedIndex,
}

impl QueryEngine {
    pub fn new(index: InvertedIndex) -> Self {
        Self { index }
    }

    /// Load a persisted index. Failure here is fatal for retrieval.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(persist::load_index(path)?))
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn anchor_words(&self, doc_id: &str) -> Option<&[String]> {
        self.index.anchors.get(doc_id).map(Vec::as_slice)
    }

    /// Answer an ordered list of already-lowercased terms with a ranked,
    /// deduplicated list of documents. A term matches a bigram key when it
    /// is a substring of the key; documents must match every term
    /// (conjunctive AND). Scores come from the first term's match set.
    pub fn search(&self, terms: &[String]) -> Vec<QueryMatch> {
        let Some((first, rest)) = terms.split_first() else {
            return Vec::new();
        };

        let matches = self.term_matches(first);
        if matches.is_empty() {
            return Vec::new();
        }

        // Membership-only sets for the remaining terms; the intersection is
        // cumulative across all of them.
        let mut rest_sets: Vec<HashSet<&str>> = Vec::with_capacity(rest.len());
        for term in rest {
            let set = self.term_doc_ids(term);
            if set.is_empty() {
                return Vec::new();
            }
            rest_sets.push(set);
        }

        let mut survivors: Vec<QueryMatch> = matches
            .into_iter()
            .filter(|m| rest_sets.iter().all(|set| set.contains(m.doc_id.as_str())))
            .collect();

        // Stable sort: ties keep first-encounter order.
        survivors.sort_by(|a, b| b.score.cmp(&a.score));

        let mut seen = HashSet::new();
        survivors.retain(|m| seen.insert(m.doc_id.clone()));
        survivors
    }

    /// All documents under keys containing `term`, each doc-id once at its
    /// highest score, in first-encounter order.
    fn term_matches(&self, term: &str) -> Vec<QueryMatch> {
        let mut ordered: Vec<QueryMatch> = Vec::new();
        let mut positions: HashMap<&DocId, usize> = HashMap::new();
        for (key, list) in &self.index.postings {
            if !key.contains(term) {
                continue;
            }
            for (doc_id, posting) in &list.doc_list {
                let score = posting_score(posting);
                match positions.get(doc_id) {
                    Some(&at) => {
                        if score > ordered[at].score {
                            ordered[at].score = score;
                        }
                    }
                    None => {
                        positions.insert(doc_id, ordered.len());
                        ordered.push(QueryMatch { doc_id: doc_id.clone(), score });
                    }
                }
            }
        }
        ordered
    }

    fn term_doc_ids(&self, term: &str) -> HashSet<&str> {
        self.index
            .postings
            .iter()
            .filter(|(key, _)| key.contains(term))
            .flat_map(|(_, list)| list.doc_list.keys().map(String::as_str))
            .collect()
    }
}

/// Truncate each component before summing. An unscored posting contributes
/// only its weighted-average part.
fn posting_score(posting: &Posting) -> i64 {
    let mut score = posting.weighted_average.floor() as i64;
    if let Some(tf_idf) = posting.tf_idf {
        score += tf_idf.floor() as i64;
    }
    score
}
