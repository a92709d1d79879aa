use crate::index::{round4, BigramKey, CorpusStats, DocId, Posting};
use crate::weight::WeightedToken;
use std::collections::{BTreeMap, HashMap};

/// Everything the build pipeline derives from one document. Computing a
/// batch is a pure function of the document, so workers can run in
/// parallel; only [`IndexBuilder::merge`] touches shared state.
#[derive(Debug, Clone)]
pub struct DocumentBatch {
    pub doc_id: DocId,
    pub postings: Vec<(BigramKey, Posting)>,
    pub anchors: Vec<String>,
    pub token_count: usize,
    pub missed_anchors: u64,
}

/// Accumulates per-document batches into the corpus-wide posting maps.
/// Scoring consumes the builder (`score::finalize`), which is the barrier:
/// idf needs the final document and key counts.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    postings: HashMap<BigramKey, BTreeMap<DocId, Posting>>,
    anchors: BTreeMap<DocId, Vec<String>>,
    token_counts: BTreeMap<DocId, usize>,
    total_docs: usize,
    missed_anchors: u64,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive one document's posting batch from its ordered token sequence
    /// and raw content. Occurrences are folded in sequence order: `tf` is
    /// assigned from the document-global token frequencies on every
    /// occurrence, `weighted_sum` accumulates, and `weighted_average` is
    /// recomputed each time from the latest pair.
    pub fn process_document(doc_id: &str, tokens: &[WeightedToken], raw: &str) -> DocumentBatch {
        let mut freq: HashMap<&str, u32> = HashMap::new();
        for token in tokens {
            *freq.entry(token.text.as_str()).or_insert(0) += 1;
        }

        let mut postings: HashMap<BigramKey, Posting> = HashMap::new();
        for pair in tokens.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let key = format!("{} {}", a.text, b.text);
            let tf = freq[a.text.as_str()] + freq[b.text.as_str()];
            let entry = postings.entry(key).or_default();
            entry.tf = tf;
            entry.weighted_sum += a.weight + b.weight;
            entry.weighted_average = round4(entry.weighted_sum / f64::from(entry.tf));
        }

        let (anchors, missed_anchors) = extract_anchors(raw);

        DocumentBatch {
            doc_id: doc_id.to_string(),
            postings: postings.into_iter().collect(),
            anchors,
            token_count: tokens.len(),
            missed_anchors,
        }
    }

    /// Fold one document's batch into the corpus accumulator. Merge order
    /// across documents does not matter; postings are keyed per doc-id.
    pub fn merge(&mut self, batch: DocumentBatch) {
        self.total_docs += 1;
        if batch.missed_anchors > 0 {
            tracing::debug!(doc_id = %batch.doc_id, missed = batch.missed_anchors, "anchor slices skipped");
            self.missed_anchors += batch.missed_anchors;
        }
        for (key, posting) in batch.postings {
            self.postings.entry(key).or_default().insert(batch.doc_id.clone(), posting);
        }
        self.anchors.insert(batch.doc_id.clone(), batch.anchors);
        self.token_counts.insert(batch.doc_id, batch.token_count);
    }

    /// Process and merge in one step; the sequential path.
    pub fn add_document(&mut self, doc_id: &str, tokens: &[WeightedToken], raw: &str) {
        let batch = Self::process_document(doc_id, tokens, raw);
        self.merge(batch);
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats { total_docs: self.total_docs }
    }

    pub fn missed_anchors(&self) -> u64 {
        self.missed_anchors
    }

    /// Total tokens seen per document. Informational; ranking never reads it.
    pub fn token_counts(&self) -> &BTreeMap<DocId, usize> {
        &self.token_counts
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        HashMap<BigramKey, BTreeMap<DocId, Posting>>,
        BTreeMap<DocId, Vec<String>>,
        CorpusStats,
    ) {
        let stats = CorpusStats { total_docs: self.total_docs };
        (self.postings, self.anchors, stats)
    }
}

/// Harvest anchor text from hyperlink attributes. Whitespace-separated
/// chunks carrying an `href` marker are sliced between the assignment
/// operator and the next closing angle bracket or quote. Failed slices are
/// counted, never fatal.
fn extract_anchors(content: &str) -> (Vec<String>, u64) {
    let mut anchors = Vec::new();
    let mut missed = 0u64;
    for chunk in content.split_whitespace() {
        if !chunk.contains("href") {
            continue;
        }
        match slice_anchor(chunk) {
            Some(anchor) => anchors.push(anchor),
            None => missed += 1,
        }
    }
    (anchors, missed)
}

fn slice_anchor(chunk: &str) -> Option<String> {
    let start = (chunk.find('=')? + 2).min(chunk.len());
    let end = if let Some(gt) = chunk.find('>') {
        gt.saturating_sub(1)
    } else if chunk.get(start..).is_some_and(|rest| rest.contains('"')) {
        chunk.len().saturating_sub(2)
    } else {
        chunk.len()
    };
    let end = end.clamp(start, chunk.len());
    chunk.get(start..end).map(str::to_string)
}
