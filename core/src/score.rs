use crate::builder::IndexBuilder;
use crate::index::{round4, InvertedIndex, PostingList};

/// One-shot corpus-wide scoring pass. Consumes the builder, so it cannot
/// run before every document has been merged: idf depends on the final
/// document count and per-key document frequencies.
///
/// With an empty corpus no `tf_idf` is assigned anywhere; consumers treat
/// the absence as "unscored", not zero.
pub fn finalize(builder: IndexBuilder) -> InvertedIndex {
    let (postings, anchors, stats) = builder.into_parts();

    let mut sorted = std::collections::BTreeMap::new();
    for (key, mut doc_list) in postings {
        if stats.total_docs > 0 {
            let doc_freq = doc_list.len();
            let idf = (stats.total_docs as f64 / doc_freq as f64).ln();
            for posting in doc_list.values_mut() {
                posting.tf_idf = Some(round4(f64::from(posting.tf) * idf));
            }
        }
        sorted.insert(key, PostingList { doc_list });
    }

    tracing::info!(keys = sorted.len(), total_docs = stats.total_docs, "index scored");
    InvertedIndex { postings: sorted, anchors }
}
