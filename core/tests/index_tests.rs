use gramdex_core::builder::IndexBuilder;
use gramdex_core::weight::WeightedToken;
use gramdex_core::{persist, round4, score, InvertedIndex, QueryEngine};

fn tok(text: &str, weight: f64) -> WeightedToken {
    WeightedToken { text: text.into(), weight }
}

/// Two-document corpus where document 0/0 carries "machine learning" once
/// as bold (1.5 + 1.5) and both constituent tokens twice each.
fn two_doc_corpus() -> InvertedIndex {
    let doc_a = vec![
        tok("machine", 1.5),
        tok("learning", 1.5),
        tok("machine", 1.0),
        tok("code", 1.0),
        tok("learning", 1.0),
    ];
    let doc_b = vec![tok("data", 1.0), tok("mining", 1.0)];

    let mut builder = IndexBuilder::new();
    builder.add_document("0/0", &doc_a, "");
    builder.add_document("0/1", &doc_b, "");
    score::finalize(builder)
}

#[test]
fn canonical_two_document_scenario() {
    let index = two_doc_corpus();
    let posting = &index.postings["machine learning"].doc_list["0/0"];

    // freq(machine)=2, freq(learning)=2; one adjacent occurrence at bold.
    assert_eq!(posting.tf, 4);
    assert_eq!(posting.weighted_sum, 3.0);
    assert_eq!(posting.weighted_average, 0.75);
    // doc_freq=1, total_docs=2.
    assert_eq!(posting.tf_idf, Some(round4(4.0 * 2.0f64.ln())));
    assert_eq!(posting.tf_idf, Some(2.7726));

    let engine = QueryEngine::new(index);
    let hits = engine.search(&["machine".to_string()]);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, "0/0");
    // floor(0.75) + floor(2.7726)
    assert_eq!(hits[0].score, 2);
}

#[test]
fn posting_invariants_hold_for_every_entry() {
    let index = two_doc_corpus();
    let total_docs = 2.0f64;
    for (key, list) in &index.postings {
        let doc_freq = list.doc_list.len();
        assert!(doc_freq >= 1, "empty doc_list under {key}");
        let idf = (total_docs / doc_freq as f64).ln();
        for (doc_id, posting) in &list.doc_list {
            assert_eq!(
                posting.weighted_average,
                round4(posting.weighted_sum / f64::from(posting.tf)),
                "weighted_average drifted for {key} in {doc_id}"
            );
            assert_eq!(
                posting.tf_idf,
                Some(round4(f64::from(posting.tf) * idf)),
                "tf_idf drifted for {key} in {doc_id}"
            );
        }
    }
}

#[test]
fn rebuild_is_byte_identical() {
    let first = persist::index_to_json(&two_doc_corpus()).unwrap();
    let second = persist::index_to_json(&two_doc_corpus()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn persisted_keys_are_sorted() {
    let json = persist::index_to_json(&two_doc_corpus()).unwrap();
    let index = persist::index_from_json(&json).unwrap();
    let keys: Vec<_> = index.postings.keys().cloned().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn anchors_ride_along_unscored() {
    let raw = "<a href=\"http://x.y/one\">one</a>";
    let mut builder = IndexBuilder::new();
    builder.add_document("0/0", &[tok("alpha", 1.0), tok("beta", 1.0)], raw);
    let index = score::finalize(builder);

    assert_eq!(index.anchors["0/0"], vec!["http://x.y/one".to_string()]);
    // The anchor entry is not a bigram key and never gets a posting.
    assert!(!index.postings.contains_key("anchor_words"));

    let engine = QueryEngine::new(index);
    assert_eq!(engine.anchor_words("0/0").unwrap().len(), 1);
    assert!(engine.anchor_words("9/9").is_none());
}
