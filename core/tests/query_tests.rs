use gramdex_core::{InvertedIndex, Posting, PostingList, QueryEngine};

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Build an index straight from (key, [(doc_id, weighted_average, tf_idf)])
/// rows; tf/weighted_sum are filled consistently but the scores under test
/// only read the last two fields.
fn index_from(rows: &[(&str, &[(&str, f64, f64)])]) -> InvertedIndex {
    let mut index = InvertedIndex::default();
    for (key, docs) in rows {
        let mut list = PostingList::default();
        for (doc_id, weighted_average, tf_idf) in docs.iter() {
            list.doc_list.insert(
                doc_id.to_string(),
                Posting {
                    tf: 2,
                    weighted_sum: weighted_average * 2.0,
                    weighted_average: *weighted_average,
                    tf_idf: Some(*tf_idf),
                },
            );
        }
        index.postings.insert(key.to_string(), list);
    }
    index
}

#[test]
fn empty_query_returns_empty() {
    let engine = QueryEngine::new(index_from(&[("alpha beta", &[("0/0", 1.0, 1.0)])]));
    assert!(engine.search(&[]).is_empty());
}

#[test]
fn unmatched_term_returns_empty() {
    let engine = QueryEngine::new(index_from(&[("alpha beta", &[("0/0", 1.0, 1.0)])]));
    assert!(engine.search(&terms(&["zzz"])).is_empty());
    // AND semantics: one dead term kills the whole query.
    assert!(engine.search(&terms(&["alpha", "zzz"])).is_empty());
}

#[test]
fn term_matches_by_substring_not_whole_word() {
    let engine = QueryEngine::new(index_from(&[
        ("machine learning", &[("0/0", 1.0, 1.0)]),
        ("chin rest", &[("0/1", 1.0, 1.0)]),
    ]));
    // "chin" is a substring of both keys.
    let hits = engine.search(&terms(&["chin"]));
    let ids: Vec<_> = hits.iter().map(|h| h.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["0/1", "0/0"]);
}

#[test]
fn duplicate_doc_keeps_highest_score_once() {
    let engine = QueryEngine::new(index_from(&[
        ("machine learning", &[("0/0", 5.2, 0.0)]),
        ("machine parts", &[("0/0", 1.0, 0.5), ("0/1", 1.0, 0.5)]),
    ]));
    let hits = engine.search(&terms(&["machine"]));
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].doc_id, "0/0");
    assert_eq!(hits[0].score, 5);
    assert_eq!(hits[1].doc_id, "0/1");
    assert_eq!(hits[1].score, 1);
}

#[test]
fn intersection_is_cumulative_across_all_terms() {
    // Middle term excludes 0/2; an intersection that only honored the
    // first and last sets would keep it.
    let engine = QueryEngine::new(index_from(&[
        ("qq ww", &[("0/1", 3.0, 0.0), ("0/2", 3.0, 0.0)]),
        ("ee rr", &[("0/1", 1.0, 0.0)]),
        ("tt yy", &[("0/1", 2.0, 0.0), ("0/2", 2.0, 0.0)]),
    ]));
    let hits = engine.search(&terms(&["qq", "ee", "tt"]));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].doc_id, "0/1");
    // The surviving score comes from the first term's set.
    assert_eq!(hits[0].score, 3);
}

#[test]
fn ranking_is_descending_with_stable_ties() {
    let engine = QueryEngine::new(index_from(&[
        ("alpha beta", &[("0/2", 3.0, 0.0), ("0/9", 7.0, 0.0)]),
        ("alpha gamma", &[("1/1", 3.0, 0.0)]),
    ]));
    let hits = engine.search(&terms(&["alpha"]));
    let ranked: Vec<_> = hits.iter().map(|h| (h.doc_id.as_str(), h.score)).collect();
    // 0/2 and 1/1 tie at 3; 0/2 was encountered first and stays first.
    assert_eq!(ranked, vec![("0/9", 7), ("0/2", 3), ("1/1", 3)]);
}

#[test]
fn scores_truncate_each_component_before_summing() {
    let engine = QueryEngine::new(index_from(&[("alpha beta", &[("0/0", 0.9999, 1.9999)])]));
    let hits = engine.search(&terms(&["alpha"]));
    assert_eq!(hits[0].score, 1); // floor(0.9999) + floor(1.9999)
}
