pub mod builder;
pub mod index;
pub mod markup;
pub mod normalize;
pub mod persist;
pub mod query;
pub mod score;
pub mod weight;

pub use index::{round4, BigramKey, CorpusStats, DocId, InvertedIndex, Posting, PostingList, ANCHOR_KEY};
pub use query::{QueryEngine, QueryMatch};
