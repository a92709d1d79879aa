use crate::index::{DocId, InvertedIndex, PostingList, ANCHOR_KEY};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Build sidecar: corpus size, diagnostics, provenance.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexMeta {
    pub total_docs: usize,
    pub missed_anchors: u64,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn index(&self) -> PathBuf {
        self.root.join("index.json")
    }
    pub fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
}

/// Serialize the index to its wire form: one JSON object, bigram keys plus
/// the reserved anchor entry, sorted lexicographically.
pub fn index_to_json(index: &InvertedIndex) -> Result<String> {
    let mut wire: BTreeMap<&str, Value> = BTreeMap::new();
    for (key, list) in &index.postings {
        wire.insert(key.as_str(), serde_json::to_value(list)?);
    }
    wire.insert(ANCHOR_KEY, serde_json::to_value(&index.anchors)?);
    Ok(serde_json::to_string_pretty(&wire)?)
}

pub fn index_from_json(json: &str) -> Result<InvertedIndex> {
    let wire: BTreeMap<String, Value> = serde_json::from_str(json)?;
    let mut index = InvertedIndex::default();
    for (key, value) in wire {
        if key == ANCHOR_KEY {
            index.anchors = serde_json::from_value::<BTreeMap<DocId, Vec<String>>>(value)
                .context("malformed anchor entry")?;
        } else {
            let list: PostingList =
                serde_json::from_value(value).with_context(|| format!("malformed postings for {key:?}"))?;
            index.postings.insert(key, list);
        }
    }
    Ok(index)
}

pub fn save_index(paths: &IndexPaths, index: &InvertedIndex) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.index())?;
    f.write_all(index_to_json(index)?.as_bytes())?;
    Ok(())
}

pub fn load_index(path: &Path) -> Result<InvertedIndex> {
    let mut f = File::open(path).with_context(|| format!("open index {}", path.display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    index_from_json(&buf)
}

pub fn save_meta(paths: &IndexPaths, meta: &IndexMeta) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    f.write_all(serde_json::to_string_pretty(meta)?.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<IndexMeta> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    Ok(serde_json::from_str(&buf)?)
}

/// Read the external doc-id to source-URL map. Read-only collaborator; the
/// build and query phases never write it.
pub fn load_bookkeeping(path: &Path) -> Result<BTreeMap<DocId, String>> {
    let mut f = File::open(path).with_context(|| format!("open bookkeeping {}", path.display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    Ok(serde_json::from_str(&buf)?)
}
