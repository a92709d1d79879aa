use anyhow::Result;
use clap::{Parser, Subcommand};
use crossbeam_channel::unbounded;
use gramdex_core::builder::{DocumentBatch, IndexBuilder};
use gramdex_core::persist::{self, IndexMeta, IndexPaths};
use gramdex_core::score;
use gramdex_core::weight::TokenWeightor;
use tracing_subscriber::{fmt, EnvFilter};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "gramdex-indexer")]
#[command(about = "Build the bigram tf-idf index over a crawled corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a bookkeeping map and its corpus folder
    Build {
        /// Doc-id to URL bookkeeping JSON file
        #[arg(long)]
        bookkeeping: String,
        /// Folder holding one raw document per folder/file id
        #[arg(long)]
        data: String,
        /// Output index directory
        #[arg(long)]
        output: String,
        /// Worker threads; 0 means one per CPU
        #[arg(long, default_value_t = 0)]
        workers: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { bookkeeping, data, output, workers } => {
            build_index(&bookkeeping, &data, &output, workers)
        }
    }
}

fn build_index(bookkeeping: &str, data: &str, output: &str, workers: usize) -> Result<()> {
    let started = Instant::now();
    let entries = persist::load_bookkeeping(Path::new(bookkeeping))?;
    let workers = if workers == 0 { num_cpus::get() } else { workers };
    tracing::info!(docs = entries.len(), workers, "starting build");

    // Queue every corpus document up front; the folder/file id doubles as
    // the relative path under the data folder.
    let (doc_tx, doc_rx) = unbounded::<(String, PathBuf)>();
    for doc_id in entries.keys() {
        let path = Path::new(data).join(doc_id);
        doc_tx.send((doc_id.clone(), path)).expect("document queue open");
    }
    drop(doc_tx);

    // Per-document work is a pure function of the document, so workers run
    // independently; the main thread is the single reducer.
    let weightor = TokenWeightor::default();
    let mut builder = IndexBuilder::new();
    let (batch_tx, batch_rx) = unbounded::<DocumentBatch>();
    std::thread::scope(|s| {
        for _ in 0..workers {
            let doc_rx = doc_rx.clone();
            let batch_tx = batch_tx.clone();
            let weightor = &weightor;
            s.spawn(move || {
                for (doc_id, path) in doc_rx.iter() {
                    let content = match fs::read_to_string(&path) {
                        Ok(content) => content,
                        Err(err) => {
                            tracing::warn!(doc_id = %doc_id, path = %path.display(), %err, "skipping unreadable document");
                            continue;
                        }
                    };
                    let tokens = weightor.weigh(&content);
                    let batch = IndexBuilder::process_document(&doc_id, &tokens, &content);
                    if batch_tx.send(batch).is_err() {
                        break;
                    }
                }
            });
        }
        drop(batch_tx);

        for batch in batch_rx.iter() {
            builder.merge(batch);
        }
    });

    let stats = builder.stats();
    let missed_anchors = builder.missed_anchors();
    let total_tokens: usize = builder.token_counts().values().sum();
    tracing::info!(total_docs = stats.total_docs, total_tokens, missed_anchors, "corpus merged");

    let index = score::finalize(builder);

    let paths = IndexPaths::new(output);
    persist::save_index(&paths, &index)?;
    let meta = IndexMeta {
        total_docs: stats.total_docs,
        missed_anchors,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        version: 1,
    };
    persist::save_meta(&paths, &meta)?;

    tracing::info!(
        output,
        keys = index.len(),
        elapsed_s = started.elapsed().as_secs_f64(),
        "index build complete"
    );
    Ok(())
}
