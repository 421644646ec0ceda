use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::ExtractError;
use crate::graph::{Graph, Record};
use crate::parser::extract::ExtractedProduct;
use crate::parser::fields::CompiledSelectors;
use crate::parser::{self, text::is_multi_item};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CorpusStats {
    pub documents: usize,
    pub skipped_multi_item: usize,
    pub failed: usize,
    pub products: usize,
    pub facts: usize,
    pub duplicates_removed: usize,
}

impl CorpusStats {
    pub fn print(&self) {
        println!(
            "Read {} documents: {} products, {} facts ({} multi-item skipped, {} failed, {} duplicates removed).",
            self.documents,
            self.products,
            self.facts,
            self.skipped_multi_item,
            self.failed,
            self.duplicates_removed,
        );
    }
}

pub struct CorpusRun {
    pub graph: Graph,
    pub stats: CorpusStats,
}

/// Regular files directly under `folder`, sorted by path.
pub fn list_documents(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        bail!("Input folder {} does not exist or is not a directory", folder.display());
    }
    let mut paths = Vec::new();
    for entry in fs::read_dir(folder).with_context(|| format!("Failed to list {}", folder.display()))? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Read a page, dropping any invalid UTF-8 sequences. Valid text, including a literal
/// U+FFFD, is kept as is.
pub fn read_document(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    Ok(text)
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Extract one file into records under `product_id` (no multi-item check).
pub fn extract_file(path: &Path, product_id: u32, settings: &Settings) -> Result<Vec<Record>> {
    let selectors = CompiledSelectors::compile(&settings.selectors)?;
    let html = read_document(path)?;
    let records = parser::assemble(&html, product_id, &selectors, settings)
        .with_context(|| format!("Failed to extract {}", path.display()))?;
    Ok(records)
}

/// Build the deduplicated graph for every page in `folder`.
///
/// Pages are parsed in parallel, but identifiers are handed out afterwards in path order
/// and only to pages that extracted successfully, so ids stay contiguous and reproducible.
/// The multi-item check looks at the file name only, never at the parent folders.
pub fn build_graph(folder: &Path, settings: &Settings, progress: &ProgressBar) -> Result<CorpusRun> {
    let selectors = CompiledSelectors::compile(&settings.selectors)?;
    let paths = list_documents(folder)?;

    let mut stats = CorpusStats {
        documents: paths.len(),
        ..CorpusStats::default()
    };

    let included: Vec<PathBuf> = paths
        .into_iter()
        .filter(|path| {
            let multi = is_multi_item(&document_name(path));
            if multi {
                debug!("Skipping multi-item listing {}", path.display());
            }
            !multi
        })
        .collect();
    stats.skipped_multi_item = stats.documents - included.len();

    progress.set_length(included.len() as u64);
    let results: Vec<Result<ExtractedProduct, ExtractError>> = included
        .par_iter()
        .map(|path| {
            let result = read_document(path)
                .and_then(|html| parser::process_document(&html, &selectors, settings));
            progress.inc(1);
            result
        })
        .collect();
    progress.finish_and_clear();

    let mut records = Vec::new();
    let mut next_id: u32 = 1;
    for (path, result) in included.iter().zip(results) {
        match result {
            Ok(product) => {
                records.extend(product.into_records(next_id));
                info!("Extracted product {} from {}", next_id, path.display());
                next_id += 1;
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                stats.failed += 1;
            }
        }
    }

    let (graph, removed) = Graph::from_records(records)?;
    stats.duplicates_removed = removed;
    stats.products = graph.products().count();
    stats.facts = graph.facts().count();
    info!(
        "Built graph: {} products, {} facts from {} documents",
        stats.products, stats.facts, stats.documents
    );

    Ok(CorpusRun { graph, stats })
}
