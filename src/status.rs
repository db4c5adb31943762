// System status display: corpus files on disk and embedding model presence.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::corpus::store::count_records;
use crate::topics::download::{embedding_files_present, embedding_model_dir};

/// One corpus file found in the data directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusFileInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// `None` when the file could not be read
    pub records: Option<usize>,
}

/// List `.jsonl` corpus files in `data_dir`, sorted by file name.
///
/// A missing directory is simply empty.
pub fn list_corpus_files(data_dir: &Path) -> Result<Vec<CorpusFileInfo>> {
    if !data_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(data_dir)
        .with_context(|| format!("Failed to read data directory {}", data_dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.context("Failed to read data directory entry")?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
            continue;
        }
        let size_bytes = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let records = count_records(&path).ok();
        files.push(CorpusFileInfo {
            path,
            size_bytes,
            records,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Display system status to the terminal.
pub fn show(data_dir: &Path, model_dir: &Path) -> Result<()> {
    let files = list_corpus_files(data_dir)?;

    if files.is_empty() {
        println!("Corpora: none in {}", data_dir.display());
        println!("  Run `trendlens fetch <query>` to build one");
    } else {
        println!("Corpora in {}:", data_dir.display());
        for file in &files {
            let records = file
                .records
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unreadable".to_string());
            let name = file
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!(
                "  {} ({}, {} records)",
                name,
                format_bytes(file.size_bytes),
                records
            );
        }
    }

    if embedding_files_present(model_dir) {
        println!(
            "Embedding model: ready ({})",
            embedding_model_dir(model_dir).display()
        );
    } else {
        println!("Embedding model: not downloaded");
        println!("  Run `trendlens download-model` to enable topic clustering");
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
