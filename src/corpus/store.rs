// Corpus file reading and writing.
//
// Format: one JSON object per line, newline-terminated, nothing else. The
// writer truncates on open, so a re-run replaces the previous corpus instead
// of merging into it. The reader is strict: a single bad line fails the load.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::models::Paper;
use crate::error::CorpusError;

/// Streaming writer for a corpus file.
///
/// Records are buffered between `sync` calls; `sync` flushes the buffer and
/// asks the OS to persist it. Dropping the writer closes the file (a final
/// flush is attempted by `BufWriter`), so every exit path releases the handle.
pub struct CorpusWriter {
    path: PathBuf,
    out: BufWriter<File>,
    written: u64,
}

impl CorpusWriter {
    /// Create (or truncate) the corpus file, creating parent directories.
    pub fn create(path: &Path) -> Result<Self, CorpusError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| CorpusError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let file = File::create(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "Opened corpus file for writing");

        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            written: 0,
        })
    }

    /// Append one record as a single JSON line.
    pub fn append(&mut self, paper: &Paper) -> Result<(), CorpusError> {
        let line = serde_json::to_string(paper)?;
        self.out
            .write_all(line.as_bytes())
            .and_then(|_| self.out.write_all(b"\n"))
            .map_err(|source| self.io_error(source))?;
        self.written += 1;
        Ok(())
    }

    /// Flush buffered lines and persist them before the caller moves on.
    pub fn sync(&mut self) -> Result<(), CorpusError> {
        self.out.flush().map_err(|source| self.io_error(source))?;
        self.out
            .get_ref()
            .sync_data()
            .map_err(|source| self.io_error(source))
    }

    /// Sync and close, returning the number of records written.
    pub fn finish(mut self) -> Result<u64, CorpusError> {
        self.sync()?;
        Ok(self.written)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    fn io_error(&self, source: std::io::Error) -> CorpusError {
        CorpusError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Load every record from a corpus file, in file order.
///
/// Fails with `MalformedRecord` on the first line that is not a valid paper
/// object. No partial corpus is returned.
pub fn load(path: &Path) -> Result<Vec<Paper>, CorpusError> {
    let file = File::open(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut papers = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let paper: Paper =
            serde_json::from_str(&line).map_err(|source| CorpusError::MalformedRecord {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })?;
        papers.push(paper);
    }

    debug!(path = %path.display(), records = papers.len(), "Loaded corpus");
    Ok(papers)
}

/// Number of lines in a corpus file, without parsing them.
pub fn count_records(path: &Path) -> Result<usize, CorpusError> {
    let file = File::open(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut count = 0;
    for line in BufReader::new(file).lines() {
        line.map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str, year: i32, month: u32) -> Paper {
        Paper {
            title: title.to_string(),
            abstract_text: Some(format!("Abstract of {title}")),
            year,
            month,
            source: "arXiv".to_string(),
            url: format!("http://arxiv.org/abs/{year}.{month:02}"),
            doi: None,
            citation_count: None,
        }
    }

    #[test]
    fn test_writer_creates_parent_dirs_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("corpus.jsonl");

        let mut writer = CorpusWriter::create(&path).unwrap();
        writer.append(&paper("first run", 2020, 1)).unwrap();
        writer.append(&paper("first run again", 2020, 2)).unwrap();
        assert_eq!(writer.finish().unwrap(), 2);

        let mut writer = CorpusWriter::create(&path).unwrap();
        writer.append(&paper("second run", 2021, 3)).unwrap();
        writer.finish().unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "second run");
    }

    #[test]
    fn test_lines_are_newline_terminated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.jsonl");

        let mut writer = CorpusWriter::create(&path).unwrap();
        writer.append(&paper("a", 2020, 1)).unwrap();
        writer.append(&paper("b", 2020, 1)).unwrap();
        writer.finish().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with('\n'));
        assert_eq!(raw.lines().count(), 2);
        assert_eq!(count_records(&path).unwrap(), 2);
    }

    #[test]
    fn test_sync_makes_lines_visible_before_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.jsonl");

        let mut writer = CorpusWriter::create(&path).unwrap();
        writer.append(&paper("durable", 2022, 5)).unwrap();
        writer.sync().unwrap();

        // Still open, but the synced line is already on disk.
        assert_eq!(load(&path).unwrap().len(), 1);
        assert_eq!(writer.written(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.jsonl")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
