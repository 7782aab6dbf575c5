//! Ruby source discovery using the `ignore` crate.
//!
//! Walks a directory root with native `.gitignore` support at all levels
//! and collects `.rb` files with size, line, and content-hash statistics.
//! Hashes let callers skip byte-identical file pairs before parsing.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::{Result, StructureError};

/// Information about a scanned file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScannedFile {
    /// Relative path from the scan root.
    pub path: String,

    /// File size in bytes.
    pub size_bytes: u64,

    /// xxHash3 hash of the file content.
    pub hash: Option<String>,

    /// Number of lines in the file.
    pub lines: u32,
}

/// Result of scanning a directory.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// Discovered Ruby files.
    pub files: Vec<ScannedFile>,

    /// Files skipped because they are not Ruby sources.
    pub skipped_count: usize,

    /// Errors encountered while reading metadata.
    pub error_count: usize,

    /// Time taken for the scan in milliseconds.
    pub duration_ms: f64,
}

impl ScanResult {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Compute xxHash3 hash of file content.
fn compute_file_hash(path: &Path) -> Option<String> {
    let content = fs::read(path).ok()?;
    let hash = xxh3_64(&content);
    Some(format!("xxh3:{:016x}", hash))
}

/// Count lines in a file efficiently.
fn count_lines(path: &Path) -> u32 {
    fs::read(path)
        .map(|content| bytecount::count(&content, b'\n') as u32)
        .unwrap_or(0)
}

fn is_ruby_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("rb"))
        .unwrap_or(false)
}

/// Scan a directory for Ruby source files.
///
/// Respects `.gitignore` at every level. Files come back sorted by
/// relative path so results are stable across runs.
pub fn scan_directory(root_path: &str, compute_hashes: bool) -> Result<ScanResult> {
    let start = Instant::now();
    let root = Path::new(root_path);

    if !root.exists() {
        return Err(StructureError::MissingPath {
            path: root_path.to_string(),
        });
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false) // Include hidden files, let gitignore handle it
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true);

    let walker = builder.build();

    let paths: Vec<_> = walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|entry| entry.into_path())
        .collect();

    let skipped = AtomicUsize::new(0);
    let errors = AtomicUsize::new(0);
    let result_files = Mutex::new(Vec::new());

    paths.par_iter().for_each(|path| {
        if !is_ruby_file(path) {
            skipped.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(_) => {
                errors.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        let rel_path = path
            .strip_prefix(root)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| path.to_string_lossy().to_string());

        let hash = if compute_hashes {
            compute_file_hash(path)
        } else {
            None
        };

        let file = ScannedFile {
            path: rel_path,
            size_bytes: metadata.len(),
            hash,
            lines: count_lines(path),
        };

        if let Ok(mut files) = result_files.lock() {
            files.push(file);
        }
    });

    let mut files = result_files.into_inner().unwrap_or_default();
    files.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(ScanResult {
        files,
        skipped_count: skipped.load(Ordering::Relaxed),
        error_count: errors.load(Ordering::Relaxed),
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) {
        let path = dir.path().join(name);
        File::create(path).unwrap().write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_scan_finds_only_ruby_files() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "foo.rb", "class Foo\nend\n");
        write_file(&dir, "bar.rb", "class Bar\nend\n");
        write_file(&dir, "notes.txt", "nothing\n");

        let result = scan_directory(dir.path().to_str().unwrap(), false).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.skipped_count, 1);

        let paths: Vec<&str> = result.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["bar.rb", "foo.rb"]);
    }

    #[test]
    fn test_scan_missing_root_errors() {
        let result = scan_directory("/no/such/rubydiff/dir", false);
        assert!(result.is_err());
    }

    #[test]
    fn test_scan_computes_hashes_on_request() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "foo.rb", "class Foo\nend\n");

        let result = scan_directory(dir.path().to_str().unwrap(), true).unwrap();
        let hash = result.files[0].hash.as_ref().unwrap();
        assert!(hash.starts_with("xxh3:"));

        let without = scan_directory(dir.path().to_str().unwrap(), false).unwrap();
        assert!(without.files[0].hash.is_none());
    }

    #[test]
    fn test_scan_counts_lines() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "foo.rb", "class Foo\n  def bar\n  end\nend\n");

        let result = scan_directory(dir.path().to_str().unwrap(), false).unwrap();
        assert_eq!(result.files[0].lines, 4);
    }
}
