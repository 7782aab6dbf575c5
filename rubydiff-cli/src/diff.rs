//! Diff driver - file pairs and directory trees.
//!
//! File mode reads both sources and diffs them directly. Directory mode
//! scans both roots (gitignore-aware), pairs files by relative path,
//! skips byte-identical pairs via content hashes, parses the remaining
//! sources in parallel, and diffs each pair; a file present on only one
//! side diffs against an empty model, so all of its declarations report
//! as Added or Removed.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use rubydiff_core::model::StructureModel;
use rubydiff_core::parser::parse_files_parallel;
use rubydiff_core::scanner::{scan_directory, ScannedFile};
use rubydiff_core::types::{ExportConfig, SourceFile};
use rubydiff_core::{diff_sources, structure_diff, StructureDiffResult};

use crate::output::{self, OutputFormat};

/// Structural diff of one file pair.
#[derive(Debug, Serialize)]
pub struct FileDiff {
    pub path: String,
    pub result: StructureDiffResult,
}

/// Run the diff command. Returns whether structural changes were found.
pub fn run(
    base: &str,
    head: &str,
    format: OutputFormat,
    include_unchanged: bool,
) -> anyhow::Result<bool> {
    let base_path = Path::new(base);
    let head_path = Path::new(head);
    let config = ExportConfig::new(true, include_unchanged);

    if base_path.is_dir() && head_path.is_dir() {
        run_dirs(base, head, format, &config)
    } else if base_path.is_file() && head_path.is_file() {
        run_files(base, head, format, &config)
    } else {
        anyhow::bail!("BASE and HEAD must both be files or both be directories")
    }
}

fn read_source(path: &str) -> anyhow::Result<SourceFile> {
    let source = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    Ok(SourceFile::new(path.to_string(), source))
}

fn run_files(
    base: &str,
    head: &str,
    format: OutputFormat,
    config: &ExportConfig,
) -> anyhow::Result<bool> {
    let base_source = read_source(base)?;
    let head_source = read_source(head)?;

    let result = diff_sources(&base_source, &head_source)
        .with_context(|| format!("Failed to diff {} against {}", head, base))?;

    println!("{}", output::render_single(&result, format, config)?);
    Ok(result.has_changes())
}

fn run_dirs(
    base: &str,
    head: &str,
    format: OutputFormat,
    config: &ExportConfig,
) -> anyhow::Result<bool> {
    let base_scan = scan_directory(base, true)?;
    let head_scan = scan_directory(head, true)?;
    tracing::debug!(
        base_files = base_scan.len(),
        head_files = head_scan.len(),
        "scanned directory roots"
    );

    let base_index: HashMap<&str, &ScannedFile> = base_scan
        .files
        .iter()
        .map(|f| (f.path.as_str(), f))
        .collect();
    let head_index: HashMap<&str, &ScannedFile> = head_scan
        .files
        .iter()
        .map(|f| (f.path.as_str(), f))
        .collect();

    let paths: BTreeSet<&str> = base_index
        .keys()
        .chain(head_index.keys())
        .copied()
        .collect();

    // Pair files by relative path; identical content needs no parse.
    let mut pairs = Vec::new();
    for path in paths {
        let in_base = base_index.get(path);
        let in_head = head_index.get(path);
        if let (Some(b), Some(h)) = (in_base, in_head) {
            if b.hash.is_some() && b.hash == h.hash {
                tracing::debug!(path, "skipping byte-identical pair");
                continue;
            }
        }
        pairs.push((path.to_string(), in_base.is_some(), in_head.is_some()));
    }

    let base_sources = read_side_sources(base, &pairs, |(_, in_base, _)| *in_base)?;
    let head_sources = read_side_sources(head, &pairs, |(_, _, in_head)| *in_head)?;

    let base_models = parse_side(&base_sources)?;
    let head_models = parse_side(&head_sources)?;

    let mut file_diffs = Vec::new();
    for (path, in_base, in_head) in &pairs {
        let empty = StructureModel::new(path.clone());
        let base_model = if *in_base { &base_models[path] } else { &empty };
        let head_model = if *in_head { &head_models[path] } else { &empty };
        file_diffs.push(FileDiff {
            path: path.clone(),
            result: structure_diff(base_model, head_model),
        });
    }

    println!("{}", output::render_files(&file_diffs, format, config)?);
    Ok(file_diffs.iter().any(|d| d.result.has_changes()))
}

/// Read the sources for one side of the pairing.
fn read_side_sources<F>(
    root: &str,
    pairs: &[(String, bool, bool)],
    present: F,
) -> anyhow::Result<Vec<SourceFile>>
where
    F: Fn(&(String, bool, bool)) -> bool,
{
    pairs
        .iter()
        .filter(|pair| present(pair))
        .map(|(path, _, _)| {
            let full = Path::new(root).join(path);
            let source = fs::read_to_string(&full)
                .with_context(|| format!("Failed to read {}", full.display()))?;
            Ok(SourceFile::new(path.clone(), source))
        })
        .collect()
}

/// Parse one side's sources in parallel, keyed by relative path.
fn parse_side(sources: &[SourceFile]) -> anyhow::Result<HashMap<String, StructureModel>> {
    let models = parse_files_parallel(sources, None);
    sources
        .iter()
        .zip(models)
        .map(|(source, model)| {
            let model =
                model.with_context(|| format!("Failed to build model for {}", source.path))?;
            Ok((source.path.clone(), model))
        })
        .collect()
}
