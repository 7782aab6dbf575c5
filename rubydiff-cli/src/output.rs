//! Output formatting for the rubydiff CLI.
//!
//! Table output is a colored declaration tree for terminals; json and
//! text delegate to the core exporters.

use clap::ValueEnum;
use colored::Colorize;

use rubydiff_core::exporter;
use rubydiff_core::types::ExportConfig;
use rubydiff_core::{ChangeKind, ChangeSet, StructureDiffResult};

use crate::diff::FileDiff;

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored declaration tree (default)
    #[default]
    Table,
    /// JSON for machine consumption
    Json,
    /// Plain-text report
    Text,
}

/// Render a single file pair's result.
pub fn render_single(
    result: &StructureDiffResult,
    format: OutputFormat,
    config: &ExportConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => Ok(to_table(result, config)),
        OutputFormat::Json => Ok(exporter::json::export(result, config)?),
        OutputFormat::Text => Ok(exporter::text::export(result, config)),
    }
}

/// Render a directory comparison.
pub fn render_files(
    diffs: &[FileDiff],
    format: OutputFormat,
    config: &ExportConfig,
) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(diffs)?);
    }

    let mut sections = Vec::new();
    for diff in diffs {
        if !diff.result.has_changes() && !config.include_unchanged {
            continue;
        }
        let body = match format {
            OutputFormat::Table => to_table(&diff.result, config),
            _ => exporter::text::export(&diff.result, config),
        };
        sections.push(format!("{}\n{}", diff.path.cyan().bold(), body));
    }

    if sections.is_empty() {
        return Ok(no_changes_line(format));
    }
    Ok(sections.join("\n\n"))
}

fn no_changes_line(format: OutputFormat) -> String {
    let line = "No structural changes.";
    match format {
        OutputFormat::Table => line.dimmed().to_string(),
        _ => line.to_string(),
    }
}

/// Colored tree rendering of one result.
fn to_table(result: &StructureDiffResult, config: &ExportConfig) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {} ({:.1}ms)\n",
        "DIFF:".cyan().bold(),
        result.summary.text(),
        result.duration_ms
    ));

    let mut lines = Vec::new();
    render_set(&result.changes, 0, config, &mut lines);
    if lines.is_empty() {
        output.push_str(&format!("  {}\n", "No structural changes.".dimmed()));
    } else {
        output.push_str(&lines.join("\n"));
        output.push('\n');
    }

    output
}

fn render_set(set: &ChangeSet, depth: usize, config: &ExportConfig, lines: &mut Vec<String>) {
    for change in set.iter() {
        if change.change_type == ChangeKind::Unchanged && !config.include_unchanged {
            continue;
        }

        let indent = "  ".repeat(depth + 1);
        let line = match change.change_type {
            ChangeKind::Added => format!("+ {}", change.signature).green().to_string(),
            ChangeKind::Removed => format!("- {}", change.signature).red().to_string(),
            ChangeKind::Modified => format!("~ {}", change.signature).yellow().to_string(),
            ChangeKind::Unchanged => format!("= {}", change.signature).dimmed().to_string(),
        };
        lines.push(format!("{}{}", indent, line));

        render_set(&change.children, depth + 1, config, lines);
    }
}
