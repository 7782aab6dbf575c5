//! JSON format exporter.

use crate::differ::StructureDiffResult;
use crate::types::ExportConfig;

/// Export a diff result to JSON.
pub fn export(
    result: &StructureDiffResult,
    config: &ExportConfig,
) -> Result<String, serde_json::Error> {
    if config.pretty_print {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
}
