//! Writing the IR to the output directory.

use apigen_ir::Ir;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::common::ensure_dir;

pub const IR_FILENAME: &str = "ir.json";

/// Serialize `ir` to `<output_dir>/ir.json`, creating the directory if needed.
pub fn write_ir(ir: &Ir, output_dir: &Path, pretty: bool) -> Result<PathBuf, String> {
    ensure_dir(output_dir)?;

    let mut json = if pretty {
        serde_json::to_string_pretty(ir)
    } else {
        serde_json::to_string(ir)
    }
    .map_err(|err| format!("Failed to serialize IR: {err}"))?;
    json.push('\n');

    let path = output_dir.join(IR_FILENAME);
    fs::write(&path, json)
        .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
    debug!(path = %path.display(), pretty, "IR written.");
    Ok(path)
}
