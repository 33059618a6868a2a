//! Report Output
//!
//! Writes the run report as one pretty-printed JSON snapshot. The target may be a
//! file path or a directory; directories get a timestamped file name.

use crate::error::Result;
use crate::probe::RunReport;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name used when the target is a directory
pub fn snapshot_file_name(now: DateTime<Local>) -> String {
    format!("uis_interfaces_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Resolves where the snapshot goes
///
/// An existing directory, or a path without an extension, is treated as a
/// directory and receives a timestamped file. Anything else is used as-is.
pub fn resolve_output_path(target: &Path, now: DateTime<Local>) -> PathBuf {
    if target.is_dir() || target.extension().is_none() {
        target.join(snapshot_file_name(now))
    } else {
        target.to_path_buf()
    }
}

/// Writes `report` below `target` and returns the file actually written
pub fn write_report(target: &Path, report: &RunReport) -> Result<PathBuf> {
    let path = resolve_output_path(target, Local::now());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json)?;
    info!("Report written to {}", path.display());

    Ok(path)
}
