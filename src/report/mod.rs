pub mod json;
pub mod tables;
pub mod text;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::PipelineResult;

pub const TOOL_NAME: &str = "kira-immunodep";

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn write_text(path: &Path, content: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(content.as_bytes())?;
    w.flush()
}

pub fn write_records<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[T],
) -> PipelineResult<()> {
    let mut w = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        w.write_record(header)?;
    }
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_rows(path: &Path, header: &[String], rows: &[Vec<String>]) -> PipelineResult<()> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record(header)?;
    for row in rows {
        w.write_record(row)?;
    }
    w.flush()?;
    Ok(())
}

pub fn remove_stale(dir: &Path, prefix: &str, suffix: &str) -> std::io::Result<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }
    let mut removed = 0usize;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let stale = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(prefix) && n.ends_with(suffix));
        if stale && path.is_file() {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    if removed > 0 {
        debug!(
            "removed {} stale {}*{} files from {}",
            removed,
            prefix,
            suffix,
            dir.display()
        );
    }
    Ok(removed)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
