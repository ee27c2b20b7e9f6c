use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::types::Season;

/// Read a season document as raw JSON, without any structural checks.
pub fn load_season_value(path: &Path) -> Result<Value> {
    load_json(path)
}

/// Read and decode a season document.
pub fn load_season(path: &Path) -> Result<Season> {
    let value = load_season_value(path)?;
    Season::from_value(value)
        .with_context(|| format!("Invalid season document at {}", path.display()))
}

/// Read any JSON document (season, penalty table, manual positions).
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

/// Write a value as pretty JSON, atomically.
///
/// The target is either fully replaced or left untouched.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;

    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;

    Ok(())
}
