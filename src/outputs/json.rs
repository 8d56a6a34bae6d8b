//! JSON persistence of the crawl result.
//!
//! The record list is written as a pretty-printed JSON array. Each write fully
//! replaces the previous file: the data goes to a sibling temp file which is
//! then renamed over the target, so a concurrent reader sees either the old
//! array or the new one, never a partial write.

use crate::models::Record;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "articles.json".into());
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Replace the file at `path` with `records` serialized as JSON.
///
/// An empty slice still produces a valid `[]` file.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = records.len()))]
pub async fn write_records(records: &[Record], path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(records)?;
    let tmp = temp_path_for(path);

    if let Err(e) = fs::write(&tmp, json).await {
        error!(tmp = %tmp.display(), error = %e, "Failed to write temp JSON file");
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp, path).await {
        error!(tmp = %tmp.display(), error = %e, "Failed to move JSON into place");
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    info!("Wrote articles JSON");
    Ok(())
}
