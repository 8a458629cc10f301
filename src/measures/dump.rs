use crate::measures::error::MeasuresError;
use log::info;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// `<dir>/<STATION_ID>_measures.json`
pub fn dump_path(dir: &Path, station_id: &str) -> PathBuf {
    dir.join(format!("{}_measures.json", station_id.to_uppercase()))
}

/// Fails with [`MeasuresError::DumpExists`] when the dump file for `station_id`
/// is already there and `overwrite` is not set.
pub(crate) async fn ensure_dump_target(
    dir: &Path,
    station_id: &str,
    overwrite: bool,
) -> Result<PathBuf, MeasuresError> {
    let path = dump_path(dir, station_id);
    if !overwrite
        && fs::try_exists(&path)
            .await
            .map_err(|e| MeasuresError::DumpIo(path.clone(), e))?
    {
        return Err(MeasuresError::DumpExists(path));
    }
    Ok(path)
}

/// Writes the chunk response bodies for a station as a JSON array, one element
/// per chunk in chunk order. Bodies are written as served, unknown keys and
/// number formats included.
///
/// Refuses to replace an existing file unless `overwrite` is set. Creates `dir`
/// when missing.
pub async fn dump_measures_to_disk(
    payloads: &[Value],
    dir: &Path,
    station_id: &str,
    overwrite: bool,
) -> Result<PathBuf, MeasuresError> {
    let path = dump_path(dir, station_id);
    fs::create_dir_all(dir)
        .await
        .map_err(|e| MeasuresError::DumpIo(dir.to_path_buf(), e))?;
    let bytes =
        serde_json::to_vec(payloads).map_err(|e| MeasuresError::DumpEncode(path.clone(), e))?;

    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        // Existence check and creation in one step
        options.create_new(true);
    }
    let mut file = options.open(&path).await.map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => MeasuresError::DumpExists(path.clone()),
        _ => MeasuresError::DumpIo(path.clone(), e),
    })?;
    file.write_all(&bytes)
        .await
        .map_err(|e| MeasuresError::DumpIo(path.clone(), e))?;
    file.flush()
        .await
        .map_err(|e| MeasuresError::DumpIo(path.clone(), e))?;

    info!(
        "Wrote {} chunk(s), {} bytes of measures for station {} to {:?}",
        payloads.len(),
        bytes.len(),
        station_id,
        path
    );
    Ok(path)
}
