//! Read JSON configuration.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

/// Read and deserialize a JSON file.
pub(crate) fn read_file<T, P>(path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    read_str(content).with_context(|| format!("parsing {:?}", path))
}

/// Deserialize a JSON string.
pub(crate) fn read_str<T, S>(content: S) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    S: AsRef<str>,
{
    Ok(serde_json::from_str(content.as_ref())?)
}
