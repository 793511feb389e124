//! Filesystem primitives used by the file channels
//!
//! Thin async wrappers over `tokio::fs`. None of them retry or lock: an append
//! is a single write on a file opened in append mode, a JSON rewrite replaces
//! the whole file.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::Result;

/// Create a directory and all of its parents if they are missing
pub async fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    Ok(())
}

/// Check whether a file exists
pub async fn file_exists(path: &Path) -> Result<bool> {
    Ok(fs::try_exists(path).await?)
}

/// Create an empty file if it does not exist, leaving existing content alone
pub async fn touch(path: &Path) -> Result<()> {
    OpenOptions::new().create(true).append(true).open(path).await?;
    Ok(())
}

/// Append bytes to a file, creating it if needed
pub async fn append_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}

/// Read and parse a JSON document
pub async fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Serialize a document with 2-space indentation and replace the file with it
pub async fn write_json_file<T: Serialize + ?Sized>(path: &Path, document: &T) -> Result<usize> {
    let bytes = serde_json::to_vec_pretty(document)?;
    fs::write(path, &bytes).await?;
    Ok(bytes.len())
}
