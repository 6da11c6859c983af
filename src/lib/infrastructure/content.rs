//! Message body files

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// A body file could not be read
#[derive(Debug, Error)]
#[error("Error reading file `{}`", path.display())]
pub struct ContentError {
    /// Path of the file
    pub path: PathBuf,

    /// The underlying I/O error
    #[source]
    pub source: io::Error,
}

/// The plain text and HTML bodies of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBodies {
    /// Plain text body
    pub text: String,

    /// HTML body
    pub html: String,
}

impl MessageBodies {
    /// Reads both body files, plain text first.
    pub async fn read(text_path: &Path, html_path: &Path) -> Result<Self, ContentError> {
        Ok(Self {
            text: read_file(text_path).await?,
            html: read_file(html_path).await?,
        })
    }
}

async fn read_file(path: &Path) -> Result<String, ContentError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ContentError {
            path: path.to_path_buf(),
            source,
        })
}
