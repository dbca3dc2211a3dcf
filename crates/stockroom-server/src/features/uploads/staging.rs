//! Temporary on-disk copies of uploaded files
//!
//! The multipart body is streamed into a [`NamedTempFile`] under the
//! configured upload directory. The file is removed when the
//! [`StagedUpload`] is closed or dropped, so an aborted request never leaves
//! it behind.

use axum::extract::multipart::{Field, MultipartError};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

const STAGED_FILE_PREFIX: &str = "upload-";
const STAGED_FILE_SUFFIX: &str = ".part";

#[derive(Debug, Error)]
pub enum StageError {
    #[error("Failed to read multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Failed to write staged upload: {0}")]
    Io(#[from] io::Error),
}

/// An uploaded file waiting to be ingested
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    content_type: Option<String>,
    file_name: Option<String>,
    size: u64,
}

impl StagedUpload {
    /// Wrap a file that is already on disk
    pub fn new(file: NamedTempFile, content_type: Option<String>) -> Self {
        let size = file.as_file().metadata().map(|m| m.len()).unwrap_or(0);
        Self {
            file,
            content_type,
            file_name: None,
            size,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// MIME type declared by the client
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Delete the file now, reporting failure instead of ignoring it
    pub fn close(self) -> io::Result<()> {
        self.file.close()
    }
}

/// Writes incoming multipart fields into the upload directory
#[derive(Debug, Clone)]
pub struct UploadStager {
    dir: PathBuf,
}

impl UploadStager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stream `field` to a fresh temp file
    ///
    /// On any error the partial file is dropped and therefore deleted.
    pub async fn stage(&self, mut field: Field<'_>) -> Result<StagedUpload, StageError> {
        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);

        tokio::fs::create_dir_all(&self.dir).await?;
        let file = tempfile::Builder::new()
            .prefix(STAGED_FILE_PREFIX)
            .suffix(STAGED_FILE_SUFFIX)
            .tempfile_in(&self.dir)?;

        let mut out = tokio::fs::File::from_std(file.as_file().try_clone()?);
        let mut size: u64 = 0;
        while let Some(chunk) = field.chunk().await? {
            out.write_all(&chunk).await?;
            size += chunk.len() as u64;
        }
        out.flush().await?;

        tracing::debug!(
            path = %file.path().display(),
            size,
            content_type = ?content_type,
            "Upload staged"
        );

        Ok(StagedUpload {
            file,
            content_type,
            file_name,
            size,
        })
    }
}
