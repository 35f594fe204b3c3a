use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

use crate::errors::ClientError;

/// A file sent to or received from the service.
///
/// The content is either held in memory or read from the filesystem on
/// demand. Content is raw bytes since inputs are usually binaries.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum File {
    Content { content: Vec<u8>, name: String },
    Filesystem { path: Utf8PathBuf, name: String },
}

impl File {
    /// File without a name holding `content`.
    pub fn from_content(content: impl Into<Vec<u8>>) -> Self {
        Self::from_content_with_name(content, "")
    }

    pub fn from_content_with_name(content: impl Into<Vec<u8>>, name: impl Into<String>) -> Self {
        Self::Content {
            content: content.into(),
            name: name.into(),
        }
    }

    /// File on disk, named after the last component of `path`.
    ///
    /// A path without a file name (e.g. ending with a separator) yields an
    /// empty name.
    pub fn from_filesystem(path: impl Into<Utf8PathBuf>) -> Self {
        let path = path.into();
        let name = file_name_from_path(&path);
        Self::Filesystem { path, name }
    }

    pub fn from_filesystem_with_other_name(
        path: impl Into<Utf8PathBuf>,
        name: impl Into<String>,
    ) -> Self {
        Self::Filesystem {
            path: path.into(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Content { name, .. } | Self::Filesystem { name, .. } => name,
        }
    }

    /// # Errors
    ///
    /// Returns `Err` when a filesystem file cannot be read.
    pub fn content(&self) -> Result<Vec<u8>, ClientError> {
        match self {
            Self::Content { content, .. } => Ok(content.clone()),
            Self::Filesystem { path, .. } => {
                fs::read(path).map_err(|e| ClientError::filesystem("read", path.clone(), e))
            }
        }
    }

    /// Content decoded as UTF-8; invalid sequences are replaced.
    ///
    /// # Errors
    ///
    /// Returns `Err` when a filesystem file cannot be read.
    pub fn content_as_string(&self) -> Result<String, ClientError> {
        let bytes = self.content()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Stores a copy of the file in `directory` under its own name.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the file cannot be read, written or copied.
    pub fn save_copy_to(&self, directory: impl AsRef<Utf8Path>) -> Result<Utf8PathBuf, ClientError> {
        self.save_copy_to_with_name(directory, self.name())
    }

    /// Stores a copy of the file in `directory` under `name`.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the file cannot be read, written or copied.
    pub fn save_copy_to_with_name(
        &self,
        directory: impl AsRef<Utf8Path>,
        name: &str,
    ) -> Result<Utf8PathBuf, ClientError> {
        let target = directory.as_ref().join(name);
        match self {
            Self::Content { content, .. } => fs::write(&target, content)
                .map_err(|e| ClientError::filesystem("write", target.clone(), e))?,
            Self::Filesystem { path, .. } => {
                fs::copy(path, &target)
                    .map_err(|e| ClientError::filesystem("copy", path.clone(), e))?;
            }
        }
        log::debug!("Saved {} to {target}", self.name());
        Ok(target)
    }
}

fn file_name_from_path(path: &Utf8Path) -> String {
    let ends_with_separator = path
        .as_str()
        .chars()
        .last()
        .is_some_and(std::path::is_separator);
    if ends_with_separator {
        return String::new();
    }
    path.file_name().unwrap_or_default().to_owned()
}
