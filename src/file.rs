//! Pipeline files.

use std::{
    fmt,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::util::source_map::SourceMap;

/// Contents of a [`File`].
#[derive(Default)]
pub enum Contents {
    /// No contents (e.g. a directory or a file that was not read).
    #[default]
    Null,

    /// Contents fully loaded in memory.
    Buffer(Vec<u8>),

    /// Contents still being read.
    Stream(Box<dyn Read + Send>),
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Buffer(buffer) => f.debug_tuple("Buffer").field(&buffer.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Vec<u8>> for Contents {
    fn from(value: Vec<u8>) -> Self {
        Self::Buffer(value)
    }
}

impl From<&str> for Contents {
    fn from(value: &str) -> Self {
        Self::Buffer(value.as_bytes().to_vec())
    }
}

impl From<String> for Contents {
    fn from(value: String) -> Self {
        Self::Buffer(value.into_bytes())
    }
}

/// A file flowing through a pipeline.
#[derive(Debug, Default)]
pub struct File {
    /// Working directory.
    pub cwd: PathBuf,

    /// Base directory, used to compute [`File::relative`].
    pub base: PathBuf,

    /// Full path of the file.
    pub path: PathBuf,

    /// Contents of the file.
    pub contents: Contents,

    /// Source map of the contents, if any.
    pub source_map: Option<SourceMap>,
}

impl File {
    /// Create a file with no contents.
    ///
    /// `cwd` is the current directory and `base` is the parent directory of
    /// `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let cwd = std::env::current_dir().unwrap_or_else(|_| base.clone());

        Self {
            cwd,
            base,
            path,
            ..Default::default()
        }
    }

    /// Read a file from disk into a buffer.
    pub fn read(base: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read(&path).with_context(|| format!("reading {:?}", path))?;

        Ok(Self::new(path).with_base(base).with_contents(contents))
    }

    /// Set the base directory.
    pub fn with_base(self, base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            ..self
        }
    }

    /// Set the contents.
    pub fn with_contents(self, contents: impl Into<Contents>) -> Self {
        Self {
            contents: contents.into(),
            ..self
        }
    }

    /// Set the source map.
    pub fn with_source_map(self, source_map: impl Into<Option<SourceMap>>) -> Self {
        Self {
            source_map: source_map.into(),
            ..self
        }
    }

    /// Check if the file has no contents.
    pub fn is_null(&self) -> bool {
        matches!(self.contents, Contents::Null)
    }

    /// Check if the contents are loaded in memory.
    pub fn is_buffer(&self) -> bool {
        matches!(self.contents, Contents::Buffer(_))
    }

    /// Check if the contents are a stream.
    pub fn is_stream(&self) -> bool {
        matches!(self.contents, Contents::Stream(_))
    }

    /// Contents as text, if they are a buffer of valid UTF-8.
    pub fn contents_str(&self) -> Option<&str> {
        match &self.contents {
            Contents::Buffer(buffer) => std::str::from_utf8(buffer).ok(),
            _ => None,
        }
    }

    /// Path relative to [`File::base`].
    ///
    /// Returns the full path if it is not located inside `base`.
    pub fn relative(&self) -> &Path {
        self.path.strip_prefix(&self.base).unwrap_or(&self.path)
    }
}
