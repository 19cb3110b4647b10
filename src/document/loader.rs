//! The seam through which documents read their source text.

use std::{
    collections::HashMap,
    fmt::Debug,
    io,
    path::{Path, PathBuf},
};

use crate::document::normalize;

/// The interface to an object that can read Huff source files.
pub trait SourceLoader
where
    Self: Debug,
{
    /// Reads the full text of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if the file cannot be read.
    fn load(&self, path: &Path) -> io::Result<String>;
}

/// Reads source files from the filesystem.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Serves source files from memory, mostly for testing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    /// Creates a loader that serves no files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given `text` at `path`.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, text: impl Into<String>) -> Self {
        self.files.insert(normalize(path.as_ref()), text.into());
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        self.files.get(&normalize(path)).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no file at {}", path.display()),
            )
        })
    }
}
