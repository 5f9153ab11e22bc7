//! Resources: a location string plus a way to read the content behind it.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A readable document identified by its system id.
///
/// The system id is the base against which references found inside the
/// resource are resolved. Cloning is cheap; in-memory content is shared.
#[derive(Debug, Clone)]
pub struct Resource {
    system_id: String,
    content: Content,
}

#[derive(Debug, Clone)]
enum Content {
    File(PathBuf),
    Bytes(Arc<[u8]>),
}

impl Resource {
    /// A resource backed by a file. The system id is the path as given.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            system_id: path.to_string_lossy().into_owned(),
            content: Content::File(path),
        }
    }

    /// A resource backed by bytes held in memory.
    pub fn from_bytes(system_id: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            system_id: system_id.into(),
            content: Content::Bytes(bytes.into()),
        }
    }

    pub fn system_id(&self) -> &str {
        &self.system_id
    }

    /// Backing file, for file resources.
    pub fn path(&self) -> Option<&Path> {
        match &self.content {
            Content::File(path) => Some(path),
            Content::Bytes(_) => None,
        }
    }

    /// Open a fresh buffered stream over the content.
    pub fn open(&self) -> io::Result<Box<dyn BufRead>> {
        match &self.content {
            Content::File(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
            Content::Bytes(bytes) => Ok(Box::new(Cursor::new(Arc::clone(bytes)))),
        }
    }
}
