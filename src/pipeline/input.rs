//! Input sources for a pipeline run

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{AggregationError, Result};

/// Where measurement lines come from
pub enum InputSource {
    /// A file on disk, opened when the run starts
    Path(PathBuf),
    /// Any byte stream, e.g. stdin or an in-memory buffer
    Reader {
        name: String,
        reader: Box<dyn Read + Send>,
    },
}

impl InputSource {
    pub fn path(path: impl AsRef<Path>) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    pub fn reader(name: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        Self::Reader {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    /// Human-readable name used in logs and errors
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Reader { name, .. } => name.clone(),
        }
    }

    /// Open the source behind a buffered reader of `buffer_size` bytes
    pub(crate) fn open(self, buffer_size: usize) -> Result<BufReader<Box<dyn Read + Send>>> {
        let reader: Box<dyn Read + Send> = match self {
            Self::Path(path) => {
                let file = File::open(&path).map_err(|source| AggregationError::InputUnavailable {
                    source_name: path.display().to_string(),
                    source,
                })?;
                Box::new(file)
            }
            Self::Reader { reader, .. } => reader,
        };

        Ok(BufReader::with_capacity(buffer_size, reader))
    }
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Reader { name, .. } => f.debug_struct("Reader").field("name", name).finish_non_exhaustive(),
        }
    }
}
