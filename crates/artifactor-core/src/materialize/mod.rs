//! Materialization of downloaded artifacts into the deployment volume
//!
//! - [`extract_zip`] unpacks (a subtree of) a release zip with a
//!   path-traversal guard.
//! - [`copy_assets`] copies auxiliary assets from a mounted directory.

mod copy;
mod unzip;

pub use copy::copy_assets;
pub use unzip::extract_zip;

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while writing artifacts to disk
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// Archive could not be read
    #[error("unzip assets error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Archive entry would land outside the destination directory
    #[error("{path}: illegal file path")]
    IllegalPath { path: String },

    /// Filesystem operation failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walking the asset source directory failed
    #[error("error walk dir {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl MaterializeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
