//! Font subsystem errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading catalogs or loading metrics.
///
/// None of these escape the registry: a failed catalog contributes no
/// specifications and a failed metrics load leaves the font answering zero.
#[derive(Debug, Error)]
pub enum FontError {
    /// A catalog or font file could not be read.
    #[error("unable to read '{path}': {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A catalog file is not well-formed XML.
    #[error("malformed font catalog '{path}': {source}")]
    Catalog {
        /// The catalog file.
        path: PathBuf,
        /// The XML error.
        #[source]
        source: roxmltree::Error,
    },

    /// A font file was read but its tables could not be parsed.
    #[error("unable to parse font '{path}': {reason}")]
    Face {
        /// The font file.
        path: PathBuf,
        /// Parser diagnostic.
        reason: String,
    },

    /// The provider has no metrics for this source.
    #[error("no metrics available for '{0}'")]
    Unavailable(PathBuf),
}
