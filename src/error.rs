//! Stage errors.

use std::path::PathBuf;

use crate::util::minify::css::MinifyCssError;

/// Enumerates errors raised by [`Transform`](crate::Transform).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file contents are a stream instead of a buffer.
    #[error("In {path:?}: streaming contents are not supported")]
    UnsupportedStreamingContent {
        /// Path of the file.
        path: PathBuf,
    },

    /// The minifier rejected the file.
    #[error(transparent)]
    Minify(#[from] MinifyCssError),
}
