use std::io;

use thiserror::Error;

use crate::EntryType;

/// Errors that abort a run.
///
/// Every variant is fatal: traversal stops at the first one raised, except
/// for `UnexpectedEof` and `NameNotFound` which are only discovered once the
/// whole archive has been walked.
#[derive(Debug, Error)]
pub enum TarError {
    /// The header signature is not one of the accepted ustar patterns.
    #[error("This does not look like a tar archive")]
    NotATar,

    /// The header describes something other than a regular file.
    #[error("Unsupported header type: {0}")]
    UnsupportedType(EntryType),

    /// A numeric header field is negative or does not fit in 64 bits.
    #[error("invalid size field {0:?}")]
    InvalidSize(String),

    /// The stored header checksum does not match the header contents.
    #[error("archive header checksum mismatch: expected {expected}, computed {computed}")]
    ChecksumMismatch {
        /// Value stored in the header.
        expected: u64,
        /// Value computed from the header bytes.
        computed: u64,
    },

    /// The last entry declares more body bytes than the stream holds.
    #[error("Unexpected EOF in archive")]
    UnexpectedEof,

    /// Requested names that never matched an entry, in request order.
    #[error("{}: Not found in archive", .0.join(", "))]
    NameNotFound(Vec<String>),

    /// An underlying I/O operation failed.
    #[error("{desc}")]
    Io {
        /// What was being done when the error occurred.
        desc: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

impl TarError {
    pub(crate) fn io(desc: impl Into<String>, source: io::Error) -> TarError {
        TarError::Io {
            desc: desc.into(),
            source,
        }
    }
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, TarError>;
