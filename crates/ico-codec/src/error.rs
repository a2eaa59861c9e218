use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::directory::IconEntry;

/// Errors produced by the ICO reader and writer.
///
/// Entry-level failures (`UnsupportedEncoding`) are recoverable: the scan
/// records them and moves on to the next entry. Directory-level failures
/// (`InvalidFormat`, `UnexpectedEof`) abort the whole parse.
#[derive(Debug, Error)]
pub enum IcoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to open icon `{path}`: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write icon `{path}`: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not a valid ICO file: {reason}")]
    InvalidFormat { reason: &'static str },

    #[error("unexpected end of data while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error(
        "unsupported icon encoding: compression={compression:#010X}, bit depth={bits_per_pixel} \
         (only uncompressed 32-bit bitmaps and PNG payloads are supported)"
    )]
    UnsupportedEncoding { compression: u32, bits_per_pixel: u16 },

    #[error("none of the {} icon entries could be decoded", .failures.len())]
    NoDecodableEntries { failures: Vec<EntryFailure> },

    #[error("icon size {0} does not fit the one-byte directory field (valid sizes are 1-255)")]
    SizeOutOfRange(u32),

    #[error("cannot encode {0} entries into the 16-bit directory count field")]
    TooManyEntries(usize),

    #[error("icon payload offset {0} exceeds the 32-bit directory field")]
    OffsetOverflow(u64),
}

/// One entry that failed to decode, kept so callers can report which entries
/// were skipped and why rather than a single generic failure.
#[derive(Debug)]
pub struct EntryFailure {
    /// Zero-based position of the entry in the icon directory.
    pub index: usize,
    /// The directory record that introduced the payload.
    pub entry: IconEntry,
    /// Why the payload could not be decoded.
    pub error: IcoError,
}
