//! Windows icon (`.ico`) container codec.
//!
//! An ICO file is a small catalog: a 6-byte ICONDIR header, `N` 16-byte
//! directory records, and `N` image payloads. Each payload is either an
//! embedded PNG stream (detected by signature sniffing, never by trusting
//! declared fields) or an uncompressed 32-bit BITMAPINFOHEADER bitmap.
//!
//! - Reading: [`IcoFile::read`] / [`open_icon`] parse the directory and
//!   attempt every entry, skipping entries with unsupported encodings and
//!   reporting them per entry.
//! - Writing: [`encode_ico`] / [`save_icon`] pack externally produced PNG
//!   streams into a valid single- or multi-image container.
//!
//! PNG encoding and decoding are out of scope: PNG payloads cross the API as
//! opaque byte buffers, plus the [`png_dimensions`] IHDR probe for callers
//! that want to derive directory sizes from the payload itself.

pub mod bmp;
pub mod cursor;
pub mod directory;
mod error;
pub mod reader;
pub mod writer;

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

pub use bmp::{decode_bitmap, encode_bmp_file, BitmapInfoHeader, BmpImage, BI_RGB};
pub use directory::{
    parse_entries, parse_icon_directory, IconDirectory, IconEntry, ICONDIRENTRY_SIZE, ICONDIR_SIZE,
    ICON_RESOURCE_TYPE,
};
pub use error::{EntryFailure, IcoError};
pub use reader::{decode_entry, DecodedImage, IcoFile, ImagePayload, PNG_SCAN_WINDOW, PNG_SIGNATURE};
pub use writer::{encode_ico, png_dimensions, PngEntry, STANDARD_SIZES};

/// Open and fully scan an icon file from disk.
pub fn open_icon(path: impl AsRef<Path>) -> Result<IcoFile, IcoError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IcoError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    IcoFile::read(&mut BufReader::new(file))
}

/// Encode `entries` and write the container to `path`.
pub fn save_icon(path: impl AsRef<Path>, entries: &[PngEntry]) -> Result<(), IcoError> {
    let path = path.as_ref();
    let bytes = encode_ico(entries)?;
    let mut file = File::create(path).map_err(|source| IcoError::Save {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(&bytes).map_err(|source| IcoError::Save {
        path: path.to_path_buf(),
        source,
    })
}
