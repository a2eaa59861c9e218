//! ICO container reading: payload sniffing, per-entry decode, and the
//! whole-file scan driver.

use std::io::{Read, Seek};

use crate::bmp::{decode_bitmap, BmpImage};
use crate::cursor::{read_bytes, seek_to, stream_len};
use crate::directory::{parse_entries, parse_icon_directory, IconDirectory, IconEntry};
use crate::error::{EntryFailure, IcoError};

/// The 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// How many leading payload bytes are scanned for [`PNG_SIGNATURE`].
///
/// Fixed at 32 for compatibility with existing icons; in practice the
/// signature sits at offset 0.
pub const PNG_SCAN_WINDOW: usize = 32;

/// One entry's decoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    /// The entry embeds a PNG stream; the bytes pass through verbatim.
    Png(Vec<u8>),
    /// The entry holds an uncompressed 32-bit bitmap, decoded to RGBA.
    Bmp(BmpImage),
}

/// A successfully decoded entry, tagged with its directory position so
/// downstream consumers can name outputs by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub index: usize,
    pub entry: IconEntry,
    pub payload: ImagePayload,
}

/// A fully scanned icon file.
#[derive(Debug)]
pub struct IcoFile {
    pub directory: IconDirectory,
    /// All directory records, in file order, including ones that failed to
    /// decode.
    pub entries: Vec<IconEntry>,
    pub images: Vec<DecodedImage>,
    /// Entries with unsupported payload encodings; the scan continues past
    /// them.
    pub skipped: Vec<EntryFailure>,
}

fn find_png_signature(window: &[u8]) -> Option<usize> {
    window
        .windows(PNG_SIGNATURE.len())
        .position(|w| w == PNG_SIGNATURE)
}

/// Decode a single entry's payload.
///
/// Seeks to the entry's data offset and sniffs the leading bytes: a PNG
/// signature anywhere in the first [`PNG_SCAN_WINDOW`] bytes selects the PNG
/// path (bytes before the signature are dropped from the payload), otherwise
/// the payload is decoded as an uncompressed 32-bit bitmap.
pub fn decode_entry<R: Read + Seek>(
    r: &mut R,
    entry: &IconEntry,
) -> Result<ImagePayload, IcoError> {
    seek_to(r, u64::from(entry.data_offset))?;
    let window_len = PNG_SCAN_WINDOW.min(entry.byte_size as usize);
    let window = read_bytes(r, window_len, "icon payload")?;

    match find_png_signature(&window) {
        Some(sig_offset) => {
            seek_to(r, u64::from(entry.data_offset) + sig_offset as u64)?;
            let len = entry.byte_size as usize - sig_offset;
            Ok(ImagePayload::Png(read_bytes(r, len, "PNG payload")?))
        }
        None => {
            seek_to(r, u64::from(entry.data_offset))?;
            Ok(ImagePayload::Bmp(decode_bitmap(r, entry.byte_size)?))
        }
    }
}

impl IcoFile {
    /// Parse the directory and attempt to decode every entry.
    ///
    /// Per-entry [`IcoError::UnsupportedEncoding`] failures are recorded in
    /// `skipped` and do not abort the scan; malformed directories and
    /// truncated streams do. If no entry decodes at all, the read fails with
    /// [`IcoError::NoDecodableEntries`].
    pub fn read<R: Read + Seek>(r: &mut R) -> Result<Self, IcoError> {
        let len = stream_len(r)?;
        seek_to(r, 0)?;
        let directory = parse_icon_directory(r)?;
        let entries = parse_entries(r, directory.entry_count)?;

        let mut images = Vec::new();
        let mut skipped = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            // Payloads must lie inside the file.
            if u64::from(entry.data_offset) + u64::from(entry.byte_size) > len {
                return Err(IcoError::UnexpectedEof {
                    context: "icon payload",
                });
            }
            match decode_entry(r, entry) {
                Ok(payload) => images.push(DecodedImage {
                    index,
                    entry: *entry,
                    payload,
                }),
                Err(error @ IcoError::UnsupportedEncoding { .. }) => skipped.push(EntryFailure {
                    index,
                    entry: *entry,
                    error,
                }),
                Err(other) => return Err(other),
            }
        }

        if images.is_empty() {
            return Err(IcoError::NoDecodableEntries { failures: skipped });
        }

        Ok(Self {
            directory,
            entries,
            images,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::directory::{ICONDIRENTRY_SIZE, ICONDIR_SIZE};

    fn entry_at(data_offset: u32, byte_size: u32) -> IconEntry {
        IconEntry {
            width: 16,
            height: 16,
            color_count: 0,
            reserved: 0,
            color_planes: 1,
            bits_per_pixel: 32,
            byte_size,
            data_offset,
        }
    }

    /// Hand-build a one-entry container around `payload`.
    fn single_entry_ico(payload: &[u8]) -> Vec<u8> {
        let offset = ICONDIR_SIZE + ICONDIRENTRY_SIZE;
        let mut bytes = vec![0, 0, 1, 0, 1, 0];
        bytes.extend_from_slice(&[16, 16, 0, 0, 1, 0, 32, 0]);
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&offset.to_le_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn signature_at_offset_zero_returns_whole_payload() {
        let mut payload = PNG_SIGNATURE.to_vec();
        payload.extend_from_slice(b"rest of the png stream");
        let bytes = single_entry_ico(&payload);

        let entry = entry_at(22, payload.len() as u32);
        let decoded = decode_entry(&mut Cursor::new(&bytes), &entry).unwrap();
        assert_eq!(decoded, ImagePayload::Png(payload));
    }

    #[test]
    fn leading_bytes_before_the_signature_are_dropped() {
        let mut payload = vec![0xDE, 0xAD, 0xBE];
        payload.extend_from_slice(&PNG_SIGNATURE);
        payload.extend_from_slice(b"chunk data");
        let bytes = single_entry_ico(&payload);

        let entry = entry_at(22, payload.len() as u32);
        let decoded = decode_entry(&mut Cursor::new(&bytes), &entry).unwrap();
        match decoded {
            ImagePayload::Png(png) => {
                assert_eq!(png.len(), payload.len() - 3);
                assert_eq!(&png[..8], &PNG_SIGNATURE);
            }
            other => panic!("expected PNG payload, got {other:?}"),
        }
    }

    #[test]
    fn payload_shorter_than_the_scan_window_still_sniffs() {
        // A 9-byte PNG payload: the window must shrink to byte_size.
        let mut payload = PNG_SIGNATURE.to_vec();
        payload.push(0);
        let bytes = single_entry_ico(&payload);

        let entry = entry_at(22, payload.len() as u32);
        let decoded = decode_entry(&mut Cursor::new(&bytes), &entry).unwrap();
        assert_eq!(decoded, ImagePayload::Png(payload));
    }

    #[test]
    fn signature_search_covers_the_whole_window() {
        let mut window = vec![0u8; 24];
        window.extend_from_slice(&PNG_SIGNATURE);
        assert_eq!(find_png_signature(&window), Some(24));
        assert_eq!(find_png_signature(&[0u8; 32]), None);
    }
}
