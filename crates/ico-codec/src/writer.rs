//! ICO container encoding around externally produced PNG streams.
//!
//! PNG encoding itself is delegated to the caller; the writer only lays out
//! the directory and concatenates payloads.

use crate::cursor::{put_bytes, put_u16_le, put_u32_le, put_u8};
use crate::directory::{ICONDIRENTRY_SIZE, ICONDIR_SIZE, ICON_RESOURCE_TYPE};
use crate::error::IcoError;
use crate::reader::PNG_SIGNATURE;

/// The icon sizes the classic multi-size exporter emits.
pub const STANDARD_SIZES: [u32; 3] = [16, 32, 48];

/// One image to pack: an already-encoded PNG stream and the square dimension
/// the directory declares for it. The writer does not resample; the PNG is
/// expected to actually be `size` x `size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngEntry {
    pub size: u32,
    pub png: Vec<u8>,
}

/// Serialize an ICO container around `entries`, in order.
///
/// Sizes outside `1..=255` fail with [`IcoError::SizeOutOfRange`]: the
/// directory stores dimensions in one byte, and 256 in particular would
/// alias to the 0 sentinel (which the format defines as *meaning* 256) if it
/// were masked instead of rejected.
pub fn encode_ico(entries: &[PngEntry]) -> Result<Vec<u8>, IcoError> {
    if entries.is_empty() {
        return Err(IcoError::InvalidFormat {
            reason: "an icon must contain at least one image",
        });
    }
    let count =
        u16::try_from(entries.len()).map_err(|_| IcoError::TooManyEntries(entries.len()))?;
    for entry in entries {
        if !(1..=255).contains(&entry.size) {
            return Err(IcoError::SizeOutOfRange(entry.size));
        }
    }

    let payload_bytes: usize = entries.iter().map(|e| e.png.len()).sum();
    let mut offset = u64::from(ICONDIR_SIZE) + u64::from(ICONDIRENTRY_SIZE) * u64::from(count);
    let mut out = Vec::with_capacity(offset as usize + payload_bytes);

    put_u16_le(&mut out, 0)?; // reserved
    put_u16_le(&mut out, ICON_RESOURCE_TYPE)?;
    put_u16_le(&mut out, count)?;

    for entry in entries {
        let data_offset = u32::try_from(offset).map_err(|_| IcoError::OffsetOverflow(offset))?;
        let end = offset + entry.png.len() as u64;
        u32::try_from(end).map_err(|_| IcoError::OffsetOverflow(end))?;

        put_u8(&mut out, entry.size as u8)?;
        put_u8(&mut out, entry.size as u8)?;
        put_u8(&mut out, 0)?; // no palette
        put_u8(&mut out, 0)?; // reserved
        put_u16_le(&mut out, 1)?; // color planes
        put_u16_le(&mut out, 32)?; // bit depth
        put_u32_le(&mut out, entry.png.len() as u32)?;
        put_u32_le(&mut out, data_offset)?;
        offset = end;
    }

    for entry in entries {
        put_bytes(&mut out, &entry.png)?;
    }

    Ok(out)
}

/// Width and height from a PNG stream's IHDR chunk, if present.
///
/// The codec otherwise treats PNG bytes as opaque; this probe exists so
/// callers can derive the directory size from the payload itself. IHDR is
/// required to be the first chunk, so its two big-endian dimension fields sit
/// at a fixed offset past the signature.
pub fn png_dimensions(png: &[u8]) -> Option<(u32, u32)> {
    if png.len() < 24 || png[..8] != PNG_SIGNATURE || &png[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(png[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(png[20..24].try_into().ok()?);
    Some((width, height))
}
