//! ICONDIR header and ICONDIRENTRY records.

use std::io::Read;

use crate::cursor::{read_u16_le, read_u32_le, read_u8};
use crate::error::IcoError;

/// Byte length of the fixed ICONDIR header.
pub const ICONDIR_SIZE: u32 = 6;

/// Byte length of one ICONDIRENTRY record.
pub const ICONDIRENTRY_SIZE: u32 = 16;

/// `imageType` value for icons. Cursors use 2 and are rejected.
pub const ICON_RESOURCE_TYPE: u16 = 1;

/// The 6-byte header of an ICO file. Parsed once per read, immutable after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconDirectory {
    pub reserved: u16,
    pub resource_type: u16,
    pub entry_count: u16,
}

/// One directory record.
///
/// `width` and `height` hold the *logical* dimensions: the stored byte value
/// 0 means 256, and that remap is applied as the entry is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconEntry {
    pub width: u32,
    pub height: u32,
    pub color_count: u8,
    pub reserved: u8,
    pub color_planes: u16,
    /// Declared bit depth. This may disagree with the payload's own header;
    /// decode decisions come from the payload header, never this field.
    pub bits_per_pixel: u16,
    /// Length in bytes of this entry's image payload.
    pub byte_size: u32,
    /// Absolute file offset where the payload begins.
    pub data_offset: u32,
}

fn logical_dimension(stored: u8) -> u32 {
    if stored == 0 {
        256
    } else {
        u32::from(stored)
    }
}

/// Parse the ICONDIR header.
///
/// Fails with [`IcoError::InvalidFormat`] unless the reserved field is zero,
/// the type is 1 (icon), and at least one entry is present.
pub fn parse_icon_directory(r: &mut impl Read) -> Result<IconDirectory, IcoError> {
    let reserved = read_u16_le(r, "ICONDIR reserved field")?;
    let resource_type = read_u16_le(r, "ICONDIR type field")?;
    let entry_count = read_u16_le(r, "ICONDIR entry count")?;

    if reserved != 0 {
        return Err(IcoError::InvalidFormat {
            reason: "reserved field is not zero",
        });
    }
    if resource_type != ICON_RESOURCE_TYPE {
        return Err(IcoError::InvalidFormat {
            reason: "type field is not 1 (icon)",
        });
    }
    if entry_count == 0 {
        return Err(IcoError::InvalidFormat {
            reason: "entry count is zero",
        });
    }

    Ok(IconDirectory {
        reserved,
        resource_type,
        entry_count,
    })
}

fn parse_entry(r: &mut impl Read) -> Result<IconEntry, IcoError> {
    let width = logical_dimension(read_u8(r, "entry width")?);
    let height = logical_dimension(read_u8(r, "entry height")?);
    let color_count = read_u8(r, "entry color count")?;
    let reserved = read_u8(r, "entry reserved field")?;
    let color_planes = read_u16_le(r, "entry color planes")?;
    let bits_per_pixel = read_u16_le(r, "entry bit count")?;
    let byte_size = read_u32_le(r, "entry payload size")?;
    let data_offset = read_u32_le(r, "entry payload offset")?;

    Ok(IconEntry {
        width,
        height,
        color_count,
        reserved,
        color_planes,
        bits_per_pixel,
        byte_size,
        data_offset,
    })
}

/// Parse `count` 16-byte records immediately following the ICONDIR header,
/// in file order.
pub fn parse_entries(r: &mut impl Read, count: u16) -> Result<Vec<IconEntry>, IcoError> {
    let mut entries = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        entries.push(parse_entry(r)?);
    }
    Ok(entries)
}
