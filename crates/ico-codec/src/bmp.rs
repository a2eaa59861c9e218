//! Uncompressed 32-bit BITMAPINFOHEADER payloads.
//!
//! Icon bitmaps store their height doubled (the 1-bit AND mask rows are
//! counted alongside the XOR pixel rows) and their pixel rows bottom-up in
//! BGRA order. The decoder undoes both: [`BmpImage`] is top-down RGBA.

use std::io::Read;

use crate::cursor::{read_bytes, read_u16_le, read_u32_le};
use crate::error::IcoError;

/// Fixed byte length of BITMAPINFOHEADER.
pub const BITMAPINFOHEADER_SIZE: u32 = 40;

/// The BI_RGB (uncompressed) compression code, the only one supported.
pub const BI_RGB: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapInfoHeader {
    pub header_size: u32,
    pub width: u32,
    /// Stored height: twice the image height, because the AND mask rows are
    /// counted too. See [`BitmapInfoHeader::height`].
    pub raw_height: u32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pels_per_meter: u32,
    pub y_pels_per_meter: u32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl BitmapInfoHeader {
    /// Logical image height.
    pub fn height(&self) -> u32 {
        self.raw_height / 2
    }

    /// Read all eleven fields in order. The five informational fields are
    /// consumed even though they are unused, so the stream position stays
    /// aligned with the pixel block that follows.
    pub fn read(r: &mut impl Read) -> Result<Self, IcoError> {
        Ok(Self {
            header_size: read_u32_le(r, "bitmap header size")?,
            width: read_u32_le(r, "bitmap width")?,
            raw_height: read_u32_le(r, "bitmap height")?,
            planes: read_u16_le(r, "bitmap planes")?,
            bits_per_pixel: read_u16_le(r, "bitmap bit count")?,
            compression: read_u32_le(r, "bitmap compression")?,
            image_size: read_u32_le(r, "bitmap image size")?,
            x_pels_per_meter: read_u32_le(r, "bitmap X resolution")?,
            y_pels_per_meter: read_u32_le(r, "bitmap Y resolution")?,
            colors_used: read_u32_le(r, "bitmap colors used")?,
            colors_important: read_u32_le(r, "bitmap colors important")?,
        })
    }
}

/// A decoded icon bitmap: row-major, top-down RGBA, four bytes per pixel,
/// alpha preserved as stored (not premultiplied).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl BmpImage {
    /// Build an image from a top-down RGBA buffer of `width * height * 4`
    /// bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        debug_assert_eq!(rgba.len() as u64, u64::from(width) * u64::from(height) * 4);
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Flat RGBA bytes, row 0 first (visual top).
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// The pixel at (x, y), with y = 0 at the visual top.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ]
    }
}

/// Decode an uncompressed 32-bit bitmap payload of `payload_len` total bytes
/// (header included).
///
/// Fails with [`IcoError::UnsupportedEncoding`] for any compression other
/// than [`BI_RGB`] or any bit depth other than 32, carrying both values for
/// diagnostics.
pub fn decode_bitmap(r: &mut impl Read, payload_len: u32) -> Result<BmpImage, IcoError> {
    let header = BitmapInfoHeader::read(r)?;
    if header.compression != BI_RGB || header.bits_per_pixel != 32 {
        return Err(IcoError::UnsupportedEncoding {
            compression: header.compression,
            bits_per_pixel: header.bits_per_pixel,
        });
    }

    let width = header.width;
    let height = header.height();
    let pixel_bytes = u64::from(width) * u64::from(height) * 4;
    // Checking the declared payload length up front keeps the allocation
    // bounded by the file size.
    if u64::from(BITMAPINFOHEADER_SIZE) + pixel_bytes > u64::from(payload_len) {
        return Err(IcoError::UnexpectedEof {
            context: "bitmap pixel data",
        });
    }

    let row_bytes = width as usize * 4;
    let mut rgba = vec![0u8; pixel_bytes as usize];
    for src_row in 0..height as usize {
        let row = read_bytes(r, row_bytes, "bitmap pixel row")?;
        // Source rows are bottom-up; the first stored row is the visual
        // bottom.
        let dst_row = height as usize - 1 - src_row;
        let dst = &mut rgba[dst_row * row_bytes..(dst_row + 1) * row_bytes];
        for (src_px, dst_px) in row.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
            // BGRA -> RGBA
            dst_px[0] = src_px[2];
            dst_px[1] = src_px[1];
            dst_px[2] = src_px[0];
            dst_px[3] = src_px[3];
        }
    }

    Ok(BmpImage {
        width,
        height,
        rgba,
    })
}

/// Serialize a decoded image as a standalone `.bmp` file: BITMAPFILEHEADER,
/// BITMAPINFOHEADER, then bottom-up BGRA rows.
///
/// Unlike the in-icon form, a standalone bitmap stores its true height (there
/// is no AND mask).
pub fn encode_bmp_file(image: &BmpImage) -> Vec<u8> {
    const FILE_HEADER_SIZE: u32 = 14;
    let pixel_bytes = image.rgba.len() as u32;
    let pixel_offset = FILE_HEADER_SIZE + BITMAPINFOHEADER_SIZE;

    let mut out = Vec::with_capacity((pixel_offset + pixel_bytes) as usize);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(pixel_offset + pixel_bytes).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&pixel_offset.to_le_bytes());

    out.extend_from_slice(&BITMAPINFOHEADER_SIZE.to_le_bytes());
    out.extend_from_slice(&image.width.to_le_bytes());
    out.extend_from_slice(&image.height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&32u16.to_le_bytes());
    out.extend_from_slice(&BI_RGB.to_le_bytes());
    out.extend_from_slice(&pixel_bytes.to_le_bytes());
    // Resolutions and palette counts, all zero.
    out.extend_from_slice(&[0u8; 16]);

    for y in (0..image.height as usize).rev() {
        let row_bytes = image.width as usize * 4;
        let row = &image.rgba[y * row_bytes..(y + 1) * row_bytes];
        for px in row.chunks_exact(4) {
            out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
        }
    }
    out
}
