//! Little-endian binary primitives over `std::io` sources and sinks.
//!
//! Everything in an ICO file is a sequence of fixed-width little-endian
//! fields, so the directory, bitmap header, and payload code are all built on
//! these leaf helpers. Each read takes a `context` string naming the field so
//! a short stream reports *what* was being read when the data ran out.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::error::IcoError;

fn map_read_err(e: io::Error, context: &'static str) -> IcoError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        IcoError::UnexpectedEof { context }
    } else {
        IcoError::Io(e)
    }
}

/// Read one byte.
pub fn read_u8(r: &mut impl Read, context: &'static str) -> Result<u8, IcoError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf).map_err(|e| map_read_err(e, context))?;
    Ok(buf[0])
}

/// Read a `u16` stored little-endian.
pub fn read_u16_le(r: &mut impl Read, context: &'static str) -> Result<u16, IcoError> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf).map_err(|e| map_read_err(e, context))?;
    Ok(u16::from_le_bytes(buf))
}

/// Read a `u32` stored little-endian.
pub fn read_u32_le(r: &mut impl Read, context: &'static str) -> Result<u32, IcoError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf).map_err(|e| map_read_err(e, context))?;
    Ok(u32::from_le_bytes(buf))
}

/// Read exactly `n` bytes.
pub fn read_bytes(r: &mut impl Read, n: usize, context: &'static str) -> Result<Vec<u8>, IcoError> {
    let mut buf = vec![0u8; n];
    r.read_exact(&mut buf).map_err(|e| map_read_err(e, context))?;
    Ok(buf)
}

/// Reposition the source at an absolute byte offset.
pub fn seek_to(r: &mut impl Seek, offset: u64) -> Result<(), IcoError> {
    r.seek(SeekFrom::Start(offset))?;
    Ok(())
}

/// Total length of a seekable source. The current position is preserved.
pub fn stream_len(r: &mut impl Seek) -> Result<u64, IcoError> {
    let pos = r.stream_position()?;
    let len = r.seek(SeekFrom::End(0))?;
    r.seek(SeekFrom::Start(pos))?;
    Ok(len)
}

/// Write one byte.
pub fn put_u8(w: &mut impl Write, v: u8) -> io::Result<()> {
    w.write_all(&[v])
}

/// Write a `u16` little-endian.
pub fn put_u16_le(w: &mut impl Write, v: u16) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

/// Write a `u32` little-endian.
pub fn put_u32_le(w: &mut impl Write, v: u32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

/// Write a raw byte run.
pub fn put_bytes(w: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    w.write_all(bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::IcoError;

    #[test]
    fn reads_little_endian_fields_in_order() {
        let mut r = Cursor::new(vec![0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12]);
        assert_eq!(read_u8(&mut r, "byte").unwrap(), 0x01);
        assert_eq!(read_u16_le(&mut r, "word").unwrap(), 0x1234);
        assert_eq!(read_u32_le(&mut r, "dword").unwrap(), 0x1234_5678);
    }

    #[test]
    fn short_stream_reports_field_context() {
        let mut r = Cursor::new(vec![0xAB]);
        let err = read_u32_le(&mut r, "bitmap width").unwrap_err();
        match err {
            IcoError::UnexpectedEof { context } => assert_eq!(context, "bitmap width"),
            other => panic!("expected UnexpectedEof, got {other:?}"),
        }
    }

    #[test]
    fn read_bytes_requires_exact_length() {
        let mut r = Cursor::new(vec![1, 2, 3]);
        assert_eq!(read_bytes(&mut r, 3, "payload").unwrap(), vec![1, 2, 3]);
        let mut short = Cursor::new(vec![1, 2]);
        assert!(matches!(
            read_bytes(&mut short, 3, "payload"),
            Err(IcoError::UnexpectedEof { context: "payload" })
        ));
    }

    #[test]
    fn seek_to_repositions_absolutely() {
        let mut r = Cursor::new(vec![0, 1, 2, 3, 4, 5]);
        seek_to(&mut r, 4).unwrap();
        assert_eq!(read_u8(&mut r, "byte").unwrap(), 4);
        seek_to(&mut r, 1).unwrap();
        assert_eq!(read_u8(&mut r, "byte").unwrap(), 1);
    }

    #[test]
    fn stream_len_preserves_position() {
        let mut r = Cursor::new(vec![0u8; 10]);
        seek_to(&mut r, 3).unwrap();
        assert_eq!(stream_len(&mut r).unwrap(), 10);
        assert_eq!(r.position(), 3);
    }

    #[test]
    fn writers_emit_little_endian() {
        let mut out = Vec::new();
        put_u8(&mut out, 0xAB).unwrap();
        put_u16_le(&mut out, 0x1234).unwrap();
        put_u32_le(&mut out, 0x1234_5678).unwrap();
        put_bytes(&mut out, &[9, 9]).unwrap();
        assert_eq!(out, vec![0xAB, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 9, 9]);
    }
}
