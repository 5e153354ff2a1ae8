//! Byte cursors used by the box reader and the tag descriptors.
//!
//! Two read modes are provided over big-endian data:
//! - [`SequentialReader`]: forward-only over any [`BufRead`], tracking its
//!   absolute position so box extents can be checked.
//! - [`IndexedReader`]: random access over an in-memory slice. Reads never
//!   move any shared state, so fields may be read in any order.
//!
//! Every read that would run past the available data fails with an
//! [`io::Error`] of kind `UnexpectedEof`.

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use std::io::{self, BufRead, Read};

/// Character encodings understood by the text reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// ISO-8859-1: each byte is the code point of the same value.
    Latin1,
    Utf8,
    /// Two bytes per code unit, big-endian, no BOM.
    Utf16Be,
}

impl TextEncoding {
    /// Number of bytes in one code unit.
    pub fn unit_size(self) -> usize {
        match self {
            TextEncoding::Latin1 | TextEncoding::Utf8 => 1,
            TextEncoding::Utf16Be => 2,
        }
    }

    pub fn decode(self, bytes: &[u8]) -> String {
        let enc = match self {
            TextEncoding::Latin1 => return encoding_rs::mem::decode_latin1(bytes).into_owned(),
            TextEncoding::Utf8 => encoding_rs::UTF_8,
            TextEncoding::Utf16Be => encoding_rs::UTF_16BE,
        };
        enc.decode_without_bom_handling(bytes).0.into_owned()
    }

    /// Byte length of `units` code units, or an error on overflow.
    fn byte_len(self, units: usize) -> io::Result<usize> {
        units
            .checked_mul(self.unit_size())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "text length overflow"))
    }
}

fn eof(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, format!("read past end of data: {what}"))
}

/// Convert a 16.16 fixed-point value to a float.
pub fn fixed16_16(raw: i32) -> f64 {
    raw as f64 / 65536.0
}

// ---------- Indexed ----------

/// Random-access reader over a borrowed byte buffer.
#[derive(Debug, Clone, Copy)]
pub struct IndexedReader<'a> {
    buf: &'a [u8],
}

impl<'a> IndexedReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow `len` bytes starting at `offset`.
    pub fn get_bytes(&self, offset: usize, len: usize) -> io::Result<&'a [u8]> {
        let end = offset.checked_add(len).ok_or_else(|| eof("offset overflow"))?;
        self.buf.get(offset..end).ok_or_else(|| {
            eof(&format!("{len} bytes at offset {offset} (buffer is {} bytes)", self.buf.len()))
        })
    }

    pub fn get_u8(&self, offset: usize) -> io::Result<u8> {
        Ok(self.get_bytes(offset, 1)?[0])
    }

    pub fn get_i8(&self, offset: usize) -> io::Result<i8> {
        Ok(self.get_u8(offset)? as i8)
    }

    pub fn get_u16(&self, offset: usize) -> io::Result<u16> {
        Ok(BigEndian::read_u16(self.get_bytes(offset, 2)?))
    }

    pub fn get_i16(&self, offset: usize) -> io::Result<i16> {
        Ok(BigEndian::read_i16(self.get_bytes(offset, 2)?))
    }

    pub fn get_u32(&self, offset: usize) -> io::Result<u32> {
        Ok(BigEndian::read_u32(self.get_bytes(offset, 4)?))
    }

    pub fn get_i32(&self, offset: usize) -> io::Result<i32> {
        Ok(BigEndian::read_i32(self.get_bytes(offset, 4)?))
    }

    pub fn get_u64(&self, offset: usize) -> io::Result<u64> {
        Ok(BigEndian::read_u64(self.get_bytes(offset, 8)?))
    }

    pub fn get_i64(&self, offset: usize) -> io::Result<i64> {
        Ok(BigEndian::read_i64(self.get_bytes(offset, 8)?))
    }

    pub fn get_f32(&self, offset: usize) -> io::Result<f32> {
        Ok(BigEndian::read_f32(self.get_bytes(offset, 4)?))
    }

    pub fn get_f64(&self, offset: usize) -> io::Result<f64> {
        Ok(BigEndian::read_f64(self.get_bytes(offset, 8)?))
    }

    /// Signed 16.16 fixed-point value.
    pub fn get_fixed16_16(&self, offset: usize) -> io::Result<f64> {
        Ok(fixed16_16(self.get_i32(offset)?))
    }

    /// Decode `units` code units of text starting at `offset`.
    pub fn get_string(&self, offset: usize, units: usize, encoding: TextEncoding) -> io::Result<String> {
        let len = encoding.byte_len(units)?;
        Ok(encoding.decode(self.get_bytes(offset, len)?))
    }

    /// Text preceded by a `u32` count of code units. Returns the text and
    /// the offset just past it.
    pub fn get_prefixed_string(&self, offset: usize, encoding: TextEncoding) -> io::Result<(String, usize)> {
        let units = self.get_u32(offset)? as usize;
        let start = offset + 4;
        let s = self.get_string(start, units, encoding)?;
        // get_string succeeded, so start + units * unit_size is within the buffer
        Ok((s, start + units * encoding.unit_size()))
    }
}

// ---------- Sequential ----------

/// Forward-only big-endian reader that knows its absolute position.
pub struct SequentialReader<R> {
    inner: R,
    pos: u64,
}

impl<R: BufRead> SequentialReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_base(inner, 0)
    }

    /// Start counting positions from `base` instead of zero, for readers
    /// that begin partway into a larger stream.
    pub fn with_base(inner: R, base: u64) -> Self {
        Self { inner, pos: base }
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// True when no more bytes can be read.
    pub fn is_at_end(&mut self) -> io::Result<bool> {
        Ok(self.inner.fill_buf()?.is_empty())
    }

    fn track<T>(&mut self, n: u64, res: io::Result<T>) -> io::Result<T> {
        let v = res?;
        self.pos += n;
        Ok(v)
    }

    pub fn get_u8(&mut self) -> io::Result<u8> {
        let r = self.inner.read_u8();
        self.track(1, r)
    }

    pub fn get_i8(&mut self) -> io::Result<i8> {
        let r = self.inner.read_i8();
        self.track(1, r)
    }

    pub fn get_u16(&mut self) -> io::Result<u16> {
        let r = self.inner.read_u16::<BigEndian>();
        self.track(2, r)
    }

    pub fn get_i16(&mut self) -> io::Result<i16> {
        let r = self.inner.read_i16::<BigEndian>();
        self.track(2, r)
    }

    /// 24-bit unsigned value, as used by FullBox flags.
    pub fn get_u24(&mut self) -> io::Result<u32> {
        let r = self.inner.read_u24::<BigEndian>();
        self.track(3, r)
    }

    pub fn get_u32(&mut self) -> io::Result<u32> {
        let r = self.inner.read_u32::<BigEndian>();
        self.track(4, r)
    }

    pub fn get_i32(&mut self) -> io::Result<i32> {
        let r = self.inner.read_i32::<BigEndian>();
        self.track(4, r)
    }

    pub fn get_u64(&mut self) -> io::Result<u64> {
        let r = self.inner.read_u64::<BigEndian>();
        self.track(8, r)
    }

    pub fn get_i64(&mut self) -> io::Result<i64> {
        let r = self.inner.read_i64::<BigEndian>();
        self.track(8, r)
    }

    pub fn get_f32(&mut self) -> io::Result<f32> {
        let r = self.inner.read_f32::<BigEndian>();
        self.track(4, r)
    }

    pub fn get_f64(&mut self) -> io::Result<f64> {
        let r = self.inner.read_f64::<BigEndian>();
        self.track(8, r)
    }

    pub fn get_fixed16_16(&mut self) -> io::Result<f64> {
        Ok(fixed16_16(self.get_i32()?))
    }

    pub fn get_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut out = [0u8; N];
        let r = self.inner.read_exact(&mut out);
        self.track(N as u64, r)?;
        Ok(out)
    }

    /// Read exactly `len` bytes. The buffer grows with the data actually
    /// present, so a bogus length cannot force a huge allocation.
    pub fn get_bytes(&mut self, len: u64) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        let got = (&mut self.inner).take(len).read_to_end(&mut out)? as u64;
        self.pos += got;
        if got != len {
            return Err(eof(&format!("wanted {len} bytes, got {got}")));
        }
        Ok(out)
    }

    /// Discard `len` bytes.
    pub fn skip(&mut self, len: u64) -> io::Result<()> {
        let got = io::copy(&mut (&mut self.inner).take(len), &mut io::sink())?;
        self.pos += got;
        if got != len {
            return Err(eof(&format!("skip of {len} bytes stopped after {got}")));
        }
        Ok(())
    }

    /// Read everything left in the stream.
    pub fn get_to_end(&mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        self.pos += self.inner.read_to_end(&mut out)? as u64;
        Ok(out)
    }

    /// Discard everything left in the stream, returning the byte count.
    pub fn skip_to_end(&mut self) -> io::Result<u64> {
        let n = io::copy(&mut self.inner, &mut io::sink())?;
        self.pos += n;
        Ok(n)
    }

    pub fn get_string(&mut self, units: usize, encoding: TextEncoding) -> io::Result<String> {
        let len = encoding.byte_len(units)?;
        let bytes = self.get_bytes(len as u64)?;
        Ok(encoding.decode(&bytes))
    }

    /// Text preceded by a `u32` count of code units.
    pub fn get_prefixed_string(&mut self, encoding: TextEncoding) -> io::Result<String> {
        let units = self.get_u32()? as usize;
        self.get_string(units, encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn indexed_reads_are_big_endian_and_stateless() {
        let data = [0x00, 0x01, 0x00, 0x02, 0xFF, 0xFF, 0xFF, 0xFE];
        let r = IndexedReader::new(&data);
        assert_eq!(r.get_u16(0).unwrap(), 1);
        assert_eq!(r.get_u32(0).unwrap(), 0x0001_0002);
        assert_eq!(r.get_i32(4).unwrap(), -2);
        // backtracking read sees the same bytes again
        assert_eq!(r.get_u16(2).unwrap(), 2);
        assert_eq!(r.get_u8(1).unwrap(), 1);
    }

    #[test]
    fn indexed_out_of_range_is_eof() {
        let data = [1u8, 2, 3];
        let r = IndexedReader::new(&data);
        let err = r.get_u32(0).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(r.get_u8(3).is_err());
        assert!(r.get_bytes(usize::MAX, 2).is_err());
    }

    #[test]
    fn fixed_point_halves() {
        let data = 0x0048_8000u32.to_be_bytes();
        let r = IndexedReader::new(&data);
        assert_eq!(r.get_fixed16_16(0).unwrap(), 72.5);

        let neg = (-0x0001_8000i32).to_be_bytes();
        assert_eq!(IndexedReader::new(&neg).get_fixed16_16(0).unwrap(), -1.5);
    }

    #[test]
    fn wide_and_narrow_strings() {
        let data = [0x00, b'h', 0x00, b'i', 0xE9];
        let r = IndexedReader::new(&data);
        assert_eq!(r.get_string(0, 2, TextEncoding::Utf16Be).unwrap(), "hi");
        assert_eq!(r.get_string(4, 1, TextEncoding::Latin1).unwrap(), "é");
        assert!(r.get_string(0, 3, TextEncoding::Utf16Be).is_err());
        assert!(r.get_string(0, usize::MAX, TextEncoding::Utf16Be).is_err());
    }

    #[test]
    fn latin1_maps_bytes_to_code_points() {
        assert_eq!(TextEncoding::Latin1.decode(&[0x41, 0x80, 0x9F, 0xFF]), "A\u{80}\u{9F}\u{FF}");
    }

    #[test]
    fn indexed_prefixed_strings() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(&[0x00, b'o', 0x00, b'k']);
        data.extend_from_slice(&0u32.to_be_bytes());
        let r = IndexedReader::new(&data);

        let (s, next) = r.get_prefixed_string(0, TextEncoding::Utf16Be).unwrap();
        assert_eq!(s, "ok");
        assert_eq!(next, 8);

        let (empty, end) = r.get_prefixed_string(next, TextEncoding::Utf16Be).unwrap();
        assert_eq!(empty, "");
        assert_eq!(end, 12);

        // prefix claims more units than the buffer holds
        let mut long = data.clone();
        long[..4].copy_from_slice(&3u32.to_be_bytes());
        let err = IndexedReader::new(&long).get_prefixed_string(0, TextEncoding::Utf16Be).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(IndexedReader::new(&[0xFF; 4]).get_prefixed_string(0, TextEncoding::Utf16Be).is_err());
    }

    #[test]
    fn sequential_prefixed_strings() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&3u32.to_be_bytes());
        data.extend_from_slice(b"abc");
        data.extend_from_slice(&9u32.to_be_bytes());
        data.extend_from_slice(b"xy");
        let mut r = SequentialReader::new(Cursor::new(data));

        assert_eq!(r.get_prefixed_string(TextEncoding::Latin1).unwrap(), "");
        assert_eq!(r.get_prefixed_string(TextEncoding::Utf8).unwrap(), "abc");
        assert_eq!(r.position(), 11);
        assert_eq!(
            r.get_prefixed_string(TextEncoding::Utf8).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn sequential_tracks_position() {
        let mut data = Vec::new();
        data.extend_from_slice(&7u32.to_be_bytes());
        data.extend_from_slice(&1.5f64.to_be_bytes());
        data.extend_from_slice(b"abcd");
        let mut r = SequentialReader::with_base(Cursor::new(data), 100);

        assert_eq!(r.get_u32().unwrap(), 7);
        assert_eq!(r.position(), 104);
        assert_eq!(r.get_f64().unwrap(), 1.5);
        assert!(!r.is_at_end().unwrap());
        assert_eq!(r.get_string(4, TextEncoding::Latin1).unwrap(), "abcd");
        assert_eq!(r.position(), 116);
        assert!(r.is_at_end().unwrap());
        assert_eq!(r.get_u8().unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn sequential_short_bulk_reads_fail() {
        let mut r = SequentialReader::new(Cursor::new(vec![0u8; 6]));
        assert!(r.skip(4).is_ok());
        assert!(r.get_bytes(u64::MAX).is_err());
        assert_eq!(r.position(), 6);
    }
}
