//! Human-readable descriptions of image-resource tag payloads.
//!
//! [`TagDescriptor::describe`] routes a tag identifier to one decoder (see
//! [`KnownTag::decoder`]). Each decoder owns its byte layout and reads it
//! through an [`IndexedReader`]. A missing tag and a malformed payload both
//! come back as `None`; the read error is only logged.

use crate::reader::{IndexedReader, TextEncoding};
use crate::tags::{DecoderKind, KnownTag};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::io;

/// Where tag payloads come from, usually a metadata directory owned by the
/// caller.
pub trait TagSource {
    /// Raw payload stored for `tag`, if any.
    fn tag_bytes(&self, tag: u16) -> Option<&[u8]>;

    /// Description for tags with no dedicated decoder.
    fn default_description(&self, _tag: u16) -> Option<String> {
        None
    }
}

impl TagSource for HashMap<u16, Vec<u8>> {
    fn tag_bytes(&self, tag: u16) -> Option<&[u8]> {
        self.get(&tag).map(Vec::as_slice)
    }
}

impl TagSource for BTreeMap<u16, Vec<u8>> {
    fn tag_bytes(&self, tag: u16) -> Option<&[u8]> {
        self.get(&tag).map(Vec::as_slice)
    }
}

/// Describes tags held by a [`TagSource`].
pub struct TagDescriptor<'a, S: TagSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: TagSource + ?Sized> TagDescriptor<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    pub fn describe(&self, tag: u16) -> Option<String> {
        match KnownTag::from(tag).decoder() {
            DecoderKind::Fallback => self.source.default_description(tag),
            kind => decode(kind, tag, self.source.tag_bytes(tag)?),
        }
    }
}

/// Describe a raw payload as if it were stored under `tag`.
///
/// Tags without a dedicated decoder yield `None`.
pub fn describe_payload(tag: u16, bytes: &[u8]) -> Option<String> {
    decode(KnownTag::from(tag).decoder(), tag, bytes)
}

fn decode(kind: DecoderKind, tag: u16, bytes: &[u8]) -> Option<String> {
    let r = IndexedReader::new(bytes);
    let res = match kind {
        DecoderKind::SimpleText => Ok(TextEncoding::Utf8.decode(bytes)),
        DecoderKind::Boolean => match bytes.first() {
            None => return None,
            Some(0) => Ok("No".to_string()),
            Some(_) => Ok("Yes".to_string()),
        },
        DecoderKind::Int32 => r.get_i32(0).map(|v| v.to_string()),
        DecoderKind::BinarySummary => Ok(format!("{} bytes binary data", bytes.len())),
        DecoderKind::JpegQuality => jpeg_quality(r),
        DecoderKind::PixelAspectRatio => r.get_f64(4).map(|v| v.to_string()),
        DecoderKind::PrintScale => print_scale(r),
        DecoderKind::ResolutionInfo => resolution_info(r),
        DecoderKind::Version => version(r),
        DecoderKind::Slices => slices(r),
        DecoderKind::Thumbnail => thumbnail(r),
        DecoderKind::ClippingPathName => clipping_path_name(r),
        DecoderKind::Fallback => return None,
    };
    match res {
        Ok(s) => Some(s),
        Err(e) => {
            debug!("tag 0x{:04X} ({} bytes): {}", tag, bytes.len(), e);
            None
        }
    }
}

// ---------- Decoders ----------

fn jpeg_quality(r: IndexedReader<'_>) -> io::Result<String> {
    let q = r.get_u16(0)?;
    let f = r.get_u16(2)?;
    let s = r.get_u16(4)?;

    let display = match q {
        0xFFFD..=0xFFFF => q - 0xFFFC,
        0..=7 => q + 4,
        _ => q,
    };
    let tier = match q {
        0xFFFD..=0xFFFF | 0 => "Low",
        1..=3 => "Medium",
        4..=5 => "High",
        6..=8 => "Maximum",
        _ => "Unknown",
    };
    let format = match f {
        0x0000 => "Standard".to_string(),
        0x0001 => "Optimised".to_string(),
        0x0101 => "Progressive".to_string(),
        _ => format!("Unknown 0x{:04X}", f),
    };
    let scans = match s {
        1..=3 => (s + 2).to_string(),
        _ => format!("Unknown 0x{:04X}", s),
    };

    Ok(format!("{} ({}), {} format, {} scans", display, tier, format, scans))
}

fn print_scale(r: IndexedReader<'_>) -> io::Result<String> {
    let style = r.get_u16(0)?;
    let x = r.get_f32(2)?;
    let y = r.get_f32(6)?;
    let scale = r.get_f32(10)?;

    Ok(match style {
        0 => format!("Centered, Scale {}", scale),
        1 => "Size to fit".to_string(),
        2 => format!("User defined, X:{} Y:{}, Scale:{}", x, y, scale),
        _ => format!("Unknown {:04X}, X:{} Y:{}, Scale:{}", style, x, y, scale),
    })
}

fn resolution_info(r: IndexedReader<'_>) -> io::Result<String> {
    let x = r.get_fixed16_16(0)?;
    let y = r.get_fixed16_16(8)?;
    Ok(format!("{}x{} DPI", x, y))
}

// version (4), reader name, writer name, file version (4)
fn version(r: IndexedReader<'_>) -> io::Result<String> {
    let ver = r.get_i32(0)?;
    let (reader_name, pos) = r.get_prefixed_string(4, TextEncoding::Utf16Be)?;
    let (writer_name, pos) = r.get_prefixed_string(pos, TextEncoding::Utf16Be)?;
    let file_version = r.get_i32(pos)?;
    Ok(format!("{} ({}, {}) {}", ver, reader_name, writer_name, file_version))
}

// Only the slice-group header is read; per-slice records are not decoded.
fn slices(r: IndexedReader<'_>) -> io::Result<String> {
    let (name, pos) = r.get_prefixed_string(20, TextEncoding::Utf16Be)?;
    let count = r.get_i32(pos)?;

    Ok(format!(
        "{} ({},{},{},{}) {} Slices",
        name,
        r.get_i32(4)?,
        r.get_i32(8)?,
        r.get_i32(12)?,
        r.get_i32(16)?,
        count
    ))
}

fn thumbnail(r: IndexedReader<'_>) -> io::Result<String> {
    let format = r.get_i32(0)?;
    let width = r.get_i32(4)?;
    let height = r.get_i32(8)?;
    // 12: width in bytes
    let total_size = r.get_i32(16)?;
    let compressed_size = r.get_i32(20)?;
    let bpp = r.get_i32(24)?;

    Ok(format!(
        "{}, {}x{}, Decomp {} bytes, {} bpp, {} bytes",
        if format == 1 { "JpegRGB" } else { "RawRGB" },
        width,
        height,
        total_size,
        bpp,
        compressed_size
    ))
}

fn clipping_path_name(r: IndexedReader<'_>) -> io::Result<String> {
    let len = r.get_u8(0)? as usize;
    r.get_string(1, len, TextEncoding::Utf8)
}
