use crate::reader::SequentialReader;
use serde::{Serialize, Serializer};
use std::fmt;
use std::io::{self, BufRead};

/// A four-character code: box types and brands.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub fn from_str(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        if b.len() == 4 {
            Some(FourCC([b[0], b[1], b[2], b[3]]))
        } else { None }
    }
    pub fn from_u32(v: u32) -> Self { FourCC(v.to_be_bytes()) }
    pub fn as_u32(&self) -> u32 { u32::from_be_bytes(self.0) }
}
impl fmt::Debug for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self) } }
// Each byte maps to exactly one char, so the rendering is always four chars.
impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|&c| write!(f, "{}", c as char))
    }
}
impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> { s.collect_str(self) }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoxHeader {
    pub size: u64,          // total size including header; a declared 0 is resolved to the span actually read
    pub typ: FourCC,
    #[serde(serialize_with = "ser_uuid")]
    pub uuid: Option<[u8;16]>,
    pub header_size: u64,   // 8, 16, 24 or 32
    pub start: u64,         // stream offset of header start
}

fn ser_uuid<S: Serializer>(u: &Option<[u8; 16]>, s: S) -> Result<S::Ok, S::Error> {
    match u {
        Some(u) => s.serialize_some(&hex::encode(u)),
        None => s.serialize_none(),
    }
}

/// Byte range a box payload is allowed to occupy.
///
/// `end == None` means "until the data runs out" and is only used for a
/// size-0 box at the top level of a stream of unknown length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoxExtent {
    pub start: u64,
    pub end: Option<u64>,
}

impl BoxExtent {
    pub fn new(start: u64, end: Option<u64>) -> Self {
        Self { start, end }
    }

    /// Has `r` reached the end of this extent?
    pub fn is_done<R: BufRead>(&self, r: &mut SequentialReader<R>) -> io::Result<bool> {
        match self.end {
            Some(end) => Ok(r.position() >= end),
            None => r.is_at_end(),
        }
    }

    /// Bytes left in the extent at `pos`, if the extent is bounded.
    pub fn remaining(&self, pos: u64) -> Option<u64> {
        self.end.map(|e| e.saturating_sub(pos))
    }
}

/// `ftyp`: major brand, minor version and compatible brands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileTypeBox {
    pub major_brand: FourCC,
    pub minor_version: u32,
    pub compatible_brands: Vec<FourCC>,
}

impl FileTypeBox {
    pub fn major_brand_str(&self) -> String { self.major_brand.to_string() }

    /// The minor version rendered as a four-character code; some writers
    /// store a brand-like value here.
    pub fn minor_version_str(&self) -> String { FourCC::from_u32(self.minor_version).to_string() }

    pub fn compatible_brand_strs(&self) -> Vec<String> {
        self.compatible_brands.iter().map(|b| b.to_string()).collect()
    }
}

/// `hdlr`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerBox {
    pub version: u8,
    pub flags: u32,
    pub handler_type: FourCC,
    pub name: String,
}

/// `pitm`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryItemBox {
    pub version: u8,
    pub flags: u32,
    pub item_id: u32,
}

/// `ispe`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpatialExtentsBox {
    pub version: u8,
    pub flags: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    FileType(FileTypeBox),
    Container { children: Vec<BoxRef> },
    /// A FullBox that holds children after its version and flags (`meta`).
    FullContainer { version: u8, flags: u32, children: Vec<BoxRef> },
    Handler(HandlerBox),
    PrimaryItem(PrimaryItemBox),
    SpatialExtents(SpatialExtentsBox),
    Leaf { data_offset: u64, data_len: u64 },
    Unknown { data_offset: u64, data_len: u64 },
}

#[derive(Debug, Serialize)]
pub struct BoxRef {
    pub hdr: BoxHeader,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl BoxRef {
    pub fn typ(&self) -> FourCC { self.hdr.typ }

    /// Bytes this box occupied in the stream, header included.
    pub fn consumed(&self) -> u64 { self.hdr.size }

    /// Payload bytes after the header.
    pub fn payload_len(&self) -> u64 { self.hdr.size.saturating_sub(self.hdr.header_size) }

    pub fn children(&self) -> &[BoxRef] {
        match &self.kind {
            NodeKind::Container { children } | NodeKind::FullContainer { children, .. } => children.as_slice(),
            _ => &[],
        }
    }

    /// First direct child with the given type.
    pub fn child(&self, typ: &[u8; 4]) -> Option<&BoxRef> {
        self.children().iter().find(|c| &c.hdr.typ.0 == typ)
    }

    pub fn as_file_type(&self) -> Option<&FileTypeBox> {
        match &self.kind { NodeKind::FileType(f) => Some(f), _ => None }
    }
}
