use crate::boxes::{
    BoxExtent, BoxHeader, BoxRef, FileTypeBox, FourCC, HandlerBox, NodeKind, PrimaryItemBox,
    SpatialExtentsBox,
};
use crate::known_boxes::KnownBox;
use crate::reader::{SequentialReader, TextEncoding};
use log::{debug, trace, warn};
use std::io::{BufRead, Cursor};

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid box size {size} for {typ} at offset {start}")]
    InvalidSize { typ: FourCC, start: u64, size: u64 },
    #[error("box {typ} at offset {start} ends at {end}, past its parent's end {parent_end}")]
    ExceedsParent { typ: FourCC, start: u64, end: u64, parent_end: u64 },
    #[error("box {typ} declares a {expected}-byte payload but {consumed} bytes were read")]
    ExtentMismatch { typ: FourCC, expected: u64, consumed: u64 },
    #[error("box nesting deeper than {0} levels")]
    TooDeep(usize),
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Knobs for a parse pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest container nesting accepted before giving up.
    pub max_depth: usize,
}

impl ParseOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

pub fn read_box_header<R: BufRead>(r: &mut SequentialReader<R>) -> Result<BoxHeader> {
    let start = r.position();
    let size32 = r.get_u32()?;
    let typ = FourCC(r.get_array()?);
    let mut size = size32 as u64;

    if size32 == 1 {
        size = r.get_u64()?;
    }

    let mut uuid = None;
    if &typ.0 == b"uuid" {
        uuid = Some(r.get_array::<16>()?);
    }

    let header_size = r.position() - start;
    if size != 0 && size < header_size {
        return Err(ParseError::InvalidSize { typ, start, size });
    }

    trace!("box {} at {} size={} header={}", typ, start, size, header_size);
    Ok(BoxHeader { size, typ, uuid, header_size, start })
}

/// Parse one box, header and payload, whose parent ends at `parent_end`
/// (`None` for a top-level box in a stream of unknown length).
pub fn read_box<R: BufRead>(
    r: &mut SequentialReader<R>,
    parent_end: Option<u64>,
    opts: &ParseOptions,
) -> Result<BoxRef> {
    read_box_at(r, parent_end, 0, opts)
}

/// Parse sibling boxes until `parent_end` is reached.
pub fn parse_children<R: BufRead>(r: &mut SequentialReader<R>, parent_end: u64) -> Result<Vec<BoxRef>> {
    let extent = BoxExtent::new(r.position(), Some(parent_end));
    parse_level(r, &extent, 0, &ParseOptions::default())
}

/// Parse every top-level box from the current position. With `end == None`
/// parsing stops when the reader runs dry.
pub fn parse_boxes<R: BufRead>(
    r: &mut SequentialReader<R>,
    end: Option<u64>,
    opts: &ParseOptions,
) -> Result<Vec<BoxRef>> {
    let extent = BoxExtent::new(r.position(), end);
    parse_level(r, &extent, 0, opts)
}

/// Parse a complete in-memory box stream.
pub fn parse_bytes(data: &[u8]) -> Result<Vec<BoxRef>> {
    let mut r = SequentialReader::new(Cursor::new(data));
    parse_boxes(&mut r, Some(data.len() as u64), &ParseOptions::default())
}

fn parse_level<R: BufRead>(
    r: &mut SequentialReader<R>,
    extent: &BoxExtent,
    depth: usize,
    opts: &ParseOptions,
) -> Result<Vec<BoxRef>> {
    if depth > opts.max_depth {
        return Err(ParseError::TooDeep(opts.max_depth));
    }
    let mut kids = Vec::new();
    while !extent.is_done(r)? {
        kids.push(read_box_at(r, extent.end, depth, opts)?);
    }
    Ok(kids)
}

fn read_box_at<R: BufRead>(
    r: &mut SequentialReader<R>,
    parent_end: Option<u64>,
    depth: usize,
    opts: &ParseOptions,
) -> Result<BoxRef> {
    let mut hdr = read_box_header(r)?;

    let end = if hdr.size == 0 {
        parent_end
    } else {
        let end = hdr.start.checked_add(hdr.size).ok_or(ParseError::InvalidSize {
            typ: hdr.typ,
            start: hdr.start,
            size: hdr.size,
        })?;
        Some(end)
    };

    if let Some(parent_end) = parent_end {
        let end = end.unwrap_or(parent_end).max(r.position());
        if end > parent_end {
            return Err(ParseError::ExceedsParent { typ: hdr.typ, start: hdr.start, end, parent_end });
        }
    }

    let extent = BoxExtent::new(r.position(), end);
    let kind = read_payload(r, &hdr, &extent, depth, opts)?;

    let pos = r.position();
    if let Some(end) = extent.end {
        if pos != end {
            warn!("box {} at {}: payload read {} of {} bytes", hdr.typ, hdr.start, pos - extent.start, end - extent.start);
            return Err(ParseError::ExtentMismatch {
                typ: hdr.typ,
                expected: end - extent.start,
                consumed: pos - extent.start,
            });
        }
    }

    hdr.size = pos - hdr.start;
    Ok(BoxRef { hdr, kind })
}

fn read_payload<R: BufRead>(
    r: &mut SequentialReader<R>,
    hdr: &BoxHeader,
    extent: &BoxExtent,
    depth: usize,
    opts: &ParseOptions,
) -> Result<NodeKind> {
    let kb = KnownBox::from(hdr.typ);
    let (version, flags) = if kb.is_full_box() {
        (r.get_u8()?, r.get_u24()?)
    } else {
        (0, 0)
    };

    let kind = match kb {
        KnownBox::Ftyp => NodeKind::FileType(read_ftyp(r, extent)?),
        KnownBox::Meta => {
            let children = parse_level(r, extent, depth + 1, opts)?;
            NodeKind::FullContainer { version, flags, children }
        }
        k if k.is_container() => NodeKind::Container { children: parse_level(r, extent, depth + 1, opts)? },
        KnownBox::Hdlr => {
            r.skip(4)?; // pre_defined
            let handler_type = FourCC(r.get_array()?);
            r.skip(12)?; // reserved
            let raw = read_rest(r, extent)?;
            let name = TextEncoding::Utf8.decode(&raw).trim_end_matches('\0').to_string();
            NodeKind::Handler(HandlerBox { version, flags, handler_type, name })
        }
        KnownBox::Pitm => {
            let item_id = if version == 0 { r.get_u16()? as u32 } else { r.get_u32()? };
            NodeKind::PrimaryItem(PrimaryItemBox { version, flags, item_id })
        }
        KnownBox::Ispe => {
            let width = r.get_u32()?;
            let height = r.get_u32()?;
            NodeKind::SpatialExtents(SpatialExtentsBox { version, flags, width, height })
        }
        _ => {
            let data_offset = r.position();
            let data_len = skip_rest(r, extent)?;
            debug!("skipping {} payload: {} bytes at {}", hdr.typ, data_len, data_offset);
            if kb == KnownBox::Uuid {
                NodeKind::Unknown { data_offset, data_len }
            } else {
                NodeKind::Leaf { data_offset, data_len }
            }
        }
    };
    Ok(kind)
}

fn read_ftyp<R: BufRead>(r: &mut SequentialReader<R>, extent: &BoxExtent) -> Result<FileTypeBox> {
    let major_brand = FourCC(r.get_array()?);
    let minor_version = r.get_u32()?;
    let mut compatible_brands = Vec::new();
    while !extent.is_done(r)? {
        compatible_brands.push(FourCC(r.get_array()?));
    }
    Ok(FileTypeBox { major_brand, minor_version, compatible_brands })
}

fn read_rest<R: BufRead>(r: &mut SequentialReader<R>, extent: &BoxExtent) -> Result<Vec<u8>> {
    Ok(match extent.remaining(r.position()) {
        Some(n) => r.get_bytes(n)?,
        None => r.get_to_end()?,
    })
}

fn skip_rest<R: BufRead>(r: &mut SequentialReader<R>, extent: &BoxExtent) -> Result<u64> {
    Ok(match extent.remaining(r.position()) {
        Some(n) => {
            r.skip(n)?;
            n
        }
        None => r.skip_to_end()?,
    })
}
