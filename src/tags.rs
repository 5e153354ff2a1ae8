//! Image-resource tag identifiers and the decoder each one is routed to.

pub const TAG_RESOLUTION_INFO: u16 = 0x03ED;
pub const TAG_IPTC: u16 = 0x0404;
pub const TAG_JPEG_QUALITY: u16 = 0x0406;
pub const TAG_THUMBNAIL_OLD: u16 = 0x0409;
pub const TAG_COPYRIGHT: u16 = 0x040A;
pub const TAG_URL: u16 = 0x040B;
pub const TAG_THUMBNAIL: u16 = 0x040C;
pub const TAG_GLOBAL_ANGLE: u16 = 0x040D;
pub const TAG_SEED_NUMBER: u16 = 0x0414;
pub const TAG_GLOBAL_ALTITUDE: u16 = 0x0419;
pub const TAG_SLICES: u16 = 0x041A;
pub const TAG_URL_LIST: u16 = 0x041E;
pub const TAG_VERSION: u16 = 0x0421;
pub const TAG_XMP: u16 = 0x0424;
pub const TAG_PRINT_SCALE: u16 = 0x0426;
pub const TAG_PIXEL_ASPECT_RATIO: u16 = 0x0428;
pub const TAG_CLIPPING_PATH_NAME: u16 = 0x0BB7;

/// Tags with a dedicated description routine.
///
/// Anything not listed becomes `KnownTag::Other(id)` and is described by
/// the tag source's own fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownTag {
    ResolutionInfo,
    Iptc,
    JpegQuality,
    ThumbnailOld,
    Copyright,
    Url,
    Thumbnail,
    GlobalAngle,
    SeedNumber,
    GlobalAltitude,
    Slices,
    UrlList,
    Version,
    Xmp,
    PrintScale,
    PixelAspectRatio,
    ClippingPathName,
    Other(u16),
}

impl From<u16> for KnownTag {
    fn from(id: u16) -> Self {
        match id {
            TAG_RESOLUTION_INFO => KnownTag::ResolutionInfo,
            TAG_IPTC => KnownTag::Iptc,
            TAG_JPEG_QUALITY => KnownTag::JpegQuality,
            TAG_THUMBNAIL_OLD => KnownTag::ThumbnailOld,
            TAG_COPYRIGHT => KnownTag::Copyright,
            TAG_URL => KnownTag::Url,
            TAG_THUMBNAIL => KnownTag::Thumbnail,
            TAG_GLOBAL_ANGLE => KnownTag::GlobalAngle,
            TAG_SEED_NUMBER => KnownTag::SeedNumber,
            TAG_GLOBAL_ALTITUDE => KnownTag::GlobalAltitude,
            TAG_SLICES => KnownTag::Slices,
            TAG_URL_LIST => KnownTag::UrlList,
            TAG_VERSION => KnownTag::Version,
            TAG_XMP => KnownTag::Xmp,
            TAG_PRINT_SCALE => KnownTag::PrintScale,
            TAG_PIXEL_ASPECT_RATIO => KnownTag::PixelAspectRatio,
            TAG_CLIPPING_PATH_NAME => KnownTag::ClippingPathName,
            other => KnownTag::Other(other),
        }
    }
}

/// How a tag's payload is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderKind {
    SimpleText,
    Boolean,
    Int32,
    BinarySummary,
    JpegQuality,
    PixelAspectRatio,
    PrintScale,
    ResolutionInfo,
    Version,
    Slices,
    Thumbnail,
    ClippingPathName,
    Fallback,
}

impl KnownTag {
    pub fn decoder(&self) -> DecoderKind {
        match self {
            KnownTag::Url | KnownTag::Xmp => DecoderKind::SimpleText,
            KnownTag::Copyright => DecoderKind::Boolean,
            KnownTag::GlobalAngle
            | KnownTag::GlobalAltitude
            | KnownTag::UrlList
            | KnownTag::SeedNumber => DecoderKind::Int32,
            KnownTag::Iptc => DecoderKind::BinarySummary,
            KnownTag::JpegQuality => DecoderKind::JpegQuality,
            KnownTag::PixelAspectRatio => DecoderKind::PixelAspectRatio,
            KnownTag::PrintScale => DecoderKind::PrintScale,
            KnownTag::ResolutionInfo => DecoderKind::ResolutionInfo,
            KnownTag::Version => DecoderKind::Version,
            KnownTag::Slices => DecoderKind::Slices,
            KnownTag::Thumbnail | KnownTag::ThumbnailOld => DecoderKind::Thumbnail,
            KnownTag::ClippingPathName => DecoderKind::ClippingPathName,
            KnownTag::Other(_) => DecoderKind::Fallback,
        }
    }
}
