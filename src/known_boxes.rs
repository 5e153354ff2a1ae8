use crate::boxes::FourCC;

/// Box types the parser knows how to interpret.
///
/// Anything not in this list becomes `KnownBox::Unknown(fourcc)` and is
/// skipped as an opaque leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownBox {
    // File-level / top-level
    Ftyp,
    Moov,
    Mdat,
    Free,
    Skip,
    Meta,

    // movie / track structure
    Trak,
    Edts,
    Mdia,
    Minf,
    Dinf,
    Stbl,
    Udta,

    // fragmented
    Mvex,
    Moof,
    Traf,

    // meta / HEIF
    Hdlr,
    Pitm,
    Iprp,
    Ipco,
    Ispe,

    // Raw UUID/vendor
    Uuid,

    // Anything else
    Unknown(FourCC),
}

impl From<FourCC> for KnownBox {
    fn from(cc: FourCC) -> Self {
        match &cc.0 {
            b"ftyp" => KnownBox::Ftyp,
            b"moov" => KnownBox::Moov,
            b"mdat" => KnownBox::Mdat,
            b"free" => KnownBox::Free,
            b"skip" => KnownBox::Skip,
            b"meta" => KnownBox::Meta,

            b"trak" => KnownBox::Trak,
            b"edts" => KnownBox::Edts,
            b"mdia" => KnownBox::Mdia,
            b"minf" => KnownBox::Minf,
            b"dinf" => KnownBox::Dinf,
            b"stbl" => KnownBox::Stbl,
            b"udta" => KnownBox::Udta,

            b"mvex" => KnownBox::Mvex,
            b"moof" => KnownBox::Moof,
            b"traf" => KnownBox::Traf,

            b"hdlr" => KnownBox::Hdlr,
            b"pitm" => KnownBox::Pitm,
            b"iprp" => KnownBox::Iprp,
            b"ipco" => KnownBox::Ipco,
            b"ispe" => KnownBox::Ispe,

            b"uuid" => KnownBox::Uuid,

            _ => KnownBox::Unknown(cc),
        }
    }
}

impl KnownBox {
    /// Does this box *contain* child boxes (container semantics)?
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            KnownBox::Moov
                | KnownBox::Trak
                | KnownBox::Edts
                | KnownBox::Mdia
                | KnownBox::Minf
                | KnownBox::Dinf
                | KnownBox::Stbl
                | KnownBox::Udta
                | KnownBox::Mvex
                | KnownBox::Moof
                | KnownBox::Traf
                | KnownBox::Iprp
                | KnownBox::Ipco
                | KnownBox::Meta
        )
    }

    /// Is this a FullBox (version + flags)?
    pub fn is_full_box(&self) -> bool {
        matches!(
            self,
            KnownBox::Meta | KnownBox::Hdlr | KnownBox::Pitm | KnownBox::Ispe
        )
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            KnownBox::Ftyp => "File Type Box",
            KnownBox::Moov => "Movie Box",
            KnownBox::Mdat => "Media Data Box",
            KnownBox::Free => "Free Space Box",
            KnownBox::Skip => "Skip Box",
            KnownBox::Meta => "Meta Box",
            KnownBox::Trak => "Track Box",
            KnownBox::Edts => "Edit Box",
            KnownBox::Mdia => "Media Box",
            KnownBox::Minf => "Media Information Box",
            KnownBox::Dinf => "Data Information Box",
            KnownBox::Stbl => "Sample Table Box",
            KnownBox::Udta => "User Data Box",
            KnownBox::Mvex => "Movie Extends Box",
            KnownBox::Moof => "Movie Fragment Box",
            KnownBox::Traf => "Track Fragment Box",
            KnownBox::Hdlr => "Handler Reference Box",
            KnownBox::Pitm => "Primary Item Box",
            KnownBox::Iprp => "Item Properties Box",
            KnownBox::Ipco => "Item Property Container Box",
            KnownBox::Ispe => "Image Spatial Extents",
            KnownBox::Uuid => "User Extension Box",
            KnownBox::Unknown(_) => "Unknown Box",
        }
    }
}
