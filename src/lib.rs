pub mod boxes;
pub mod descriptor;
pub mod known_boxes;
pub mod parser;
pub mod reader;
pub mod tags;

pub use boxes::{BoxExtent, BoxHeader, BoxRef, FileTypeBox, FourCC, NodeKind};
pub use descriptor::{TagDescriptor, TagSource, describe_payload};
pub use parser::{ParseError, ParseOptions, parse_boxes, parse_bytes, parse_children, read_box, read_box_header};
pub use reader::{IndexedReader, SequentialReader, TextEncoding};
