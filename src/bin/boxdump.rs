use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use metabox::{
    boxes::{BoxHeader, BoxRef, NodeKind},
    known_boxes::KnownBox,
    parser::{ParseOptions, parse_boxes},
    reader::SequentialReader,
    describe_payload,
};
use std::fs::File;
use std::io::BufReader;

#[derive(Parser, Debug)]
#[command(version, about = "ISOBMFF box explorer and image-resource tag describer")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the box tree of a file
    Tree {
        /// ISOBMFF file path
        path: String,

        /// Reject box nesting deeper than this
        #[arg(long, default_value_t = 64)]
        max_depth: usize,

        /// Emit JSON instead of human-readable tree
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Describe a tag payload given as hex
    Describe {
        /// Tag identifier, decimal or 0x-prefixed hex
        #[arg(value_parser = parse_tag)]
        tag: u16,

        /// Payload bytes as a hex string
        payload: String,
    },
}

fn parse_tag(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(h) => u16::from_str_radix(h, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid tag '{}': {}", s, e))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.cmd {
        Command::Tree { path, max_depth, json } => {
            let f = File::open(&path).with_context(|| format!("opening {}", path))?;
            let file_len = f.metadata()?.len();
            let mut r = SequentialReader::new(BufReader::new(f));
            let opts = ParseOptions::default().with_max_depth(max_depth);
            let top = parse_boxes(&mut r, Some(file_len), &opts)
                .with_context(|| format!("parsing {}", path))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&top)?);
            } else {
                for b in &top {
                    print_box(b, 0);
                }
            }
        }
        Command::Describe { tag, payload } => {
            let bytes = hex::decode(payload.trim()).context("payload is not valid hex")?;
            match describe_payload(tag, &bytes) {
                Some(s) => println!("{}", s),
                None => println!("(no description)"),
            }
        }
    }
    Ok(())
}

// ---------- Human-readable tree ----------

fn print_box(b: &BoxRef, depth: usize) {
    let indent = "  ".repeat(depth);
    let hdr = &b.hdr;
    let detail = match &b.kind {
        NodeKind::FileType(ftyp) => format!(
            "major={} minor={} compatible={:?}",
            ftyp.major_brand,
            ftyp.minor_version,
            ftyp.compatible_brand_strs()
        ),
        NodeKind::Container { .. } => "(container)".to_string(),
        NodeKind::FullContainer { version, flags, .. } => {
            format!("(container, ver={}, flags=0x{:06x})", version, flags)
        }
        NodeKind::Handler(h) => format!("handler={} name={:?}", h.handler_type, h.name),
        NodeKind::PrimaryItem(p) => format!("item_id={}", p.item_id),
        NodeKind::SpatialExtents(s) => format!("{}x{}", s.width, s.height),
        NodeKind::Leaf { data_len, .. } | NodeKind::Unknown { data_len, .. } => {
            format!("({} payload bytes)", data_len)
        }
    };
    println!(
        "{indent}{:>6} {:>10} {} {} - {}",
        format!("{:#x}", hdr.start),
        hdr.size,
        display_type(hdr),
        detail,
        KnownBox::from(hdr.typ).full_name()
    );
    for c in b.children() {
        print_box(c, depth + 1);
    }
}

fn display_type(h: &BoxHeader) -> String {
    match h.uuid {
        Some(u) => format!("uuid:{}", hex::encode(u)),
        None => h.typ.to_string(),
    }
}
