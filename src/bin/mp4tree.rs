use anyhow::{Context, bail};
use clap::{ArgAction, Parser};
use mp4walk::known_boxes::KnownBox;
use mp4walk::util::hex_dump;
use mp4walk::{BoxHeader, BoxRef, Boxes, FourCC, NodeKind, boxes};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "MP4/ISOBMFF box tree explorer")]
struct Args {
    /// MP4/ISOBMFF file path
    path: PathBuf,

    /// Limit recursion depth
    #[arg(long, default_value_t = 64)]
    max_depth: usize,

    /// Hex dump the payload of the first box of this type (e.g. --raw stsd)
    #[arg(long = "raw", value_parser = parse_fourcc)]
    raw: Option<FourCC>,

    /// Bytes to dump with --raw (0 means entire payload)
    #[arg(long, default_value_t = 0)]
    bytes: usize,

    /// Emit JSON instead of a human-readable tree
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn parse_fourcc(s: &str) -> Result<FourCC, String> {
    FourCC::from_str(s).ok_or_else(|| format!("`{s}` is not a four character code"))
}

#[derive(Serialize)]
struct JsonBox {
    #[serde(flatten)]
    header: BoxHeader,
    kind: &'static str,
    full_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flags: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<JsonBox>>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();

    let data = std::fs::read(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;

    if let Some(typ) = args.raw {
        let Some(b) = find_first(boxes(&data), typ, args.max_depth)? else {
            bail!("no {typ} box in {}", args.path.display());
        };
        let payload = b.payload();
        let n = if args.bytes == 0 { payload.len() } else { args.bytes.min(payload.len()) };
        print!("{}", hex_dump(&payload[..n], b.hdr.payload_start));
        return Ok(());
    }

    if args.json {
        let tree = to_json(boxes(&data), 0, args.max_depth)?;
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    print_tree(boxes(&data), 0, args.max_depth)
}

fn display_type(h: &BoxHeader) -> String {
    match h.user_type {
        Some(u) => format!("uuid:{}", hex::encode(u)),
        None => h.typ.to_string(),
    }
}

fn print_tree(level: Boxes<'_>, depth: usize, max_depth: usize) -> anyhow::Result<()> {
    let indent = "  ".repeat(depth);
    for b in level {
        let b = b?;
        let hdr = &b.hdr;
        let name = KnownBox::from(hdr.typ).full_name();
        let line = format!(
            "{indent}{:>8} {:>10} (+{}) {} [{}]",
            format!("{:#x}", hdr.start),
            hdr.size(),
            hdr.header_size,
            display_type(hdr),
            name
        );
        match b.kind() {
            NodeKind::Container(_) => {
                println!("{line} (container)");
                if depth < max_depth
                    && let Some(kids) = b.children()
                {
                    print_tree(kids, depth + 1, max_depth)?;
                }
            }
            NodeKind::FullBox { version, flags, .. } => {
                println!("{line} (ver={version}, flags=0x{flags:06x})")
            }
            NodeKind::Leaf(_) | NodeKind::Unknown(_) => println!("{line}"),
        }
    }
    Ok(())
}

fn to_json(level: Boxes<'_>, depth: usize, max_depth: usize) -> anyhow::Result<Vec<JsonBox>> {
    let mut out = Vec::new();
    for b in level {
        let b = b?;
        let (kind, version, flags) = match b.kind() {
            NodeKind::Container(_) => ("container", None, None),
            NodeKind::FullBox { version, flags, .. } => ("full", Some(version), Some(flags)),
            NodeKind::Leaf(_) => ("leaf", None, None),
            NodeKind::Unknown(_) => ("unknown", None, None),
        };
        let children = match b.children() {
            Some(kids) if depth < max_depth => Some(to_json(kids, depth + 1, max_depth)?),
            _ => None,
        };
        out.push(JsonBox {
            full_name: KnownBox::from(b.hdr.typ).full_name(),
            header: b.hdr,
            kind,
            version,
            flags,
            children,
        });
    }
    Ok(out)
}

fn find_first<'a>(
    level: Boxes<'a>,
    typ: FourCC,
    depth_left: usize,
) -> anyhow::Result<Option<BoxRef<'a>>> {
    for b in level {
        let b = b?;
        if b.hdr.typ == typ {
            return Ok(Some(b));
        }
        if depth_left > 0
            && let Some(kids) = b.children()
            && let Some(found) = find_first(kids, typ, depth_left - 1)?
        {
            return Ok(Some(found));
        }
    }
    Ok(None)
}
