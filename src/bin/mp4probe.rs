use anyhow::Context;
use chrono::{FixedOffset, Local, Offset};
use clap::Parser;
use mp4walk::{Report, VideoFile};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Movie, track and chunk summary of an MP4/MOV file")]
struct Args {
    /// MP4/ISOBMFF file path
    path: PathBuf,

    /// Output as JSON instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Show times at this UTC offset (e.g. -05:00) instead of local time
    #[arg(long, value_name = "+HH:MM")]
    utc_offset: Option<FixedOffset>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let data = std::fs::read(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    let file = VideoFile::parse(&data)
        .with_context(|| format!("parsing {}", args.path.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&file)?);
        return Ok(());
    }

    let offset = args.utc_offset.unwrap_or_else(|| Local::now().offset().fix());
    println!("{}", args.path.display());
    print!("{}", Report { file: &file, offset });
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}
