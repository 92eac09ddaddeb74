//! obml2html - Convert saved Opera Mini pages to HTML
//!
//! A command line tool that decodes OBML saved pages (`*.obml*`) and writes
//! each one as a standalone HTML page with its images extracted next to it,
//! or as a JSON dump of the decoded events.

use clap::{ArgAction, Parser, ValueEnum};
use memmap2::Mmap;
use obml_core::converter::HtmlConverter;
use obml_core::image::ImageWriter;
use obml_core::{DecodeOptions, Decoder, Event, Result};
use rustc_hash::FxHashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{Level, info};

/// Marker searched for in file names when no inputs are given (`*.obml*`).
const DEFAULT_PATTERN: &str = ".obml";

/// Output type for converted pages.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
enum OutputType {
    /// Standalone HTML page (default)
    #[default]
    Html,
    /// JSON array of decoded events
    Json,
}

impl OutputType {
    const fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

/// Convert saved Opera Mini pages (OBML) into HTML.
#[derive(Parser, Debug)]
#[command(name = "obml2html")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Saved page files; defaults to every `*.obml*` file in the current directory
    files: Vec<PathBuf>,

    /// Trace every primitive read of the decoder to stderr
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Type of output to generate
    #[arg(short = 't', long = "output-type", value_enum, default_value = "html")]
    output_type: OutputType,

    /// Directory to write output to (default: next to each input)
    #[arg(short = 'O', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Do not extract embedded images
    #[arg(long = "no-images", action = ArgAction::SetTrue)]
    no_images: bool,

    /// Scale factor for HTML output
    #[arg(short = 's', long, default_value = "1.0")]
    scale: f64,
}

/// Whether a file name matches `*.obml*`.
fn matches_default_pattern(name: &str) -> bool {
    name.find(DEFAULT_PATTERN).is_some_and(|idx| idx > 0)
}

/// List the saved pages in `dir`, sorted by path.
fn default_inputs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if matches_default_pattern(&entry.file_name().to_string_lossy())
            && entry.file_type()?.is_file()
        {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// `<dir>/<input file name>.<suffix>`, where dir defaults to the input's directory.
fn sibling_path(input: &Path, output_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let mut name = input.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    let dir = output_dir.or_else(|| input.parent()).unwrap_or(Path::new(""));
    dir.join(name)
}

fn write_html(events: &[Event], out_path: &Path, images_dir: &Path, args: &Args) -> Result<()> {
    let mut images = FxHashMap::default();
    if !args.no_images {
        let mut writer = ImageWriter::new(images_dir);
        for event in events {
            if let Event::File(file) = event {
                images.insert(file.address, writer.write_file(file)?);
            }
        }
    }

    let out = BufWriter::new(File::create(out_path)?);
    let mut converter = HtmlConverter::with_images(out, images);
    converter.set_scale(args.scale);
    for event in events {
        converter.receive_event(event)?;
    }
    converter.close()
}

fn write_json(events: &[Event], out_path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(out_path)?);
    serde_json::to_writer_pretty(&mut out, events).map_err(io::Error::from)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Decode one saved page and write its converted output.
fn process_file(path: &Path, args: &Args) -> Result<PathBuf> {
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file) }?;

    // Nothing is written until the whole page has decoded.
    let options = DecodeOptions { trace: args.debug };
    let mut decoder = Decoder::with_options(&mmap[..], options);
    let events = decoder.by_ref().collect::<Result<Vec<Event>>>()?;
    if let (Some(version), Some(report)) = (decoder.version(), decoder.blob_report()) {
        info!(%version, matched = report.matched.len(), "decoded {}", path.display());
    }

    let output_dir = args.output_dir.as_deref();
    let out_path = sibling_path(path, output_dir, &format!(".{}", args.output_type.extension()));
    match args.output_type {
        OutputType::Html => {
            let images_dir = sibling_path(path, output_dir, "_files");
            write_html(&events, &out_path, &images_dir, args)?;
        }
        OutputType::Json => write_json(&events, &out_path)?,
    }
    Ok(out_path)
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.debug { Level::TRACE } else { Level::WARN })
        .with_writer(io::stderr)
        .init();

    let files = if args.files.is_empty() {
        default_inputs(Path::new("."))?
    } else {
        args.files.clone()
    };
    if files.is_empty() {
        eprintln!("obml2html: No files specified.");
        std::process::exit(1);
    }

    if let Some(ref dir) = args.output_dir {
        fs::create_dir_all(dir)?;
    }

    // A failing page does not stop the remaining ones.
    let mut failed = 0usize;
    for path in &files {
        match process_file(path, &args) {
            Ok(out_path) => println!("{} -> {}", path.display(), out_path.display()),
            Err(e) => {
                eprintln!("Error processing {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
