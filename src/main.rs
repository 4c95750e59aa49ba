// src/main.rs
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use huff::logger;

/// Mode recorded when the input has no file permissions to copy.
const DEFAULT_MODE: u16 = 0o644;

#[derive(Parser)]
#[command(name = "huff", version)]
#[command(about = "Compress and decompress files with Huffman coding.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Files {
    /// Input file (default: stdin)
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print statistics; repeat for header and code table details
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    Encode(Files),
    /// Decompress a file
    Decode(Files),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode(files) => {
            logger::init(files.verbose);
            encode(&files)
        }
        Commands::Decode(files) => {
            logger::init(files.verbose);
            decode(&files)
        }
    }
}

fn encode(files: &Files) -> anyhow::Result<()> {
    let (input, mode) = match &files.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("cannot open input {}", path.display()))?;
            let mode = file_mode(&file).unwrap_or(DEFAULT_MODE);
            (Box::new(file) as Box<dyn Read>, mode)
        }
        None => (Box::new(io::stdin().lock()) as Box<dyn Read>, DEFAULT_MODE),
    };

    let output = open_output(files.output.as_deref())?;
    let stats = huff::encode(input, output, mode).context("compression failed")?;
    if let Some(path) = &files.output {
        apply_mode(path, mode)?;
    }

    info!("Uncompressed file size: {} bytes", stats.uncompressed);
    info!("Compressed file size: {} bytes", stats.compressed);
    info!("Space saving: {:.2}%", stats.space_saving());
    Ok(())
}

fn decode(files: &Files) -> anyhow::Result<()> {
    let input: Box<dyn Read> = match &files.input {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("cannot open input {}", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };

    let output = open_output(files.output.as_deref())?;
    let (header, stats) = huff::decode(input, output).context("decompression failed")?;
    if let Some(path) = &files.output {
        apply_mode(path, header.permissions)?;
    }

    info!("Compressed file size: {} bytes", stats.compressed);
    info!("Decompressed file size: {} bytes", stats.uncompressed);
    info!("Space saving: {:.2}%", stats.space_saving());
    Ok(())
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("cannot create output {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    })
}

/// Permission bits of `file`. Only `mode & 0o7777` is kept; the file-type
/// bits of `st_mode` are not recorded, and decode masks them off anyway.
#[cfg(unix)]
fn file_mode(file: &File) -> Option<u16> {
    use std::os::unix::fs::PermissionsExt;
    let mode = file.metadata().ok()?.permissions().mode();
    Some((mode & 0o7777) as u16)
}

#[cfg(not(unix))]
fn file_mode(_file: &File) -> Option<u16> {
    None
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u16) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(u32::from(mode) & 0o7777);
    std::fs::set_permissions(path, perms)
        .with_context(|| format!("cannot set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u16) -> anyhow::Result<()> {
    Ok(())
}
