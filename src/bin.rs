use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use rtar_nav::{Archive, Error, Options, ValidationScan, DEFAULT_MAX_LINK_HOPS};

/// rtarnav
#[derive(Debug, Parser)]
#[clap(name = "rtarnav", version)]
pub struct App {
    /// USTAR archive to inspect
    archive: PathBuf,

    /// Maximum number of symbolic links followed while resolving a path
    #[clap(long, default_value_t = DEFAULT_MAX_LINK_HOPS)]
    max_link_hops: usize,

    /// Fail validation when the archive has no end-of-archive block
    #[clap(long)]
    strict: bool,

    /// Validate every block instead of every entry header
    #[clap(long)]
    block_scan: bool,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Checks the archive headers and prints their count
    Check,
    /// Prints whether an entry exists and its type
    Stat {
        path: String,
    },
    /// Lists the immediate children of a directory
    Ls {
        path: String,
        #[clap(long, default_value_t = 500)]
        capacity: usize,
    },
    /// Writes a file range to stdout
    Cat {
        path: String,
        #[clap(long, default_value_t = 0)]
        offset: u64,
        /// Bytes to read, the rest of the file when omitted
        #[clap(long)]
        length: Option<usize>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let args = App::parse();
    let options = Options::default()
        .with_max_link_hops(args.max_link_hops)
        .with_require_terminator(args.strict)
        .with_scan(if args.block_scan { ValidationScan::Blocks } else { ValidationScan::Entries });

    let file = File::open(&args.archive)
        .with_context(|| format!("opening {}", args.archive.display()))?;
    let mut archive = Archive::with_options(BufReader::new(file), options);

    match args.cmd {
        Command::Check => match archive.validate() {
            Ok(count) => println!("valid archive, {} headers", count),
            Err(err @ (Error::BadMagic { .. } | Error::BadVersion { .. } | Error::BadChecksum { .. })) => {
                println!("invalid archive ({}): {}", err.code(), err);
                std::process::exit(1);
            }
            Err(err) => return Err(err).context("validating archive"),
        },
        Command::Stat { path } => {
            let kind = if archive.is_directory(&path)? {
                "directory"
            } else if archive.is_file(&path)? {
                "regular file"
            } else if archive.is_symlink(&path)? {
                "symbolic link"
            } else if archive.exists(&path)? {
                "other"
            } else {
                "missing"
            };
            println!("{}: {}", path, kind);
        }
        Command::Ls { path, capacity } => {
            let listing = archive.list(&path, capacity)?;
            for entry in &listing.entries {
                println!("{}", entry);
            }
            if listing.is_truncated() {
                eprintln!("{} of {} entries listed", listing.entries.len(), listing.total);
            }
        }
        Command::Cat { path, offset, length } => {
            let mut stdout = std::io::stdout().lock();
            let mut buf = vec![0u8; length.unwrap_or(64 * 1024)];
            let mut offset = offset;
            loop {
                let read = archive.read(&path, offset, &mut buf)?;
                stdout.write_all(&buf[..read.copied])?;
                offset += read.copied as u64;
                if length.is_some() || read.is_complete() || read.copied == 0 {
                    break;
                }
            }
            stdout.flush()?;
        }
    }
    Ok(())
}
