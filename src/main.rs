#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]
#![allow(clippy::struct_excessive_bools)]

use clap::{Parser, ValueHint};
use scandir::{ScanError, Walk, scandir};
use std::{
    cell::Cell,
    io::{self, BufWriter, Write as _},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
/// Walk a directory tree with scandir and report what was found.
pub struct Args {
    #[arg(
        value_name = "PATH",
        help = "Directory to walk (defaults to the current directory)",
        value_hint = ValueHint::DirPath,
        default_value = ".",
        index = 1
    )]
    directory: PathBuf,

    #[arg(
        short = 'b',
        long = "bottom-up",
        help = "Visit subdirectories before their parent"
    )]
    bottom_up: bool,

    #[arg(
        short = 'L',
        long = "follow-links",
        help = "Descend into symlinks to directories"
    )]
    follow_links: bool,

    #[arg(
        short = 'H',
        long = "skip-hidden",
        conflicts_with = "bottom_up",
        help = "Do not descend into directories starting with a dot"
    )]
    skip_hidden: bool,

    #[arg(short = 'l', long = "list", help = "Print every directory visited")]
    list: bool,

    #[arg(
        short = 'c',
        long = "compare",
        help = "Also time a std::fs::read_dir walk of the same tree"
    )]
    compare: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Log more, repeat for more detail (RUST_LOG overrides)"
    )]
    verbose: u8,
}

#[derive(Debug, Default)]
struct Totals {
    dirs: usize,
    files: usize,
    errors: usize,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn walk_tree(args: &Args, out: &mut impl io::Write) -> io::Result<Totals> {
    let errors = Cell::new(0);
    let mut walk = Walk::builder(&args.directory)
        .topdown(!args.bottom_up)
        .follow_links(args.follow_links)
        .on_error(|error: ScanError| {
            tracing::warn!(%error, "skipped");
            errors.set(errors.get() + 1);
        })
        .build();

    let mut totals = Totals::default();
    while let Some(level) = walk.next_level() {
        if args.skip_hidden {
            level
                .dirnames
                .retain(|name| name.as_encoded_bytes().first() != Some(&b'.'));
        }
        totals.dirs += level.dirnames.len();
        totals.files += level.filenames.len();
        if args.list {
            writeln!(out, "{}", level.path.display())?;
        }
    }
    drop(walk);

    totals.errors = errors.get();
    Ok(totals)
}

/// Sum of the `lstat` sizes of every non-directory below `path`, symlinks not followed.
fn tree_size(path: &Path, skip_hidden: bool) -> u64 {
    let entries = match scandir(path) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::debug!(%error, "not counted");
            return 0;
        }
    };

    let mut total = 0;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                tracing::debug!(%error, "listing cut short");
                break;
            }
        };
        if skip_hidden && entry.is_hidden() {
            continue;
        }
        if entry.is_dir() {
            total += tree_size(&entry.path(), skip_hidden);
        } else if let Ok(stat) = entry.lstat() {
            total += stat.size;
        }
    }
    total
}

/// The same walk done with `std::fs::read_dir`, typing each entry through `symlink_metadata`.
fn std_walk(path: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(path) else {
        return 0;
    };
    let mut count = 0;
    for entry in entries.flatten() {
        count += 1;
        let entry_path = entry.path();
        if std::fs::symlink_metadata(&entry_path).is_ok_and(|metadata| metadata.is_dir()) {
            count += std_walk(&entry_path);
        }
    }
    count
}

fn timed<T>(run: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = run();
    (value, start.elapsed())
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // fail early with the real errno rather than an empty report
    scandir(&args.directory)?.close()?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let (totals, walk_time) = timed(|| walk_tree(&args, &mut out));
    let totals = totals?;
    let size = tree_size(&args.directory, args.skip_hidden);

    writeln!(
        out,
        "{} directories, {} files, {size} bytes, {} errors",
        totals.dirs, totals.files, totals.errors
    )?;
    writeln!(out, "scandir walk: {walk_time:.2?}")?;

    if args.compare {
        let (count, std_time) = timed(|| std_walk(&args.directory));
        writeln!(out, "std read_dir walk: {std_time:.2?} ({count} entries)")?;
        if !walk_time.is_zero() {
            writeln!(
                out,
                "scandir was {:.1}x as fast",
                std_time.as_secs_f64() / walk_time.as_secs_f64()
            )?;
        }
    }

    out.flush()
}
