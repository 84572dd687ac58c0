//! fsvisit - walk a directory tree and print what the walker yields.
//!
//! Usage:
//!   fsvisit [PATH]                 List every directory and file
//!   fsvisit [PATH] -c dir1         Only paths containing "dir1"
//!   fsvisit [PATH] -g '*.txt'      Only paths matching a glob
//!   fsvisit [PATH] -x target       Drop entries containing "target"
//!   fsvisit [PATH] --stop-at S     Stop at the first file containing S
//!   fsvisit [PATH] -f json         Emit paths and counters as JSON

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fsvisitor_core::WalkConfig;
use fsvisitor_walk::{DirectoryWalker, ItemEvent, WalkStats};

#[derive(Parser)]
#[command(
    name = "fsvisit",
    version,
    about = "Walk a directory tree depth-first and print the entries",
    long_about = "fsvisit walks a directory tree depth-first, subdirectories before files, \
                  and prints every entry that passes the filters.\n\n\
                  Excluded directories are still descended into; --stop-at ends the whole walk."
)]
struct Cli {
    /// Directory to walk (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Only yield paths containing this text (repeatable, any match)
    #[arg(short, long)]
    contains: Vec<String>,

    /// Only yield paths matching this glob (repeatable, any match)
    #[arg(short, long)]
    glob: Vec<String>,

    /// Drop entries whose path contains this text (repeatable)
    #[arg(short = 'x', long)]
    exclude: Vec<String>,

    /// Stop the walk at the first file whose path contains this text
    #[arg(long)]
    stop_at: Option<String>,

    /// Descend into symbolic links to directories
    #[arg(short = 'L', long)]
    follow_links: bool,

    /// Skip entries whose name starts with a dot
    #[arg(long)]
    no_hidden: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// JSON document written with `--format json`.
#[derive(Serialize)]
struct Report<'a> {
    root: &'a Path,
    paths: Vec<PathBuf>,
    stats: &'a WalkStats,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(&cli)?;
    let mut walker = DirectoryWalker::from_config(&config).context("Invalid walk configuration")?;
    register_controls(&mut walker, &cli.exclude, cli.stop_at.clone());

    let stdout = io::stdout();
    let stats = run_walk(&mut walker, cli.format, &mut stdout.lock())?;

    if cli.format == OutputFormat::Text {
        eprintln!("{}", summary(&stats));
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn build_config(cli: &Cli) -> Result<WalkConfig> {
    WalkConfig::builder()
        .root(cli.path.clone())
        .follow_links(cli.follow_links)
        .contains(cli.contains.clone())
        .globs(cli.glob.clone())
        .include_hidden(!cli.no_hidden)
        .build()
        .context("Invalid walk configuration")
}

fn matches_any(path: &Path, needles: &[String]) -> bool {
    let text = path.to_string_lossy();
    needles.iter().any(|n| text.contains(n.as_str()))
}

fn exclude_observer(needles: Rc<[String]>) -> impl FnMut(&mut ItemEvent) + 'static {
    move |event: &mut ItemEvent| {
        if matches_any(event.path(), &needles) {
            debug!(path = %event.path().display(), "excluded");
            event.exclude = true;
        }
    }
}

/// Wire `--exclude` and `--stop-at` up as observers.
fn register_controls(walker: &mut DirectoryWalker, exclude: &[String], stop_at: Option<String>) {
    if !exclude.is_empty() {
        let needles: Rc<[String]> = exclude.into();
        walker.on_directory_found(exclude_observer(Rc::clone(&needles)));
        walker.on_file_found(exclude_observer(needles));
    }

    if let Some(needle) = stop_at {
        walker.on_file_found(move |event| {
            if event.path().to_string_lossy().contains(needle.as_str()) {
                info!(path = %event.path().display(), "stop requested");
                event.stop = true;
            }
        });
    }
}

/// Drive the walk, writing paths to `out` as they are yielded (text) or
/// once the walk is over (json).
fn run_walk(
    walker: &mut DirectoryWalker,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<WalkStats> {
    let root = walker.root().to_path_buf();
    let mut paths = Vec::new();

    let mut walk = walker.walk();
    for item in walk.by_ref() {
        let path = item.with_context(|| format!("Walk of {} failed", root.display()))?;
        match format {
            OutputFormat::Text => writeln!(out, "{}", path.display())?,
            OutputFormat::Json => paths.push(path),
        }
    }
    let stats = walk.stats();

    if format == OutputFormat::Json {
        let report = Report {
            root: &root,
            paths,
            stats,
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    }

    Ok(stats.clone())
}

fn summary(stats: &WalkStats) -> String {
    let outcome = if stats.stopped {
        "stopped by observer"
    } else if stats.finished {
        "finished"
    } else {
        "incomplete"
    };
    format!(
        "{} of {} entries ({} dirs, {} files) in {:.2}s, {}",
        stats.yielded,
        stats.total_found(),
        stats.dirs_found,
        stats.files_found,
        stats.elapsed.as_secs_f64(),
        outcome
    )
}
