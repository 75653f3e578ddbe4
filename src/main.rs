//! TreeScope — directory tree size analyser.
//!
//! Thin CLI frontend. All scanning, aggregation, filtering, sorting, and
//! export logic lives in the `treescope-core` crate.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use crossbeam_channel::Receiver;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use treescope_core::export;
use treescope_core::filter::{self, FilteredNode};
use treescope_core::model::{format_count, format_size, DirectoryRecord};
use treescope_core::scanner::{ScanProgress, ScanSession};
use treescope_core::sort::{self, SortKey};
use treescope_core::view::ViewNode;

/// Child ordering applied before display and export.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum SortOrder {
    /// Largest subtree first.
    #[default]
    Size,
    /// Alphabetical.
    Name,
    /// Most files first.
    Files,
}

impl From<SortOrder> for SortKey {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Size => SortKey::SizeDesc,
            SortOrder::Name => SortKey::NameAsc,
            SortOrder::Files => SortKey::FileCountDesc,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "treescope")]
#[command(about = "Scan a directory tree and report where the bytes went")]
#[command(version)]
struct Args {
    /// Directory to scan
    path: PathBuf,

    /// Child ordering for display and export
    #[arg(short, long, value_enum, default_value_t = SortOrder::Size)]
    sort: SortOrder,

    /// Show only entries whose name contains this text, plus their ancestors
    #[arg(short, long)]
    filter: Option<String>,

    /// Descend only N levels in the printed listing
    #[arg(short = 'L', long = "level", default_value_t = 2)]
    level: usize,

    /// Write the full tree (no display caps) to this file
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Export as pretty JSON instead of CSV
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("cannot resolve {}", args.path.display()))?;

    let session = ScanSession::new();
    let progress = session
        .start(root.clone())
        .with_context(|| format!("cannot scan {}", root.display()))?;

    let mut record = wait_for_tree(&progress)?;
    session.shutdown();

    sort::sort_by(&mut record, args.sort.into());

    if let Some(export_path) = args.export.as_deref() {
        if args.json {
            export::write_json_file(&record, export_path)
        } else {
            export::write_csv_file(&record, export_path)
        }
        .with_context(|| format!("cannot export to {}", export_path.display()))?;
        eprintln!(
            "Exported {} rows to {}",
            format_count(record.folder_count + 1),
            export_path.display()
        );
    }

    match args.filter.as_deref() {
        Some(query) if !query.trim().is_empty() => match filter::filter(&record, query) {
            Some(filtered) => print_filtered(&filtered, 0),
            None => println!("No entries match \"{query}\""),
        },
        _ => print_tree(&record, args.level),
    }

    println!(
        "\n{}  {} files, {} folders",
        format_size(record.size),
        format_count(record.file_count),
        format_count(record.folder_count)
    );

    Ok(())
}

/// Drain progress events until the scan ends, echoing throttled status
/// lines to stderr. Returns the completed tree.
fn wait_for_tree(progress: &Receiver<ScanProgress>) -> anyhow::Result<DirectoryRecord> {
    let mut last_status = Instant::now() - Duration::from_secs(1);

    for event in progress.iter() {
        match event {
            ScanProgress::Status { message } => {
                if last_status.elapsed() >= Duration::from_millis(100) {
                    eprint!("\r{message:<72.72}");
                    let _ = io::stderr().flush();
                    last_status = Instant::now();
                }
            }
            ScanProgress::Subtree { .. } => {}
            ScanProgress::Complete {
                record,
                duration,
                error_count,
            } => {
                eprint!("\r{:<72}\r", "");
                eprintln!(
                    "Scanned {} files, {} folders in {:.2?} ({} errors)",
                    format_count(record.file_count),
                    format_count(record.folder_count),
                    duration,
                    error_count
                );
                return Ok(record);
            }
            ScanProgress::Cancelled => anyhow::bail!("scan was cancelled"),
        }
    }

    anyhow::bail!("scanner exited without a result")
}

/// Print the tree through the lazy view layer, so a directory with a
/// million children renders its top entries plus an overflow line instead
/// of flooding the terminal.
fn print_tree(record: &DirectoryRecord, max_depth: usize) {
    let mut root = ViewNode::new(record);
    print_view(&mut root, 0, max_depth);
}

fn print_view(node: &mut ViewNode<'_>, depth: usize, max_depth: usize) {
    let indent = depth * 2;
    match node.record() {
        Some(record) => println!(
            "{:indent$}{}  {} ({} files, {:.1}%)",
            "",
            record.name,
            format_size(record.size),
            format_count(record.file_count),
            record.percentage,
        ),
        None => println!("{:indent$}{}", "", node.label()),
    }

    if depth >= max_depth {
        return;
    }
    node.expand();
    for child in node.children_mut() {
        print_view(child, depth + 1, max_depth);
    }
}

fn print_filtered(node: &FilteredNode<'_>, depth: usize) {
    let record = node.record();
    println!(
        "{:indent$}{}  {} ({} files, {:.1}%)",
        "",
        record.name,
        format_size(record.size),
        format_count(record.file_count),
        record.percentage,
        indent = depth * 2
    );

    // Pass-through subtrees are unfiltered; printing stops at the match.
    if let FilteredNode::Synthetic { children, .. } = node {
        for child in children {
            print_filtered(child, depth + 1);
        }
    }
}
