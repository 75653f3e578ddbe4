/// Iterative directory-tree walk with bottom-up aggregation.
///
/// Traversal uses an explicit frame stack instead of recursion so that
/// pathological nesting depth cannot overflow the call stack. Each frame is
/// processed twice: once on the way down (`Pre`, enumerate own files and push
/// child frames) and once on the way up (`Post`, fold completed children into
/// the frame's record). A directory's record is therefore complete before its
/// parent aggregates it.
use crate::model::DirectoryRecord;
use crate::scanner::CancelToken;
use compact_str::CompactString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Counters reported alongside a completed walk.
#[derive(Debug, Clone, Copy)]
pub struct ScanStats {
    /// Wall-clock time of the whole walk.
    pub duration: Duration,
    /// Entries that failed to enumerate or stat and were recovered locally.
    pub error_count: u64,
}

/// Terminal result of a walk.
///
/// Cancellation discards everything: there is no partially aggregated root.
#[derive(Debug)]
pub enum ScanOutcome {
    /// The walk finished; `record` is the fully aggregated tree.
    Completed {
        record: DirectoryRecord,
        stats: ScanStats,
    },
    /// Cancellation was signalled before the walk finished.
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Pre,
    Post,
}

/// One directory on the work stack.
struct Frame {
    path: PathBuf,
    record: DirectoryRecord,
    state: VisitState,
    /// Child records, collected as the child frames above this one pop.
    completed: Vec<DirectoryRecord>,
}

impl Frame {
    fn pre_visit(path: PathBuf) -> Self {
        Self {
            record: DirectoryRecord::new_dir(entry_name(&path), path.clone()),
            path,
            state: VisitState::Pre,
            completed: Vec::new(),
        }
    }
}

/// Walk `root` and aggregate a [`DirectoryRecord`] tree.
///
/// `on_partial` fires once per directory, strictly post-order, with the
/// directory's finished record. `on_status` fires once per directory in
/// traversal (pre-visit) order. Both are called synchronously on the walking
/// thread; aggregation never depends on what the callbacks do.
///
/// Cancellation is checked once per loop step — at worst once per directory
/// boundary — so latency is bounded by a single directory enumeration.
pub(crate) fn walk_tree<P, S>(
    root: &Path,
    cancel: &CancelToken,
    mut on_partial: P,
    mut on_status: S,
) -> ScanOutcome
where
    P: FnMut(&DirectoryRecord),
    S: FnMut(&Path),
{
    let start = Instant::now();
    let mut error_count: u64 = 0;

    let mut stack = vec![Frame::pre_visit(root.to_path_buf())];

    let (record, stats) = loop {
        if cancel.is_cancelled() {
            debug!("walk of {} cancelled after {:?}", root.display(), start.elapsed());
            return ScanOutcome::Aborted;
        }

        // The stack is never empty here: the root frame only leaves it
        // through the break below.
        let top = stack.len() - 1;

        if stack[top].state == VisitState::Pre {
            // First time on top. Flip to Post: the next time this frame
            // surfaces, every child pushed below has popped, and the frame
            // aggregates instead of re-enumerating.
            stack[top].state = VisitState::Post;
            on_status(&stack[top].path);

            let subdirs = enumerate_directory(&mut stack[top], &mut error_count);
            stack.extend(subdirs.into_iter().map(Frame::pre_visit));
        } else {
            let mut frame = stack.swap_remove(top);
            finish_directory(&mut frame);
            on_partial(&frame.record);

            match stack.last_mut() {
                Some(parent) => parent.completed.push(frame.record),
                None => {
                    break (
                        frame.record,
                        ScanStats {
                            duration: start.elapsed(),
                            error_count,
                        },
                    )
                }
            }
        }
    };

    debug!(
        "walk of {} complete: {} files, {} folders, {} errors in {:?}",
        root.display(),
        record.file_count,
        record.folder_count,
        stats.error_count,
        stats.duration
    );

    ScanOutcome::Completed { record, stats }
}

/// Enumerate the directory behind `frame`: fold direct files into the
/// frame's record and return the subdirectory paths to descend into.
///
/// A whole-directory enumeration failure annotates the record's name and
/// leaves it empty; per-entry failures skip just the offending entry.
/// Symlinks are neither descended nor counted — following them would
/// double-count across mount points or loop on cycles.
fn enumerate_directory(frame: &mut Frame, error_count: &mut u64) -> Vec<PathBuf> {
    let mut subdirs = Vec::new();

    let entries = match fs::read_dir(&frame.path) {
        Ok(entries) => entries,
        Err(err) => {
            *error_count += 1;
            frame.record.mark_access_denied();
            warn!("cannot enumerate {}: {}", frame.path.display(), err);
            return subdirs;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                *error_count += 1;
                warn!("skipping entry in {}: {}", frame.path.display(), err);
                continue;
            }
        };

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                *error_count += 1;
                warn!("skipping {}: {}", entry.path().display(), err);
                continue;
            }
        };

        if file_type.is_symlink() {
            continue;
        }

        if file_type.is_dir() {
            subdirs.push(entry.path());
        } else {
            match entry.metadata() {
                Ok(metadata) => {
                    frame.record.size += metadata.len();
                    frame.record.file_count += 1;
                }
                Err(err) => {
                    *error_count += 1;
                    warn!("cannot stat {}: {}", entry.path().display(), err);
                }
            }
        }
    }

    subdirs
}

/// Fold the completed children into `frame`'s record, order the child list,
/// and fix up each child's share of this directory's size.
fn finish_directory(frame: &mut Frame) {
    for child in std::mem::take(&mut frame.completed) {
        frame.record.size += child.size;
        frame.record.file_count += child.file_count;
        frame.record.folder_count += child.folder_count + 1;
        frame.record.children.push(child);
    }

    // Default presentation order: largest subtree first, path as the
    // deterministic tie-break.
    frame
        .record
        .children
        .sort_unstable_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));

    if frame.record.size > 0 {
        let parent_size = frame.record.size as f64;
        for child in &mut frame.record.children {
            child.percentage = child.size as f64 / parent_size * 100.0;
        }
    }
}

/// Display name for an entry: the last path component, or the path itself
/// for roots like `/` and `C:\` that have none.
fn entry_name(path: &Path) -> CompactString {
    if let Some(name) = path.file_name() {
        return CompactString::new(name.to_string_lossy());
    }
    let display = path.to_string_lossy();
    let trimmed = display.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        CompactString::new(display.as_ref())
    } else {
        CompactString::new(trimmed)
    }
}
