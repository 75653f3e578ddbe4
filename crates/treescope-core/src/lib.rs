/// TreeScope Core — directory scanning, aggregation, and export.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be reusable across different frontends (CLI, GUI, TUI).
///
/// # Modules
///
/// - [`model`] — The aggregated [`model::DirectoryRecord`] tree and
///   size/count formatting.
/// - [`scanner`] — Iterative background scanning with cooperative
///   cancellation and progress reporting.
/// - [`view`] — Lazy, capped materialisation of tree nodes for display.
/// - [`filter`] — Non-destructive substring-search projections.
/// - [`sort`] — Recursive in-place reordering of the whole tree.
/// - [`export`] — Flat CSV/JSON serialisation of the full tree.
pub mod export;
pub mod filter;
pub mod model;
pub mod scanner;
pub mod sort;
pub mod view;
