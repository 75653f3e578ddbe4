/// Flat serialisation of a record tree for export.
///
/// Rows are emitted depth-first, pre-order, over the *entire* backing tree —
/// presentation-layer caps never apply here. CSV goes through the `csv`
/// writer so paths with commas or quotes stay intact; the JSON form is the
/// record tree itself, serialised as-is.
use crate::model::{format_size, DirectoryRecord};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode CSV row: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to encode JSON tree: {0}")]
    Json(#[from] serde_json::Error),
}

/// One flat row of the tabular export.
///
/// Field renames define the CSV header:
/// `Path,Name,Size (Bytes),Size,Files,Folders,Percentage`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Size (Bytes)")]
    pub size_bytes: u64,
    #[serde(rename = "Size")]
    pub size: String,
    #[serde(rename = "Files")]
    pub files: u64,
    #[serde(rename = "Folders")]
    pub folders: u64,
    #[serde(rename = "Percentage")]
    pub percentage: String,
}

impl ExportRow {
    fn from_record(record: &DirectoryRecord) -> Self {
        Self {
            path: record.path.display().to_string(),
            name: record.name.to_string(),
            size_bytes: record.size,
            size: format_size(record.size),
            files: record.file_count,
            folders: record.folder_count,
            percentage: format!("{:.2}", record.percentage),
        }
    }
}

/// Flatten the whole tree into rows, depth-first pre-order.
pub fn export_rows(record: &DirectoryRecord) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    collect_rows(record, &mut rows);
    rows
}

fn collect_rows(record: &DirectoryRecord, rows: &mut Vec<ExportRow>) {
    rows.push(ExportRow::from_record(record));
    for child in &record.children {
        collect_rows(child, rows);
    }
}

/// Write the tree as CSV. Rows stream straight into the writer rather
/// than buffering the whole table.
pub fn write_csv<W: Write>(record: &DirectoryRecord, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    write_csv_node(record, &mut csv_writer)?;
    csv_writer.flush()?;
    Ok(())
}

fn write_csv_node<W: Write>(
    record: &DirectoryRecord,
    writer: &mut csv::Writer<W>,
) -> Result<(), ExportError> {
    writer.serialize(ExportRow::from_record(record))?;
    for child in &record.children {
        write_csv_node(child, writer)?;
    }
    Ok(())
}

/// Write the tree as CSV to a file.
pub fn write_csv_file(record: &DirectoryRecord, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(record, BufWriter::new(file))
}

/// Write the tree as pretty-printed JSON.
pub fn write_json<W: Write>(record: &DirectoryRecord, writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, record)?;
    Ok(())
}

/// Write the tree as pretty-printed JSON to a file.
pub fn write_json_file(record: &DirectoryRecord, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_json(record, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Timestamped default file name for a CSV export,
/// e.g. `TreeScope_20260806_142500.csv`.
pub fn default_export_file_name() -> String {
    format!(
        "TreeScope_{}.csv",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}
