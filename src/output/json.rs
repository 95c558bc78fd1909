//! JSON export of crawl reports

use crate::output::OutputResult;
use crate::report::CrawlReport;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes the report as pretty-printed JSON
///
/// Parent directories are created when missing; an existing file is replaced.
pub fn write_json_report(report: &CrawlReport, output_path: &Path) -> OutputResult<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::debug!("Wrote {} pages to {}", report.pages.len(), output_path.display());
    Ok(())
}

/// Reads a report previously written by [`write_json_report`]
pub fn read_json_report(input_path: &Path) -> OutputResult<CrawlReport> {
    let reader = BufReader::new(File::open(input_path)?);
    Ok(serde_json::from_reader(reader)?)
}
