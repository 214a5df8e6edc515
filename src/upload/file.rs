use crate::upload::result::Result;
use crate::upload::row::{Field, OutputRow};
use crate::upload::source::StockRecord;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A reader over a legacy extract. The header line is skipped and rows may
/// differ in length.
pub fn reader<P>(path: P, delimiter: u8) -> Result<csv::Reader<File>>
where
    P: AsRef<Path>,
{
    Ok(csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?)
}

/// Reads every stock line of the extract at `path`.
pub fn read_stock<P>(path: P, delimiter: u8) -> Result<Vec<StockRecord>>
where
    P: AsRef<Path>,
{
    let mut records = Vec::new();
    for wrapped_record in reader(path, delimiter)?.into_records() {
        records.push(StockRecord::from_csv_record(&wrapped_record?)?);
    }
    Ok(records)
}

/// `stock_upload_<profile>_<YYYYMMDDHHMMSS>.csv` inside `dir`.
pub fn upload_file_path(dir: &Path, profile: &str, at: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "stock_upload_{profile}_{}.csv",
        at.format("%Y%m%d%H%M%S")
    ))
}

/**
Writes the upload file: a UTF-8 BOM, the header line, then `rows`.

The directory is created if missing.
*/
pub fn write_upload<P>(path: P, delimiter: u8, rows: &[OutputRow]) -> Result<()>
where
    P: AsRef<Path>,
{
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(file);
    writer.write_record(Field::header())?;
    for row in rows {
        writer.write_record(row.as_record())?;
    }
    writer.flush()?;
    Ok(())
}
