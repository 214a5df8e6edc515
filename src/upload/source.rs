//! Named records for the three input files.
//!
//! The legacy extracts carry no usable header, so every record is read by
//! column position here and nowhere else.
use crate::upload::result::{ErrorKind, InputKind, Result};
use csv::StringRecord;

/// Returns the 1-based line of a record, or `0` if it was built in memory.
fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |pos| pos.line())
}

/// Errors unless `record` has at least `needed` columns.
fn require_columns(record: &StringRecord, input: InputKind, needed: usize) -> Result<()> {
    if record.len() < needed {
        return Err(ErrorKind::ShortRow {
            input,
            line: line_of(record),
            found: record.len(),
            needed,
        });
    }
    Ok(())
}

fn column(record: &StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or_default().to_string()
}

/// A single row of the legacy blocking list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    pub hu_prefix: String,
    pub hu_suffix: String,
    pub block_type: String,
}

impl BlockRecord {
    pub fn from_csv_record(record: &StringRecord) -> Result<Self> {
        require_columns(record, InputKind::Blocks, 4)?;
        Ok(BlockRecord {
            hu_prefix: column(record, 0),
            hu_suffix: column(record, 1),
            block_type: column(record, 3),
        })
    }
    /// The unpadded HU key the block belongs to.
    pub fn short_key(&self) -> String {
        format!("{}{}", self.hu_prefix, self.hu_suffix)
    }
}

/// A single row of the material to quantity per HU list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QtyRecord {
    pub material: String,
    pub quantity: String,
    pub line: u64,
}

impl QtyRecord {
    pub fn from_csv_record(record: &StringRecord) -> Result<Self> {
        require_columns(record, InputKind::QtyPerHu, 2)?;
        Ok(QtyRecord {
            material: column(record, 0),
            quantity: column(record, 1),
            line: line_of(record),
        })
    }
}

/**
A single stock line of the legacy extract.

Columns 8 and 9 are optional in the file; the serial number is only read
when the upload is keyed by serial.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockRecord {
    pub hu_prefix: String,
    pub hu_suffix: String,
    pub gr_date: String,
    pub gr_time: String,
    pub bin: String,
    pub material: String,
    pub hu_type: String,
    pub quantity: String,
    pub serial: String,
    pub line: u64,
}

impl StockRecord {
    pub fn from_csv_record(record: &StringRecord) -> Result<Self> {
        require_columns(record, InputKind::Stock, 8)?;
        Ok(StockRecord {
            hu_prefix: column(record, 0),
            hu_suffix: column(record, 1),
            gr_date: column(record, 2),
            gr_time: column(record, 3),
            bin: column(record, 4),
            material: column(record, 5),
            hu_type: column(record, 6),
            quantity: column(record, 7),
            serial: column(record, 9),
            line: line_of(record),
        })
    }
}
