use crate::upload::numbers::{HandlingUnit, NumbersProfile};
use crate::upload::profile::{FieldDefaults, Settings, UploadConfig};
use crate::upload::reference::{BlockIndex, QtyPerUnitIndex};
use crate::upload::resolve::{resolve, Placement};
use crate::upload::result::{ErrorKind, Result};
use crate::upload::row::{Field, OutputRow, PostingType, RowBuilder};
use crate::upload::source::StockRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// The two reference lists, loaded once before the extract is read.
#[derive(Debug, Default)]
pub struct ReferenceData {
    pub blocks: BlockIndex,
    pub qty_per_hu: QtyPerUnitIndex,
}

/// Why a stock line produced no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Quantity empty or `0`.
    NoQuantity,
    NegativeQuantity,
    UnreadableQuantity,
    /// Keyed by serial, but the line has none.
    NoSerial,
}

/// Rows written per posting type.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RowCounts {
    pub hu: usize,
    pub sub_hu: usize,
    pub quant: usize,
    pub serial: usize,
}

impl RowCounts {
    fn count(&mut self, posting: PostingType) {
        match posting {
            PostingType::Hu => self.hu += 1,
            PostingType::SubHu => self.sub_hu += 1,
            PostingType::Quant => self.quant += 1,
            PostingType::Serial => self.serial += 1,
        }
    }
    pub fn total(&self) -> usize {
        self.hu + self.sub_hu + self.quant + self.serial
    }
}

/// What happened to the stock lines of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub records: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
    pub rows: RowCounts,
}

impl RunReport {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Reads the stock quantity of a line; empty counts as `0`.
fn parse_quantity(raw: &str) -> std::result::Result<u64, SkipReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SkipReason::NoQuantity);
    }
    match trimmed.parse::<i64>() {
        Ok(0) => Err(SkipReason::NoQuantity),
        Ok(qty) => u64::try_from(qty).map_err(|_| SkipReason::NegativeQuantity),
        Err(_) => Err(SkipReason::UnreadableQuantity),
    }
}

/**
Turns stock lines into upload rows for one profile.

The generator owns the row numbering and both number ranges for the whole
run; feed it the lines in file order through [`EntryGenerator::process`] or
all at once through [`EntryGenerator::run`].
*/
#[derive(Debug)]
pub struct EntryGenerator<'a> {
    config: &'a UploadConfig,
    defaults: &'a FieldDefaults,
    data: &'a ReferenceData,
    hu_numbers: NumbersProfile,
    serial_numbers: Option<NumbersProfile>,
    rows: RowBuilder,
    report: RunReport,
}

impl<'a> EntryGenerator<'a> {
    /**
    Creates a generator for `config`, taking the number ranges from
    `settings`.

    # Errors

    Returns [`ErrorKind::MissingSerialRange`] if the profile generates serial
    numbers and `settings` has no serial number range.
    */
    pub fn new(
        config: &'a UploadConfig,
        settings: &'a Settings,
        data: &'a ReferenceData,
    ) -> Result<Self> {
        if config.generate_serial && settings.serial_numbers.is_none() {
            return Err(ErrorKind::MissingSerialRange {
                profile: config.name.clone(),
            });
        }
        Ok(EntryGenerator {
            config,
            defaults: &settings.defaults,
            data,
            hu_numbers: settings.hu_numbers.clone(),
            serial_numbers: settings.serial_numbers.clone(),
            rows: RowBuilder::default(),
            report: RunReport::default(),
        })
    }
    /// Processes every line in order and returns all rows of the run.
    pub fn run<I>(&mut self, records: I) -> Result<Vec<OutputRow>>
    where
        I: IntoIterator<Item = StockRecord>,
    {
        let mut rows = Vec::new();
        for rec in records {
            rows.extend(self.process(&rec)?);
        }
        Ok(rows)
    }
    /// Returns the rows for a single stock line.
    pub fn process(&mut self, rec: &StockRecord) -> Result<Vec<OutputRow>> {
        self.report.records += 1;
        let rows = if self.config.consider_serial {
            self.entry_per_serial(rec)
        } else {
            self.entries_per_hu(rec)?
        };
        for row in &rows {
            self.report.rows.count(row.posting());
        }
        trace!(line = rec.line, rows = rows.len(), "stock line processed");
        Ok(rows)
    }
    pub fn report(&self) -> &RunReport {
        &self.report
    }
    pub fn into_report(self) -> RunReport {
        self.report
    }

    fn skip(&mut self, rec: &StockRecord, reason: SkipReason) {
        debug!(line = rec.line, ?reason, quantity = %rec.quantity, "stock line skipped");
        *self.report.skipped.entry(reason).or_default() += 1;
    }

    fn placement(&self, rec: &StockRecord, hu: &HandlingUnit) -> Result<Placement> {
        if self.config.consider_bin {
            return Ok(Placement {
                stock_cat: self.defaults.stock_cat.clone(),
                bin: rec.bin.clone(),
            });
        }
        resolve(
            hu.short_key(),
            &self.data.blocks,
            &self.config.standard_bin,
            &self.defaults.stock_cat,
        )
    }

    /// An HU header (`posting` Hu) or generated sub HU header (SubHu).
    fn hu_row(
        &mut self,
        posting: PostingType,
        ident: &str,
        top: &HandlingUnit,
        rec: &StockRecord,
        placement: &Placement,
    ) -> OutputRow {
        let mut row = self.rows.start(posting);
        row.set(Field::Mandt, self.defaults.mandt.as_str())
            .set(Field::HuIdent, ident)
            .set(Field::Lgpla, placement.bin.as_str())
            .set(Field::HuTyp, rec.hu_type.as_str())
            .set(Field::TopHuIdent, top.ident())
            .set(Field::Pmat, self.defaults.pmat.as_str())
            .set(Field::ExtNo, "X");
        row
    }

    fn quant_row(
        &mut self,
        quantity: u64,
        ident: &str,
        top: &HandlingUnit,
        rec: &StockRecord,
        placement: &Placement,
    ) -> OutputRow {
        let defaults = self.defaults;
        let mut row = self.rows.start(PostingType::Quant);
        row.set(Field::Mandt, defaults.mandt.as_str())
            .set(Field::Matnr, rec.material.as_str())
            .set(Field::Owner, defaults.owner.as_str())
            .set(Field::OwnerRole, defaults.owner_role.as_str())
            .set(Field::Cat, placement.stock_cat.as_str())
            .set(Field::Entitled, defaults.entitled.as_str())
            .set(Field::EntitledRole, defaults.entitled_role.as_str())
            .set(Field::Quan, quantity.to_string())
            .set(Field::Unit, defaults.unit.as_str())
            .set(Field::Lgpla, placement.bin.as_str())
            .set(Field::GrDate, rec.gr_date.as_str())
            .set(Field::GrTime, rec.gr_time.as_str())
            .set(Field::Vfdat, rec.gr_date.as_str())
            .set(Field::HuIdent, ident)
            .set(Field::TopHuIdent, top.ident());
        row
    }

    /// A serial row pointing at `anchor`, or at itself without one.
    fn serial_row(&mut self, serial: &str, anchor: Option<u64>) -> OutputRow {
        let mut row = self.rows.start(PostingType::Serial);
        let ref_row = anchor.unwrap_or_else(|| row.number());
        row.set(Field::Mandt, self.defaults.mandt.as_str())
            .set(Field::SerNr, serial)
            .set(Field::RefRow, ref_row.to_string());
        row
    }

    fn entries_per_hu(&mut self, rec: &StockRecord) -> Result<Vec<OutputRow>> {
        let quantity = match parse_quantity(&rec.quantity) {
            Ok(qty) => qty,
            Err(reason) => {
                self.skip(rec, reason);
                return Ok(Vec::new());
            }
        };
        let hu = HandlingUnit::new(self.hu_numbers.length(), &rec.hu_prefix, &rec.hu_suffix);
        let placement = self.placement(rec, &hu)?;
        let mut entries = Vec::new();

        if self.config.record_hu {
            let row = self.hu_row(PostingType::Hu, hu.ident(), &hu, rec, &placement);
            entries.push(row);
        }

        // Serials refer back to the last quantity row of the line.
        let mut anchor = None;
        let per_unit = if self.config.generate_hu {
            self.data.qty_per_hu.qty_per_unit(&rec.material)
        } else {
            0
        };

        if per_unit > 0 {
            let mut remaining = quantity;
            while remaining > 0 {
                let chunk = remaining.min(per_unit);
                let generated = self.hu_numbers.next_number();
                let sub = self.hu_row(PostingType::SubHu, &generated, &hu, rec, &placement);
                entries.push(sub);
                let quant = self.quant_row(chunk, &generated, &hu, rec, &placement);
                anchor = Some(quant.number());
                entries.push(quant);
                remaining -= chunk;
            }
        } else if self.config.record_quant {
            let quant = self.quant_row(quantity, hu.ident(), &hu, rec, &placement);
            anchor = Some(quant.number());
            entries.push(quant);
        }

        if self.config.generate_serial {
            let count = match self.config.serial_limit {
                Some(limit) => quantity.min(limit as u64),
                None => quantity,
            };
            let range = self
                .serial_numbers
                .as_mut()
                .ok_or_else(|| ErrorKind::MissingSerialRange {
                    profile: self.config.name.clone(),
                })?;
            let serials = (0..count).map(|_| range.next_number()).collect::<Vec<_>>();
            for serial in serials {
                entries.push(self.serial_row(&serial, anchor));
            }
        }
        Ok(entries)
    }

    fn entry_per_serial(&mut self, rec: &StockRecord) -> Vec<OutputRow> {
        if let Err(reason) = parse_quantity(&rec.quantity) {
            self.skip(rec, reason);
            return Vec::new();
        }
        let serial = rec.serial.trim();
        if serial.is_empty() {
            self.skip(rec, SkipReason::NoSerial);
            return Vec::new();
        }
        vec![self.serial_row(serial, None)]
    }
}
