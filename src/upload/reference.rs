use crate::upload::file;
use crate::upload::result::{ErrorKind, Result};
use crate::upload::source::{BlockRecord, QtyRecord};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/**
Block codes recorded per handling unit.

Keyed by the HU short key. Codes keep the order they appear in the blocking
list and repeated codes are kept, so the first entry is always the first
relevant block seen for the HU.
*/
#[derive(Debug, Default, Clone)]
pub struct BlockIndex {
    blocks: HashMap<String, Vec<String>>,
}

impl BlockIndex {
    /// Builds the index, keeping only codes contained in `relevant`.
    pub fn from_records<I>(records: I, relevant: &[String]) -> Self
    where
        I: IntoIterator<Item = BlockRecord>,
    {
        let mut index = Self::default();
        for rec in records {
            if !relevant.contains(&rec.block_type) {
                continue;
            }
            index
                .blocks
                .entry(rec.short_key())
                .or_default()
                .push(rec.block_type);
        }
        index
    }
    /**
    Reads the blocking list at `path`.

    # Errors

    Fails if the file cannot be read or a row has fewer than 4 columns.
    */
    pub fn from_csv_path<P>(path: P, delimiter: u8, relevant: &[String]) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let mut records = Vec::new();
        for wrapped_record in file::reader(path, delimiter)?.into_records() {
            records.push(BlockRecord::from_csv_record(&wrapped_record?)?);
        }
        let read = records.len();
        let index = Self::from_records(records, relevant);
        info!(rows = read, blocked_hus = index.len(), "blocking reference loaded");
        if index.is_empty() {
            warn!("no relevant blocks found, every HU goes to the standard bin");
        }
        Ok(index)
    }
    /// The block codes recorded for `short_key`, in file order.
    pub fn get(&self, short_key: &str) -> Option<&[String]> {
        self.blocks.get(short_key).map(Vec::as_slice)
    }
    pub fn len(&self) -> usize {
        self.blocks.len()
    }
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Pieces per handling unit, keyed by material.
#[derive(Debug, Default, Clone)]
pub struct QtyPerUnitIndex {
    qty: HashMap<String, u64>,
}

impl QtyPerUnitIndex {
    /**
    Builds the index from the quantity reference.

    An empty quantity is stored as `0`, which turns off splitting for the
    material.

    # Errors

    A material listed twice is [`ErrorKind::DuplicateMaterial`]; splitting on
    an ambiguous quantity would silently produce wrong HUs. A quantity that is
    not a whole number is [`ErrorKind::InvalidQtyPerHu`].
    */
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = QtyRecord>,
    {
        let mut index = Self::default();
        for rec in records {
            if index.qty.contains_key(&rec.material) {
                return Err(ErrorKind::DuplicateMaterial {
                    material: rec.material,
                    line: rec.line,
                });
            }
            let trimmed = rec.quantity.trim();
            let qty = if trimmed.is_empty() {
                0
            } else {
                trimmed
                    .parse::<u64>()
                    .map_err(|_| ErrorKind::InvalidQtyPerHu {
                        material: rec.material.clone(),
                        value: rec.quantity.clone(),
                        line: rec.line,
                    })?
            };
            index.qty.insert(rec.material, qty);
        }
        Ok(index)
    }
    /// Reads the quantity reference at `path`.
    pub fn from_csv_path<P>(path: P, delimiter: u8) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let mut records = Vec::new();
        for wrapped_record in file::reader(path, delimiter)?.into_records() {
            records.push(QtyRecord::from_csv_record(&wrapped_record?)?);
        }
        let index = Self::from_records(records)?;
        info!(materials = index.len(), "quantity per HU reference loaded");
        if index.is_empty() {
            warn!("quantity per HU reference is empty, no stock will be split");
        }
        Ok(index)
    }
    /// Pieces per HU for `material`, `0` when the material is not listed.
    pub fn qty_per_unit(&self, material: &str) -> u64 {
        let qty = self.qty.get(material).copied().unwrap_or(0);
        if qty == 0 {
            debug!(material, "no quantity per HU");
        }
        qty
    }
    pub fn len(&self) -> usize {
        self.qty.len()
    }
    pub fn is_empty(&self) -> bool {
        self.qty.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_BLOCKS: &str = "tests/data/legacy_block.csv";
    static TEST_BLOCKS_BOM: &str = "tests/data/legacy_block_bom.csv";
    static TEST_QTY: &str = "tests/data/mat_qty_per_hu.csv";
    static TEST_QTY_DUPLICATE: &str = "tests/data/mat_qty_per_hu_duplicate.csv";

    fn relevant() -> Vec<String> {
        vec!["O".to_string(), "K".to_string(), "S".to_string()]
    }
    fn block(prefix: &str, suffix: &str, code: &str) -> BlockRecord {
        BlockRecord {
            hu_prefix: prefix.to_string(),
            hu_suffix: suffix.to_string(),
            block_type: code.to_string(),
        }
    }
    fn qty(material: &str, quantity: &str, line: u64) -> QtyRecord {
        QtyRecord {
            material: material.to_string(),
            quantity: quantity.to_string(),
            line,
        }
    }

    #[test]
    fn irrelevant_codes_are_dropped() {
        let index = BlockIndex::from_records(
            vec![block("V1", "100", "X"), block("V1", "200", "K")],
            &relevant(),
        );
        assert!(index.get("V1100").is_none());
        assert_eq!(index.get("V1200").unwrap(), ["K".to_string()]);
    }
    #[test]
    fn no_relevant_codes_leaves_index_empty() {
        let blocks = BlockIndex::from_records(vec![block("V1", "100", "X")], &relevant());
        assert!(blocks.is_empty());
        let qty = QtyPerUnitIndex::from_records(Vec::new()).unwrap();
        assert!(qty.is_empty());
        assert_eq!(qty.qty_per_unit("MAT1"), 0);
    }
    #[test]
    fn repeated_codes_are_appended() {
        let index = BlockIndex::from_records(
            vec![
                block("V1", "100", "S"),
                block("V1", "100", "O"),
                block("V1", "100", "S"),
            ],
            &relevant(),
        );
        assert_eq!(index.get("V1100").unwrap(), ["S", "O", "S"]);
    }
    #[test]
    fn load_blocks_csv() {
        let index = BlockIndex::from_csv_path(TEST_BLOCKS, b',', &relevant()).unwrap();
        assert_eq!(index.get("00000BLK001").unwrap(), ["O"]);
        assert_eq!(index.get("00000BLK002").unwrap(), ["K", "S"]);
        // only carries an irrelevant code
        assert!(index.get("00000BLK003").is_none());
    }
    #[test]
    fn load_blocks_csv_with_bom() {
        let bytes = std::fs::read(TEST_BLOCKS_BOM).unwrap();
        assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
        let index = BlockIndex::from_csv_path(TEST_BLOCKS_BOM, b',', &relevant()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("00000BLK001").unwrap(), ["O"]);
        assert_eq!(index.get("00000BLK002").unwrap(), ["K", "S"]);
    }
    #[test]
    fn load_qty_csv() {
        let index = QtyPerUnitIndex::from_csv_path(TEST_QTY, b',').unwrap();
        assert_eq!(index.qty_per_unit("MAT1"), 10);
        assert_eq!(index.qty_per_unit("MAT2"), 4);
        assert_eq!(index.qty_per_unit("UNKNOWN"), 0);
    }
    #[test]
    fn duplicate_material_is_fatal() {
        let err = QtyPerUnitIndex::from_csv_path(TEST_QTY_DUPLICATE, b',').unwrap_err();
        assert!(matches!(err, ErrorKind::DuplicateMaterial { ref material, .. } if material == "MAT1"));
    }
    #[test]
    fn empty_qty_disables_split() {
        let index = QtyPerUnitIndex::from_records(vec![qty("MAT9", "", 2)]).unwrap();
        assert_eq!(index.qty_per_unit("MAT9"), 0);
    }
    #[test]
    fn non_numeric_qty_is_fatal() {
        let err = QtyPerUnitIndex::from_records(vec![qty("MAT9", "ten", 2)]).unwrap_err();
        assert!(matches!(err, ErrorKind::InvalidQtyPerHu { line: 2, .. }));
    }
}
