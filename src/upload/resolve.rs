use crate::upload::reference::BlockIndex;
use crate::upload::result::{ErrorKind, Result};
use std::str::FromStr;

/// Stock category posted for blocked stock.
pub const BLOCKED_CAT: &str = "B2";
/// Bin placeholder for HUs that have to be repacked before put away.
pub const REPACK_BIN: &str = "??REPACK BIN??";

/// Block codes of the legacy system that map onto the target stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCode {
    /// Open, needs repacking.
    O,
    /// Quality hold.
    K,
    /// Stock hold.
    S,
}

impl FromStr for BlockCode {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "O" => Ok(BlockCode::O),
            "K" => Ok(BlockCode::K),
            "S" => Ok(BlockCode::S),
            _ => Err(()),
        }
    }
}

/// Stock category and bin an HU is posted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub stock_cat: String,
    pub bin: String,
}

impl BlockCode {
    fn placement(self, standard_bin: &str) -> Placement {
        let bin = match self {
            BlockCode::O => REPACK_BIN,
            BlockCode::K | BlockCode::S => standard_bin,
        };
        Placement {
            stock_cat: BLOCKED_CAT.to_string(),
            bin: bin.to_string(),
        }
    }
}

/**
Resolves where an HU goes and in which stock category.

Only the first recorded block code counts. HUs without a block are posted
with `default_cat` into `standard_bin`.

# Errors

Returns [`ErrorKind::UnknownBlockCode`] if the first code is not one of
[`BlockCode`]; this happens when the relevant block types are configured
wider than the mapping.
*/
pub fn resolve(
    short_key: &str,
    blocks: &BlockIndex,
    standard_bin: &str,
    default_cat: &str,
) -> Result<Placement> {
    let Some(first) = blocks.get(short_key).and_then(|codes| codes.first()) else {
        return Ok(Placement {
            stock_cat: default_cat.to_string(),
            bin: standard_bin.to_string(),
        });
    };
    let code = first
        .parse::<BlockCode>()
        .map_err(|_| ErrorKind::UnknownBlockCode {
            hu: short_key.to_string(),
            code: first.clone(),
        })?;
    Ok(code.placement(standard_bin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::source::BlockRecord;

    fn index(entries: &[(&str, &str)], relevant: &[&str]) -> BlockIndex {
        let relevant = relevant.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        BlockIndex::from_records(
            entries.iter().map(|(hu, code)| BlockRecord {
                hu_prefix: String::new(),
                hu_suffix: hu.to_string(),
                block_type: code.to_string(),
            }),
            &relevant,
        )
    }

    #[test]
    fn unblocked_hu_uses_defaults() {
        let blocks = index(&[], &["O", "K", "S"]);
        let placement = resolve("HU1", &blocks, "STD", "F2").unwrap();
        assert_eq!(placement.stock_cat, "F2");
        assert_eq!(placement.bin, "STD");
    }
    #[test]
    fn open_block_goes_to_repack() {
        let blocks = index(&[("HU1", "O")], &["O", "K", "S"]);
        let placement = resolve("HU1", &blocks, "STD", "F2").unwrap();
        assert_eq!(placement.stock_cat, "B2");
        assert_eq!(placement.bin, REPACK_BIN);
    }
    #[test]
    fn quality_and_stock_holds_stay_on_standard_bin() {
        let blocks = index(&[("HU1", "K"), ("HU2", "S")], &["O", "K", "S"]);
        for hu in ["HU1", "HU2"] {
            let placement = resolve(hu, &blocks, "STD", "F2").unwrap();
            assert_eq!(placement.stock_cat, "B2");
            assert_eq!(placement.bin, "STD");
        }
    }
    #[test]
    fn only_first_code_counts() {
        let blocks = index(&[("HU1", "K"), ("HU1", "O")], &["O", "K", "S"]);
        let placement = resolve("HU1", &blocks, "STD", "F2").unwrap();
        assert_eq!(placement.bin, "STD");
    }
    #[test]
    fn unmapped_code_is_an_error() {
        let blocks = index(&[("HU1", "Q")], &["O", "K", "S", "Q"]);
        let err = resolve("HU1", &blocks, "STD", "F2").unwrap_err();
        assert!(matches!(err, ErrorKind::UnknownBlockCode { ref code, .. } if code == "Q"));
    }
}
