use serde::{Deserialize, Serialize};

/**
A prefixed, zero padded number range.

Each call to [`NumbersProfile::next_number`] advances the counter by one and
renders `prefix + zeros + number`, padding up to `length`. When the prefix and
the number no longer fit into `length` no padding is added and the result is
longer than `length`; the range never truncates.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumbersProfile {
    length: usize,
    prefix: String,
    #[serde(rename = "start_value")]
    next: u64,
}

impl NumbersProfile {
    pub fn new(length: usize, start_value: u64, prefix: &str) -> Self {
        Self {
            length,
            prefix: prefix.to_string(),
            next: start_value,
        }
    }
    /// Total length a rendered number is padded to.
    pub fn length(&self) -> usize {
        self.length
    }
    /// Returns the next number of the range as a padded string.
    pub fn next_number(&mut self) -> String {
        let number = self.next;
        self.next += 1;
        pad_between(self.length, &self.prefix, &number.to_string())
    }
}

/// Joins `prefix` and `suffix` with as many `0`s as are needed to reach
/// `length`. Nothing is inserted when the parts already reach `length`.
fn pad_between(length: usize, prefix: &str, suffix: &str) -> String {
    let padding = length.saturating_sub(prefix.len() + suffix.len());
    format!("{prefix}{}{suffix}", "0".repeat(padding))
}

/**
A handling unit taken from the legacy extract.

The legacy system splits the HU into a vendor part and a package id. The
target system wants the padded form, the blocking reference is keyed by the
two parts glued together.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlingUnit {
    ident: String,
    short_key: String,
}

impl HandlingUnit {
    pub fn new(length: usize, prefix: &str, suffix: &str) -> Self {
        HandlingUnit {
            ident: pad_between(length, prefix, suffix),
            short_key: format!("{prefix}{suffix}"),
        }
    }
    /// The padded identifier written to the upload file.
    pub fn ident(&self) -> &str {
        &self.ident
    }
    /// The unpadded key used for block lookups.
    pub fn short_key(&self) -> &str {
        &self.short_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_count_up_from_start() {
        let mut profile = NumbersProfile::new(10, 1, "S");
        assert_eq!(profile.next_number(), "S000000001");
        assert_eq!(profile.next_number(), "S000000002");
        assert_eq!(profile.next_number(), "S000000003");
    }
    #[test]
    fn padding_shrinks_as_digits_grow() {
        let mut profile = NumbersProfile::new(6, 99, "AB");
        let first = profile.next_number();
        let second = profile.next_number();
        assert_eq!(first, "AB0099");
        assert_eq!(second, "AB0100");
        assert_eq!(first.len(), 6);
        assert_eq!(second.len(), 6);
    }
    #[test]
    fn suffix_matches_kth_call() {
        let mut profile = NumbersProfile::new(14, 900_000_000, "00000");
        for k in 0..25u64 {
            let number = profile.next_number();
            assert_eq!(number.len(), 14);
            assert_eq!(number[5..].parse::<u64>().unwrap(), 900_000_000 + k);
        }
    }
    #[test]
    fn overflow_is_not_truncated() {
        let mut profile = NumbersProfile::new(4, 999, "XY");
        assert_eq!(profile.next_number(), "XY999");
        assert_eq!(profile.next_number(), "XY1000");
    }
    #[test]
    fn handling_unit_keys() {
        let hu = HandlingUnit::new(14, "00000", "ABC123");
        assert_eq!(hu.ident(), "00000000ABC123");
        assert_eq!(hu.short_key(), "00000ABC123");
    }
    #[test]
    fn handling_unit_longer_than_length_keeps_parts() {
        let hu = HandlingUnit::new(4, "VEND", "1234");
        assert_eq!(hu.ident(), "VEND1234");
        assert_eq!(hu.short_key(), "VEND1234");
    }
}
