use crate::upload::numbers::NumbersProfile;
use crate::upload::result::{ErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Serial rows generated per stock line while uploads are trialled.
pub const TRIAL_SERIAL_LIMIT: usize = 7;

/**
How a stock extract is turned into upload rows.

One profile exists per storage area; see [`Settings::builtin`] for the
profiles in use.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Used in the output file name.
    pub name: String,
    /// Bin used when the HU is not blocked, or blocked without repacking.
    pub standard_bin: String,
    /// Emit an HU header row per stock line.
    pub record_hu: bool,
    /// Emit one quantity row per stock line when the stock is not split.
    pub record_quant: bool,
    /// Take the bin from the extract instead of resolving it from blocks.
    pub consider_bin: bool,
    /// Key the upload by the serial numbers of the extract.
    pub consider_serial: bool,
    /// Emit a generated serial number per piece.
    pub generate_serial: bool,
    /// Split the stock over generated HUs by quantity per HU.
    pub generate_hu: bool,
    /// Most serial rows generated per stock line, `None` for no limit.
    pub serial_limit: Option<usize>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            name: String::new(),
            standard_bin: String::new(),
            record_hu: false,
            record_quant: false,
            consider_bin: false,
            consider_serial: false,
            generate_serial: false,
            generate_hu: false,
            serial_limit: Some(TRIAL_SERIAL_LIMIT),
        }
    }
}

/// Values written into every upload the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDefaults {
    pub mandt: String,
    pub pmat: String,
    pub owner: String,
    pub owner_role: String,
    pub entitled: String,
    pub entitled_role: String,
    /// Stock category of unblocked stock.
    pub stock_cat: String,
    pub unit: String,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        FieldDefaults {
            mandt: "100".to_string(),
            pmat: "8289999".to_string(),
            owner: "BP1101EWM".to_string(),
            owner_role: "BP".to_string(),
            entitled: "BP1101EWM".to_string(),
            entitled_role: "BP".to_string(),
            stock_cat: "F2".to_string(),
            unit: "PCE".to_string(),
        }
    }
}

/// Everything a conversion run needs apart from the input files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub delimiter: char,
    pub relevant_block_types: Vec<String>,
    pub defaults: FieldDefaults,
    pub hu_numbers: NumbersProfile,
    pub serial_numbers: Option<NumbersProfile>,
    pub profiles: Vec<UploadConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Settings {
    /// The settings used for the legacy stock migration.
    pub fn builtin() -> Self {
        Settings {
            delimiter: ',',
            relevant_block_types: vec!["O".to_string(), "K".to_string(), "S".to_string()],
            defaults: FieldDefaults::default(),
            hu_numbers: NumbersProfile::new(14, 900_000_000, "00000"),
            serial_numbers: Some(NumbersProfile::new(10, 1, "S")),
            profiles: vec![
                UploadConfig {
                    name: "high_bay".to_string(),
                    standard_bin: "HIGH BAY BIN".to_string(),
                    record_hu: true,
                    record_quant: true,
                    generate_hu: true,
                    ..Default::default()
                },
                UploadConfig {
                    name: "plm3".to_string(),
                    record_hu: true,
                    record_quant: true,
                    consider_bin: true,
                    ..Default::default()
                },
                UploadConfig {
                    name: "o_blanks".to_string(),
                    record_hu: true,
                    record_quant: true,
                    generate_serial: true,
                    ..Default::default()
                },
                UploadConfig {
                    name: "ks1j".to_string(),
                    standard_bin: "KS1J_BIN".to_string(),
                    record_quant: true,
                    consider_serial: true,
                    ..Default::default()
                },
            ],
        }
    }
    /**
    Reads settings from a json file. Keys missing from the file keep their
    built-in value.

    # Errors

    Fails if the file cannot be read, is not valid settings json, or names a
    delimiter outside ASCII.
    */
    pub fn from_json_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str::<Self>(&text)?;
        settings.delimiter_byte()?;
        info!(path = %path.as_ref().display(), "settings loaded");
        Ok(settings)
    }
    /**
    Picks the settings for a run.

    An explicit path wins, then `~/.stock_upload/settings.json` if it exists,
    then [`Settings::builtin`].
    */
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_json_path(path);
        }
        match user_settings_path() {
            Some(path) if path.is_file() => Self::from_json_path(path),
            _ => Ok(Self::builtin()),
        }
    }
    /// Returns the profile called `name`.
    pub fn profile(&self, name: &str) -> Result<&UploadConfig> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ErrorKind::UnknownProfile(name.to_string()))
    }
    /// The delimiter as the single byte the csv reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            return Err(ErrorKind::InvalidDelimiter(self.delimiter));
        }
        Ok(self.delimiter as u8)
    }
}

/// `~/.stock_upload/settings.json`, if a home directory is known.
pub fn user_settings_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".stock_upload").join("settings.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_profiles() {
        let settings = Settings::builtin();
        let high_bay = settings.profile("high_bay").unwrap();
        assert!(high_bay.generate_hu && high_bay.record_hu && high_bay.record_quant);
        assert!(!high_bay.consider_bin);
        assert_eq!(high_bay.standard_bin, "HIGH BAY BIN");

        let plm3 = settings.profile("plm3").unwrap();
        assert!(plm3.consider_bin && !plm3.generate_hu);

        let o_blanks = settings.profile("o_blanks").unwrap();
        assert!(o_blanks.generate_serial);
        assert_eq!(o_blanks.serial_limit, Some(TRIAL_SERIAL_LIMIT));

        let ks1j = settings.profile("ks1j").unwrap();
        assert!(ks1j.consider_serial && !ks1j.record_hu);
    }
    #[test]
    fn unknown_profile() {
        let settings = Settings::builtin();
        assert!(matches!(
            settings.profile("psa"),
            Err(ErrorKind::UnknownProfile(ref name)) if name == "psa"
        ));
    }
    #[test]
    fn partial_json_keeps_builtin_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "delimiter": ";",
                "profiles": [{{ "name": "psa", "standard_bin": "PSA", "record_quant": true, "serial_limit": null }}]
            }}"#
        )
        .unwrap();
        let settings = Settings::from_json_path(file.path()).unwrap();
        assert_eq!(settings.delimiter_byte().unwrap(), b';');
        assert_eq!(settings.defaults, FieldDefaults::default());
        assert_eq!(settings.relevant_block_types, vec!["O", "K", "S"]);
        let psa = settings.profile("psa").unwrap();
        assert!(psa.record_quant && !psa.record_hu);
        assert_eq!(psa.serial_limit, None);
        assert!(settings.profile("high_bay").is_err());
    }
    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "delimiter": "é" }}"#).unwrap();
        assert!(matches!(
            Settings::from_json_path(file.path()),
            Err(ErrorKind::InvalidDelimiter('é'))
        ));
        let settings = Settings {
            delimiter: '\u{2502}',
            ..Settings::builtin()
        };
        assert!(settings.delimiter_byte().is_err());
    }
    #[test]
    fn invalid_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            Settings::from_json_path(file.path()),
            Err(ErrorKind::Settings(_))
        ));
    }
}
