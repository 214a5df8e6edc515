pub mod file;
pub mod generator;
pub mod numbers;
pub mod profile;
pub mod reference;
pub mod resolve;
pub mod row;
pub mod source;

pub mod result {
    use thiserror::Error;

    /// Which input file a record came from, used to point errors at a file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum InputKind {
        Blocks,
        QtyPerHu,
        Stock,
    }
    impl std::fmt::Display for InputKind {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            let name = match self {
                InputKind::Blocks => "blocking reference",
                InputKind::QtyPerHu => "quantity per HU reference",
                InputKind::Stock => "stock extract",
            };
            f.write_str(name)
        }
    }

    #[derive(Debug, Error)]
    pub enum ErrorKind {
        #[error("Unable to read or write csv data: {0}")]
        Csv(#[from] csv::Error),
        #[error("File access failed: {0}")]
        Io(#[from] std::io::Error),
        #[error("Row {line} of the {input} has {found} columns, at least {needed} are required")]
        ShortRow {
            input: InputKind,
            line: u64,
            found: usize,
            needed: usize,
        },
        #[error("Material {material} appears more than once in the quantity per HU reference (row {line})")]
        DuplicateMaterial { material: String, line: u64 },
        #[error("Material {material} has a quantity per HU of {value:?}, which is not a whole number (row {line})")]
        InvalidQtyPerHu {
            material: String,
            value: String,
            line: u64,
        },
        #[error("HU {hu} carries block code {code:?}, which has no stock category or bin mapping")]
        UnknownBlockCode { hu: String, code: String },
        #[error("Profile {profile} generates serial numbers, but no serial number range is configured")]
        MissingSerialRange { profile: String },
        #[error("No profile named {0:?} is configured")]
        UnknownProfile(String),
        #[error("Delimiter {0:?} is not a single ASCII character")]
        InvalidDelimiter(char),
        #[error("Settings file could not be parsed: {0}")]
        Settings(#[from] serde_json::Error),
    }
    pub type Result<T> = std::result::Result<T, ErrorKind>;
}
