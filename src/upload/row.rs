macro_rules! upload_fields {
    ($($variant:ident => $name:literal,)+) => {
        /// Columns of the stock upload file, in file order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Field {
            $($variant,)+
        }
        impl Field {
            pub const ALL: &'static [Field] = &[$(Field::$variant,)+];
            /// Column title in the upload file header.
            pub fn name(self) -> &'static str {
                match self {
                    $(Field::$variant => $name,)+
                }
            }
        }
    };
}

upload_fields! {
    Mandt => "MANDT",
    PosType => "POSTYPE",
    Matnr => "MATNR",
    Owner => "OWNER",
    OwnerRole => "OWNER_ROLE",
    Batch => "BATCH",
    Cat => "CAT",
    StockDocCat => "STOCK_DOCCAT",
    StockDocNo => "STOCK_DOCNO",
    StockItmNo => "STOCK_ITMNO",
    StockUsage => "STOCK_USAGE",
    Entitled => "ENTITELED",
    EntitledRole => "ENTITLED_ROLE",
    Coo => "COO",
    Quan => "QUAN",
    Unit => "UNIT",
    HuTyp => "HUTYP",
    Lgpla => "LGPLA",
    GrDate => "GR_DATE",
    GrTime => "GR_TIME",
    Vfdat => "VFDAT",
    Pmat => "PMAT",
    ExtNo => "EXTNO",
    HuIdent => "HUIDENT",
    ParHuIdent => "PARHUIDENT",
    TopHuIdent => "TOPHUIDENT",
    Row => "ROW",
    RefRow => "REFROW",
    GWeight => "G_WEIGHT",
    NWeight => "N_WEIGHT",
    UnitGw => "UNIT_GW",
    TWeight => "T_WEIGHT",
    UnitTw => "UNIT_TW",
    GVolume => "G_VOLUME",
    NVolume => "N_VOLUME",
    UnitGv => "UNIT_GV",
    TVolume => "T_VOLUME",
    UnitTv => "UNIT_TV",
    GCapa => "G_CAPA",
    NCapa => "N_CAPA",
    TCapa => "T_CAPA",
    Length => "LENGTH",
    Width => "WIDTH",
    Height => "HEIGHT",
    UnitLwh => "UNIT_LWH",
    MaxWeight => "MAX_WEIGHT",
    Tolw => "TOLW",
    TareVar => "TARE_VAR",
    MaxVolume => "MAX_VOLUME",
    Tolv => "TOLV",
    ClosedPackage => "CLOSED_PACKAGE",
    MaxCapa => "MAX_CAPA",
    MaxLength => "MAX_LENGTH",
    MaxWidth => "MAX_WIDTH",
    MaxHeight => "MAX_HEIGHT",
    UnitMaxLwh => "UNIT_MAX_LWH",
    SerNr => "SERNR",
    CwQuan => "CWQUAN",
    CwUnit => "CWUNIT",
    CwExact => "CWEXACT",
    LogPos => "LOGPOS",
    Uii => "UII",
    DummyIsu => "DUMMY_ISU",
    Zeugn => "ZEUGN",
    AmountLc => "AMOUNT_LC",
}

pub const FIELD_COUNT: usize = Field::ALL.len();

impl Field {
    /// Zero based column of the field in the upload file.
    pub fn position(self) -> usize {
        self as usize
    }
    /// The header line of the upload file.
    pub fn header() -> Vec<&'static str> {
        Field::ALL.iter().map(|f| f.name()).collect()
    }
}

/// Row kind of an upload line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostingType {
    Hu,
    SubHu,
    Quant,
    Serial,
}

impl PostingType {
    pub fn code(self) -> &'static str {
        match self {
            PostingType::Hu => "1",
            PostingType::SubHu => "2",
            PostingType::Quant => "4",
            PostingType::Serial => "6",
        }
    }
}

/// One line of the upload file. Fields that are never set stay empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    values: [String; FIELD_COUNT],
    posting: PostingType,
    number: u64,
}

impl OutputRow {
    /// A row with every field empty apart from posting type and row number.
    fn blank(posting: PostingType, number: u64) -> Self {
        let mut row = OutputRow {
            values: std::array::from_fn(|_| String::new()),
            posting,
            number,
        };
        row.set(Field::PosType, posting.code());
        row.set(Field::Row, number.to_string());
        row
    }
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> &mut Self {
        self.values[field.position()] = value.into();
        self
    }
    #[cfg(test)]
    pub fn get(&self, field: Field) -> &str {
        &self.values[field.position()]
    }
    pub fn posting(&self) -> PostingType {
        self.posting
    }
    pub fn number(&self) -> u64 {
        self.number
    }
    /// Field values in file order.
    pub fn as_record(&self) -> &[String] {
        &self.values
    }
}

/**
Hands out rows numbered in the order they are started.

Numbering begins at 1 and is shared by every record of a run, so the
builder lives as long as the run does.
*/
#[derive(Debug)]
pub struct RowBuilder {
    next: u64,
}

impl Default for RowBuilder {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl RowBuilder {
    /// Starts a new row with the next row number.
    pub fn start(&mut self, posting: PostingType) -> OutputRow {
        let row = OutputRow::blank(posting, self.next);
        self.next += 1;
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_has_all_columns() {
        let header = Field::header();
        assert_eq!(header.len(), FIELD_COUNT);
        assert_eq!(header[0], "MANDT");
        assert_eq!(header[26], "ROW");
        assert_eq!(header[56], "SERNR");
        assert_eq!(header[64], "AMOUNT_LC");
    }
    #[test]
    fn positions_follow_declaration() {
        for (idx, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.position(), idx);
        }
        assert_eq!(Field::Lgpla.position(), 17);
        assert_eq!(Field::TopHuIdent.position(), 25);
    }
    #[test]
    fn rows_are_numbered_in_start_order() {
        let mut rows = RowBuilder::default();
        let first = rows.start(PostingType::Hu);
        let second = rows.start(PostingType::Quant);
        assert_eq!(first.number(), 1);
        assert_eq!(second.number(), 2);
        assert_eq!(second.get(Field::Row), "2");
        assert_eq!(second.get(Field::PosType), "4");
    }
    #[test]
    fn unset_fields_are_empty() {
        let mut row = RowBuilder::default().start(PostingType::Serial);
        row.set(Field::SerNr, "S000000001");
        let record = row.as_record();
        assert_eq!(record.len(), FIELD_COUNT);
        assert_eq!(record[Field::SerNr.position()], "S000000001");
        let filled = record.iter().filter(|v| !v.is_empty()).count();
        assert_eq!(filled, 3);
    }
}
