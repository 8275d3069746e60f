use serde::Serialize;
use std::collections::HashMap;

/// Fixed column set every tabular consumer can rely on. Fields that do not
/// apply to a record variant render as empty strings, never null.
pub const COLUMNS: [&str; 9] = [
    "Type",
    "Name",
    "Comment",
    "Value",
    "Data_Type",
    "Conversion",
    "Measurement_Params",
    "ECU_Address",
    "Symbol_Link",
];

/// Recognized A2L measurement data-type tokens. Stored verbatim; `as_str`
/// round-trips the exact token text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Ubyte,
    Sbyte,
    Uword,
    Sword,
    Ulong,
    Slong,
    Float16Ieee,
    Float32Ieee,
    Float64Ieee,
    Double,
    U64,
    S64,
}

impl DataType {
    /// Exact token match; data-type tokens are never case-folded.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "UBYTE" => Some(DataType::Ubyte),
            "SBYTE" => Some(DataType::Sbyte),
            "UWORD" => Some(DataType::Uword),
            "SWORD" => Some(DataType::Sword),
            "ULONG" => Some(DataType::Ulong),
            "SLONG" => Some(DataType::Slong),
            "FLOAT16_IEEE" => Some(DataType::Float16Ieee),
            "FLOAT32_IEEE" => Some(DataType::Float32Ieee),
            "FLOAT64_IEEE" => Some(DataType::Float64Ieee),
            "DOUBLE" => Some(DataType::Double),
            "U64" => Some(DataType::U64),
            "S64" => Some(DataType::S64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Ubyte => "UBYTE",
            DataType::Sbyte => "SBYTE",
            DataType::Uword => "UWORD",
            DataType::Sword => "SWORD",
            DataType::Ulong => "ULONG",
            DataType::Slong => "SLONG",
            DataType::Float16Ieee => "FLOAT16_IEEE",
            DataType::Float32Ieee => "FLOAT32_IEEE",
            DataType::Float64Ieee => "FLOAT64_IEEE",
            DataType::Double => "DOUBLE",
            DataType::U64 => "U64",
            DataType::S64 => "S64",
        }
    }
}

/// Record variant discriminant, also the text rendered in the `Type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordType {
    Characteristic,
    Measurement,
    MeasurementArray,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Characteristic => "Characteristic",
            RecordType::Measurement => "Measurement",
            RecordType::MeasurementArray => "MeasurementArray",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CharacteristicFields {
    /// Raw address/immediate token from the VALUE directive, unparsed.
    pub value: String,
    pub symbol_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MeasurementFields {
    /// None when no data-type token matched; rendered as empty text.
    pub data_type: Option<DataType>,
    pub conversion: String,
    /// Space-joined residual tokens, or `ARRAY_SIZE=...` for array records.
    pub params: String,
    pub ecu_address: String,
    pub symbol_link: String,
}

/// Variant payloads. `MeasurementArray` shares the measurement shape; the
/// distinction is carried by the tag and the `ARRAY_SIZE=` prefix in `params`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum RecordKind {
    Characteristic(CharacteristicFields),
    Measurement(MeasurementFields),
    MeasurementArray(MeasurementFields),
}

/// One extracted calibration/measurement descriptor, immutable after the
/// parse pass that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    /// Normalized block description; never contains embedded newlines.
    pub comment: String,
    #[serde(flatten)]
    pub kind: RecordKind,
}

impl Record {
    pub fn record_type(&self) -> RecordType {
        match self.kind {
            RecordKind::Characteristic(_) => RecordType::Characteristic,
            RecordKind::Measurement(_) => RecordType::Measurement,
            RecordKind::MeasurementArray(_) => RecordType::MeasurementArray,
        }
    }

    fn measurement(&self) -> Option<&MeasurementFields> {
        match &self.kind {
            RecordKind::Measurement(m) | RecordKind::MeasurementArray(m) => Some(m),
            RecordKind::Characteristic(_) => None,
        }
    }

    pub fn symbol_link(&self) -> &str {
        match &self.kind {
            RecordKind::Characteristic(c) => &c.symbol_link,
            RecordKind::Measurement(m) | RecordKind::MeasurementArray(m) => &m.symbol_link,
        }
    }

    /// Derived module token: the second `_`-delimited component of the
    /// symbol link, e.g. `KL_Spark_Sym` belongs to module `Spark`.
    pub fn module(&self) -> Option<&str> {
        let mut parts = self.symbol_link().split('_');
        parts.next()?;
        parts.next().filter(|m| !m.is_empty())
    }

    /// Renders one column of the fixed set; unknown or inapplicable columns
    /// render as the empty string.
    pub fn field(&self, column: &str) -> &str {
        match column {
            "Type" => self.record_type().as_str(),
            "Name" => &self.name,
            "Comment" => &self.comment,
            "Value" => match &self.kind {
                RecordKind::Characteristic(c) => &c.value,
                _ => "",
            },
            "Data_Type" => self
                .measurement()
                .and_then(|m| m.data_type)
                .map(|d| d.as_str())
                .unwrap_or(""),
            "Conversion" => self.measurement().map(|m| m.conversion.as_str()).unwrap_or(""),
            "Measurement_Params" => self.measurement().map(|m| m.params.as_str()).unwrap_or(""),
            "ECU_Address" => self.measurement().map(|m| m.ecu_address.as_str()).unwrap_or(""),
            "Symbol_Link" => self.symbol_link(),
            _ => "",
        }
    }

    /// Field texts consulted by `search`, in the fixed check order.
    pub(crate) fn search_fields(&self) -> [&str; 6] {
        [
            self.field("Comment"),
            self.field("Symbol_Link"),
            self.field("Conversion"),
            self.field("Data_Type"),
            self.field("ECU_Address"),
            self.field("Measurement_Params"),
        ]
    }
}

/// Name-keyed record collection in file-encounter order. Built wholesale by
/// one load pass; a re-insert for an existing name replaces the record in
/// place, keeping its original position.
#[derive(Debug, Clone, Default)]
pub struct Store {
    records: Vec<Record>,
    by_name: HashMap<String, usize>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: Record) {
        match self.by_name.get(&record.name) {
            Some(&slot) => self.records[slot] = record,
            None => {
                self.by_name.insert(record.name.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Record> {
        self.by_name.get(name).map(|&slot| &self.records[slot])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl FromIterator<Record> for Store {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut store = Store::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}
