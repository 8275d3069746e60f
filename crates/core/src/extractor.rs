//! Classifies closed blocks and extracts typed record fields.
//!
//! Tokens are preserved verbatim: addresses and values are never parsed
//! numerically and hex digits keep their case. Anything that cannot be
//! determined stays an empty string; malformed content never fails a load.

use crate::models::{
    CharacteristicFields, DataType, MeasurementFields, Record, RecordKind,
};
use crate::observer::ParseObserver;
use crate::scanner::{first_quoted, next_token, Block, BlockKeyword};
use crate::text::normalize;

/// Dispatch on the block keyword; unrecognized keywords yield no record.
pub fn extract(block: Block, observer: &dyn ParseObserver) -> Option<Record> {
    match BlockKeyword::from_keyword(&block.keyword) {
        Some(BlockKeyword::Characteristic) => Some(extract_characteristic(block, observer)),
        Some(keyword) => Some(extract_measurement(block, keyword, observer)),
        None => {
            observer.warning(&format!(
                "discarding unrecognized {} block '{}'",
                block.keyword, block.name
            ));
            None
        }
    }
}

fn extract_characteristic(block: Block, observer: &dyn ParseObserver) -> Record {
    let mut fields = CharacteristicFields::default();
    for line in &block.lines {
        let Some((first, rest)) = next_token(line) else {
            continue;
        };
        // Last occurrence wins on repeats.
        if first == "VALUE" {
            if let Some((value, _)) = next_token(rest) {
                fields.value = value.to_string();
            }
        } else if first == "SYMBOL_LINK" {
            if let Some(symbol) = first_quoted(rest) {
                fields.symbol_link = symbol.to_string();
            }
        }
    }
    if fields.value.is_empty() {
        observer.warning(&format!(
            "characteristic '{}' has no VALUE directive",
            block.name
        ));
    }
    Record {
        name: block.name,
        comment: normalize(&block.description),
        kind: RecordKind::Characteristic(fields),
    }
}

fn extract_measurement(
    block: Block,
    keyword: BlockKeyword,
    observer: &dyn ParseObserver,
) -> Record {
    let mut fields = MeasurementFields::default();
    let mut raw_params = String::new();
    let mut array_size: Option<String> = None;

    for line in &block.lines {
        let Some((first, rest)) = next_token(line) else {
            continue;
        };
        if let Some(data_type) = DataType::from_token(first) {
            fields.data_type = Some(data_type);
            let mut tokens = rest.split_whitespace();
            fields.conversion = tokens.next().unwrap_or("").to_string();
            raw_params = tokens.collect::<Vec<_>>().join(" ");
        } else if first == "ECU_ADDRESS" {
            fields.ecu_address = rest.split_whitespace().next().unwrap_or("").to_string();
        } else if first == "ARRAY_SIZE" {
            // A missing size token still flags array-ness, with unknown size.
            array_size = Some(rest.split_whitespace().next().unwrap_or("?").to_string());
        } else if first == "SYMBOL_LINK" {
            if let Some(symbol) = first_quoted(rest) {
                fields.symbol_link = symbol.to_string();
            }
        }
        // Any other directive inside the block is ignored without error.
    }

    if fields.data_type.is_none() {
        observer.warning(&format!(
            "measurement '{}' has no recognized data-type line",
            block.name
        ));
    }

    let kind = match array_size {
        // An ARRAY_SIZE directive reclassifies the record regardless of the
        // originating keyword, and its value replaces the raw parameters.
        Some(size) => {
            fields.params = format!("ARRAY_SIZE={size}");
            RecordKind::MeasurementArray(fields)
        }
        None if keyword == BlockKeyword::MeasurementArray => {
            observer.warning(&format!(
                "measurement array '{}' has no ARRAY_SIZE directive",
                block.name
            ));
            // Sentinel marking missing size data; never a fabricated value.
            fields.params = if raw_params.is_empty() {
                "ARRAY_SIZE=?".to_string()
            } else {
                format!("ARRAY_SIZE=? {raw_params}")
            };
            RecordKind::MeasurementArray(fields)
        }
        None => {
            fields.params = raw_params;
            RecordKind::Measurement(fields)
        }
    };

    Record {
        name: block.name,
        comment: normalize(&block.description),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordType;

    struct NullObserver;

    impl ParseObserver for NullObserver {
        fn info(&self, _message: &str) {}
        fn warning(&self, _message: &str) {}
    }

    fn block(keyword: &str, name: &str, description: &str, lines: &[&str]) -> Block {
        Block {
            keyword: keyword.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn extract_one(b: Block) -> Record {
        extract(b, &NullObserver).expect("expected a record")
    }

    #[test]
    fn characteristic_takes_second_token_of_last_value_line() {
        let record = extract_one(block(
            "CHARACTERISTIC",
            "KL_Spark",
            "Spark advance",
            &["VALUE 0x4000A1", "VALUE 0x4000B2 trailing", "SYMBOL_LINK \"KL_Spark_Sym\" 0"],
        ));
        assert_eq!(record.record_type(), RecordType::Characteristic);
        assert_eq!(record.field("Value"), "0x4000B2");
        assert_eq!(record.field("Symbol_Link"), "KL_Spark_Sym");
        assert_eq!(record.comment, "Spark advance");
    }

    #[test]
    fn characteristic_without_directives_has_empty_fields() {
        let record = extract_one(block("CHARACTERISTIC", "KL_Bare", "", &["FORMAT \"%5.2\""]));
        assert_eq!(record.field("Value"), "");
        assert_eq!(record.field("Symbol_Link"), "");
    }

    #[test]
    fn measurement_splits_data_type_line() {
        let record = extract_one(block(
            "MEASUREMENT",
            "KL_RPM",
            "Engine RPM",
            &["UWORD RPM_CONV 0 0 65535", "ECU_ADDRESS 0x40010C"],
        ));
        assert_eq!(record.record_type(), RecordType::Measurement);
        assert_eq!(record.field("Data_Type"), "UWORD");
        assert_eq!(record.field("Conversion"), "RPM_CONV");
        assert_eq!(record.field("Measurement_Params"), "0 0 65535");
        assert_eq!(record.field("ECU_Address"), "0x40010C");
    }

    #[test]
    fn data_type_alone_leaves_conversion_and_params_empty() {
        let record = extract_one(block("MEASUREMENT", "KL_T", "", &["SWORD"]));
        assert_eq!(record.field("Data_Type"), "SWORD");
        assert_eq!(record.field("Conversion"), "");
        assert_eq!(record.field("Measurement_Params"), "");
    }

    #[test]
    fn array_size_reclassifies_measurement() {
        let record = extract_one(block(
            "MEASUREMENT",
            "KL_Map",
            "",
            &["UBYTE MAP_CONV 1 2 3", "ARRAY_SIZE 16"],
        ));
        assert_eq!(record.record_type(), RecordType::MeasurementArray);
        assert_eq!(record.field("Measurement_Params"), "ARRAY_SIZE=16");
        assert_eq!(record.field("Data_Type"), "UBYTE");
    }

    #[test]
    fn explicit_array_block_without_size_gets_sentinel() {
        let record = extract_one(block(
            "MEASUREMENT_ARRAY",
            "KL_Vec",
            "",
            &["SLONG VEC_CONV 7 8"],
        ));
        assert_eq!(record.record_type(), RecordType::MeasurementArray);
        assert_eq!(record.field("Measurement_Params"), "ARRAY_SIZE=? 7 8");
    }

    #[test]
    fn explicit_array_block_with_no_params_is_bare_sentinel() {
        let record = extract_one(block("MEASUREMENT_ARRAY", "KL_Vec", "", &[]));
        assert_eq!(record.field("Measurement_Params"), "ARRAY_SIZE=?");
        assert_eq!(record.field("Data_Type"), "");
    }

    #[test]
    fn array_size_without_token_records_unknown_size() {
        let record = extract_one(block("MEASUREMENT", "KL_Vec", "", &["ULONG C", "ARRAY_SIZE"]));
        assert_eq!(record.field("Measurement_Params"), "ARRAY_SIZE=?");
        assert_eq!(record.record_type(), RecordType::MeasurementArray);
    }

    #[test]
    fn unrecognized_keyword_yields_no_record() {
        assert!(extract(block("COMPU_METHOD", "CM_X", "", &[]), &NullObserver).is_none());
    }

    #[test]
    fn comment_is_normalized_single_line() {
        let record = extract_one(block("MEASUREMENT", "KL_X", "line one\\r\\nline two", &[]));
        assert_eq!(record.comment, "line one line two");
    }
}
