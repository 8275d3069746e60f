//! CSV rendering of the fixed column set for spreadsheet consumers.

use a2l_core::config::ExportConfig;
use a2l_core::models::Store;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the store as CSV: one header row, then one row per record in
/// store order. Inapplicable fields come out as empty strings so the column
/// set is identical for every row.
pub fn write_csv(store: &Store, cfg: &ExportConfig, output: &Path) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("cannot create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    let columns = cfg.effective_columns();

    writeln!(writer, "{}", csv_row(columns.iter().copied(), &cfg.delimiter))?;
    for record in store.iter() {
        let row = csv_row(columns.iter().map(|col| record.field(col)), &cfg.delimiter);
        writeln!(writer, "{}", row)?;
    }
    writer.flush()?;
    Ok(())
}

fn csv_row<'a>(fields: impl Iterator<Item = &'a str>, delimiter: &str) -> String {
    fields
        .map(|field| escape(field, delimiter))
        .collect::<Vec<_>>()
        .join(delimiter)
}

fn escape(field: &str, delimiter: &str) -> String {
    if field.contains(delimiter) || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
