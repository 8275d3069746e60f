//! One-pass file loading: extension gate, Latin-1 read, scan, extract.

use crate::error::LoadError;
use crate::extractor;
use crate::models::Store;
use crate::observer::{ParseObserver, TracingObserver};
use crate::scanner::Scanner;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Recognized input extension, matched case-insensitively.
const EXTENSION: &str = "a2l";

/// Loads a `.a2l` file into a fresh Store with the default tracing observer.
pub fn load(path: &Path) -> Result<Store, LoadError> {
    load_with_observer(path, &TracingObserver)
}

/// Loads a `.a2l` file, reporting parse diagnostics to `observer`. One
/// blocking forward read; no file handle is retained afterwards. Imperfect
/// block content never fails the pass.
pub fn load_with_observer(
    path: &Path,
    observer: &dyn ParseObserver,
) -> Result<Store, LoadError> {
    let extension_ok = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(EXTENSION))
        .unwrap_or(false);
    if !extension_ok {
        return Err(LoadError::WrongExtension(path.to_path_buf()));
    }

    observer.info(&format!("parsing {}", path.display()));
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;
    // Vendor files are single-byte extended-ASCII; decode byte-per-char
    // rather than assuming UTF-8.
    let text: String = bytes.iter().map(|&b| char::from(b)).collect();

    let mut store = Store::new();
    let mut scanner = Scanner::new(observer);
    for line in text.split(['\r', '\n']) {
        if let Some(block) = scanner.push_line(line) {
            if let Some(record) = extractor::extract(block, observer) {
                store.insert(record);
            }
        }
    }
    observer.info(&format!("finished parsing; {} records", store.len()));
    Ok(store)
}
