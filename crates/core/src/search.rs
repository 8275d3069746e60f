//! Pure substring search and composable narrowing filters over a Store.
//!
//! Every function returns a new Store and never mutates its input; callers
//! compose type/module narrowing with `search` in either order (narrowing
//! first is merely cheaper).

use crate::models::{Record, RecordType, Store};
use std::collections::BTreeSet;

/// Case-insensitive substring search. A record matches when its name
/// contains the query or when any field, checked in the fixed order comment,
/// symbol link, conversion, data type, ECU address, measurement params,
/// contains it (first hit short-circuits the rest). An empty query matches
/// every record.
pub fn search(store: &Store, query: &str) -> Store {
    let query = query.to_lowercase();
    store
        .iter()
        .filter(|record| matches(record, &query))
        .cloned()
        .collect()
}

fn matches(record: &Record, query: &str) -> bool {
    if record.name.to_lowercase().contains(query) {
        return true;
    }
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(query))
}

/// Keeps only records of the given variant.
pub fn filter_type(store: &Store, record_type: RecordType) -> Store {
    store
        .iter()
        .filter(|record| record.record_type() == record_type)
        .cloned()
        .collect()
}

/// Keeps only records whose derived module token equals `module`.
pub fn filter_module(store: &Store, module: &str) -> Store {
    store
        .iter()
        .filter(|record| record.module() == Some(module))
        .cloned()
        .collect()
}

/// Sorted, de-duplicated module tokens present in the store.
pub fn modules(store: &Store) -> Vec<String> {
    store
        .iter()
        .filter_map(|record| record.module())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
