//! Core library: A2L block scanning, record extraction, search and export shapes.

pub mod config;
pub mod error;
pub mod extractor;
pub mod loader;
pub mod models;
pub mod observer;
pub mod scanner;
pub mod search;
pub mod text;
