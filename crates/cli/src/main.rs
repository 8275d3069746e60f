use a2l_core::config;
use a2l_core::config::AppConfig;
use a2l_core::loader;
use a2l_core::models::{Record, RecordType, Store, COLUMNS};
use a2l_core::search;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cli::export;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Info { file, json } => run_info(&file, json),
        Commands::Search {
            file,
            query,
            r#type,
            module,
            fields,
            json,
        } => run_search(&file, query.as_deref(), r#type, module.as_deref(), &fields, json),
        Commands::Export {
            file,
            output,
            query,
            r#type,
            module,
        } => run_export(cfg, &file, &output, query.as_deref(), r#type, module.as_deref()),
        Commands::Modules { file, json } => run_modules(&file, json),
    }
}

#[derive(Parser)]
#[command(name = "a2l-wizard")]
#[command(about = "Search and export A2L calibration/measurement descriptors", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a file and print record/type/module counts
    Info {
        /// Path to the .a2l file
        file: PathBuf,
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// Filter and search records
    Search {
        /// Path to the .a2l file
        file: PathBuf,
        /// Substring query (case-insensitive); omitted matches everything
        query: Option<String>,
        /// Restrict to one record type
        #[arg(long, value_enum)]
        r#type: Option<TypeArg>,
        /// Restrict to one derived module token
        #[arg(long)]
        module: Option<String>,
        /// Restrict output fields (comma-separated), e.g. Name,Comment,ECU_Address
        #[arg(long, value_delimiter = ',', num_args = 1.., default_values_t = Vec::<String>::new())]
        fields: Vec<String>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Write filtered records as CSV
    Export {
        /// Path to the .a2l file
        file: PathBuf,
        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,
        /// Substring query (case-insensitive); omitted matches everything
        query: Option<String>,
        /// Restrict to one record type
        #[arg(long, value_enum)]
        r#type: Option<TypeArg>,
        /// Restrict to one derived module token
        #[arg(long)]
        module: Option<String>,
    },
    /// List derived module tokens
    Modules {
        /// Path to the .a2l file
        file: PathBuf,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TypeArg {
    Characteristic,
    Measurement,
    MeasurementArray,
}

impl From<TypeArg> for RecordType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::Characteristic => RecordType::Characteristic,
            TypeArg::Measurement => RecordType::Measurement,
            TypeArg::MeasurementArray => RecordType::MeasurementArray,
        }
    }
}

fn load(file: &Path) -> Result<Store> {
    loader::load(file).with_context(|| format!("failed to load {}", file.display()))
}

/// Narrowing before searching is cheaper on large vendor files; either order
/// would be correct.
fn narrow(store: &Store, r#type: Option<TypeArg>, module: Option<&str>) -> Store {
    let mut narrowed = match r#type {
        Some(t) => search::filter_type(store, t.into()),
        None => store.clone(),
    };
    if let Some(m) = module {
        narrowed = search::filter_module(&narrowed, m);
    }
    narrowed
}

fn run_info(file: &Path, json: bool) -> Result<()> {
    let store = load(file)?;
    let count_of = |t: RecordType| store.iter().filter(|r| r.record_type() == t).count();
    let characteristics = count_of(RecordType::Characteristic);
    let measurements = count_of(RecordType::Measurement);
    let arrays = count_of(RecordType::MeasurementArray);
    let modules = search::modules(&store);
    if json {
        let summary = serde_json::json!({
            "file": file.display().to_string(),
            "records": store.len(),
            "characteristics": characteristics,
            "measurements": measurements,
            "measurement_arrays": arrays,
            "modules": modules,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "loaded {} records: {} characteristics, {} measurements, {} measurement arrays; {} modules",
            store.len(),
            characteristics,
            measurements,
            arrays,
            modules.len()
        );
    }
    Ok(())
}

fn run_search(
    file: &Path,
    query: Option<&str>,
    r#type: Option<TypeArg>,
    module: Option<&str>,
    fields: &[String],
    json: bool,
) -> Result<()> {
    let store = load(file)?;
    let narrowed = narrow(&store, r#type, module);
    let results = search::search(&narrowed, query.unwrap_or(""));
    if json {
        let rows: Vec<serde_json::Value> = results.iter().map(record_json).collect();
        let rows = filter_fields(rows, fields);
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for record in results.iter() {
            println!(
                "{}\t{}\t{}",
                record.name,
                record.record_type().as_str(),
                record.comment
            );
        }
        println!("{} record(s)", results.len());
    }
    Ok(())
}

fn run_export(
    cfg: AppConfig,
    file: &Path,
    output: &Path,
    query: Option<&str>,
    r#type: Option<TypeArg>,
    module: Option<&str>,
) -> Result<()> {
    let store = load(file)?;
    let narrowed = narrow(&store, r#type, module);
    let results = search::search(&narrowed, query.unwrap_or(""));
    export::write_csv(&results, &cfg.export, output)?;
    println!(
        "exported {} record(s) to {}",
        results.len(),
        output.display()
    );
    Ok(())
}

fn run_modules(file: &Path, json: bool) -> Result<()> {
    let store = load(file)?;
    let modules = search::modules(&store);
    if json {
        println!("{}", serde_json::to_string_pretty(&modules)?);
    } else {
        for module in &modules {
            println!("{}", module);
        }
        println!("{} module(s)", modules.len());
    }
    Ok(())
}

fn record_json(record: &Record) -> serde_json::Value {
    let mut row = serde_json::Map::new();
    for column in COLUMNS {
        row.insert(
            column.to_string(),
            serde_json::Value::String(record.field(column).to_string()),
        );
    }
    serde_json::Value::Object(row)
}

fn filter_fields(mut rows: Vec<serde_json::Value>, fields: &[String]) -> Vec<serde_json::Value> {
    if fields.is_empty() {
        return rows;
    }
    let want: HashSet<String> = fields.iter().map(|f| f.to_lowercase()).collect();
    for row in rows.iter_mut() {
        if let Some(obj) = row.as_object_mut() {
            obj.retain(|key, _| want.contains(&key.to_lowercase()));
        }
    }
    rows
}
