use crate::models::COLUMNS;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// CSV field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Column subset/order for exports; empty means the full fixed set.
    #[serde(default)]
    pub columns: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            columns: Vec::new(),
        }
    }
}

impl ExportConfig {
    pub fn effective_columns(&self) -> Vec<&str> {
        if self.columns.is_empty() {
            COLUMNS.to_vec()
        } else {
            self.columns.iter().map(String::as_str).collect()
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
