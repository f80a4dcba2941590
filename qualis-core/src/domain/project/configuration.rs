// qualis-core/src/domain/project/configuration.rs

use crate::domain::compliance::ComplianceConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,

    /// DuckDB file holding records, relative to the project directory.
    #[serde(default = "default_database")]
    pub database: String,

    #[serde(rename = "criteria-path", default = "default_criteria_path")]
    pub criteria_path: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(default)]
    pub compliance: ComplianceConfig,
}

impl ProjectConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            database: default_database(),
            criteria_path: default_criteria_path(),
            target_path: default_target_path(),
            compliance: ComplianceConfig::default(),
        }
    }
}

fn default_version() -> String {
    "0.1.0".to_string()
}
fn default_database() -> String {
    "qualis.duckdb".to_string()
}
fn default_criteria_path() -> String {
    "criteria.yaml".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}
