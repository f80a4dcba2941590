// qualis-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::project::configuration::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["qualis.yaml", "qualis_project.yaml"];

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Discover the main file
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    // 2. Parse YAML
    let content = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig = serde_yaml::from_str(&content)?;

    // 3. Environment layering, e.g. QUALIS_DATABASE=/tmp/ci.duckdb qualis report
    apply_overrides(&mut config, |key| std::env::var(key).ok())?;

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "{:?} (checked {:?})",
        root, CONFIG_CANDIDATES
    )))
}

fn apply_overrides<F>(config: &mut ProjectConfig, lookup: F) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("QUALIS_DATABASE") {
        info!(old = ?config.database, new = ?val, "Overriding database via ENV");
        config.database = val;
    }
    if let Some(val) = lookup("QUALIS_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Some(val) = lookup("QUALIS_SCORE_PRECISION") {
        let precision = val.trim().parse::<u32>().map_err(|_| {
            InfrastructureError::ConfigError(format!(
                "QUALIS_SCORE_PRECISION must be a non-negative integer, got '{}'",
                val
            ))
        })?;
        info!(
            old = config.compliance.score_precision,
            new = precision,
            "Overriding score precision via ENV"
        );
        config.compliance.score_precision = precision;
    }
    Ok(())
}
