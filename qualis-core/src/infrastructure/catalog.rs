// qualis-core/src/infrastructure/catalog.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::domain::criterion::Criterion;
use crate::domain::error::DomainError;
use crate::domain::ports::CriterionStore;
use crate::infrastructure::error::InfrastructureError;

/// On-disk shape of `criteria.yaml`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CriteriaFile {
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

/// A criterion whose definition failed static validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogIssue {
    pub criterion: String,
    pub reason: String,
}

/// In-memory criterion store loaded from a YAML catalog.
///
/// Misconfigured criteria stay in the catalog: they are reported here as issues
/// and again as configuration errors whenever a value is evaluated against them.
#[derive(Debug, Clone, Default)]
pub struct CriteriaCatalog {
    criteria: Vec<Criterion>,
    index: HashMap<String, usize>,
}

impl CriteriaCatalog {
    pub fn new(criteria: Vec<Criterion>) -> Result<Self, InfrastructureError> {
        let mut index = HashMap::with_capacity(criteria.len());
        for (pos, criterion) in criteria.iter().enumerate() {
            if index.insert(criterion.code.clone(), pos).is_some() {
                return Err(InfrastructureError::ConfigError(format!(
                    "Duplicate criterion code '{}' in catalog",
                    criterion.code
                )));
            }
        }
        Ok(Self { criteria, index })
    }

    #[instrument]
    pub fn load(path: &Path) -> Result<Self, InfrastructureError> {
        if !path.exists() {
            return Err(InfrastructureError::ConfigNotFound(
                path.display().to_string(),
            ));
        }
        let content = fs::read_to_string(path)?;
        let file: CriteriaFile = serde_yaml::from_str(&content)?;
        let catalog = Self::new(file.criteria)?;

        for issue in catalog.issues() {
            warn!(criterion = %issue.criterion, reason = %issue.reason, "Misconfigured criterion");
        }
        info!(count = catalog.len(), "Criteria catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Criteria in catalog order.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn issues(&self) -> Vec<CatalogIssue> {
        self.criteria
            .iter()
            .filter_map(|c| match c.check() {
                Err(DomainError::Configuration { criterion, reason }) => {
                    Some(CatalogIssue { criterion, reason })
                }
                Err(other) => Some(CatalogIssue {
                    criterion: c.code.clone(),
                    reason: other.to_string(),
                }),
                Ok(()) => None,
            })
            .collect()
    }
}

impl CriterionStore for CriteriaCatalog {
    fn get_criterion(&self, code: &str) -> Result<Criterion, DomainError> {
        self.index
            .get(code)
            .and_then(|pos| self.criteria.get(*pos))
            .cloned()
            .ok_or_else(|| DomainError::CriterionNotFound(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::criterion::{DataType, Severity};
    use anyhow::Result;
    use tempfile::tempdir;

    const CATALOG: &str = r#"
criteria:
  - code: TEMP-01
    title: Bath temperature
    data_type: numeric
    limit_min: 99.5
    limit_max: 100.5
    unit: "°C"
    severity: critical
  - code: FINISH
    title: Surface finish
    data_type: select
    options: [Good, Fair, Poor]
  - code: COLOR
    title: Colour match
    data_type: select
"#;

    #[test]
    fn test_load_and_lookup() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("criteria.yaml");
        fs::write(&path, CATALOG)?;

        let catalog = CriteriaCatalog::load(&path)?;
        assert_eq!(catalog.len(), 3);

        let temp = catalog.get_criterion("TEMP-01")?;
        assert_eq!(temp.data_type, DataType::Numeric);
        assert_eq!(temp.severity, Severity::Critical);
        assert_eq!(temp.unit.as_deref(), Some("°C"));

        assert!(matches!(
            catalog.get_criterion("NOPE"),
            Err(DomainError::CriterionNotFound(code)) if code == "NOPE"
        ));
        Ok(())
    }

    #[test]
    fn test_misconfigured_criteria_are_reported_not_dropped() -> Result<()> {
        let file: CriteriaFile = serde_yaml::from_str(CATALOG)?;
        let catalog = CriteriaCatalog::new(file.criteria)?;

        let issues = catalog.issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].criterion, "COLOR");
        assert!(catalog.get_criterion("COLOR").is_ok());
        Ok(())
    }

    #[test]
    fn test_duplicate_codes_are_rejected() {
        let criteria = vec![
            Criterion::new("A", DataType::Text),
            Criterion::new("A", DataType::Boolean),
        ];
        assert!(matches!(
            CriteriaCatalog::new(criteria),
            Err(InfrastructureError::ConfigError(_))
        ));
    }

    #[test]
    fn test_missing_catalog_file() -> Result<()> {
        let dir = tempdir()?;
        let result = CriteriaCatalog::load(&dir.path().join("criteria.yaml"));
        assert!(matches!(result, Err(InfrastructureError::ConfigNotFound(_))));
        Ok(())
    }
}
