// qualis-core/src/domain/criterion/kind.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape of the value an inspector enters against a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Numeric,
    Boolean,
    Text,
    Select,
    Multiselect,
    Date,
    File,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Date => "date",
            Self::File => "file",
        }
    }

    /// Select and multiselect criteria carry a closed set of options.
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::Multiselect)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "numeric" => Ok(Self::Numeric),
            "boolean" => Ok(Self::Boolean),
            "text" => Ok(Self::Text),
            "select" => Ok(Self::Select),
            "multiselect" => Ok(Self::Multiselect),
            "date" => Ok(Self::Date),
            "file" => Ok(Self::File),
            _ => Err(format!("Unknown data type: {}", s)),
        }
    }
}

// Declared from most to least severe so that sorted maps list critical failures first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    #[default]
    Major,
    Minor,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Minor => "minor",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}
