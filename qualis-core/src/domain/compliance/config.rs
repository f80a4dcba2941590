// qualis-core/src/domain/compliance/config.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ComplianceConfig {
    /// Decimal places kept on the compliance score.
    #[serde(default = "default_score_precision")]
    pub score_precision: u32,
    #[serde(default)]
    pub recompute: RecomputePolicy,
    #[serde(default)]
    pub boolean_vocabulary: BooleanVocabulary,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            score_precision: default_score_precision(),
            recompute: RecomputePolicy::default(),
            boolean_vocabulary: BooleanVocabulary::default(),
        }
    }
}

/// When derived item values and the record summary are refreshed.
/// Submission always re-evaluates, whatever the policy.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecomputePolicy {
    #[default]
    OnEdit,
    OnSubmit,
}

/// Tokens accepted for boolean criteria. Matching ignores case and surrounding blanks.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BooleanVocabulary {
    #[serde(default = "default_truthy")]
    pub truthy: Vec<String>,
    #[serde(default = "default_falsy")]
    pub falsy: Vec<String>,
}

impl Default for BooleanVocabulary {
    fn default() -> Self {
        Self {
            truthy: default_truthy(),
            falsy: default_falsy(),
        }
    }
}

impl BooleanVocabulary {
    pub fn interpret(&self, raw: &str) -> Option<bool> {
        let token = raw.trim();
        if self.truthy.iter().any(|t| t.eq_ignore_ascii_case(token)) {
            Some(true)
        } else if self.falsy.iter().any(|t| t.eq_ignore_ascii_case(token)) {
            Some(false)
        } else {
            None
        }
    }
}

fn default_score_precision() -> u32 {
    2
}

fn default_truthy() -> Vec<String> {
    ["yes", "true", "pass", "ok", "y", "1"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_falsy() -> Vec<String> {
    ["no", "false", "fail", "nok", "n", "0"]
        .into_iter()
        .map(String::from)
        .collect()
}
