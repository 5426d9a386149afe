use serde::{Deserialize, Serialize};

use crate::compliance::{ComplianceIssue, IssueSeverity};

/// Penalty per issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SeverityWeights {
    pub error: f64,
    pub warning: f64,
    pub info: f64,
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            error: 3.0,
            warning: 1.0,
            info: 0.5,
        }
    }
}

impl SeverityWeights {
    pub fn weight(&self, severity: IssueSeverity) -> f64 {
        match severity {
            IssueSeverity::Error => self.error,
            IssueSeverity::Warning => self.warning,
            IssueSeverity::Info => self.info,
        }
    }

    pub fn total(&self, issues: &[ComplianceIssue]) -> f64 {
        issues.iter().map(|issue| self.weight(issue.severity)).sum()
    }
}

/// `1 - weight / (elements * 2)`, clamped to `[0, 1]`. An empty design scores 1.
pub fn compliance_score(issue_weight: f64, total_elements: usize) -> f64 {
    if total_elements == 0 {
        return 1.0;
    }
    let score = 1.0 - issue_weight / (total_elements as f64 * 2.0);
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

pub fn score_issues(
    issues: &[ComplianceIssue],
    total_elements: usize,
    weights: &SeverityWeights,
) -> f64 {
    compliance_score(weights.total(issues), total_elements)
}
