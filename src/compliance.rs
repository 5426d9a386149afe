//! Brand compliance walk over design element trees.
//!
//! Every node is visited once in pre-order and checked independently for:
//! - fill and stroke colors outside the brand palette
//! - text fonts other than the kit's heading/body fonts
//! - positions off the kit's spacing grid
//!
//! Problems are never merged: an element with three deviations yields three issues.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use crate::brand_kit::BrandKit;
use crate::color::BrandPalette;
use crate::config::{Config, MatchingConfig};
use crate::element::{walk, DesignElement, Position};
use crate::scoring::{score_issues, SeverityWeights};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Color,
    Font,
    Spacing,
    Other,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueCategory::Color => "color",
            IssueCategory::Font => "font",
            IssueCategory::Spacing => "spacing",
            IssueCategory::Other => "other",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
    Info,
}

impl IssueSeverity {
    /// Severity of color and font deviations for a kit.
    pub fn for_kit(kit: &BrandKit) -> Self {
        if kit.enforce_strict {
            IssueSeverity::Error
        } else {
            IssueSeverity::Warning
        }
    }
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueSeverity::Error => "error",
            IssueSeverity::Warning => "warning",
            IssueSeverity::Info => "info",
        })
    }
}

/// One flagged deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceIssue {
    pub category: IssueCategory,
    pub severity: IssueSeverity,
    pub element_id: String,
    pub element_type: String,
    /// Attribute that deviates (`fill`, `stroke`, `fontFamily`, `position`).
    pub property: String,
    pub observed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCounts {
    pub color: usize,
    pub font: usize,
    pub spacing: usize,
    pub other: usize,
}

impl IssueCounts {
    fn record(&mut self, category: IssueCategory) {
        match category {
            IssueCategory::Color => self.color += 1,
            IssueCategory::Font => self.font += 1,
            IssueCategory::Spacing => self.spacing += 1,
            IssueCategory::Other => self.other += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeverityCounts {
    fn record(&mut self, severity: IssueSeverity) {
        match severity {
            IssueSeverity::Error => self.error += 1,
            IssueSeverity::Warning => self.warning += 1,
            IssueSeverity::Info => self.info += 1,
        }
    }
}

/// Result of one scoring pass. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceCheck {
    pub id: String,
    pub brand_kit_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub score: f64,
    pub total_elements: usize,
    pub issues: Vec<ComplianceIssue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    pub counts: IssueCounts,
    pub severity_counts: SeverityCounts,
    pub checked_at: DateTime<Utc>,
}

impl ComplianceCheck {
    pub fn passed(&self, min_score: f64) -> bool {
        self.score >= min_score
    }

    pub fn issues_in(&self, category: IssueCategory) -> impl Iterator<Item = &ComplianceIssue> {
        self.issues.iter().filter(move |i| i.category == category)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComplianceChecker {
    pub matching: MatchingConfig,
    pub weights: SeverityWeights,
}

impl ComplianceChecker {
    pub fn new(matching: MatchingConfig, weights: SeverityWeights) -> Self {
        Self { matching, weights }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.matching, config.scoring.weights)
    }

    pub fn check(
        &self,
        forest: &[DesignElement],
        kit: &BrandKit,
        project_id: Option<&str>,
    ) -> ComplianceCheck {
        let palette = kit.palette(self.matching.color_threshold);

        let mut total_elements = 0usize;
        let mut issues = Vec::new();
        for element in walk(forest) {
            total_elements += 1;
            issues.extend(self.inspect_element(element, kit, &palette));
        }

        let mut counts = IssueCounts::default();
        let mut severity_counts = SeverityCounts::default();
        for issue in &issues {
            counts.record(issue.category);
            severity_counts.record(issue.severity);
        }

        let score = score_issues(&issues, total_elements, &self.weights);
        let suggestions = collect_suggestions(&issues);

        tracing::debug!(
            kit = %kit.id,
            project = project_id.unwrap_or("-"),
            elements = total_elements,
            issues = issues.len(),
            score,
            "compliance check complete"
        );

        ComplianceCheck {
            id: Uuid::new_v4().to_string(),
            brand_kit_id: kit.id.clone(),
            project_id: project_id.map(str::to_string),
            score,
            total_elements,
            issues,
            suggestions,
            counts,
            severity_counts,
            checked_at: Utc::now(),
        }
    }

    /// Issues for a single node, ignoring its children.
    pub fn inspect_element(
        &self,
        element: &DesignElement,
        kit: &BrandKit,
        palette: &BrandPalette,
    ) -> Vec<ComplianceIssue> {
        let mut issues = Vec::new();
        let severity = IssueSeverity::for_kit(kit);

        let paints = [("fill", element.fill.as_deref()), ("stroke", element.stroke.as_deref())];
        for (property, value) in paints {
            let Some(color) = value else { continue };
            if !palette.needs_correction(color) {
                continue;
            }
            let suggested = palette.nearest(color).map(str::to_string);
            issues.push(ComplianceIssue {
                category: IssueCategory::Color,
                severity,
                element_id: element.id.clone(),
                element_type: element.kind.name().to_string(),
                property: property.to_string(),
                observed: color.to_string(),
                message: format!(
                    "{} {} on {} '{}' is not a brand color",
                    capitalize(property),
                    color,
                    element.kind,
                    element.id
                ),
                suggested,
            });
        }

        if let Some(font) = element.font_family() {
            if !kit.is_brand_font(font) {
                let suggested = kit
                    .suggested_font(element.font_size(), self.matching.heading_font_size)
                    .to_string();
                issues.push(ComplianceIssue {
                    category: IssueCategory::Font,
                    severity,
                    element_id: element.id.clone(),
                    element_type: element.kind.name().to_string(),
                    property: "fontFamily".to_string(),
                    observed: font.to_string(),
                    message: format!(
                        "Font '{}' on {} '{}' is not a brand font",
                        font, element.kind, element.id
                    ),
                    suggested: Some(suggested),
                });
            }
        }

        if let Some(position) = element.position {
            if let Some(snapped) = snap_to_grid(position, kit.spacing_unit) {
                issues.push(ComplianceIssue {
                    category: IssueCategory::Spacing,
                    severity: IssueSeverity::Info,
                    element_id: element.id.clone(),
                    element_type: element.kind.name().to_string(),
                    property: "position".to_string(),
                    observed: format!("{},{}", position.x, position.y),
                    message: format!(
                        "{} '{}' at ({}, {}) is off the {}px grid",
                        capitalize(element.kind.name()),
                        element.id,
                        position.x,
                        position.y,
                        kit.spacing_unit
                    ),
                    suggested: Some(format!("{},{}", snapped.x, snapped.y)),
                });
            }
        }

        issues
    }
}

const GRID_EPSILON: f64 = 1e-9;

/// Nearest grid position, or `None` when already aligned or the grid is disabled.
pub fn snap_to_grid(position: Position, unit: f64) -> Option<Position> {
    if !unit.is_finite() || unit <= 0.0 {
        return None;
    }
    // `+ 0.0` turns a rounded `-0.0` into `0.0`.
    let snap = |v: f64| (v / unit).round() * unit + 0.0;
    let snapped = Position {
        x: snap(position.x),
        y: snap(position.y),
    };
    let aligned = (position.x - snapped.x).abs() <= GRID_EPSILON
        && (position.y - snapped.y).abs() <= GRID_EPSILON;
    if aligned {
        None
    } else {
        Some(snapped)
    }
}

fn collect_suggestions(issues: &[ComplianceIssue]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();
    for issue in issues {
        let Some(suggested) = issue.suggested.as_deref() else {
            continue;
        };
        if !seen.insert((issue.property.as_str(), issue.observed.as_str(), suggested)) {
            continue;
        }
        let line = match issue.category {
            IssueCategory::Spacing => format!(
                "Move elements at ({}) to ({}) to align with the spacing grid",
                issue.observed, suggested
            ),
            _ => format!(
                "Replace {} {} with {}",
                issue.property, issue.observed, suggested
            ),
        };
        suggestions.push(line);
    }
    suggestions
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
