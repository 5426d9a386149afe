use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::brand_kit::DEFAULT_HEADING_FONT_SIZE;
use crate::color::DEFAULT_MATCH_THRESHOLD;
use crate::error::{BrandError, Result};
use crate::scoring::SeverityWeights;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub matching: MatchingConfig,
    pub scoring: ScoringConfig,
    pub store: StoreConfig,
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// RGB distance under which a color counts as a brand color.
    pub color_threshold: f64,
    /// Text at or above this size should use the heading font.
    pub heading_font_size: f32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            color_threshold: DEFAULT_MATCH_THRESHOLD,
            heading_font_size: DEFAULT_HEADING_FONT_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: SeverityWeights,
    /// Checks scoring below this fail (exit code 1).
    pub min_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("brand-kits.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// JSON-lines file receiving one record per check.
    pub log_path: Option<PathBuf>,
    /// Backend base URL; records are posted to `{endpoint}/rest/v1/{table}`.
    pub endpoint: Option<String>,
    pub table: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            endpoint: None,
            table: "brand_compliance_checks".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// `~/.config/brandcheck/config.toml`, if a config directory is known.
    pub fn central_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("brandcheck").join("config.toml"))
    }

    /// Priority: explicit path > central config (if present) > defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::central_config_path() {
            Some(central) if central.exists() => Self::from_file(&central),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.matching.color_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(BrandError::Config(format!(
                "matching.color_threshold must be a positive number, got {threshold}"
            )));
        }
        let heading = self.matching.heading_font_size;
        if !heading.is_finite() || heading <= 0.0 {
            return Err(BrandError::Config(format!(
                "matching.heading_font_size must be a positive number, got {heading}"
            )));
        }

        let weights = self.scoring.weights;
        for (name, value) in [
            ("error", weights.error),
            ("warning", weights.warning),
            ("info", weights.info),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BrandError::Config(format!(
                    "scoring.weights.{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.scoring.min_score) {
            return Err(BrandError::Config(format!(
                "scoring.min_score must be within [0, 1], got {}",
                self.scoring.min_score
            )));
        }

        if let Some(endpoint) = &self.audit.endpoint {
            Url::parse(endpoint)?;
        }
        if self.audit.table.trim().is_empty() {
            return Err(BrandError::Config("audit.table must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_match_expected() {
        let cfg = Config::default();

        assert!((cfg.matching.color_threshold - 15.0).abs() < f64::EPSILON);
        assert!((cfg.matching.heading_font_size - 24.0).abs() < f32::EPSILON);
        assert!((cfg.scoring.weights.error - 3.0).abs() < f64::EPSILON);
        assert!((cfg.scoring.weights.warning - 1.0).abs() < f64::EPSILON);
        assert!((cfg.scoring.weights.info - 0.5).abs() < f64::EPSILON);
        assert_eq!(cfg.scoring.min_score, 0.0);
        assert_eq!(cfg.store.path, PathBuf::from("brand-kits.json"));
        assert!(cfg.audit.log_path.is_none());
        assert_eq!(cfg.audit.table, "brand_compliance_checks");
        assert_eq!(cfg.audit.request_timeout, Duration::from_secs(10));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_keys() {
        let cfg = Config::from_toml(
            r#"
[matching]
color_threshold = 20.0

[scoring.weights]
error = 5.0

[audit]
log_path = "audit.jsonl"
request_timeout = "3s"
"#,
        )
        .unwrap();

        assert!((cfg.matching.color_threshold - 20.0).abs() < f64::EPSILON);
        assert!((cfg.matching.heading_font_size - 24.0).abs() < f32::EPSILON);
        assert!((cfg.scoring.weights.error - 5.0).abs() < f64::EPSILON);
        assert!((cfg.scoring.weights.warning - 1.0).abs() < f64::EPSILON);
        assert_eq!(cfg.audit.log_path, Some(PathBuf::from("audit.jsonl")));
        assert_eq!(cfg.audit.request_timeout, Duration::from_secs(3));
        assert_eq!(cfg.audit.table, "brand_compliance_checks");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml("[matching\ncolor_threshold = 1"),
            Err(BrandError::Toml(_))
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut cfg = Config::default();
        cfg.matching.color_threshold = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.scoring.min_score = 1.5;
        assert!(cfg.validate().unwrap_err().to_string().contains("min_score"));

        let mut cfg = Config::default();
        cfg.scoring.weights.info = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.audit.endpoint = Some("not a url".to_string());
        assert!(matches!(cfg.validate(), Err(BrandError::InvalidUrl(_))));
    }

    #[test]
    fn load_reads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brandcheck.toml");
        std::fs::write(&path, "[scoring]\nmin_score = 0.8\n").unwrap();

        let cfg = Config::load(Some(&path)).unwrap();
        assert!((cfg.scoring.min_score - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn load_fails_for_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/missing/brandcheck.toml"))).unwrap_err();
        assert!(matches!(err, BrandError::Io(_)));
    }
}
