use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

use crate::color::HexColorParseError;

#[derive(Debug, Error)]
pub enum BrandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Backend error (status: {status:?}): {message}")]
    Backend {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Brand kit not found: {0}")]
    KitNotFound(String),

    #[error("Invalid brand kit: {0}")]
    InvalidKit(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl BrandError {
    pub fn backend(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        BrandError::Backend {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_kit(message: impl Into<String>) -> Self {
        BrandError::InvalidKit(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            BrandError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            BrandError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity to the audit endpoint, or pass --no-audit.",
            ),
            BrandError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify [audit].endpoint is an absolute URL (e.g., https://project.example).",
            ),
            BrandError::Backend { status, message } => ErrorPayload::new(
                ErrorCategory::Backend,
                format!("Backend error (status {:?}): {}", status, message),
                "Check BRANDCHECK_API_KEY and the [audit].table name.",
            ),
            BrandError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Check the JSON input against the documented element/kit shape.",
            ),
            BrandError::Yaml(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Check the YAML input against the documented element/kit shape.",
            ),
            BrandError::Toml(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Fix the TOML syntax in the config file.",
            ),
            BrandError::KitNotFound(id) => ErrorPayload::new(
                ErrorCategory::Kit,
                format!("Brand kit not found: {}", id),
                "Run `brandcheck kit list --owner <OWNER>` to see available kit ids.",
            ),
            BrandError::InvalidKit(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("color") {
                    ErrorPayload::new(
                        ErrorCategory::Kit,
                        msg.to_string(),
                        "Use six-digit hex colors such as #6366f1.",
                    )
                } else if lower.contains("spacing") {
                    ErrorPayload::new(
                        ErrorCategory::Kit,
                        msg.to_string(),
                        "Use a non-negative spacing unit in pixels (0 disables spacing checks).",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Kit,
                        msg.to_string(),
                        "Provide a name, a primary color and both heading/body fonts.",
                    )
                }
            }
            BrandError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("file not found") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Verify the file exists; use an absolute path or run from the working directory.",
                    )
                } else if lower.contains("unsupported file extension") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use a supported input type (json, yaml, yml).",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and the config file values.",
                    )
                }
            }
            BrandError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

impl From<HexColorParseError> for BrandError {
    fn from(err: HexColorParseError) -> Self {
        BrandError::InvalidKit(format!("invalid color: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, BrandError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Input,
    Kit,
    Network,
    Backend,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
