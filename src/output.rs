use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::audit::AuditOutcome;
use crate::autofix::AppliedFix;
use crate::brand_kit::BrandKit;
use crate::compliance::ComplianceCheck;
use crate::error::ErrorPayload;

/// Schema version for output payloads.
pub const BRAND_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum BrandOutput {
    Check(CheckOutput),
    Fix(FixOutput),
    Kit(KitOutput),
    KitList(KitListOutput),
    KitDeleted(KitOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitDescriptor {
    pub id: String,
    pub name: String,
    pub enforce_strict: bool,
}

impl From<&BrandKit> for KitDescriptor {
    fn from(kit: &BrandKit) -> Self {
        Self {
            id: kit.id.clone(),
            name: kit.name.clone(),
            enforce_strict: kit.enforce_strict,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutput {
    pub version: String,
    pub design: PathBuf,
    pub kit: KitDescriptor,
    pub min_score: f64,
    pub passed: bool,
    pub check: ComplianceCheck,
    pub audit: AuditOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixOutput {
    pub version: String,
    pub design: PathBuf,
    pub kit: KitDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_to: Option<PathBuf>,
    pub fixes: Vec<AppliedFix>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitOutput {
    pub version: String,
    pub kit: BrandKit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitListOutput {
    pub version: String,
    pub owner_id: String,
    pub kits: Vec<BrandKit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}
