//! Brand Compliance Checker Library
//!
//! Scores canvas designs against a brand kit (approved colors, fonts and a
//! spacing grid), rewrites designs onto brand values, records an audit trail
//! of checks and manages brand kits per owner.
//!
//! # Module Overview
//!
//! - [`color`] - Hex parsing, RGB distance and palette matching
//! - [`brand_kit`] - Brand kit model, drafts and patches
//! - [`kit_store`] - Kit store with injected persistence
//! - [`element`] - Design element trees
//! - [`compliance`] - Compliance walk and issue types
//! - [`scoring`] - Severity weights and the compliance score
//! - [`autofix`] - Non-mutating brand auto-fix transform
//! - [`audit`] - Fire-and-forget audit persistence
//! - [`config`] - Configuration file support
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```
//! use brandcheck_lib::{ComplianceChecker, DesignElement, IssueSeverity};
//! # use brandcheck_lib::BrandKit;
//! # let kit: BrandKit = serde_json::from_str(r##"{
//! #     "id": "kit", "ownerId": "me", "name": "Lumina", "primaryColor": "#6366f1",
//! #     "headingFont": "Poppins", "bodyFont": "Inter", "enforceStrict": true,
//! #     "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"
//! # }"##).unwrap();
//!
//! let design = vec![DesignElement::shape("cta").with_fill("#ff0000")];
//! let check = ComplianceChecker::default().check(&design, &kit, None);
//!
//! assert_eq!(check.issues.len(), 1);
//! assert_eq!(check.issues[0].severity, IssueSeverity::Error);
//! assert_eq!(check.score, 0.0);
//! ```

pub mod audit;
pub mod autofix;
pub mod brand_kit;
pub mod color;
pub mod compliance;
pub mod config;
pub mod element;
pub mod error;
pub mod input;
pub mod kit_store;
pub mod output;
pub mod scoring;

pub use audit::{
    AuditLog, AuditOutcome, AuditRecord, AuditSink, AuditTicket, JsonlAuditSink, MemoryAuditSink,
    RestAuditSink,
};
pub use autofix::{auto_fix, AppliedFix, AutoFixOutcome};
pub use brand_kit::{BrandKit, BrandKitDraft, BrandKitPatch, NamedColor};
pub use color::{color_distance, parse_hex, BrandPalette, HexColor, DEFAULT_MATCH_THRESHOLD};
pub use compliance::{
    snap_to_grid, ComplianceCheck, ComplianceChecker, ComplianceIssue, IssueCategory,
    IssueCounts, IssueSeverity, SeverityCounts,
};
pub use config::{AuditConfig, Config, MatchingConfig, ScoringConfig, StoreConfig};
pub use element::{count_nodes, load_design, walk, DesignElement, ElementKind, Position};
pub use error::{BrandError, Result};
pub use kit_store::{BrandKitStore, JsonFileRepository, KitRepository, MemoryRepository};
pub use output::{
    BrandOutput, CheckOutput, ErrorOutput, FixOutput, KitDescriptor, KitListOutput, KitOutput,
    BRAND_OUTPUT_VERSION,
};
pub use scoring::{compliance_score, SeverityWeights};
