//! Audit trail of compliance checks.
//!
//! Persistence is fire-and-forget: [`AuditLog::emit`] hands the record to a
//! background task and returns at once. Write failures are logged and
//! swallowed; they never change the check result. Callers that must outlive
//! the write (a CLI about to exit) can await the returned [`AuditTicket`].

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;
use url::Url;

use crate::compliance::{ComplianceCheck, ComplianceIssue, IssueCounts};
use crate::config::AuditConfig;
use crate::error::{BrandError, Result};

/// Environment variable holding the backend API key.
pub const API_KEY_ENV: &str = "BRANDCHECK_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub user_id: String,
    pub brand_kit_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub check: ComplianceCheck,
}

impl AuditRecord {
    pub fn new(user_id: impl Into<String>, check: ComplianceCheck) -> Self {
        Self {
            user_id: user_id.into(),
            brand_kit_id: check.brand_kit_id.clone(),
            project_id: check.project_id.clone(),
            check,
        }
    }
}

pub trait AuditSink: Send + Sync {
    fn name(&self) -> &str;
    fn write<'a>(&'a self, record: &'a AuditRecord) -> BoxFuture<'a, Result<()>>;
}

/// Appends one JSON document per line.
#[derive(Debug)]
pub struct JsonlAuditSink {
    path: PathBuf,
    lock: tokio::sync::Mutex<()>,
}

impl JsonlAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, record: &AuditRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

impl AuditSink for JsonlAuditSink {
    fn name(&self) -> &str {
        "jsonl"
    }

    fn write<'a>(&'a self, record: &'a AuditRecord) -> BoxFuture<'a, Result<()>> {
        self.append(record).boxed()
    }
}

/// Reads back every record from a JSON-lines audit file.
pub fn read_jsonl(path: &Path) -> Result<Vec<AuditRecord>> {
    let content = std::fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(BrandError::from))
        .collect()
}

/// Row shape of the backend audit table.
#[derive(Debug, Clone, Serialize)]
struct AuditRow<'a> {
    id: &'a str,
    user_id: &'a str,
    brand_kit_id: &'a str,
    project_id: Option<&'a str>,
    score: f64,
    total_elements: usize,
    issues: &'a [ComplianceIssue],
    suggestions: &'a [String],
    counts: IssueCounts,
    checked_at: DateTime<Utc>,
}

impl<'a> From<&'a AuditRecord> for AuditRow<'a> {
    fn from(record: &'a AuditRecord) -> Self {
        Self {
            id: &record.check.id,
            user_id: &record.user_id,
            brand_kit_id: &record.brand_kit_id,
            project_id: record.project_id.as_deref(),
            score: record.check.score,
            total_elements: record.check.total_elements,
            issues: &record.check.issues,
            suggestions: &record.check.suggestions,
            counts: record.check.counts,
            checked_at: record.check.checked_at,
        }
    }
}

/// Inserts rows into a backend-as-a-service REST table (`POST /rest/v1/{table}`).
#[derive(Debug, Clone)]
pub struct RestAuditSink {
    http: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl RestAuditSink {
    pub fn new(
        base_url: &str,
        table: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base = Url::parse(base_url)?;
        let endpoint = base.join(&format!("rest/v1/{}", table.trim_matches('/')))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BrandError::Network)?;
        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn insert(&self, record: &AuditRecord) -> Result<()> {
        let mut request = self
            .http
            .post(self.endpoint.clone())
            .header("Prefer", "return=minimal")
            .json(&AuditRow::from(record));
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(BrandError::backend(Some(status), body))
    }
}

impl AuditSink for RestAuditSink {
    fn name(&self) -> &str {
        "rest"
    }

    fn write<'a>(&'a self, record: &'a AuditRecord) -> BoxFuture<'a, Result<()>> {
        self.insert(record).boxed()
    }
}

/// Keeps records in memory; handy as a test double.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn name(&self) -> &str {
        "memory"
    }

    fn write<'a>(&'a self, record: &'a AuditRecord) -> BoxFuture<'a, Result<()>> {
        let result = self
            .records
            .lock()
            .map(|mut records| records.push(record.clone()))
            .map_err(|_| BrandError::Unknown("audit sink lock poisoned".into()));
        futures::future::ready(result).boxed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    /// No sinks configured.
    Skipped,
    Written,
    /// At least one sink failed; the failure was logged.
    Failed,
}

/// Handle to a pending audit write.
#[derive(Debug)]
pub struct AuditTicket {
    handle: Option<JoinHandle<AuditOutcome>>,
    immediate: AuditOutcome,
}

impl AuditTicket {
    fn ready(outcome: AuditOutcome) -> Self {
        Self {
            handle: None,
            immediate: outcome,
        }
    }

    pub async fn wait(self) -> AuditOutcome {
        match self.handle {
            Some(handle) => handle.await.unwrap_or_else(|err| {
                tracing::warn!(error = %err, "audit task did not complete");
                AuditOutcome::Failed
            }),
            None => self.immediate,
        }
    }
}

#[derive(Clone, Default)]
pub struct AuditLog {
    sinks: Vec<Arc<dyn AuditSink>>,
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sinks.iter().map(|s| s.name()).collect();
        f.debug_struct("AuditLog").field("sinks", &names).finish()
    }
}

impl AuditLog {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Sinks from config: a JSON-lines file and/or a REST table.
    pub fn from_config(config: &AuditConfig) -> Result<Self> {
        let mut log = Self::disabled();
        if let Some(path) = &config.log_path {
            log = log.with_sink(Arc::new(JsonlAuditSink::new(path)));
        }
        if let Some(endpoint) = &config.endpoint {
            let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
            let sink =
                RestAuditSink::new(endpoint, &config.table, api_key, config.request_timeout)?;
            log = log.with_sink(Arc::new(sink));
        }
        Ok(log)
    }

    pub fn is_enabled(&self) -> bool {
        !self.sinks.is_empty()
    }

    /// Starts writing `record` to every sink and returns immediately.
    pub fn emit(&self, record: AuditRecord) -> AuditTicket {
        if self.sinks.is_empty() {
            return AuditTicket::ready(AuditOutcome::Skipped);
        }
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => {
                tracing::warn!(error = %err, "no async runtime; audit record dropped");
                return AuditTicket::ready(AuditOutcome::Failed);
            }
        };

        let sinks = self.sinks.clone();
        let handle = runtime.spawn(async move {
            let mut outcome = AuditOutcome::Written;
            for sink in &sinks {
                match sink.write(&record).await {
                    Ok(()) => tracing::debug!(
                        sink = sink.name(),
                        check = %record.check.id,
                        "audit record written"
                    ),
                    Err(err) => {
                        tracing::warn!(
                            sink = sink.name(),
                            check = %record.check.id,
                            error = %err,
                            "failed to persist audit record"
                        );
                        outcome = AuditOutcome::Failed;
                    }
                }
            }
            outcome
        });

        AuditTicket {
            handle: Some(handle),
            immediate: AuditOutcome::Skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand_kit::sample_kit;
    use crate::compliance::ComplianceChecker;
    use crate::element::DesignElement;

    struct FailingSink;

    impl AuditSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        fn write<'a>(&'a self, _record: &'a AuditRecord) -> BoxFuture<'a, Result<()>> {
            futures::future::ready(Err(BrandError::backend(None, "table missing"))).boxed()
        }
    }

    fn record() -> AuditRecord {
        let kit = sample_kit();
        let forest = vec![DesignElement::shape("s").with_fill("#ff0000")];
        let check = ComplianceChecker::default().check(&forest, &kit, Some("proj"));
        AuditRecord::new(kit.owner_id.clone(), check)
    }

    #[test]
    fn record_is_keyed_by_user_kit_and_project() {
        let record = record();
        assert_eq!(record.user_id, "user-1");
        assert_eq!(record.brand_kit_id, "kit-1");
        assert_eq!(record.project_id.as_deref(), Some("proj"));
    }

    #[test]
    fn emit_without_runtime_does_not_panic() {
        let sink = Arc::new(MemoryAuditSink::new());
        let log = AuditLog::disabled().with_sink(sink.clone());
        let ticket = log.emit(record());
        assert!(ticket.handle.is_none());
        assert_eq!(ticket.immediate, AuditOutcome::Failed);
        assert!(sink.records().is_empty());
    }

    #[tokio::test]
    async fn disabled_log_skips() {
        let outcome = AuditLog::disabled().emit(record()).wait().await;
        assert_eq!(outcome, AuditOutcome::Skipped);
    }

    #[tokio::test]
    async fn memory_sink_receives_record() {
        let sink = Arc::new(MemoryAuditSink::new());
        let log = AuditLog::disabled().with_sink(sink.clone());
        let record = record();

        assert_eq!(log.emit(record.clone()).wait().await, AuditOutcome::Written);
        assert_eq!(sink.records(), vec![record]);
    }

    #[tokio::test]
    async fn failing_sink_is_swallowed_and_other_sinks_still_run() {
        let memory = Arc::new(MemoryAuditSink::new());
        let log = AuditLog::disabled()
            .with_sink(Arc::new(FailingSink))
            .with_sink(memory.clone());

        assert_eq!(log.emit(record()).wait().await, AuditOutcome::Failed);
        assert_eq!(memory.records().len(), 1);
    }

    #[tokio::test]
    async fn jsonl_sink_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit").join("checks.jsonl");
        let log = AuditLog::disabled().with_sink(Arc::new(JsonlAuditSink::new(&path)));

        let first = record();
        let second = record();
        assert_eq!(log.emit(first.clone()).wait().await, AuditOutcome::Written);
        assert_eq!(log.emit(second.clone()).wait().await, AuditOutcome::Written);

        let stored = read_jsonl(&path).unwrap();
        assert_eq!(stored, vec![first, second]);
    }

    #[test]
    fn rest_sink_targets_table_endpoint() {
        let sink = RestAuditSink::new(
            "https://project.example",
            "brand_compliance_checks",
            None,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            sink.endpoint().as_str(),
            "https://project.example/rest/v1/brand_compliance_checks"
        );
        assert!(RestAuditSink::new("nope", "t", None, Duration::from_secs(1)).is_err());
    }

    #[test]
    fn audit_row_uses_snake_case_columns() {
        let record = record();
        let row = serde_json::to_value(AuditRow::from(&record)).unwrap();
        assert_eq!(row["user_id"], "user-1");
        assert_eq!(row["brand_kit_id"], "kit-1");
        assert_eq!(row["project_id"], "proj");
        assert!(row["score"].is_number());
    }

    #[test]
    fn from_config_builds_configured_sinks() {
        let mut config = AuditConfig::default();
        assert!(!AuditLog::from_config(&config).unwrap().is_enabled());

        config.log_path = Some(PathBuf::from("audit.jsonl"));
        config.endpoint = Some("https://project.example".to_string());
        let log = AuditLog::from_config(&config).unwrap();
        assert_eq!(format!("{:?}", log), "AuditLog { sinks: [\"jsonl\", \"rest\"] }");
    }
}
