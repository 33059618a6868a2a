//! Probe Orchestration
//!
//! Sequences one probe run and builds the [`RunReport`].
//!
//! # Stages
//!
//! ```text
//! Authenticating ──ok──► ResolvingInventory ─► ResolvingIdentifier ─► CollectingReports ─► Done
//!        │
//!        └──failed──► Failed (reason: login_failed)
//! ```
//!
//! # Error Handling
//!
//! Login failure is the only terminal condition. Every other failure (unreachable
//! endpoint, HTML error page, missing VM id, a broken report) is recorded in the
//! report and the run carries on.

use crate::config::{Config, QueryConfig};
use crate::error::Result;
use crate::reports::{self, ReportDefinition};
use crate::uis::resolve::resolve_identifier;
use crate::uis::types::Params;
use crate::uis::{AuthResult, FallbackResult, Session};
use reqwest::Method;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authenticating,
    ResolvingInventory,
    ResolvingIdentifier,
    CollectingReports,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    LoginFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoVmId,
}

/// How query parameters are derived for an inventory call
#[derive(Debug, Clone, Copy)]
pub enum ParamScope {
    /// Subset of the configured resource filters
    Resource(&'static [&'static str]),
    /// Fixed paging window
    Paging { offset: u32, limit: u32 },
}

/// One inventory interface and its candidate paths
#[derive(Debug, Clone, Copy)]
pub struct InventoryCall {
    pub name: &'static str,
    pub paths: &'static [&'static str],
    pub scope: ParamScope,
}

pub const VM_SUMMARY: InventoryCall = InventoryCall {
    name: "vm_summary",
    paths: &["/uis/vm/list/summary", "/uis/uis/vm/list/summary"],
    scope: ParamScope::Resource(&["hpId", "clusterId", "hostId", "vmId"]),
};

// Doubled prefix is tried first for this endpoint
pub const VM_LIST_LEGACY: InventoryCall = InventoryCall {
    name: "vm_list_legacy",
    paths: &[
        "/uis/uis/btnSeries/resourceDetail",
        "/uis/btnSeries/resourceDetail",
    ],
    scope: ParamScope::Paging {
        offset: 0,
        limit: 1000,
    },
};

pub const CLUSTER_SUMMARY: InventoryCall = InventoryCall {
    name: "cluster_summary",
    paths: &[
        "/uis/cluster/clusterInfo/basic",
        "/uis/uis/cluster/clusterInfo/basic",
    ],
    scope: ParamScope::Resource(&["hpId", "clusterId"]),
};

pub const HOST_SUMMARY: InventoryCall = InventoryCall {
    name: "host_summary",
    paths: &["/uis/host/summary", "/uis/uis/host/summary"],
    scope: ParamScope::Resource(&["hpId", "clusterId", "hostId"]),
};

/// Resource filters that were actually configured, keyed by UIS parameter name
pub fn resource_params(query: &QueryConfig) -> Params {
    let mut params = Params::new();
    let filters = [
        ("hpId", query.hp_id),
        ("clusterId", query.cluster_id),
        ("hostId", query.host_id),
        ("vmId", query.vm_id),
    ];
    for (key, value) in filters {
        if let Some(value) = value {
            params.insert(key.to_string(), Value::from(value));
        }
    }
    params
}

impl InventoryCall {
    pub fn params(&self, resource: &Params) -> Params {
        match self.scope {
            ParamScope::Resource(keys) => resource
                .iter()
                .filter(|(key, _)| keys.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            ParamScope::Paging { offset, limit } => {
                let mut params = Params::new();
                params.insert("offset".to_string(), Value::from(offset));
                params.insert("limit".to_string(), Value::from(limit));
                params
            }
        }
    }
}

pub fn report_params(
    vm_id: i64,
    query: &QueryConfig,
    definition: &ReportDefinition,
) -> Params {
    let mut params = Params::new();
    params.insert("domainId".to_string(), Value::from(vm_id));
    params.insert("cycle".to_string(), Value::from(query.cycle));
    params.insert("startTime".to_string(), Value::from(query.start_time.as_str()));
    params.insert("endTime".to_string(), Value::from(query.end_time.as_str()));
    params.insert("type".to_string(), Value::from(definition.subtype));
    params
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRange {
    pub start_time: String,
    pub end_time: String,
    pub cycle: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunMeta {
    pub generated_at: String,
    pub host: String,
    pub normalized_host: String,
    pub verify_ssl: bool,
    pub timeout: u64,
    pub time_range: TimeRange,
    pub resolved_vm_id: Option<i64>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

/// Per-metric report results, serialized as an object in collection order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSet(pub Vec<(String, FallbackResult)>);

impl ReportSet {
    pub fn get(&self, metric: &str) -> Option<&FallbackResult> {
        self.0.iter().find(|(name, _)| name == metric).map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ReportSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, result) in &self.0 {
            map.serialize_entry(name, result)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VmReports {
    Collected(ReportSet),
    Skipped {
        skipped: bool,
        reason: SkipReason,
        message: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Interfaces {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<AuthResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_summary: Option<FallbackResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_list_legacy: Option<FallbackResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_summary: Option<FallbackResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_summary: Option<FallbackResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_reports: Option<VmReports>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub meta: RunMeta,
    pub interfaces: Interfaces,
}

impl RunReport {
    /// 0 for a completed run, 1 when login failed
    pub fn exit_code(&self) -> i32 {
        if self.meta.success {
            0
        } else {
            1
        }
    }
}

fn now_rfc3339() -> String {
    chrono::Local::now().to_rfc3339()
}

/// Drives one probe run over a shared session
pub struct Probe {
    config: Config,
    session: Session,
    stage: Stage,
}

impl Probe {
    pub fn new(config: Config) -> Result<Self> {
        let session = Session::new(&config.uis)?;
        Ok(Self::with_session(config, session))
    }

    pub fn with_session(config: Config, session: Session) -> Self {
        Self {
            config,
            session,
            stage: Stage::Authenticating,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        info!("Probe stage: {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    fn new_report(&self) -> RunReport {
        let uis = &self.config.uis;
        let query = &self.config.query;
        RunReport {
            meta: RunMeta {
                generated_at: now_rfc3339(),
                host: uis.host.clone(),
                normalized_host: crate::config::normalize_host(&uis.host),
                verify_ssl: uis.verify_ssl,
                timeout: uis.timeout_seconds,
                time_range: TimeRange {
                    start_time: query.start_time.clone(),
                    end_time: query.end_time.clone(),
                    cycle: query.cycle,
                },
                resolved_vm_id: None,
                success: false,
                reason: None,
                finished_at: None,
                output_file: None,
            },
            interfaces: Interfaces::default(),
        }
    }

    async fn inventory(&self, call: &InventoryCall, resource: &Params) -> FallbackResult {
        let params = call.params(resource);
        let result = self
            .session
            .invoke_with_fallback(Method::GET, call.paths, Some(&params))
            .await;
        log_outcome(call.name, &result);
        result
    }

    async fn collect_reports(&self, vm_id: i64) -> ReportSet {
        let mut collected = ReportSet::default();
        for definition in reports::select(&self.config.query.metrics) {
            let params = report_params(vm_id, &self.config.query, definition);
            let paths = definition.candidate_paths();
            let result = self
                .session
                .invoke_with_fallback(Method::GET, &paths, Some(&params))
                .await;
            log_outcome(definition.name, &result);
            collected.0.push((definition.name.to_string(), result));
        }
        collected
    }

    /// Runs the full query battery and returns the report
    ///
    /// Never fails: every request outcome, including login failure, ends up in
    /// the report. Check [`RunReport::exit_code`] for the run verdict.
    pub async fn run(&mut self) -> RunReport {
        let mut report = self.new_report();

        self.stage = Stage::Authenticating;
        info!("Authenticating against {}", self.session.base_url());
        let login = self.session.login().await;
        let logged_in = login.succeeded();
        report.interfaces.login = Some(login);

        if !logged_in {
            self.enter(Stage::Failed);
            report.meta.success = false;
            report.meta.reason = Some(FailureReason::LoginFailed);
            return report;
        }

        self.enter(Stage::ResolvingInventory);
        let resource = resource_params(&self.config.query);
        report.interfaces.vm_summary = Some(self.inventory(&VM_SUMMARY, &resource).await);
        report.interfaces.vm_list_legacy = Some(self.inventory(&VM_LIST_LEGACY, &resource).await);
        report.interfaces.cluster_summary =
            Some(self.inventory(&CLUSTER_SUMMARY, &resource).await);
        report.interfaces.host_summary = Some(self.inventory(&HOST_SUMMARY, &resource).await);

        self.enter(Stage::ResolvingIdentifier);
        let listings: Vec<&FallbackResult> = [
            &report.interfaces.vm_summary,
            &report.interfaces.vm_list_legacy,
        ]
        .into_iter()
        .filter_map(Option::as_ref)
        .collect();
        let vm_id = resolve_identifier(self.config.query.vm_id, &listings);
        report.meta.resolved_vm_id = vm_id;

        report.interfaces.vm_reports = Some(match vm_id {
            Some(vm_id) => {
                info!("Collecting VM reports for domain {}", vm_id);
                self.enter(Stage::CollectingReports);
                VmReports::Collected(self.collect_reports(vm_id).await)
            }
            None => {
                warn!("No VM id configured or found in inventory, skipping reports");
                VmReports::Skipped {
                    skipped: true,
                    reason: SkipReason::NoVmId,
                    message: "no vm id configured and none found in the VM listings".to_string(),
                }
            }
        });

        self.enter(Stage::Done);
        report.meta.success = true;
        report.meta.finished_at = Some(now_rfc3339());
        report
    }
}

fn log_outcome(name: &str, result: &FallbackResult) {
    match &result.selected {
        Some(selected) if selected.response.is_structured_success() => info!(
            "{}: {} answered {:?} after {} attempt(s)",
            name,
            selected.request.path,
            selected.response.status_code,
            result.attempts.len()
        ),
        Some(selected) => warn!(
            "{}: no usable response, last status {:?}",
            name, selected.response.status_code
        ),
        None => warn!("{}: no candidate paths", name),
    }
}
