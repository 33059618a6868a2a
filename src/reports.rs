//! VM Performance Report Catalog
//!
//! Static definitions of the UIS per-VM report metrics. Several metrics share an
//! endpoint and differ only by the numeric `type` query parameter.
//!
//! # Metrics
//! - `cpu`, `memory` - `/report/cpuMemVm`
//! - `disk_read`, `disk_write`, `disk_usage` - `/report/diskVm`
//! - `io` - `/report/ioVm`
//! - `net_total`, `net_in`, `net_out` - `/report/netVm`
//! - `net_sp_in`, `net_sp_out` - `/report/netSpVm`

use serde::Serialize;

/// A single cataloged report metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportDefinition {
    /// Metric key used on the command line and in the run report
    pub name: &'static str,
    /// Endpoint suffix below the `/uis` namespace
    pub endpoint: &'static str,
    /// Value of the `type` query parameter selecting the series
    pub subtype: u8,
    pub display_name: &'static str,
}

impl ReportDefinition {
    /// Candidate request paths, canonical first then the doubled-namespace alias
    pub fn candidate_paths(&self) -> Vec<String> {
        vec![
            format!("/uis{}", self.endpoint),
            format!("/uis/uis{}", self.endpoint),
        ]
    }
}

const fn def(
    name: &'static str,
    endpoint: &'static str,
    subtype: u8,
    display_name: &'static str,
) -> ReportDefinition {
    ReportDefinition {
        name,
        endpoint,
        subtype,
        display_name,
    }
}

/// Every known metric, in default collection order
pub const CATALOG: &[ReportDefinition] = &[
    def("cpu", "/report/cpuMemVm", 0, "CPU utilization"),
    def("memory", "/report/cpuMemVm", 1, "Memory utilization"),
    def("disk_read", "/report/diskVm", 0, "Disk read rate"),
    def("disk_write", "/report/diskVm", 1, "Disk write rate"),
    def("disk_usage", "/report/diskVm", 3, "Disk utilization"),
    def("io", "/report/ioVm", 0, "Disk I/O throughput"),
    def("net_total", "/report/netVm", 0, "Network total traffic"),
    def("net_in", "/report/netVm", 1, "Network inbound traffic"),
    def("net_out", "/report/netVm", 2, "Network outbound traffic"),
    def("net_sp_in", "/report/netSpVm", 0, "Network inbound rate"),
    def("net_sp_out", "/report/netSpVm", 1, "Network outbound rate"),
];

pub fn lookup(name: &str) -> Option<&'static ReportDefinition> {
    CATALOG.iter().find(|d| d.name == name)
}

pub fn names() -> Vec<&'static str> {
    CATALOG.iter().map(|d| d.name).collect()
}

/// Resolves requested metric names against the catalog
///
/// An empty request selects the whole catalog. Repeated names keep their first
/// position. Unknown names are dropped here; configuration validation rejects
/// them before a run starts.
pub fn select(requested: &[String]) -> Vec<&'static ReportDefinition> {
    if requested.is_empty() {
        return CATALOG.iter().collect();
    }

    let mut selected: Vec<&'static ReportDefinition> = Vec::with_capacity(requested.len());
    for definition in requested.iter().filter_map(|name| lookup(name)) {
        if !selected.iter().any(|d| d.name == definition.name) {
            selected.push(definition);
        }
    }
    selected
}
