//! UIS Interface Probe
//!
//! A diagnostic probe for the UIS virtualization management web API.
//!
//! # Overview
//!
//! The probe logs in once, then issues a fixed battery of read-only queries
//! (VM, cluster and host inventory, per-VM performance reports) and records every
//! request/response pair, failed attempts included, into a single JSON report.
//! It observes the API surface; it does not interpret the returned data beyond
//! locating a VM id to report on.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     HTTPS + cookie     ┌──────────────────────────────┐
//! │    UIS      │ ◄────────────────────► │            Probe             │
//! │   web API   │   /uis/..., /uis/uis/  │                              │
//! └─────────────┘                        │  login ─► inventory ─► vm id │
//!                                        │         ─► reports           │
//!                                        └──────────────┬───────────────┘
//!                                                       │ JSON snapshot
//!                                                       ▼
//!                                               uis_interfaces_*.json
//! ```
//!
//! # Modules
//!
//! - [`uis`] - HTTP session, single and fallback invocation, login, VM id resolution
//! - [`probe`] - Run orchestration and the report model
//! - [`reports`] - Catalog of VM report metrics
//! - [`output`] - Snapshot file writing
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use uis_probe::{config::Config, probe::Probe};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     let mut probe = Probe::new(config)?;
//!     let report = probe.run().await;
//!     std::process::exit(report.exit_code());
//! }
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod probe;
pub mod reports;
pub mod uis;
