use crate::error::{ProbeError, Result as ProbeResult};
use crate::reports;
use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub uis: UisConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Connection settings for the UIS management API
#[derive(Debug, Deserialize, Clone)]
pub struct UisConfig {
    /// `host[:port]` or a full URL such as the login page address
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: SecretString,
    #[serde(default)]
    pub verify_ssl: bool,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Parameters of the query battery
#[derive(Debug, Deserialize, Clone)]
pub struct QueryConfig {
    #[serde(default)]
    pub hp_id: Option<i64>,
    #[serde(default)]
    pub cluster_id: Option<i64>,
    #[serde(default)]
    pub host_id: Option<i64>,
    #[serde(default)]
    pub vm_id: Option<i64>,
    #[serde(default = "default_date")]
    pub start_time: String,
    #[serde(default = "default_date")]
    pub end_time: String,
    #[serde(default = "default_cycle")]
    pub cycle: u8,
    /// Metric names to collect; empty means every cataloged metric
    #[serde(default)]
    pub metrics: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
}

pub const MAX_CYCLE: u8 = 4;

fn default_host() -> String {
    "https://10.103.125.116/uis/login".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> SecretString {
    SecretString::new("Admin@123.".into())
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_date() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn default_cycle() -> u8 {
    1
}

fn default_output_path() -> String {
    "tmp/uis_interfaces_result.json".to_string()
}

impl Default for UisConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            username: default_username(),
            password: default_password(),
            verify_ssl: false,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            hp_id: None,
            cluster_id: None,
            host_id: None,
            vm_id: None,
            start_time: default_date(),
            end_time: default_date(),
            cycle: default_cycle(),
            metrics: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        Self::build(path, None)
    }

    /// Same as [`Config::load`] but reads `UIS_PROBE__*` overrides from `vars`
    /// instead of the process environment
    pub fn load_with_env<I, K, V>(path: &str, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self::build(path, Some(vars))
    }

    fn build(path: &str, vars: Option<config::Map<String, String>>) -> Result<Self> {
        // `query.metrics` is the only list; it takes comma-separated names
        let environment = config::Environment::with_prefix("UIS_PROBE")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("query.metrics")
            .source(vars);

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(environment)
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Rejects settings that would make the run meaningless before any request is sent
    pub fn validate(&self) -> ProbeResult<()> {
        if normalize_host(&self.uis.host).is_empty() {
            return Err(ProbeError::Config("UIS host must not be empty".to_string()));
        }
        if self.uis.timeout_seconds == 0 {
            return Err(ProbeError::Config(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.query.cycle > MAX_CYCLE {
            return Err(ProbeError::Config(format!(
                "cycle must be between 0 and {}, got {}",
                MAX_CYCLE, self.query.cycle
            )));
        }
        if let Some(unknown) = self
            .query
            .metrics
            .iter()
            .find(|name| reports::lookup(name).is_none())
        {
            return Err(ProbeError::Config(format!(
                "unknown metric '{}', expected one of: {}",
                unknown,
                reports::names().join(", ")
            )));
        }
        Ok(())
    }
}

impl UisConfig {
    /// Base address every request path is appended to
    pub fn base_url(&self) -> String {
        format!("https://{}", normalize_host(&self.host))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Reduces a host argument to `host[:port]`
///
/// Accepts a bare authority or a full `http(s)://` URL (for example the UIS login
/// page address) and strips stray whitespace and angle brackets.
pub fn normalize_host(raw: &str) -> String {
    let text = raw.trim().trim_matches(|c: char| c == '<' || c == '>');

    let rest = text
        .strip_prefix("https://")
        .or_else(|| text.strip_prefix("http://"));

    if let Some(rest) = rest {
        let authority = rest
            .split(|c: char| c == '/' || c == '?' || c == '#')
            .next()
            .unwrap_or_default();
        if !authority.is_empty() {
            return authority.to_string();
        }
    }

    text.to_string()
}
