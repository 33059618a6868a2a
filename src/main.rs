use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uis_probe::{config::Config, output, probe::Probe, reports};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// UIS address, host[:port] or full login URL (overrides config)
    #[arg(long, env = "UIS_HOST")]
    host: Option<String>,

    /// Compatibility alias for --host, takes precedence over it
    #[arg(long)]
    ip: Option<String>,

    /// UIS user name (overrides config)
    #[arg(long, env = "UIS_USERNAME")]
    username: Option<String>,

    /// UIS password (overrides config)
    #[arg(long, env = "UIS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Verify the server TLS certificate (off by default)
    #[arg(long)]
    verify_ssl: bool,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Host pool id
    #[arg(long)]
    hp_id: Option<i64>,

    /// Cluster id
    #[arg(long)]
    cluster_id: Option<i64>,

    /// Host id
    #[arg(long)]
    host_id: Option<i64>,

    /// VM id to report on (defaults to the first VM of the inventory)
    #[arg(long)]
    vm_id: Option<i64>,

    /// Report start time
    #[arg(long)]
    start_time: Option<String>,

    /// Report end time
    #[arg(long)]
    end_time: Option<String>,

    /// Report statistical cycle
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
    cycle: Option<u8>,

    /// Report metrics to collect (default: all)
    #[arg(
        long,
        num_args = 1..,
        value_parser = clap::builder::PossibleValuesParser::new(reports::names())
    )]
    metrics: Option<Vec<String>>,

    /// Output JSON file or directory
    #[arg(short, long)]
    output: Option<String>,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.ip.or(self.host) {
            config.uis.host = host;
        }
        if let Some(username) = self.username {
            config.uis.username = username;
        }
        if let Some(password) = self.password {
            config.uis.password = secrecy::SecretString::new(password.into());
        }
        if self.verify_ssl {
            config.uis.verify_ssl = true;
        }
        if let Some(timeout) = self.timeout {
            config.uis.timeout_seconds = timeout;
        }

        let query = &mut config.query;
        query.hp_id = self.hp_id.or(query.hp_id);
        query.cluster_id = self.cluster_id.or(query.cluster_id);
        query.host_id = self.host_id.or(query.host_id);
        query.vm_id = self.vm_id.or(query.vm_id);
        if let Some(start_time) = self.start_time {
            query.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            query.end_time = end_time;
        }
        if let Some(cycle) = self.cycle {
            query.cycle = cycle;
        }
        if let Some(metrics) = self.metrics {
            query.metrics = metrics;
        }

        if let Some(output) = self.output {
            config.output.path = output;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries the JSON report
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting UIS interface probe v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut config = Config::load(&args.config)?;
    args.apply(&mut config);
    config.validate()?;

    info!("UIS host: {}", config.uis.host);

    let output_target = config.output.path.clone();
    let mut probe = Probe::new(config)?;
    let mut report = probe.run().await;

    let written = output::write_report(Path::new(&output_target), &report)
        .context("Failed to write report")?;
    report.meta.output_file = Some(written.display().to_string());

    println!("{}", serde_json::to_string_pretty(&report)?);

    std::process::exit(report.exit_code());
}
