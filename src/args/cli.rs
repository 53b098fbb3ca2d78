use std::time::Duration;

use clap::Parser;

use super::parsers::{parse_duration_arg, parse_positive_u64, parse_run_time};
use super::types::{PositiveU64, RunTime, ScenarioKind};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Load-test orchestrator for the demo service stack - health-gates the web, proxy, and API services, then drives scenario runs through an external load-generation tool."
)]
pub struct RunnerArgs {
    /// Test scenario to run
    #[arg(long, value_enum, default_value = "quick", ignore_case = true)]
    pub scenario: ScenarioKind,

    /// Number of concurrent simulated users
    #[arg(long, short = 'u', default_value = "10", value_parser = parse_positive_u64)]
    pub users: PositiveU64,

    /// Users to spawn per second during ramp-up
    #[arg(long = "spawn-rate", short = 'r', default_value = "2", value_parser = parse_positive_u64)]
    pub spawn_rate: PositiveU64,

    /// Test duration passed to the external tool (e.g. 60s, 5m)
    #[arg(long = "run-time", short = 't', default_value = "60s", value_parser = parse_run_time)]
    pub run_time: RunTime,

    /// Skip the service health checks before running scenarios
    #[arg(long = "skip-health-check")]
    pub skip_health_check: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by LOADCTL_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Path to config file (TOML/JSON). Defaults to ./loadctl.toml or ./loadctl.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Base URL of the web frontend
    #[arg(long = "web-host", default_value = "http://localhost:5000")]
    pub web_host: String,

    /// Base URL of the proxy service
    #[arg(long = "proxy-host", default_value = "http://localhost:5001")]
    pub proxy_host: String,

    /// Base URL of the API service
    #[arg(long = "api-host", default_value = "http://localhost:5002")]
    pub api_host: String,

    /// Directory for tabular and report artifacts
    #[arg(long = "results-path", default_value = "results")]
    pub results_path: String,

    /// External load-generation tool binary
    #[arg(long, default_value = "locust")]
    pub tool: String,

    /// Scenario definition file handed to the external tool
    #[arg(long = "scenario-file", default_value = "locustfile.py")]
    pub scenario_file: String,

    /// Health endpoint path probed on each host
    #[arg(long = "health-path", default_value = "/health")]
    pub health_path: String,

    /// Per-probe request timeout (supports ms/s/m/h)
    #[arg(long = "health-timeout", default_value = "5s", value_parser = parse_duration_arg)]
    pub health_timeout: Duration,

    /// Interval between health probes (supports ms/s/m/h)
    #[arg(long = "health-poll-interval", default_value = "2s", value_parser = parse_duration_arg)]
    pub health_poll_interval: Duration,

    /// Maximum time to wait for each host to become healthy (supports ms/s/m/h)
    #[arg(long = "health-max-wait", default_value = "30s", value_parser = parse_duration_arg)]
    pub health_max_wait: Duration,
}
