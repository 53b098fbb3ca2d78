use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, RunTime, RunnerArgs};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments. Values set explicitly on
/// the command line always win over the config file.
///
/// # Errors
///
/// Returns an error when a config value fails validation.
pub fn apply_config(
    args: &mut RunnerArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "users")
        && let Some(users) = config.users
    {
        args.users = ensure_positive(users, "users")?;
    }

    if !is_cli(matches, "spawn_rate")
        && let Some(spawn_rate) = config.spawn_rate
    {
        args.spawn_rate = ensure_positive(spawn_rate, "spawn_rate")?;
    }

    if !is_cli(matches, "run_time")
        && let Some(run_time) = config.run_time.as_deref()
    {
        args.run_time = run_time.parse::<RunTime>().map_err(|err| {
            AppError::config(ConfigError::InvalidValue {
                field: "run_time",
                source: err,
            })
        })?;
    }

    if !is_cli(matches, "results_path")
        && let Some(path) = config.results_path.clone()
    {
        args.results_path = path;
    }

    if !is_cli(matches, "tool")
        && let Some(tool) = config.tool.clone()
    {
        args.tool = tool;
    }

    if !is_cli(matches, "scenario_file")
        && let Some(file) = config.scenario_file.clone()
    {
        args.scenario_file = file;
    }

    if let Some(hosts) = config.hosts.as_ref() {
        if !is_cli(matches, "web_host")
            && let Some(web) = hosts.web.clone()
        {
            args.web_host = web;
        }
        if !is_cli(matches, "proxy_host")
            && let Some(proxy) = hosts.proxy.clone()
        {
            args.proxy_host = proxy;
        }
        if !is_cli(matches, "api_host")
            && let Some(api) = hosts.api.clone()
        {
            args.api_host = api;
        }
    }

    if let Some(health) = config.health.as_ref() {
        if !is_cli(matches, "health_path")
            && let Some(path) = health.path.clone()
        {
            args.health_path = path;
        }
        if !is_cli(matches, "health_timeout")
            && let Some(timeout) = health.timeout.as_ref()
        {
            args.health_timeout = duration_field(timeout, "health.timeout")?;
        }
        if !is_cli(matches, "health_poll_interval")
            && let Some(interval) = health.poll_interval.as_ref()
        {
            args.health_poll_interval = duration_field(interval, "health.poll_interval")?;
        }
        if !is_cli(matches, "health_max_wait")
            && let Some(max_wait) = health.max_wait.as_ref()
        {
            args.health_max_wait = duration_field(max_wait, "health.max_wait")?;
        }
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, id: &str) -> bool {
    matches!(matches.value_source(id), Some(ValueSource::CommandLine))
}

fn ensure_positive(value: u64, field: &'static str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value)
        .map_err(|err| AppError::config(ConfigError::InvalidValue { field, source: err }))
}

fn duration_field(
    value: &super::types::DurationValue,
    field: &'static str,
) -> AppResult<std::time::Duration> {
    value
        .to_duration()
        .map_err(|err| AppError::config(ConfigError::InvalidValue { field, source: err }))
}
