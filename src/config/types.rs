use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration_str;
use crate::error::ValidationError;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub users: Option<u64>,
    pub spawn_rate: Option<u64>,
    pub run_time: Option<String>,
    pub results_path: Option<String>,
    pub tool: Option<String>,
    pub scenario_file: Option<String>,
    pub hosts: Option<HostsConfig>,
    pub health: Option<HealthConfig>,
}

/// Base URLs of the demo services; ports depend on the local stack layout.
#[derive(Debug, Default, Deserialize)]
pub struct HostsConfig {
    pub web: Option<String>,
    pub proxy: Option<String>,
    pub api: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HealthConfig {
    pub path: Option<String>,
    pub timeout: Option<DurationValue>,
    pub poll_interval: Option<DurationValue>,
    pub max_wait: Option<DurationValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_str(text),
        }
    }
}
