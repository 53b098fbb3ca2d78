use std::num::NonZeroU64;
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::ValidationError;

use super::parsers::parse_duration_str;

/// Which preset scenario(s) the runner executes.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    All,
    Api,
    Proxy,
    Web,
    Quick,
}

impl ScenarioKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ScenarioKind::All => "all",
            ScenarioKind::Api => "api",
            ScenarioKind::Proxy => "proxy",
            ScenarioKind::Web => "web",
            ScenarioKind::Quick => "quick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveU64(NonZeroU64);

impl PositiveU64 {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for PositiveU64 {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        NonZeroU64::new(value)
            .map(PositiveU64)
            .ok_or_else(|| ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveU64 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveU64::try_from(value)
    }
}

impl From<PositiveU64> for u64 {
    fn from(value: PositiveU64) -> Self {
        value.get()
    }
}

/// A validated run duration. The original text form is preserved because it is
/// forwarded verbatim to the external tool's `--run-time` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTime {
    raw: String,
    duration: Duration,
}

impl RunTime {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

impl std::str::FromStr for RunTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let duration = parse_duration_str(s)?;
        Ok(RunTime {
            raw: s.trim().to_owned(),
            duration,
        })
    }
}

impl std::fmt::Display for RunTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
