//! Declarative simulated-user archetypes.
//!
//! Each archetype names the scenario class the external tool runs and carries
//! the same traffic description in data form: a set of weighted HTTP GET
//! actions plus an inter-action wait range. Actions classify responses by
//! status code only; a failed action is recorded and the session continues.

use std::time::Duration;

use rand::Rng;


const SUCCESS_STATUS: u16 = 200;

pub const WEATHER_PATH: &str = "/weatherforecast";
pub const HEALTH_PATH: &str = "/health";

/// External JSON endpoint exercised through the proxy service.
pub const EXTERNAL_JSON_TARGET: &str = "https://httpbin.org/json";
/// Internal API address resolved by service discovery when routed through the
/// proxy.
pub const INTERNAL_API_TARGET: &str = "https+http://apiservice/weatherforecast";

const PROXY_SWEEP_TARGETS: [&str; 3] = [
    "https://httpbin.org/json",
    "https://httpbin.org/status/200",
    "https://httpbin.org/delay/1",
];

/// One HTTP GET issued by a simulated user. Proxy variants carry their target
/// URL-encoded in the `url` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Get { path: &'static str },
    ProxyGet { target: &'static str },
    ProxySweep { targets: &'static [&'static str] },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Success,
    Failure { reason: String },
}

impl ActionOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success)
    }
}

impl Action {
    /// Request paths rendered relative to the target host.
    #[must_use]
    pub fn request_paths(&self) -> Vec<String> {
        match self {
            Action::Get { path } => vec![(*path).to_owned()],
            Action::ProxyGet { target } => vec![proxy_path(target)],
            Action::ProxySweep { targets } => {
                targets.iter().map(|target| proxy_path(target)).collect()
            }
        }
    }

    /// Status 200 is a success; everything else is a recorded failure whose
    /// reason carries the observed code.
    #[must_use]
    pub fn classify(&self, status: u16) -> ActionOutcome {
        if status == SUCCESS_STATUS {
            ActionOutcome::Success
        } else {
            ActionOutcome::Failure {
                reason: self.failure_reason(status),
            }
        }
    }

    fn failure_reason(&self, status: u16) -> String {
        match self {
            Action::Get { path } if *path == HEALTH_PATH => {
                format!("Health check failed with status {status}")
            }
            Action::Get { .. } => format!("Got status code {status}"),
            Action::ProxyGet { target } if *target == INTERNAL_API_TARGET => {
                format!("Internal proxy call failed with status {status}")
            }
            Action::ProxyGet { .. } | Action::ProxySweep { .. } => {
                format!("Proxy call failed with status {status}")
            }
        }
    }

    /// Issues the action's GET request(s) against `host` and classifies each
    /// response. Transport errors are recorded failures, never fatal.
    pub async fn perform(&self, client: &reqwest::Client, host: &str) -> Vec<ActionOutcome> {
        let mut outcomes = Vec::new();
        for path in self.request_paths() {
            let url = format!("{host}{path}");
            let outcome = match client.get(&url).send().await {
                Ok(response) => self.classify(response.status().as_u16()),
                Err(err) => ActionOutcome::Failure {
                    reason: format!("Request to {path} failed: {err}"),
                },
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

fn proxy_path(target: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", target)
        .finish();
    format!("/proxy?{query}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl WaitRange {
    #[must_use]
    pub fn sample<R: Rng>(self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedAction {
    pub weight: u32,
    pub action: Action,
}

/// Declarative body of one archetype: wait range plus weighted actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchetypeDef {
    pub wait: WaitRange,
    pub actions: &'static [WeightedAction],
}

impl ArchetypeDef {
    /// Weighted random choice across the archetype's actions. Returns `None`
    /// only for an empty or zero-weight action set.
    #[must_use]
    pub fn pick_action<R: Rng>(self, rng: &mut R) -> Option<Action> {
        let total: u32 = self
            .actions
            .iter()
            .fold(0u32, |acc, entry| acc.saturating_add(entry.weight));
        if total == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..total);
        for entry in self.actions {
            if roll < entry.weight {
                return Some(entry.action);
            }
            roll = roll.saturating_sub(entry.weight);
        }
        None
    }
}

static WEB_ACTIONS: [WeightedAction; 4] = [
    WeightedAction {
        weight: 3,
        action: Action::Get { path: WEATHER_PATH },
    },
    WeightedAction {
        weight: 2,
        action: Action::ProxyGet {
            target: EXTERNAL_JSON_TARGET,
        },
    },
    WeightedAction {
        weight: 4,
        action: Action::ProxyGet {
            target: INTERNAL_API_TARGET,
        },
    },
    WeightedAction {
        weight: 1,
        action: Action::Get { path: HEALTH_PATH },
    },
];

static API_ACTIONS: [WeightedAction; 2] = [
    WeightedAction {
        weight: 1,
        action: Action::Get { path: WEATHER_PATH },
    },
    WeightedAction {
        weight: 1,
        action: Action::Get { path: HEALTH_PATH },
    },
];

static PROXY_ACTIONS: [WeightedAction; 2] = [
    WeightedAction {
        weight: 2,
        action: Action::ProxySweep {
            targets: &PROXY_SWEEP_TARGETS,
        },
    },
    WeightedAction {
        weight: 1,
        action: Action::Get { path: HEALTH_PATH },
    },
];

/// Named user archetypes understood by the external tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    /// Mixed traffic against the web frontend: direct API calls, proxy calls
    /// to external and internal targets, and health checks.
    Web,
    /// Focused traffic against the API service.
    Api,
    /// Focused traffic against the proxy service.
    Proxy,
}

impl Archetype {
    /// Scenario class name handed to the external tool.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Archetype::Web => "WebFrontendUser",
            Archetype::Api => "ApiServiceUser",
            Archetype::Proxy => "ProxyServiceUser",
        }
    }

    #[must_use]
    pub const fn definition(self) -> ArchetypeDef {
        match self {
            Archetype::Web => ArchetypeDef {
                wait: WaitRange {
                    min_ms: 1_000,
                    max_ms: 3_000,
                },
                actions: &WEB_ACTIONS,
            },
            Archetype::Api => ArchetypeDef {
                wait: WaitRange {
                    min_ms: 500,
                    max_ms: 2_000,
                },
                actions: &API_ACTIONS,
            },
            Archetype::Proxy => ArchetypeDef {
                wait: WaitRange {
                    min_ms: 1_000,
                    max_ms: 2_000,
                },
                actions: &PROXY_ACTIONS,
            },
        }
    }
}
