use clap::{CommandFactory, FromArgMatches};
use tracing::{error, info};

use crate::archetypes::Archetype;
use crate::args::{RunnerArgs, ScenarioKind};
use crate::error::{AppError, AppResult, ValidationError};
use crate::health::{self, HealthGateOptions};
use crate::runner::{self, RunnerSettings, ScenarioRun};
use crate::summary::{self, RunSummary};

/// Fixed parameters for the quick smoke run.
const QUICK_USERS: u64 = 5;
const QUICK_SPAWN_RATE: u64 = 1;
const QUICK_RUN_TIME: &str = "30s";

/// Parses the CLI, applies any config file, and drives the selected plan on
/// a fresh runtime.
///
/// # Errors
///
/// Returns an error when argument or config validation fails, when the
/// health gate reports unhealthy services, or when any scenario fails.
pub fn run() -> AppResult<()> {
    let matches = RunnerArgs::command().get_matches();
    let mut args = RunnerArgs::from_arg_matches(&matches)?;

    crate::logger::init_logging(args.verbose);

    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, &matches, &config)?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(&args))
}

struct ScenarioPlan {
    runs: Vec<ScenarioRun>,
    settings: RunnerSettings,
}

fn build_plan(args: &RunnerArgs) -> ScenarioPlan {
    let settings = match args.scenario {
        ScenarioKind::Quick => RunnerSettings {
            users: QUICK_USERS,
            spawn_rate: QUICK_SPAWN_RATE,
            run_time: QUICK_RUN_TIME.to_owned(),
            tool: args.tool.clone(),
            scenario_file: args.scenario_file.clone(),
            results_path: args.results_path.clone(),
        },
        ScenarioKind::All | ScenarioKind::Api | ScenarioKind::Proxy | ScenarioKind::Web => {
            RunnerSettings {
                users: args.users.get(),
                spawn_rate: args.spawn_rate.get(),
                run_time: args.run_time.as_str().to_owned(),
                tool: args.tool.clone(),
                scenario_file: args.scenario_file.clone(),
                results_path: args.results_path.clone(),
            }
        }
    };

    let runs = match args.scenario {
        ScenarioKind::Quick => vec![ScenarioRun {
            name: "quick_smoke",
            host: args.web_host.clone(),
            archetype: None,
        }],
        ScenarioKind::Api => vec![ScenarioRun {
            name: "api_focused",
            host: args.api_host.clone(),
            archetype: Some(Archetype::Api),
        }],
        ScenarioKind::Proxy => vec![ScenarioRun {
            name: "proxy_focused",
            host: args.proxy_host.clone(),
            archetype: Some(Archetype::Proxy),
        }],
        ScenarioKind::Web => vec![ScenarioRun {
            name: "web_comprehensive",
            host: args.web_host.clone(),
            archetype: Some(Archetype::Web),
        }],
        ScenarioKind::All => vec![
            ScenarioRun {
                name: "api_service",
                host: args.api_host.clone(),
                archetype: Some(Archetype::Api),
            },
            ScenarioRun {
                name: "proxy_service",
                host: args.proxy_host.clone(),
                archetype: Some(Archetype::Proxy),
            },
            ScenarioRun {
                name: "web_comprehensive",
                host: args.web_host.clone(),
                archetype: Some(Archetype::Web),
            },
        ],
    };

    ScenarioPlan { runs, settings }
}

async fn run_async(args: &RunnerArgs) -> AppResult<()> {
    let plan = build_plan(args);

    if args.skip_health_check {
        info!("Skipping service health checks.");
    } else {
        let client = reqwest::Client::builder().build()?;
        let hosts = [
            args.web_host.clone(),
            args.proxy_host.clone(),
            args.api_host.clone(),
        ];
        let opts = HealthGateOptions {
            path: args.health_path.clone(),
            request_timeout: args.health_timeout,
            poll_interval: args.health_poll_interval,
            max_wait: args.health_max_wait,
        };
        if !health::wait_for_services(&client, &hosts, &opts).await {
            error!("Some services are not healthy. Use --skip-health-check to proceed anyway.");
            return Err(AppError::validation(ValidationError::ServicesUnhealthy));
        }
    }

    let mut summary = RunSummary::new();
    for scenario_run in &plan.runs {
        let passed = runner::run_scenario(scenario_run, &plan.settings).await?;
        summary.record(passed);
    }

    summary::print_summary(&summary, &plan.settings.results_path);

    if summary.all_passed() {
        Ok(())
    } else {
        Err(AppError::validation(ValidationError::ScenariosFailed {
            passed: summary.passed,
            total: summary.total,
        }))
    }
}
