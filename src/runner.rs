//! Composes and executes the external load-generation command, one scenario
//! at a time.

use std::path::Path;

use tokio::process::Command;
use tracing::{debug, error, info};

use crate::archetypes::Archetype;
use crate::error::AppResult;

/// One scheduled external-tool invocation.
pub struct ScenarioRun {
    pub name: &'static str,
    pub host: String,
    pub archetype: Option<Archetype>,
}

/// Parameters shared by every invocation in a plan.
pub struct RunnerSettings {
    pub users: u64,
    pub spawn_rate: u64,
    pub run_time: String,
    pub tool: String,
    pub scenario_file: String,
    pub results_path: String,
}

/// Renders the headless invocation for one scenario. Tabular output goes to
/// `<results>/<name>`, the report to `<results>/<name>.html`.
#[must_use]
pub fn build_command_args(run: &ScenarioRun, settings: &RunnerSettings) -> Vec<String> {
    let results_dir = Path::new(&settings.results_path);
    let csv_base = results_dir.join(run.name);
    let html_path = results_dir.join(format!("{}.html", run.name));

    let mut args = vec![
        "--headless".to_owned(),
        "--users".to_owned(),
        settings.users.to_string(),
        "--spawn-rate".to_owned(),
        settings.spawn_rate.to_string(),
        "--run-time".to_owned(),
        settings.run_time.clone(),
        "--host".to_owned(),
        run.host.clone(),
        "--csv".to_owned(),
        csv_base.to_string_lossy().into_owned(),
        "--html".to_owned(),
        html_path.to_string_lossy().into_owned(),
    ];

    if let Some(archetype) = run.archetype {
        args.push("-f".to_owned());
        args.push(settings.scenario_file.clone());
        args.push(archetype.selector().to_owned());
    }

    args
}

/// Runs one scenario to completion and maps the tool's exit status to a
/// boolean. Launch failures and non-zero exits are recorded failures; only
/// I/O errors around the results directory abort the run.
///
/// # Errors
///
/// Returns an error when the results directory cannot be created.
pub async fn run_scenario(run: &ScenarioRun, settings: &RunnerSettings) -> AppResult<bool> {
    tokio::fs::create_dir_all(&settings.results_path).await?;

    let args = build_command_args(run, settings);
    info!("Running {} load test...", run.name);
    debug!("Command: {} {}", settings.tool, args.join(" "));

    let output = match Command::new(&settings.tool).args(&args).output().await {
        Ok(output) => output,
        Err(err) => {
            error!(
                "{} test failed: could not launch '{}': {}",
                run.name, settings.tool, err
            );
            return Ok(false);
        }
    };

    if output.status.success() {
        info!("{} test completed successfully", run.name);
        return Ok(true);
    }

    error!("{} test failed: {}", run.name, output.status);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        error!("Error output: {}", stderr.trim());
    }
    Ok(false)
}
