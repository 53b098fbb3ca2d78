//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;


pub use cli::RunnerArgs;
pub use types::{PositiveU64, RunTime, ScenarioKind};
