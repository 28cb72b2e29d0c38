pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CheckArgs, Cli, Command};

pub use config::{cli::LocalStorage, style_config::StyleConfig};
pub use core::{
    engine::{LintEngine, RunSummary},
    pipeline::LintPipeline,
    stylecheck::StyleChecker,
};
pub use utils::error::{LintError, Result};
