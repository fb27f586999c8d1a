mod app;
mod application;
mod domain;
mod infrastructure;
mod interfaces;

pub use app::{run, run_pipeline, RunOutcome};
pub use domain::error::{AppError, Result};
pub use domain::push_config::PushConfig;
