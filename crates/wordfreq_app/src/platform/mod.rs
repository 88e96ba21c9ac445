//! Terminal host: CLI, configuration, logging, message loop and presenter.
mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod render;

pub use app::run_app;
pub use cli::Cli;
