//! CLI module - argument parsing and command dispatch

pub mod app;
pub mod args;
pub mod commands;
pub mod helpers;
pub mod logging;
pub mod output;
pub mod table;
pub mod wizard;

pub use app::App;
pub use args::{Cli, Commands, GlobalOpts, OutputFormat};
