//! Command implementations

pub mod client;
pub mod completions;
pub mod dashboard;
pub mod file;
pub mod project;
pub mod seller;
pub mod shell;
