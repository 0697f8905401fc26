//! Structured (JSON/YAML) output shared by list and show commands

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Print `value` as JSON or YAML when `format` asks for it
///
/// Returns `false` for the other formats, which the caller renders itself.
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(value).into_diagnostic()?);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// A labelled line of a detail view
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("{:<22} {}", console::style(format!("{}:", label)).bold(), value);
}
