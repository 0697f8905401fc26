//! Shared helper functions for CLI commands

use chrono::NaiveDate;
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

/// Truncate to `max_len` characters, ending in "..." when cut
///
/// Counts characters, not bytes, so accented names never split.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn escape_md(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", s))
}

/// `-` for an absent optional value
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Ask before a destructive action; `--yes` skips the prompt
///
/// Uses a dialoguer prompt on a terminal and a plain `[y/N]` line read
/// otherwise, so piped shell sessions can answer it.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    if Term::stderr().is_term() {
        return Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .into_diagnostic();
    }

    print!("{} [y/N] ", prompt);
    std::io::Write::flush(&mut std::io::stdout()).into_diagnostic()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).into_diagnostic()?;
    let accepted = input.trim().eq_ignore_ascii_case("y");
    if !accepted {
        println!("{}", style("Aborted.").dim());
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_str("Projeto Quarto Suíte", 20), "Projeto Quarto Suíte");
        assert_eq!(truncate_str("Área Gourmet Premium", 7), "Área...");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-20"), Ok(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()));
        assert!(parse_date("20/01/2024").is_err());
    }

    #[test]
    fn test_confirm_with_yes_flag() {
        assert!(confirm("Delete?", true).unwrap());
    }
}
