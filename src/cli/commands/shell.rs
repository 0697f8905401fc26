//! `obra shell` command - Interactive session over one store
//!
//! Each input line is parsed as an `obra` command line and run against the
//! session's [`App`], so records created by one command are visible to the
//! next. Errors are printed and the session continues; it ends on `exit`,
//! `quit`, or end of input.

use clap::Parser;
use console::style;
use miette::{miette, IntoDiagnostic, Result};
use std::io::{IsTerminal, Write};
use tracing::debug;

use crate::cli::{App, Cli, Commands, GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct ShellArgs {
    /// Prompt text
    #[arg(long, default_value = "obra> ")]
    pub prompt: String,
}

pub fn run(app: &mut App, args: ShellArgs, global: &GlobalOpts) -> Result<()> {
    if app.in_shell() {
        return Err(miette!("Already in a shell session"));
    }
    app.set_in_shell(true);
    let result = repl(app, &args, global);
    app.set_in_shell(false);
    result
}

fn repl(app: &mut App, args: &ShellArgs, session: &GlobalOpts) -> Result<()> {
    let attended = std::io::stdin().is_terminal();
    if attended && !session.quiet {
        println!(
            "{} - type {} for commands, {} to leave",
            style("obra shell").bold(),
            style("help").cyan(),
            style("exit").cyan()
        );
    }

    let mut line = String::new();
    loop {
        if attended {
            print!("{}", style(&args.prompt).green());
            std::io::stdout().flush().into_diagnostic()?;
        }

        line.clear();
        // No lock held across iterations: confirmations read stdin too
        if std::io::stdin().read_line(&mut line).into_diagnostic()? == 0 {
            break;
        }

        let input = line.trim();
        if input.is_empty() || input.starts_with('#') {
            continue;
        }
        if matches!(input, "exit" | "quit") {
            break;
        }

        let tokens = match tokenize(input) {
            Ok(tokens) => tokens,
            Err(e) => {
                eprintln!("{} {}", style("error:").red().bold(), e);
                continue;
            }
        };

        let cli = match Cli::try_parse_from(std::iter::once("obra".to_string()).chain(tokens)) {
            Ok(cli) => cli,
            Err(e) => {
                // Help and version requests also arrive here
                let _ = e.print();
                continue;
            }
        };

        if matches!(cli.command, Commands::Shell(_)) {
            eprintln!("{} already in a shell session", style("error:").red().bold());
            continue;
        }

        let global = merge_globals(session, cli.global);
        debug!(command = input, "shell");
        if let Err(report) = app.run(cli.command, &global) {
            eprintln!("{:?}", report);
        }
    }
    Ok(())
}

/// Per-line options win; session options fill in what the line leaves unset
fn merge_globals(session: &GlobalOpts, line: GlobalOpts) -> GlobalOpts {
    GlobalOpts {
        format: if line.format == OutputFormat::Auto {
            session.format
        } else {
            line.format
        },
        quiet: line.quiet || session.quiet,
        verbose: line.verbose || session.verbose,
    }
}

/// Split a command line into words, honoring quotes and backslash escapes
pub fn tokenize(input: &str) -> std::result::Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') => match chars.next() {
                Some(next) => current.push(next),
                None => return Err("trailing backslash".to_string()),
            },
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_token = true;
            }
            (None, '\\') => match chars.next() {
                Some(next) => {
                    current.push(next);
                    in_token = true;
                }
                None => return Err("trailing backslash".to_string()),
            },
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {} quote", q));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_plain_words() {
        assert_eq!(tokenize("client  list -f json").unwrap(), ["client", "list", "-f", "json"]);
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"client new --name "Maria Silva" --address 'Rua A, 1'"#).unwrap(),
            ["client", "new", "--name", "Maria Silva", "--address", "Rua A, 1"]
        );
        assert_eq!(tokenize(r#"say "" x"#).unwrap(), ["say", "", "x"]);
        assert_eq!(tokenize(r#"a "b \"c\"""#).unwrap(), ["a", r#"b "c""#]);
        assert_eq!(tokenize(r"Sala\ 2").unwrap(), ["Sala 2"]);
    }

    #[test]
    fn test_tokenize_errors() {
        assert!(tokenize("client new --name \"Maria").is_err());
        assert!(tokenize("oops\\").is_err());
    }

    #[test]
    fn test_merge_globals() {
        let session = GlobalOpts {
            format: OutputFormat::Json,
            quiet: true,
            verbose: false,
        };
        let merged = merge_globals(&session, GlobalOpts::default());
        assert_eq!(merged.format, OutputFormat::Json);
        assert!(merged.quiet);

        let line = GlobalOpts {
            format: OutputFormat::Yaml,
            ..Default::default()
        };
        assert_eq!(merge_globals(&session, line).format, OutputFormat::Yaml);
    }
}
