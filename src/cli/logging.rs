//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set; otherwise `-v` shows debug events and `-q`
//! shows errors only. Events go to stderr so they never mix with output.

use tracing_subscriber::EnvFilter;

use crate::cli::GlobalOpts;

pub fn default_directive(global: &GlobalOpts) -> &'static str {
    if global.verbose {
        "obra=debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    }
}

pub fn init(global: &GlobalOpts) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(global)));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        let mut global = GlobalOpts::default();
        assert_eq!(default_directive(&global), "warn");
        global.quiet = true;
        assert_eq!(default_directive(&global), "error");
        global.verbose = true;
        assert_eq!(default_directive(&global), "obra=debug");
    }
}
