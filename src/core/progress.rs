//! Simulated upload progress for attachment commands
//!
//! Purely cosmetic: the attachment is already committed when the bar runs.

use console::{style, Term};
use rand::Rng;
use std::io::Write;
use std::time::{Duration, Instant};

const BAR_WIDTH: usize = 30;
const TICK: Duration = Duration::from_millis(40);

/// Random total duration in `[1200, 2000)` ms
pub fn random_duration() -> Duration {
    Duration::from_millis(rand::rng().random_range(1200..2000))
}

/// One frame of the bar for `percent` (clamped to 100)
pub fn render_bar(label: &str, percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * BAR_WIDTH / 100;
    format!(
        "{} [{}{}] {:>3}%",
        label,
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent
    )
}

/// Draw the bar on stderr for `total`; no-op when stderr is not a terminal
pub fn run(label: &str, total: Duration) {
    let term = Term::stderr();
    if !term.is_term() {
        return;
    }

    let start = Instant::now();
    loop {
        let elapsed = start.elapsed();
        let percent = if total.is_zero() {
            100
        } else {
            ((elapsed.as_millis() * 100) / total.as_millis()).min(100) as u8
        };
        let _ = term.clear_line();
        let _ = write!(&term, "{}", style(render_bar(label, percent)).cyan());
        if percent >= 100 {
            break;
        }
        std::thread::sleep(TICK);
    }
    let _ = term.clear_line();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_window() {
        for _ in 0..20 {
            let d = random_duration();
            assert!(d >= Duration::from_millis(1200));
            assert!(d < Duration::from_millis(2000));
        }
    }

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar("x", 0), format!("x [{}]   0%", "-".repeat(30)));
        let half = render_bar("x", 50);
        assert!(half.contains(&"#".repeat(15)));
        assert!(render_bar("x", 250).ends_with("100%"));
    }
}
