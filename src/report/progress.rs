//! Per-stage console progress marks.
//!
//! Status lines go to stderr so stdout stays clean for machine-readable
//! output (`covid fetch`). A quiet instance no-ops every call, which is also
//! what the tests use — the pipeline never depends on this for correctness.

use std::io::Write;
use std::time::Duration;

use crossterm::style::Stylize;

/// Fixed cosmetic delay before each stage announcement; pacing only.
const STAGE_PACING: Duration = Duration::from_millis(400);

pub struct Progress {
    enabled: bool,
}

impl Progress {
    pub fn stderr() -> Self {
        Self { enabled: true }
    }

    pub fn quiet() -> Self {
        Self { enabled: false }
    }

    /// Announce a stage, leaving the line open for `ok`/`fail`.
    pub fn begin(&self, text: &str) {
        if !self.enabled {
            return;
        }
        std::thread::sleep(STAGE_PACING);
        eprint!(" {text}...");
        let _ = std::io::stderr().flush();
    }

    pub fn ok(&self) {
        if !self.enabled {
            return;
        }
        eprintln!(" {}", "✔".green());
    }

    pub fn fail(&self) {
        if !self.enabled {
            return;
        }
        eprintln!(" {}", "✘".red());
    }
}
