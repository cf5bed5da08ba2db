use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

/// Step reporter for one command.
///
/// Each step runs through [`Progress::run`], which shows a spinner while the
/// work is in flight and a ✓ or ✗ line with details once it is done. When
/// the run is not interactive the work still runs but nothing is printed.
pub struct Progress {
    interactive: bool,
    title: &'static str,
    total_steps: u8,
    step: u8,
    started: Instant,
    written: Option<PathBuf>,
}

impl Progress {
    pub fn new(interactive: bool, title: &'static str, total_steps: u8) -> Self {
        Self {
            interactive,
            title,
            total_steps,
            step: 0,
            started: Instant::now(),
            written: None,
        }
    }

    /// Runs `work` as the next step. `work` returns its value together with
    /// the detail lines listed under the step.
    pub fn run<T>(
        &mut self,
        description: &str,
        work: impl FnOnce() -> Result<(T, Vec<String>)>,
    ) -> Result<T> {
        self.step += 1;
        if !self.interactive {
            return work().map(|(value, _)| value);
        }

        let bar = self.spinner(description);
        let step_started = Instant::now();
        let outcome = work();
        bar.finish_and_clear();

        let elapsed = step_started.elapsed();
        match outcome {
            Ok((value, details)) => {
                report_step(true, description, elapsed, &details);
                Ok(value)
            }
            Err(e) => {
                report_step(false, description, elapsed, &[]);
                Err(e)
            }
        }
    }

    /// Remembers the particle-set file an edit produced for the footer.
    pub fn record_written(&mut self, path: &Path) {
        self.written = Some(path.to_path_buf());
    }

    pub fn finish(self) {
        if !self.interactive {
            return;
        }
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr);
        if let Some(path) = &self.written {
            let _ = writeln!(stderr, "  \x1b[2m→\x1b[0m {}", path.display());
        }
        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {:<30} {:>20}",
            self.title,
            format!("Total: {:.2}s", self.started.elapsed().as_secs_f64())
        );
        let _ = writeln!(stderr);
    }

    fn spinner(&self, description: &str) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .expect("invalid template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message(format!(
            "[{}/{}] {}...",
            self.step, self.total_steps, description
        ));
        bar
    }
}

fn report_step(ok: bool, description: &str, elapsed: Duration, details: &[String]) {
    let mark = if ok {
        "\x1b[32m✓\x1b[0m"
    } else {
        "\x1b[31m✗\x1b[0m"
    };
    let mut stderr = io::stderr().lock();
    let _ = writeln!(
        stderr,
        "  {mark} {:<44} {:>5.2}s",
        description,
        elapsed.as_secs_f64()
    );
    for detail in details {
        let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {}", detail);
    }
}
