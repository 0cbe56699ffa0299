use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use indicatif::{HumanDuration, ProgressBar, ProgressDrawTarget, ProgressStyle};

pub struct Progress {
    enabled: bool,
    start: Instant,
    stage: ProgressBar,
    stages_done: AtomicU64,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        let start = Instant::now();

        if !enabled {
            return Self {
                enabled: false,
                start,
                stage: ProgressBar::hidden(),
                stages_done: AtomicU64::new(0),
            };
        }

        let stage = ProgressBar::new_spinner();
        stage.set_draw_target(ProgressDrawTarget::stderr());
        stage.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        stage.enable_steady_tick(Duration::from_millis(120));

        Self {
            enabled: true,
            start,
            stage,
            stages_done: AtomicU64::new(0),
        }
    }

    pub fn set_stage(&self, stage: &str) {
        if self.stage.message().is_empty() {
            self.stage.set_message(stage.to_string());
        } else {
            self.stages_done.fetch_add(1, Ordering::Relaxed);
            self.stage.set_message(stage.to_string());
        }
        tracing::debug!(stage, "build stage");
    }

    pub fn finish(&self) {
        if !self.enabled {
            return;
        }
        let stages = self.stages_done.load(Ordering::Relaxed) + 1;
        self.stage.finish_with_message(format!(
            "done: {} stages in {}",
            stages,
            HumanDuration(self.start.elapsed())
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_progress_is_silent() {
        let progress = Progress::new(false);
        progress.set_stage("read config");
        progress.set_stage("render");
        assert_eq!(progress.stages_done.load(Ordering::Relaxed), 1);
        progress.finish();
        assert!(progress.stage.is_hidden());
    }
}
