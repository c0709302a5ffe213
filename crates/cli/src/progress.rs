// Terminal progress for the reconciliation loop

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use lexigrid_recon::ProgressObserver;

/// Record counter drawn on stderr; hidden entirely with `--quiet`.
pub struct RecordProgress {
    bar: ProgressBar,
}

impl RecordProgress {
    pub fn new(quiet: bool) -> Self {
        let bar = ProgressBar::new(0);
        if quiet {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        } else {
            let style = ProgressStyle::default_bar()
                .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> ");
            bar.set_style(style);
        }
        bar.set_message("reconciling");
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for RecordProgress {
    fn on_progress(&mut self, completed: usize, total: usize) {
        if self.bar.length() != Some(total as u64) {
            self.bar.set_length(total as u64);
        }
        self.bar.set_position(completed as u64);
    }
}
