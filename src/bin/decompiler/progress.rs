use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar following the completion of a decompilation.
pub struct DecompilationProgress {
    bar: ProgressBar,
}

impl DecompilationProgress {
    pub fn new(id: &str) -> Self {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("⏳ {msg} [{bar:25.cyan/blue}] {pos:>3}% {spinner:.yellow}")
            .map_or_else(
                |_| ProgressStyle::default_bar(),
                |style| style.progress_chars("█▉▊▋▌▍▎▏  "),
            );
        bar.set_style(style);
        bar.set_message(format!("Decompiling {id}"));
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar }
    }

    pub fn set_completion(&self, completion: u8) {
        self.bar.set_position(u64::from(completion));
    }

    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}
