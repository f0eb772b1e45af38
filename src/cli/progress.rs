use indicatif::{ProgressBar, ProgressStyle};
use switchy::cache::ProgressSink;

/// Download progress rendered as an indicatif bar on stderr.
///
/// Without a content length the bar length tracks the bytes received so far.
pub struct DownloadBar {
    bar: ProgressBar,
}

impl DownloadBar {
    pub fn new(label: &str) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(label.to_string());
        Self { bar }
    }
}

impl ProgressSink for DownloadBar {
    fn on_progress(&self, downloaded: u64, total: Option<u64>) {
        match total {
            Some(total) => self.bar.set_length(total),
            None => self.bar.set_length(downloaded),
        }
        self.bar.set_position(downloaded);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for DownloadBar {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
