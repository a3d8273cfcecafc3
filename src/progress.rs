use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Max file-name chars shown next to the bar
const NAME_WIDTH: usize = 60;

/// Per-collage progress: a status line above a photo progress bar
///
/// Bars are recreated for every collage so a finished collage leaves no
/// stale state behind.
#[derive(Debug)]
pub struct CollageProgress {
    /// None = hidden (tests, piped output)
    multi: Option<MultiProgress>,
    status_line: ProgressBar,
    progress_bar: ProgressBar,
}

impl CollageProgress {
    /// Progress tracker drawing to the terminal
    pub fn new() -> Self {
        Self {
            multi: Some(MultiProgress::new()),
            status_line: ProgressBar::hidden(),
            progress_bar: ProgressBar::hidden(),
        }
    }

    /// Tracker that draws nothing
    pub fn hidden() -> Self {
        Self {
            multi: None,
            status_line: ProgressBar::hidden(),
            progress_bar: ProgressBar::hidden(),
        }
    }

    /// Fresh bars for a new collage of `len` photos
    pub fn start(&mut self, title: &str, len: u64) {
        let Some(multi) = &self.multi else {
            self.status_line = ProgressBar::hidden();
            self.progress_bar = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden());
            return;
        };

        // Top line for status messages
        let status_line = multi.add(ProgressBar::new_spinner());
        status_line.set_style(
            ProgressStyle::default_spinner()
                .template("{msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        status_line.set_message(title.to_string());

        // Bottom line for photo progress
        let progress_bar = multi.add(ProgressBar::new(len));
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("  [{bar:40.cyan/blue}] {pos:>3}/{len} photos | {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );

        self.status_line = status_line;
        self.progress_bar = progress_bar;
    }

    /// Advance by one photo, showing its (truncated) file name
    pub fn photo_done(&self, file_name: Option<&str>) {
        if let Some(name) = file_name {
            self.progress_bar.set_message(name.chars().take(NAME_WIDTH).collect::<String>());
        }
        self.progress_bar.inc(1);
    }

    /// Print a line above the bars without tearing them
    pub fn println(&self, line: &str) {
        match &self.multi {
            Some(multi) => multi.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }

    pub fn position(&self) -> u64 {
        self.progress_bar.position()
    }

    /// Clear both lines once a collage is finished
    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
        self.status_line.finish_and_clear();
    }
}

impl Default for CollageProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_counts() {
        let mut progress = CollageProgress::hidden();
        progress.start("Collage 1/6", 100);
        progress.photo_done(Some("0001-goblin.jpg"));
        progress.photo_done(None);
        assert_eq!(progress.position(), 2);
        progress.finish();

        progress.start("Collage 2/6", 100);
        assert_eq!(progress.position(), 0);
        progress.finish();
    }
}
