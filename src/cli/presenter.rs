//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output a line to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Format recording time against the limit
    pub fn format_recording(&self, elapsed_ms: u64, limit_ms: u64) -> String {
        let percent = if limit_ms > 0 {
            (elapsed_ms as f64 / limit_ms as f64 * 100.0).min(100.0)
        } else {
            0.0
        };
        format!(
            "{} {} / {}",
            bar(percent),
            format_clock(elapsed_ms / 1000),
            format_clock(limit_ms / 1000)
        )
    }

    /// Format encoding progress
    pub fn format_encoding(&self, percent: f64) -> String {
        format!("{} {:>3.0}%", bar(percent), percent.clamp(0.0, 100.0))
    }

    /// Update the spinner with recording time
    pub fn update_recording(&self, elapsed_ms: u64, limit_ms: u64) {
        let progress = self.format_recording(elapsed_ms, limit_ms);
        self.update_spinner(&format!("Recording... {}", progress));
    }

    /// Update the spinner with encoding progress
    pub fn update_encoding(&self, percent: f64) {
        let progress = self.format_encoding(percent);
        self.update_spinner(&format!("Encoding... {}", progress));
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// 20-cell progress bar
fn bar(percent: f64) -> String {
    let bar_width = 20;
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * bar_width as f64) as usize;
    let empty = bar_width - filled;
    format!("[{}{}]", "█".repeat(filled).cyan(), "░".repeat(empty))
}

/// `m:ss`, or `h:mm:ss` from one hour on
fn format_clock(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_recording_at_start() {
        let presenter = Presenter::new();
        assert!(presenter
            .format_recording(0, 1_200_000)
            .contains("0:00 / 20:00"));
    }

    #[test]
    fn format_recording_past_an_hour() {
        let presenter = Presenter::new();
        assert!(presenter
            .format_recording(3_725_000, 10_800_000)
            .contains("1:02:05 / 3:00:00"));
    }

    #[test]
    fn format_encoding_percent() {
        let presenter = Presenter::new();
        assert!(presenter.format_encoding(42.4).ends_with(" 42%"));
        assert!(presenter.format_encoding(250.0).ends_with("100%"));
    }
}
