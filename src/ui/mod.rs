//! Terminal output: styles, console, spinner, formatting helpers.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// How much output the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,
    Normal,
    Verbose,
}

/// Visual theme for terminal output.
#[derive(Debug, Clone)]
pub struct Theme {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub dim: Style,
    pub highlight: Style,
    pub header: Style,
    pub hint: Style,
}

impl Theme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().magenta(),
            hint: Style::new().magenta().dim(),
        }
    }

    /// Theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            hint: Style::new(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

/// Styled console output honoring the output mode.
///
/// Everything except errors goes to stdout; errors always print, to
/// stderr, even in quiet mode.
pub struct Console {
    theme: Theme,
    mode: OutputMode,
}

impl Console {
    pub fn new(mode: OutputMode, colored: bool) -> Self {
        let theme = if colored { Theme::new() } else { Theme::plain() };
        Self { theme, mode }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn is_quiet(&self) -> bool {
        self.mode == OutputMode::Quiet
    }

    /// Section header.
    pub fn header(&self, text: &str) {
        if !self.is_quiet() {
            println!("{}", self.theme.header.apply_to(text));
        }
    }

    /// Normal informational line.
    pub fn message(&self, text: &str) {
        if !self.is_quiet() {
            println!("{}", text);
        }
    }

    /// Extra detail, shown only in verbose mode.
    pub fn detail(&self, text: &str) {
        if self.mode == OutputMode::Verbose {
            println!("{}", self.theme.dim.apply_to(text));
        }
    }

    pub fn success(&self, text: &str) {
        if !self.is_quiet() {
            println!("{}", self.theme.success.apply_to(text));
        }
    }

    pub fn warning(&self, text: &str) {
        if !self.is_quiet() {
            println!("{}", self.theme.warning.apply_to(text));
        }
    }

    /// Errors always print, to stderr.
    pub fn error(&self, text: &str) {
        eprintln!("{}", self.theme.error.apply_to(text));
    }

    pub fn hint(&self, text: &str) {
        if !self.is_quiet() {
            println!("{}", self.theme.hint.apply_to(text));
        }
    }
}

/// Progress spinner for an in-flight recovery.
///
/// Draws to stderr and disappears on non-TTY output; final results go
/// through [`Console`] so they land on stdout either way.
pub struct RecoverySpinner {
    bar: ProgressBar,
}

impl RecoverySpinner {
    /// Create a ticking spinner with a message.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.magenta} {msg}")
                .unwrap(),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar }
    }

    /// Create a spinner that doesn't show (for quiet mode).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn set_message(&self, message: String) {
        self.bar.set_message(message);
    }

    /// Stop ticking and erase the progress line.
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// Format a timestamp as a relative time string (e.g., "2 minutes ago").
pub fn format_relative_time(timestamp: chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let seconds = now.signed_duration_since(timestamp).num_seconds();

    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return if minutes == 1 {
            "1 minute ago".to_string()
        } else {
            format!("{} minutes ago", minutes)
        };
    }

    let hours = minutes / 60;
    if hours < 24 {
        return if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        };
    }

    let days = hours / 24;
    if days == 1 {
        "yesterday".to_string()
    } else {
        format!("{} days ago", days)
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
