//! Color palette and styling for CLI output.
//!
//! Every style is applied through [`paint`], which returns plain text when
//! color is disabled.

use owo_colors::{OwoColorize, Style};

/// Style for command names in help output.
pub fn command_name() -> Style {
    Style::new().cyan().bold()
}

/// Style for section headings like "Commands:".
pub fn heading() -> Style {
    Style::new().white().bold()
}

/// Style for labels like "path:" or "default:".
pub fn label() -> Style {
    Style::new().blue()
}

/// Style for alias expansions and other subdued text.
pub fn description() -> Style {
    Style::new().dimmed()
}

/// Style for the prefix of handled failures.
pub fn error() -> Style {
    Style::new().red().bold()
}

/// Style for the prefix of contained internal faults.
pub fn internal_error() -> Style {
    Style::new().magenta().bold()
}

/// Style for warning prefixes.
pub fn warning() -> Style {
    Style::new().yellow()
}

/// Style for passing checks.
pub fn ok() -> Style {
    Style::new().green()
}

/// Style for failing checks.
pub fn invalid() -> Style {
    Style::new().red()
}

/// Apply `style` to `text` when color is enabled.
pub fn paint(text: &str, style: Style, use_color: bool) -> String {
    if use_color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}
