//! Consistent styling utilities for terminal output.
//!
//! Provides color and formatting helpers using owo-colors. Every helper falls
//! back to plain text when colors are disabled.

use owo_colors::OwoColorize;
use std::fmt::Display;

use crate::output;

/// Styles for different semantic elements.
pub struct Style;

impl Style {
    /// Style for section headers (e.g., "Configuration", "Available commands")
    pub fn header<T: Display>(text: T) -> String {
        paint(text, |t| t.bold().to_string())
    }

    /// Style for labels/keys (e.g., "account", "nickname")
    pub fn label<T: Display>(text: T) -> String {
        paint(text, |t| t.dimmed().to_string())
    }

    /// Style for primary values (e.g., account names, nicknames)
    pub fn value<T: Display>(text: T) -> String {
        paint(text, |t| t.cyan().to_string())
    }

    /// Style for secondary/supplementary info (e.g., descriptions)
    pub fn secondary<T: Display>(text: T) -> String {
        paint(text, |t| t.dimmed().to_string())
    }

    /// Style for success messages
    pub fn success<T: Display>(text: T) -> String {
        paint(text, |t| t.green().to_string())
    }

    /// Style for error messages
    pub fn error<T: Display>(text: T) -> String {
        paint(text, |t| t.red().bold().to_string())
    }

    /// Style for warning messages
    pub fn warning<T: Display>(text: T) -> String {
        paint(text, |t| t.yellow().to_string())
    }

    /// Style for commands (e.g., "/join", "/help")
    pub fn command<T: Display>(text: T) -> String {
        paint(text, |t| t.green().to_string())
    }

    /// Style for nicknames in the conversation
    pub fn nick<T: Display>(text: T) -> String {
        paint(text, |t| t.magenta().bold().to_string())
    }

    /// Style for system notices in the conversation
    pub fn notice<T: Display>(text: T) -> String {
        paint(text, |t| t.dimmed().italic().to_string())
    }

    /// Style for the default marker
    pub fn default_marker() -> String {
        Self::secondary("(default)")
    }

    /// Style for version info
    pub fn version<T: Display>(text: T) -> String {
        paint(text, |t| t.dimmed().to_string())
    }
}

fn paint<T: Display>(text: T, styled: impl FnOnce(&T) -> String) -> String {
    if output::is_no_color() {
        text.to_string()
    } else {
        styled(&text)
    }
}
