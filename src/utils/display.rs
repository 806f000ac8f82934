// utils/display.rs

//! # Display Utility Module
//!
//! This module provides utility functions for rendering messages with various styles
//! including Unicode-styled message boxes and color-coded output for errors, warnings,
//! success messages, and informational messages.
//! It leverages the `colored` crate for styling and `unicode_width` crate for handling Unicode text width.
//!
//! ## Example Usage
//! ```rust
//! use crate::utils::display::{print_unicode_box, BorderColor};
//!
//! print_unicode_box("🚀 Initializing terraform...", BorderColor::Yellow);
//! print_error!("terraform init failed.");
//! print_success!("Plan file saved.");
//! print_info!("Loading secrets...");
//! ```

use unicode_width::UnicodeWidthStr;

/// Border colours for [`print_unicode_box`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderColor {
    Yellow,
    Red,
    Green,
}

impl BorderColor {
    fn ansi(self) -> &'static str {
        match self {
            BorderColor::Yellow => "\x1b[93m",
            BorderColor::Red => "\x1b[91m",
            BorderColor::Green => "\x1b[92m",
        }
    }
}

/// Utility function to print a Unicode-styled message box
/// that correctly handles the width of emojis and other wide characters
pub fn print_unicode_box(message: &str, color: BorderColor) {
    let border_color = color.ansi();
    let reset_color = "\x1b[0m";
    for line in render_box(message) {
        println!("{}{}{}", border_color, line, reset_color);
    }
}

/// Lay out `message` inside a box, one entry per output line.
fn render_box(message: &str) -> Vec<String> {
    let lines: Vec<&str> = message.split('\n').collect();

    // Calculate width using unicode_width to properly account for emojis
    let max_length = lines
        .iter()
        .map(|line| UnicodeWidthStr::width(*line))
        .max()
        .unwrap_or(0);

    let mut rendered = Vec::with_capacity(lines.len() + 2);
    rendered.push(format!("┌{}┐", "─".repeat(max_length + 2)));
    for line in lines {
        let padding = max_length - UnicodeWidthStr::width(line);
        rendered.push(format!("│ {}{} │", line, " ".repeat(padding)));
    }
    rendered.push(format!("└{}┘", "─".repeat(max_length + 2)));
    rendered
}

#[macro_export]
macro_rules! print_info {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        println!("{}", format!($($arg)*).blue())
    }};
}

#[macro_export]
macro_rules! print_warning {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        println!("{}", format!($($arg)*).yellow())
    }};
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        eprintln!("{}", format!($($arg)*).red())
    }};
}

#[macro_export]
macro_rules! print_success {
    ($($arg:tt)*) => {{
        use colored::Colorize;
        println!("{}", format!($($arg)*).green())
    }};
}
