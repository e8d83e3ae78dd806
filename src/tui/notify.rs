//! Transient one-line notifications, the terminal's toast messages.

use console::style;

pub fn success(message: impl std::fmt::Display) {
    println!("{} {}", style("✓").green().bold(), message);
}

pub fn info(message: impl std::fmt::Display) {
    println!("{} {}", style("ℹ").blue().bold(), message);
}

pub fn warn(message: impl std::fmt::Display) {
    eprintln!("{} {}", style("⚠").yellow().bold(), style(message).yellow());
}

pub fn error(message: impl std::fmt::Display) {
    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
}
