//! CLI command implementations

pub mod connect;
pub mod devices;
pub mod run;

use colored::Colorize;
use mirrordeck_core::{Notice, Severity};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "→".cyan().bold(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "!".yellow().bold(), msg);
}

/// Render a core notice as a terminal line
pub fn print_notice(notice: &Notice) {
    let line = if notice.detail.is_empty() {
        notice.title.clone()
    } else {
        format!("{}: {}", notice.title, notice.detail)
    };
    match notice.severity {
        Severity::Success => success(&line),
        Severity::Info => info(&line),
        Severity::Warning => warn(&line),
        Severity::Error => error(&line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_notice_accepts_all_severities() {
        for severity in [
            Severity::Success,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
        ] {
            print_notice(&Notice::new(severity, "Title", "detail"));
        }
    }
}
