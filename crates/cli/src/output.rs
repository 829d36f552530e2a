//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;
use riskmap_core::model::RiskLevel;
use riskmap_core::stats::AlertLevel;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print a subheader
    pub fn subheader(message: &str) {
        println!();
        println!("{}", message.bold().dimmed());
    }

    /// Print a `key: value` line with the key dimmed
    pub fn field(key: &str, value: &str) {
        println!("  {} {}", format!("{key}:").dimmed(), value);
    }

    /// Print the high-risk share with the severity of its alert level
    pub fn alert(level: AlertLevel, high_risk_pct: f64) {
        let message = format!("High risk shops: {high_risk_pct:.1}%");
        match level {
            AlertLevel::Warning => Self::warning(&message),
            AlertLevel::Elevated => Self::info(&message),
            AlertLevel::Normal => Self::success(&message),
        }
    }
}

/// Upper-case risk label colored by category
pub fn risk_badge(level: RiskLevel) -> String {
    let label = level.label();
    match level {
        RiskLevel::High => label.red().bold().to_string(),
        RiskLevel::Medium => label.yellow().bold().to_string(),
        RiskLevel::Low => label.green().bold().to_string(),
        RiskLevel::Unknown => label.dimmed().to_string(),
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration_ms() {
        let d = Duration::from_millis(500);
        assert_eq!(format_duration(d), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        let d = Duration::from_secs_f32(5.5);
        assert_eq!(format_duration(d), "5.5s");
    }

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "shop", "shops"), "1 shop");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(40, "shop", "shops"), "40 shops");
    }

    #[test]
    fn test_risk_badge_contains_label() {
        assert!(risk_badge(RiskLevel::High).contains("HIGH"));
        assert!(risk_badge(RiskLevel::Unknown).contains("UNKNOWN"));
    }
}
