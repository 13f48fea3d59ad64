//! Terminal output for sync reports.

use crate::processing::SyncReport;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Print a sync run as quoted CSV rows plus a colored summary line.
pub fn print_report(report: &SyncReport) {
    println!(r#""tag","subnet_cidr","system","outcome""#);
    for record in &report.records {
        println!(
            "{tag},{cidr},{system},{outcome}",
            tag = format_field(&record.tag, 6),
            cidr = format_field(record.cidr, 18),
            system = format_field(record.system, 6),
            outcome = format_field(record.outcome, 9),
        );
    }
    println!(
        "#{}# started {} : {} created, {} already present",
        "DONE".on_green(),
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.created_count(),
        report.existing_count(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_field_short() {
        assert_eq!(format_field("test", 10), "    \"test\"");
    }

    #[test]
    fn test_format_field_exact() {
        assert_eq!(format_field("test", 6), "\"test\"");
    }

    #[test]
    fn test_format_field_long() {
        assert_eq!(format_field("long_value", 5), "\"long_value\"");
    }

    #[test]
    fn test_format_field_number() {
        assert_eq!(format_field(42, 6), "  \"42\"");
    }
}
