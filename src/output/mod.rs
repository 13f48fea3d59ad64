//! Output formatting for sync results.
//!
//! - [`terminal`] - quoted CSV rows and colored summary

mod terminal;

// Re-export public functions
pub use terminal::{format_field, print_report};
