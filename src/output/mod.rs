//! Output formatting for masked records.
//!
//! This module handles formatting and outputting masked records:
//! - [`csv`] - CSV output formatting
//! - [`terminal`] - Terminal output with colors

mod csv;
mod terminal;

pub use csv::{csv_row, print_csv, records_to_csv};
pub use terminal::{format_field, format_row, print_records};
