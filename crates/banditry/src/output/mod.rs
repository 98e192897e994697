//! Output formatting for experiment reports.
//!
//! - Terminal: human-readable output with colors and box drawing
//! - JSON: machine-readable serialization

mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::{format_report, format_sequential_report, format_steps, format_sweep};
