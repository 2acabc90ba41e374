//! Unit conversion utilities
//!
//! Profiles are measured in millimeters while sketches are authored in inches.
//! The conversion factor is fixed.

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Digits after the decimal point in every rendered coordinate
pub const COORDINATE_PRECISION: usize = 6;

/// Label of the output unit, used in column headers
pub const UNIT_LABEL: &str = "in";

/// Convert a length in millimeters to inches
pub fn mm_to_inches(value_mm: f64) -> f64 {
    value_mm / MM_PER_INCH
}

/// Format a coordinate with [`COORDINATE_PRECISION`] decimals
pub fn format_coordinate(value: f64) -> String {
    format!("{:.*}", COORDINATE_PRECISION, value)
}
