//! WordprocessingML stores measurements in a zoo of fixed-point units.
//! This module centralizes the conversions so the style accessors agree on
//! the arithmetic:
//!
//! - spacing, indentation and table widths of type `dxa`: twentieths of a point
//! - font sizes (`w:sz`): half-points
//! - border widths (`w:sz` on border elements): eighths of a point
//! - table percentages (`pct`): fiftieths of a percent
//! - line spacing under the default `auto` rule: 240 = single spacing
//! - drawing extents: EMUs (914,400 per inch, 360,000 per centimeter)

/// English Metric Units per centimeter.
pub const EMU_PER_CM: i64 = 360_000;

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// EMUs per pixel at the 96 DPI assumption used when an image carries no
/// explicit physical size (914,400 / 96).
pub const EMU_PER_PIXEL_96DPI: i64 = 9_525;

pub fn twentieths_to_points(value: f64) -> f64 {
    value / 20.0
}

pub fn half_points_to_points(value: f64) -> f64 {
    value / 2.0
}

pub fn eighths_to_points(value: f64) -> f64 {
    value / 8.0
}

pub fn fiftieths_to_percent(value: f64) -> f64 {
    value / 50.0
}

/// Line spacing under the `auto` rule, where 240 is single (100%) spacing.
pub fn line_value_to_percent(value: f64) -> f64 {
    value / 240.0 * 100.0
}

pub fn cm_to_emu(cm: f64) -> i64 {
    (cm * EMU_PER_CM as f64) as i64
}

pub fn pixels_to_emu(pixels: u32) -> i64 {
    pixels as i64 * EMU_PER_PIXEL_96DPI
}
