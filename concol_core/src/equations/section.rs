//! # Cross-Section Formulas
//!
//! Closed-form geometry used to lay out a circular reinforced column.
//!
//! ## Notation
//!
//! - `D` = Column diameter
//! - `Ø` = Bar diameter
//! - `n` = Number of bars
//! - `c` = Cover to the bar surface
//!
//! ```text
//!        ___________
//!      /   o     o   \      o = bar, centres on radius r
//!     |               |     r = D/2 - c - Ø/2
//!     |o      +      o|
//!     |               |
//!      \___o_____o___/
//! ```

use std::f64::consts::PI;

/// Area of a circle from its diameter
///
/// # Formula
/// A = π d² / 4
///
/// # Example
/// ```rust
/// use concol_core::equations::section::circle_area;
///
/// let area = circle_area(400.0);
/// assert!((area - 125_663.7).abs() < 0.1);
/// ```
#[inline]
pub fn circle_area(diameter: f64) -> f64 {
    PI * diameter.powi(2) / 4.0
}

/// Circumradius of a regular n-gon whose area equals `area`
///
/// # Formula
/// A = n R² sin(2π/n) / 2  ⇒  R = √(2A / (n sin(2π/n)))
#[inline]
pub fn polygon_radius_for_area(area: f64, n: usize) -> f64 {
    let n = n as f64;
    (2.0 * area / (n * (2.0 * PI / n).sin())).sqrt()
}

/// Radius of the circle through the bar centres
///
/// # Formula
/// r = D/2 − c − Ø/2
#[inline]
pub fn bar_centre_radius(diameter: f64, cover: f64, bar_diameter: f64) -> f64 {
    diameter / 2.0 - cover - bar_diameter / 2.0
}

/// Clear distance between adjacent bars, measured along the circle through
/// the outer faces of the bars
///
/// # Formula
/// s = π (D − 2c) / n − Ø
///
/// # Example
/// ```rust
/// use concol_core::equations::section::clear_bar_spacing;
///
/// // 400 mm column, 30 mm cover, 3 bars of 20 mm
/// let s = clear_bar_spacing(400.0, 30.0, 3, 20.0);
/// assert_eq!(format!("{:.0}", s), "336");
/// ```
#[inline]
pub fn clear_bar_spacing(diameter: f64, cover: f64, bar_count: u32, bar_diameter: f64) -> f64 {
    PI * (diameter - 2.0 * cover) / f64::from(bar_count) - bar_diameter
}

/// Straight-line distance between adjacent bar centres
///
/// # Formula
/// s_c = 2 r sin(π/n)
#[inline]
pub fn bar_centre_chord(centre_radius: f64, bar_count: u32) -> f64 {
    2.0 * centre_radius * (PI / f64::from(bar_count)).sin()
}

/// Squash load of a reinforced section (N)
///
/// # Formula
/// N_uo = α₂ f'c A_c + f_y A_s
#[inline]
pub fn squash_load(alpha_2: f64, fc: f64, concrete_area: f64, fy: f64, steel_area: f64) -> f64 {
    alpha_2 * fc * concrete_area + fy * steel_area
}
