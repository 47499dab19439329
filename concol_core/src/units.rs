//! # Unit Types
//!
//! Display systems used when results are plotted or printed, plus the
//! number formats used in summaries.
//!
//! ## Internal Units
//!
//! All calculations run in a consistent N-mm system:
//! - Length: millimetres (mm)
//! - Force: newtons (N)
//! - Stress: megapascals (MPa = N/mm²)
//! - Moment: newton-millimetres (N·mm)
//!
//! Display conversion happens only at the edges through [`UnitDisplay`].
//!
//! ## Example
//!
//! ```rust
//! use concol_core::units::UnitDisplay;
//!
//! let si = UnitDisplay::si_kn_m();
//! assert_eq!(si.moment_unit(), "kN.m");
//! assert!((si.moment(250.0e6) - 250.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Display Systems
// ============================================================================

/// Unit system used when presenting results.
///
/// Values are stored in N and mm; a display system divides them by its
/// factors and labels them with its unit strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDisplay {
    /// Length unit label (e.g. "mm")
    pub length: String,
    /// Force unit label (e.g. "kN")
    pub force: String,
    /// Number of millimetres in one display length unit
    pub length_factor: f64,
    /// Number of newtons in one display force unit
    pub force_factor: f64,
}

impl UnitDisplay {
    /// Newtons and millimetres (no conversion)
    pub fn si_n_mm() -> Self {
        UnitDisplay {
            length: "mm".to_string(),
            force: "N".to_string(),
            length_factor: 1.0,
            force_factor: 1.0,
        }
    }

    /// Kilonewtons and metres
    pub fn si_kn_m() -> Self {
        UnitDisplay {
            length: "m".to_string(),
            force: "kN".to_string(),
            length_factor: 1.0e3,
            force_factor: 1.0e3,
        }
    }

    /// Moment unit label, force times length (e.g. "kN.m")
    pub fn moment_unit(&self) -> String {
        format!("{}.{}", self.force, self.length)
    }

    /// Area unit label (e.g. "mm²")
    pub fn area_unit(&self) -> String {
        format!("{}²", self.length)
    }

    /// Convert a force in N into display units
    pub fn force(&self, newtons: f64) -> f64 {
        newtons / self.force_factor
    }

    /// Convert a moment in N·mm into display units
    pub fn moment(&self, newton_mm: f64) -> f64 {
        newton_mm / (self.force_factor * self.length_factor)
    }

    /// Convert a length in mm into display units
    pub fn length(&self, mm: f64) -> f64 {
        mm / self.length_factor
    }
}

impl Default for UnitDisplay {
    fn default() -> Self {
        UnitDisplay::si_n_mm()
    }
}

// ============================================================================
// Number Formatting
// ============================================================================

/// Format a value in scientific notation with a signed, two-digit exponent.
///
/// Matches the common `3.782e+14` style used in engineering tables rather
/// than Rust's `3.782e14`.
///
/// ```rust
/// use concol_core::units::format_sci;
///
/// assert_eq!(format_sci(378_200_000_000_000.0, 3), "3.782e+14");
/// assert_eq!(format_sci(0.00125, 2), "1.25e-03");
/// ```
pub fn format_sci(value: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exp: i32 = exponent.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => raw,
    }
}

/// Format a value in engineering notation (exponent a multiple of three).
///
/// ```rust
/// use concol_core::units::format_engineering;
///
/// assert_eq!(format_engineering(4_350_000.0, 2), "4.35e6");
/// assert_eq!(format_engineering(-12_500.0, 1), "-12.5e3");
/// assert_eq!(format_engineering(42.0, 1), "42.0");
/// ```
pub fn format_engineering(value: f64, precision: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{:.*}", precision, value);
    }
    let exponent = (value.abs().log10() / 3.0).floor() as i32 * 3;
    let mantissa = value / 10f64.powi(exponent);
    if exponent == 0 {
        format!("{:.*}", precision, mantissa)
    } else {
        format!("{:.*}e{}", precision, mantissa, exponent)
    }
}
