//! # Concrete Material Formulas (AS 3600:2018)
//!
//! Closed-form expressions used to build the concrete material model from a
//! single input, the characteristic compressive strength f'c.
//!
//! ## References
//!
//! - AS 3600:2018 Clause 3.1.1.3 (flexural tensile strength)
//! - AS 3600:2018 Table 3.1.2 (mean modulus of elasticity)
//! - AS 3600:2018 Clause 8.1.3 (rectangular stress block)

/// Lower bound applied to both stress-block parameters
pub const STRESS_BLOCK_MIN: f64 = 0.67;

/// Ultimate concrete compressive strain for the rectangular stress block
pub const ULTIMATE_STRAIN: f64 = 0.003;

/// AS 3600 Table 3.1.2: (f'c, Ec) pairs in MPa
const ELASTIC_MODULUS_TABLE: [(f64, f64); 8] = [
    (20.0, 24_000.0),
    (25.0, 26_700.0),
    (32.0, 30_100.0),
    (40.0, 32_800.0),
    (50.0, 34_800.0),
    (65.0, 37_400.0),
    (80.0, 39_600.0),
    (100.0, 42_200.0),
];

/// Stress-block intensity factor α₂
///
/// # Formula
/// α₂ = 0.85 − 0.0015 f'c, not less than 0.67
///
/// # Example
/// ```rust
/// use concol_core::equations::materials::alpha_2;
///
/// assert!((alpha_2(32.0) - 0.802).abs() < 1e-12);
/// ```
pub fn alpha_2(fc: f64) -> f64 {
    (0.85 - 0.0015 * fc).max(STRESS_BLOCK_MIN)
}

/// Stress-block depth factor γ
///
/// # Formula
/// γ = 0.97 − 0.0025 f'c, not less than 0.67
///
/// # Example
/// ```rust
/// use concol_core::equations::materials::gamma;
///
/// assert!((gamma(32.0) - 0.89).abs() < 1e-12);
/// ```
pub fn gamma(fc: f64) -> f64 {
    (0.97 - 0.0025 * fc).max(STRESS_BLOCK_MIN)
}

/// Mean modulus of elasticity Ec (MPa), linear interpolation in Table 3.1.2.
///
/// Values outside the tabulated range are clamped to the end rows.
pub fn elastic_modulus(fc: f64) -> f64 {
    let first = ELASTIC_MODULUS_TABLE[0];
    let last = ELASTIC_MODULUS_TABLE[ELASTIC_MODULUS_TABLE.len() - 1];
    if fc <= first.0 {
        return first.1;
    }
    if fc >= last.0 {
        return last.1;
    }
    ELASTIC_MODULUS_TABLE
        .windows(2)
        .find(|pair| fc <= pair[1].0)
        .map(|pair| {
            let (f0, e0) = pair[0];
            let (f1, e1) = pair[1];
            e0 + (e1 - e0) * (fc - f0) / (f1 - f0)
        })
        .unwrap_or(last.1)
}

/// Characteristic flexural tensile strength f'ct.f (MPa)
///
/// # Formula
/// f'ct.f = 0.6 √f'c
pub fn flexural_tensile_strength(fc: f64) -> f64 {
    0.6 * fc.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_concrete_matches_reference_constants() {
        // 32 MPa concrete: 30.1 GPa, alpha 0.802, gamma 0.89, 3.4 MPa
        assert!((elastic_modulus(32.0) - 30_100.0).abs() < 1e-9);
        assert!((alpha_2(32.0) - 0.802).abs() < 1e-12);
        assert!((gamma(32.0) - 0.89).abs() < 1e-12);
        assert!((flexural_tensile_strength(32.0) - 3.394).abs() < 1e-3);
    }

    #[test]
    fn test_elastic_modulus_interpolates() {
        // Halfway between 40 and 50 MPa
        assert!((elastic_modulus(45.0) - 33_800.0).abs() < 1e-9);
    }

    #[test]
    fn test_elastic_modulus_clamps() {
        assert_eq!(elastic_modulus(10.0), 24_000.0);
        assert_eq!(elastic_modulus(120.0), 42_200.0);
    }

    #[test]
    fn test_stress_block_lower_bound() {
        // 0.97 - 0.0025 * 150 = 0.595 -> clamped
        assert_eq!(gamma(150.0), STRESS_BLOCK_MIN);
        assert_eq!(alpha_2(150.0), STRESS_BLOCK_MIN);
    }
}
