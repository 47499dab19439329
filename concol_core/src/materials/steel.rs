//! # Reinforcing Steel
//!
//! Elastic-perfectly-plastic bar model. Strains past the fracture strain
//! stay on the yield plateau; the ultimate analysis never drives bars that far
//! for the sections this crate builds.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Elastic modulus of reinforcing steel (MPa)
pub const STEEL_ELASTIC_MODULUS: f64 = 200.0e3;

/// Fracture strain of the bar model
pub const STEEL_FRACTURE_STRAIN: f64 = 0.05;

/// Density of steel (kg/mm³)
pub const STEEL_DENSITY: f64 = 7.85e-6;

/// Bilinear stress-strain profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteelElasticPlastic {
    /// fy (MPa)
    pub yield_strength: f64,
    /// Es (MPa)
    pub elastic_modulus: f64,
    pub fracture_strain: f64,
}

impl SteelElasticPlastic {
    /// Strain at first yield, fy / Es
    pub fn yield_strain(&self) -> f64 {
        self.yield_strength / self.elastic_modulus
    }

    /// Stress (MPa) for a strain, compression positive.
    ///
    /// ```rust
    /// use concol_core::materials::SteelBar;
    ///
    /// let steel = SteelBar::from_yield_strength(500.0).unwrap();
    /// let profile = steel.profile;
    /// assert_eq!(profile.stress(0.001), 200.0);
    /// assert_eq!(profile.stress(-0.01), -500.0);
    /// ```
    pub fn stress(&self, strain: f64) -> f64 {
        (self.elastic_modulus * strain).clamp(-self.yield_strength, self.yield_strength)
    }
}

/// Reinforcing bar material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteelBar {
    pub name: String,
    /// Density (kg/mm³)
    pub density: f64,
    pub profile: SteelElasticPlastic,
    /// Fill colour used in section plots
    pub colour: String,
}

impl SteelBar {
    /// Build the bar model for a yield strength fy (MPa).
    pub fn from_yield_strength(fy: f64) -> CalcResult<Self> {
        if !fy.is_finite() || fy <= 0.0 {
            return Err(CalcError::invalid_input(
                "fy",
                fy.to_string(),
                "Yield strength must be a positive number",
            ));
        }

        Ok(SteelBar {
            name: format!("{:.0} MPa Steel", fy),
            density: STEEL_DENSITY,
            profile: SteelElasticPlastic {
                yield_strength: fy,
                elastic_modulus: STEEL_ELASTIC_MODULUS,
                fracture_strain: STEEL_FRACTURE_STRAIN,
            },
            colour: "grey".to_string(),
        })
    }

    /// Yield strength fy (MPa)
    pub fn fy(&self) -> f64 {
        self.profile.yield_strength
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_steel() {
        let s = SteelBar::from_yield_strength(500.0).unwrap();
        assert_eq!(s.name, "500 MPa Steel");
        assert_eq!(s.density, 7.85e-6);
        assert_eq!(s.colour, "grey");
        assert!((s.profile.yield_strain() - 0.0025).abs() < 1e-15);
    }

    #[test]
    fn test_plateau_beyond_fracture() {
        let s = SteelBar::from_yield_strength(500.0).unwrap();
        assert_eq!(s.profile.stress(0.08), 500.0);
        assert_eq!(s.profile.stress(-0.08), -500.0);
    }

    #[test]
    fn test_elastic_branch_is_linear() {
        let s = SteelBar::from_yield_strength(250.0).unwrap();
        assert_eq!(s.profile.stress(-0.0005), -100.0);
        assert_eq!(s.profile.stress(0.0), 0.0);
    }

    #[test]
    fn test_rejects_negative_yield() {
        assert!(SteelBar::from_yield_strength(-1.0).is_err());
    }
}
