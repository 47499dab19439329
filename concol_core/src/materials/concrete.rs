//! # Concrete (AS 3600:2018)
//!
//! Concrete material model built from the characteristic compressive
//! strength alone. The service profile is linear elastic; the ultimate
//! profile is the rectangular stress block of Clause 8.1.3.

use serde::{Deserialize, Serialize};

use crate::equations::materials::{
    alpha_2, elastic_modulus, flexural_tensile_strength, gamma, ULTIMATE_STRAIN,
};
use crate::errors::{CalcError, CalcResult};

/// Density of normal-weight reinforced concrete (kg/mm³)
pub const CONCRETE_DENSITY: f64 = 2.4e-6;

/// Linear elastic service stress-strain profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcreteLinear {
    /// Elastic modulus Ec (MPa)
    pub elastic_modulus: f64,
}

impl ConcreteLinear {
    /// Stress (MPa) for a given strain, compression positive
    pub fn stress(&self, strain: f64) -> f64 {
        self.elastic_modulus * strain
    }
}

/// Rectangular stress block used for ultimate analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularStressBlock {
    /// f'c (MPa)
    pub compressive_strength: f64,
    /// Stress intensity factor α₂
    pub alpha: f64,
    /// Depth factor γ
    pub gamma: f64,
    /// Strain at the extreme compressive fibre at ultimate
    pub ultimate_strain: f64,
}

impl RectangularStressBlock {
    /// Uniform stress over the block, α₂ f'c (MPa)
    pub fn block_stress(&self) -> f64 {
        self.alpha * self.compressive_strength
    }

    /// Depth of the block for a neutral axis depth d_n
    pub fn block_depth(&self, d_n: f64) -> f64 {
        self.gamma * d_n
    }
}

/// Concrete material with service and ultimate profiles.
///
/// ```rust
/// use concol_core::materials::Concrete;
///
/// let concrete = Concrete::from_strength(32.0).unwrap();
/// assert_eq!(concrete.name, "32 MPa Concrete");
/// assert!((concrete.ultimate_profile.alpha - 0.802).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concrete {
    pub name: String,
    /// Density (kg/mm³)
    pub density: f64,
    pub service_profile: ConcreteLinear,
    pub ultimate_profile: RectangularStressBlock,
    /// Characteristic flexural tensile strength f'ct.f (MPa)
    pub flexural_tensile_strength: f64,
    /// Fill colour used in section plots
    pub colour: String,
}

impl Concrete {
    /// Build the concrete model for a characteristic strength f'c (MPa).
    pub fn from_strength(fc: f64) -> CalcResult<Self> {
        if !fc.is_finite() || fc <= 0.0 {
            return Err(CalcError::invalid_input(
                "fc",
                fc.to_string(),
                "Compressive strength must be a positive number",
            ));
        }

        Ok(Concrete {
            name: format!("{:.0} MPa Concrete", fc),
            density: CONCRETE_DENSITY,
            service_profile: ConcreteLinear {
                elastic_modulus: elastic_modulus(fc),
            },
            ultimate_profile: RectangularStressBlock {
                compressive_strength: fc,
                alpha: alpha_2(fc),
                gamma: gamma(fc),
                ultimate_strain: ULTIMATE_STRAIN,
            },
            flexural_tensile_strength: flexural_tensile_strength(fc),
            colour: "lightgrey".to_string(),
        })
    }

    /// Characteristic compressive strength f'c (MPa)
    pub fn fc(&self) -> f64 {
        self.ultimate_profile.compressive_strength
    }
}
