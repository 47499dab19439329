//! # Materials
//!
//! Concrete and reinforcing steel models for the column section.
//!
//! ## Example
//!
//! ```rust
//! use concol_core::materials::{Concrete, Material, SteelBar};
//!
//! let concrete = Material::Concrete(Concrete::from_strength(32.0).unwrap());
//! let steel = Material::Steel(SteelBar::from_yield_strength(500.0).unwrap());
//!
//! assert_eq!(concrete.elastic_modulus(), 30_100.0);
//! assert_eq!(steel.elastic_modulus(), 200_000.0);
//! ```

pub mod concrete;
pub mod steel;

pub use concrete::{Concrete, ConcreteLinear, RectangularStressBlock, CONCRETE_DENSITY};
pub use steel::{SteelBar, SteelElasticPlastic, STEEL_DENSITY, STEEL_ELASTIC_MODULUS};

use serde::{Deserialize, Serialize};

/// Material assigned to a geometry region.
///
/// ## JSON Serialization
///
/// ```json
/// { "type": "Concrete", "name": "32 MPa Concrete", ... }
/// { "type": "Steel", "name": "500 MPa Steel", ... }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Material {
    Concrete(Concrete),
    Steel(SteelBar),
}

impl Material {
    /// Elastic modulus used to weight gross properties (MPa)
    pub fn elastic_modulus(&self) -> f64 {
        match self {
            Material::Concrete(c) => c.service_profile.elastic_modulus,
            Material::Steel(s) => s.profile.elastic_modulus,
        }
    }

    /// Density (kg/mm³)
    pub fn density(&self) -> f64 {
        match self {
            Material::Concrete(c) => c.density,
            Material::Steel(s) => s.density,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Material::Concrete(c) => &c.name,
            Material::Steel(s) => &s.name,
        }
    }

    pub fn colour(&self) -> &str {
        match self {
            Material::Concrete(c) => &c.colour,
            Material::Steel(s) => &s.colour,
        }
    }

    /// Returns the concrete model if this is concrete
    pub fn as_concrete(&self) -> Option<&Concrete> {
        match self {
            Material::Concrete(c) => Some(c),
            Material::Steel(_) => None,
        }
    }

    /// Returns the bar model if this is steel
    pub fn as_steel(&self) -> Option<&SteelBar> {
        match self {
            Material::Steel(s) => Some(s),
            Material::Concrete(_) => None,
        }
    }
}

impl From<Concrete> for Material {
    fn from(c: Concrete) -> Self {
        Material::Concrete(c)
    }
}

impl From<SteelBar> for Material {
    fn from(s: SteelBar) -> Self {
        Material::Steel(s)
    }
}
