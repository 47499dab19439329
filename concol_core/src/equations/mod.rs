//! # Column Equations
//!
//! Closed-form formulas used to construct the materials and the bar layout,
//! plus the registry that documents them in the PDF appendix.
//!
//! ## Modules
//!
//! - [`materials`] - AS 3600 concrete parameters from f'c
//! - [`section`] - Circular section and bar layout formulas
//! - [`registry`] - Equation metadata and tracking for PDF appendix generation
//!
//! ## Sign Conventions
//!
//! - **Axial force**: Positive in compression
//! - **Strain**: Positive in compression
//! - **Moments**: Right-hand rule about the plastic centroid
//!
//! ## References
//!
//! - AS 3600:2018 Concrete structures
//! - Warner, Foster & Kilpatrick, Reinforced Concrete Basics

pub mod materials;
pub mod registry;
pub mod section;

pub use materials::{alpha_2, elastic_modulus, flexural_tensile_strength, gamma};
pub use registry::{
    column_calculation_equations, CodeReference, Equation, EquationCategory, EquationMetadata,
    EquationTracker, EquationUsage, Variable, ALL_EQUATIONS,
};
pub use section::{
    bar_centre_chord, bar_centre_radius, circle_area, clear_bar_spacing, polygon_radius_for_area,
    squash_load,
};
