//! # concol_core - Circular Reinforced Concrete Column Engine
//!
//! `concol_core` computes gross section properties and moment-axial
//! interaction diagrams for circular reinforced concrete columns, and renders
//! the results as SVG plots and a PDF calculation report. Inputs and results
//! are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: every render recomputes everything from the inputs
//! - **JSON-First**: inputs, results and errors implement Serialize
//! - **Rich Errors**: structured error types, not just strings
//! - **Internal units**: N, mm and MPa throughout; conversion only for display
//!
//! ## Quick Start
//!
//! ```rust
//! use concol_core::report::{analyse, ColumnInput};
//!
//! let input = ColumnInput {
//!     bar_count: 8,
//!     ..ColumnInput::default()
//! };
//! let report = analyse(&input).unwrap();
//!
//! println!("{}", serde_json::to_string_pretty(&report.summary).unwrap());
//! println!("Clear distance (mm): {:.0}", report.clear_spacing);
//! ```
//!
//! ## Modules
//!
//! - [`materials`] - AS 3600 concrete and elastic-plastic steel models
//! - [`geometry`] - Polygons, clipping and the circular section builder
//! - [`section`] - Gross properties and ultimate section actions
//! - [`interaction`] - Moment interaction diagrams and capacity queries
//! - [`plot`] - SVG section and diagram plots
//! - [`report`] - Input-to-report pipeline
//! - [`pdf`] - Typst PDF report
//! - [`equations`] - Closed-form formulas and the equation registry
//! - [`units`] - Display unit systems and number formatting
//! - [`errors`] - Structured error types

pub mod equations;
pub mod errors;
pub mod geometry;
pub mod interaction;
pub mod materials;
pub mod pdf;
pub mod plot;
pub mod report;
pub mod section;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use interaction::{
    DiagramLimit, DiagramOptions, MomentComponent, MomentInteractionResults, PlotOptions,
};
pub use report::{analyse, write_plots, ColumnInput, ColumnReport, PlotFiles, PropertySummary};
pub use section::{ConcreteSection, GrossProperties, UltimateBendingResult};
pub use units::UnitDisplay;
