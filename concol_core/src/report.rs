//! # Column Report Pipeline
//!
//! Runs the whole analysis for one set of column parameters:
//!
//! 1. build the concrete and steel models
//! 2. build the discretised circular geometry
//! 3. wrap it in a [`ConcreteSection`] (gross properties)
//! 4. compute the interaction diagrams for x-axis (θ = 0) and y-axis
//!    (θ = π/2) bending and the clear bar spacing
//!
//! Nothing here touches the filesystem except [`write_plots`].
//!
//! ## Example
//!
//! ```rust
//! use concol_core::report::{analyse, ColumnInput};
//!
//! let report = analyse(&ColumnInput::default()).unwrap();
//! assert_eq!(report.summary.total_area, "125664");
//! assert_eq!(format!("{:.0}", report.clear_spacing), "336");
//! ```

use std::f64::consts::FRAC_PI_2;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::equations::registry::{Equation, EquationTracker};
use crate::equations::section::clear_bar_spacing;
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{concrete_circular_section, CircularSectionParams, CompoundGeometry};
use crate::interaction::{DiagramOptions, MomentComponent, MomentInteractionResults, PlotOptions};
use crate::materials::{Concrete, SteelBar};
use crate::section::{ConcreteSection, GrossProperties};
use crate::units::{format_sci, UnitDisplay};

/// Caption shown under the x-axis interaction diagram
pub const CAPTION_X: &str = "x-axis bending (θ = 0°) – units: N·mm";

/// Caption shown under the y-axis interaction diagram
pub const CAPTION_Y: &str = "y-axis bending (θ = 90°) – units: kN·m";

/// Description of one numeric input: its label, default and limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Key used in config files and `name=value` edits
    pub name: &'static str,
    /// Prompt label
    pub label: &'static str,
    /// Sidebar group heading
    pub group: &'static str,
    pub default: f64,
    pub minimum: f64,
    pub step: f64,
    /// Whole numbers only
    pub integer: bool,
}

/// Numeric inputs in prompt order
pub const INPUT_FIELDS: [FieldSpec; 6] = [
    FieldSpec {
        name: "diameter",
        label: "Diameter D",
        group: "Geometry (mm)",
        default: 400.0,
        minimum: 100.0,
        step: 10.0,
        integer: false,
    },
    FieldSpec {
        name: "bar_diameter",
        label: "Bar Ø",
        group: "Reinforcement",
        default: 20.0,
        minimum: 10.0,
        step: 1.0,
        integer: false,
    },
    FieldSpec {
        name: "bar_count",
        label: "Number of bars",
        group: "Reinforcement",
        default: 3.0,
        minimum: 1.0,
        step: 1.0,
        integer: true,
    },
    FieldSpec {
        name: "cover",
        label: "Concrete cover",
        group: "Reinforcement",
        default: 30.0,
        minimum: 5.0,
        step: 1.0,
        integer: false,
    },
    FieldSpec {
        name: "fc",
        label: "Concrete f′c (MPa)",
        group: "Materials",
        default: 32.0,
        minimum: 20.0,
        step: 1.0,
        integer: false,
    },
    FieldSpec {
        name: "fy",
        label: "Steel fᵧ (MPa)",
        group: "Materials",
        default: 500.0,
        minimum: 200.0,
        step: 1.0,
        integer: false,
    },
];

/// Look up a field description by key
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    INPUT_FIELDS.iter().find(|f| f.name == name)
}

/// Parameters of a circular reinforced column.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "C-1",
///   "diameter": 400.0,
///   "bar_diameter": 20.0,
///   "bar_count": 3,
///   "cover": 30.0,
///   "fc": 32.0,
///   "fy": 500.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnInput {
    /// User label for this column (e.g., "C-1")
    pub label: String,
    /// Column diameter D (mm)
    pub diameter: f64,
    /// Bar diameter Ø (mm)
    pub bar_diameter: f64,
    /// Number of bars
    pub bar_count: u32,
    /// Cover to the bar surface (mm)
    pub cover: f64,
    /// Characteristic concrete strength f'c (MPa)
    pub fc: f64,
    /// Steel yield strength fy (MPa)
    pub fy: f64,
}

impl Default for ColumnInput {
    fn default() -> Self {
        Self {
            label: "C-1".to_string(),
            diameter: 400.0,
            bar_diameter: 20.0,
            bar_count: 3,
            cover: 30.0,
            fc: 32.0,
            fy: 500.0,
        }
    }
}

impl ColumnInput {
    /// Numeric value of a field by key
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "diameter" => Some(self.diameter),
            "bar_diameter" => Some(self.bar_diameter),
            "bar_count" => Some(f64::from(self.bar_count)),
            "cover" => Some(self.cover),
            "fc" => Some(self.fc),
            "fy" => Some(self.fy),
            _ => None,
        }
    }

    /// Set a field from text, as typed by the user.
    ///
    /// ```rust
    /// use concol_core::report::ColumnInput;
    ///
    /// let mut input = ColumnInput::default();
    /// input.set_field("bar_count", "8").unwrap();
    /// assert_eq!(input.bar_count, 8);
    /// assert!(input.set_field("bar_count", "2.5").is_err());
    /// ```
    pub fn set_field(&mut self, name: &str, raw: &str) -> CalcResult<()> {
        let raw = raw.trim();
        if name == "label" {
            self.label = raw.to_string();
            return Ok(());
        }

        let spec = field_spec(name).ok_or_else(|| {
            CalcError::invalid_input(name, raw, "Unknown field")
        })?;
        let value: f64 = raw
            .parse()
            .map_err(|_| CalcError::invalid_input(name, raw, "Not a number"))?;

        if spec.integer {
            if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
                return Err(CalcError::invalid_input(
                    name,
                    raw,
                    "Must be a non-negative whole number",
                ));
            }
            self.bar_count = value as u32;
            return Ok(());
        }

        match name {
            "diameter" => self.diameter = value,
            "bar_diameter" => self.bar_diameter = value,
            "cover" => self.cover = value,
            "fc" => self.fc = value,
            "fy" => self.fy = value,
            _ => return Err(CalcError::invalid_input(name, raw, "Unknown field")),
        }
        Ok(())
    }

    /// Validate every numeric field against its minimum.
    pub fn validate(&self) -> CalcResult<()> {
        for spec in &INPUT_FIELDS {
            let value = self.get(spec.name).unwrap_or(f64::NAN);
            if !value.is_finite() {
                return Err(CalcError::invalid_input(
                    spec.name,
                    value.to_string(),
                    "Value must be a finite number",
                ));
            }
            if value < spec.minimum {
                return Err(CalcError::invalid_input(
                    spec.name,
                    value.to_string(),
                    format!("{} must be at least {}", spec.label, spec.minimum),
                ));
            }
        }
        Ok(())
    }
}

/// The three headline figures, formatted for display.
///
/// Serializes with the display labels as keys:
///
/// ```json
/// {
///   "Total Area (mm²)": "125664",
///   "E.Ixx_g (N·mm²)": "3.988e+13",
///   "E.Iyy_g (N·mm²)": "3.988e+13"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySummary {
    #[serde(rename = "Total Area (mm²)")]
    pub total_area: String,
    #[serde(rename = "E.Ixx_g (N·mm²)")]
    pub e_ixx_g: String,
    #[serde(rename = "E.Iyy_g (N·mm²)")]
    pub e_iyy_g: String,
}

impl PropertySummary {
    pub fn from_gross(props: &GrossProperties) -> Self {
        Self {
            total_area: format!("{:.0}", props.total_area),
            e_ixx_g: format_sci(props.e_ixx_g, 3),
            e_iyy_g: format_sci(props.e_iyy_g, 3),
        }
    }
}

/// Everything computed for one column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnReport {
    pub input: ColumnInput,
    pub concrete: Concrete,
    pub steel: SteelBar,
    pub summary: PropertySummary,
    pub gross_properties: GrossProperties,
    /// Clear distance between adjacent bars (mm)
    pub clear_spacing: f64,
    /// θ = 0
    pub diagram_x: MomentInteractionResults,
    /// θ = π/2
    pub diagram_y: MomentInteractionResults,
    pub equations: EquationTracker,
    pub generated_at: DateTime<Utc>,
    #[serde(skip)]
    pub geometry: CompoundGeometry,
}

impl ColumnReport {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the full analysis for `input`.
pub fn analyse(input: &ColumnInput) -> CalcResult<ColumnReport> {
    input.validate()?;
    let label = input.label.as_str();
    let mut equations = EquationTracker::new();

    let concrete = Concrete::from_strength(input.fc)?;
    let steel = SteelBar::from_yield_strength(input.fy)?;
    for eq in [
        Equation::StressBlockAlpha,
        Equation::StressBlockGamma,
        Equation::ConcreteElasticModulus,
        Equation::FlexuralTensileStrength,
        Equation::SteelElasticPlastic,
    ] {
        equations.record_for_member(eq, "Material models", label);
    }

    let geometry = concrete_circular_section(&CircularSectionParams {
        diameter: input.diameter,
        bar_diameter: input.bar_diameter,
        bar_count: input.bar_count,
        cover: input.cover,
        concrete: concrete.clone(),
        steel: steel.clone(),
    })?;
    equations.record_for_member(Equation::CircleArea, "Section discretisation", label);
    equations.record_for_member(Equation::BarCentreRadius, "Bar layout", label);

    let section = ConcreteSection::new(geometry)?;
    let gross_properties = section.gross_properties().clone();
    equations.record_for_member(Equation::TransformedSecondMoment, "Gross properties", label);
    equations.record_for_member(Equation::SquashLoad, "Gross properties", label);
    equations.record_for_member(Equation::TensileLoad, "Gross properties", label);

    let clear_spacing = clear_bar_spacing(
        input.diameter,
        input.cover,
        input.bar_count,
        input.bar_diameter,
    );
    equations.record_for_member(Equation::ClearBarSpacing, "Bar layout", label);

    let options = DiagramOptions::default();
    let diagram_x = section.moment_interaction_diagram(0.0, &options)?;
    let diagram_y = section.moment_interaction_diagram(FRAC_PI_2, &options)?;
    for eq in [Equation::StressBlockForce, Equation::StrainCompatibility] {
        equations.record_for_member(eq, "Interaction diagrams", label);
    }

    tracing::info!(
        label,
        total_area = gross_properties.total_area,
        clear_spacing,
        "column analysed"
    );

    Ok(ColumnReport {
        input: input.clone(),
        summary: PropertySummary::from_gross(&gross_properties),
        concrete,
        steel,
        gross_properties,
        clear_spacing,
        diagram_x,
        diagram_y,
        equations,
        generated_at: Utc::now(),
        geometry: section.geometry().clone(),
    })
}

/// Paths of the plots written by [`write_plots`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotFiles {
    pub section: PathBuf,
    pub interaction_x: PathBuf,
    pub interaction_y: PathBuf,
}

/// Write `section.svg`, `interaction_x.svg` and `interaction_y.svg` into `dir`.
pub fn write_plots(report: &ColumnReport, dir: &Path) -> CalcResult<PlotFiles> {
    fs::create_dir_all(dir).map_err(|e| {
        CalcError::file_error("create directory", dir.display().to_string(), e.to_string())
    })?;

    let files = PlotFiles {
        section: dir.join("section.svg"),
        interaction_x: dir.join("interaction_x.svg"),
        interaction_y: dir.join("interaction_y.svg"),
    };

    crate::plot::plot_section(&report.geometry, &files.section)?;
    report.diagram_x.plot_diagram(
        &files.interaction_x,
        &PlotOptions {
            units: UnitDisplay::si_n_mm(),
            eng: true,
            moment: MomentComponent::Mx,
        },
    )?;
    report.diagram_y.plot_diagram(
        &files.interaction_y,
        &PlotOptions {
            units: UnitDisplay::si_kn_m(),
            eng: true,
            moment: MomentComponent::My,
        },
    )?;

    tracing::info!(dir = %dir.display(), "plots written");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_field_specs() {
        let input = ColumnInput::default();
        for spec in &INPUT_FIELDS {
            assert_eq!(input.get(spec.name), Some(spec.default), "{}", spec.name);
        }
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_minimum() {
        let input = ColumnInput {
            fc: 15.0,
            ..ColumnInput::default()
        };
        match input.validate() {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "fc"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_nan() {
        let input = ColumnInput {
            cover: f64::NAN,
            ..ColumnInput::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_set_field() {
        let mut input = ColumnInput::default();
        input.set_field("diameter", " 500 ").unwrap();
        input.set_field("label", "C-7").unwrap();
        assert_eq!(input.diameter, 500.0);
        assert_eq!(input.label, "C-7");
        assert!(input.set_field("height", "3").is_err());
        assert!(input.set_field("fy", "abc").is_err());
    }

    #[test]
    fn test_summary_formatting() {
        let props = GrossProperties {
            total_area: 125_663.7,
            e_ixx_g: 3.7823e14,
            e_iyy_g: 3.7823e14,
            ..GrossProperties::default()
        };
        let summary = PropertySummary::from_gross(&props);
        assert_eq!(summary.total_area, "125664");
        assert_eq!(summary.e_ixx_g, "3.782e+14");

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"Total Area (mm²)\":\"125664\""));
        assert!(json.contains("E.Ixx_g (N·mm²)"));
    }

    #[test]
    fn test_analyse_default_column() {
        let report = analyse(&ColumnInput::default()).unwrap();
        assert_eq!(report.diagram_x.len(), 25);
        assert_eq!(report.diagram_y.len(), 25);
        assert_eq!(report.concrete.name, "32 MPa Concrete");
        assert_eq!(report.steel.name, "500 MPa Steel");
        assert!(report.equations.unique_equations().len() >= 10);
    }

    #[test]
    fn test_analyse_rejects_large_cover() {
        let input = ColumnInput {
            cover: 185.0,
            ..ColumnInput::default()
        };
        let err = analyse(&input).unwrap_err();
        assert!(matches!(err, CalcError::InvalidGeometry { .. }));
    }
}
