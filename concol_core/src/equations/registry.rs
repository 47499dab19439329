//! # Equation Registry
//!
//! Central registry of the formulas used to build and analyse a column.
//! Each equation carries the metadata needed for the PDF appendix.
//!
//! ## Usage
//!
//! ```rust
//! use concol_core::equations::registry::{Equation, EquationTracker};
//!
//! let mut tracker = EquationTracker::new();
//! tracker.record_for_member(Equation::SquashLoad, "Interaction diagram", "C-1");
//!
//! let meta = Equation::SquashLoad.metadata();
//! assert!(meta.formula_plain.contains("fy"));
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::pdf::typst_string;

// ============================================================================
// Code References
// ============================================================================

/// Reference to a standard or textbook.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeReference {
    /// AS 3600 - Concrete structures
    AS3600 { year: u16, clause: &'static str },
    /// Warner, Foster & Kilpatrick - Reinforced Concrete Basics
    Warner { edition: u8, chapter: u8 },
    /// Fundamental mechanics (no specific code reference needed)
    Mechanics,
}

impl CodeReference {
    /// Format the reference for display in PDF reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::AS3600 { year, clause } => format!("AS 3600:{} Clause {}", year, clause),
            CodeReference::Warner { edition, chapter } => {
                format!("Warner et al. {}ed, Ch. {}", edition, chapter)
            }
            CodeReference::Mechanics => "Fundamental Mechanics".to_string(),
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for organizing equations in the PDF appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Concrete and steel material parameters
    MaterialProperties,
    /// Layout of the circular section and its bars
    SectionGeometry,
    /// Gross (uncracked) transformed properties
    GrossProperties,
    /// Ultimate strength and the interaction diagram
    UltimateStrength,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::MaterialProperties => "Material Properties",
            EquationCategory::SectionGeometry => "Section Geometry",
            EquationCategory::GrossProperties => "Gross Section Properties",
            EquationCategory::UltimateStrength => "Ultimate Strength",
        }
    }

    /// Sort order for PDF appendix (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::MaterialProperties => 1,
            EquationCategory::SectionGeometry => 2,
            EquationCategory::GrossProperties => 3,
            EquationCategory::UltimateStrength => 4,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "D", "f'_c")
    pub symbol: &'static str,
    /// Description
    pub description: &'static str,
    /// Units (e.g., "mm", "MPa")
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self {
            symbol,
            description,
            units,
        }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Complete metadata for one formula.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    /// Brief description of what this equation calculates
    pub description: &'static str,
    /// The formula in Typst math notation for PDF rendering
    pub formula_typst: &'static str,
    /// The formula in plain text
    pub formula_plain: &'static str,
    /// Code/standard reference
    pub reference: CodeReference,
    /// Variable definitions
    pub variables: Vec<Variable>,
    /// Assumptions or limitations
    pub assumptions: Vec<&'static str>,
    /// Category for grouping in appendix
    pub category: EquationCategory,
    /// Function implementing the equation
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// All formulas used by the column analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    /// α₂ = 0.85 − 0.0015 f'c ≥ 0.67
    StressBlockAlpha,
    /// γ = 0.97 − 0.0025 f'c ≥ 0.67
    StressBlockGamma,
    /// Ec from Table 3.1.2
    ConcreteElasticModulus,
    /// f'ct.f = 0.6 √f'c
    FlexuralTensileStrength,
    /// σ = clamp(Es ε, −fy, fy)
    SteelElasticPlastic,
    /// A = π D² / 4
    CircleArea,
    /// r = D/2 − c − Ø/2
    BarCentreRadius,
    /// s = π (D − 2c)/n − Ø
    ClearBarSpacing,
    /// EI = Σ E_i I_i
    TransformedSecondMoment,
    /// N_uo = α₂ f'c A_c + fy A_s
    SquashLoad,
    /// N_t = −fy A_s
    TensileLoad,
    /// C_c = α₂ f'c A(γ d_n)
    StressBlockForce,
    /// ε_s = ε_cu (d_n − d_s) / d_n
    StrainCompatibility,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::StressBlockAlpha => EquationMetadata {
                name: "Stress Block Intensity",
                description: "Uniform stress intensity factor of the rectangular stress block",
                formula_typst: r#"$alpha_2 = 0.85 - 0.0015 f'_c >= 0.67$"#,
                formula_plain: "alpha2 = 0.85 - 0.0015 f'c >= 0.67",
                reference: CodeReference::AS3600 { year: 2018, clause: "8.1.3" },
                variables: vec![
                    Variable::new("alpha_2", "Stress intensity factor", "-"),
                    Variable::new("f'_c", "Characteristic compressive strength", "MPa"),
                ],
                assumptions: vec![],
                category: EquationCategory::MaterialProperties,
                source_function: "equations::materials::alpha_2",
            },
            Equation::StressBlockGamma => EquationMetadata {
                name: "Stress Block Depth",
                description: "Ratio of stress block depth to neutral axis depth",
                formula_typst: r#"$gamma = 0.97 - 0.0025 f'_c >= 0.67$"#,
                formula_plain: "gamma = 0.97 - 0.0025 f'c >= 0.67",
                reference: CodeReference::AS3600 { year: 2018, clause: "8.1.3" },
                variables: vec![
                    Variable::new("gamma", "Stress block depth factor", "-"),
                    Variable::new("f'_c", "Characteristic compressive strength", "MPa"),
                ],
                assumptions: vec![],
                category: EquationCategory::MaterialProperties,
                source_function: "equations::materials::gamma",
            },
            Equation::ConcreteElasticModulus => EquationMetadata {
                name: "Concrete Elastic Modulus",
                description: "Mean modulus of elasticity interpolated from the tabulated values",
                formula_typst: r#"$E_c = "Table 3.1.2"(f'_c)$"#,
                formula_plain: "Ec = linear interpolation of Table 3.1.2 at f'c",
                reference: CodeReference::AS3600 { year: 2018, clause: "3.1.2" },
                variables: vec![Variable::new("E_c", "Mean elastic modulus", "MPa")],
                assumptions: vec![
                    "Normal-weight concrete",
                    "Clamped to the tabulated range 20-100 MPa",
                ],
                category: EquationCategory::MaterialProperties,
                source_function: "equations::materials::elastic_modulus",
            },
            Equation::FlexuralTensileStrength => EquationMetadata {
                name: "Flexural Tensile Strength",
                description: "Characteristic flexural tensile strength of concrete",
                formula_typst: r#"$f'_"ct.f" = 0.6 sqrt(f'_c)$"#,
                formula_plain: "f'ct.f = 0.6 sqrt(f'c)",
                reference: CodeReference::AS3600 { year: 2018, clause: "3.1.1.3" },
                variables: vec![Variable::new("f'_\"ct.f\"", "Flexural tensile strength", "MPa")],
                assumptions: vec![],
                category: EquationCategory::MaterialProperties,
                source_function: "equations::materials::flexural_tensile_strength",
            },
            Equation::SteelElasticPlastic => EquationMetadata {
                name: "Elastic-Plastic Steel",
                description: "Bilinear stress-strain relationship of the reinforcing bars",
                formula_typst: r#"$sigma_s = "clamp"(E_s epsilon_s, -f_y, f_y)$"#,
                formula_plain: "sigma_s = clamp(Es * eps_s, -fy, fy)",
                reference: CodeReference::AS3600 { year: 2018, clause: "3.2.3" },
                variables: vec![
                    Variable::new("E_s", "Elastic modulus of steel (200 000)", "MPa"),
                    Variable::new("f_y", "Yield strength", "MPa"),
                ],
                assumptions: vec![
                    "No strain hardening",
                    "Yield plateau kept beyond fracture strain",
                ],
                category: EquationCategory::MaterialProperties,
                source_function: "materials::steel::SteelElasticPlastic::stress",
            },
            Equation::CircleArea => EquationMetadata {
                name: "Circle Area",
                description: "Gross area of the column and of each bar",
                formula_typst: r#"$A = pi D^2 / 4$"#,
                formula_plain: "A = pi D^2 / 4",
                reference: CodeReference::Mechanics,
                variables: vec![Variable::new("D", "Diameter", "mm")],
                assumptions: vec!["Discretised as a regular polygon of equal area"],
                category: EquationCategory::SectionGeometry,
                source_function: "equations::section::circle_area",
            },
            Equation::BarCentreRadius => EquationMetadata {
                name: "Bar Centre Radius",
                description: "Radius of the circle through the bar centres",
                formula_typst: r#"$r = D / 2 - c - phi.alt / 2$"#,
                formula_plain: "r = D/2 - c - bar/2",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("c", "Cover to the bar surface", "mm"),
                    Variable::new("phi.alt", "Bar diameter", "mm"),
                ],
                assumptions: vec!["Bars equally spaced, first bar on the positive x-axis"],
                category: EquationCategory::SectionGeometry,
                source_function: "equations::section::bar_centre_radius",
            },
            Equation::ClearBarSpacing => EquationMetadata {
                name: "Clear Bar Spacing",
                description: "Clear distance between adjacent bars along the outer bar face circle",
                formula_typst: r#"$s = pi (D - 2 c) / n - phi.alt$"#,
                formula_plain: "s = pi (D - 2c) / n - bar",
                reference: CodeReference::Mechanics,
                variables: vec![Variable::new("n", "Number of bars", "-")],
                assumptions: vec![],
                category: EquationCategory::SectionGeometry,
                source_function: "equations::section::clear_bar_spacing",
            },
            Equation::TransformedSecondMoment => EquationMetadata {
                name: "Modulus-Weighted Second Moment",
                description: "Flexural rigidity of the gross section summed over material regions",
                formula_typst: r#"$E I = sum_i E_i I_i$"#,
                formula_plain: "EI = sum(E_i I_i)",
                reference: CodeReference::Mechanics,
                variables: vec![
                    Variable::new("E_i", "Elastic modulus of region i", "MPa"),
                    Variable::new("I_i", "Second moment of area of region i", "mm^4"),
                ],
                assumptions: vec!["Uncracked section", "Bars displace concrete"],
                category: EquationCategory::GrossProperties,
                source_function: "section::ConcreteSection::gross_properties",
            },
            Equation::SquashLoad => EquationMetadata {
                name: "Squash Load",
                description: "Axial capacity with the entire section at the ultimate compressive state",
                formula_typst: r#"$N_"uo" = alpha_2 f'_c A_c + f_y A_s$"#,
                formula_plain: "Nuo = alpha2 f'c Ac + fy As",
                reference: CodeReference::AS3600 { year: 2018, clause: "10.6.2.2" },
                variables: vec![
                    Variable::new("A_c", "Net concrete area", "mm^2"),
                    Variable::new("A_s", "Total bar area", "mm^2"),
                ],
                assumptions: vec![],
                category: EquationCategory::UltimateStrength,
                source_function: "equations::section::squash_load",
            },
            Equation::TensileLoad => EquationMetadata {
                name: "Tensile Load",
                description: "Axial capacity in pure tension, concrete cracked",
                formula_typst: r#"$N_t = -f_y A_s$"#,
                formula_plain: "Nt = -fy As",
                reference: CodeReference::Warner { edition: 1, chapter: 12 },
                variables: vec![],
                assumptions: vec!["Concrete carries no tension"],
                category: EquationCategory::UltimateStrength,
                source_function: "section::ConcreteSection::gross_properties",
            },
            Equation::StressBlockForce => EquationMetadata {
                name: "Stress Block Force",
                description: "Concrete compression resultant over the clipped stress block area",
                formula_typst: r#"$C_c = alpha_2 f'_c A(gamma d_n)$"#,
                formula_plain: "Cc = alpha2 f'c A(gamma dn)",
                reference: CodeReference::AS3600 { year: 2018, clause: "8.1.3" },
                variables: vec![
                    Variable::new("d_n", "Neutral axis depth", "mm"),
                    Variable::new("A(gamma d_n)", "Concrete area within the stress block", "mm^2"),
                ],
                assumptions: vec![
                    "Plane sections remain plane",
                    "Concrete tensile strength ignored",
                ],
                category: EquationCategory::UltimateStrength,
                source_function: "section::ConcreteSection::calculate_ultimate_section_actions",
            },
            Equation::StrainCompatibility => EquationMetadata {
                name: "Strain Compatibility",
                description: "Bar strain from the linear strain profile at ultimate",
                formula_typst: r#"$epsilon_s = epsilon_"cu" (d_n - d_s) / d_n$"#,
                formula_plain: "eps_s = eps_cu (dn - ds) / dn",
                reference: CodeReference::AS3600 { year: 2018, clause: "8.1.2" },
                variables: vec![
                    Variable::new("epsilon_\"cu\"", "Ultimate concrete strain (0.003)", "-"),
                    Variable::new(
                        "d_s",
                        "Depth of the bar from the extreme compressive fibre",
                        "mm",
                    ),
                ],
                assumptions: vec!["Perfect bond"],
                category: EquationCategory::UltimateStrength,
                source_function: "section::ConcreteSection::calculate_ultimate_section_actions",
            },
        }
    }

    /// Get all equations in a given category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .filter(|eq| eq.metadata().category == category)
            .copied()
            .collect()
    }
}

/// All equations in the registry (for iteration)
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::StressBlockAlpha,
    Equation::StressBlockGamma,
    Equation::ConcreteElasticModulus,
    Equation::FlexuralTensileStrength,
    Equation::SteelElasticPlastic,
    Equation::CircleArea,
    Equation::BarCentreRadius,
    Equation::ClearBarSpacing,
    Equation::TransformedSecondMoment,
    Equation::SquashLoad,
    Equation::TensileLoad,
    Equation::StressBlockForce,
    Equation::StrainCompatibility,
];

/// Equations applied by a full column analysis, in pipeline order.
pub fn column_calculation_equations() -> Vec<Equation> {
    ALL_EQUATIONS.to_vec()
}

// ============================================================================
// Equation Usage Tracking
// ============================================================================

/// Record of an equation being used in a calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquationUsage {
    /// The equation that was used
    pub equation: Equation,
    /// Context describing where/why it was used
    pub context: String,
    /// Optional: the member label this equation was applied to
    pub member_label: Option<String>,
}

/// Collector for equation usage during a calculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage {
            equation,
            context: context.into(),
            member_label: None,
        });
    }

    /// Record equation usage for a specific member
    pub fn record_for_member(
        &mut self,
        equation: Equation,
        context: impl Into<String>,
        label: impl Into<String>,
    ) {
        self.usages.push(EquationUsage {
            equation,
            context: context.into(),
            member_label: Some(label.into()),
        });
    }

    /// Get all recorded usages
    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    /// Get unique equations used (deduplicated, first-use order)
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Group unique equations by category for appendix
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }

    /// Generate Typst markup for the "List of Equations" appendix.
    ///
    /// ```rust
    /// use concol_core::equations::registry::{Equation, EquationTracker};
    ///
    /// let mut tracker = EquationTracker::new();
    /// tracker.record_for_member(Equation::ClearBarSpacing, "Bar layout", "C-1");
    ///
    /// let typst = tracker.generate_appendix_typst();
    /// assert!(typst.contains("Clear Bar Spacing"));
    /// assert!(typst.contains("C-1"));
    /// ```
    pub fn generate_appendix_typst(&self) -> String {
        let mut output = String::new();

        output.push_str(
            r##"
#pagebreak()

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Appendix: List of Equations]
  ]
]

#v(12pt)
"##,
        );

        let by_category = self.by_category();
        if by_category.is_empty() {
            output.push_str("#text(style: \"italic\")[No equations recorded for this report.]\n");
            return output;
        }

        for (category, equations) in by_category {
            output.push_str(&format!("\n== {}\n\n", category.display_name()));

            for equation in equations {
                let meta = equation.metadata();
                output.push_str(&format!("=== {}\n\n", meta.name));
                output.push_str(&format!("#text(size: 10pt)[{}]\n\n", meta.description));
                output.push_str(&format!("*Formula:* {}\n\n", meta.formula_typst));
                output.push_str(&format!("*Reference:* {}\n\n", meta.reference.citation()));

                if !meta.variables.is_empty() {
                    output.push_str("#table(\n");
                    output.push_str("  columns: (auto, 1fr, auto),\n");
                    output.push_str("  inset: 6pt,\n");
                    output.push_str("  stroke: 0.5pt,\n");
                    output.push_str("  table.header([*Symbol*], [*Description*], [*Units*]),\n");
                    for var in &meta.variables {
                        output.push_str(&format!(
                            "  [${}$], [{}], [{}],\n",
                            var.symbol, var.description, var.units
                        ));
                    }
                    output.push_str(")\n\n");
                }

                let mut members: Vec<&str> = self
                    .usages
                    .iter()
                    .filter(|u| u.equation == equation)
                    .filter_map(|u| u.member_label.as_deref())
                    .collect();
                members.sort_unstable();
                members.dedup();
                if !members.is_empty() {
                    let quoted: Vec<String> =
                        members.iter().map(|m| format!("#{}", typst_string(m))).collect();
                    output.push_str(&format!("*Applied to:* {}\n\n", quoted.join(", ")));
                }

                if !meta.assumptions.is_empty() {
                    output.push_str("*Assumptions:*\n");
                    for assumption in &meta.assumptions {
                        output.push_str(&format!("- {}\n", assumption));
                    }
                    output.push('\n');
                }

                output.push_str("#line(length: 100%, stroke: 0.25pt + gray)\n\n");
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_equations_have_metadata() {
        assert_eq!(ALL_EQUATIONS.len(), 13);
        for eq in ALL_EQUATIONS {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty(), "Equation {:?} has no name", eq);
            assert!(meta.formula_typst.starts_with('$'), "{:?} formula not in math mode", eq);
            assert!(!meta.source_function.is_empty());
        }
    }

    #[test]
    fn test_code_reference_citation() {
        let r = CodeReference::AS3600 { year: 2018, clause: "8.1.3" };
        assert_eq!(r.citation(), "AS 3600:2018 Clause 8.1.3");
    }

    #[test]
    fn test_tracker_deduplicates() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::SquashLoad, "x-axis diagram");
        tracker.record(Equation::SquashLoad, "y-axis diagram");
        tracker.record(Equation::CircleArea, "geometry");
        assert_eq!(tracker.usages().len(), 3);
        assert_eq!(tracker.unique_equations().len(), 2);
    }

    #[test]
    fn test_categories_sorted() {
        let mut tracker = EquationTracker::new();
        for eq in column_calculation_equations().into_iter().rev() {
            tracker.record(eq, "test");
        }
        let orders: Vec<u8> = tracker
            .by_category()
            .iter()
            .map(|(cat, _)| cat.sort_order())
            .collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_appendix_quotes_member_labels() {
        let mut tracker = EquationTracker::new();
        tracker.record_for_member(Equation::SquashLoad, "Gross properties", "C//1");
        tracker.record_for_member(Equation::SquashLoad, "Gross properties", "C-2");
        let typst = tracker.generate_appendix_typst();
        assert!(typst.contains("*Applied to:* #\"C-2\", #\"C//1\""));
    }

    #[test]
    fn test_empty_appendix() {
        let typst = EquationTracker::new().generate_appendix_typst();
        assert!(typst.contains("No equations recorded"));
    }

    #[test]
    fn test_every_category_populated() {
        for cat in [
            EquationCategory::MaterialProperties,
            EquationCategory::SectionGeometry,
            EquationCategory::GrossProperties,
            EquationCategory::UltimateStrength,
        ] {
            assert!(!Equation::in_category(cat).is_empty());
        }
    }
}
