//! # Moment Interaction Diagrams
//!
//! Sweeps the neutral axis through the section for one bending angle and
//! collects the ultimate (N, M) pairs.
//!
//! Point order, compression first:
//!
//! 1. squash load (`d_n = ∞`, zero moment)
//! 2. `n_points` equally spaced neutral axis depths from the start limit
//!    (default: decompression, `d_n = d_t`) to the end limit (default: pure
//!    bending, `N = 0`)
//! 3. optionally the pure tension point

use std::f64::consts::PI;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::plot;
use crate::section::{ConcreteSection, UltimateBendingResult};
use crate::units::UnitDisplay;

/// Where the neutral axis sweep starts or stops
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum DiagramLimit {
    /// `d_n = k × d_t`; `k = 1` is the decompression point
    Decompression(f64),
    /// Explicit neutral axis depth (mm)
    NeutralAxisDepth(f64),
    /// Neutral axis depth that gives this axial force (N)
    AxialLoad(f64),
}

/// Options for [`ConcreteSection::moment_interaction_diagram`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramOptions {
    pub start: DiagramLimit,
    pub end: DiagramLimit,
    /// Number of points between the limits (inclusive)
    pub n_points: usize,
    /// Append the pure tension point after the end limit
    pub extend_to_tension: bool,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            start: DiagramLimit::Decompression(1.0),
            end: DiagramLimit::AxialLoad(0.0),
            n_points: 24,
            extend_to_tension: false,
        }
    }
}

/// Moment component selected for queries and plots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MomentComponent {
    #[serde(rename = "m_x")]
    Mx,
    #[serde(rename = "m_y")]
    My,
    #[serde(rename = "m_xy")]
    Mxy,
}

impl MomentComponent {
    pub fn of(&self, result: &UltimateBendingResult) -> f64 {
        match self {
            MomentComponent::Mx => result.m_x,
            MomentComponent::My => result.m_y,
            MomentComponent::Mxy => result.m_xy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MomentComponent::Mx => "m_x",
            MomentComponent::My => "m_y",
            MomentComponent::Mxy => "m_xy",
        }
    }
}

impl fmt::Display for MomentComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MomentComponent {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m_x" => Ok(MomentComponent::Mx),
            "m_y" => Ok(MomentComponent::My),
            "m_xy" => Ok(MomentComponent::Mxy),
            other => Err(CalcError::invalid_input(
                "moment",
                other,
                "Expected one of m_x, m_y, m_xy",
            )),
        }
    }
}

/// Presentation options for [`MomentInteractionResults::plot_diagram`]
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub units: UnitDisplay,
    /// Engineering notation on the axes
    pub eng: bool,
    pub moment: MomentComponent,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            units: UnitDisplay::si_n_mm(),
            eng: false,
            moment: MomentComponent::Mx,
        }
    }
}

/// Ordered interaction diagram points, compression first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentInteractionResults {
    /// Bending angle (rad)
    pub theta: f64,
    pub results: Vec<UltimateBendingResult>,
}

impl MomentInteractionResults {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Axial forces in diagram order (N)
    pub fn axial_forces(&self) -> Vec<f64> {
        self.results.iter().map(|r| r.n).collect()
    }

    /// Selected moment component in diagram order (N·mm)
    pub fn moments(&self, component: MomentComponent) -> Vec<f64> {
        self.results.iter().map(|r| component.of(r)).collect()
    }

    /// Moment capacity magnitude at axial force `n`, interpolated linearly
    /// between adjacent points. `None` outside the diagram's axial range.
    pub fn moment_capacity_at(&self, n: f64, component: MomentComponent) -> Option<f64> {
        self.results.windows(2).find_map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            let (hi, lo) = if a.n >= b.n { (a, b) } else { (b, a) };
            if n > hi.n || n < lo.n {
                return None;
            }
            let (m_hi, m_lo) = (component.of(hi).abs(), component.of(lo).abs());
            if (hi.n - lo.n).abs() < f64::EPSILON {
                return Some(m_hi.max(m_lo));
            }
            let t = (n - lo.n) / (hi.n - lo.n);
            Some(m_lo + t * (m_hi - m_lo))
        })
    }

    /// Whether the action `(n, m)` lies inside the diagram
    pub fn point_in_diagram(&self, n: f64, m: f64, component: MomentComponent) -> bool {
        self.moment_capacity_at(n, component)
            .is_some_and(|capacity| m.abs() <= capacity)
    }

    /// Write the diagram as SVG. Moments are plotted as magnitudes.
    pub fn plot_diagram(&self, path: &Path, options: &PlotOptions) -> CalcResult<()> {
        plot::plot_interaction_diagram(self, path, options)
    }
}

impl ConcreteSection {
    /// Moment interaction diagram for bending angle `theta` (rad, within
    /// `[-π, π]`).
    pub fn moment_interaction_diagram(
        &self,
        theta: f64,
        options: &DiagramOptions,
    ) -> CalcResult<MomentInteractionResults> {
        if !theta.is_finite() || !(-PI..=PI).contains(&theta) {
            return Err(CalcError::invalid_input(
                "theta",
                theta.to_string(),
                "Bending angle must lie within [-pi, pi]",
            ));
        }
        if options.n_points < 2 {
            return Err(CalcError::invalid_input(
                "n_points",
                options.n_points.to_string(),
                "At least two points are needed between the limits",
            ));
        }

        let start = self.limit_depth(options.start, theta)?;
        let end = self.limit_depth(options.end, theta)?;

        let mut results = Vec::with_capacity(options.n_points + 2);
        results.push(self.squash_result(theta));

        let steps = (options.n_points - 1) as f64;
        for i in 0..options.n_points {
            let d_n = start + (end - start) * i as f64 / steps;
            results.push(self.calculate_ultimate_section_actions(d_n, theta)?);
        }

        if options.extend_to_tension {
            results.push(self.tensile_result(theta));
        }

        tracing::debug!(
            theta,
            points = results.len(),
            start_d_n = start,
            end_d_n = end,
            "moment interaction diagram complete"
        );

        Ok(MomentInteractionResults { theta, results })
    }

    fn limit_depth(&self, limit: DiagramLimit, theta: f64) -> CalcResult<f64> {
        let (_, d_t) = self.extreme_fibres(theta);
        let d_n = match limit {
            DiagramLimit::Decompression(k) => k * d_t,
            DiagramLimit::NeutralAxisDepth(d_n) => d_n,
            DiagramLimit::AxialLoad(n) => self.neutral_axis_for_axial(n, theta)?,
        };
        if !d_n.is_finite() || d_n <= 0.0 {
            return Err(CalcError::invalid_input(
                "limit",
                format!("{:?}", limit),
                "Diagram limit must resolve to a positive neutral axis depth",
            ));
        }
        Ok(d_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{concrete_circular_section, CircularSectionParams};
    use crate::materials::{Concrete, SteelBar};
    use approx::assert_relative_eq;

    fn section() -> ConcreteSection {
        let geom = concrete_circular_section(&CircularSectionParams {
            diameter: 400.0,
            bar_diameter: 20.0,
            bar_count: 6,
            cover: 30.0,
            concrete: Concrete::from_strength(32.0).unwrap(),
            steel: SteelBar::from_yield_strength(500.0).unwrap(),
        })
        .unwrap();
        ConcreteSection::new(geom).unwrap()
    }

    #[test]
    fn test_default_diagram_shape() {
        let s = section();
        let mi = s
            .moment_interaction_diagram(0.0, &DiagramOptions::default())
            .unwrap();
        assert_eq!(mi.len(), 25);

        let first = mi.results[0];
        assert_eq!(first.n, s.gross_properties().squash_load);
        assert_eq!(first.m_x, 0.0);
        assert!(first.d_n.is_infinite());

        let last = mi.results[24];
        assert!(last.n.abs() < 1.0);
        assert!(mi.moments(MomentComponent::Mx).iter().all(|m| *m >= 0.0));
    }

    #[test]
    fn test_axial_forces_decrease() {
        let mi = section()
            .moment_interaction_diagram(0.0, &DiagramOptions::default())
            .unwrap();
        let n = mi.axial_forces();
        assert!(n.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_decompression_point_has_unit_ku() {
        let mi = section()
            .moment_interaction_diagram(0.0, &DiagramOptions::default())
            .unwrap();
        assert_relative_eq!(mi.results[1].k_u, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extend_to_tension() {
        let s = section();
        let opts = DiagramOptions {
            extend_to_tension: true,
            ..DiagramOptions::default()
        };
        let mi = s.moment_interaction_diagram(0.0, &opts).unwrap();
        assert_eq!(mi.len(), 26);
        assert_eq!(mi.results[25].n, s.gross_properties().tensile_load);
    }

    #[test]
    fn test_theta_out_of_range() {
        let err = section()
            .moment_interaction_diagram(4.0, &DiagramOptions::default())
            .unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_rejects_single_point() {
        let opts = DiagramOptions {
            n_points: 1,
            ..DiagramOptions::default()
        };
        let err = section().moment_interaction_diagram(0.0, &opts).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "n_points"));
    }

    #[test]
    fn test_neutral_axis_depth_limits() {
        let opts = DiagramOptions {
            start: DiagramLimit::NeutralAxisDepth(300.0),
            end: DiagramLimit::NeutralAxisDepth(100.0),
            n_points: 5,
            extend_to_tension: false,
        };
        let mi = section().moment_interaction_diagram(0.0, &opts).unwrap();
        assert_eq!(mi.len(), 6);
        let depths: Vec<f64> = mi.results[1..].iter().map(|r| r.d_n).collect();
        for (d_n, expected) in depths.iter().zip([300.0, 250.0, 200.0, 150.0, 100.0]) {
            assert_relative_eq!(*d_n, expected, epsilon = 1e-9);
        }

        let bad = DiagramOptions {
            start: DiagramLimit::NeutralAxisDepth(-5.0),
            ..opts
        };
        assert!(section().moment_interaction_diagram(0.0, &bad).is_err());
    }

    #[test]
    fn test_capacity_interpolation() {
        let mi = section()
            .moment_interaction_diagram(0.0, &DiagramOptions::default())
            .unwrap();
        let n_bending = mi.results[24].n;
        let at_bending = mi.moment_capacity_at(n_bending, MomentComponent::Mx).unwrap();
        assert_relative_eq!(at_bending, mi.results[24].m_x, max_relative = 1e-9);

        // Halfway between two points in N gives the average moment
        let (a, b) = (mi.results[10], mi.results[11]);
        let mid = mi
            .moment_capacity_at(0.5 * (a.n + b.n), MomentComponent::Mx)
            .unwrap();
        assert_relative_eq!(mid, 0.5 * (a.m_x + b.m_x), max_relative = 1e-9);

        assert!(mi.point_in_diagram(n_bending, 0.5 * at_bending, MomentComponent::Mx));
        assert!(!mi.point_in_diagram(n_bending, 1.5 * at_bending, MomentComponent::Mx));
        // Beyond the squash load
        assert!(mi
            .moment_capacity_at(2.0 * mi.results[0].n, MomentComponent::Mx)
            .is_none());
    }

    #[test]
    fn test_component_parsing() {
        assert_eq!("m_y".parse::<MomentComponent>().unwrap(), MomentComponent::My);
        assert!("mz".parse::<MomentComponent>().is_err());
        assert_eq!(MomentComponent::Mxy.to_string(), "m_xy");
    }
}
