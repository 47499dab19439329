use std::f64::consts::PI;
use std::fs;

use approx::assert_relative_eq;
use concol_core::equations::section::clear_bar_spacing;
use concol_core::report::{analyse, write_plots, ColumnInput};
use concol_core::{CalcError, MomentComponent};

fn default_report() -> concol_core::ColumnReport {
    analyse(&ColumnInput::default()).expect("default column analyses")
}

#[test]
fn clear_spacing_for_default_column() {
    let report = default_report();
    assert_relative_eq!(report.clear_spacing, PI * 340.0 / 3.0 - 20.0, epsilon = 1e-9);
    assert_eq!(format!("{:.0}", report.clear_spacing), "336");
    assert_relative_eq!(
        clear_bar_spacing(600.0, 40.0, 8, 24.0),
        PI * 520.0 / 8.0 - 24.0,
        epsilon = 1e-9
    );
}

#[test]
fn total_area_matches_circle() {
    let report = default_report();
    assert_relative_eq!(
        report.gross_properties.total_area,
        PI * 400.0_f64.powi(2) / 4.0,
        max_relative = 1e-10
    );
    assert_eq!(report.summary.total_area, "125664");
}

#[test]
fn symmetric_bar_layouts_bend_equally() {
    for bar_count in [3, 4, 6, 9] {
        let input = ColumnInput {
            bar_count,
            ..ColumnInput::default()
        };
        let props = analyse(&input).unwrap().gross_properties;
        assert_relative_eq!(props.e_ixx_g, props.e_iyy_g, max_relative = 1e-9);
        assert_relative_eq!(props.e_i11, props.e_i22, max_relative = 1e-9);
    }
}

#[test]
fn summary_rigidities_use_signed_exponent() {
    let report = default_report();
    let summary = &report.summary;
    assert!(summary.e_ixx_g.contains("e+"), "got {}", summary.e_ixx_g);
    let parsed: f64 = summary.e_ixx_g.parse().unwrap();
    assert_relative_eq!(parsed, report.gross_properties.e_ixx_g, max_relative = 1e-3);
}

#[test]
fn squash_and_tensile_loads() {
    let report = default_report();
    let props = &report.gross_properties;
    let a_s = props.reinf_lumped_area;
    let a_c = props.concrete_area;
    assert_relative_eq!(
        props.squash_load,
        0.802 * 32.0 * a_c + 500.0 * a_s,
        max_relative = 1e-9
    );
    assert_relative_eq!(props.tensile_load, -500.0 * a_s, max_relative = 1e-12);
}

#[test]
fn interaction_diagrams_follow_contract() {
    let report = default_report();
    for (diagram, component) in [
        (&report.diagram_x, MomentComponent::Mx),
        (&report.diagram_y, MomentComponent::My),
    ] {
        assert_eq!(diagram.len(), 25);
        let first = diagram.results[0];
        assert_relative_eq!(first.n, report.gross_properties.squash_load);
        assert_eq!(component.of(&first), 0.0);

        let last = diagram.results[diagram.len() - 1];
        assert!(last.n.abs() < 1.0, "pure bending point has N = {}", last.n);
        assert!(diagram.results.iter().all(|r| r.m_xy >= 0.0));
    }
    assert!(report
        .diagram_x
        .moments(MomentComponent::Mx)
        .iter()
        .all(|m| *m >= 0.0));
}

#[test]
fn large_cover_is_invalid_geometry() {
    let input = ColumnInput {
        cover: 190.0,
        ..ColumnInput::default()
    };
    let err = analyse(&input).unwrap_err();
    assert!(matches!(err, CalcError::InvalidGeometry { .. }));
    assert_eq!(err.error_code(), "INVALID_GEOMETRY");
}

#[test]
fn input_below_minimum_is_rejected() {
    let input = ColumnInput {
        diameter: 50.0,
        ..ColumnInput::default()
    };
    assert!(analyse(&input).unwrap_err().is_input_error());
}

#[test]
fn report_serializes_to_json() {
    let report = default_report();
    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["Total Area (mm²)"], "125664");
    assert_eq!(value["input"]["bar_count"], 3);
    assert_eq!(value["diagram_x"]["results"].as_array().unwrap().len(), 25);
}

#[test]
fn plots_are_written_as_svg() {
    let dir = std::env::temp_dir().join("concol_plot_integration");
    let report = default_report();
    let files = write_plots(&report, &dir).unwrap();

    for path in [&files.section, &files.interaction_x, &files.interaction_y] {
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("<svg"), "{} is not SVG", path.display());
    }
    assert!(files.interaction_y.ends_with("interaction_y.svg"));

    let _ = fs::remove_dir_all(&dir);
}
