//! Terminal rendering of a column report.

use std::io::{self, Write};

use concol_core::report::{FieldSpec, CAPTION_X, CAPTION_Y, INPUT_FIELDS};
use concol_core::{ColumnReport, PlotFiles};

const TITLE: &str = "Concol Column Explorer – All Results";

fn heading<W: Write>(w: &mut W, text: &str) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{}", text)?;
    writeln!(w, "{}", "-".repeat(text.chars().count()))
}

fn echo_value(spec: &FieldSpec, value: f64) -> String {
    if spec.integer {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Echo of the inputs, grouped like the sidebar form
pub fn render_sidebar<W: Write>(w: &mut W, report: &ColumnReport) -> io::Result<()> {
    writeln!(w, "Column: {}", report.input.label)?;
    let mut group = "";
    for spec in &INPUT_FIELDS {
        if spec.group != group {
            group = spec.group;
            writeln!(w, "  {}", group)?;
        }
        let value = report.input.get(spec.name).unwrap_or(spec.default);
        writeln!(w, "    {:<20} {}", spec.label, echo_value(spec, value))?;
    }
    Ok(())
}

/// Full results page: inputs, plots, property summary, spacing, diagrams.
pub fn render_page<W: Write>(
    w: &mut W,
    report: &ColumnReport,
    plots: &PlotFiles,
) -> io::Result<()> {
    writeln!(w, "{}", TITLE)?;
    writeln!(w, "{}", "=".repeat(TITLE.chars().count()))?;
    render_sidebar(w, report)?;

    heading(w, "Cross-Section")?;
    writeln!(w, "Plot: {}", plots.section.display())?;

    heading(w, "Gross Area Properties")?;
    let summary = serde_json::to_string_pretty(&report.summary).map_err(io::Error::other)?;
    writeln!(w, "{}", summary)?;

    heading(w, "Distance between bars")?;
    writeln!(w, "Clear distance (mm): {:.0}", report.clear_spacing)?;

    heading(w, "Moment Interaction Diagrams")?;
    writeln!(w, "Plot: {}", plots.interaction_x.display())?;
    writeln!(w, "  {}", CAPTION_X)?;
    writeln!(w, "Plot: {}", plots.interaction_y.display())?;
    writeln!(w, "  {}", CAPTION_Y)?;

    writeln!(w)?;
    writeln!(
        w,
        "concol {} · {}",
        env!("CARGO_PKG_VERSION"),
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use concol_core::report::{analyse, ColumnInput};
    use std::path::PathBuf;

    fn plots() -> PlotFiles {
        PlotFiles {
            section: PathBuf::from("out/section.svg"),
            interaction_x: PathBuf::from("out/interaction_x.svg"),
            interaction_y: PathBuf::from("out/interaction_y.svg"),
        }
    }

    #[test]
    fn test_page_contents() {
        let report = analyse(&ColumnInput::default()).unwrap();
        let mut out = Vec::new();
        render_page(&mut out, &report, &plots()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Clear distance (mm): 336"));
        assert!(text.contains("\"Total Area (mm²)\": \"125664\""));
        assert!(text.contains("x-axis bending (θ = 0°) – units: N·mm"));
        assert!(text.contains("y-axis bending (θ = 90°) – units: kN·m"));
        assert!(text.contains("out/interaction_y.svg"));
    }

    #[test]
    fn test_sidebar_echo() {
        let report = analyse(&ColumnInput::default()).unwrap();
        let mut out = Vec::new();
        render_sidebar(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Column: C-1"));
        assert!(text.contains("Reinforcement"));
        assert!(text.lines().any(|l| l.contains("Number of bars") && l.ends_with(" 3")));
    }
}
