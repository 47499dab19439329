//! # SVG Plots
//!
//! Section drawings and interaction diagrams rendered with the plotters SVG
//! backend. Each function writes one self-contained `.svg` file.

use std::path::Path;

use plotters::prelude::*;

use crate::errors::{CalcError, CalcResult};
use crate::geometry::CompoundGeometry;
use crate::interaction::{MomentInteractionResults, PlotOptions};
use crate::units::format_engineering;

const SECTION_SIZE: (u32, u32) = (640, 640);
const DIAGRAM_SIZE: (u32, u32) = (720, 540);

fn plot_error(path: &Path, err: impl std::fmt::Display) -> CalcError {
    CalcError::file_error("plot", path.display().to_string(), err.to_string())
}

/// Map a material colour name to RGB. Unknown names fall back to black.
pub fn named_colour(name: &str) -> RGBColor {
    match name.to_ascii_lowercase().as_str() {
        "lightgrey" | "lightgray" => RGBColor(211, 211, 211),
        "grey" | "gray" => RGBColor(128, 128, 128),
        "darkgrey" | "darkgray" => RGBColor(169, 169, 169),
        "white" => RGBColor(255, 255, 255),
        _ => RGBColor(0, 0, 0),
    }
}

/// Draw the section: concrete regions, bars, and a legend of materials.
pub fn plot_section(geometry: &CompoundGeometry, path: &Path) -> CalcResult<()> {
    let (lo, hi) = geometry.bounding_box();
    // Square plotting window so circles stay round
    let half = 0.55 * (hi.x - lo.x).max(hi.y - lo.y);
    let (mx, my) = ((lo.x + hi.x) / 2.0, (lo.y + hi.y) / 2.0);

    let root = SVGBackend::new(path, SECTION_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| plot_error(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Cross-Section", ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(mx - half..mx + half, my - half..my + half)
        .map_err(|e| plot_error(path, e))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("x (mm)")
        .y_desc("y (mm)")
        .draw()
        .map_err(|e| plot_error(path, e))?;

    for region in &geometry.regions {
        let points: Vec<(f64, f64)> = region.exterior.vertices.iter().map(|p| (p.x, p.y)).collect();
        let colour = named_colour(region.material.colour());
        chart
            .draw_series(std::iter::once(Polygon::new(points.clone(), colour.filled())))
            .map_err(|e| plot_error(path, e))?
            .label(region.material.name().to_string())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], colour.filled()));

        let mut outline = points;
        if let Some(first) = outline.first().copied() {
            outline.push(first);
        }
        chart
            .draw_series(std::iter::once(PathElement::new(outline, BLACK.stroke_width(1))))
            .map_err(|e| plot_error(path, e))?;
    }

    if let Some(first_bar) = geometry.bars.first() {
        let colour = named_colour(first_bar.material.colour());
        chart
            .draw_series(geometry.bars.iter().map(|bar| {
                let points: Vec<(f64, f64)> =
                    bar.polygon.vertices.iter().map(|p| (p.x, p.y)).collect();
                Polygon::new(points, colour.filled())
            }))
            .map_err(|e| plot_error(path, e))?
            .label(first_bar.material.name().to_string())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], colour.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| plot_error(path, e))?;

    root.present().map_err(|e| plot_error(path, e))?;
    tracing::debug!(path = %path.display(), "section plot written");
    Ok(())
}

/// Draw an interaction diagram, moment magnitude on x and axial force on y.
pub fn plot_interaction_diagram(
    results: &MomentInteractionResults,
    path: &Path,
    options: &PlotOptions,
) -> CalcResult<()> {
    if results.is_empty() {
        return Err(CalcError::invalid_input(
            "results",
            "0 points",
            "Cannot plot an empty interaction diagram",
        ));
    }

    let units = &options.units;
    let points: Vec<(f64, f64)> = results
        .results
        .iter()
        .map(|r| {
            (
                units.moment(options.moment.of(r).abs()),
                units.force(r.n),
            )
        })
        .collect();

    let m_max = points.iter().map(|p| p.0).fold(0.0_f64, f64::max);
    let n_max = points.iter().map(|p| p.1).fold(0.0_f64, f64::max);
    let n_min = points.iter().map(|p| p.1).fold(0.0_f64, f64::min);
    let m_top = if m_max > 0.0 { 1.1 * m_max } else { 1.0 };
    let n_span = (n_max - n_min).max(1.0);

    let root = SVGBackend::new(path, DIAGRAM_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| plot_error(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Moment Interaction Diagram", ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(
            0.0..m_top,
            (n_min - 0.05 * n_span)..(n_max + 0.05 * n_span),
        )
        .map_err(|e| plot_error(path, e))?;

    let eng = options.eng;
    let label = move |v: &f64| {
        if eng {
            format_engineering(*v, 1)
        } else {
            format!("{:.0}", v)
        }
    };

    chart
        .configure_mesh()
        .x_desc(format!(
            "Bending Moment {} [{}]",
            options.moment,
            units.moment_unit()
        ))
        .y_desc(format!("Axial Force [{}]", units.force))
        .x_label_formatter(&label)
        .y_label_formatter(&label)
        .draw()
        .map_err(|e| plot_error(path, e))?;

    let line_colour = RGBColor(31, 119, 180);
    chart
        .draw_series(LineSeries::new(points.iter().copied(), line_colour.stroke_width(2)))
        .map_err(|e| plot_error(path, e))?;
    chart
        .draw_series(PointSeries::of_element(
            points.iter().copied(),
            3,
            line_colour.filled(),
            &|coord, size, style| EmptyElement::at(coord) + Circle::new((0, 0), size, style),
        ))
        .map_err(|e| plot_error(path, e))?;

    root.present().map_err(|e| plot_error(path, e))?;
    tracing::debug!(path = %path.display(), points = points.len(), "interaction diagram written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colours() {
        assert_eq!(named_colour("lightgrey"), RGBColor(211, 211, 211));
        assert_eq!(named_colour("Grey"), RGBColor(128, 128, 128));
        assert_eq!(named_colour("chartreuse"), RGBColor(0, 0, 0));
    }
}
