//! # Concol CLI Application
//!
//! Interactive front-end for the circular column engine. Collects the
//! section parameters, runs the analysis, writes the SVG plots (and
//! optionally a PDF report) and prints the results page.
//!
//! ```text
//! concol                              # defaults, text page
//! concol --bar-count 8 --fc 40        # flags override config and defaults
//! concol --config column.toml --json  # full report as JSON
//! concol --interactive                # sidebar form + edit loop
//! ```

mod config;
mod logging;
mod prompt;
mod render;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use concol_core::pdf::render_column_pdf;
use concol_core::{analyse, write_plots, CalcError, ColumnInput};

use crate::config::{resolve, ConcolConfig, Overrides};

#[derive(Parser, Debug)]
#[command(name = "concol")]
#[command(version, about = "Circular reinforced concrete column explorer")]
struct Cli {
    /// Column diameter D (mm)
    #[arg(long)]
    diameter: Option<f64>,

    /// Bar diameter (mm)
    #[arg(long)]
    bar_diameter: Option<f64>,

    /// Number of bars
    #[arg(long)]
    bar_count: Option<u32>,

    /// Cover to the bar surface (mm)
    #[arg(long)]
    cover: Option<f64>,

    /// Concrete strength f'c (MPa)
    #[arg(long)]
    fc: Option<f64>,

    /// Steel yield strength fy (MPa)
    #[arg(long)]
    fy: Option<f64>,

    /// Column label shown in reports
    #[arg(long)]
    label: Option<String>,

    /// Prompt for every input, then re-render on each edit
    #[arg(short, long)]
    interactive: bool,

    /// Print the full report as JSON instead of the text page
    #[arg(long)]
    json: bool,

    /// Also write a PDF report to FILE
    #[arg(long, value_name = "FILE")]
    pdf: Option<PathBuf>,

    /// Directory for the SVG plots [default: concol-output]
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            label: self.label.clone(),
            diameter: self.diameter,
            bar_diameter: self.bar_diameter,
            bar_count: self.bar_count,
            cover: self.cover,
            fc: self.fc,
            fy: self.fy,
            out_dir: self.out_dir.clone(),
        }
    }
}

/// How each render is emitted
struct RenderSettings<'a> {
    out_dir: &'a Path,
    json: bool,
    pdf: Option<&'a Path>,
}

/// Run the whole pipeline once and print the result to `w`.
fn render_once<W: Write>(w: &mut W, input: &ColumnInput, settings: &RenderSettings) -> Result<()> {
    let report = analyse(input).context("analysis failed")?;
    let plots = write_plots(&report, settings.out_dir).context("writing plots failed")?;

    if settings.json {
        writeln!(w, "{}", report.to_json()?)?;
    } else {
        render::render_page(w, &report, &plots)?;
    }

    if let Some(pdf_path) = settings.pdf {
        let bytes = render_column_pdf(&report, &plots).context("PDF rendering failed")?;
        std::fs::write(pdf_path, bytes)
            .with_context(|| format!("failed to write '{}'", pdf_path.display()))?;
        tracing::info!(path = %pdf_path.display(), "PDF report written");
        if !settings.json {
            writeln!(w, "PDF report: {}", pdf_path.display())?;
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConcolConfig::from_file(path)?,
        None => ConcolConfig::default(),
    };
    let (input, out_dir) = resolve(&config, &cli.overrides());
    tracing::debug!(?input, out_dir = %out_dir.display(), "resolved input");

    let settings = RenderSettings {
        out_dir: &out_dir,
        json: cli.json,
        pdf: cli.pdf.as_deref(),
    };

    if !cli.interactive {
        let stdout = io::stdout();
        return render_once(&mut stdout.lock(), &input, &settings);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = stdin.lock();
    let mut writer = stdout.lock();

    writeln!(writer, "Concol - circular column explorer (press Enter to keep a value)")?;
    let input = prompt::collect_input(&mut reader, &mut writer, &input)?;

    // The first render must succeed from the form; afterwards edits that fail
    // are reported and the previous input is kept
    let input = match render_once(&mut writer, &input, &settings) {
        Ok(()) => input,
        Err(e) => {
            writeln!(writer, "! {:#}", e)?;
            writeln!(writer, "! falling back to defaults")?;
            let defaults = ColumnInput::default();
            render_once(&mut writer, &defaults, &settings)?;
            defaults
        }
    };

    prompt::edit_loop(&mut reader, &mut writer, input, |input, w| {
        render_once(w, input, &settings)
    })?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "concol failed");
            eprintln!("Error: {:#}", e);
            if let Some(calc) = e.downcast_ref::<CalcError>() {
                if let Ok(json) = serde_json::to_string_pretty(calc) {
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_become_overrides() {
        let cli = Cli::parse_from(["concol", "--bar-count", "8", "--fc", "40", "--out-dir", "x"]);
        let overrides = cli.overrides();
        assert_eq!(overrides.bar_count, Some(8));
        assert_eq!(overrides.fc, Some(40.0));
        assert_eq!(overrides.diameter, None);
        assert_eq!(overrides.out_dir, Some(PathBuf::from("x")));
    }

    #[test]
    fn test_render_once_json() {
        let dir = std::env::temp_dir().join("concol_cli_json_test");
        let settings = RenderSettings {
            out_dir: &dir,
            json: true,
            pdf: None,
        };
        let mut out = Vec::new();
        render_once(&mut out, &ColumnInput::default(), &settings).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["input"]["label"], "C-1");
        assert!(dir.join("section.svg").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_render_once_error_keeps_calc_error() {
        let dir = std::env::temp_dir().join("concol_cli_error_test");
        let settings = RenderSettings {
            out_dir: &dir,
            json: false,
            pdf: None,
        };
        let input = ColumnInput {
            cover: 190.0,
            ..ColumnInput::default()
        };
        let err = render_once(&mut Vec::new(), &input, &settings).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CalcError>(),
            Some(CalcError::InvalidGeometry { .. })
        ));
    }
}
