//! # PDF Generation Module
//!
//! Renders a [`ColumnReport`] to PDF with Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected with `{{PLACEHOLDER}}` replacement before compilation
//! - Plot SVGs written by [`crate::report::write_plots`] are served to the
//!   template as virtual files, so `#image("section.svg")` resolves
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use concol_core::pdf::render_column_pdf;
//! use concol_core::report::{analyse, write_plots, ColumnInput};
//! use std::path::Path;
//!
//! let report = analyse(&ColumnInput::default()).unwrap();
//! let plots = write_plots(&report, Path::new("concol-output")).unwrap();
//! let pdf_bytes = render_column_pdf(&report, &plots).unwrap();
//! std::fs::write("column_report.pdf", pdf_bytes).unwrap();
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::Utc;
use once_cell::sync::Lazy;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{CalcError, CalcResult};
use crate::interaction::MomentInteractionResults;
use crate::report::{ColumnReport, PlotFiles, CAPTION_X, CAPTION_Y};
use crate::units::UnitDisplay;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// Bundled typst-assets fonts, parsed once per process
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
        .collect()
});

/// A minimal Typst world: one source document plus in-memory image files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Library (standard functions)
    library: LazyHash<Library>,
    /// Virtual files keyed by their rootless path (e.g. "section.svg")
    files: HashMap<String, Bytes>,
}

impl PdfWorld {
    fn new(source: String, files: HashMap<String, Bytes>) -> Self {
        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
            files,
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        let path = id.vpath().as_rootless_path();
        path.to_str()
            .and_then(|name| self.files.get(name))
            .cloned()
            .ok_or_else(|| FileError::NotFound(path.into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// PDF Template
// ============================================================================

/// Typst template for the column report
const COLUMN_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2.2cm, bottom: 2.2cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Concol Column Calculations]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Column: #{{LABEL}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 10.5pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Circular RC Column: Section Analysis]
    #v(4pt)
    #text(size: 14pt)[#{{LABEL}}]
  ]
]

#v(12pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Section*
    #table(
      columns: (1fr, auto),
      inset: 6pt,
      stroke: 0.5pt,
      [Diameter $D$], [{{DIAMETER}} mm],
      [Bars], [{{BAR_COUNT}} × Ø{{BAR_DIAMETER}}],
      [Cover to bar], [{{COVER}} mm],
      [Clear bar spacing], [{{CLEAR_SPACING}} mm],
    )
  ],
  [
    *Materials*
    #table(
      columns: (1fr, auto),
      inset: 6pt,
      stroke: 0.5pt,
      [#{{CONCRETE_NAME}}], [$E_c$ = {{EC}} MPa],
      [$alpha_2$ / $gamma$], [{{ALPHA}} / {{GAMMA}}],
      [$f'_"ct.f"$], [{{FCTF}} MPa],
      [#{{STEEL_NAME}}], [$E_s$ = {{ES}} MPa],
    )
  ],
)

#v(10pt)

== Gross Area Properties

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  [Total area], [{{TOTAL_AREA}} mm²],
  [$E I_"xx,g"$], [{{E_IXX}} N·mm²],
  [$E I_"yy,g"$], [{{E_IYY}} N·mm²],
  [Squash load $N_"uo"$], [{{SQUASH}} kN],
  [Tensile load $N_t$], [{{TENSILE}} kN],
  [Plastic centroid], [({{PC_X}}, {{PC_Y}}) mm],
  [Mass], [{{MASS}} kg/m],
)

#v(10pt)

== Cross-Section

#align(center)[#image("section.svg", width: 60%)]

#pagebreak()

== Moment Interaction Diagrams

#grid(
  columns: (1fr, 1fr),
  gutter: 12pt,
  [
    #image("interaction_x.svg", width: 100%)
    #align(center)[#text(size: 9pt)[#{{CAPTION_X}}]]
  ],
  [
    #image("interaction_y.svg", width: 100%)
    #align(center)[#text(size: 9pt)[#{{CAPTION_Y}}]]
  ],
)

#v(10pt)

=== Diagram Points

#text(size: 9pt)[
#table(
  columns: (auto, 1fr, 1fr, 1fr, 1fr),
  inset: 4pt,
  stroke: 0.4pt,
  table.header([*$k_u$*], [*$N_x$ (kN)*], [*$M_x$ (kN·m)*], [*$N_y$ (kN)*], [*$M_y$ (kN·m)*]),
{{DIAGRAM_ROWS}}
)
]
"##;

/// Render a column report, with its plots, to PDF bytes.
///
/// `plots` must point at files written by [`crate::report::write_plots`].
pub fn render_column_pdf(report: &ColumnReport, plots: &PlotFiles) -> CalcResult<Vec<u8>> {
    let mut files = HashMap::new();
    for (name, path) in [
        ("section.svg", &plots.section),
        ("interaction_x.svg", &plots.interaction_x),
        ("interaction_y.svg", &plots.interaction_y),
    ] {
        files.insert(name.to_string(), read_plot(path)?);
    }

    let mut source = build_source(report);
    source.push_str(&report.equations.generate_appendix_typst());

    let world = PdfWorld::new(source, files);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })?;

    tracing::info!(bytes = pdf_bytes.len(), label = %report.input.label, "pdf rendered");
    Ok(pdf_bytes)
}

fn read_plot(path: &Path) -> CalcResult<Bytes> {
    fs::read(path)
        .map(Bytes::new)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))
}

/// Fill the template placeholders from the report
fn build_source(report: &ColumnReport) -> String {
    let input = &report.input;
    let gross = &report.gross_properties;
    let kn = UnitDisplay::si_kn_m();

    COLUMN_TEMPLATE
        .replace("{{LABEL}}", &typst_string(&input.label))
        .replace("{{DATE}}", &report.generated_at.format("%Y-%m-%d").to_string())
        .replace("{{DIAMETER}}", &format!("{:.0}", input.diameter))
        .replace("{{BAR_COUNT}}", &input.bar_count.to_string())
        .replace("{{BAR_DIAMETER}}", &format!("{:.0}", input.bar_diameter))
        .replace("{{COVER}}", &format!("{:.0}", input.cover))
        .replace("{{CLEAR_SPACING}}", &format!("{:.0}", report.clear_spacing))
        .replace("{{CONCRETE_NAME}}", &typst_string(&report.concrete.name))
        .replace(
            "{{EC}}",
            &format!("{:.0}", report.concrete.service_profile.elastic_modulus),
        )
        .replace("{{ALPHA}}", &format!("{:.3}", report.concrete.ultimate_profile.alpha))
        .replace("{{GAMMA}}", &format!("{:.3}", report.concrete.ultimate_profile.gamma))
        .replace("{{FCTF}}", &format!("{:.2}", report.concrete.flexural_tensile_strength))
        .replace("{{STEEL_NAME}}", &typst_string(&report.steel.name))
        .replace("{{ES}}", &format!("{:.0}", report.steel.profile.elastic_modulus))
        .replace("{{TOTAL_AREA}}", &report.summary.total_area)
        .replace("{{E_IXX}}", &report.summary.e_ixx_g)
        .replace("{{E_IYY}}", &report.summary.e_iyy_g)
        .replace("{{SQUASH}}", &format!("{:.0}", kn.force(gross.squash_load)))
        .replace("{{TENSILE}}", &format!("{:.0}", kn.force(gross.tensile_load)))
        .replace("{{PC_X}}", &format!("{:.1}", gross.axial_pc_x))
        .replace("{{PC_Y}}", &format!("{:.1}", gross.axial_pc_y))
        // kg/mm -> kg/m
        .replace("{{MASS}}", &format!("{:.1}", gross.mass * 1000.0))
        .replace("{{CAPTION_X}}", &typst_string(CAPTION_X))
        .replace("{{CAPTION_Y}}", &typst_string(CAPTION_Y))
        .replace(
            "{{DIAGRAM_ROWS}}",
            &build_diagram_rows(&report.diagram_x, &report.diagram_y),
        )
}

/// Table rows pairing the x- and y-axis diagrams point by point
fn build_diagram_rows(x: &MomentInteractionResults, y: &MomentInteractionResults) -> String {
    let kn = UnitDisplay::si_kn_m();
    x.results
        .iter()
        .zip(&y.results)
        .map(|(rx, ry)| {
            let k_u = if rx.d_n.is_finite() {
                format!("{:.3}", rx.k_u)
            } else {
                "–".to_string()
            };
            format!(
                "  [{}], [{:.0}], [{:.1}], [{:.0}], [{:.1}],",
                k_u,
                kn.force(rx.n),
                kn.moment(rx.m_x.abs()),
                kn.force(ry.n),
                kn.moment(ry.m_y.abs()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Quote user-provided text as a Typst string literal.
///
/// Templates place it after `#`, so markup syntax inside the text (`//`,
/// `*`, a leading `=`) is never interpreted.
pub(crate) fn typst_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{analyse, write_plots, ColumnInput};

    #[test]
    fn test_typst_string_quotes_text() {
        assert_eq!(typst_string("C_1 #2"), "\"C_1 #2\"");
        assert_eq!(typst_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(typst_string("a\\b"), "\"a\\\\b\"");
    }

    #[test]
    fn test_markup_in_label_stays_text() {
        let input = ColumnInput {
            label: "C//1 level 2".to_string(),
            ..ColumnInput::default()
        };
        let report = analyse(&input).unwrap();
        let source = build_source(&report);
        assert!(source.contains("[Column: #\"C//1 level 2\"]"));

        let dir = std::env::temp_dir().join("concol_pdf_markup_label");
        let plots = write_plots(&report, &dir).unwrap();
        for label in ["C//1 level 2", "= C-1", "*C* [1] #2 $x$ \\"] {
            let mut report = report.clone();
            report.input.label = label.to_string();
            let pdf = render_column_pdf(&report, &plots);
            assert!(pdf.is_ok(), "label {:?} failed: {:?}", label, pdf.err());
        }
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_source_has_no_unfilled_placeholders() {
        let report = analyse(&ColumnInput::default()).unwrap();
        let source = build_source(&report);
        assert!(!source.contains("{{"), "unfilled placeholder in template");
        assert!(source.contains("32 MPa Concrete"));
        assert!(source.contains("125664"));
    }

    #[test]
    fn test_diagram_rows_one_per_point() {
        let report = analyse(&ColumnInput::default()).unwrap();
        let rows = build_diagram_rows(&report.diagram_x, &report.diagram_y);
        assert_eq!(rows.lines().count(), report.diagram_x.len());
    }

    #[test]
    fn test_pdf_generation() {
        let dir = std::env::temp_dir().join("concol_pdf_test");
        let report = analyse(&ColumnInput::default()).unwrap();
        let plots = write_plots(&report, &dir).unwrap();

        let pdf = render_column_pdf(&report, &plots);
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_plot_is_file_error() {
        let report = analyse(&ColumnInput::default()).unwrap();
        let missing = std::env::temp_dir().join("concol_no_such_dir");
        let plots = PlotFiles {
            section: missing.join("section.svg"),
            interaction_x: missing.join("interaction_x.svg"),
            interaction_y: missing.join("interaction_y.svg"),
        };
        let err = render_column_pdf(&report, &plots).unwrap_err();
        assert!(matches!(err, CalcError::FileError { .. }));
    }
}
