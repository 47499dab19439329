//! Sidebar-style input form and the re-render loop.
//!
//! Generic over the reader and writer so sessions can be scripted in tests.

use std::io::{self, BufRead, Write};

use concol_core::report::{FieldSpec, INPUT_FIELDS};
use concol_core::ColumnInput;

/// Read one line; `None` on end of input.
fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn format_value(spec: &FieldSpec, value: f64) -> String {
    if spec.integer {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Check a typed value against the field's limits.
pub fn check_value(spec: &FieldSpec, raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if !value.is_finite() {
        return Err(format!("'{}' is not a finite number", raw));
    }
    if spec.integer && value.fract() != 0.0 {
        return Err(format!("{} must be a whole number", spec.label));
    }
    if value < spec.minimum {
        return Err(format!(
            "{} must be at least {}",
            spec.label,
            format_value(spec, spec.minimum)
        ));
    }
    Ok(value)
}

/// Prompt for one field until a valid value is given. Empty input or end of
/// input keeps `current`.
pub fn prompt_field<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    spec: &FieldSpec,
    current: f64,
) -> io::Result<f64> {
    loop {
        write!(
            writer,
            "  {} (min {}) [{}]: ",
            spec.label,
            format_value(spec, spec.minimum),
            format_value(spec, current)
        )?;
        writer.flush()?;

        let Some(line) = read_line(reader)? else {
            writeln!(writer)?;
            return Ok(current);
        };
        if line.is_empty() {
            return Ok(current);
        }
        match check_value(spec, &line) {
            Ok(value) => return Ok(value),
            Err(message) => writeln!(writer, "  ! {}", message)?,
        }
    }
}

/// Walk the whole form, grouped like the sidebar, starting from `start`.
pub fn collect_input<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    start: &ColumnInput,
) -> io::Result<ColumnInput> {
    let mut input = start.clone();
    let mut group = "";

    for spec in &INPUT_FIELDS {
        if spec.group != group {
            group = spec.group;
            writeln!(writer, "{}", group)?;
        }
        let current = input.get(spec.name).unwrap_or(spec.default);
        let value = prompt_field(reader, writer, spec, current)?;
        // Value already checked, so the text form always parses back
        if let Err(e) = input.set_field(spec.name, &value.to_string()) {
            writeln!(writer, "  ! {}", e)?;
        }
    }

    Ok(input)
}

/// One parsed edit command
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Change `field` to `value` and re-render
    Set { field: String, value: String },
    /// Leave the session
    Quit,
}

/// Parse `name=value`. Empty input, `q` and `quit` end the session.
pub fn parse_edit(line: &str) -> Result<Edit, String> {
    let line = line.trim();
    if line.is_empty() || line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Ok(Edit::Quit);
    }
    let (field, value) = line
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", line))?;
    let (field, value) = (field.trim(), value.trim());
    if field.is_empty() || value.is_empty() {
        return Err(format!("expected name=value, got '{}'", line));
    }
    Ok(Edit::Set {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Print the current values as `name=value` pairs
pub fn write_current<W: Write>(writer: &mut W, input: &ColumnInput) -> io::Result<()> {
    let pairs: Vec<String> = std::iter::once(format!("label={}", input.label))
        .chain(INPUT_FIELDS.iter().map(|spec| {
            format!(
                "{}={}",
                spec.name,
                format_value(spec, input.get(spec.name).unwrap_or(spec.default))
            )
        }))
        .collect();
    writeln!(writer, "Current: {}", pairs.join(", "))
}

/// Re-render loop: each accepted edit re-runs `render` on the whole input.
///
/// A failed render reports the error and keeps the previous valid input.
/// Returns the last input that rendered successfully.
pub fn edit_loop<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    mut input: ColumnInput,
    mut render: F,
) -> io::Result<ColumnInput>
where
    R: BufRead,
    W: Write,
    F: FnMut(&ColumnInput, &mut W) -> anyhow::Result<()>,
{
    loop {
        writeln!(writer)?;
        write_current(writer, &input)?;
        write!(writer, "Edit (name=value, empty to quit): ")?;
        writer.flush()?;

        let Some(line) = read_line(reader)? else {
            writeln!(writer)?;
            return Ok(input);
        };

        let (field, value) = match parse_edit(&line) {
            Ok(Edit::Quit) => return Ok(input),
            Ok(Edit::Set { field, value }) => (field, value),
            Err(message) => {
                writeln!(writer, "! {}", message)?;
                continue;
            }
        };

        let mut candidate = input.clone();
        if let Err(e) = candidate.set_field(&field, &value) {
            writeln!(writer, "! {}", e)?;
            continue;
        }

        match render(&candidate, writer) {
            Ok(()) => {
                tracing::debug!(field = %field, value = %value, "input updated");
                input = candidate;
            }
            Err(e) => {
                tracing::warn!(error = %e, "render failed, keeping previous input");
                writeln!(writer, "! {:#}", e)?;
                writeln!(writer, "! keeping previous values")?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concol_core::report::field_spec;
    use std::io::Cursor;

    #[test]
    fn test_check_value_limits() {
        let bars = field_spec("bar_count").unwrap();
        assert_eq!(check_value(bars, "6"), Ok(6.0));
        assert!(check_value(bars, "0").is_err());
        assert!(check_value(bars, "2.5").is_err());
        assert!(check_value(bars, "six").is_err());
    }

    #[test]
    fn test_collect_input_defaults_on_empty_lines() {
        let mut reader = Cursor::new("\n\n\n\n\n\n");
        let mut out = Vec::new();
        let input = collect_input(&mut reader, &mut out, &ColumnInput::default()).unwrap();
        assert_eq!(input, ColumnInput::default());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Geometry (mm)"));
        assert!(text.contains("Materials"));
        assert!(text.contains("Diameter D (min 100.0) [400.0]"));
    }

    #[test]
    fn test_collect_input_reprompts_invalid() {
        // diameter: too small, then valid; bars: 8; rest default
        let mut reader = Cursor::new("50\n450\n\n8\n\n\n\n");
        let mut out = Vec::new();
        let input = collect_input(&mut reader, &mut out, &ColumnInput::default()).unwrap();
        assert_eq!(input.diameter, 450.0);
        assert_eq!(input.bar_count, 8);
        assert!(String::from_utf8(out).unwrap().contains("must be at least"));
    }

    #[test]
    fn test_collect_input_eof_keeps_values() {
        let mut reader = Cursor::new("");
        let mut out = Vec::new();
        let input = collect_input(&mut reader, &mut out, &ColumnInput::default()).unwrap();
        assert_eq!(input, ColumnInput::default());
    }

    #[test]
    fn test_parse_edit() {
        assert_eq!(parse_edit(""), Ok(Edit::Quit));
        assert_eq!(parse_edit("quit"), Ok(Edit::Quit));
        assert_eq!(
            parse_edit(" cover = 40 "),
            Ok(Edit::Set {
                field: "cover".to_string(),
                value: "40".to_string()
            })
        );
        assert!(parse_edit("cover").is_err());
        assert!(parse_edit("=40").is_err());
    }

    #[test]
    fn test_edit_loop_keeps_previous_on_failure() {
        let mut reader = Cursor::new("bar_count=6\ncover=500\nfc=abc\nfy=450\n\n");
        let mut out = Vec::new();
        let mut renders = 0;
        let last = edit_loop(&mut reader, &mut out, ColumnInput::default(), |input, _| {
            renders += 1;
            if input.cover > 100.0 {
                anyhow::bail!("cover too large");
            }
            Ok(())
        })
        .unwrap();

        assert_eq!(last.bar_count, 6);
        assert_eq!(last.cover, 30.0);
        assert_eq!(last.fy, 450.0);
        // fc=abc never reaches render
        assert_eq!(renders, 3);
        assert!(String::from_utf8(out).unwrap().contains("keeping previous values"));
    }
}
