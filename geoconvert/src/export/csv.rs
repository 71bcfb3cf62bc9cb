//! Export CSV (séparateur point-virgule)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geodesie::CoordinateSystem;

use super::ExportRow;

/// En-tête du fichier
pub const HEADER: &str =
    "Input;SourceSystem;TargetSystem;Result_X;Result_Y;Result_Alt_Ellips;Result_Alt_NGF_IGN69";

/// Valeur écrite dans chaque colonne de résultat d'une ligne en erreur
const ERROR_MARKER: &str = "ERROR";

/// Exporte les lignes vers un fichier CSV
pub fn export_to_csv(
    rows: &[ExportRow],
    from: CoordinateSystem,
    to: CoordinateSystem,
    output_path: &Path,
) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    write_csv(&mut writer, rows, from, to)?;
    writer.flush()?;
    Ok(())
}

/// Écrit l'en-tête puis une ligne par résultat
pub fn write_csv<W: Write>(
    writer: &mut W,
    rows: &[ExportRow],
    from: CoordinateSystem,
    to: CoordinateSystem,
) -> Result<()> {
    writeln!(writer, "{}", HEADER)?;
    for row in rows {
        write_row(writer, row, from, to)?;
    }
    Ok(())
}

fn write_row<W: Write>(
    writer: &mut W,
    row: &ExportRow,
    from: CoordinateSystem,
    to: CoordinateSystem,
) -> Result<()> {
    write!(writer, "{};{};{};", text_field(&row.input), from, to)?;

    match (&row.error, &row.target) {
        (None, Some(t)) => writeln!(
            writer,
            "{};{};{};{}",
            t.x,
            t.y,
            optional(t.z),
            optional(t.h)
        )?,
        _ => writeln!(
            writer,
            "{m};{m};{m};{m}",
            m = ERROR_MARKER
        )?,
    }
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Entoure de guillemets un champ contenant le séparateur
fn text_field(value: &str) -> String {
    if !value.contains(|c: char| matches!(c, ';' | '"' | '\n' | '\r')) {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\"\""),
            '\n' | '\r' => out.push(' '),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodesie::{Coordinates, ParseError, RowError};

    fn ok_row(input: &str, target: Coordinates) -> ExportRow {
        ExportRow {
            input: input.to_string(),
            target: Some(target),
            wgs84: None,
            error: None,
        }
    }

    fn render(rows: &[ExportRow]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, rows, CoordinateSystem::Lambert93, CoordinateSystem::Wgs84).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_and_success_row() {
        let target = Coordinates {
            x: 2.5,
            y: 47.25,
            z: Some(300.0),
            h: Some(252.4),
            system: CoordinateSystem::Wgs84,
        };
        let csv = render(&[ok_row("700000 6600000 300", target)]);
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), HEADER);
        assert_eq!(
            lines.next().unwrap(),
            "700000 6600000 300;EPSG:2154;EPSG:4326;2.5;47.25;300;252.4"
        );
    }

    #[test]
    fn test_missing_heights_are_empty() {
        let csv = render(&[ok_row("1 2", Coordinates::new(2.5, 47.25, CoordinateSystem::Wgs84))]);
        assert!(csv.lines().nth(1).unwrap().ends_with(";2.5;47.25;;"));
    }

    #[test]
    fn test_error_row() {
        let row = ExportRow {
            input: "BADROW".to_string(),
            target: None,
            wgs84: None,
            error: Some(RowError::Parse(ParseError::TooFewNumbers { found: 0 })),
        };
        let csv = render(&[row]);
        assert_eq!(
            csv.lines().nth(1).unwrap(),
            "BADROW;EPSG:2154;EPSG:4326;ERROR;ERROR;ERROR;ERROR"
        );
    }

    #[test]
    fn test_text_field_quoting() {
        assert_eq!(text_field("700000 6600000"), "700000 6600000");
        assert_eq!(text_field("700000;6600000"), "\"700000;6600000\"");
        assert_eq!(text_field("a\"b"), "\"a\"\"b\"");
    }
}
