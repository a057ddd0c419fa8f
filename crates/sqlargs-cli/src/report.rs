use crate::config::OutputFormat;
use sqlargs::{Diagnostic, Placeholder};
use std::io::Write;

/// Write diagnostics in `file:line:col: message` form, or as a JSON array.
pub fn write_diagnostics(
    out: &mut impl Write,
    format: OutputFormat,
    diags: &[Diagnostic],
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for d in diags {
                writeln!(out, "{d}")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, diags)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[derive(Debug, serde::Serialize)]
struct QueryPlaceholders<'a> {
    sql: &'a str,
    count: usize,
    placeholders: &'a [Placeholder],
}

/// Write the placeholders found in each query.
pub fn write_placeholders(
    out: &mut impl Write,
    format: OutputFormat,
    found: &[(String, Vec<Placeholder>)],
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for (idx, (sql, placeholders)) in found.iter().enumerate() {
                writeln!(out, "query {}: {} placeholder(s)", idx + 1, placeholders.len())?;
                for p in placeholders {
                    let marker = match &p.kind {
                        sqlargs::PlaceholderKind::Positional => "?".to_string(),
                        sqlargs::PlaceholderKind::Numbered(n) => format!("${n}"),
                        sqlargs::PlaceholderKind::Named(name) => {
                            // Recover the sigil from the source text.
                            let sigil = &sql[p.offset..p.offset + 1];
                            format!("{sigil}{name}")
                        }
                    };
                    writeln!(out, "  {marker} at byte {}", p.offset)?;
                }
            }
        }
        OutputFormat::Json => {
            let rows: Vec<QueryPlaceholders<'_>> = found
                .iter()
                .map(|(sql, placeholders)| QueryPlaceholders {
                    sql,
                    count: placeholders.len(),
                    placeholders,
                })
                .collect();
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
