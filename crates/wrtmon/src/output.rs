//! Output formatting: table, JSON, YAML.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde.

use std::io::{self, Write};

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serializable items, using `to_row` for table output.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        other => render_structured(other, data),
    }
}

/// Render a single item; `detail_fn` supplies the table-mode text.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        other => render_structured(other, data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_structured<T: Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Json | OutputFormat::Table => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: &'static str,
        clients: usize,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: &'static str,
    }

    #[test]
    fn compact_json_is_single_line() {
        let items = [Item { id: "ap1", clients: 3 }];
        let out = render_list(OutputFormat::JsonCompact, &items, |i| ItemRow { id: i.id })
            .expect("renders");
        assert_eq!(out, r#"[{"id":"ap1","clients":3}]"#);
    }

    #[test]
    fn table_uses_row_headers() {
        let items = [Item { id: "ap1", clients: 3 }];
        let out =
            render_list(OutputFormat::Table, &items, |i| ItemRow { id: i.id }).expect("renders");
        assert!(out.contains("ID"));
        assert!(out.contains("ap1"));
        assert!(!out.contains("clients"));
    }

    #[test]
    fn yaml_single_item() {
        let out = render_single(OutputFormat::Yaml, &Item { id: "gw", clients: 0 }, |_| {
            String::new()
        })
        .expect("renders");
        assert_eq!(out, "id: gw\nclients: 0\n");
    }
}
