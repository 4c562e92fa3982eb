use comfy_table::presets::NOTHING;
use comfy_table::{CellAlignment, Table};
use folderstats_core::human::{grouped, kilobytes, kilolines};
use folderstats_core::{FileStatistics, Report};

/// Plain-text report: inputs first, then the directory and extension tables.
pub fn render(report: &Report) -> String {
    let roots: Vec<String> = report.roots.iter().map(|p| p.display().to_string()).collect();
    let text: Vec<&str> = report.text_extensions.iter().map(String::as_str).collect();

    let mut out = String::new();
    out.push_str(&format!("Directories: {}\n", roots.join(", ")));
    out.push_str(&format!("Extensions:  {}\n", text.join(" ")));
    if !report.include_extensions.is_empty() {
        let only: Vec<&str> = report.include_extensions.iter().map(String::as_str).collect();
        out.push_str(&format!("Only:        {}\n", only.join(" ")));
    }

    out.push_str(&section(
        "Statistics by directory:",
        "Directory",
        report
            .ranked_directories()
            .into_iter()
            .map(|(path, s)| (path.display().to_string(), *s)),
    ));
    out.push_str(&section(
        "Statistics by extension:",
        "Extension",
        report
            .ranked_extensions()
            .into_iter()
            .map(|(ext, s)| (ext.clone(), *s)),
    ));
    out
}

fn section(
    title: &str,
    category: &str,
    rows: impl IntoIterator<Item = (String, FileStatistics)>,
) -> String {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec![category, "Total Size, KB", "Line Count, K", "File Count"]);
    for (key, s) in rows {
        table.add_row(vec![key, kilobytes(s.size), kilolines(s.lines), grouped(s.count)]);
    }
    for idx in 1..4 {
        if let Some(column) = table.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    format!("\n{title}\n\n{table}\n")
}
