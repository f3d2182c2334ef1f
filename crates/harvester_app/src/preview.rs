use harvester_core::DerivedTable;

const PREVIEW_WIDTH: usize = 40;

/// Plain-text rendering of the derived table for the terminal.
pub fn format_preview(table: &DerivedTable) -> String {
    let headers = table.headers();
    let mut out = String::new();
    out.push_str(&headers.join(" | "));
    out.push('\n');
    for record in table.records() {
        let cells: Vec<String> = record.iter().map(|cell| shorten(cell, PREVIEW_WIDTH)).collect();
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }
    out.push_str(&format!("[{} rows x {} columns]\n", table.rows().len(), headers.len()));
    out
}

fn shorten(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_string();
    }
    let mut short: String = cell.chars().take(width.saturating_sub(3)).collect();
    short.push_str("...");
    short
}
