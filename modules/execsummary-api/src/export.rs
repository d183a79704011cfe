//! Static image export of the report table.

use crate::components::ReportRow;

const ROW_HEIGHT: usize = 32;
const HEADER_HEIGHT: usize = 72;
const WIDTH: usize = 760;
const COLUMNS: [(&str, usize, &str); 5] = [
    ("Property", 16, "start"),
    ("Source", 236, "start"),
    ("Leads", 546, "end"),
    ("Tours", 636, "end"),
    ("Tour Ratio", 744, "end"),
];

/// Download name for the month's export, e.g. `leads-tours-report-January-2025.svg`.
pub fn export_filename(month_label: &str) -> String {
    format!("leads-tours-report-{}.svg", month_label.replace(' ', "-"))
}

/// Render the table as a standalone SVG document.
pub fn render_svg(title: &str, rows: &[ReportRow]) -> String {
    let height = HEADER_HEIGHT + ROW_HEIGHT * (rows.len() + 1) + 16;
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{height}\" \
         viewBox=\"0 0 {WIDTH} {height}\" font-family=\"Helvetica, Arial, sans-serif\" font-size=\"14\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n\
         <text x=\"16\" y=\"40\" font-size=\"20\" font-weight=\"bold\">{}</text>\n",
        escape_xml(title)
    );

    let header_y = HEADER_HEIGHT;
    for (label, x, anchor) in COLUMNS {
        svg.push_str(&format!(
            "<text x=\"{x}\" y=\"{header_y}\" text-anchor=\"{anchor}\" font-weight=\"bold\" fill=\"#555555\">{label}</text>\n"
        ));
    }

    for (i, row) in rows.iter().enumerate() {
        let top = header_y + 12 + ROW_HEIGHT * i;
        let y = top + 20;

        if let Some(cell) = &row.property {
            svg.push_str(&format!(
                "<rect x=\"8\" y=\"{top}\" width=\"216\" height=\"{}\" fill=\"#fafafa\"/>\n",
                ROW_HEIGHT * cell.row_span
            ));
            svg.push_str(&text(COLUMNS[0], y, &cell.name));
        }
        svg.push_str(&format!(
            "<line x1=\"224\" y1=\"{0}\" x2=\"{1}\" y2=\"{0}\" stroke=\"#e0e0e0\"/>\n",
            top + ROW_HEIGHT,
            WIDTH - 8
        ));
        svg.push_str(&text(COLUMNS[1], y, &row.source));
        svg.push_str(&text(COLUMNS[2], y, &row.leads.to_string()));
        svg.push_str(&text(COLUMNS[3], y, &row.tours.to_string()));
        svg.push_str(&text(COLUMNS[4], y, &row.tour_ratio));
    }

    svg.push_str("</svg>\n");
    svg
}

fn text((_, x, anchor): (&str, usize, &str), y: usize, value: &str) -> String {
    format!(
        "<text x=\"{x}\" y=\"{y}\" text-anchor=\"{anchor}\">{}</text>\n",
        escape_xml(value)
    )
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
