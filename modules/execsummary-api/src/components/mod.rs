use execsummary_common::BuildingSummary;

pub mod layout;
pub mod report;

pub use report::render_report;

// --- View Models ---

/// Property cell shown on the first row of each building, spanning its sources.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyCell {
    pub name: String,
    pub row_span: usize,
}

#[derive(Clone, PartialEq)]
pub struct ReportRow {
    pub property: Option<PropertyCell>,
    pub source: String,
    pub leads: u64,
    pub tours: u64,
    pub tour_ratio: String,
}

#[derive(Clone, PartialEq)]
pub struct ReportView {
    pub month_label: String,
    pub properties: Vec<String>,
    pub selected: String,
    pub export_href: String,
    /// Table rows, or the message shown in place of the table.
    pub rows: Result<Vec<ReportRow>, String>,
    pub last_updated: String,
}

/// Flatten grouped summaries into table rows, one per (building, source).
pub fn report_rows(summaries: &[BuildingSummary]) -> Vec<ReportRow> {
    summaries
        .iter()
        .flat_map(|building| {
            let span = building.sources.len();
            building
                .sources
                .iter()
                .enumerate()
                .map(move |(i, source)| ReportRow {
                    property: (i == 0).then(|| PropertyCell {
                        name: building.display_name().to_string(),
                        row_span: span,
                    }),
                    source: source.source_name.clone(),
                    leads: source.leads,
                    tours: source.tours,
                    tour_ratio: source.tour_ratio.clone(),
                })
        })
        .collect()
}
