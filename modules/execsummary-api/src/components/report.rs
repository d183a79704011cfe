use dioxus::prelude::*;

use super::layout::Layout;
use super::{ReportRow, ReportView};
use crate::templates::render_document;

pub const PAGE_TITLE: &str = "Exec Summary Snapshot Tool";
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching data from server";

#[allow(non_snake_case)]
#[component]
fn ReportTable(rows: Vec<ReportRow>) -> Element {
    rsx! {
        table { id: "report-table", class: "w-full text-sm bg-white",
            thead {
                tr { class: "border-b text-left text-gray-600",
                    th { class: "py-2 px-3", "Property" }
                    th { class: "py-2 px-3", "Source" }
                    th { class: "py-2 px-3 text-right", "Leads" }
                    th { class: "py-2 px-3 text-right", "Tours" }
                    th { class: "py-2 px-3 text-right", "Tour Ratio" }
                }
            }
            tbody {
                for row in rows.iter() {
                    tr { class: "border-b",
                        if let Some(cell) = &row.property {
                            td { class: "py-2 px-3 bg-gray-50 align-top font-medium",
                                rowspan: "{cell.row_span}",
                                "{cell.name}"
                            }
                        }
                        td { class: "py-2 px-3", "{row.source}" }
                        td { class: "py-2 px-3 text-right", "{row.leads}" }
                        td { class: "py-2 px-3 text-right", "{row.tours}" }
                        td { class: "py-2 px-3 text-right", "{row.tour_ratio}" }
                    }
                }
            }
        }
    }
}

#[allow(non_snake_case)]
#[component]
fn ReportPage(view: ReportView) -> Element {
    let subtitle = format!("Leads & Tours - {}", view.month_label);
    rsx! {
        Layout { title: PAGE_TITLE.to_string(),
            div { class: "bg-white shadow rounded p-8",
                div { class: "flex flex-col md:flex-row justify-between items-center mb-8 gap-4",
                    div {
                        h1 { class: "text-3xl font-semibold mb-1", "{PAGE_TITLE}" }
                        h2 { class: "text-lg text-gray-500", "{subtitle}" }
                    }
                    div { class: "flex gap-2 items-center",
                        form { method: "GET", action: "/", class: "flex gap-2",
                            select { name: "property", class: "border rounded px-2 py-1 min-w-[200px]",
                                for property in view.properties.iter() {
                                    option {
                                        value: "{property}",
                                        selected: *property == view.selected,
                                        "{property}"
                                    }
                                }
                            }
                            button { r#type: "submit", class: "border rounded px-3 py-1", "Apply" }
                        }
                        a { href: "{view.export_href}",
                            class: "bg-blue-600 text-white rounded px-3 py-1",
                            "Export Image"
                        }
                    }
                }
                if let Ok(rows) = &view.rows {
                    ReportTable { rows: rows.clone() }
                }
                if let Err(message) = &view.rows {
                    p { class: "text-red-600 text-center py-8", "{message}" }
                }
            }
            p { class: "text-xs text-gray-500 text-center mt-4",
                "Last updated: {view.last_updated}"
            }
        }
    }
}

pub fn render_report(view: ReportView) -> String {
    let mut dom = VirtualDom::new_with_props(ReportPage, ReportPageProps { view });
    dom.rebuild_in_place();
    render_document(&dom)
}
