//! Leads & tours rollup: stored events grouped by building, then marketing source.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::StoredEvent;

/// Selector value meaning "no building filter".
pub const ALL_PROPERTIES: &str = "All Properties";

/// Group label for events without a marketing source.
pub const UNKNOWN_SOURCE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyFilter {
    All,
    Building(String),
}

impl PropertyFilter {
    /// Interpret a selector value. Empty and the sentinel both mean all.
    pub fn from_selection(selection: Option<&str>) -> Self {
        match selection.map(str::trim) {
            None | Some("") => Self::All,
            Some(s) if s == ALL_PROPERTIES => Self::All,
            Some(s) => Self::Building(s.to_string()),
        }
    }

    pub fn matches(&self, building_name: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Building(name) => building_name == Some(name.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_PROPERTIES,
            Self::Building(name) => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    Lead,
    Tour,
    Other,
}

/// Which `event_type` values count as leads and which as tours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalRules {
    pub lead_types: Vec<String>,
    pub tour_types: Vec<String>,
}

impl Default for SignalRules {
    fn default() -> Self {
        Self {
            lead_types: vec!["state".to_string()],
            tour_types: vec!["tour_attended".to_string(), "tour_booked".to_string()],
        }
    }
}

impl SignalRules {
    pub fn classify(&self, event_type: Option<&str>) -> EventCategory {
        let Some(event_type) = event_type else {
            return EventCategory::Other;
        };
        if self.lead_types.iter().any(|t| t == event_type) {
            EventCategory::Lead
        } else if self.tour_types.iter().any(|t| t == event_type) {
            EventCategory::Tour
        } else {
            EventCategory::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub source_name: String,
    pub leads: u64,
    pub tours: u64,
    pub other: u64,
    pub tour_ratio: String,
}

impl SourceSummary {
    pub fn total(&self) -> u64 {
        self.leads + self.tours + self.other
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildingSummary {
    /// Literal building name. `None` and `""` are separate groups.
    pub building_name: Option<String>,
    pub sources: Vec<SourceSummary>,
}

impl BuildingSummary {
    pub fn display_name(&self) -> &str {
        match self.building_name.as_deref() {
            None => "(no building)",
            Some("") => "(blank building)",
            Some(name) => name,
        }
    }

    pub fn total(&self) -> u64 {
        self.sources.iter().map(SourceSummary::total).sum()
    }
}

#[derive(Default)]
struct Counts {
    leads: u64,
    tours: u64,
    other: u64,
}

/// Group `rows` by building then source, counting leads, tours and the rest.
///
/// Buildings come out alphabetically (the null building first), sources
/// alphabetically within each building.
pub fn aggregate(
    rows: &[StoredEvent],
    filter: &PropertyFilter,
    rules: &SignalRules,
) -> Vec<BuildingSummary> {
    let mut groups: BTreeMap<Option<&str>, BTreeMap<&str, Counts>> = BTreeMap::new();

    for row in rows {
        let building = row.building_name.as_deref();
        if !filter.matches(building) {
            continue;
        }
        let source = match row.marketing_source.as_deref() {
            None | Some("") => UNKNOWN_SOURCE,
            Some(s) => s,
        };
        let counts = groups
            .entry(building)
            .or_default()
            .entry(source)
            .or_default();
        match rules.classify(row.event_type.as_deref()) {
            EventCategory::Lead => counts.leads += 1,
            EventCategory::Tour => counts.tours += 1,
            EventCategory::Other => counts.other += 1,
        }
    }

    groups
        .into_iter()
        .map(|(building, sources)| BuildingSummary {
            building_name: building.map(str::to_string),
            sources: sources
                .into_iter()
                .map(|(source, c)| SourceSummary {
                    source_name: source.to_string(),
                    leads: c.leads,
                    tours: c.tours,
                    other: c.other,
                    tour_ratio: tour_ratio(c.leads, c.tours),
                })
                .collect(),
        })
        .collect()
}

/// Tours per lead as a percentage with one decimal, e.g. "33.3%" or "50%".
pub fn tour_ratio(leads: u64, tours: u64) -> String {
    if leads == 0 {
        return "0%".to_string();
    }
    let pct = tours as f64 / leads as f64 * 100.0;
    let rounded = (pct * 10.0).round() / 10.0;
    format!("{rounded}%")
}
