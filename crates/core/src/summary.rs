use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Event;

/// Time spent on one category/color pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySlice {
    pub category: String,
    pub color: String,
    pub hours: f64,
    /// Share of the summary total, `0.0..=100.0`.
    pub percent: f64,
    pub count: usize,
}

impl SummarySlice {
    /// `"37.5% (3.00h)"`.
    pub fn label(&self) -> String {
        format!("{:.1}% ({:.2}h)", self.percent, self.hours)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub slices: Vec<SummarySlice>,
    pub total_hours: f64,
}

impl Summary {
    /// `"Total: 8.00 hrs"`.
    pub fn title(&self) -> String {
        format!("Total: {:.2} hrs", self.total_hours)
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Aggregate durations per `(category, color)`, ordered by category then color.
///
/// Percentages are of the summed durations. Zero-length events count toward
/// `count` but add no hours.
pub fn summarize(events: &[Event]) -> Summary {
    let mut by_key: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
    for event in events {
        let entry = by_key
            .entry((event.category.as_str(), event.color.as_str()))
            .or_insert((0.0, 0));
        entry.0 += event.duration_hours().max(0.0);
        entry.1 += 1;
    }

    let total_hours: f64 = by_key.values().map(|(hours, _)| hours).sum();
    let slices = by_key
        .into_iter()
        .map(|((category, color), (hours, count))| SummarySlice {
            category: category.to_string(),
            color: color.to_string(),
            hours,
            percent: if total_hours > 0.0 {
                hours / total_hours * 100.0
            } else {
                0.0
            },
            count,
        })
        .collect();

    Summary {
        slices,
        total_hours,
    }
}
