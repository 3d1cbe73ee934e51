//! Detailed log ordering.
//!
//! The sort state is a plain value owned by the caller and passed in on
//! every call, so two views can sort the same events differently.

use serde::{Deserialize, Serialize};

use crate::model::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortColumn {
    /// Full start timestamp.
    Start,
    /// Local start date only; same-day events keep their relative order.
    Date,
    /// Category name.
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub ascending: bool,
}

impl Default for SortState {
    /// Newest first.
    fn default() -> Self {
        Self {
            column: SortColumn::Start,
            ascending: false,
        }
    }
}

impl SortState {
    /// Clicking the active column flips direction; another column starts ascending.
    pub fn toggle(self, column: SortColumn) -> Self {
        if self.column == column {
            Self {
                column,
                ascending: !self.ascending,
            }
        } else {
            Self {
                column,
                ascending: true,
            }
        }
    }
}

/// Events ordered for the log table. The sort is stable in both
/// directions, so ties keep their input order.
pub fn sorted_log<'a>(events: &'a [Event], sort: &SortState) -> Vec<&'a Event> {
    let mut rows: Vec<&Event> = events.iter().collect();
    rows.sort_by(|a, b| {
        let ord = match sort.column {
            SortColumn::Start => a.start.cmp(&b.start),
            SortColumn::Date => a.date().cmp(&b.date()),
            SortColumn::Name => a.category.cmp(&b.category),
        };
        if sort.ascending { ord } else { ord.reverse() }
    });
    rows
}
