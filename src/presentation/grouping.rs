use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{parse_calendar_date, AppointmentView, HistoryEntry};

/// Label for records whose date is missing or unparseable.
pub const UNDATED_LABEL: &str = "Undated";

pub trait Dated {
    fn calendar_date(&self) -> Option<NaiveDate>;
}

impl Dated for AppointmentView {
    fn calendar_date(&self) -> Option<NaiveDate> {
        AppointmentView::calendar_date(self)
    }
}

impl Dated for HistoryEntry {
    fn calendar_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_calendar_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGroup<'a, T> {
    /// e.g. "January 2024"
    pub label: String,
    pub items: Vec<&'a T>,
}

pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Bucket records by month-year. Groups appear in order of their first
/// record and records keep the order the server sent them in.
pub fn group_by_month<T: Dated>(items: &[T]) -> Vec<MonthGroup<'_, T>> {
    let mut groups: Vec<MonthGroup<'_, T>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let label = item
            .calendar_date()
            .map(month_label)
            .unwrap_or_else(|| UNDATED_LABEL.to_string());
        match index.get(&label) {
            Some(&i) => groups[i].items.push(item),
            None => {
                index.insert(label.clone(), groups.len());
                groups.push(MonthGroup {
                    label,
                    items: vec![item],
                });
            }
        }
    }
    groups
}
