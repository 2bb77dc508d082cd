use crate::models::{AppointmentView, HistoryEntry, QueueSummary, QueuedPatient};

/// Fields a search box matches against.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for AppointmentView {
    fn search_fields(&self) -> Vec<&str> {
        [self.doctor_name(), self.department(), self.reason.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl Searchable for QueueSummary {
    fn search_fields(&self) -> Vec<&str> {
        [self.doctor_name(), self.department()].into_iter().flatten().collect()
    }
}

impl Searchable for QueuedPatient {
    fn search_fields(&self) -> Vec<&str> {
        [self.name.as_deref(), self.reason.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl Searchable for HistoryEntry {
    fn search_fields(&self) -> Vec<&str> {
        [
            self.doctor.as_ref().and_then(|d| d.name.as_deref()),
            self.doctor.as_ref().and_then(|d| d.department.as_deref()),
            self.diagnosis.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Case-insensitive substring filter. A blank query returns every item in
/// input order.
pub fn filter_by_query<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DoctorRef, QueueSnapshot};

    fn appt(id: &str, doctor: &str, department: &str, reason: &str) -> AppointmentView {
        AppointmentView {
            id: id.into(),
            doctor: Some(DoctorRef {
                id: None,
                name: Some(doctor.into()),
                department: None,
            }),
            department: Some(department.into()),
            reason: Some(reason.into()),
            date: None,
            time_slot: None,
            queue: QueueSnapshot::default(),
        }
    }

    fn sample() -> Vec<AppointmentView> {
        vec![
            appt("1", "Dr. Rao", "Cardiology", "Chest pain"),
            appt("2", "Dr. Mehta", "Orthopedics", "Knee injury"),
            appt("3", "Dr. Iyer", "Cardiology", "Follow-up"),
        ]
    }

    fn ids(found: &[&AppointmentView]) -> Vec<String> {
        found.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn empty_query_is_identity() {
        let items = sample();
        assert_eq!(ids(&filter_by_query(&items, "")), vec!["1", "2", "3"]);
    }

    #[test]
    fn whitespace_query_is_identity() {
        let items = sample();
        assert_eq!(filter_by_query(&items, "   ").len(), 3);
    }

    #[test]
    fn matches_department_case_insensitively() {
        let items = sample();
        assert_eq!(ids(&filter_by_query(&items, "CARDIO")), vec!["1", "3"]);
    }

    #[test]
    fn matches_doctor_and_reason() {
        let items = sample();
        assert_eq!(ids(&filter_by_query(&items, "mehta")), vec!["2"]);
        assert_eq!(ids(&filter_by_query(&items, "follow")), vec!["3"]);
    }

    #[test]
    fn no_match() {
        let items = sample();
        assert!(filter_by_query(&items, "dermatology").is_empty());
    }
}
