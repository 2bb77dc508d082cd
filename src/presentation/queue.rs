//! Queue-specific derivations shared by the patient and receptionist pages.

use chrono::NaiveDate;

use super::badge::{badge_for, Badge, TurnFlags};
use crate::models::{AppointmentView, QueueDetail, QueueSnapshot, QueueStatus, QueueSummary, QueuedPatient};

/// The requester's token is the one being served.
pub fn is_my_turn(snapshot: &QueueSnapshot) -> bool {
    let active = snapshot.status.as_ref().map_or(true, QueueStatus::is_active);
    active
        && matches!(
            (snapshot.token_number, snapshot.current_token),
            (Some(mine), Some(current)) if mine == current
        )
}

pub fn is_current_patient(detail: &QueueDetail, patient: &QueuedPatient) -> bool {
    matches!(
        (patient.token_number, detail.snapshot.current_token),
        (Some(token), Some(current)) if token == current
    )
}

pub fn snapshot_badge(snapshot: &QueueSnapshot) -> Badge {
    badge_for(
        snapshot.status.as_ref(),
        TurnFlags {
            is_my_turn: is_my_turn(snapshot),
            is_current_patient: false,
        },
    )
}

pub fn patient_badge(detail: &QueueDetail, patient: &QueuedPatient) -> Badge {
    badge_for(
        patient.status.as_ref(),
        TurnFlags {
            is_my_turn: false,
            is_current_patient: is_current_patient(detail, patient),
        },
    )
}

/// Appointments booked for `today`, in server order.
pub fn todays_appointments(appointments: &[AppointmentView], today: NaiveDate) -> Vec<&AppointmentView> {
    appointments
        .iter()
        .filter(|a| a.calendar_date() == Some(today))
        .collect()
}

/// Whether the patient list should keep polling: a same-day appointment
/// that is still active.
pub fn has_same_day_entry(appointments: &[AppointmentView], today: NaiveDate) -> bool {
    todays_appointments(appointments, today)
        .into_iter()
        .any(|a| a.queue.status.as_ref().map_or(true, QueueStatus::is_active))
}

/// Receptionist status filter. `None` keeps everything.
pub fn filter_by_status<'a>(queues: &'a [QueueSummary], status: Option<&QueueStatus>) -> Vec<&'a QueueSummary> {
    queues
        .iter()
        .filter(|q| status.map_or(true, |s| q.snapshot.status.as_ref() == Some(s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appt(id: &str, date: &str, status: Option<QueueStatus>) -> AppointmentView {
        AppointmentView {
            id: id.into(),
            doctor: None,
            department: None,
            reason: None,
            date: Some(date.into()),
            time_slot: None,
            queue: QueueSnapshot {
                status,
                ..Default::default()
            },
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn my_turn_when_tokens_match() {
        let snapshot = QueueSnapshot {
            token_number: Some(12),
            current_token: Some(12),
            status: Some(QueueStatus::InProgress),
            ..Default::default()
        };
        assert!(is_my_turn(&snapshot));
        assert_eq!(snapshot_badge(&snapshot), Badge::MyTurn);
    }

    #[test]
    fn not_my_turn_after_completion() {
        let snapshot = QueueSnapshot {
            token_number: Some(12),
            current_token: Some(12),
            status: Some(QueueStatus::Completed),
            ..Default::default()
        };
        assert!(!is_my_turn(&snapshot));
        assert_eq!(snapshot_badge(&snapshot), Badge::Completed);
    }

    #[test]
    fn same_day_active_entry() {
        let list = vec![
            appt("old", "2024-03-01", Some(QueueStatus::Completed)),
            appt("today", "2024-03-10T09:00:00Z", Some(QueueStatus::Scheduled)),
        ];
        assert!(has_same_day_entry(&list, today()));
        assert_eq!(todays_appointments(&list, today()).len(), 1);
    }

    #[test]
    fn same_day_but_finished_does_not_poll() {
        let list = vec![appt("today", "2024-03-10", Some(QueueStatus::Cancelled))];
        assert!(!has_same_day_entry(&list, today()));
    }

    #[test]
    fn no_entries() {
        assert!(!has_same_day_entry(&[], today()));
    }

    #[test]
    fn status_filter() {
        let queues: Vec<QueueSummary> = serde_json::from_str(
            r#"[
                { "_id": "q1", "status": "in-progress" },
                { "_id": "q2", "status": "completed" },
                { "_id": "q3", "status": "in-progress" }
            ]"#,
        )
        .unwrap();
        let live = filter_by_status(&queues, Some(&QueueStatus::InProgress));
        assert_eq!(live.iter().map(|q| q.id.as_str()).collect::<Vec<_>>(), vec!["q1", "q3"]);
        assert_eq!(filter_by_status(&queues, None).len(), 3);
    }

    #[test]
    fn current_patient_badge() {
        let detail: QueueDetail = serde_json::from_str(
            r#"{ "_id": "q1", "currentToken": 2,
                 "patients": [ { "tokenNumber": 2, "status": "in-progress" }, { "tokenNumber": 3, "status": "waiting" } ] }"#,
        )
        .unwrap();
        assert_eq!(patient_badge(&detail, &detail.patients[0]), Badge::CurrentPatient);
        assert_eq!(patient_badge(&detail, &detail.patients[1]), Badge::Waiting);
    }
}
