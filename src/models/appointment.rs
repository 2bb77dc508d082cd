use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::queue::QueueSnapshot;

/// Doctor as embedded in appointment payloads (populated reference).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRef {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "specialization")]
    pub department: Option<String>,
}

/// A patient's appointment together with its queue position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    /// Opaque id; addresses the detail endpoint.
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, alias = "doctorId")]
    pub doctor: Option<DoctorRef>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    /// ISO date or datetime as sent by the server.
    #[serde(default, alias = "appointmentDate")]
    pub date: Option<String>,
    #[serde(default)]
    pub time_slot: Option<String>,
    #[serde(flatten)]
    pub queue: QueueSnapshot,
}

impl AppointmentView {
    pub fn doctor_name(&self) -> Option<&str> {
        self.doctor.as_ref().and_then(|d| d.name.as_deref())
    }

    /// Appointment department, falling back to the doctor's.
    pub fn department(&self) -> Option<&str> {
        self.department
            .as_deref()
            .or_else(|| self.doctor.as_ref().and_then(|d| d.department.as_deref()))
    }

    pub fn calendar_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_calendar_date)
    }
}

/// Accepts `YYYY-MM-DD` or any ISO-8601 datetime starting with it.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
