//! Receptionist-side payloads: today's queues across doctors, and one
//! doctor's queue with its patient list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::appointment::DoctorRef;
use super::enums::QueueStatus;
use super::queue::QueueSnapshot;

/// One doctor's queue as listed on the receptionist dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSummary {
    #[serde(alias = "_id", alias = "queueId")]
    pub id: String,
    #[serde(default, alias = "doctorId")]
    pub doctor: Option<DoctorRef>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(flatten)]
    pub snapshot: QueueSnapshot,
}

impl QueueSummary {
    pub fn doctor_name(&self) -> Option<&str> {
        self.doctor.as_ref().and_then(|d| d.name.as_deref())
    }

    pub fn department(&self) -> Option<&str> {
        self.department
            .as_deref()
            .or_else(|| self.doctor.as_ref().and_then(|d| d.department.as_deref()))
    }
}

/// Day-level counters computed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DayStats {
    pub total_appointments: u32,
    pub waiting: u32,
    pub in_progress: u32,
    pub completed: u32,
    pub cancelled: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DepartmentStats {
    pub total: u32,
    pub waiting: u32,
    pub completed: u32,
}

/// `GET /api/appointment/today`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TodayQueues {
    pub queues: Vec<QueueSummary>,
    pub stats: DayStats,
    pub department_stats: BTreeMap<String, DepartmentStats>,
}

/// A patient entry inside a doctor's queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedPatient {
    #[serde(default, alias = "_id", alias = "appointmentId")]
    pub id: Option<String>,
    #[serde(default, alias = "patientName")]
    pub name: Option<String>,
    #[serde(default)]
    pub token_number: Option<u32>,
    #[serde(default)]
    pub status: Option<QueueStatus>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub time_slot: Option<String>,
}

/// `GET /api/appointment/queue/:queueId` body under `queue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueDetail {
    #[serde(alias = "_id", alias = "queueId")]
    pub id: String,
    #[serde(default, alias = "doctorId")]
    pub doctor: Option<DoctorRef>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub patients: Vec<QueuedPatient>,
    #[serde(flatten)]
    pub snapshot: QueueSnapshot,
}

impl QueueDetail {
    pub fn doctor_name(&self) -> Option<&str> {
        self.doctor.as_ref().and_then(|d| d.name.as_deref())
    }

    /// Patient whose token is being served.
    pub fn current_patient(&self) -> Option<&QueuedPatient> {
        let current = self.snapshot.current_token?;
        self.patients.iter().find(|p| p.token_number == Some(current))
    }
}
