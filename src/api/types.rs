//! Response envelopes for the hospital REST backend.

use serde::Deserialize;

use crate::models::{AppointmentView, QueueDetail};

/// Error body shape: `{ "message": "..." }` (some routes use `error`).
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Extract the server message from a raw body, if it is JSON.
    pub fn message_from(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed.message.or(parsed.error)
    }
}

/// `GET /api/appointment/get-all-appoinement-patient`
#[derive(Debug, Deserialize)]
pub struct AppointmentsEnvelope {
    #[serde(default)]
    pub appointments: Vec<AppointmentView>,
}

/// `GET /api/appointment/get-appoinement-detail-patient/:id`
#[derive(Debug, Deserialize)]
pub struct AppointmentEnvelope {
    pub appointment: AppointmentView,
}

/// `GET /api/appointment/queue/:queueId`
#[derive(Debug, Deserialize)]
pub struct QueueEnvelope {
    pub queue: QueueDetail,
}
