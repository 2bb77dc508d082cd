use serde::{Deserialize, Serialize};

use super::enums::QueueStatus;

/// Server-computed display value: the backend sends wait times either as
/// minutes or as a preformatted string. The client never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 => write!(f, "{n:.0}"),
            Self::Number(n) => write!(f, "{n:.1}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// State of one queue as seen by one requester at one point in time.
///
/// Every field is optional because the pages tolerate partially filled
/// payloads; counts are not cross-validated on the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    /// The requester's own position. Immutable once assigned.
    #[serde(default)]
    pub token_number: Option<u32>,
    /// Token being served right now.
    #[serde(default)]
    pub current_token: Option<u32>,
    #[serde(default)]
    pub patients_ahead: Option<u32>,
    #[serde(default)]
    pub total_patients_in_queue: Option<u32>,
    #[serde(default)]
    pub completed_patients: Option<u32>,
    #[serde(default)]
    pub estimated_wait_time: Option<DisplayValue>,
    #[serde(default)]
    pub estimated_start_time: Option<DisplayValue>,
    #[serde(default)]
    pub average_consultation_time: Option<DisplayValue>,
    #[serde(default)]
    pub status: Option<QueueStatus>,
}

impl QueueSnapshot {
    /// Patients ahead of the requester. Falls back to the token gap when
    /// the server omits the field.
    pub fn patients_ahead(&self) -> Option<u32> {
        self.patients_ahead.or_else(|| {
            let token = self.token_number?;
            let current = self.current_token?;
            Some(token.saturating_sub(current).saturating_sub(1))
        })
    }

    pub fn waiting_patients(&self) -> Option<u32> {
        let total = self.total_patients_in_queue?;
        Some(total.saturating_sub(self.completed_patients.unwrap_or(0)))
    }
}
