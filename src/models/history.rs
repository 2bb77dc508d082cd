use serde::{Deserialize, Serialize};

use super::appointment::DoctorRef;

/// A past encounter shown in the patient's medical history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default, alias = "visitDate")]
    pub date: Option<String>,
    #[serde(default, alias = "doctorId")]
    pub doctor: Option<DoctorRef>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
