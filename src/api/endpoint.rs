use serde::Serialize;

/// Read endpoints consumed by the queue pages. Path spellings follow the
/// backend's routes exactly, typos included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Endpoint {
    PatientAppointments,
    PatientAppointmentDetail(String),
    TodayQueues,
    QueueDetail(String),
}

impl Endpoint {
    /// Path segments below the base URL. Ids are kept as single segments
    /// so the URL builder escapes them.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::PatientAppointments => {
                vec!["api", "appointment", "get-all-appoinement-patient"]
            }
            Self::PatientAppointmentDetail(id) => {
                vec!["api", "appointment", "get-appoinement-detail-patient", id.as_str()]
            }
            Self::TodayQueues => vec!["api", "appointment", "today"],
            Self::QueueDetail(id) => vec!["api", "appointment", "queue", id.as_str()],
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GET {}", self.path())
    }
}
