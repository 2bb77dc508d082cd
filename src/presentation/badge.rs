use serde::Serialize;

use crate::models::QueueStatus;

/// Per-row flags that outrank the plain status colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnFlags {
    /// Patient view: the requester's token is being served.
    pub is_my_turn: bool,
    /// Receptionist view: this row is the patient being served.
    pub is_current_patient: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Scheduled,
    Waiting,
    InProgress,
    Completed,
    Cancelled,
    MyTurn,
    CurrentPatient,
    Neutral,
}

impl Badge {
    pub fn class(self) -> &'static str {
        match self {
            Self::Scheduled => "bg-blue-100 text-blue-800",
            Self::Waiting => "bg-yellow-100 text-yellow-800",
            Self::InProgress => "bg-purple-100 text-purple-800",
            Self::Completed => "bg-green-100 text-green-800",
            Self::Cancelled => "bg-red-100 text-red-800",
            Self::MyTurn => "bg-green-500 text-white",
            Self::CurrentPatient => "bg-indigo-500 text-white",
            Self::Neutral => "bg-gray-100 text-gray-800",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Waiting => "Waiting",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::MyTurn => "Your Turn",
            Self::CurrentPatient => "Now Serving",
            Self::Neutral => "Unknown",
        }
    }

    /// Progress bar pulses while the visit is live.
    pub fn animates_progress(self) -> bool {
        matches!(self, Self::InProgress | Self::MyTurn | Self::CurrentPatient)
    }
}

/// Total mapping from status (plus turn flags) to a badge. Missing or
/// unrecognised statuses get the neutral badge. Flags do not override a
/// finished or cancelled visit.
pub fn badge_for(status: Option<&QueueStatus>, flags: TurnFlags) -> Badge {
    let finished = matches!(status, Some(QueueStatus::Completed | QueueStatus::Cancelled));
    if !finished {
        if flags.is_my_turn {
            return Badge::MyTurn;
        }
        if flags.is_current_patient {
            return Badge::CurrentPatient;
        }
    }
    match status {
        Some(QueueStatus::Scheduled) => Badge::Scheduled,
        Some(QueueStatus::Waiting) => Badge::Waiting,
        Some(QueueStatus::InProgress) => Badge::InProgress,
        Some(QueueStatus::Completed) => Badge::Completed,
        Some(QueueStatus::Cancelled) => Badge::Cancelled,
        Some(QueueStatus::Other(_)) | None => Badge::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses() {
        let none = TurnFlags::default();
        assert_eq!(badge_for(Some(&QueueStatus::Scheduled), none), Badge::Scheduled);
        assert_eq!(badge_for(Some(&QueueStatus::InProgress), none), Badge::InProgress);
        assert_eq!(badge_for(Some(&QueueStatus::Completed), none), Badge::Completed);
        assert_eq!(badge_for(Some(&QueueStatus::Cancelled), none), Badge::Cancelled);
    }

    #[test]
    fn unknown_status_is_neutral() {
        let archived = QueueStatus::parse("archived");
        let badge = badge_for(Some(&archived), TurnFlags::default());
        assert_eq!(badge, Badge::Neutral);
        assert_eq!(badge.class(), "bg-gray-100 text-gray-800");
        assert_eq!(badge_for(None, TurnFlags::default()), Badge::Neutral);
    }

    #[test]
    fn my_turn_outranks_status() {
        let flags = TurnFlags {
            is_my_turn: true,
            ..Default::default()
        };
        assert_eq!(badge_for(Some(&QueueStatus::InProgress), flags), Badge::MyTurn);
        assert!(Badge::MyTurn.animates_progress());
    }

    #[test]
    fn flags_ignored_once_finished() {
        let flags = TurnFlags {
            is_my_turn: true,
            is_current_patient: true,
        };
        assert_eq!(badge_for(Some(&QueueStatus::Completed), flags), Badge::Completed);
        assert_eq!(badge_for(Some(&QueueStatus::Cancelled), flags), Badge::Cancelled);
    }

    #[test]
    fn current_patient_flag() {
        let flags = TurnFlags {
            is_current_patient: true,
            ..Default::default()
        };
        assert_eq!(badge_for(Some(&QueueStatus::Waiting), flags), Badge::CurrentPatient);
    }
}
