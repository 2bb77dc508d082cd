//! Pure derivations recomputed from the current snapshot on every render.

pub mod badge;
pub mod grouping;
pub mod progress;
pub mod queue;
pub mod search;

pub use badge::{badge_for, Badge, TurnFlags};
pub use grouping::{group_by_month, month_label, Dated, MonthGroup, UNDATED_LABEL};
pub use progress::{completion_percentage, progress_percentage, snapshot_progress};
pub use queue::{
    filter_by_status, has_same_day_entry, is_current_patient, is_my_turn, patient_badge,
    snapshot_badge, todays_appointments,
};
pub use search::{filter_by_query, Searchable};
