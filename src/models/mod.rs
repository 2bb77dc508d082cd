pub mod appointment;
pub mod dashboard;
pub mod enums;
pub mod history;
pub mod queue;

pub use appointment::{parse_calendar_date, AppointmentView, DoctorRef};
pub use dashboard::{DayStats, DepartmentStats, QueueDetail, QueueSummary, QueuedPatient, TodayQueues};
pub use enums::QueueStatus;
pub use history::HistoryEntry;
pub use queue::{DisplayValue, QueueSnapshot};
