pub mod entry;
pub mod event;
pub mod fee_schedule;
pub mod performance_type;

pub use entry::{DEFAULT_MASTERY, EventEntry, EventEntryRow};
pub use event::Event;
pub use fee_schedule::FeeSchedule;
pub use performance_type::PerformanceType;
