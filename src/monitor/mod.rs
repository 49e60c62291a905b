pub mod pipeline;
pub mod schedule;
pub mod scheduler;

pub use pipeline::{CheckContext, CheckError, CheckOutcome, check_source, run_sweep};
pub use schedule::CheckSchedule;
pub use scheduler::{MonitorScheduler, MonitorStatus};
