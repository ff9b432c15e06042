//! Shift slots, staff assignment and availability for multi-service clinic
//! bookings.

pub mod config;
pub mod errors;
pub mod models;
pub mod schedule;
pub mod service;
pub mod store;

pub use config::SchedulingConfig;
pub use errors::{ScheduleError, ScheduleResult};
pub use service::Scheduler;
pub use store::SchedulingStore;
