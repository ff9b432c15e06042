//! The slot-allocation engine.
//!
//! Everything here is pure: functions read a [`snapshot::DaySnapshot`] and
//! return plans or reports. Persisting a plan is the store's job.

pub mod availability;
pub mod engine;
pub mod finder;
pub mod generator;
pub mod matcher;
pub mod plan;
pub mod reassign;
pub mod rules;
pub mod search;
pub mod snapshot;
pub mod timeline;
