pub mod compatibility;
pub mod dispatch;
pub mod engine;
pub mod geo;
pub mod rationale;
pub mod scoring;

pub use crate::domain::model::{Allocation, DisasterZone, Location, Plan, Resource};
pub use crate::domain::ports::{RationaleProvider, SnapshotStore};
pub use crate::utils::error::Result;
