pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::EngineConfig;

pub use adapters::{GroqClient, InMemoryStore, JsonFileStore};
pub use crate::core::{
    compatibility::{CompatibilityMatcher, CompatibilityTable, DisasterKind},
    dispatch::{DispatchReport, Dispatcher},
    engine::AllocationEngine,
    rationale::{RationaleGenerator, RATIONALE_FALLBACK, RATIONALE_UNCONFIGURED},
    scoring::{Scorer, ScoringWeights},
};
pub use domain::model::{
    Allocation, DisasterZone, Location, Plan, Resource, ResourceStatus, Snapshot, ZoneStatus,
};
pub use domain::ports::{RationaleProvider, SnapshotStore};
pub use utils::error::{AllocError, Result};
