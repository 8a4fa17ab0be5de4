use crate::domain::model::{Plan, ResourceStatus, ZoneStatus};
use crate::domain::ports::SnapshotStore;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub deployed_count: usize,
    pub zones_processing: Vec<String>,
    pub missing_resources: Vec<String>,
    pub dispatched_at: DateTime<Utc>,
}

impl DispatchReport {
    pub fn message(&self) -> String {
        format!(
            "Dispatched {} teams. Status updated to 'Deployed'. {} zones updated to 'Processing'.",
            self.deployed_count,
            self.zones_processing.len()
        )
    }
}

/// 執行計畫: 更新資源與災區狀態
pub struct Dispatcher<'a, S: SnapshotStore> {
    store: &'a S,
}

impl<'a, S: SnapshotStore> Dispatcher<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn dispatch(&self, plan: &Plan) -> Result<DispatchReport> {
        let mut deployed_count = 0;
        let mut missing_resources = Vec::new();

        for allocation in &plan.allocations {
            if self
                .store
                .set_resource_status(&allocation.resource_id, ResourceStatus::Deployed)
                .await?
            {
                deployed_count += 1;
            } else {
                tracing::warn!(
                    "⚠️ Resource {} not found in store, skipping",
                    allocation.resource_id
                );
                missing_resources.push(allocation.resource_id.clone());
            }
        }

        // 每個災區只更新一次
        let mut seen = HashSet::new();
        let mut zones_processing = Vec::new();
        for allocation in &plan.allocations {
            if !seen.insert(allocation.zone_id.as_str()) {
                continue;
            }
            if self
                .store
                .set_zone_status(&allocation.zone_id, ZoneStatus::Processing)
                .await?
            {
                zones_processing.push(allocation.zone_id.clone());
            }
        }

        let report = DispatchReport {
            deployed_count,
            zones_processing,
            missing_resources,
            dispatched_at: Utc::now(),
        };
        tracing::info!("📡 {}", report.message());

        Ok(report)
    }
}
