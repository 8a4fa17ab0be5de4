use crate::domain::model::{DisasterZone, Location, Plan};
use crate::domain::ports::RationaleProvider;
use std::sync::Arc;
use std::time::Duration;

/// 沒有設定摘要服務時使用
pub const RATIONALE_UNCONFIGURED: &str =
    "AI Optimization: Allocations prioritized based on severity and Haversine proximity.";

/// 摘要服務失敗或逾時時使用
pub const RATIONALE_FALLBACK: &str =
    "Plan generated using heuristic proximity logic (AI Unavailable).";

pub const COMMANDER_PROMPT: &str = "You are a Strategic Commander. Briefly justify this allocation plan based on the Proximity and Severity strategy. If there are deficits, SUGGEST specifically which resource types need to be acquired. Use military brevity. Max 3 sentences.";

const MAX_DEFICITS: usize = 5;
const MAX_UNSERVED_SAMPLE: usize = 10;

/// 單一災區的需求與實際派遣數
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneDemand {
    pub zone_id: String,
    pub kind: String,
    pub severity: i32,
    pub location: Location,
    pub needed: usize,
    pub assigned: usize,
}

impl ZoneDemand {
    pub fn new(zone: &DisasterZone, assigned: usize) -> Self {
        Self {
            zone_id: zone.id.clone(),
            kind: zone.kind.clone(),
            severity: zone.severity,
            location: zone.location,
            needed: zone.needed_resources(),
            assigned,
        }
    }

    pub fn shortfall(&self) -> usize {
        self.needed.saturating_sub(self.assigned)
    }
}

/// 交給摘要服務的精簡計畫內容
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub total_allocated: usize,
    pub total_needed: usize,
    /// 依缺口由大到小，同缺口維持優先順序
    pub deficits: Vec<ZoneDemand>,
    pub unserved: Vec<String>,
}

impl PlanSummary {
    /// `demands` 必須依災區優先順序排列
    pub fn new(plan: &Plan, demands: &[ZoneDemand]) -> Self {
        let mut deficits: Vec<ZoneDemand> = demands
            .iter()
            .filter(|d| d.shortfall() > 0)
            .cloned()
            .collect();
        deficits.sort_by(|a, b| b.shortfall().cmp(&a.shortfall()));

        Self {
            total_allocated: plan.allocations.len(),
            total_needed: demands.iter().map(|d| d.needed).sum(),
            deficits,
            unserved: plan.unserved_zones.clone(),
        }
    }

    pub fn render(&self) -> String {
        let mut summary = format!(
            "Plan Analysis: Allocated {} resources against a total requirement of {}. ",
            self.total_allocated, self.total_needed
        );
        summary.push_str(
            "Strategy Used: Resources matched based on Severity, Urgency, and Proximity (Haversine). ",
        );

        if self.deficits.is_empty() {
            summary.push_str("All zones have sufficient minimum coverage. ");
        } else {
            let top: Vec<String> = self
                .deficits
                .iter()
                .take(MAX_DEFICITS)
                .map(|d| {
                    format!(
                        "{} (Sev:{}) in {:.1},{:.1} needs {} more units",
                        d.kind,
                        d.severity,
                        d.location.lat,
                        d.location.lng,
                        d.shortfall()
                    )
                })
                .collect();
            summary.push_str(&format!("CRITICAL DEFICITS: {}. ", top.join("; ")));
            if self.deficits.len() > MAX_DEFICITS {
                summary.push_str(&format!(
                    "And {} other zones short. ",
                    self.deficits.len() - MAX_DEFICITS
                ));
            }
        }

        summary.push_str(&format!("Total Unserved Zones: {}. ", self.unserved.len()));
        if self.unserved.len() > MAX_UNSERVED_SAMPLE {
            summary.push_str(&format!(
                "Sample Unserved IDs: {}...",
                self.unserved[..MAX_UNSERVED_SAMPLE].join(", ")
            ));
        } else if !self.unserved.is_empty() {
            summary.push_str(&format!("Unserved: {}.", self.unserved.join(", ")));
        }

        summary
    }
}

/// 產生計畫說明。服務缺席或失敗都不會影響數值結果。
#[derive(Clone)]
pub struct RationaleGenerator {
    provider: Option<Arc<dyn RationaleProvider>>,
    timeout: Duration,
}

impl RationaleGenerator {
    pub fn new(provider: Option<Arc<dyn RationaleProvider>>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn disabled() -> Self {
        Self::new(None, Duration::from_secs(15))
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn generate(&self, summary: &PlanSummary) -> String {
        let Some(provider) = &self.provider else {
            return RATIONALE_UNCONFIGURED.to_string();
        };

        let context = summary.render();
        tracing::debug!("Requesting plan rationale ({} chars of context)", context.len());

        match tokio::time::timeout(self.timeout, provider.summarize(COMMANDER_PROMPT, &context)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(Ok(_)) => {
                tracing::warn!("⚠️ Rationale provider returned an empty reply, using fallback");
                RATIONALE_FALLBACK.to_string()
            }
            Ok(Err(e)) => {
                tracing::warn!("⚠️ Rationale provider failed: {}", e);
                RATIONALE_FALLBACK.to_string()
            }
            Err(_) => {
                tracing::warn!("⚠️ Rationale provider timed out after {:?}", self.timeout);
                RATIONALE_FALLBACK.to_string()
            }
        }
    }
}

impl Default for RationaleGenerator {
    fn default() -> Self {
        RationaleGenerator::disabled()
    }
}

impl std::fmt::Debug for RationaleGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RationaleGenerator")
            .field("configured", &self.is_configured())
            .field("timeout", &self.timeout)
            .finish()
    }
}
