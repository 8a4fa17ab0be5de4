use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResourceStatus {
    #[default]
    Available,
    Deployed,
    Returning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ZoneStatus {
    #[default]
    Active,
    Processing,
    Resolved,
}

fn default_speed_kmh() -> f64 {
    60.0
}

/// 可調度的救援單位 (救護車、直升機、救援隊...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: Location,
    pub capacity: i64,
    #[serde(default)]
    pub status: ResourceStatus,
    #[serde(default)]
    pub specialization: Vec<String>,
    #[serde(default = "default_speed_kmh")]
    pub speed_kmh: f64,
}

impl Resource {
    pub fn is_available(&self) -> bool {
        self.status == ResourceStatus::Available
    }

    pub fn has_specialization(&self, tag: &str) -> bool {
        self.specialization.iter().any(|s| s == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterZone {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: i32,
    pub location: Location,
    pub affected_population: i64,
    pub vulnerability_score: f64,
    #[serde(default)]
    pub status: ZoneStatus,
}

impl DisasterZone {
    /// 排序用的優先度: severity * vulnerability
    pub fn priority(&self) -> f64 {
        self.severity as f64 * self.vulnerability_score
    }

    /// 每千名受災人口需要一個單位，至少一個
    pub fn needed_resources(&self) -> usize {
        let per_thousand = self.affected_population.max(0) / 1000;
        (per_thousand as usize).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub resource_id: String,
    pub zone_id: String,
    pub eta_minutes: f64,
    pub distance_km: f64,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub allocations: Vec<Allocation>,
    pub unallocated_resources: Vec<String>,
    pub unserved_zones: Vec<String>,
    pub total_score: f64,
    pub computation_time_ms: f64,
    #[serde(default, alias = "ai_rationale", skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl Plan {
    /// 回傳附上說明文字的新 Plan
    pub fn with_rationale(self, rationale: impl Into<String>) -> Self {
        Self {
            rationale: Some(rationale.into()),
            ..self
        }
    }

    pub fn allocations_for_zone<'a>(&'a self, zone_id: &'a str) -> impl Iterator<Item = &'a Allocation> + 'a {
        self.allocations.iter().filter(move |a| a.zone_id == zone_id)
    }
}

/// 快照檔案格式: `{ "resources": [...], "zones": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub zones: Vec<DisasterZone>,
}
