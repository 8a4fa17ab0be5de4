use crate::domain::model::{DisasterZone, Resource};
use serde::{Deserialize, Serialize};

/// 多目標評分的權重。建構後固定不變。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub w_severity: f64,
    pub w_urgency: f64,
    pub w_proximity: f64,
    pub medical_bonus: f64,
    pub medical_vulnerability_threshold: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            w_severity: 0.3,
            w_urgency: 0.2,
            w_proximity: 0.8,
            medical_bonus: 0.2,
            medical_vulnerability_threshold: 0.7,
        }
    }
}

/// 只用於同一個災區內的候選排序，不同災區之間的分數不可比較
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, resource: &Resource, zone: &DisasterZone, distance_km: f64) -> f64 {
        let w = &self.weights;

        let severity_score = zone.severity as f64 / 10.0;
        let urgency_score = zone.vulnerability_score;
        // 每 10 公里衰減，距離越近越接近 1
        let proximity_score = 1.0 / (1.0 + distance_km / 10.0);

        let bonus = if resource.has_specialization("Medical")
            && zone.vulnerability_score > w.medical_vulnerability_threshold
        {
            w.medical_bonus
        } else {
            0.0
        };

        w.w_severity * severity_score
            + w.w_urgency * urgency_score
            + w.w_proximity * proximity_score
            + bonus
    }
}
