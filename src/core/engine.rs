use crate::core::compatibility::CompatibilityMatcher;
use crate::core::geo::{haversine_km, round_to};
use crate::core::rationale::{PlanSummary, RationaleGenerator, ZoneDemand};
use crate::core::scoring::Scorer;
use crate::domain::model::{Allocation, DisasterZone, Plan, Resource};
use std::collections::HashSet;
use std::time::Instant;

struct Candidate<'a> {
    resource: &'a Resource,
    distance_km: f64,
    score: f64,
}

/// 貪婪式資源分配引擎
///
/// 1. 災區依 `severity * vulnerability_score` 由高到低排序
/// 2. 每個災區從尚未指派的可用資源中挑出相容者並評分
/// 3. 依分數由高到低指派，直到滿足需求量或候選耗盡
///
/// 不做回溯: 已處理的災區不會因後面的災區而重新分配。
#[derive(Debug, Clone, Default)]
pub struct AllocationEngine {
    matcher: CompatibilityMatcher,
    scorer: Scorer,
    rationale: RationaleGenerator,
}

impl AllocationEngine {
    pub fn new(matcher: CompatibilityMatcher, scorer: Scorer) -> Self {
        Self {
            matcher,
            scorer,
            rationale: RationaleGenerator::disabled(),
        }
    }

    pub fn with_rationale(mut self, rationale: RationaleGenerator) -> Self {
        self.rationale = rationale;
        self
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// 只計算數值計畫，`rationale` 為 None
    pub fn allocate(&self, resources: &[Resource], zones: &[DisasterZone]) -> Plan {
        self.run_pass(resources, zones).0
    }

    /// 計算計畫並附上說明文字。說明服務失敗時使用固定字串。
    pub async fn allocate_with_rationale(
        &self,
        resources: &[Resource],
        zones: &[DisasterZone],
    ) -> Plan {
        let (plan, demands) = self.run_pass(resources, zones);
        let summary = PlanSummary::new(&plan, &demands);
        let rationale = self.rationale.generate(&summary).await;
        plan.with_rationale(rationale)
    }

    fn run_pass(&self, resources: &[Resource], zones: &[DisasterZone]) -> (Plan, Vec<ZoneDemand>) {
        let start = Instant::now();

        let available: Vec<&Resource> = resources
            .iter()
            .filter(|r| r.is_available())
            .filter(|r| {
                let usable = r.speed_kmh.is_finite() && r.speed_kmh > 0.0;
                if !usable {
                    tracing::warn!(
                        "⚠️ Skipping resource {} ({}): invalid speed {} km/h",
                        r.id,
                        r.kind,
                        r.speed_kmh
                    );
                }
                usable
            })
            .filter(|r| {
                let located = r.location.is_finite();
                if !located {
                    tracing::warn!(
                        "⚠️ Skipping resource {} ({}): invalid location {:?}",
                        r.id,
                        r.kind,
                        r.location
                    );
                }
                located
            })
            .collect();

        // sort_by 是穩定排序，同分維持輸入順序
        let mut ordered: Vec<&DisasterZone> = zones.iter().collect();
        ordered.sort_by(|a, b| b.priority().total_cmp(&a.priority()));

        tracing::info!(
            "🚑 Allocating {} available resources across {} zones",
            available.len(),
            ordered.len()
        );

        let mut committed: HashSet<&str> = HashSet::new();
        let mut allocations = Vec::new();
        let mut demands = Vec::with_capacity(ordered.len());
        let mut total_score = 0.0;

        for zone in ordered {
            let located = zone.location.is_finite();
            if !located {
                tracing::warn!(
                    "⚠️ Zone {} ({}) has invalid location {:?}, leaving unserved",
                    zone.id,
                    zone.kind,
                    zone.location
                );
            }

            let mut candidates: Vec<Candidate> = available
                .iter()
                .copied()
                .filter(|_| located)
                .filter(|r| !committed.contains(r.id.as_str()))
                .filter(|r| self.matcher.compatible(r, zone))
                .map(|r| {
                    let distance_km = haversine_km(&r.location, &zone.location);
                    Candidate {
                        resource: r,
                        distance_km,
                        score: self.scorer.score(r, zone, distance_km),
                    }
                })
                .collect();
            candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

            let needed = zone.needed_resources();
            tracing::debug!(
                "Zone {} ({}, priority {:.2}): {} candidates, needs {}",
                zone.id,
                zone.kind,
                zone.priority(),
                candidates.len(),
                needed
            );

            let mut assigned = 0;
            for candidate in candidates {
                if assigned == needed {
                    break;
                }
                let resource = candidate.resource;
                // 重複 id 只指派第一筆
                if !committed.insert(resource.id.as_str()) {
                    tracing::warn!("⚠️ Duplicate resource id {} ignored", resource.id);
                    continue;
                }
                let eta_minutes = candidate.distance_km / resource.speed_kmh * 60.0;

                tracing::debug!(
                    "Allocated {} ({}) to {}: {:.1}km, score {:.2}",
                    resource.id,
                    resource.kind,
                    zone.id,
                    candidate.distance_km,
                    candidate.score
                );

                allocations.push(Allocation {
                    resource_id: resource.id.clone(),
                    zone_id: zone.id.clone(),
                    eta_minutes: round_to(eta_minutes, 1),
                    distance_km: round_to(candidate.distance_km, 2),
                    explanation: format!(
                        "Matches {} needs. High severity ({}). Proximity: {:.1}km.",
                        zone.kind, zone.severity, candidate.distance_km
                    ),
                });
                total_score += candidate.score;
                assigned += 1;
            }

            if assigned == 0 {
                tracing::warn!("⚠️ No compatible resource left for zone {} ({})", zone.id, zone.kind);
            }
            demands.push(ZoneDemand::new(zone, assigned));
        }

        let mut seen = HashSet::new();
        let unallocated_resources: Vec<String> = resources
            .iter()
            .filter(|r| !committed.contains(r.id.as_str()) && seen.insert(r.id.as_str()))
            .map(|r| r.id.clone())
            .collect();

        let served: HashSet<&str> = allocations.iter().map(|a| a.zone_id.as_str()).collect();
        let mut seen = HashSet::new();
        let unserved_zones: Vec<String> = zones
            .iter()
            .filter(|z| !served.contains(z.id.as_str()) && seen.insert(z.id.as_str()))
            .map(|z| z.id.clone())
            .collect();

        let computation_time_ms = round_to(start.elapsed().as_secs_f64() * 1000.0, 2);

        tracing::info!(
            "✅ Plan ready: {} allocations, {} unallocated resources, {} unserved zones ({}ms)",
            allocations.len(),
            unallocated_resources.len(),
            unserved_zones.len(),
            computation_time_ms
        );

        let plan = Plan {
            allocations,
            unallocated_resources,
            unserved_zones,
            total_score: round_to(total_score, 2),
            computation_time_ms,
            rationale: None,
        };

        (plan, demands)
    }
}
