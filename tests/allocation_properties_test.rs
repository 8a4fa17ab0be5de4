use relief_alloc::{
    AllocationEngine, CompatibilityMatcher, CompatibilityTable, DisasterZone, Location, Plan,
    Resource, ResourceStatus, Scorer, ZoneStatus,
};
use std::collections::HashSet;

// 赤道上每度經度約 111.195 公里
const KM_PER_DEGREE: f64 = 111.195;

fn resource(id: &str, kind: &str, km_east: f64) -> Resource {
    Resource {
        id: id.to_string(),
        kind: kind.to_string(),
        location: Location::new(0.0, km_east / KM_PER_DEGREE),
        capacity: 4,
        status: ResourceStatus::Available,
        specialization: vec![],
        speed_kmh: 60.0,
    }
}

fn zone(id: &str, kind: &str, severity: i32, vulnerability_score: f64, affected_population: i64) -> DisasterZone {
    DisasterZone {
        id: id.to_string(),
        kind: kind.to_string(),
        severity,
        location: Location::new(0.0, 0.0),
        affected_population,
        vulnerability_score,
        status: ZoneStatus::Active,
    }
}

fn mixed_scenario() -> (Vec<Resource>, Vec<DisasterZone>) {
    let mut resources = vec![
        resource("R-AMB-1", "Ambulance", 2.0),
        resource("R-AMB-2", "Ambulance", 40.0),
        resource("R-HELI", "Helicopter", 120.0),
        resource("R-NDRF", "NDRF Rescue Team", 15.0),
        resource("R-JCB", "JCB", 8.0),
        resource("R-FIRE", "Fire Truck", 25.0),
        resource("R-POL", "Police", 60.0),
        resource("R-DRONE", "Drone", 1.0),
    ];
    resources[1].status = ResourceStatus::Returning;
    resources[7].specialization = vec!["Medical".to_string()];

    let zones = vec![
        zone("Z-FLOOD", "Flood", 6, 0.5, 2500),
        zone("Z-QUAKE", "Earthquake", 9, 0.9, 3000),
        zone("Z-SLIDE", "Major Landslide", 7, 0.6, 800),
        zone("Z-TSUNAMI", "Tsunami", 4, 0.3, 0),
    ];
    (resources, zones)
}

fn allocated_ids(plan: &Plan) -> Vec<&str> {
    plan.allocations.iter().map(|a| a.resource_id.as_str()).collect()
}

#[test]
fn test_no_double_booking() {
    let (resources, zones) = mixed_scenario();
    let plan = AllocationEngine::default().allocate(&resources, &zones);

    let ids = allocated_ids(&plan);
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());
    assert!(!ids.is_empty());
}

#[test]
fn test_duplicate_resource_ids_are_booked_once() {
    let resources = vec![
        resource("R-A", "Ambulance", 1.0),
        resource("R-A", "Ambulance", 2.0),
        resource("R-B", "Ambulance", 3.0),
    ];
    // 需要 5 個單位，但只有兩個不同的 id
    let zones = vec![zone("Z1", "Flood", 5, 0.5, 5000)];

    let plan = AllocationEngine::default().allocate(&resources, &zones);

    assert_eq!(allocated_ids(&plan), vec!["R-A", "R-B"]);
    assert_eq!(plan.allocations[0].distance_km, 1.0);
    assert!(plan.unallocated_resources.is_empty());
}

#[test]
fn test_duplicate_resource_ids_across_zones() {
    let resources = vec![
        resource("R-A", "Ambulance", 1.0),
        resource("R-A", "Ambulance", 1.5),
    ];
    let zones = vec![
        zone("Z-HIGH", "Flood", 9, 0.9, 100),
        zone("Z-LOW", "Flood", 3, 0.3, 100),
    ];

    let plan = AllocationEngine::default().allocate(&resources, &zones);

    assert_eq!(allocated_ids(&plan), vec!["R-A"]);
    assert_eq!(plan.allocations[0].zone_id, "Z-HIGH");
    assert_eq!(plan.unserved_zones, vec!["Z-LOW"]);
}

#[test]
fn test_conservation_of_resource_ids() {
    let (resources, zones) = mixed_scenario();
    let plan = AllocationEngine::default().allocate(&resources, &zones);

    let allocated: HashSet<&str> = allocated_ids(&plan).into_iter().collect();
    let unallocated: HashSet<&str> = plan.unallocated_resources.iter().map(String::as_str).collect();
    let input: HashSet<&str> = resources.iter().map(|r| r.id.as_str()).collect();

    assert!(allocated.is_disjoint(&unallocated));
    let union: HashSet<&str> = allocated.union(&unallocated).copied().collect();
    assert_eq!(union, input);
    // Returning 狀態不可被分配
    assert!(unallocated.contains("R-AMB-2"));
}

#[test]
fn test_unserved_iff_no_allocation() {
    let (resources, zones) = mixed_scenario();
    let plan = AllocationEngine::default().allocate(&resources, &zones[..3]);

    for z in &zones[..3] {
        let served = plan.allocations.iter().any(|a| a.zone_id == z.id);
        assert_eq!(!served, plan.unserved_zones.contains(&z.id), "zone {}", z.id);
    }
}

#[test]
fn test_allocations_follow_zone_priority() {
    let (resources, zones) = mixed_scenario();
    let plan = AllocationEngine::default().allocate(&resources, &zones);

    // Z-QUAKE 8.1 > Z-SLIDE 4.2 > Z-FLOOD 3.0 > Z-TSUNAMI 1.2
    let mut zone_order: Vec<&str> = Vec::new();
    for a in &plan.allocations {
        if zone_order.last() != Some(&a.zone_id.as_str()) {
            zone_order.push(a.zone_id.as_str());
        }
    }
    assert_eq!(zone_order, vec!["Z-QUAKE", "Z-SLIDE", "Z-FLOOD", "Z-TSUNAMI"]);
}

#[test]
fn test_mixed_scenario_assignments() {
    let (resources, zones) = mixed_scenario();
    let plan = AllocationEngine::default().allocate(&resources, &zones);

    let for_zone = |id: &str| -> Vec<String> {
        plan.allocations_for_zone(id)
            .map(|a| a.resource_id.clone())
            .collect()
    };

    // 地震需要 3 個單位: 依距離取最近的三個相容單位
    assert_eq!(for_zone("Z-QUAKE"), vec!["R-DRONE", "R-AMB-1", "R-NDRF"]);
    // "Major Landslide" 模糊對應到 Landslide，JCB 可用
    assert_eq!(for_zone("Z-SLIDE"), vec!["R-JCB"]);
    assert_eq!(for_zone("Z-FLOOD"), vec!["R-FIRE", "R-POL"]);
    // 未列表的災害類型走通用清單
    assert_eq!(for_zone("Z-TSUNAMI"), vec!["R-HELI"]);

    assert!(plan.unserved_zones.is_empty());
    assert_eq!(plan.unallocated_resources, vec!["R-AMB-2"]);
}

#[test]
fn test_higher_priority_zone_gets_first_pick() {
    let resources = vec![resource("R1", "Ambulance", 1.0)];
    let zones = vec![
        zone("Z-LOW", "Flood", 3, 0.4, 500),
        zone("Z-HIGH", "Flood", 9, 0.9, 500),
    ];

    let plan = AllocationEngine::default().allocate(&resources, &zones);

    assert_eq!(plan.allocations.len(), 1);
    assert_eq!(plan.allocations[0].zone_id, "Z-HIGH");
    assert_eq!(plan.unserved_zones, vec!["Z-LOW"]);
}

#[test]
fn test_demand_floor_for_empty_population() {
    let resources = vec![
        resource("R1", "Ambulance", 1.0),
        resource("R2", "Ambulance", 2.0),
    ];
    let zones = vec![zone("Z1", "Flood", 5, 0.5, 0)];

    let plan = AllocationEngine::default().allocate(&resources, &zones);

    assert_eq!(allocated_ids(&plan), vec!["R1"]);
    assert_eq!(plan.unallocated_resources, vec!["R2"]);
}

#[test]
fn test_demand_scales_with_population() {
    let resources: Vec<Resource> = (0..6)
        .map(|i| resource(&format!("R{}", i), "Ambulance", i as f64 + 1.0))
        .collect();
    let zones = vec![zone("Z1", "Flood", 5, 0.5, 4999)];

    let plan = AllocationEngine::default().allocate(&resources, &zones);
    assert_eq!(allocated_ids(&plan), vec!["R0", "R1", "R2", "R3"]);
}

#[test]
fn test_nearby_ambulance_beats_distant_police() {
    let resources = vec![
        resource("R-POLICE", "Police", 50.0),
        resource("R-AMB", "Ambulance", 5.0),
    ];
    let zones = vec![zone("Z1", "Flood", 8, 0.8, 1000)];

    let plan = AllocationEngine::default().allocate(&resources, &zones);

    assert_eq!(plan.allocations.len(), 1);
    let a = &plan.allocations[0];
    assert_eq!(a.resource_id, "R-AMB");
    assert_eq!(a.zone_id, "Z1");
    assert_eq!(a.distance_km, 5.0);
    assert_eq!(a.eta_minutes, 5.0);
    assert_eq!(plan.unallocated_resources, vec!["R-POLICE"]);
    // 0.24 + 0.16 + 0.8 / 1.5
    assert_eq!(plan.total_score, 0.93);
}

#[test]
fn test_no_available_resources() {
    let mut busy = resource("R1", "Ambulance", 1.0);
    busy.status = ResourceStatus::Deployed;
    let zones = vec![
        zone("Z1", "Flood", 8, 0.8, 1000),
        zone("Z2", "Cyclone", 6, 0.4, 5000),
    ];

    let plan = AllocationEngine::default().allocate(&[busy], &zones);

    assert!(plan.allocations.is_empty());
    assert_eq!(plan.unserved_zones, vec!["Z1", "Z2"]);
    assert_eq!(plan.unallocated_resources, vec!["R1"]);
    assert_eq!(plan.total_score, 0.0);
}

#[test]
fn test_empty_inputs_are_not_errors() {
    let engine = AllocationEngine::default();

    let plan = engine.allocate(&[], &[]);
    assert!(plan.allocations.is_empty());
    assert!(plan.unallocated_resources.is_empty());
    assert!(plan.unserved_zones.is_empty());

    let plan = engine.allocate(&[resource("R1", "Ambulance", 1.0)], &[]);
    assert_eq!(plan.unallocated_resources, vec!["R1"]);
}

#[test]
fn test_incompatible_resources_leave_zone_unserved() {
    let table = CompatibilityTable::empty().with_entry("Wildfire", &["Fire Truck"]);
    let engine = AllocationEngine::new(CompatibilityMatcher::new(table), Scorer::default());

    let mut drone = resource("R-DRONE", "Drone", 1.0);
    drone.specialization = vec!["Medical".to_string()];
    let zones = vec![
        zone("Z-FIRE", "Wildfire", 9, 0.9, 100),
        zone("Z-OTHER", "Sandstorm", 2, 0.1, 100),
    ];

    let plan = engine.allocate(&[drone], &zones);

    // 野火清單沒有醫療相關類型，drone 只能去通用清單的災區
    assert_eq!(plan.unserved_zones, vec!["Z-FIRE"]);
    assert_eq!(plan.allocations.len(), 1);
    assert_eq!(plan.allocations[0].zone_id, "Z-OTHER");
}

#[test]
fn test_allocation_is_deterministic() {
    let (resources, zones) = mixed_scenario();
    let engine = AllocationEngine::default();

    let first = engine.allocate(&resources, &zones);
    let second = engine.allocate(&resources, &zones);

    assert_eq!(first.allocations, second.allocations);
    assert_eq!(first.unallocated_resources, second.unallocated_resources);
    assert_eq!(first.unserved_zones, second.unserved_zones);
    assert_eq!(first.total_score, second.total_score);
}
