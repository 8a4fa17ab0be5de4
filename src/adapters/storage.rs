use crate::domain::model::{
    DisasterZone, Resource, ResourceStatus, Snapshot, ZoneStatus,
};
use crate::domain::ports::SnapshotStore;
use crate::utils::error::{AllocError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

fn set_resource_status(snapshot: &mut Snapshot, id: &str, status: ResourceStatus) -> bool {
    match snapshot.resources.iter_mut().find(|r| r.id == id) {
        Some(resource) => {
            resource.status = status;
            true
        }
        None => false,
    }
}

fn set_zone_status(snapshot: &mut Snapshot, id: &str, status: ZoneStatus) -> bool {
    match snapshot.zones.iter_mut().find(|z| z.id == id) {
        Some(zone) => {
            zone.status = status;
            true
        }
        None => false,
    }
}

fn remove_resources(snapshot: &mut Snapshot, ids: &[String]) -> usize {
    let before = snapshot.resources.len();
    snapshot.resources.retain(|r| !ids.contains(&r.id));
    before - snapshot.resources.len()
}

fn remove_zone(snapshot: &mut Snapshot, id: &str) -> bool {
    let before = snapshot.zones.len();
    snapshot.zones.retain(|z| z.id != id);
    before != snapshot.zones.len()
}

// 同 id 已存在時取代原本那筆
fn upsert_resource(snapshot: &mut Snapshot, resource: Resource) -> bool {
    match snapshot.resources.iter_mut().find(|r| r.id == resource.id) {
        Some(existing) => {
            *existing = resource;
            true
        }
        None => {
            snapshot.resources.push(resource);
            false
        }
    }
}

fn upsert_zone(snapshot: &mut Snapshot, zone: DisasterZone) -> bool {
    match snapshot.zones.iter_mut().find(|z| z.id == zone.id) {
        Some(existing) => {
            *existing = zone;
            true
        }
        None => {
            snapshot.zones.push(zone);
            false
        }
    }
}

fn available_resources(snapshot: &Snapshot) -> Vec<Resource> {
    snapshot
        .resources
        .iter()
        .filter(|r| r.is_available())
        .cloned()
        .collect()
}

fn active_zones(snapshot: &Snapshot) -> Vec<DisasterZone> {
    snapshot
        .zones
        .iter()
        .filter(|z| z.status == ZoneStatus::Active)
        .cloned()
        .collect()
}

/// 記憶體內的快照，測試與模擬使用
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    snapshot: Arc<Mutex<Snapshot>>,
}

impl InMemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(snapshot)),
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.lock().await.clone()
    }
}

impl SnapshotStore for InMemoryStore {
    async fn list_resources(&self) -> Result<Vec<Resource>> {
        Ok(self.snapshot.lock().await.resources.clone())
    }

    async fn list_zones(&self) -> Result<Vec<DisasterZone>> {
        Ok(self.snapshot.lock().await.zones.clone())
    }

    async fn list_available_resources(&self) -> Result<Vec<Resource>> {
        Ok(available_resources(&*self.snapshot.lock().await))
    }

    async fn list_active_zones(&self) -> Result<Vec<DisasterZone>> {
        Ok(active_zones(&*self.snapshot.lock().await))
    }

    async fn set_resource_status(&self, id: &str, status: ResourceStatus) -> Result<bool> {
        Ok(set_resource_status(&mut *self.snapshot.lock().await, id, status))
    }

    async fn set_zone_status(&self, id: &str, status: ZoneStatus) -> Result<bool> {
        Ok(set_zone_status(&mut *self.snapshot.lock().await, id, status))
    }

    async fn add_resource(&self, resource: Resource) -> Result<bool> {
        Ok(upsert_resource(&mut *self.snapshot.lock().await, resource))
    }

    async fn add_zone(&self, zone: DisasterZone) -> Result<bool> {
        Ok(upsert_zone(&mut *self.snapshot.lock().await, zone))
    }

    async fn remove_resource(&self, id: &str) -> Result<bool> {
        let ids = [id.to_string()];
        Ok(remove_resources(&mut *self.snapshot.lock().await, &ids) > 0)
    }

    async fn remove_resources(&self, ids: &[String]) -> Result<usize> {
        Ok(remove_resources(&mut *self.snapshot.lock().await, ids))
    }

    async fn remove_zone(&self, id: &str) -> Result<bool> {
        Ok(remove_zone(&mut *self.snapshot.lock().await, id))
    }
}

/// 以單一 JSON 檔保存的快照: `{ "resources": [...], "zones": [...] }`
///
/// 每次操作都會重新讀檔，寫入操作以 mutex 序列化。
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Snapshot> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        serde_json::from_str(&content).map_err(|e| AllocError::SnapshotError {
            message: format!("{}: {}", self.path.display(), e),
        })
    }

    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn read<T>(&self, f: impl FnOnce(&Snapshot) -> T) -> Result<T> {
        let _guard = self.lock.lock().await;
        let snapshot = self.load().await?;
        Ok(f(&snapshot))
    }

    async fn update<T>(&self, f: impl FnOnce(&mut Snapshot) -> T) -> Result<T> {
        let _guard = self.lock.lock().await;
        let mut snapshot = self.load().await?;
        let result = f(&mut snapshot);
        self.save(&snapshot).await?;
        Ok(result)
    }
}

impl SnapshotStore for JsonFileStore {
    async fn list_resources(&self) -> Result<Vec<Resource>> {
        self.read(|s| s.resources.clone()).await
    }

    async fn list_zones(&self) -> Result<Vec<DisasterZone>> {
        self.read(|s| s.zones.clone()).await
    }

    async fn list_available_resources(&self) -> Result<Vec<Resource>> {
        self.read(available_resources).await
    }

    async fn list_active_zones(&self) -> Result<Vec<DisasterZone>> {
        self.read(active_zones).await
    }

    async fn set_resource_status(&self, id: &str, status: ResourceStatus) -> Result<bool> {
        self.update(|s| set_resource_status(s, id, status)).await
    }

    async fn set_zone_status(&self, id: &str, status: ZoneStatus) -> Result<bool> {
        self.update(|s| set_zone_status(s, id, status)).await
    }

    async fn add_resource(&self, resource: Resource) -> Result<bool> {
        self.update(|s| upsert_resource(s, resource)).await
    }

    async fn add_zone(&self, zone: DisasterZone) -> Result<bool> {
        self.update(|s| upsert_zone(s, zone)).await
    }

    async fn remove_resource(&self, id: &str) -> Result<bool> {
        let ids = [id.to_string()];
        self.update(|s| remove_resources(s, &ids) > 0).await
    }

    async fn remove_resources(&self, ids: &[String]) -> Result<usize> {
        self.update(|s| remove_resources(s, ids)).await
    }

    async fn remove_zone(&self, id: &str) -> Result<bool> {
        self.update(|s| remove_zone(s, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Location;
    use tempfile::TempDir;

    fn resource(id: &str, status: ResourceStatus) -> Resource {
        Resource {
            id: id.to_string(),
            kind: "Ambulance".to_string(),
            location: Location::new(19.0, 72.8),
            capacity: 4,
            status,
            specialization: vec!["Medical".to_string()],
            speed_kmh: 80.0,
        }
    }

    fn zone(id: &str, status: ZoneStatus) -> DisasterZone {
        DisasterZone {
            id: id.to_string(),
            kind: "Cyclone".to_string(),
            severity: 9,
            location: Location::new(19.1, 72.9),
            affected_population: 12000,
            vulnerability_score: 0.9,
            status,
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            resources: vec![
                resource("R1", ResourceStatus::Available),
                resource("R2", ResourceStatus::Deployed),
                resource("R3", ResourceStatus::Available),
            ],
            zones: vec![zone("Z1", ZoneStatus::Active), zone("Z2", ZoneStatus::Resolved)],
        }
    }

    #[tokio::test]
    async fn test_in_memory_filters_by_status() {
        let store = InMemoryStore::new(snapshot());

        let available: Vec<String> = store
            .list_available_resources()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(available, vec!["R1", "R3"]);

        let active = store.list_active_zones().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "Z1");
    }

    #[tokio::test]
    async fn test_in_memory_crud() {
        let store = InMemoryStore::new(Snapshot::default());
        store.add_resource(resource("R1", ResourceStatus::Available)).await.unwrap();
        store.add_resource(resource("R2", ResourceStatus::Available)).await.unwrap();
        store.add_zone(zone("Z1", ZoneStatus::Active)).await.unwrap();

        assert!(store.set_resource_status("R1", ResourceStatus::Returning).await.unwrap());
        assert!(!store.set_resource_status("R-404", ResourceStatus::Deployed).await.unwrap());
        assert!(store.remove_resource("R2").await.unwrap());
        assert!(!store.remove_resource("R2").await.unwrap());
        assert!(store.remove_zone("Z1").await.unwrap());

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.resources.len(), 1);
        assert_eq!(snapshot.resources[0].status, ResourceStatus::Returning);
        assert!(snapshot.zones.is_empty());
    }

    #[tokio::test]
    async fn test_json_file_store_persists_updates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("snapshot.json");
        let store = JsonFileStore::new(&path);
        store.save(&snapshot()).await.unwrap();

        assert!(store.set_zone_status("Z1", ZoneStatus::Processing).await.unwrap());
        let removed = store
            .remove_resources(&["R1".to_string(), "R2".to_string(), "R9".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 2);

        // 重新開啟同一個檔案
        let reopened = JsonFileStore::new(&path);
        let zones = reopened.list_zones().await.unwrap();
        assert_eq!(zones[0].status, ZoneStatus::Processing);
        let resources = reopened.list_resources().await.unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].id, "R3");
        assert!(reopened.list_active_zones().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_add_replaces_existing_id() {
        let store = InMemoryStore::new(snapshot());

        let mut returning = resource("R1", ResourceStatus::Returning);
        returning.speed_kmh = 40.0;
        assert!(store.add_resource(returning).await.unwrap());
        assert!(!store.add_resource(resource("R4", ResourceStatus::Available)).await.unwrap());
        assert!(store.add_zone(zone("Z1", ZoneStatus::Processing)).await.unwrap());

        let snapshot = store.snapshot().await;
        let ids: Vec<&str> = snapshot.resources.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["R1", "R2", "R3", "R4"]);
        assert_eq!(snapshot.resources[0].status, ResourceStatus::Returning);
        assert_eq!(snapshot.resources[0].speed_kmh, 40.0);
        assert_eq!(snapshot.zones.len(), 2);
        assert_eq!(snapshot.zones[0].status, ZoneStatus::Processing);
    }

    #[tokio::test]
    async fn test_json_file_store_add_keeps_ids_unique() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        let store = JsonFileStore::new(&path);
        store.save(&snapshot()).await.unwrap();

        assert!(store.add_resource(resource("R3", ResourceStatus::Deployed)).await.unwrap());
        assert!(!store.add_zone(zone("Z3", ZoneStatus::Active)).await.unwrap());

        let reopened = JsonFileStore::new(&path);
        let resources = reopened.list_resources().await.unwrap();
        assert_eq!(resources.iter().filter(|r| r.id == "R3").count(), 1);
        assert_eq!(resources.len(), 3);
        assert_eq!(resources[2].status, ResourceStatus::Deployed);
        let available: Vec<String> = reopened
            .list_available_resources()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(available, vec!["R1"]);
        assert_eq!(reopened.list_zones().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_json_file_store_rejects_malformed_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, r#"{"resources": [{"id": "R1"}]}"#).unwrap();

        let err = JsonFileStore::new(&path).list_resources().await.unwrap_err();
        assert!(matches!(err, AllocError::SnapshotError { .. }));
    }
}
