use crate::domain::model::{DisasterZone, Resource, ResourceStatus, ZoneStatus};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;

/// 資源與災區的持久層。分配引擎本身不會呼叫它，由呼叫端在規劃前後使用。
pub trait SnapshotStore: Send + Sync {
    fn list_resources(&self) -> impl Future<Output = Result<Vec<Resource>>> + Send;
    fn list_zones(&self) -> impl Future<Output = Result<Vec<DisasterZone>>> + Send;
    fn list_available_resources(&self) -> impl Future<Output = Result<Vec<Resource>>> + Send;
    fn list_active_zones(&self) -> impl Future<Output = Result<Vec<DisasterZone>>> + Send;

    /// 回傳 false 表示找不到該 id
    fn set_resource_status(
        &self,
        id: &str,
        status: ResourceStatus,
    ) -> impl Future<Output = Result<bool>> + Send;
    fn set_zone_status(
        &self,
        id: &str,
        status: ZoneStatus,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// 同 id 已存在時取代該筆，回傳 true 表示發生取代
    fn add_resource(&self, resource: Resource) -> impl Future<Output = Result<bool>> + Send;
    fn add_zone(&self, zone: DisasterZone) -> impl Future<Output = Result<bool>> + Send;
    fn remove_resource(&self, id: &str) -> impl Future<Output = Result<bool>> + Send;
    fn remove_resources(&self, ids: &[String]) -> impl Future<Output = Result<usize>> + Send;
    fn remove_zone(&self, id: &str) -> impl Future<Output = Result<bool>> + Send;
}

/// 外部文字摘要服務 (LLM)。失敗只會降級成固定字串。
#[async_trait]
pub trait RationaleProvider: Send + Sync {
    async fn summarize(&self, prompt: &str, context: &str) -> Result<String>;
}
