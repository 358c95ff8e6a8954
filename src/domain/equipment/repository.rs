//! Equipment repository interface

use async_trait::async_trait;

use super::model::Equipment;
use crate::domain::DomainResult;

#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    async fn save(&self, equipment: Equipment) -> DomainResult<Equipment>;

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Equipment>>;

    /// All equipment ordered by sort order, then name
    async fn list(&self) -> DomainResult<Vec<Equipment>>;

    async fn update(&self, equipment: Equipment) -> DomainResult<()>;

    async fn delete(&self, id: i64) -> DomainResult<()>;

    /// Next free sort_order value (max + 1)
    async fn next_sort_order(&self) -> DomainResult<i32>;

    /// Rewrite sort_order to match the position of each id in `ids`
    async fn reorder(&self, ids: &[i64]) -> DomainResult<()>;
}
