//! Lab repository interface

use async_trait::async_trait;

use super::model::Lab;
use crate::domain::DomainResult;

#[async_trait]
pub trait LabRepository: Send + Sync {
    async fn save(&self, lab: Lab) -> DomainResult<Lab>;

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Lab>>;

    /// All labs ordered by name
    async fn list(&self) -> DomainResult<Vec<Lab>>;

    async fn update(&self, lab: Lab) -> DomainResult<()>;

    async fn delete(&self, id: i64) -> DomainResult<()>;
}
