//! User repository interface

use async_trait::async_trait;

use super::model::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: User) -> DomainResult<User>;

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Grant a named role to a user (no-op when already granted)
    async fn assign_role(&self, user_id: i64, role: &str) -> DomainResult<()>;
}
