//! Database-backed role lookup with a fail-closed default.
//!
//! Authorization must never throw into core logic: if the query fails for
//! any reason (missing tables, unreachable store), the provider logs a
//! warning and answers with an empty role set.

use async_trait::async_trait;
use sea_orm::sea_query::JoinType;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, RelationTrait};
use tracing::warn;

use crate::application::authorization::{RoleProvider, RoleSet};
use crate::infrastructure::database::entities::{role, user_role};

pub struct SeaOrmRoleProvider {
    db: DatabaseConnection,
}

impl SeaOrmRoleProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn role_names(&self, user_id: i64) -> Result<Vec<String>, sea_orm::DbErr> {
        role::Entity::find()
            .select_only()
            .column(role::Column::Name)
            .join(JoinType::InnerJoin, role::Relation::UserRole.def())
            .filter(user_role::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
    }
}

#[async_trait]
impl RoleProvider for SeaOrmRoleProvider {
    async fn roles_for(&self, user_id: i64) -> RoleSet {
        match self.role_names(user_id).await {
            Ok(names) => RoleSet::from_names(names.iter().map(String::as_str)),
            Err(e) => {
                warn!(user_id, error = %e, "Role lookup failed; treating user as having no roles");
                RoleSet::empty()
            }
        }
    }
}
