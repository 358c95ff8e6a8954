//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::domain::user::{User, UserRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{role, user, user_role};

use super::db_err;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        name: m.name,
        email: m.email,
        avatar_url: m.avatar_url,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn save(&self, u: User) -> DomainResult<User> {
        debug!("Saving user: {}", u.email);

        let model = user::ActiveModel {
            name: Set(u.name),
            email: Set(u.email),
            avatar_url: Set(u.avatar_url),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn assign_role(&self, user_id: i64, role_name: &str) -> DomainResult<()> {
        let role = role::Entity::find()
            .filter(role::Column::Name.eq(role_name))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::NotFound {
                entity: "Role",
                field: "name",
                value: role_name.to_string(),
            })?;

        let existing = user_role::Entity::find_by_id((user_id, role.id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Ok(());
        }

        let assignment = user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role.id),
        };
        assignment.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
