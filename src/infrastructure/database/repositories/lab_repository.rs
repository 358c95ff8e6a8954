//! SeaORM implementation of LabRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::domain::lab::{Lab, LabRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::lab;

use super::db_err;

pub struct SeaOrmLabRepository {
    db: DatabaseConnection,
}

impl SeaOrmLabRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: lab::Model) -> Lab {
    Lab {
        id: m.id,
        code: m.code,
        name: m.name,
        location: m.location,
        capacity: m.capacity,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl LabRepository for SeaOrmLabRepository {
    async fn save(&self, l: Lab) -> DomainResult<Lab> {
        debug!("Saving lab: {}", l.name);

        let model = lab::ActiveModel {
            code: Set(l.code),
            name: Set(l.name),
            location: Set(l.location),
            capacity: Set(l.capacity),
            is_active: Set(l.is_active),
            created_at: Set(l.created_at),
            updated_at: Set(l.updated_at),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Lab>> {
        let model = lab::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self) -> DomainResult<Vec<Lab>> {
        let models = lab::Entity::find()
            .order_by_asc(lab::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, l: Lab) -> DomainResult<()> {
        debug!("Updating lab: {}", l.id);

        let existing = lab::Entity::find_by_id(l.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Lab",
                field: "id",
                value: l.id.to_string(),
            });
        }

        let model = lab::ActiveModel {
            id: Set(l.id),
            code: Set(l.code),
            name: Set(l.name),
            location: Set(l.location),
            capacity: Set(l.capacity),
            is_active: Set(l.is_active),
            created_at: Set(l.created_at),
            updated_at: Set(Utc::now()),
        };
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = lab::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Lab",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }
}
