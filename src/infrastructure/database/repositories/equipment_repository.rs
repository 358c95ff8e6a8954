//! SeaORM implementation of EquipmentRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::domain::equipment::{Equipment, EquipmentRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::equipment;

use super::db_err;

pub struct SeaOrmEquipmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmEquipmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: equipment::Model) -> Equipment {
    Equipment {
        id: m.id,
        lab_id: m.lab_id,
        name: m.name,
        category: m.category,
        serial_number: m.serial_number,
        is_active: m.is_active,
        sort_order: m.sort_order,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

#[async_trait]
impl EquipmentRepository for SeaOrmEquipmentRepository {
    async fn save(&self, e: Equipment) -> DomainResult<Equipment> {
        debug!("Saving equipment: {}", e.name);

        let model = equipment::ActiveModel {
            lab_id: Set(e.lab_id),
            name: Set(e.name),
            category: Set(e.category),
            serial_number: Set(e.serial_number),
            is_active: Set(e.is_active),
            sort_order: Set(e.sort_order),
            created_at: Set(e.created_at),
            updated_at: Set(e.updated_at),
            ..Default::default()
        };
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Equipment>> {
        let model = equipment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self) -> DomainResult<Vec<Equipment>> {
        let models = equipment::Entity::find()
            .order_by_asc(equipment::Column::SortOrder)
            .order_by_asc(equipment::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, e: Equipment) -> DomainResult<()> {
        debug!("Updating equipment: {}", e.id);

        let existing = equipment::Entity::find_by_id(e.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Equipment",
                field: "id",
                value: e.id.to_string(),
            });
        }

        let model = equipment::ActiveModel {
            id: Set(e.id),
            lab_id: Set(e.lab_id),
            name: Set(e.name),
            category: Set(e.category),
            serial_number: Set(e.serial_number),
            is_active: Set(e.is_active),
            sort_order: Set(e.sort_order),
            created_at: Set(e.created_at),
            updated_at: Set(Utc::now()),
        };
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = equipment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Equipment",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }

    async fn next_sort_order(&self) -> DomainResult<i32> {
        let max: Option<Option<i32>> = equipment::Entity::find()
            .select_only()
            .column_as(equipment::Column::SortOrder.max(), "max_sort_order")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(max.flatten().unwrap_or(0) + 1)
    }

    async fn reorder(&self, ids: &[i64]) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        for (index, id) in ids.iter().enumerate() {
            equipment::Entity::update_many()
                .col_expr(
                    equipment::Column::SortOrder,
                    Expr::value((index + 1) as i32),
                )
                .filter(equipment::Column::Id.eq(*id))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}
