//! Equipment catalog DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Equipment;

/// Create or update a piece of equipment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveEquipmentRequest {
    pub lab_id: i64,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 80))]
    pub category: Option<String>,
    #[validate(length(max = 80))]
    pub serial_number: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Rewrite display order to match the given id sequence
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReorderEquipmentRequest {
    #[validate(length(min = 1))]
    pub ids: Vec<i64>,
}

/// Equipment details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct EquipmentDto {
    pub id: i64,
    pub lab_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub serial_number: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

impl From<Equipment> for EquipmentDto {
    fn from(e: Equipment) -> Self {
        Self {
            id: e.id,
            lab_id: e.lab_id,
            name: e.name,
            category: e.category,
            serial_number: e.serial_number,
            is_active: e.is_active,
            sort_order: e.sort_order,
        }
    }
}
