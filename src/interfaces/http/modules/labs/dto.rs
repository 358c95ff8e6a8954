//! Lab catalog DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Lab;

/// Create or update a lab
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveLabRequest {
    #[validate(length(max = 20))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 120))]
    pub location: Option<String>,
    #[validate(range(min = 0))]
    pub capacity: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Lab details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct LabDto {
    pub id: i64,
    pub code: Option<String>,
    pub name: String,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub is_active: bool,
}

impl From<Lab> for LabDto {
    fn from(l: Lab) -> Self {
        Self {
            id: l.id,
            code: l.code,
            name: l.name,
            location: l.location,
            capacity: l.capacity,
            is_active: l.is_active,
        }
    }
}
