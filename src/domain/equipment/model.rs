//! Equipment domain entity

use chrono::{DateTime, Utc};

/// A bookable piece of equipment belonging to a lab
#[derive(Debug, Clone)]
pub struct Equipment {
    pub id: i64,
    pub lab_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub serial_number: Option<String>,
    pub is_active: bool,
    /// Manual display ordering within catalog listings
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Equipment {
    pub fn new(lab_id: i64, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            lab_id,
            name: name.into(),
            category: None,
            serial_number: None,
            is_active: true,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn belongs_to_lab(&self, lab_id: i64) -> bool {
        self.lab_id == lab_id
    }
}
