//! Lab domain entity

use chrono::{DateTime, Utc};

/// A physical lab room holding bookable equipment
#[derive(Debug, Clone)]
pub struct Lab {
    pub id: i64,
    /// Short display code, e.g. "CHEM-2"
    pub code: Option<String>,
    pub name: String,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    /// Inactive labs are hidden from booking but keep their history
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lab {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            code: None,
            name: name.into(),
            location: None,
            capacity: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
