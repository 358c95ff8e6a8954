//! User domain entity
//!
//! Authentication itself lives outside this service; users exist here so
//! bookings and usage logs have an owner to reference and display.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}
