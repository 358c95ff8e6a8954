//! QR token domain entity

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Default token lifetime when the caller does not pick one.
pub const DEFAULT_TTL_MINUTES: i64 = 15;

/// Single-use, time-limited credential bound to exactly one booking.
///
/// Several live tokens may exist for one booking at the same time; issuing
/// a new one does not revoke earlier ones. Matching against scanner input is
/// case-insensitive.
#[derive(Debug, Clone)]
pub struct QrToken {
    pub id: i64,
    pub booking_id: i64,
    /// Opaque unique token value (UUID v4)
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Set exactly once, at the scan that consumed the token
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl QrToken {
    /// Mint a fresh token for a booking with the given TTL.
    pub fn issue(booking_id: i64, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            booking_id,
            token: Uuid::new_v4().to_string(),
            expires_at: now + Duration::minutes(ttl_minutes),
            used_at: None,
            created_at: now,
        }
    }

    /// Valid ⇔ never used and not yet expired.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Consume the token. Irreversible.
    pub fn mark_used(&mut self, at: DateTime<Utc>) {
        self.used_at = Some(at);
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_is_valid() {
        let t = QrToken::issue(1, 15);
        assert!(t.is_valid());
        assert_eq!(t.used_at, None);
    }

    #[test]
    fn issued_tokens_are_unique() {
        let a = QrToken::issue(1, 15);
        let b = QrToken::issue(1, 15);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn used_token_is_invalid() {
        let mut t = QrToken::issue(1, 15);
        t.mark_used(Utc::now());
        assert!(!t.is_valid());
    }

    #[test]
    fn zero_ttl_token_expires_immediately() {
        let t = QrToken::issue(1, 0);
        // expires_at == issuance instant, so any later check fails
        assert!(!t.is_valid_at(t.expires_at));
        assert!(!t.is_valid_at(t.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn validity_is_checked_against_expiry() {
        let t = QrToken::issue(1, 15);
        assert!(t.is_valid_at(t.expires_at - Duration::seconds(1)));
        assert!(!t.is_valid_at(t.expires_at));
        assert!(!t.is_valid_at(t.expires_at + Duration::minutes(1)));
    }
}
