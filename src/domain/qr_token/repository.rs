//! QR token repository interface
//!
//! Consumption (marking a token used) is not exposed here: it happens only
//! inside the kiosk scan transaction, see [`crate::domain::scan::ScanGateway`].

use async_trait::async_trait;

use super::model::QrToken;
use crate::domain::DomainResult;

#[async_trait]
pub trait QrTokenRepository: Send + Sync {
    /// Persist a freshly issued token and return it with its assigned id
    async fn save(&self, token: QrToken) -> DomainResult<QrToken>;

    /// Most recently issued token for a booking, regardless of validity
    async fn find_latest_for_booking(&self, booking_id: i64) -> DomainResult<Option<QrToken>>;
}
