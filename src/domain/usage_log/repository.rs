//! Usage log repository interface
//!
//! Writes happen only inside the kiosk scan transaction
//! ([`crate::domain::scan::ScanGateway`]); this interface is the read model.

use async_trait::async_trait;

use super::model::UsageLog;
use crate::domain::DomainResult;

#[async_trait]
pub trait UsageLogRepository: Send + Sync {
    /// Latest open log (checked_out_at IS NULL) for a booking, if any
    async fn find_open_for_booking(&self, booking_id: i64) -> DomainResult<Option<UsageLog>>;

    /// All logs for a booking, newest first
    async fn list_for_booking(&self, booking_id: i64) -> DomainResult<Vec<UsageLog>>;
}
