//! Scan gateway interface

use async_trait::async_trait;

use super::model::ScanOutcome;
use crate::domain::DomainResult;

/// Transactional boundary for the kiosk scan transition.
///
/// One call runs the entire sequence (token lookup/validation, booking
/// eligibility, token consumption, usage log open/close and booking status
/// change) inside a single database transaction. A rejected scan commits
/// nothing; concurrent scans of the same token produce exactly one
/// completed transition, the loser observing the token as already used.
#[async_trait]
pub trait ScanGateway: Send + Sync {
    /// `token` is the already-resolved token string; `kiosk_label` names the
    /// scanning device in the usage log.
    async fn commit_scan(&self, token: &str, kiosk_label: &str) -> DomainResult<ScanOutcome>;
}
