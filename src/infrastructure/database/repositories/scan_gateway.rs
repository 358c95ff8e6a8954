//! SeaORM implementation of the kiosk scan gateway.
//!
//! The whole transition runs inside one transaction. Token consumption is a
//! conditional `UPDATE ... WHERE used_at IS NULL`: of two concurrent scans
//! presenting the same token, exactly one sees a row change; the other is
//! rejected as expired-or-used without writing anything.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::scan::{
    format_window, ScanAction, ScanGateway, ScanOutcome, ScanRejection, ScanSummary,
    ScanTransition,
};
use crate::domain::{BookingStatus, DomainResult, UsageLog};
use crate::infrastructure::database::entities::{booking, equipment, lab, qr_token, usage_log, user};

use super::booking_repository::model_to_domain;
use super::db_err;

pub struct SeaOrmScanGateway {
    db: DatabaseConnection,
}

impl SeaOrmScanGateway {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScanGateway for SeaOrmScanGateway {
    async fn commit_scan(&self, token: &str, kiosk_label: &str) -> DomainResult<ScanOutcome> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now();

        // 1. Token lookup, case-insensitive. Dropping the transaction on any
        //    early return rolls back untouched.
        let qr = qr_token::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(qr_token::Column::Token)))
                    .eq(token.to_lowercase()),
            )
            .one(&txn)
            .await
            .map_err(db_err)?;

        let Some(qr) = qr else {
            return Ok(ScanOutcome::Rejected(ScanRejection::UnknownToken));
        };

        // 2. Validity gate before any write
        if qr.used_at.is_some() || qr.expires_at <= now {
            return Ok(ScanOutcome::Rejected(ScanRejection::ExpiredOrUsed));
        }

        // 3. Bound booking must be in a scannable status
        let Some(booking_model) = booking::Entity::find_by_id(qr.booking_id)
            .one(&txn)
            .await
            .map_err(db_err)?
        else {
            return Ok(ScanOutcome::Rejected(ScanRejection::NotEligible));
        };

        let status = match BookingStatus::parse(&booking_model.status) {
            Some(s) => s,
            None => return Ok(ScanOutcome::Rejected(ScanRejection::NotEligible)),
        };
        if !status.is_scannable() {
            return Ok(ScanOutcome::Rejected(ScanRejection::NotEligible));
        }

        // 4. Consume the token. The used_at IS NULL re-check under the
        //    transaction picks exactly one winner between concurrent scans.
        let consumed = qr_token::Entity::update_many()
            .col_expr(qr_token::Column::UsedAt, Expr::value(now))
            .filter(qr_token::Column::Id.eq(qr.id))
            .filter(qr_token::Column::UsedAt.is_null())
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if consumed.rows_affected == 0 {
            return Ok(ScanOutcome::Rejected(ScanRejection::ExpiredOrUsed));
        }

        // 5. No open log → hand out; open log → take back
        let open_log = usage_log::Entity::find()
            .filter(usage_log::Column::BookingId.eq(booking_model.id))
            .filter(usage_log::Column::CheckedOutAt.is_null())
            .order_by_desc(usage_log::Column::Id)
            .one(&txn)
            .await
            .map_err(db_err)?;

        let (action, new_status) = match open_log {
            None => {
                let log = UsageLog::open_for_booking(
                    booking_model.id,
                    booking_model.user_id,
                    Some(booking_model.lab_id),
                    booking_model.equipment_id,
                    kiosk_label,
                    now,
                );
                let active = usage_log::ActiveModel {
                    booking_id: Set(log.booking_id),
                    user_id: Set(log.user_id),
                    lab_id: Set(log.lab_id),
                    equipment_id: Set(log.equipment_id),
                    checked_in_at: Set(log.checked_in_at),
                    checked_out_at: Set(log.checked_out_at),
                    kiosk_label: Set(log.kiosk_label),
                    meta: Set(log.meta),
                    created_at: Set(log.created_at),
                    updated_at: Set(log.updated_at),
                    ..Default::default()
                };
                active.insert(&txn).await.map_err(db_err)?;
                (ScanAction::CheckIn, BookingStatus::CheckedOut)
            }
            Some(log) => {
                let mut active: usage_log::ActiveModel = log.into();
                active.checked_out_at = Set(Some(now));
                active.updated_at = Set(now);
                active.update(&txn).await.map_err(db_err)?;
                (ScanAction::CheckOut, BookingStatus::Returned)
            }
        };

        let mut active: booking::ActiveModel = booking_model.into();
        active.status = Set(new_status.as_str().to_string());
        active.updated_at = Set(now);
        let booking_model = active.update(&txn).await.map_err(db_err)?;

        let summary = load_summary(&txn, &booking_model).await?;

        txn.commit().await.map_err(db_err)?;

        debug!(
            "Scan committed: booking {} -> {}",
            booking_model.id, new_status
        );

        let booking = model_to_domain(booking_model)?;
        Ok(ScanOutcome::Completed(ScanTransition {
            action,
            booking,
            summary,
        }))
    }
}

/// Resolve the display names for the kiosk summary inside the transaction.
async fn load_summary(
    txn: &DatabaseTransaction,
    b: &booking::Model,
) -> DomainResult<ScanSummary> {
    let student = user::Entity::find_by_id(b.user_id)
        .one(txn)
        .await
        .map_err(db_err)?
        .map(|u| u.name);

    let lab_name = lab::Entity::find_by_id(b.lab_id)
        .one(txn)
        .await
        .map_err(db_err)?
        .map(|l| l.name);

    let equipment_name = match b.equipment_id {
        Some(id) => equipment::Entity::find_by_id(id)
            .one(txn)
            .await
            .map_err(db_err)?
            .map(|e| e.name),
        None => None,
    };

    Ok(ScanSummary {
        student,
        equipment: equipment_name,
        lab: lab_name,
        window: format_window(b.starts_at, b.ends_at),
    })
}
