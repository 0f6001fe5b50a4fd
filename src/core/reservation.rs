//! Reservation table access.
//!
//! Availability is not checked here; the planner checks it before calling in.

use crate::{
    core::ensure_affected,
    entities::{Reservation, reservation},
    errors::Result,
    models::{self, ReservationDraft, ReservationStatus},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::warn;

fn to_record(row: reservation::Model) -> models::Reservation {
    let status = row.status.parse().unwrap_or_else(|_| {
        warn!("Reservation {} has unknown status '{}'", row.id, row.status);
        ReservationStatus::Pending
    });
    models::Reservation {
        id: row.id,
        hardware_id: row.hardware_id,
        participant_id: row.participant_id,
        quantity: row.quantity,
        status,
        created_at: row.created_at,
    }
}

fn to_active(user_id: &str, record: &models::Reservation) -> reservation::ActiveModel {
    reservation::ActiveModel {
        id: Set(record.id.clone()),
        user_id: Set(user_id.to_string()),
        hardware_id: Set(record.hardware_id.clone()),
        participant_id: Set(record.participant_id.clone()),
        quantity: Set(record.quantity),
        status: Set(record.status.as_str().to_string()),
        created_at: Set(record.created_at),
    }
}

/// Retrieves the user's reservations, newest first.
pub async fn get_all(db: &DatabaseConnection, user_id: &str) -> Result<Vec<models::Reservation>> {
    Ok(Reservation::find()
        .filter(reservation::Column::UserId.eq(user_id))
        .order_by_desc(reservation::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(to_record)
        .collect())
}

/// Inserts a new reservation; the id and timestamp are assigned here.
pub async fn create(
    db: &DatabaseConnection,
    user_id: &str,
    draft: ReservationDraft,
) -> Result<models::Reservation> {
    let record = draft.into_reservation();
    Reservation::insert(to_active(user_id, &record))
        .exec_without_returning(db)
        .await?;
    Ok(record)
}

/// Moves a reservation to another lifecycle state.
pub async fn update_status(
    db: &DatabaseConnection,
    user_id: &str,
    id: &str,
    status: ReservationStatus,
) -> Result<()> {
    let result = Reservation::update_many()
        .col_expr(reservation::Column::Status, Expr::value(status.as_str()))
        .filter(reservation::Column::Id.eq(id))
        .filter(reservation::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "reservation", id)
}

/// Changes how many units a reservation holds.
pub async fn update_quantity(
    db: &DatabaseConnection,
    user_id: &str,
    id: &str,
    quantity: u32,
) -> Result<()> {
    let result = Reservation::update_many()
        .col_expr(reservation::Column::Quantity, Expr::value(quantity))
        .filter(reservation::Column::Id.eq(id))
        .filter(reservation::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "reservation", id)
}

/// Deletes one reservation.
pub async fn delete(db: &DatabaseConnection, user_id: &str, id: &str) -> Result<()> {
    let result = Reservation::delete_many()
        .filter(reservation::Column::Id.eq(id))
        .filter(reservation::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    ensure_affected(result.rows_affected, "reservation", id)
}

/// Replaces every reservation the user owns.
pub async fn replace_all(
    db: &DatabaseConnection,
    user_id: &str,
    reservations: &[models::Reservation],
) -> Result<()> {
    let txn = db.begin().await?;
    Reservation::delete_many()
        .filter(reservation::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    if !reservations.is_empty() {
        Reservation::insert_many(reservations.iter().map(|record| to_active(user_id, record)))
            .exec_without_returning(&txn)
            .await?;
    }
    txn.commit().await?;
    Ok(())
}
