//! Core layer - framework-agnostic store access and planner arithmetic.
//!
//! One access module per table mirrors the hosted table API: select the user's
//! rows, insert with a store-assigned id and timestamp, update, delete, and a
//! bulk `replace_all` used by backup restore. Every query is scoped by
//! `user_id`. `availability` and `backup` hold the pure logic.

/// Derived hardware availability and the reservation limit check
pub mod availability;
/// Backup document export, validation and parsing
pub mod backup;
/// Budget entry table access
pub mod budget;
/// Decision table access (scoped through the owning todo)
pub mod decision;
/// Hardware table access
pub mod hardware;
/// Participant table access
pub mod participant;
/// Reservation table access
pub mod reservation;
/// Team table access
pub mod team;
/// Todo table access
pub mod todo;

use crate::errors::{Error, Result};

/// Maps "no row matched" on an update or delete to [`Error::NotFound`].
pub(crate) fn ensure_affected(rows_affected: u64, entity: &'static str, id: &str) -> Result<()> {
    if rows_affected == 0 {
        Err(Error::not_found(entity, id))
    } else {
        Ok(())
    }
}
