//! Reservation entity - units of one hardware item lent to one participant.
//!
//! Status is stored as text: `"pending"`, `"approved"` or `"returned"`.
//! The approved-quantity limit is checked by the planner when a reservation is
//! created or edited, not by the table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reservation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    /// UUID assigned on insert
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owner of the row
    pub user_id: String,
    /// Reserved hardware item
    pub hardware_id: String,
    /// Participant holding the units
    pub participant_id: String,
    /// Units reserved
    pub quantity: u32,
    /// Lifecycle state
    pub status: String,
    /// Insert time
    pub created_at: DateTimeUtc,
}

/// Hardware and participant ids are plain columns; either may be kept in
/// local storage instead of this database
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
