//! Planner records as they live in memory, in local storage and in backups.
//!
//! These are the JSON-facing shapes: camelCase keys, lenient decoding with
//! defaults for fields older files may lack. Table rows in [`crate::entities`]
//! convert to and from these in the per-entity store modules under [`crate::core`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result};

/// Generates a fresh record identifier.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// The user whose planner is being read or mutated.
///
/// Supplied by the identity provider (the Discord command author); every
/// remote row is scoped by this id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Stable user id
    pub id: String,
    /// Display name, for log lines only
    pub name: String,
}

impl CurrentUser {
    /// Builds a user context from an id and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A planning todo with its attached decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier
    pub id: String,
    /// What needs doing
    pub title: String,
    /// Whether the todo is done
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
    /// Decisions in the order they were recorded
    #[serde(default, deserialize_with = "null_as_default")]
    pub decisions: Vec<Decision>,
    /// When the todo was created
    #[serde(alias = "created_at", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// New incomplete todo with no decisions.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            id: new_id(),
            title: title.to_string(),
            completed: false,
            decisions: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A note recorded against a todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// Unique identifier
    pub id: String,
    /// What was decided
    pub text: String,
    /// When it was recorded
    #[serde(alias = "created_at", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Decision {
    /// New decision stamped with the current time.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            id: new_id(),
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Direction of a budget entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetKind {
    /// Money coming in (sponsorship, tickets)
    Income,
    /// Money going out
    #[default]
    Expense,
}

impl BudgetKind {
    /// Stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(Error::validation(format!("Unknown budget kind '{other}'"))),
        }
    }
}

/// One line of the event budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEntry {
    /// Unique identifier
    pub id: String,
    /// Income or expense; stored as `type`
    #[serde(rename = "type", default)]
    pub kind: BudgetKind,
    /// What the money was for
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Positive amount in dollars
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    /// Category name, usually one of the configured suggestions
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// When the entry was recorded
    #[serde(alias = "created_at", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Fields of a budget entry before it has an id.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetDraft {
    /// Income or expense
    pub kind: BudgetKind,
    /// What the money was for
    pub description: String,
    /// Amount in dollars
    pub amount: f64,
    /// Category name
    pub category: String,
}

impl BudgetDraft {
    /// Assigns an id and creation time.
    #[must_use]
    pub fn into_entry(self) -> BudgetEntry {
        BudgetEntry {
            id: new_id(),
            kind: self.kind,
            description: self.description,
            amount: self.amount,
            category: self.category,
            created_at: Utc::now(),
        }
    }
}

/// A kind of lendable hardware and how many units the event owns.
///
/// Available units are not stored; see [`crate::core::availability`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hardware {
    /// Unique identifier
    pub id: String,
    /// Item name (e.g., "Arduino Uno")
    pub name: String,
    /// Optional notes
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Total units owned
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,
    /// When the item was added
    #[serde(alias = "created_at", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Fields of a hardware item before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareDraft {
    /// Item name
    pub name: String,
    /// Optional notes
    pub description: String,
    /// Total units owned
    pub quantity: u32,
}

impl HardwareDraft {
    /// Assigns an id and creation time.
    #[must_use]
    pub fn into_hardware(self) -> Hardware {
        Hardware {
            id: new_id(),
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            created_at: Utc::now(),
        }
    }
}

/// Someone attending the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Unique identifier
    pub id: String,
    /// Full name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Contact email, possibly empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Skill tags, unique and in entry order
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    /// Whether they have arrived
    #[serde(default, deserialize_with = "null_as_default")]
    pub checked_in: bool,
    /// Team they belong to, if any. May point at a team that no longer exists.
    #[serde(default)]
    pub team_id: Option<String>,
    /// When they registered
    #[serde(alias = "created_at", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Editable participant fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParticipantDraft {
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Skill tags, normalized on save
    pub skills: Vec<String>,
    /// Team reference
    pub team_id: Option<String>,
}

impl ParticipantDraft {
    /// New participants always start checked out.
    #[must_use]
    pub fn into_participant(self) -> Participant {
        Participant {
            id: new_id(),
            name: self.name,
            email: self.email,
            skills: self.skills,
            checked_in: false,
            team_id: self.team_id,
            created_at: Utc::now(),
        }
    }
}

/// A group of participants. `color` is a palette name such as `"Blue"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Unique identifier
    pub id: String,
    /// Team name
    pub name: String,
    /// Optional description
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Palette name; imported teams may carry other values
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
    /// When the team was created
    #[serde(alias = "created_at", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Editable team fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDraft {
    /// Team name
    pub name: String,
    /// Optional description
    pub description: String,
    /// Palette name, matched case-insensitively
    pub color: String,
}

impl TeamDraft {
    /// Assigns an id and creation time.
    #[must_use]
    pub fn into_team(self) -> Team {
        Team {
            id: new_id(),
            name: self.name,
            description: self.description,
            color: self.color,
            created_at: Utc::now(),
        }
    }
}

/// Lifecycle of a hardware reservation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Requested, holding units until approved
    Pending,
    /// Lent out
    #[default]
    Approved,
    /// Back in the inventory
    Returned,
}

impl ReservationStatus {
    /// Pending and approved reservations hold units; returned ones do not.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Returned)
    }

    /// Stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Returned => "returned",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "returned" => Ok(Self::Returned),
            other => Err(Error::validation(format!(
                "Unknown reservation status '{other}'"
            ))),
        }
    }
}

/// Units of one hardware item lent to one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Unique identifier
    pub id: String,
    /// Item lent out
    pub hardware_id: String,
    /// Who has it
    pub participant_id: String,
    /// Units held
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,
    /// Lifecycle state
    #[serde(default)]
    pub status: ReservationStatus,
    /// When the reservation was made
    #[serde(alias = "created_at", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Fields of a reservation before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDraft {
    /// Item to lend
    pub hardware_id: String,
    /// Who receives it
    pub participant_id: String,
    /// Units to lend
    pub quantity: u32,
    /// Starting state
    pub status: ReservationStatus,
}

impl ReservationDraft {
    /// Assigns an id and creation time.
    #[must_use]
    pub fn into_reservation(self) -> Reservation {
        Reservation {
            id: new_id(),
            hardware_id: self.hardware_id,
            participant_id: self.participant_id,
            quantity: self.quantity,
            status: self.status,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_participant_decodes_with_missing_and_null_fields() {
        let json = r#"{"id": "p1", "name": "Ada", "skills": null, "teamId": null}"#;
        let participant: Participant = serde_json::from_str(json).unwrap();

        assert_eq!(participant.name, "Ada");
        assert!(participant.skills.is_empty());
        assert!(participant.email.is_empty());
        assert!(!participant.checked_in);
        assert_eq!(participant.team_id, None);
    }

    #[test]
    fn test_budget_entry_uses_type_key() {
        let json = r#"{"id": "b1", "type": "income", "description": "Sponsor", "amount": 500.0,
            "category": "Sponsorship", "createdAt": "2024-03-01T10:00:00Z"}"#;
        let entry: BudgetEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind, BudgetKind::Income);

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "income");
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_legacy_created_at_alias_and_extra_available_field() {
        let json = r#"{"id": "h1", "name": "Arduino", "description": "", "quantity": 5,
            "available": 3, "created_at": "2024-03-01T10:00:00Z"}"#;
        let hardware: Hardware = serde_json::from_str(json).unwrap();
        assert_eq!(hardware.quantity, 5);
        assert_eq!(hardware.created_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_reservation_status_activity() {
        assert!(ReservationStatus::Pending.is_active());
        assert!(ReservationStatus::Approved.is_active());
        assert!(!ReservationStatus::Returned.is_active());
        assert_eq!(
            "returned".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::Returned
        );
        assert!("lost".parse::<ReservationStatus>().is_err());
    }
}
