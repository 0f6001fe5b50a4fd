//! Backup document export and import.
//!
//! The file is `{version, exportedAt, data: {todos, budget, hardware,
//! participants, reservations, teams}}`. Import checks only the top-level shape
//! and that each section is an array; `teams` may be absent in older files and
//! participants are normalized on the way in. Individual records are decoded
//! leniently and not otherwise validated.

use crate::{
    errors::{Error, Result},
    models::{BudgetEntry, Hardware, Participant, Reservation, Team, Todo},
    storage::migrate_participants,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Version written into new backups
pub const BACKUP_VERSION: &str = "1.1";

const REQUIRED_SECTIONS: [&str; 5] = ["todos", "budget", "hardware", "participants", "reservations"];

/// Every planner section, as stored in a backup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupSections {
    /// Todos with their decisions nested
    pub todos: Vec<Todo>,
    /// Budget entries
    pub budget: Vec<BudgetEntry>,
    /// Hardware inventory
    pub hardware: Vec<Hardware>,
    /// Participants
    pub participants: Vec<Participant>,
    /// Reservations
    pub reservations: Vec<Reservation>,
    /// Teams; absent in backups from before teams existed
    pub teams: Vec<Team>,
}

/// A complete backup document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    /// Format version, [`BACKUP_VERSION`] for new files
    pub version: String,
    /// When the backup was taken
    pub exported_at: DateTime<Utc>,
    /// The planner contents
    pub data: BackupSections,
}

impl BackupData {
    /// Wraps sections in a document stamped with the current version and time.
    #[must_use]
    pub fn new(data: BackupSections) -> Self {
        Self {
            version: BACKUP_VERSION.to_string(),
            exported_at: Utc::now(),
            data,
        }
    }

    /// Pretty-printed JSON, two-space indented.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Download name, e.g. `hackathon-backup-2024-03-01.json`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("hackathon-backup-{}.json", self.exported_at.format("%Y-%m-%d"))
    }

    /// Total number of records across all sections.
    #[must_use]
    pub fn record_count(&self) -> usize {
        let d = &self.data;
        d.todos.len()
            + d.budget.len()
            + d.hardware.len()
            + d.participants.len()
            + d.reservations.len()
            + d.teams.len()
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidBackup {
        message: message.to_string(),
    }
}

/// Whether a JSON value would count as "set" in the file's original format.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null | Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => true,
    }
}

fn section<T: DeserializeOwned>(data: &mut serde_json::Map<String, Value>, key: &str) -> Result<Vec<T>> {
    let raw = data.remove(key).unwrap_or_else(|| Value::Array(Vec::new()));
    serde_json::from_value(raw).map_err(|e| Error::InvalidBackup {
        message: format!("Failed to parse backup file: {key}: {e}"),
    })
}

/// Parses and validates a backup file.
///
/// # Errors
/// [`Error::InvalidBackup`] with the message to show the user:
/// - `"Failed to parse backup file"` when the text is not JSON
/// - `"Invalid backup file format"` when `version` or `data` is missing
/// - `"Invalid backup data structure"` when a required section is not an array
pub fn parse_backup(contents: &str) -> Result<BackupData> {
    let root: Value =
        serde_json::from_str(contents).map_err(|_| invalid("Failed to parse backup file"))?;

    if !is_present(root.get("version")) || !is_present(root.get("data")) {
        return Err(invalid("Invalid backup file format"));
    }

    let Some(mut data) = root.get("data").and_then(Value::as_object).cloned() else {
        return Err(invalid("Invalid backup data structure"));
    };
    if REQUIRED_SECTIONS
        .iter()
        .any(|key| !data.get(*key).is_some_and(Value::is_array))
    {
        return Err(invalid("Invalid backup data structure"));
    }
    if !data.get("teams").is_some_and(Value::is_array) {
        data.insert("teams".to_string(), Value::Array(Vec::new()));
    }

    let version = match &root["version"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let exported_at = root
        .get("exportedAt")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc));

    let participants = migrate_participants(data.remove("participants").unwrap_or_default());

    Ok(BackupData {
        version,
        exported_at,
        data: BackupSections {
            todos: section(&mut data, "todos")?,
            budget: section(&mut data, "budget")?,
            hardware: section(&mut data, "hardware")?,
            participants,
            reservations: section(&mut data, "reservations")?,
            teams: section(&mut data, "teams")?,
        },
    })
}
