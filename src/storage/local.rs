//! File-backed key/value storage.
//!
//! Each key maps to `<dir>/<key>.json`. Reads never fail the caller: a missing
//! file yields the initial value and a corrupt one is logged and ignored. When a
//! migrator is supplied, the raw JSON passes through it and the migrated value is
//! written back so later reads see the current shape.

use crate::errors::Result;
use crate::models::{Participant, new_id};
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Upgrades raw stored JSON into the current record shape.
pub type Migrator<T> = fn(Value) -> T;

/// A directory of JSON documents, one per key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    /// Storage rooted directly at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage for one user under a shared root.
    ///
    /// Characters outside `[A-Za-z0-9_-]` are replaced so the id is always a
    /// single path component.
    #[must_use]
    pub fn for_user(root: &Path, user_id: &str) -> Self {
        let component: String = user_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Self::new(root.join(component))
    }

    /// Directory holding this storage's files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads `key`, falling back to `initial` when absent or unreadable.
    pub fn load<T>(&self, key: &str, initial: T, migrator: Option<Migrator<T>>) -> T
    where
        T: DeserializeOwned + Serialize,
    {
        match self.read(key, migrator) {
            Ok(Some(value)) => value,
            Ok(None) => initial,
            Err(e) => {
                error!("Failed to read local storage key '{key}': {e}");
                initial
            }
        }
    }

    fn read<T>(&self, key: &str, migrator: Option<Migrator<T>>) -> Result<Option<T>>
    where
        T: DeserializeOwned + Serialize,
    {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let raw: Value = serde_json::from_str(&contents)?;
        let value = match migrator {
            Some(migrate) => {
                let migrated = migrate(raw);
                self.save(key, &migrated)?;
                migrated
            }
            None => serde_json::from_value(raw)?,
        };
        debug!("Loaded local storage key '{key}' from {path:?}");
        Ok(Some(value))
    }

    /// Writes `value` under `key`, replacing the previous document.
    ///
    /// The document is written to a sibling temp file and renamed into place.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, serde_json::to_vec(value)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn string_field(item: &Value, key: &str) -> Option<String> {
    item.get(key).and_then(Value::as_str).map(ToString::to_string)
}

fn timestamp_field(item: &Value) -> Option<DateTime<Utc>> {
    ["createdAt", "created_at"]
        .iter()
        .filter_map(|key| item.get(*key).and_then(Value::as_str))
        .find_map(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Brings stored participant lists up to the current shape.
///
/// Anything that is not an array becomes an empty list. Missing ids get a fresh
/// one, and missing or mistyped fields take their defaults.
#[must_use]
pub fn migrate_participants(data: Value) -> Vec<Participant> {
    let Value::Array(items) = data else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| Participant {
            id: string_field(item, "id")
                .filter(|id| !id.is_empty())
                .unwrap_or_else(new_id),
            name: string_field(item, "name").unwrap_or_default(),
            email: string_field(item, "email").unwrap_or_default(),
            skills: item
                .get("skills")
                .and_then(Value::as_array)
                .map(|skills| {
                    skills
                        .iter()
                        .filter_map(Value::as_str)
                        .map(ToString::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            checked_in: item
                .get("checkedIn")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            team_id: string_field(item, "teamId"),
            created_at: timestamp_field(item).unwrap_or_else(Utc::now),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::models::{BudgetDraft, BudgetEntry, BudgetKind};
    use serde_json::json;

    #[test]
    fn test_load_missing_key_returns_initial() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        let entries: Vec<BudgetEntry> = storage.load("hackathon-budget", Vec::new(), None);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested"));
        let entry = BudgetDraft {
            kind: BudgetKind::Expense,
            description: "Pizza".to_string(),
            amount: 120.0,
            category: "Food & Drinks".to_string(),
        }
        .into_entry();

        storage.save("hackathon-budget", &vec![entry.clone()]).unwrap();
        let loaded: Vec<BudgetEntry> = storage.load("hackathon-budget", Vec::new(), None);
        assert_eq!(loaded, vec![entry]);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_initial() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        fs::write(dir.path().join("hackathon-teams.json"), "{not json").unwrap();

        let teams: Vec<crate::models::Team> = storage.load("hackathon-teams", Vec::new(), None);
        assert!(teams.is_empty());
    }

    #[test]
    fn test_migrator_output_is_written_back() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let legacy = json!([{ "id": "p1", "name": "Grace" }]);
        fs::write(
            dir.path().join("hackathon-participants.json"),
            legacy.to_string(),
        )
        .unwrap();

        let participants =
            storage.load("hackathon-participants", Vec::new(), Some(migrate_participants));
        assert_eq!(participants.len(), 1);

        let rewritten: Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("hackathon-participants.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(rewritten[0]["checkedIn"], json!(false));
        assert_eq!(rewritten[0]["skills"], json!([]));
        assert_eq!(rewritten[0]["teamId"], Value::Null);
    }

    #[test]
    fn test_migrate_participants_defaults() {
        let migrated = migrate_participants(json!([
            { "name": "No Id", "skills": ["Rust", 3], "checkedIn": "yes" },
            { "id": "p2", "name": "Linus", "email": "l@example.com", "teamId": "t1",
              "checkedIn": true, "created_at": "2024-05-01T09:00:00Z" }
        ]));

        assert_eq!(migrated.len(), 2);
        assert!(!migrated[0].id.is_empty());
        assert_eq!(migrated[0].skills, vec!["Rust"]);
        assert!(!migrated[0].checked_in);
        assert_eq!(migrated[0].team_id, None);

        assert_eq!(migrated[1].id, "p2");
        assert!(migrated[1].checked_in);
        assert_eq!(migrated[1].team_id.as_deref(), Some("t1"));
        assert_eq!(
            migrated[1].created_at.to_rfc3339(),
            "2024-05-01T09:00:00+00:00"
        );
    }

    #[test]
    fn test_migrate_participants_non_array() {
        assert!(migrate_participants(json!({"oops": true})).is_empty());
    }

    #[test]
    fn test_for_user_sanitizes_component() {
        let storage = LocalStorage::for_user(Path::new("/data"), "../evil/123");
        assert_eq!(storage.dir(), Path::new("/data/___evil_123"));
    }
}
