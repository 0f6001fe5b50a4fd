//! Shared test utilities for `HackathonBuddy`.
//!
//! Helpers for building databases, storage backends and records with sensible
//! defaults so individual tests only spell out what they assert on.

use crate::{
    errors::Result,
    models::{CurrentUser, HardwareDraft, ParticipantDraft},
    planner::{Backend, Remote},
    storage::LocalStorage,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::{path::Path, sync::Arc};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The user every planner test acts as.
pub fn test_user() -> CurrentUser {
    CurrentUser::new("test_user", "Test User")
}

/// Remote backend over a fresh in-memory database.
pub async fn remote_backend() -> Result<Backend> {
    Ok(Backend::Remote(Remote {
        db: Arc::new(setup_test_db().await?),
        user: test_user(),
    }))
}

/// Remote backend whose every store call fails.
///
/// A mock connection with no queued results errors on each query and exec.
pub fn failing_remote_backend() -> Backend {
    Backend::Remote(Remote {
        db: Arc::new(MockDatabase::new(DatabaseBackend::Sqlite).into_connection()),
        user: test_user(),
    })
}

/// Local backend writing into `dir`.
pub fn local_backend(dir: &Path) -> Backend {
    Backend::Local(LocalStorage::new(dir))
}

/// Local backend whose writes fail: its directory path is an existing file.
pub fn failing_local_backend(dir: &Path) -> Result<Backend> {
    let blocker = dir.join("not-a-directory");
    std::fs::write(&blocker, b"")?;
    Ok(Backend::Local(LocalStorage::new(blocker)))
}

/// Hardware draft with an empty description.
pub fn hardware_draft(name: &str, quantity: u32) -> HardwareDraft {
    HardwareDraft {
        name: name.to_string(),
        description: String::new(),
        quantity,
    }
}

/// Participant draft with the given skills and no team.
///
/// # Defaults
/// * `email`: `<lowercased name>@example.com`
pub fn participant_draft(name: &str, skills: &[&str]) -> ParticipantDraft {
    ParticipantDraft {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        skills: skills.iter().map(ToString::to_string).collect(),
        team_id: None,
    }
}
