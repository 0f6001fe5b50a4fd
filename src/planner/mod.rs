//! Planner layer - per-section state containers.
//!
//! Each view owns the in-memory list for one section and a [`Backend`] that
//! mirrors every write. Mutations follow one pattern: snapshot the list, apply
//! the change locally, await the mirrored write, and on failure log it and put
//! the snapshot back. [`Planner`] bundles the views for one user.

/// Budget entries and totals
pub mod budget;
/// Hardware inventory
pub mod hardware;
/// Hardware reservations
pub mod reservations;
/// Participants and teams
pub mod roster;
/// Todos and their decisions
pub mod todos;

use crate::{
    config::planner::{PlannerConfig, StorageKind},
    core::backup::{BackupData, BackupSections},
    errors::Result,
    models::{CurrentUser, ReservationDraft},
    storage::LocalStorage,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument};

pub use budget::BudgetLedger;
pub use hardware::HardwareInventory;
pub use reservations::ReservationDesk;
pub use roster::Roster;
pub use todos::TodoBoard;

/// Connection and user scope for the remote table store
#[derive(Debug, Clone)]
pub struct Remote {
    /// Shared connection; every section of every session uses the same pool
    pub db: Arc<DatabaseConnection>,
    /// Owner of every row read or written
    pub user: CurrentUser,
}

/// Where a section mirrors its writes
#[derive(Debug, Clone)]
pub enum Backend {
    /// JSON files on disk
    Local(LocalStorage),
    /// User-scoped database tables
    Remote(Remote),
}

impl Backend {
    /// Picks the backend for a section from its configured kind.
    #[must_use]
    pub fn for_kind(kind: StorageKind, remote: &Remote, local: &LocalStorage) -> Self {
        match kind {
            StorageKind::Local => Self::Local(local.clone()),
            StorageKind::Remote => Self::Remote(remote.clone()),
        }
    }
}

/// Finishes an optimistic mutation.
///
/// On failure the list is restored from `snapshot` and the error is logged and
/// returned.
pub(crate) fn settle<T, R>(items: &mut Vec<T>, snapshot: Vec<T>, outcome: Result<R>, action: &str) -> Result<R> {
    match outcome {
        Ok(value) => Ok(value),
        Err(e) => {
            error!("Failed to {action}, rolling back: {e}");
            *items = snapshot;
            Err(e)
        }
    }
}

/// Trimmed `value`, or a validation error naming `field` when it is blank.
pub(crate) fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::errors::Error::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Index of the record with `id`, or [`crate::errors::Error::NotFound`].
pub(crate) fn position<T>(
    items: &[T],
    id: &str,
    entity: &'static str,
    id_of: impl Fn(&T) -> &str,
) -> Result<usize> {
    items
        .iter()
        .position(|item| id_of(item) == id)
        .ok_or_else(|| crate::errors::Error::not_found(entity, id))
}

/// All planner sections for one user
#[derive(Debug)]
pub struct Planner {
    /// Owner of this planner
    pub user: CurrentUser,
    /// Todos and decisions
    pub todos: TodoBoard,
    /// Income and expenses
    pub budget: BudgetLedger,
    /// Hardware inventory
    pub hardware: HardwareInventory,
    /// Participants and teams
    pub roster: Roster,
    /// Hardware reservations
    pub reservations: ReservationDesk,
}

impl Planner {
    /// Loads every section for `user` concurrently.
    #[instrument(skip(db, config), fields(user = %user.id))]
    pub async fn load(db: Arc<DatabaseConnection>, user: CurrentUser, config: &PlannerConfig) -> Result<Self> {
        let remote = Remote {
            db,
            user: user.clone(),
        };
        let local = LocalStorage::for_user(&config.storage.local_dir, &user.id);
        let backend = |kind| Backend::for_kind(kind, &remote, &local);
        let storage = &config.storage;

        let (todos, budget, hardware, roster, reservations) = tokio::try_join!(
            TodoBoard::load(backend(storage.todos)),
            BudgetLedger::load(backend(storage.budget)),
            HardwareInventory::load(backend(storage.hardware)),
            Roster::load(
                backend(storage.participants),
                backend(storage.teams),
                config.color_names(),
            ),
            ReservationDesk::load(backend(storage.reservations)),
        )?;

        info!(
            "Loaded planner: {} todos, {} budget entries, {} hardware, {} participants, {} teams, {} reservations",
            todos.todos().len(),
            budget.entries().len(),
            hardware.items().len(),
            roster.participants().len(),
            roster.teams().len(),
            reservations.reservations().len()
        );

        Ok(Self {
            user,
            todos,
            budget,
            hardware,
            roster,
            reservations,
        })
    }

    /// Creates a reservation, checking it against current hardware and participants.
    pub async fn reserve(&mut self, draft: ReservationDraft) -> Result<crate::models::Reservation> {
        self.reservations
            .create(self.hardware.items(), self.roster.participants(), draft)
            .await
    }

    /// Changes a reservation's quantity, re-checking availability.
    pub async fn edit_reservation(&mut self, id: &str, quantity: u32) -> Result<()> {
        self.reservations
            .edit_quantity(id, quantity, self.hardware.items())
            .await
    }

    /// Approves a pending reservation, re-checking availability.
    pub async fn approve_reservation(&mut self, id: &str) -> Result<()> {
        self.reservations.approve(id, self.hardware.items()).await
    }

    /// Snapshot of every section as a backup document.
    #[must_use]
    pub fn export(&self) -> BackupData {
        BackupData::new(BackupSections {
            todos: self.todos.todos().to_vec(),
            budget: self.budget.entries().to_vec(),
            hardware: self.hardware.items().to_vec(),
            participants: self.roster.participants().to_vec(),
            reservations: self.reservations.reservations().to_vec(),
            teams: self.roster.teams().to_vec(),
        })
    }

    /// Replaces every section with the backup's contents.
    ///
    /// Sections are restored one at a time; a failure rolls back the section
    /// that failed and stops, leaving earlier sections restored.
    #[instrument(skip(self, backup), fields(user = %self.user.id, version = %backup.version))]
    pub async fn restore(&mut self, backup: BackupData) -> Result<()> {
        let BackupSections {
            todos,
            budget,
            hardware,
            participants,
            reservations,
            teams,
        } = backup.data;

        self.todos.replace_all(todos).await?;
        self.budget.replace_all(budget).await?;
        self.hardware.replace_all(hardware).await?;
        self.roster.replace_teams(teams).await?;
        self.roster.replace_participants(participants).await?;
        self.reservations.replace_all(reservations).await?;

        info!("Backup restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::planner::StorageConfig,
        models::{HardwareDraft, ParticipantDraft, ReservationStatus},
        test_utils::setup_test_db,
    };

    fn config_in(dir: &std::path::Path) -> PlannerConfig {
        PlannerConfig {
            storage: StorageConfig {
                local_dir: dir.to_path_buf(),
                ..StorageConfig::default()
            },
            ..PlannerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_load_export_restore_across_backends() -> Result<()> {
        let db = Arc::new(setup_test_db().await?);
        let dir = tempfile::tempdir()?;
        let config = config_in(dir.path());
        let user = CurrentUser::new("user1", "Ada");

        let mut planner = Planner::load(Arc::clone(&db), user.clone(), &config).await?;
        planner.todos.add("Book venue").await?;
        let kit = planner
            .hardware
            .add(HardwareDraft {
                name: "Arduino".to_string(),
                description: String::new(),
                quantity: 3,
            })
            .await?;
        let ada = planner
            .roster
            .add_participant(ParticipantDraft {
                name: "Ada".to_string(),
                ..Default::default()
            })
            .await?;
        planner
            .reserve(ReservationDraft {
                hardware_id: kit.id.clone(),
                participant_id: ada.id.clone(),
                quantity: 2,
                status: ReservationStatus::Approved,
            })
            .await?;

        let backup = planner.export();
        assert_eq!(backup.record_count(), 4);

        // A fresh session sees remote and local sections alike
        let reloaded = Planner::load(db, user, &config).await?;
        assert_eq!(reloaded.todos.todos().len(), 1);
        assert_eq!(reloaded.roster.participants().len(), 1);
        assert_eq!(
            reloaded
                .hardware
                .available(&kit.id, reloaded.reservations.reservations()),
            Some(1)
        );

        // Restoring into a fresh deployment copies everything over
        let mut other =
            Planner::load(Arc::new(setup_test_db().await?), CurrentUser::new("user2", "Bob"), &config).await?;
        other.restore(backup).await?;
        assert_eq!(other.todos.todos().len(), 1);
        assert_eq!(other.hardware.items().len(), 1);
        assert_eq!(other.reservations.reservations().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_reserve_checks_availability() -> Result<()> {
        let db = Arc::new(setup_test_db().await?);
        let dir = tempfile::tempdir()?;
        let mut planner =
            Planner::load(db, CurrentUser::new("user1", "Ada"), &config_in(dir.path())).await?;

        let kit = planner
            .hardware
            .add(HardwareDraft {
                name: "Soldering iron".to_string(),
                description: String::new(),
                quantity: 1,
            })
            .await?;
        let ada = planner
            .roster
            .add_participant(ParticipantDraft {
                name: "Ada".to_string(),
                ..Default::default()
            })
            .await?;
        let draft = ReservationDraft {
            hardware_id: kit.id,
            participant_id: ada.id,
            quantity: 1,
            status: ReservationStatus::Approved,
        };

        planner.reserve(draft.clone()).await?;
        let second = planner.reserve(draft).await;
        assert!(matches!(
            second,
            Err(crate::errors::Error::InsufficientHardware { available: 0, .. })
        ));
        assert_eq!(planner.reservations.reservations().len(), 1);

        Ok(())
    }
}
