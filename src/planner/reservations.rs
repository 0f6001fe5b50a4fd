//! Reservation desk: lending hardware to participants.
//!
//! Hardware and participants live in other views, so operations that need them
//! take the current lists as arguments.

use super::{Backend, position, settle};
use crate::{
    core::{availability, reservation},
    errors::{Error, Result},
    models::{Hardware, Participant, Reservation, ReservationDraft, ReservationStatus},
    storage::RESERVATIONS_KEY,
};
use tracing::instrument;

/// Shown when a reservation points at a record that no longer exists
pub const UNKNOWN: &str = "Unknown";

/// Name of the hardware with `id`, or [`UNKNOWN`].
#[must_use]
pub fn hardware_name<'a>(hardware: &'a [Hardware], id: &str) -> &'a str {
    hardware
        .iter()
        .find(|h| h.id == id)
        .map_or(UNKNOWN, |h| h.name.as_str())
}

/// Name of the participant with `id`, or [`UNKNOWN`].
#[must_use]
pub fn participant_name<'a>(participants: &'a [Participant], id: &str) -> &'a str {
    participants
        .iter()
        .find(|p| p.id == id)
        .map_or(UNKNOWN, |p| p.name.as_str())
}

fn find_hardware<'a>(hardware: &'a [Hardware], id: &str) -> Result<&'a Hardware> {
    hardware
        .iter()
        .find(|h| h.id == id)
        .ok_or_else(|| Error::not_found("hardware", id))
}

fn positive(quantity: u32) -> Result<u32> {
    if quantity == 0 {
        return Err(Error::validation("Quantity must be at least 1"));
    }
    Ok(quantity)
}

/// Reservations, newest first, mirrored to one backend.
#[derive(Debug)]
pub struct ReservationDesk {
    items: Vec<Reservation>,
    backend: Backend,
}

impl ReservationDesk {
    /// Reads every reservation from the backend.
    pub async fn load(backend: Backend) -> Result<Self> {
        let items = match &backend {
            Backend::Local(storage) => storage.load(RESERVATIONS_KEY, Vec::new(), None),
            Backend::Remote(remote) => reservation::get_all(&remote.db, &remote.user.id).await?,
        };
        Ok(Self { items, backend })
    }

    /// Reservations, newest first.
    #[must_use]
    pub fn reservations(&self) -> &[Reservation] {
        &self.items
    }

    /// Reservation by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Reservation> {
        self.items.iter().find(|r| r.id == id)
    }

    /// Pending and approved reservations of one hardware item.
    #[must_use]
    pub fn active_for(&self, hardware_id: &str) -> Vec<&Reservation> {
        self.items
            .iter()
            .filter(|r| r.hardware_id == hardware_id && r.status.is_active())
            .collect()
    }

    /// Reserves units of one item for one participant.
    ///
    /// Both must exist and, unless the draft is already returned, the quantity
    /// must fit in the item's current availability.
    #[instrument(skip(self, hardware, participants))]
    pub async fn create(
        &mut self,
        hardware: &[Hardware],
        participants: &[Participant],
        draft: ReservationDraft,
    ) -> Result<Reservation> {
        positive(draft.quantity)?;
        let item = find_hardware(hardware, &draft.hardware_id)?;
        if !participants.iter().any(|p| p.id == draft.participant_id) {
            return Err(Error::not_found("participant", draft.participant_id));
        }
        if draft.status.is_active() {
            availability::check_request(item, &self.items, draft.quantity, None)?;
        }

        let snapshot = self.items.clone();
        let provisional = draft.clone().into_reservation();
        self.items.insert(0, provisional.clone());

        let outcome = match &self.backend {
            Backend::Local(storage) => storage
                .save(RESERVATIONS_KEY, &self.items)
                .map(|()| provisional),
            Backend::Remote(remote) => reservation::create(&remote.db, &remote.user.id, draft).await,
        };
        let created = settle(&mut self.items, snapshot, outcome, "create reservation")?;
        self.items[0] = created.clone();
        Ok(created)
    }

    async fn set_status(&mut self, index: usize, status: ReservationStatus, action: &str) -> Result<()> {
        let snapshot = self.items.clone();
        self.items[index].status = status;
        let id = self.items[index].id.clone();

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(RESERVATIONS_KEY, &self.items),
            Backend::Remote(remote) => {
                reservation::update_status(&remote.db, &remote.user.id, &id, status).await
            }
        };
        settle(&mut self.items, snapshot, outcome, action)
    }

    /// Moves a pending reservation to approved after re-checking availability.
    #[instrument(skip(self, hardware))]
    pub async fn approve(&mut self, id: &str, hardware: &[Hardware]) -> Result<()> {
        let index = position(&self.items, id, "reservation", |r| r.id.as_str())?;
        let current = &self.items[index];
        if current.status != ReservationStatus::Pending {
            return Err(Error::validation(format!(
                "Only pending reservations can be approved (this one is {})",
                current.status
            )));
        }
        let item = find_hardware(hardware, &current.hardware_id)?;
        availability::check_request(item, &self.items, current.quantity, Some(id))?;

        self.set_status(index, ReservationStatus::Approved, "approve reservation")
            .await
    }

    /// Marks a reservation returned, freeing its units.
    #[instrument(skip(self))]
    pub async fn return_hardware(&mut self, id: &str) -> Result<()> {
        let index = position(&self.items, id, "reservation", |r| r.id.as_str())?;
        if self.items[index].status == ReservationStatus::Returned {
            return Err(Error::validation("Hardware was already returned"));
        }
        self.set_status(index, ReservationStatus::Returned, "return hardware")
            .await
    }

    /// Changes the reserved quantity.
    ///
    /// The reservation's own units count as free, so an edit only fails when
    /// other reservations hold too much.
    #[instrument(skip(self, hardware))]
    pub async fn edit_quantity(&mut self, id: &str, quantity: u32, hardware: &[Hardware]) -> Result<()> {
        positive(quantity)?;
        let index = position(&self.items, id, "reservation", |r| r.id.as_str())?;
        let item = find_hardware(hardware, &self.items[index].hardware_id)?;
        availability::check_request(item, &self.items, quantity, Some(id))?;

        let snapshot = self.items.clone();
        self.items[index].quantity = quantity;
        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(RESERVATIONS_KEY, &self.items),
            Backend::Remote(remote) => {
                reservation::update_quantity(&remote.db, &remote.user.id, id, quantity).await
            }
        };
        settle(&mut self.items, snapshot, outcome, "update reservation")
    }

    /// Deletes a reservation and returns it, freeing any units it held.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, id: &str) -> Result<Reservation> {
        let index = position(&self.items, id, "reservation", |r| r.id.as_str())?;
        let snapshot = self.items.clone();
        let removed = self.items.remove(index);

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(RESERVATIONS_KEY, &self.items),
            Backend::Remote(remote) => reservation::delete(&remote.db, &remote.user.id, id).await,
        };
        settle(&mut self.items, snapshot, outcome, "delete reservation")?;
        Ok(removed)
    }

    /// Swaps in `reservations` wholesale.
    pub async fn replace_all(&mut self, reservations: Vec<Reservation>) -> Result<()> {
        let snapshot = std::mem::replace(&mut self.items, reservations);
        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(RESERVATIONS_KEY, &self.items),
            Backend::Remote(remote) => {
                reservation::replace_all(&remote.db, &remote.user.id, &self.items).await
            }
        };
        settle(&mut self.items, snapshot, outcome, "restore reservations")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    struct Fixture {
        hardware: Vec<Hardware>,
        participants: Vec<Participant>,
    }

    impl Fixture {
        fn new(quantity: u32) -> Self {
            Self {
                hardware: vec![hardware_draft("Arduino", quantity).into_hardware()],
                participants: vec![
                    participant_draft("Ada", &[]).into_participant(),
                    participant_draft("Bob", &[]).into_participant(),
                ],
            }
        }

        fn draft(&self, who: usize, quantity: u32, status: ReservationStatus) -> ReservationDraft {
            ReservationDraft {
                hardware_id: self.hardware[0].id.clone(),
                participant_id: self.participants[who].id.clone(),
                quantity,
                status,
            }
        }
    }

    #[tokio::test]
    async fn test_create_respects_availability() -> Result<()> {
        let fx = Fixture::new(5);
        let mut desk = ReservationDesk::load(remote_backend().await?).await?;

        desk.create(&fx.hardware, &fx.participants, fx.draft(0, 3, ReservationStatus::Approved))
            .await?;
        desk.create(&fx.hardware, &fx.participants, fx.draft(1, 2, ReservationStatus::Pending))
            .await?;
        assert_eq!(desk.active_for(&fx.hardware[0].id).len(), 2);

        let over = desk
            .create(&fx.hardware, &fx.participants, fx.draft(1, 1, ReservationStatus::Approved))
            .await;
        assert!(matches!(
            over,
            Err(Error::InsufficientHardware {
                requested: 1,
                available: 0,
                ..
            })
        ));
        assert_eq!(desk.reservations().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_references_and_zero_quantity() -> Result<()> {
        let fx = Fixture::new(5);
        let dir = tempfile::tempdir()?;
        let mut desk = ReservationDesk::load(local_backend(dir.path())).await?;

        let mut draft = fx.draft(0, 1, ReservationStatus::Approved);
        draft.participant_id = "ghost".to_string();
        assert!(matches!(
            desk.create(&fx.hardware, &fx.participants, draft).await,
            Err(Error::NotFound { entity: "participant", .. })
        ));

        let mut draft = fx.draft(0, 1, ReservationStatus::Approved);
        draft.hardware_id = "ghost".to_string();
        assert!(matches!(
            desk.create(&fx.hardware, &fx.participants, draft).await,
            Err(Error::NotFound { entity: "hardware", .. })
        ));

        assert!(matches!(
            desk.create(&fx.hardware, &fx.participants, fx.draft(0, 0, ReservationStatus::Approved))
                .await,
            Err(Error::Validation { .. })
        ));
        assert!(desk.reservations().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_return_frees_units_once() -> Result<()> {
        let fx = Fixture::new(2);
        let dir = tempfile::tempdir()?;
        let mut desk = ReservationDesk::load(local_backend(dir.path())).await?;

        let held = desk
            .create(&fx.hardware, &fx.participants, fx.draft(0, 2, ReservationStatus::Approved))
            .await?;
        desk.return_hardware(&held.id).await?;
        assert!(matches!(
            desk.return_hardware(&held.id).await,
            Err(Error::Validation { .. })
        ));

        // Returned units are available again
        desk.create(&fx.hardware, &fx.participants, fx.draft(1, 2, ReservationStatus::Approved))
            .await?;

        let reloaded = ReservationDesk::load(local_backend(dir.path())).await?;
        assert_eq!(reloaded.reservations().len(), 2);
        assert_eq!(
            reloaded
                .find(&held.id)
                .map(|r| r.status),
            Some(ReservationStatus::Returned)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_approve_rechecks_availability() -> Result<()> {
        let fx = Fixture::new(3);
        let mut desk = ReservationDesk::load(remote_backend().await?).await?;

        let pending = desk
            .create(&fx.hardware, &fx.participants, fx.draft(0, 2, ReservationStatus::Pending))
            .await?;
        desk.approve(&pending.id, &fx.hardware).await?;
        assert!(matches!(
            desk.approve(&pending.id, &fx.hardware).await,
            Err(Error::Validation { .. })
        ));

        // A second pending request fits, but shrinking stock before approval blocks it
        let second = desk
            .create(&fx.hardware, &fx.participants, fx.draft(1, 1, ReservationStatus::Pending))
            .await?;
        let mut shrunk = fx.hardware.clone();
        shrunk[0].quantity = 2;
        assert!(matches!(
            desk.approve(&second.id, &shrunk).await,
            Err(Error::InsufficientHardware { available: 0, .. })
        ));
        assert_eq!(
            desk.find(&second.id).map(|r| r.status),
            Some(ReservationStatus::Pending)
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_edit_quantity_counts_own_units() -> Result<()> {
        let fx = Fixture::new(5);
        let mut desk = ReservationDesk::load(remote_backend().await?).await?;

        let first = desk
            .create(&fx.hardware, &fx.participants, fx.draft(0, 3, ReservationStatus::Approved))
            .await?;
        desk.create(&fx.hardware, &fx.participants, fx.draft(1, 1, ReservationStatus::Approved))
            .await?;

        desk.edit_quantity(&first.id, 4, &fx.hardware).await?;
        assert!(desk.edit_quantity(&first.id, 5, &fx.hardware).await.is_err());
        assert_eq!(desk.find(&first.id).map(|r| r.quantity), Some(4));

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_remote_create_rolls_back() -> Result<()> {
        let fx = Fixture::new(5);
        let mut desk = ReservationDesk {
            items: Vec::new(),
            backend: failing_remote_backend(),
        };

        let result = desk
            .create(&fx.hardware, &fx.participants, fx.draft(0, 1, ReservationStatus::Approved))
            .await;
        assert!(matches!(result, Err(Error::Database(_))));
        assert!(desk.reservations().is_empty());

        Ok(())
    }

    #[test]
    fn test_names_fall_back_to_unknown() {
        let fx = Fixture::new(1);
        assert_eq!(hardware_name(&fx.hardware, &fx.hardware[0].id), "Arduino");
        assert_eq!(hardware_name(&fx.hardware, "gone"), UNKNOWN);
        assert_eq!(participant_name(&fx.participants, &fx.participants[1].id), "Bob");
        assert_eq!(participant_name(&fx.participants, "gone"), UNKNOWN);
    }
}
