//! Hardware inventory.
//!
//! Only total quantities are kept here. Availability is derived against the
//! reservation list the caller passes in.

use super::{Backend, position, required, settle};
use crate::{
    core::{availability, hardware},
    errors::{Error, Result},
    models::{Hardware, HardwareDraft, Reservation},
    storage::HARDWARE_KEY,
};
use tracing::instrument;

fn validate(draft: HardwareDraft) -> Result<HardwareDraft> {
    if draft.quantity == 0 {
        return Err(Error::validation("Quantity must be at least 1"));
    }
    Ok(HardwareDraft {
        name: required(&draft.name, "Hardware name")?,
        description: draft.description.trim().to_string(),
        quantity: draft.quantity,
    })
}

/// Hardware items, newest first, mirrored to one backend.
#[derive(Debug)]
pub struct HardwareInventory {
    items: Vec<Hardware>,
    backend: Backend,
}

impl HardwareInventory {
    /// Reads every item from the backend.
    pub async fn load(backend: Backend) -> Result<Self> {
        let items = match &backend {
            Backend::Local(storage) => storage.load(HARDWARE_KEY, Vec::new(), None),
            Backend::Remote(remote) => hardware::get_all(&remote.db, &remote.user.id).await?,
        };
        Ok(Self { items, backend })
    }

    /// Items, newest first.
    #[must_use]
    pub fn items(&self) -> &[Hardware] {
        &self.items
    }

    /// Item by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Hardware> {
        self.items.iter().find(|h| h.id == id)
    }

    /// Units of `id` not held by an active reservation, or `None` for unknown hardware.
    #[must_use]
    pub fn available(&self, id: &str, reservations: &[Reservation]) -> Option<u32> {
        self.find(id)
            .map(|item| availability::available_units(item, reservations))
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |sum, h| sum.saturating_add(h.quantity))
    }

    /// Sum of available units across all items.
    #[must_use]
    pub fn total_available(&self, reservations: &[Reservation]) -> u32 {
        self.items.iter().fold(0_u32, |sum, h| {
            sum.saturating_add(availability::available_units(h, reservations))
        })
    }

    /// Items with at least one unit free to reserve.
    #[must_use]
    pub fn in_stock(&self, reservations: &[Reservation]) -> Vec<&Hardware> {
        self.items
            .iter()
            .filter(|h| availability::available_units(h, reservations) > 0)
            .collect()
    }

    /// Adds an item at the top of the inventory.
    #[instrument(skip(self))]
    pub async fn add(&mut self, draft: HardwareDraft) -> Result<Hardware> {
        let draft = validate(draft)?;
        let snapshot = self.items.clone();
        let provisional = draft.clone().into_hardware();
        self.items.insert(0, provisional.clone());

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(HARDWARE_KEY, &self.items).map(|()| provisional),
            Backend::Remote(remote) => hardware::create(&remote.db, &remote.user.id, draft).await,
        };
        let created = settle(&mut self.items, snapshot, outcome, "add hardware")?;
        self.items[0] = created.clone();
        Ok(created)
    }

    /// Overwrites name, description and quantity.
    ///
    /// Lowering the quantity below what is currently reserved is allowed; the
    /// derived availability then reads zero until units are returned.
    #[instrument(skip(self))]
    pub async fn edit(&mut self, id: &str, draft: HardwareDraft) -> Result<()> {
        let draft = validate(draft)?;
        let index = position(&self.items, id, "hardware", |h| h.id.as_str())?;
        let snapshot = self.items.clone();
        let item = &mut self.items[index];
        item.name.clone_from(&draft.name);
        item.description.clone_from(&draft.description);
        item.quantity = draft.quantity;

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(HARDWARE_KEY, &self.items),
            Backend::Remote(remote) => {
                hardware::update(&remote.db, &remote.user.id, id, &draft).await
            }
        };
        settle(&mut self.items, snapshot, outcome, "update hardware")
    }

    /// Deletes an item. Reservations pointing at it are left in place.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, id: &str) -> Result<Hardware> {
        let index = position(&self.items, id, "hardware", |h| h.id.as_str())?;
        let snapshot = self.items.clone();
        let removed = self.items.remove(index);

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(HARDWARE_KEY, &self.items),
            Backend::Remote(remote) => hardware::delete(&remote.db, &remote.user.id, id).await,
        };
        settle(&mut self.items, snapshot, outcome, "delete hardware")?;
        Ok(removed)
    }

    /// Swaps in `items` wholesale.
    pub async fn replace_all(&mut self, items: Vec<Hardware>) -> Result<()> {
        let snapshot = std::mem::replace(&mut self.items, items);
        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(HARDWARE_KEY, &self.items),
            Backend::Remote(remote) => {
                hardware::replace_all(&remote.db, &remote.user.id, &self.items).await
            }
        };
        settle(&mut self.items, snapshot, outcome, "restore hardware")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{ReservationDraft, ReservationStatus},
        test_utils::*,
    };

    fn reservation(hardware: &Hardware, quantity: u32, status: ReservationStatus) -> Reservation {
        ReservationDraft {
            hardware_id: hardware.id.clone(),
            participant_id: "p1".to_string(),
            quantity,
            status,
        }
        .into_reservation()
    }

    #[tokio::test]
    async fn test_inventory_counts() -> Result<()> {
        let mut inventory = HardwareInventory::load(remote_backend().await?).await?;
        let arduino = inventory.add(hardware_draft("Arduino", 5)).await?;
        let pi = inventory.add(hardware_draft("Raspberry Pi", 2)).await?;

        let reservations = vec![
            reservation(&arduino, 3, ReservationStatus::Approved),
            reservation(&pi, 2, ReservationStatus::Pending),
            reservation(&arduino, 1, ReservationStatus::Returned),
        ];

        assert_eq!(inventory.total_items(), 7);
        assert_eq!(inventory.total_available(&reservations), 2);
        assert_eq!(inventory.available(&arduino.id, &reservations), Some(2));
        assert_eq!(inventory.available("missing", &reservations), None);

        let in_stock = inventory.in_stock(&reservations);
        assert_eq!(in_stock.len(), 1);
        assert_eq!(in_stock[0].id, arduino.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_edit_below_reserved_reads_zero() -> Result<()> {
        let mut inventory = HardwareInventory::load(remote_backend().await?).await?;
        let arduino = inventory.add(hardware_draft("Arduino", 5)).await?;
        let reservations = vec![reservation(&arduino, 4, ReservationStatus::Approved)];

        inventory.edit(&arduino.id, hardware_draft("Arduino Uno", 2)).await?;
        assert_eq!(inventory.available(&arduino.id, &reservations), Some(0));
        assert_eq!(inventory.items()[0].name, "Arduino Uno");

        Ok(())
    }

    #[tokio::test]
    async fn test_validation() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut inventory = HardwareInventory::load(local_backend(dir.path())).await?;

        assert!(matches!(
            inventory.add(hardware_draft("Arduino", 0)).await,
            Err(Error::Validation { .. })
        ));
        assert!(inventory.add(hardware_draft("  ", 3)).await.is_err());
        assert!(matches!(
            inventory.edit("missing", hardware_draft("Arduino", 1)).await,
            Err(Error::NotFound { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_remote_delete_rolls_back() -> Result<()> {
        let item = hardware_draft("Arduino", 5).into_hardware();
        let mut inventory = HardwareInventory {
            items: vec![item.clone()],
            backend: failing_remote_backend(),
        };

        assert!(inventory.remove(&item.id).await.is_err());
        assert_eq!(inventory.items().to_vec(), vec![item]);

        Ok(())
    }
}
