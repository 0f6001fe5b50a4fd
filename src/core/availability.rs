//! Hardware availability arithmetic.
//!
//! Available units = total quantity minus the units held by active (pending or
//! approved) reservations of that item. The result saturates at zero when the
//! quantity was edited below what is already reserved.

use crate::{
    errors::{Error, Result},
    models::{Hardware, Reservation},
};

/// Units held by active reservations of `hardware_id`, skipping `excluding`.
#[must_use]
pub fn reserved_units(hardware_id: &str, reservations: &[Reservation], excluding: Option<&str>) -> u32 {
    reservations
        .iter()
        .filter(|r| r.hardware_id == hardware_id && r.status.is_active())
        .filter(|r| excluding != Some(r.id.as_str()))
        .fold(0_u32, |sum, r| sum.saturating_add(r.quantity))
}

/// Units of `hardware` not held by any active reservation.
#[must_use]
pub fn available_units(hardware: &Hardware, reservations: &[Reservation]) -> u32 {
    hardware
        .quantity
        .saturating_sub(reserved_units(&hardware.id, reservations, None))
}

/// Units free for one reservation, counting that reservation's own units as free.
///
/// Used when editing or approving an existing reservation.
#[must_use]
pub fn available_excluding(hardware: &Hardware, reservations: &[Reservation], reservation_id: &str) -> u32 {
    hardware
        .quantity
        .saturating_sub(reserved_units(&hardware.id, reservations, Some(reservation_id)))
}

/// Rejects a request for `requested` units that availability cannot cover.
///
/// `excluding` names a reservation being edited so its current units count as free.
pub fn check_request(
    hardware: &Hardware,
    reservations: &[Reservation],
    requested: u32,
    excluding: Option<&str>,
) -> Result<()> {
    let available = excluding.map_or_else(
        || available_units(hardware, reservations),
        |id| available_excluding(hardware, reservations, id),
    );

    if requested > available {
        return Err(Error::InsufficientHardware {
            hardware: hardware.name.clone(),
            requested,
            available,
        });
    }
    Ok(())
}
