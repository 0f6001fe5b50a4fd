//! Reservation Discord commands - the `reservation` group.
//!
//! Lending hardware to participants. New reservations are approved straight
//! away unless `pending` is set; both states hold units until the hardware is
//! returned.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::{resolve, respond},
            handlers::autocomplete,
        },
        errors::{Error, Result},
        models::{ReservationDraft, ReservationStatus},
        planner::{Planner, reservations},
    };
    use poise::serenity_prelude as serenity;

    fn reservation_id(planner: &Planner, key: &str) -> Result<String> {
        planner
            .reservations
            .find(key.trim())
            .map(|r| r.id.clone())
            .ok_or_else(|| Error::not_found("reservation", key.trim()))
    }

    /// Parent command for hardware reservations.
    #[poise::command(
        slash_command,
        subcommands(
            "reservation_create",
            "reservation_approve",
            "reservation_return",
            "reservation_edit",
            "reservation_delete",
            "reservation_list"
        )
    )]
    pub async fn reservation(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Reservation commands. Available subcommands:\n\
            `/reservation create` - Lend hardware to a participant\n\
            `/reservation approve` - Approve a pending reservation\n\
            `/reservation return` - Mark hardware as returned\n\
            `/reservation edit` - Change the reserved quantity\n\
            `/reservation delete` - Delete a reservation\n\
            `/reservation list` - Show reservations, optionally by status";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Lends units of an item to a participant.
    #[poise::command(slash_command, rename = "create")]
    pub async fn reservation_create(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Hardware to lend"]
        #[autocomplete = "autocomplete::autocomplete_hardware"]
        hardware: String,
        #[description = "Participant receiving it"]
        #[autocomplete = "autocomplete::autocomplete_participant"]
        participant: String,
        #[description = "Units to lend"]
        #[min = 1]
        quantity: u32,
        #[description = "Leave pending instead of approving now"] pending: Option<bool>,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let item = resolve(
                planner.hardware.items(),
                &hardware,
                "hardware",
                |h| h.id.as_str(),
                |h| h.name.as_str(),
            )?
            .clone();
            let person = resolve(
                planner.roster.participants(),
                &participant,
                "participant",
                |p| p.id.as_str(),
                |p| p.name.as_str(),
            )?
            .clone();
            let status = if pending.unwrap_or(false) {
                ReservationStatus::Pending
            } else {
                ReservationStatus::Approved
            };

            let created = planner
                .reserve(ReservationDraft {
                    hardware_id: item.id.clone(),
                    participant_id: person.id,
                    quantity,
                    status,
                })
                .await?;
            let planner = &*planner;
            let free = planner
                .hardware
                .available(&item.id, planner.reservations.reservations())
                .unwrap_or(0);
            Ok::<_, Error>(format!(
                "✅ Reserved {} × **{}** for **{}** ({}). {free} of {} left.",
                created.quantity, item.name, person.name, created.status, item.quantity
            ))
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Approves a pending reservation.
    #[poise::command(slash_command, rename = "approve")]
    pub async fn reservation_approve(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Pending reservation"]
        #[autocomplete = "autocomplete::autocomplete_reservation"]
        reservation: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let id = reservation_id(&planner, &reservation)?;
            planner.approve_reservation(&id).await?;
            Ok::<_, Error>("✅ Reservation approved.".to_string())
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Marks a reservation's hardware as returned.
    #[poise::command(slash_command, rename = "return")]
    pub async fn reservation_return(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Reservation being returned"]
        #[autocomplete = "autocomplete::autocomplete_reservation"]
        reservation: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let id = reservation_id(&planner, &reservation)?;
            planner.reservations.return_hardware(&id).await?;
            Ok::<_, Error>("📦 Hardware returned.".to_string())
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Changes how many units a reservation holds.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn reservation_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Reservation to change"]
        #[autocomplete = "autocomplete::autocomplete_reservation"]
        reservation: String,
        #[description = "New quantity"]
        #[min = 1]
        quantity: u32,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let id = reservation_id(&planner, &reservation)?;
            planner.edit_reservation(&id, quantity).await?;
            Ok::<_, Error>(format!("✅ Reservation now holds {quantity} unit(s)."))
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Deletes a reservation.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn reservation_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Reservation to delete"]
        #[autocomplete = "autocomplete::autocomplete_reservation"]
        reservation: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let id = reservation_id(&planner, &reservation)?;
            planner.reservations.remove(&id).await?;
            Ok::<_, Error>("🗑️ Reservation deleted.".to_string())
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Status filter offered in the command picker.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum StatusFilter {
        Pending,
        Approved,
        Returned,
    }

    impl From<StatusFilter> for ReservationStatus {
        fn from(filter: StatusFilter) -> Self {
            match filter {
                StatusFilter::Pending => Self::Pending,
                StatusFilter::Approved => Self::Approved,
                StatusFilter::Returned => Self::Returned,
            }
        }
    }

    /// Shows reservations with hardware and participant names.
    #[poise::command(slash_command, rename = "list")]
    pub async fn reservation_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only reservations in this state"] status: Option<StatusFilter>,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let planner = session.lock().await;
        let hardware = planner.hardware.items();
        let participants = planner.roster.participants();
        let wanted: Option<ReservationStatus> = status.map(Into::into);

        let fields: Vec<(String, String, bool)> = planner
            .reservations
            .reservations()
            .iter()
            .filter(|r| wanted.is_none_or(|s| r.status == s))
            .take(25)
            .map(|r| {
                let mark = match r.status {
                    ReservationStatus::Pending => "⏳",
                    ReservationStatus::Approved => "✅",
                    ReservationStatus::Returned => "📦",
                };
                (
                    format!(
                        "{mark} {} × {}",
                        r.quantity,
                        reservations::hardware_name(hardware, &r.hardware_id)
                    ),
                    format!(
                        "{} ({})\nSince {}",
                        reservations::participant_name(participants, &r.participant_id),
                        r.status,
                        r.created_at.format("%Y-%m-%d %H:%M")
                    ),
                    true,
                )
            })
            .collect();

        if fields.is_empty() {
            drop(planner);
            ctx.say("No reservations found. Use `/reservation create` to lend hardware!")
                .await?;
            return Ok(());
        }

        let embed = serenity::CreateEmbed::default()
            .title("**Hardware Reservations**")
            .color(0x00EB_459E)
            .fields(fields);
        drop(planner);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
