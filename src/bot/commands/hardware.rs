//! Hardware Discord commands - the `hardware` group.

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
        models::HardwareDraft,
    };
    use poise::serenity_prelude as serenity;

    /// Parent command for the hardware inventory.
    #[poise::command(
        slash_command,
        subcommands("hardware_add", "hardware_edit", "hardware_delete", "hardware_list")
    )]
    pub async fn hardware(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Hardware commands. Available subcommands:\n\
            `/hardware add` - Add an item to the inventory\n\
            `/hardware edit` - Change an item\n\
            `/hardware delete` - Remove an item\n\
            `/hardware list` - Show the inventory with availability";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds an item to the inventory.
    #[poise::command(slash_command, rename = "add")]
    pub async fn hardware_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item name (e.g., 'Arduino Uno')"] name: String,
        #[description = "How many units the event owns"]
        #[min = 1]
        quantity: u32,
        #[description = "Optional notes"] description: Option<String>,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = {
            let mut planner = session.lock().await;
            planner
                .hardware
                .add(HardwareDraft {
                    name,
                    description: description.unwrap_or_default(),
                    quantity,
                })
                .await
                .map(|item| format!("✅ Added **{}** × {}.", item.quantity, item.name))
        };
        respond(ctx, outcome).await
    }

    /// Changes an item. Omitted fields keep their current value.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn hardware_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to change"]
        #[autocomplete = "autocomplete::autocomplete_hardware"]
        item: String,
        #[description = "New name"] name: Option<String>,
        #[description = "New total quantity"]
        #[min = 1]
        quantity: Option<u32>,
        #[description = "New notes"] description: Option<String>,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let current = resolve(
                planner.hardware.items(),
                &item,
                "hardware",
                |h| h.id.as_str(),
                |h| h.name.as_str(),
            )?;
            let id = current.id.clone();
            let draft = HardwareDraft {
                name: name.unwrap_or_else(|| current.name.clone()),
                description: description.unwrap_or_else(|| current.description.clone()),
                quantity: quantity.unwrap_or(current.quantity),
            };
            planner.hardware.edit(&id, draft).await?;

            let planner = &*planner;
            let free = planner
                .hardware
                .available(&id, planner.reservations.reservations())
                .unwrap_or(0);
            Ok::<_, Error>(format!("✅ Hardware updated, {free} unit(s) available."))
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Removes an item. Its reservations are kept and show as "Unknown".
    #[poise::command(slash_command, rename = "delete")]
    pub async fn hardware_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to remove"]
        #[autocomplete = "autocomplete::autocomplete_hardware"]
        item: String,
    ) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let outcome = async {
            let mut planner = session.lock().await;
            let id = resolve(
                planner.hardware.items(),
                &item,
                "hardware",
                |h| h.id.as_str(),
                |h| h.name.as_str(),
            )?
            .id
            .clone();
            let removed = planner.hardware.remove(&id).await?;
            Ok::<_, Error>(format!("🗑️ Removed **{}** from the inventory.", removed.name))
        }
        .await;
        respond(ctx, outcome).await
    }

    /// Shows every item with its available and total units.
    #[poise::command(slash_command, rename = "list")]
    pub async fn hardware_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let planner = session.lock().await;
        let inventory = &planner.hardware;
        let held = planner.reservations.reservations();

        if inventory.items().is_empty() {
            drop(planner);
            ctx.say("No hardware yet. Use `/hardware add` to add some!")
                .await?;
            return Ok(());
        }

        let fields: Vec<(String, String, bool)> = inventory
            .items()
            .iter()
            .take(25)
            .map(|item| {
                let free = inventory.available(&item.id, held).unwrap_or(0);
                let mut value = format!("{free} of {} available", item.quantity);
                if !item.description.is_empty() {
                    value = format!("{}\n{value}", item.description);
                }
                (item.name.clone(), value, true)
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("**Hardware Inventory**")
            .description(format!(
                "{} of {} units available",
                inventory.total_available(held),
                inventory.total_items()
            ))
            .color(0x00FE_E75C)
            .fields(fields);
        drop(planner);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
