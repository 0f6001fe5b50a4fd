//! Backup Discord commands - the `backup` group.
//!
//! Export sends every planner section as a JSON attachment. Import reads such
//! an attachment back, shows what it holds, and only replaces the current
//! planner when rerun with `confirm`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::respond},
        core::backup::parse_backup,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    /// Parent command for backups.
    #[poise::command(slash_command, subcommands("backup_export", "backup_import"))]
    pub async fn backup(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Backup commands. Available subcommands:\n\
            `/backup export` - Download everything as a JSON file\n\
            `/backup import` - Replace everything with a backup file";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Downloads every section as a JSON backup file.
    #[poise::command(slash_command, rename = "export")]
    pub async fn backup_export(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = ctx.data().session(ctx.author()).await?;
        let backup = session.lock().await.export();
        let json = backup.to_json_pretty()?;
        let file_name = backup.file_name();
        info!("Exported {} records to {file_name}", backup.record_count());

        let reply = poise::CreateReply::default()
            .content(format!(
                "💾 Backup of {} records. Keep this file safe!",
                backup.record_count()
            ))
            .attachment(serenity::CreateAttachment::bytes(json.into_bytes(), file_name));
        ctx.send(reply).await?;
        Ok(())
    }

    /// Replaces every section with the contents of a backup file.
    #[poise::command(slash_command, rename = "import")]
    pub async fn backup_import(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Backup file from /backup export"] file: serenity::Attachment,
        #[description = "Set to true to replace all current data"] confirm: Option<bool>,
    ) -> Result<()> {
        ctx.defer().await?;
        let bytes = file.download().await?;

        let outcome = async {
            let contents = String::from_utf8(bytes).map_err(|_| Error::InvalidBackup {
                message: "Failed to parse backup file".to_string(),
            })?;
            let backup = parse_backup(&contents)?;
            let d = &backup.data;
            let summary = format!(
                "**{}** (version {}, exported {}):\n\
                {} todos, {} budget entries, {} hardware items, \
                {} participants, {} reservations, {} teams",
                file.filename,
                backup.version,
                backup.exported_at.format("%Y-%m-%d %H:%M UTC"),
                d.todos.len(),
                d.budget.len(),
                d.hardware.len(),
                d.participants.len(),
                d.reservations.len(),
                d.teams.len()
            );

            if !confirm.unwrap_or(false) {
                return Ok(format!(
                    "{summary}\n\n⚠️ Importing replaces **all** current data. \
                    Run `/backup import` again with `confirm: true` to continue."
                ));
            }

            let session = ctx.data().session(ctx.author()).await?;
            session.lock().await.restore(backup).await?;
            Ok::<_, Error>(format!("✅ Restored {summary}"))
        }
        .await;
        respond(ctx, outcome).await
    }
}

// Re-export all commands
pub use inner::*;
