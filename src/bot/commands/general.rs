//! General Discord commands - ping and help.
//! This module contains simple commands that don't touch any planner state.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**HackathonBuddy Help**\n\
        Everything you plan is private to you.\n\n\
        **Planning**\n\
        • `/todo <add|list|done|rename|delete>` - Manage the event todo list.\n\
        • `/todo <decide|decision_edit|decision_delete>` - Record decisions on a todo.\n\
        • `/budget <add|edit|delete|summary>` - Track income and expenses.\n\n\
        **People**\n\
        • `/participant <add|edit|delete|checkin|assign|list|skills>` - Manage participants.\n\
        • `/team <add|edit|delete|list>` - Manage teams.\n\n\
        **Hardware**\n\
        • `/hardware <add|edit|delete|list>` - Manage the hardware inventory.\n\
        • `/reservation <create|approve|return|edit|delete|list>` - Lend hardware to participants.\n\n\
        **Data**\n\
        • `/backup export` - Download everything as a JSON file.\n\
        • `/backup import <file> [confirm]` - Replace everything with a backup file.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
