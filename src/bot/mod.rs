//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `HackathonBuddy` planner,
//! including all slash commands, autocomplete handlers, the per-user session
//! registry and the framework setup.

/// Discord command implementations (todo, budget, hardware, roster, reservations, backup)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::planner::PlannerConfig,
    errors::{Error, Result},
    models::CurrentUser,
    planner::Planner,
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, OnceCell};
use tracing::{error, info, instrument};

/// One user's loaded planner, locked for the duration of each command.
pub type Session = Arc<Mutex<Planner>>;

/// A user's session, filled in by the first command that needs it.
type Slot = Arc<OnceCell<Session>>;

/// Shared data available to all bot commands.
/// This structure holds the database connection, the planner settings and the
/// open planner sessions keyed by Discord user id.
pub struct BotData {
    /// Database connection for remote sections
    pub database: Arc<DatabaseConnection>,
    /// Planner settings (storage selection, categories, palette)
    pub config: Arc<PlannerConfig>,
    sessions: Mutex<HashMap<String, Slot>>,
}

impl BotData {
    /// Creates a new `BotData` with no open sessions.
    #[must_use]
    pub fn new(database: Arc<DatabaseConnection>, config: Arc<PlannerConfig>) -> Self {
        Self {
            database,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the author's planner, loading it on first use.
    pub async fn session(&self, author: &serenity::User) -> Result<Session> {
        self.session_for(CurrentUser::new(author.id.to_string(), author.name.clone()))
            .await
    }

    /// Returns the planner for `user`, loading it on first use.
    ///
    /// Every later command by the same user reuses the loaded lists, so state
    /// only round-trips through storage on writes. The registry lock is held
    /// only to find the user's slot; concurrent first commands by one user
    /// share a single load, and a failed load is retried by the next command.
    pub async fn session_for(&self, user: CurrentUser) -> Result<Session> {
        let slot = {
            let mut sessions = self.sessions.lock().await;
            Arc::clone(sessions.entry(user.id.clone()).or_default())
        };

        slot.get_or_try_init(|| async move {
            let planner = Planner::load(Arc::clone(&self.database), user, &self.config).await?;
            Ok::<_, Error>(Arc::new(Mutex::new(planner)))
        })
        .await
        .map(Arc::clone)
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Connects to Discord and serves commands until the client stops.
#[instrument(skip_all)]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
