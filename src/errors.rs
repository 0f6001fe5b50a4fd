//! Unified error types for `HackathonBuddy`.
//!
//! Every layer (store access, local storage, planner views, Discord commands)
//! reports failures through [`Error`], so commands can render a single message
//! and planner views can roll back on any of them.

use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Remote table store failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Local storage or filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Required environment variable is missing
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// User input was rejected before touching any state
    #[error("Invalid input: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// A referenced record does not exist in the current planner
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"todo"`
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// A reservation would push approved units past the hardware's quantity
    #[error("Only {available} of '{hardware}' available, {requested} requested")]
    InsufficientHardware {
        /// Hardware name
        hardware: String,
        /// Units asked for
        requested: u32,
        /// Units currently available
        available: u32,
    },

    /// A backup file failed shape validation
    #[error("{message}")]
    InvalidBackup {
        /// Message shown to the user
        message: String,
    },

    /// Formatting a reply failed
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Discord framework failure
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Whether the message is meant for the person who issued the command,
    /// as opposed to an internal failure that goes to the error handler.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::NotFound { .. }
                | Self::InsufficientHardware { .. }
                | Self::InvalidBackup { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
