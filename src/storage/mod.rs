//! Local persistent storage for sections not kept in the remote table store.

/// JSON key/value files with optional migrators
pub mod local;

pub use local::{LocalStorage, Migrator, migrate_participants};

/// Storage key for todos
pub const TODOS_KEY: &str = "hackathon-todos";
/// Storage key for budget entries
pub const BUDGET_KEY: &str = "hackathon-budget";
/// Storage key for hardware
pub const HARDWARE_KEY: &str = "hackathon-hardware";
/// Storage key for participants
pub const PARTICIPANTS_KEY: &str = "hackathon-participants";
/// Storage key for reservations
pub const RESERVATIONS_KEY: &str = "hackathon-reservations";
/// Storage key for teams
pub const TEAMS_KEY: &str = "hackathon-teams";
