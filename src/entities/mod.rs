//! Entity module - Contains all SeaORM entity definitions for the planner tables.
//! Every table except `decisions` carries a `user_id` column; decisions are
//! scoped through their owning todo.

/// Budget income and expense rows
pub mod budget_entry;
/// Decisions recorded against todos
pub mod decision;
/// Hardware inventory items
pub mod hardware;
/// Event participants
pub mod participant;
/// Hardware lent to participants
pub mod reservation;
/// Participant teams
pub mod team;
/// Planning todos
pub mod todo;

// Re-export specific types to avoid conflicts
pub use budget_entry::{
    Column as BudgetEntryColumn, Entity as BudgetEntry, Model as BudgetEntryModel,
};
pub use decision::{Column as DecisionColumn, Entity as Decision, Model as DecisionModel};
pub use hardware::{Column as HardwareColumn, Entity as Hardware, Model as HardwareModel};
pub use participant::{
    Column as ParticipantColumn, Entity as Participant, Model as ParticipantModel,
};
pub use reservation::{
    Column as ReservationColumn, Entity as Reservation, Model as ReservationModel,
};
pub use team::{Column as TeamColumn, Entity as Team, Model as TeamModel};
pub use todo::{Column as TodoColumn, Entity as Todo, Model as TodoModel};
