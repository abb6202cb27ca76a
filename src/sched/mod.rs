//! Simulation clock module
//!
//! Pure tick arithmetic, independent of any host:
//! - Fixed step only; the clock moves in whole tick lengths
//! - Owed ticks are never dropped, only deferred
//! - No rendering or platform dependencies beyond the collaborator traits

pub mod state;
pub mod tick;

pub use state::SchedulerState;
pub use tick::{advance, ticks_owed};
