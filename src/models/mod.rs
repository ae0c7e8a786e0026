//! Core data models for battle records and analytics.

mod battle;
mod battle_type;
mod deck;
mod player;
mod stats;

pub use battle::*;
pub use battle_type::*;
pub use deck::*;
pub use player::*;
pub use stats::*;
