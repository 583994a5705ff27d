//! Turn-based fight resolution.
//!
//! `engine` owns the turn loop and produces [`events::CombatEvent`]s;
//! `render` turns those into log text.

pub mod damage;
pub mod engine;
pub mod events;
pub mod render;
pub mod rewards;
pub mod skills;
pub mod tier;
