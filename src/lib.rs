//! Frostbound - deterministic skill-combat resolution engine
//!
//! A fixed-tick combat core for a winterbound arena game: eight-slot skill
//! bars, five school resource economies, a condition registry of chills and
//! cozies, a staged damage pipeline, and a headless runner for seeded,
//! reproducible balance matches.

pub mod cli;
pub mod combat;
pub mod headless;

pub use combat::{Combatant, Encounter, GameRng, Intent, SkillBook, SkillId};
