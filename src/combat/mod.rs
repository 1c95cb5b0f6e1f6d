//! Deterministic skill-combat core
//!
//! Fixed-tick, single-threaded combat resolution: skill bars, cast states,
//! the condition registry, five school resource economies, the staged damage
//! pipeline, and the orchestrator that ties them together. Everything
//! randomized draws from one seeded stream, so a seeded encounter replays
//! identically.

pub mod casting;
pub mod combatant;
pub mod conditions;
pub mod constants;
pub mod economy;
pub mod encounter;
pub mod events;
pub mod log;
pub mod pipeline;
pub mod rng;
pub mod skillbar;
pub mod skills;
pub mod terrain;

/// Stable identity of a combatant within an encounter.
pub type CombatantId = u32;

pub use combatant::Combatant;
pub use encounter::{CastAttempt, Encounter, Intent, MovementIntent};
pub use rng::GameRng;
pub use skills::{load_skill_book, SkillBook, SkillId};
