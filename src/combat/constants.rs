//! Combat Constants
//!
//! Centralized location for magic numbers used throughout the combat system.
//! This makes it easier to tune balance and ensures consistency.

// ============================================================================
// Skill Bar & Conditions
// ============================================================================

/// Number of skill slots on a combatant's bar.
pub const BAR_SLOTS: usize = 8;

/// Fixed capacity of each active-condition array (chills, cozies, effects).
/// Inserting past this limit is a silent drop, never a reallocation; the cap
/// keeps the per-tick update loop allocation-free and bounds condition spam.
pub const CONDITION_CAPACITY: usize = 8;

/// Maximum stack intensity a single condition can accumulate.
pub const INTENSITY_CAP: u8 = u8::MAX;

// ============================================================================
// Damage Pipeline
// ============================================================================

/// Miss probability while the caster carries the Numb chill.
pub const NUMB_MISS_CHANCE: f32 = 0.5;

/// Armor soft-cap pivot: reduction = armor / (armor + ARMOR_PIVOT).
/// At armor == ARMOR_PIVOT the multiplier is exactly 0.5.
pub const ARMOR_PIVOT: f32 = 100.0;

/// Damage multiplier applied when a qualifying wall covers the target.
pub const COVER_MULTIPLIER: f32 = 0.4;

/// Minimum wall height that grants cover against direct-delivery skills.
pub const COVER_WALL_HEIGHT: f32 = 1.5;

/// Walls at or above this height block direct-delivery casts entirely.
pub const BLOCKING_WALL_HEIGHT: f32 = 3.0;

// ============================================================================
// School Resource Models
// ============================================================================

/// Maximum grit stacks a Forge combatant can hold.
pub const GRIT_MAX: u8 = 10;

/// Outgoing damage bonus per grit stack (Forge school rule).
pub const GRIT_BONUS_PER_STACK: f32 = 0.02;

/// How many recent skill kinds the Wander variety tracker remembers.
pub const VARIETY_HISTORY: usize = 6;

/// Outgoing damage bonus per distinct skill kind in the variety history.
pub const VARIETY_BONUS_PER_KIND: f32 = 0.04;

/// Flat bonus for a Pact combatant currently carrying debt.
pub const PACT_DEBT_BONUS: f32 = 0.05;

/// Pact bonus scaling with the fraction of warmth missing.
pub const PACT_MISSING_WARMTH_BONUS: f32 = 0.25;

/// Rate at which Pact debt decays, in energy per second.
pub const PACT_DEBT_DECAY_PER_SEC: f32 = 2.0;

/// Length of one Cadence beat in milliseconds.
pub const CADENCE_BEAT_MS: f32 = 2000.0;

/// Window after each beat in which a cast counts as perfectly timed.
pub const CADENCE_PERFECT_WINDOW_MS: f32 = 250.0;

/// Offensive multiplier for a perfectly timed Cadence cast.
pub const CADENCE_PERFECT_BONUS: f32 = 1.25;

/// Maximum rhythm charges a Cadence combatant can bank.
pub const CADENCE_MAX_CHARGES: u8 = 4;

// ============================================================================
// Warmth
// ============================================================================

/// Warmth restored (or drained) per regeneration pip per second.
pub const WARMTH_PER_PIP_PER_SEC: f32 = 2.0;

// ============================================================================
// Strikes (auto-attacks)
// ============================================================================

/// Reach of a basic strike in world units.
pub const STRIKE_RANGE: f32 = 2.5;

// ============================================================================
// Timing
// ============================================================================

/// Default fixed tick length for headless simulation, in milliseconds.
pub const DEFAULT_TICK_MS: f32 = 50.0;
