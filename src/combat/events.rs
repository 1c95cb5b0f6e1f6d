//! Combat events
//!
//! Plain data records the orchestrator emits while resolving a tick. The
//! combat core never consumes them; a frontend (or the headless runner)
//! drains the queues after each tick. Dropping them on the floor is always
//! safe.

use glam::Vec3;

use super::CombatantId;

/// What produced a damage event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    /// Basic strike (auto-attack)
    Strike,
    /// A skill from the bar
    Skill,
}

/// Events that occur during combat, for logging and frontends.
#[derive(Debug, Clone)]
pub enum CombatEvent {
    /// A skill finished activating and its effects were applied
    SkillCast {
        caster: CombatantId,
        target: Option<CombatantId>,
        skill_name: String,
        /// Energy actually deducted (after cost multipliers)
        adjusted_cost: f32,
    },
    /// Damage was dealt (post-mitigation; a death-prevented hit reports
    /// the damage it would have dealt)
    Damage {
        caster: CombatantId,
        target: CombatantId,
        amount: f32,
        kind: DamageKind,
        missed: bool,
        blocked: bool,
    },
    /// Healing was done
    Healing {
        caster: CombatantId,
        target: CombatantId,
        amount: f32,
    },
    /// A chill, cozy, or effect landed
    ConditionApplied {
        caster: CombatantId,
        target: CombatantId,
        condition_name: &'static str,
    },
    /// An in-progress activation was cut short
    Interrupted { caster: CombatantId },
    /// A combatant's warmth reached zero
    Death {
        victim: CombatantId,
        killer: Option<CombatantId>,
    },
}

/// Presentation hints for a frontend. The core emits these fire-and-forget;
/// nothing reads them back.
#[derive(Debug, Clone)]
pub enum VfxRequest {
    Projectile {
        start: Vec3,
        end: Vec3,
        caster: CombatantId,
        target: CombatantId,
    },
    DamageNumber {
        position: Vec3,
        amount: f32,
        blocked: bool,
    },
    HealMarker {
        position: Vec3,
        amount: f32,
    },
    ImpactMarker {
        position: Vec3,
    },
}
