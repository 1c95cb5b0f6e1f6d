//! Combatant state
//!
//! Everything a single fighter carries: identity, position, warmth, armor
//! padding, resource economy, skill bar, cast state, active conditions, and
//! strike (auto-attack) bookkeeping. Baseline stats come from a per-school
//! table, same shape for every school so balance tweaks are one match arm.

use glam::Vec3;

use super::casting::CastingState;
use super::conditions::{ActiveConditions, CozyKind};
use super::constants::WARMTH_PER_PIP_PER_SEC;
use super::economy::{ResourceEconomy, School};
use super::skillbar::SkillBar;

/// What applying one hit to a combatant actually did.
#[derive(Clone, Copy, Debug)]
pub struct DamageApplied {
    /// Damage that reached the warmth pool after interception. When death
    /// prevention fires, this is what the hit would have dealt.
    pub intended: f32,
    /// Warmth actually lost.
    pub lost: f32,
    /// True when Last Ember turned a lethal hit into survival.
    pub prevented_death: bool,
}

/// Loose combat role tag. Purely descriptive; no rule reads it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Role {
    Skirmisher,
    Warden,
    Mender,
}

/// Health pool with passive regeneration pips. Pips can be negative
/// (degeneration); regen stops at zero warmth, the dead stay dead.
#[derive(Clone, Debug)]
pub struct WarmthPool {
    pub current: f32,
    pub maximum: f32,
    /// Regeneration pips; warmth changes by `pips * 2.0` per second.
    pub pips: i8,
}

impl WarmthPool {
    pub fn new(maximum: f32, pips: i8) -> Self {
        Self {
            current: maximum,
            maximum,
            pips,
        }
    }

    pub fn fraction(&self) -> f32 {
        if self.maximum > 0.0 {
            self.current / self.maximum
        } else {
            0.0
        }
    }

    /// Tick passive regen/degen. A pool at zero never regenerates.
    pub fn update(&mut self, dt_secs: f32) {
        if self.current <= 0.0 {
            return;
        }
        self.current = (self.current + self.pips as f32 * WARMTH_PER_PIP_PER_SEC * dt_secs)
            .clamp(0.0, self.maximum);
    }
}

#[derive(Clone, Debug)]
pub struct Combatant {
    pub id: super::CombatantId,
    pub name: String,
    pub team: u8,
    pub position: Vec3,
    pub school: School,
    pub role: Role,

    pub warmth: WarmthPool,
    /// Armor padding; feeds the `padding / (padding + 100)` reduction.
    pub padding: f32,
    pub move_speed: f32,

    pub economy: ResourceEconomy,
    pub bar: SkillBar,
    pub cast: CastingState,
    pub conditions: ActiveConditions,

    // === Strikes (auto-attacks) ===
    pub strike_damage: f32,
    /// Seconds between strikes.
    pub strike_interval: f32,
    pub strike_timer: f32,

    pub target: Option<super::CombatantId>,

    // === Match totals ===
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub healing_done: f32,
}

impl Combatant {
    /// Create a combatant with baseline stats for their school.
    pub fn new(id: super::CombatantId, team: u8, school: School, position: Vec3) -> Self {
        let (warmth_max, pips, padding, move_speed, strike_damage, strike_interval, role) =
            match school {
                School::Hearth => (220.0, 1, 60.0, 4.5, 8.0, 1.6, Role::Mender),
                School::Forge => (260.0, 0, 100.0, 4.0, 12.0, 1.8, Role::Warden),
                School::Wander => (200.0, 0, 70.0, 5.5, 9.0, 1.4, Role::Skirmisher),
                School::Pact => (240.0, 0, 50.0, 4.5, 10.0, 1.6, Role::Skirmisher),
                School::Cadence => (210.0, 0, 60.0, 5.0, 9.0, 1.2, Role::Skirmisher),
            };

        Self {
            id,
            name: format!("{} {}", school.name(), id),
            team,
            position,
            school,
            role,
            warmth: WarmthPool::new(warmth_max, pips),
            padding,
            move_speed,
            economy: ResourceEconomy::for_school(school),
            bar: SkillBar::new(),
            cast: CastingState::new(),
            conditions: ActiveConditions::new(),
            strike_damage,
            strike_interval,
            strike_timer: 0.0,
            target: None,
            damage_dealt: 0.0,
            damage_taken: 0.0,
            healing_done: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.warmth.current > 0.0
    }

    /// Effective armor after active-effect multipliers.
    pub fn effective_padding(&self) -> f32 {
        (self.padding * self.conditions.armor_multiplier()).max(0.0)
    }

    /// Movement speed after chills and effects.
    pub fn effective_move_speed(&self) -> f32 {
        self.move_speed
            * self.conditions.chill_move_multiplier()
            * self.conditions.move_speed_multiplier()
    }

    /// Subtract post-pipeline damage, running the bearer-side hooks in
    /// order: Eiderdown interception halves it first, then Last Ember turns
    /// a lethal hit into survival at 1.0 warmth (consuming the cozy).
    pub fn apply_damage(&mut self, amount: f32) -> DamageApplied {
        let mut incoming = amount;
        if self.conditions.has_cozy(CozyKind::Eiderdown) {
            incoming *= 0.5;
        }

        let before = self.warmth.current;
        let mut after = before - incoming;
        let mut prevented_death = false;
        if after <= 0.0 && self.conditions.consume_cozy(CozyKind::LastEmber) {
            after = 1.0;
            prevented_death = true;
        }
        self.warmth.current = after.max(0.0);

        let lost = before - self.warmth.current;
        self.damage_taken += lost;
        DamageApplied {
            intended: incoming,
            lost,
            prevented_death,
        }
    }

    /// Add healing, clamped to maximum warmth. Returns the warmth actually
    /// restored. Healing cannot raise the dead.
    pub fn apply_healing(&mut self, amount: f32) -> f32 {
        if !self.is_alive() {
            return 0.0;
        }
        let before = self.warmth.current;
        self.warmth.current = (before + amount).min(self.warmth.maximum);
        self.warmth.current - before
    }

    /// Invariant checks, compiled out of release builds.
    pub fn debug_validate(&self) {
        debug_assert!(self.warmth.current >= 0.0, "warmth must not go negative");
        debug_assert!(
            self.warmth.current <= self.warmth.maximum,
            "warmth must not exceed its maximum"
        );
        debug_assert!(self.padding >= 0.0, "padding must not go negative");
        debug_assert!(
            self.economy.pool.current >= 0.0,
            "energy must not go negative"
        );
        debug_assert!(
            self.cast.cooldowns.iter().all(|c| *c >= 0.0),
            "cooldowns must not go negative"
        );
    }
}
