//! Resource Economy
//!
//! Each combatant belongs to one of five schools. All of them spend from a
//! shared energy pool; four of them additionally track a school-specific
//! resource (grit, variety history, debt, rhythm charges). The school state
//! is one enum so every call site matches exhaustively and adding a school
//! is a compile-error sweep, not a runtime surprise.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::constants::{
    CADENCE_BEAT_MS, CADENCE_MAX_CHARGES, CADENCE_PERFECT_BONUS, CADENCE_PERFECT_WINDOW_MS,
    GRIT_BONUS_PER_STACK, GRIT_MAX, PACT_DEBT_BONUS, PACT_DEBT_DECAY_PER_SEC,
    PACT_MISSING_WARMTH_BONUS, VARIETY_BONUS_PER_KIND, VARIETY_HISTORY,
};
use super::skills::SkillKind;

/// The five schools of winter combat.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum School {
    /// Sustain and steady regeneration.
    Hearth,
    /// Small pool, slow regen, builds grit by landing hits.
    Forge,
    /// Rewards varying the kinds of skills used.
    Wander,
    /// Can overspend into debt, hits harder while hurt or indebted.
    Pact,
    /// Banks rhythm charges on a fixed beat, rewards on-beat casts.
    Cadence,
}

impl School {
    pub fn name(&self) -> &'static str {
        match self {
            School::Hearth => "Hearth",
            School::Forge => "Forge",
            School::Wander => "Wander",
            School::Pact => "Pact",
            School::Cadence => "Cadence",
        }
    }

    pub fn parse(s: &str) -> Option<School> {
        match s.to_ascii_lowercase().as_str() {
            "hearth" => Some(School::Hearth),
            "forge" => Some(School::Forge),
            "wander" => Some(School::Wander),
            "pact" => Some(School::Pact),
            "cadence" => Some(School::Cadence),
            _ => None,
        }
    }
}

/// Shared energy pool.
#[derive(Clone, Debug)]
pub struct EnergyPool {
    pub current: f32,
    pub maximum: f32,
    pub regen_per_sec: f32,
}

/// School-specific resource state.
#[derive(Clone, Debug)]
pub enum SchoolState {
    Hearth,
    Forge {
        grit: u8,
    },
    Wander {
        /// Most recent skill kinds used, oldest first.
        recent: SmallVec<[SkillKind; VARIETY_HISTORY]>,
    },
    Pact {
        /// Energy overspent past zero; decays toward zero over time.
        debt: f32,
    },
    Cadence {
        charges: u8,
        /// Milliseconds elapsed since the last beat.
        since_beat_ms: f32,
        /// Charges consumed by the most recent cast (for flat rhythm bonuses).
        last_consumed: u8,
    },
}

/// A combatant's full resource state: energy pool plus school resource.
#[derive(Clone, Debug)]
pub struct ResourceEconomy {
    pub pool: EnergyPool,
    pub state: SchoolState,
}

impl ResourceEconomy {
    /// Baseline pool stats per school.
    pub fn for_school(school: School) -> Self {
        let (maximum, regen_per_sec) = match school {
            School::Hearth => (45.0, 1.5),
            School::Forge => (30.0, 0.66),
            School::Wander => (40.0, 1.33),
            School::Pact => (50.0, 1.0),
            School::Cadence => (35.0, 1.0),
        };
        let state = match school {
            School::Hearth => SchoolState::Hearth,
            School::Forge => SchoolState::Forge { grit: 0 },
            School::Wander => SchoolState::Wander {
                recent: SmallVec::new(),
            },
            School::Pact => SchoolState::Pact { debt: 0.0 },
            School::Cadence => SchoolState::Cadence {
                charges: 0,
                since_beat_ms: 0.0,
                last_consumed: 0,
            },
        };
        Self {
            pool: EnergyPool {
                current: maximum,
                maximum,
                regen_per_sec,
            },
            state,
        }
    }

    /// Pool ceiling after school penalties. Pact debt shrinks the usable
    /// pool until it decays.
    pub fn effective_max(&self) -> f32 {
        match &self.state {
            SchoolState::Pact { debt } => (self.pool.maximum - debt).max(0.0),
            _ => self.pool.maximum,
        }
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.pool.current >= cost
    }

    /// Spend energy. On an unaffordable cost nothing changes and this
    /// returns false.
    pub fn spend(&mut self, cost: f32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.pool.current -= cost;
        true
    }

    /// Grant energy, clamped to the effective maximum.
    pub fn grant(&mut self, amount: f32) {
        self.pool.current = (self.pool.current + amount).min(self.effective_max());
    }

    /// Take on Pact debt (credit-cost skills). No-op for other schools.
    pub fn add_debt(&mut self, amount: f32) {
        if let SchoolState::Pact { debt } = &mut self.state {
            *debt += amount;
            // Debt eats into the pool immediately if it overlaps current energy.
        }
        let max = self.effective_max();
        if self.pool.current > max {
            self.pool.current = max;
        }
    }

    pub fn grit(&self) -> u8 {
        match &self.state {
            SchoolState::Forge { grit } => *grit,
            _ => 0,
        }
    }

    pub fn debt(&self) -> f32 {
        match &self.state {
            SchoolState::Pact { debt } => *debt,
            _ => 0.0,
        }
    }

    pub fn rhythm_charges(&self) -> u8 {
        match &self.state {
            SchoolState::Cadence { charges, .. } => *charges,
            _ => 0,
        }
    }

    /// Charges consumed by the most recent cast.
    pub fn last_rhythm_consumed(&self) -> u8 {
        match &self.state {
            SchoolState::Cadence { last_consumed, .. } => *last_consumed,
            _ => 0,
        }
    }

    /// Spend grit stacks. Returns false (without mutation) when the caller
    /// asks for more than is banked.
    pub fn spend_grit(&mut self, cost: u8) -> bool {
        match &mut self.state {
            SchoolState::Forge { grit } => {
                if *grit < cost {
                    return false;
                }
                *grit -= cost;
                true
            }
            _ => cost == 0,
        }
    }

    /// Per-tick upkeep: energy regen, debt decay, beat advancement.
    pub fn update(&mut self, dt_secs: f32) {
        match &mut self.state {
            SchoolState::Hearth | SchoolState::Forge { .. } | SchoolState::Wander { .. } => {}
            SchoolState::Pact { debt } => {
                *debt = (*debt - PACT_DEBT_DECAY_PER_SEC * dt_secs).max(0.0);
            }
            SchoolState::Cadence {
                charges,
                since_beat_ms,
                ..
            } => {
                *since_beat_ms += dt_secs * 1000.0;
                while *since_beat_ms >= CADENCE_BEAT_MS {
                    *since_beat_ms -= CADENCE_BEAT_MS;
                    *charges = (*charges + 1).min(CADENCE_MAX_CHARGES);
                }
            }
        }
        let max = self.effective_max();
        self.pool.current = (self.pool.current + self.pool.regen_per_sec * dt_secs).min(max);
    }

    /// Hook fired when a skill completes. Feeds the Wander variety history
    /// and consumes rhythm charges.
    pub fn on_skill_use(&mut self, kind: SkillKind, rhythm_cost: u8) {
        match &mut self.state {
            SchoolState::Wander { recent } => {
                if recent.len() == VARIETY_HISTORY {
                    recent.remove(0);
                }
                recent.push(kind);
            }
            SchoolState::Cadence {
                charges,
                last_consumed,
                ..
            } => {
                let consumed = rhythm_cost.min(*charges);
                *charges -= consumed;
                *last_consumed = consumed;
            }
            _ => {}
        }
    }

    /// Hook fired when the owner lands a damaging hit. Forge banks grit.
    pub fn on_hit_landed(&mut self) {
        if let SchoolState::Forge { grit } = &mut self.state {
            *grit = (*grit + 1).min(GRIT_MAX);
        }
    }

    /// The school's contribution to the outgoing-damage multiplier, queried
    /// once per damaging skill at resolution time.
    pub fn offense_bonus(&self, warmth_fraction: f32) -> f32 {
        match &self.state {
            SchoolState::Hearth => 1.0,
            SchoolState::Forge { grit } => 1.0 + GRIT_BONUS_PER_STACK * *grit as f32,
            SchoolState::Wander { recent } => {
                let mut distinct: SmallVec<[SkillKind; VARIETY_HISTORY]> = SmallVec::new();
                for kind in recent {
                    if !distinct.contains(kind) {
                        distinct.push(*kind);
                    }
                }
                1.0 + VARIETY_BONUS_PER_KIND * distinct.len() as f32
            }
            SchoolState::Pact { debt } => {
                let debt_bonus = if *debt > 0.0 { PACT_DEBT_BONUS } else { 0.0 };
                let missing = (1.0 - warmth_fraction).clamp(0.0, 1.0);
                1.0 + debt_bonus + PACT_MISSING_WARMTH_BONUS * missing
            }
            SchoolState::Cadence { since_beat_ms, .. } => {
                if *since_beat_ms <= CADENCE_PERFECT_WINDOW_MS {
                    CADENCE_PERFECT_BONUS
                } else {
                    1.0
                }
            }
        }
    }
}
