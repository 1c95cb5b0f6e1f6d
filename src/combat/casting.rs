//! Cast State Machine
//!
//! Per-combatant casting state: idle, activating, or in aftercast lockout,
//! plus the per-slot cooldown array and the single-slot skill queue.
//!
//! The state machine only reports that an activation finished; it never
//! executes skill effects itself. The orchestrator receives the completion
//! signal, resolves the skill, and calls [`CastingState::complete_cast`] to
//! start the cooldown and aftercast. That split keeps all side effects in
//! one place and in one order.

use glam::Vec3;

use super::constants::BAR_SLOTS;
use super::skills::Skill;
use super::CombatantId;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CastPhase {
    Idle,
    Activating,
    Aftercast,
}

/// A skill use requested while busy, replayed when the caster frees up.
/// Only one is remembered; a newer request overwrites an older one.
#[derive(Clone, Copy, Debug)]
pub struct QueuedSkill {
    pub slot: usize,
    pub target: Option<CombatantId>,
}

/// An activation that just finished, reported to the orchestrator.
#[derive(Clone, Copy, Debug)]
pub struct CompletedCast {
    pub slot: usize,
    pub target: Option<CombatantId>,
    pub ground_point: Option<Vec3>,
}

#[derive(Clone, Debug)]
pub struct CastingState {
    pub phase: CastPhase,
    /// Bar slot of the skill being cast (valid while not Idle).
    pub skill_slot: usize,
    pub target: Option<CombatantId>,
    pub ground_point: Option<Vec3>,
    /// Seconds of activation left.
    pub activation_remaining: f32,
    /// Seconds of aftercast lockout left.
    pub aftercast_remaining: f32,
    /// Whether the current activation's completion signal was already emitted.
    fired: bool,
    pub queued: Option<QueuedSkill>,
    /// Remaining cooldown per bar slot, in seconds.
    pub cooldowns: [f32; BAR_SLOTS],
}

impl Default for CastingState {
    fn default() -> Self {
        Self {
            phase: CastPhase::Idle,
            skill_slot: 0,
            target: None,
            ground_point: None,
            activation_remaining: 0.0,
            aftercast_remaining: 0.0,
            fired: false,
            queued: None,
            cooldowns: [0.0; BAR_SLOTS],
        }
    }
}

impl CastingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.phase == CastPhase::Idle
    }

    pub fn is_activating(&self) -> bool {
        self.phase == CastPhase::Activating
    }

    pub fn cooldown(&self, slot: usize) -> f32 {
        self.cooldowns.get(slot).copied().unwrap_or(0.0)
    }

    /// Begin activating a skill. Fails (without any state change) unless the
    /// caster is idle.
    pub fn start_cast(&mut self, slot: usize, skill: &Skill, target: Option<CombatantId>) -> bool {
        if self.phase != CastPhase::Idle {
            return false;
        }
        self.phase = CastPhase::Activating;
        self.skill_slot = slot;
        self.target = target;
        self.ground_point = None;
        self.activation_remaining = skill.activation_ms / 1000.0;
        self.fired = false;
        true
    }

    /// Begin activating a ground-targeted skill.
    pub fn start_ground_cast(&mut self, slot: usize, skill: &Skill, point: Vec3) -> bool {
        if !self.start_cast(slot, skill, None) {
            return false;
        }
        self.ground_point = Some(point);
        true
    }

    /// Finish the current activation: start the slot's cooldown (shortened
    /// by any cooldown-reduction effects) and enter aftercast lockout.
    pub fn complete_cast(&mut self, skill: &Skill, cooldown_reduction: f32) {
        let slot = self.skill_slot;
        if slot < BAR_SLOTS {
            self.cooldowns[slot] =
                (skill.recharge_ms / 1000.0 * (1.0 - cooldown_reduction)).max(0.0);
        }
        self.aftercast_remaining = skill.aftercast_ms / 1000.0;
        self.phase = if self.aftercast_remaining > 0.0 {
            CastPhase::Aftercast
        } else {
            CastPhase::Idle
        };
        self.target = None;
        self.ground_point = None;
        self.activation_remaining = 0.0;
        self.fired = false;
    }

    /// Abort an in-progress activation. The slot's cooldown is untouched and
    /// no aftercast applies.
    pub fn cancel_cast(&mut self) {
        if self.phase == CastPhase::Activating {
            self.phase = CastPhase::Idle;
            self.target = None;
            self.ground_point = None;
            self.activation_remaining = 0.0;
            self.fired = false;
        }
    }

    /// An interruption from outside (the caster died, the target vanished).
    /// State effect is identical to cancelling.
    pub fn interrupt(&mut self) {
        self.cancel_cast();
    }

    /// Hard reset: drop the activation, the aftercast, and the queue.
    /// Cooldowns keep ticking as they were.
    pub fn force_idle(&mut self) {
        self.phase = CastPhase::Idle;
        self.target = None;
        self.ground_point = None;
        self.activation_remaining = 0.0;
        self.aftercast_remaining = 0.0;
        self.fired = false;
        self.queued = None;
    }

    /// Remember a skill use for when the caster frees up. A newer request
    /// overwrites an older one.
    pub fn queue_skill(&mut self, slot: usize, target: Option<CombatantId>) {
        self.queued = Some(QueuedSkill { slot, target });
    }

    pub fn clear_queue(&mut self) {
        self.queued = None;
    }

    pub fn take_queued(&mut self) -> Option<QueuedSkill> {
        self.queued.take()
    }

    /// True while a queued request is waiting on the caster to close range.
    pub fn is_approaching(&self) -> bool {
        self.queued.is_some()
    }

    /// Advance cooldowns and the activation/aftercast timers.
    ///
    /// Returns the completion signal when an activation finishes; the phase
    /// stays `Activating` until the orchestrator resolves the skill and
    /// calls [`complete_cast`] (or cancels).
    ///
    /// [`complete_cast`]: CastingState::complete_cast
    pub fn update(&mut self, dt_secs: f32) -> Option<CompletedCast> {
        for cooldown in self.cooldowns.iter_mut() {
            *cooldown = (*cooldown - dt_secs).max(0.0);
        }

        match self.phase {
            CastPhase::Idle => None,
            CastPhase::Activating => {
                self.activation_remaining -= dt_secs;
                if self.activation_remaining <= 0.0 && !self.fired {
                    self.fired = true;
                    Some(CompletedCast {
                        slot: self.skill_slot,
                        target: self.target,
                        ground_point: self.ground_point,
                    })
                } else {
                    None
                }
            }
            CastPhase::Aftercast => {
                self.aftercast_remaining -= dt_secs;
                if self.aftercast_remaining <= 0.0 {
                    self.phase = CastPhase::Idle;
                    self.aftercast_remaining = 0.0;
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::skills::{DeliveryKind, SkillKind, TargetKind};

    fn skill(activation_ms: f32, aftercast_ms: f32, recharge_ms: f32) -> Skill {
        Skill {
            name: "Test".to_string(),
            kind: SkillKind::Bolt,
            target: TargetKind::Enemy,
            delivery: DeliveryKind::Direct,
            activation_ms,
            aftercast_ms,
            recharge_ms,
            range: 20.0,
            energy_cost: 5.0,
            grit_cost: 0,
            credit_cost: 0.0,
            rhythm_cost: 0,
            warmth_sacrifice_pct: 0.0,
            base_damage: 10.0,
            base_healing: 0.0,
            soak: 0.0,
            bonus_target_below_half: 0.0,
            bonus_caster_above_half: 0.0,
            bonus_flat_per_rhythm: 0.0,
            applies_chills: vec![],
            applies_cozies: vec![],
            applies_effects: vec![],
            wall_height: 0.0,
            wall_length: 0.0,
            grants_energy: 0.0,
            elite: false,
        }
    }

    #[test]
    fn test_start_cast_fails_while_activating() {
        let mut cast = CastingState::new();
        let s = skill(1000.0, 0.0, 0.0);

        assert!(cast.start_cast(0, &s, Some(1)));
        let before = cast.clone();

        assert!(!cast.start_cast(1, &s, Some(2)));
        assert_eq!(cast.skill_slot, before.skill_slot, "Failed start must not mutate");
        assert_eq!(cast.target, before.target);
        assert_eq!(cast.activation_remaining, before.activation_remaining);
    }

    #[test]
    fn test_completion_is_a_signal_not_a_transition() {
        let mut cast = CastingState::new();
        let s = skill(100.0, 0.0, 0.0);
        cast.start_cast(2, &s, Some(7));

        let done = cast.update(0.2).expect("activation should finish");
        assert_eq!(done.slot, 2);
        assert_eq!(done.target, Some(7));
        assert_eq!(
            cast.phase,
            CastPhase::Activating,
            "Phase changes only when the orchestrator completes the cast"
        );

        // Signal fires once.
        assert!(cast.update(0.05).is_none());
    }

    #[test]
    fn test_complete_cast_starts_cooldown_and_aftercast() {
        let mut cast = CastingState::new();
        let s = skill(0.0, 750.0, 8000.0);
        cast.start_cast(3, &s, None);
        cast.update(0.05);

        cast.complete_cast(&s, 0.25);
        assert_eq!(cast.phase, CastPhase::Aftercast);
        assert!((cast.cooldowns[3] - 6.0).abs() < 1e-4, "8s cooldown at 25% reduction");
        assert!((cast.aftercast_remaining - 0.75).abs() < 1e-6);

        cast.update(1.0);
        assert!(cast.is_idle());
    }

    #[test]
    fn test_cancel_leaves_cooldown_unchanged() {
        let mut cast = CastingState::new();
        let s = skill(2000.0, 0.0, 5000.0);
        cast.start_cast(1, &s, Some(4));
        cast.update(0.5);

        cast.cancel_cast();
        assert!(cast.is_idle());
        assert_eq!(cast.cooldowns[1], 0.0, "Cancelled cast must not trigger cooldown");
    }

    #[test]
    fn test_cooldowns_never_go_negative() {
        let mut cast = CastingState::new();
        cast.cooldowns[0] = 0.3;
        cast.update(10.0);
        assert_eq!(cast.cooldowns[0], 0.0);
        for slot in 0..BAR_SLOTS {
            assert!(cast.cooldowns[slot] >= 0.0);
        }
    }

    #[test]
    fn test_queue_overwrites() {
        let mut cast = CastingState::new();
        cast.queue_skill(1, Some(2));
        cast.queue_skill(4, Some(9));
        assert!(cast.is_approaching());

        let queued = cast.take_queued().unwrap();
        assert_eq!(queued.slot, 4);
        assert_eq!(queued.target, Some(9));
        assert!(!cast.is_approaching());
        assert!(cast.take_queued().is_none());
    }

    #[test]
    fn test_clear_queue_drops_the_request() {
        let mut cast = CastingState::new();
        cast.queue_skill(2, Some(5));
        cast.clear_queue();
        assert!(!cast.is_approaching());
        assert!(cast.take_queued().is_none());
    }

    #[test]
    fn test_force_idle_drops_queue_but_not_cooldowns() {
        let mut cast = CastingState::new();
        let s = skill(1000.0, 0.0, 0.0);
        cast.cooldowns[5] = 2.5;
        cast.start_cast(0, &s, Some(1));
        cast.queue_skill(2, None);

        cast.force_idle();
        assert!(cast.is_idle());
        assert!(cast.queued.is_none());
        assert_eq!(cast.cooldowns[5], 2.5);
    }
}
