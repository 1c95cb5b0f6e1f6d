//! Skill Bar & Usability Validation
//!
//! Eight fixed slots, at most one elite skill equipped. Usability checks run
//! in a fixed priority order so a request that is wrong in several ways
//! always reports the same reason.

use super::casting::CastingState;
use super::constants::BAR_SLOTS;
use super::skills::{SkillBook, SkillId};

/// Why a skill use was (or wasn't) allowed. Checks run top to bottom; the
/// first failure wins.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SkillUsability {
    Usable,
    InvalidIndex,
    AlreadyCasting,
    OnCooldown,
    NoSkillEquipped,
    NotEnoughEnergy,
}

/// A combatant's equipped skills.
#[derive(Clone, Debug, Default)]
pub struct SkillBar {
    slots: [Option<SkillId>; BAR_SLOTS],
}

impl SkillBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bar from an ordered list of skills, left to right.
    pub fn from_skills(skills: &[SkillId]) -> Self {
        let mut bar = Self::new();
        for (slot, id) in skills.iter().enumerate().take(BAR_SLOTS) {
            bar.slots[slot] = Some(*id);
        }
        bar
    }

    pub fn slot(&self, index: usize) -> Option<SkillId> {
        self.slots.get(index).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<SkillId>; BAR_SLOTS] {
        &self.slots
    }

    /// True if any equipped skill is elite.
    pub fn has_elite(&self, book: &SkillBook) -> bool {
        self.slots
            .iter()
            .flatten()
            .any(|id| book.get_unchecked(*id).elite)
    }

    /// Equip a skill into a slot. Fails (leaving the bar unchanged) on an
    /// out-of-range slot, or when equipping a second elite. Replacing the
    /// bar's only elite with another elite in the same slot is allowed.
    pub fn equip(&mut self, index: usize, id: SkillId, book: &SkillBook) -> bool {
        if index >= BAR_SLOTS {
            return false;
        }
        if book.get_unchecked(id).elite {
            let other_elite = self
                .slots
                .iter()
                .enumerate()
                .any(|(slot, s)| {
                    slot != index && s.is_some_and(|other| book.get_unchecked(other).elite)
                });
            if other_elite {
                return false;
            }
        }
        self.slots[index] = Some(id);
        true
    }

    /// Clear a slot. Always succeeds for a valid index.
    pub fn unequip(&mut self, index: usize) -> bool {
        if index >= BAR_SLOTS {
            return false;
        }
        self.slots[index] = None;
        true
    }
}

/// Evaluate whether a skill use request is currently legal.
///
/// `energy_cost_multiplier` comes from the caster's active effects; the
/// check uses the adjusted cost, matching what completion will deduct.
pub fn usability(
    bar: &SkillBar,
    cast: &CastingState,
    book: &SkillBook,
    index: usize,
    current_energy: f32,
    energy_cost_multiplier: f32,
) -> SkillUsability {
    if index >= BAR_SLOTS {
        return SkillUsability::InvalidIndex;
    }
    if !cast.is_idle() {
        return SkillUsability::AlreadyCasting;
    }
    if cast.cooldown(index) > 0.0 {
        return SkillUsability::OnCooldown;
    }
    let Some(id) = bar.slot(index) else {
        return SkillUsability::NoSkillEquipped;
    };
    let skill = book.get_unchecked(id);
    if current_energy < skill.energy_cost * energy_cost_multiplier {
        return SkillUsability::NotEnoughEnergy;
    }
    SkillUsability::Usable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::skills::{
        DeliveryKind, Skill, SkillKind, SkillsConfig, TargetKind,
    };
    use std::collections::HashMap;

    fn test_book() -> SkillBook {
        let mut skills = HashMap::new();
        for (id, elite, cost) in [
            (SkillId::EmberLance, false, 5.0),
            (SkillId::HearthGlow, false, 10.0),
            (SkillId::EmberBurst, true, 15.0),
            (SkillId::MountainResolve, true, 10.0),
        ] {
            skills.insert(
                id,
                Skill {
                    name: format!("{:?}", id),
                    kind: SkillKind::Bolt,
                    target: TargetKind::Enemy,
                    delivery: DeliveryKind::Direct,
                    activation_ms: 0.0,
                    aftercast_ms: 0.0,
                    recharge_ms: 0.0,
                    range: 20.0,
                    energy_cost: cost,
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
                    elite,
                },
            );
        }
        SkillBook::new(SkillsConfig { skills })
    }

    #[test]
    fn test_second_elite_is_rejected_without_mutation() {
        let book = test_book();
        let mut bar = SkillBar::new();

        assert!(!bar.has_elite(&book));
        assert!(bar.equip(0, SkillId::EmberBurst, &book));
        assert!(bar.has_elite(&book));
        assert!(!bar.equip(1, SkillId::MountainResolve, &book));
        assert_eq!(bar.slot(1), None, "Rejected equip must not mutate");
        assert_eq!(bar.slot(0), Some(SkillId::EmberBurst));
    }

    #[test]
    fn test_elite_can_replace_itself_in_place() {
        let book = test_book();
        let mut bar = SkillBar::new();
        bar.equip(3, SkillId::EmberBurst, &book);

        assert!(bar.equip(3, SkillId::MountainResolve, &book));
        assert_eq!(bar.slot(3), Some(SkillId::MountainResolve));
    }

    #[test]
    fn test_unequip_frees_the_elite_slot() {
        let book = test_book();
        let mut bar = SkillBar::new();
        bar.equip(0, SkillId::EmberBurst, &book);
        assert!(bar.unequip(0));
        assert!(bar.equip(5, SkillId::MountainResolve, &book));
    }

    #[test]
    fn test_usability_priority_order() {
        let book = test_book();
        let bar = SkillBar::from_skills(&[SkillId::EmberLance]);
        let mut cast = CastingState::new();

        assert_eq!(
            usability(&bar, &cast, &book, 99, 100.0, 1.0),
            SkillUsability::InvalidIndex
        );

        // Busy combatant: AlreadyCasting outranks everything slot-specific.
        let s = book.get_unchecked(SkillId::EmberLance).clone();
        cast.start_cast(0, &s, None);
        assert_eq!(
            usability(&bar, &cast, &book, 0, 100.0, 1.0),
            SkillUsability::AlreadyCasting
        );
        cast.cancel_cast();

        cast.cooldowns[0] = 3.0;
        assert_eq!(
            usability(&bar, &cast, &book, 0, 100.0, 1.0),
            SkillUsability::OnCooldown
        );
        cast.cooldowns[0] = 0.0;

        assert_eq!(
            usability(&bar, &cast, &book, 7, 100.0, 1.0),
            SkillUsability::NoSkillEquipped
        );

        assert_eq!(
            usability(&bar, &cast, &book, 0, 2.0, 1.0),
            SkillUsability::NotEnoughEnergy
        );

        assert_eq!(
            usability(&bar, &cast, &book, 0, 100.0, 1.0),
            SkillUsability::Usable
        );
    }

    #[test]
    fn test_usability_uses_adjusted_energy_cost() {
        let book = test_book();
        let bar = SkillBar::from_skills(&[SkillId::HearthGlow]);
        let cast = CastingState::new();

        // Base cost 10; a 0.5 cost multiplier makes 6 energy enough.
        assert_eq!(
            usability(&bar, &cast, &book, 0, 6.0, 1.0),
            SkillUsability::NotEnoughEnergy
        );
        assert_eq!(
            usability(&bar, &cast, &book, 0, 6.0, 0.5),
            SkillUsability::Usable
        );
    }
}
