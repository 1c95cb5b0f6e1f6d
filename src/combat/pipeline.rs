//! Damage & Healing Pipeline
//!
//! Every damaging skill resolves through the same fixed stages, in the same
//! order:
//!
//! 1. miss roll (Numb chill on the caster)
//! 2. block (Blanketed cozy on the target, consumed)
//! 3. caster offensive multiplier (chills, cozies, effects, school bonus)
//! 4. skill conditional bonuses (warmth gates, rhythm flat damage)
//! 5. target defensive multiplier (cozies, effects)
//! 6. armor reduction, with the soak special case
//! 7. cover reduction for direct delivery behind a wall
//!
//! Stage order is load-bearing: reordering changes numbers, and the tests
//! pin several exact outcomes.

use super::combatant::Combatant;
use super::conditions::{ChillKind, CozyKind};
use super::constants::{
    ARMOR_PIVOT, COVER_MULTIPLIER, COVER_WALL_HEIGHT, NUMB_MISS_CHANCE,
};
use super::rng::GameRng;
use super::skills::{DeliveryKind, Skill};
use super::terrain::Terrain;

/// Result of running a hit through the pipeline. `amount` is the damage to
/// subtract from warmth (pre-interception); zero when missed or blocked.
#[derive(Clone, Copy, Debug)]
pub struct DamageOutcome {
    pub amount: f32,
    pub missed: bool,
    pub blocked: bool,
}

impl DamageOutcome {
    fn miss() -> Self {
        Self {
            amount: 0.0,
            missed: true,
            blocked: false,
        }
    }

    fn block() -> Self {
        Self {
            amount: 0.0,
            missed: false,
            blocked: true,
        }
    }

    fn hit(amount: f32) -> Self {
        Self {
            amount,
            missed: false,
            blocked: false,
        }
    }
}

/// Armor soft-cap: each point of armor is worth less than the last.
/// `ARMOR_PIVOT` armor halves damage; armor can never reduce it to zero.
pub fn damage_after_armor(damage: f32, armor: f32) -> f32 {
    let armor = armor.max(0.0);
    let reduction = armor / (armor + ARMOR_PIVOT);
    damage * (1.0 - reduction)
}

/// Everything multiplying the caster's outgoing damage: chill penalties,
/// cozy bonuses, composable effects, and the school's one signature bonus.
pub fn offensive_multiplier(caster: &Combatant) -> f32 {
    caster.conditions.chill_offense_multiplier()
        * caster.conditions.cozy_offense_multiplier()
        * caster.conditions.damage_multiplier()
        * caster.economy.offense_bonus(caster.warmth.fraction())
}

/// Everything multiplying damage on the target's side (cozies and effects;
/// armor is a separate stage).
pub fn defensive_multiplier(target: &Combatant) -> f32 {
    target.conditions.cozy_defense_multiplier() * target.conditions.damage_taken_multiplier()
}

/// Resolve one damaging hit. Mutates the target only to consume a
/// Blanketed block; warmth subtraction is the caller's job so interception
/// hooks run in one place.
pub fn resolve_damage(
    caster: &Combatant,
    target: &mut Combatant,
    skill: &Skill,
    rng: &mut GameRng,
    terrain: &dyn Terrain,
) -> DamageOutcome {
    // 1. Miss roll. The roll is consumed from the shared stream even when
    // it succeeds, so seeded runs stay aligned.
    if caster.conditions.has_chill(ChillKind::Numb) && rng.random_f32() < NUMB_MISS_CHANCE {
        return DamageOutcome::miss();
    }

    // 2. Block. One Blanketed cozy stops one hit completely.
    if target.conditions.consume_cozy(CozyKind::Blanketed) {
        return DamageOutcome::block();
    }

    let mut damage = if skill.soak > 0.0 {
        // Soak path: recompute from base damage against soak-reduced armor,
        // then re-apply only the Mulled cozy bonus. The caster's other
        // multipliers and the target's defensive stage do not participate.
        let soaked_armor = target.effective_padding() * (1.0 - skill.soak.clamp(0.0, 1.0));
        let mut dmg = damage_after_armor(skill.base_damage, soaked_armor);
        if caster.conditions.has_cozy(CozyKind::Mulled) {
            dmg *= CozyKind::Mulled.offense_multiplier();
        }
        dmg
    } else {
        // 3. Caster offensive multiplier.
        let mut multiplier = offensive_multiplier(caster);

        // 4. Skill conditional bonuses.
        if skill.bonus_target_below_half > 0.0 && target.warmth.fraction() < 0.5 {
            multiplier *= 1.0 + skill.bonus_target_below_half;
        }
        if skill.bonus_caster_above_half > 0.0 && caster.warmth.fraction() > 0.5 {
            multiplier *= 1.0 + skill.bonus_caster_above_half;
        }
        let flat =
            skill.bonus_flat_per_rhythm * caster.economy.last_rhythm_consumed() as f32;

        let mut dmg = skill.base_damage * multiplier + flat;

        // 5. Target defensive multiplier.
        dmg *= defensive_multiplier(target);

        // 6. Armor.
        damage_after_armor(dmg, target.effective_padding())
    };

    // 7. Cover. Lobbed delivery arcs over walls and ignores this stage.
    if skill.delivery == DeliveryKind::Direct
        && terrain.wall_between(caster.position, target.position, COVER_WALL_HEIGHT)
    {
        damage *= COVER_MULTIPLIER;
    }

    DamageOutcome::hit(damage)
}

/// Resolve a basic strike through the same pipeline, reusing the skill path
/// via a synthetic direct-delivery profile.
pub fn resolve_strike(
    caster: &Combatant,
    target: &mut Combatant,
    rng: &mut GameRng,
    terrain: &dyn Terrain,
) -> DamageOutcome {
    let strike = Skill {
        name: "Strike".to_string(),
        kind: super::skills::SkillKind::Strike,
        target: super::skills::TargetKind::Enemy,
        delivery: DeliveryKind::Direct,
        activation_ms: 0.0,
        aftercast_ms: 0.0,
        recharge_ms: 0.0,
        range: 0.0,
        energy_cost: 0.0,
        grit_cost: 0,
        credit_cost: 0.0,
        rhythm_cost: 0,
        warmth_sacrifice_pct: 0.0,
        base_damage: caster.strike_damage,
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
    };
    resolve_damage(caster, target, &strike, rng, terrain)
}

/// Healing runs a reduced version of the damage staging: the caster's
/// offensive multiplier and the target's defensive multiplier, with no
/// miss, block, armor, or cover stages. Always a separate call, never
/// folded into a damage resolution.
pub fn resolve_healing(caster: &Combatant, target: &Combatant, skill: &Skill) -> f32 {
    skill.base_healing * offensive_multiplier(caster) * defensive_multiplier(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::economy::School;
    use crate::combat::skills::{SkillKind, TargetKind};
    use crate::combat::terrain::OpenField;
    use glam::Vec3;

    fn bolt(base_damage: f32) -> Skill {
        Skill {
            name: "Test Bolt".to_string(),
            kind: SkillKind::Bolt,
            target: TargetKind::Enemy,
            delivery: DeliveryKind::Direct,
            activation_ms: 0.0,
            aftercast_ms: 0.0,
            recharge_ms: 0.0,
            range: 20.0,
            energy_cost: 0.0,
            grit_cost: 0,
            credit_cost: 0.0,
            rhythm_cost: 0,
            warmth_sacrifice_pct: 0.0,
            base_damage,
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

    fn pair() -> (Combatant, Combatant) {
        // Hearth has no school bonus, which keeps these numbers clean.
        let mut caster = Combatant::new(0, 0, School::Hearth, Vec3::ZERO);
        let mut target = Combatant::new(1, 1, School::Hearth, Vec3::new(5.0, 0.0, 0.0));
        caster.warmth.maximum = 200.0;
        caster.warmth.current = 200.0;
        target.warmth.maximum = 200.0;
        target.warmth.current = 200.0;
        target.padding = 0.0;
        (caster, target)
    }

    #[test]
    fn test_armor_halves_at_pivot() {
        assert_eq!(damage_after_armor(100.0, 0.0), 100.0);
        assert_eq!(damage_after_armor(100.0, ARMOR_PIVOT), 50.0);
        assert!(damage_after_armor(100.0, 100_000.0) > 0.0, "Armor never zeroes damage");
    }

    #[test]
    fn test_unmodified_hit_is_base_damage() {
        let (caster, mut target) = pair();
        let mut rng = GameRng::from_seed(1);
        let out = resolve_damage(&caster, &mut target, &bolt(20.0), &mut rng, &OpenField);
        assert!(!out.missed && !out.blocked);
        assert_eq!(out.amount, 20.0);
    }

    #[test]
    fn test_blanketed_blocks_exactly_one_hit() {
        let (caster, mut target) = pair();
        let mut rng = GameRng::from_seed(1);
        target
            .conditions
            .add_cozy(CozyKind::Blanketed, 8000.0, 1, None);

        let first = resolve_damage(&caster, &mut target, &bolt(20.0), &mut rng, &OpenField);
        assert!(first.blocked);
        assert_eq!(first.amount, 0.0);

        let second = resolve_damage(&caster, &mut target, &bolt(20.0), &mut rng, &OpenField);
        assert!(!second.blocked);
        assert_eq!(second.amount, 20.0);
    }

    #[test]
    fn test_numb_misses_about_half_the_time() {
        let (mut caster, mut target) = pair();
        caster
            .conditions
            .add_chill(ChillKind::Numb, 1_000_000.0, 1, None);
        let mut rng = GameRng::from_seed(42);

        let mut misses = 0;
        for _ in 0..1000 {
            // Blanketed never interferes here; the target has no cozies.
            let out = resolve_damage(&caster, &mut target, &bolt(1.0), &mut rng, &OpenField);
            if out.missed {
                misses += 1;
            }
        }
        assert!(
            (400..=600).contains(&misses),
            "Expected roughly half of 1000 rolls to miss, got {}",
            misses
        );
    }

    #[test]
    fn test_soak_ignores_armor_and_most_multipliers() {
        let (mut caster, mut target) = pair();
        target.padding = 100.0;
        let mut rng = GameRng::from_seed(1);

        let mut needle = bolt(30.0);
        needle.soak = 1.0;

        // Full soak: armor contributes nothing.
        let out = resolve_damage(&caster, &mut target, &needle, &mut rng, &OpenField);
        assert_eq!(out.amount, 30.0);

        // Quilted on the target would cut a normal hit but not a soak hit.
        target.conditions.add_cozy(CozyKind::Quilted, 8000.0, 1, None);
        let out = resolve_damage(&caster, &mut target, &needle, &mut rng, &OpenField);
        assert_eq!(out.amount, 30.0);

        // Mulled on the caster is the one bonus the soak path re-applies.
        caster.conditions.add_cozy(CozyKind::Mulled, 8000.0, 1, None);
        let out = resolve_damage(&caster, &mut target, &needle, &mut rng, &OpenField);
        assert!((out.amount - 34.5).abs() < 1e-4);
    }

    #[test]
    fn test_warmth_gate_bonuses() {
        let (caster, mut target) = pair();
        let mut rng = GameRng::from_seed(1);
        let mut skill = bolt(20.0);
        skill.bonus_target_below_half = 0.5;

        let out = resolve_damage(&caster, &mut target, &skill, &mut rng, &OpenField);
        assert_eq!(out.amount, 20.0, "Gate closed at full warmth");

        target.warmth.current = 80.0;
        let out = resolve_damage(&caster, &mut target, &skill, &mut rng, &OpenField);
        assert_eq!(out.amount, 30.0, "Gate open below half warmth");
    }

    #[test]
    fn test_healing_uses_both_multiplier_stages_only() {
        let (mut caster, mut target) = pair();
        let mut mend = bolt(0.0);
        mend.base_healing = 30.0;

        assert_eq!(resolve_healing(&caster, &target, &mend), 30.0);

        // Sapped cuts outgoing healing like outgoing damage.
        caster
            .conditions
            .add_chill(ChillKind::Sapped, 8000.0, 1, None);
        assert!((resolve_healing(&caster, &target, &mend) - 22.5).abs() < 1e-4);

        // The target's defensive stage applies; armor never does.
        target
            .conditions
            .add_cozy(CozyKind::Quilted, 8000.0, 1, None);
        target.padding = 100.0;
        assert!((resolve_healing(&caster, &target, &mend) - 19.125).abs() < 1e-4);
    }
}
