//! Condition Registry
//!
//! Value types for timed debuffs ("chills"), timed buffs ("cozies"), and
//! composable numeric effects (damage/armor/speed/cooldown/energy-cost
//! multipliers, optionally gated on a chill the bearer carries).
//!
//! Storage is three fixed-capacity arrays. Inserting past capacity silently
//! drops the new condition instead of growing — this keeps the hot tick loop
//! allocation-free and caps condition spam. It is a deliberate design rule,
//! not an error path: `add_*` report the drop via their `bool` return and
//! callers ignore it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::constants::{CONDITION_CAPACITY, INTENSITY_CAP};
use super::CombatantId;

/// Timed debuffs. Each kind carries a fixed gameplay rule.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ChillKind {
    /// Accuracy chill: the bearer's damaging skills miss 50% of the time.
    Numb,
    /// Movement slow.
    Shiver,
    /// Outgoing damage cut.
    Sapped,
}

impl ChillKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChillKind::Numb => "Numb",
            ChillKind::Shiver => "Shiver",
            ChillKind::Sapped => "Sapped",
        }
    }

    /// Flat outgoing-damage multiplier this chill imposes on its bearer.
    pub fn offense_multiplier(&self) -> f32 {
        match self {
            ChillKind::Sapped => 0.75,
            _ => 1.0,
        }
    }

    /// Movement-speed multiplier this chill imposes on its bearer.
    pub fn move_multiplier(&self) -> f32 {
        match self {
            ChillKind::Shiver => 0.6,
            _ => 1.0,
        }
    }
}

/// Timed buffs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum CozyKind {
    /// One-shot full block; consumed by the first hit it stops.
    Blanketed,
    /// Offensive bonus. This is the single cozy the soak damage path
    /// re-applies after recomputing from base damage.
    Mulled,
    /// Incoming-damage reduction.
    Quilted,
    /// Damage interception: halves incoming damage while active.
    Eiderdown,
    /// Death prevention: a lethal hit leaves the bearer at 1.0 warmth and
    /// consumes the cozy.
    LastEmber,
}

impl CozyKind {
    pub fn name(&self) -> &'static str {
        match self {
            CozyKind::Blanketed => "Blanketed",
            CozyKind::Mulled => "Mulled",
            CozyKind::Quilted => "Quilted",
            CozyKind::Eiderdown => "Eiderdown",
            CozyKind::LastEmber => "Last Ember",
        }
    }

    /// Flat outgoing-damage multiplier this cozy grants its bearer.
    pub fn offense_multiplier(&self) -> f32 {
        match self {
            CozyKind::Mulled => 1.15,
            _ => 1.0,
        }
    }

    /// Incoming-damage multiplier this cozy grants its bearer.
    pub fn defense_multiplier(&self) -> f32 {
        match self {
            CozyKind::Quilted => 0.85,
            _ => 1.0,
        }
    }
}

/// Identity tags for composable effects. Reapplying a tag refreshes the
/// existing entry instead of duplicating it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum EffectKind {
    /// Outgoing damage up.
    Kindled,
    /// Armor up.
    Tempered,
    /// Movement speed up.
    Swiftstep,
    /// Cooldown reduction.
    Keenminded,
    /// Energy costs down.
    Thrifty,
    /// Hex: armor down and damage taken up.
    Exposed,
    /// Damage up, paid for elsewhere (Pact-style bargains).
    Emboldened,
    /// Damage down.
    Wearied,
    /// Hex: armor down.
    Frostbitten,
    /// Damage up against chilled targets (chill-gated).
    Sureblade,
}

impl EffectKind {
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Kindled => "Kindled",
            EffectKind::Tempered => "Tempered",
            EffectKind::Swiftstep => "Swiftstep",
            EffectKind::Keenminded => "Keenminded",
            EffectKind::Thrifty => "Thrifty",
            EffectKind::Exposed => "Exposed",
            EffectKind::Emboldened => "Emboldened",
            EffectKind::Wearied => "Wearied",
            EffectKind::Frostbitten => "Frostbitten",
            EffectKind::Sureblade => "Sureblade",
        }
    }
}

fn default_mult() -> f32 {
    1.0
}

/// A composable numeric effect as defined on a skill.
///
/// All multiplier fields default to 1.0 (no change) so skill definitions
/// only state the numbers they care about.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectDef {
    pub kind: EffectKind,
    /// Duration in milliseconds.
    pub duration_ms: f32,
    /// Outgoing-damage multiplier for the bearer.
    #[serde(default = "default_mult")]
    pub damage_mult: f32,
    /// Incoming-damage multiplier for the bearer (may exceed 1.0).
    #[serde(default = "default_mult")]
    pub damage_taken_mult: f32,
    /// Armor multiplier for the bearer.
    #[serde(default = "default_mult")]
    pub armor_mult: f32,
    /// Cooldown-reduction fraction (0.2 = cooldowns 20% shorter).
    #[serde(default)]
    pub cooldown_reduction: f32,
    /// Energy-cost multiplier for the bearer.
    #[serde(default = "default_mult")]
    pub energy_cost_mult: f32,
    /// Movement-speed multiplier for the bearer.
    #[serde(default = "default_mult")]
    pub move_speed_mult: f32,
    /// If set, the effect only counts while the bearer carries this chill.
    #[serde(default)]
    pub requires_chill: Option<ChillKind>,
}

/// An active chill on a combatant.
#[derive(Clone, Debug)]
pub struct ActiveChill {
    pub kind: ChillKind,
    /// Remaining duration in milliseconds.
    pub remaining_ms: f32,
    /// Stack intensity, capped at [`INTENSITY_CAP`].
    pub intensity: u8,
    /// Who applied this chill (attribution only).
    pub source: Option<CombatantId>,
}

/// An active cozy on a combatant.
#[derive(Clone, Debug)]
pub struct ActiveCozy {
    pub kind: CozyKind,
    pub remaining_ms: f32,
    pub intensity: u8,
    pub source: Option<CombatantId>,
}

/// An active composable effect on a combatant.
#[derive(Clone, Debug)]
pub struct ActiveEffect {
    pub def: EffectDef,
    pub remaining_ms: f32,
    pub intensity: u8,
    pub source: Option<CombatantId>,
}

/// All active conditions on a single combatant.
#[derive(Clone, Debug, Default)]
pub struct ActiveConditions {
    chills: SmallVec<[ActiveChill; CONDITION_CAPACITY]>,
    cozies: SmallVec<[ActiveCozy; CONDITION_CAPACITY]>,
    effects: SmallVec<[ActiveEffect; CONDITION_CAPACITY]>,
}

impl ActiveConditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a chill. Reapplying an active kind refreshes its duration to
    /// the maximum of old and new and adds intensity (capped); it never
    /// creates a duplicate entry. Returns false when the array is full and
    /// the chill was dropped.
    pub fn add_chill(
        &mut self,
        kind: ChillKind,
        duration_ms: f32,
        intensity: u8,
        source: Option<CombatantId>,
    ) -> bool {
        if let Some(existing) = self.chills.iter_mut().find(|c| c.kind == kind) {
            existing.remaining_ms = existing.remaining_ms.max(duration_ms);
            existing.intensity = existing.intensity.saturating_add(intensity).min(INTENSITY_CAP);
            existing.source = source;
            return true;
        }
        if self.chills.len() >= CONDITION_CAPACITY {
            return false;
        }
        self.chills.push(ActiveChill {
            kind,
            remaining_ms: duration_ms,
            intensity,
            source,
        });
        true
    }

    /// Apply a cozy. Same stacking and overflow rules as [`add_chill`].
    ///
    /// [`add_chill`]: ActiveConditions::add_chill
    pub fn add_cozy(
        &mut self,
        kind: CozyKind,
        duration_ms: f32,
        intensity: u8,
        source: Option<CombatantId>,
    ) -> bool {
        if let Some(existing) = self.cozies.iter_mut().find(|c| c.kind == kind) {
            existing.remaining_ms = existing.remaining_ms.max(duration_ms);
            existing.intensity = existing.intensity.saturating_add(intensity).min(INTENSITY_CAP);
            existing.source = source;
            return true;
        }
        if self.cozies.len() >= CONDITION_CAPACITY {
            return false;
        }
        self.cozies.push(ActiveCozy {
            kind,
            remaining_ms: duration_ms,
            intensity,
            source,
        });
        true
    }

    /// Apply a composable effect. Same stacking and overflow rules as
    /// [`add_chill`]; the stored multipliers stay those of the first
    /// application.
    ///
    /// [`add_chill`]: ActiveConditions::add_chill
    pub fn add_effect(&mut self, def: &EffectDef, source: Option<CombatantId>) -> bool {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.def.kind == def.kind) {
            existing.remaining_ms = existing.remaining_ms.max(def.duration_ms);
            existing.intensity = existing.intensity.saturating_add(1).min(INTENSITY_CAP);
            existing.source = source;
            return true;
        }
        if self.effects.len() >= CONDITION_CAPACITY {
            return false;
        }
        self.effects.push(ActiveEffect {
            def: def.clone(),
            remaining_ms: def.duration_ms,
            intensity: 1,
            source,
        });
        true
    }

    pub fn has_chill(&self, kind: ChillKind) -> bool {
        self.chills.iter().any(|c| c.kind == kind)
    }

    pub fn has_cozy(&self, kind: CozyKind) -> bool {
        self.cozies.iter().any(|c| c.kind == kind)
    }

    /// Remove one cozy of the given kind (one-shot consumption, e.g. a
    /// Blanketed block). Returns true if a cozy was consumed.
    pub fn consume_cozy(&mut self, kind: CozyKind) -> bool {
        if let Some(index) = self.cozies.iter().position(|c| c.kind == kind) {
            self.cozies.remove(index);
            true
        } else {
            false
        }
    }

    pub fn chill_count(&self) -> usize {
        self.chills.len()
    }

    pub fn cozy_count(&self) -> usize {
        self.cozies.len()
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    pub fn chills(&self) -> impl Iterator<Item = &ActiveChill> {
        self.chills.iter()
    }

    pub fn cozies(&self) -> impl Iterator<Item = &ActiveCozy> {
        self.cozies.iter()
    }

    /// Advance all timers and evict expired entries. Removal preserves the
    /// relative order of survivors (compaction, no gaps).
    pub fn update(&mut self, dt_ms: f32) {
        for chill in self.chills.iter_mut() {
            chill.remaining_ms -= dt_ms;
        }
        self.chills.retain(|c| c.remaining_ms > 0.0);

        for cozy in self.cozies.iter_mut() {
            cozy.remaining_ms -= dt_ms;
        }
        self.cozies.retain(|c| c.remaining_ms > 0.0);

        for effect in self.effects.iter_mut() {
            effect.remaining_ms -= dt_ms;
        }
        self.effects.retain(|e| e.remaining_ms > 0.0);
    }

    /// True when an effect's chill gate is satisfied.
    fn gate_open(&self, effect: &ActiveEffect) -> bool {
        match effect.def.requires_chill {
            Some(chill) => self.has_chill(chill),
            None => true,
        }
    }

    /// Aggregated outgoing-damage multiplier over the composable-effect set.
    /// Multiplicative, so the result is independent of application order.
    pub fn damage_multiplier(&self) -> f32 {
        self.effects
            .iter()
            .filter(|e| self.gate_open(e))
            .map(|e| e.def.damage_mult)
            .product()
    }

    /// Aggregated incoming-damage multiplier (may exceed 1.0).
    pub fn damage_taken_multiplier(&self) -> f32 {
        self.effects
            .iter()
            .filter(|e| self.gate_open(e))
            .map(|e| e.def.damage_taken_mult)
            .product()
    }

    /// Aggregated armor multiplier.
    pub fn armor_multiplier(&self) -> f32 {
        self.effects
            .iter()
            .filter(|e| self.gate_open(e))
            .map(|e| e.def.armor_mult)
            .product()
    }

    /// Aggregated cooldown-reduction fraction. Reductions combine on the
    /// remaining-cooldown side so stacking never reaches 100%.
    pub fn cooldown_reduction(&self) -> f32 {
        let remaining: f32 = self
            .effects
            .iter()
            .filter(|e| self.gate_open(e))
            .map(|e| 1.0 - e.def.cooldown_reduction)
            .product();
        1.0 - remaining
    }

    /// Aggregated energy-cost multiplier.
    pub fn energy_cost_multiplier(&self) -> f32 {
        self.effects
            .iter()
            .filter(|e| self.gate_open(e))
            .map(|e| e.def.energy_cost_mult)
            .product()
    }

    /// Aggregated movement-speed multiplier from composable effects.
    pub fn move_speed_multiplier(&self) -> f32 {
        self.effects
            .iter()
            .filter(|e| self.gate_open(e))
            .map(|e| e.def.move_speed_mult)
            .product()
    }

    /// Product of flat chill offense multipliers on the bearer.
    pub fn chill_offense_multiplier(&self) -> f32 {
        self.chills.iter().map(|c| c.kind.offense_multiplier()).product()
    }

    /// Product of flat cozy offense multipliers on the bearer.
    pub fn cozy_offense_multiplier(&self) -> f32 {
        self.cozies.iter().map(|c| c.kind.offense_multiplier()).product()
    }

    /// Product of flat cozy defense multipliers on the bearer.
    pub fn cozy_defense_multiplier(&self) -> f32 {
        self.cozies.iter().map(|c| c.kind.defense_multiplier()).product()
    }

    /// Product of flat chill movement multipliers on the bearer.
    pub fn chill_move_multiplier(&self) -> f32 {
        self.chills.iter().map(|c| c.kind.move_multiplier()).product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(kind: EffectKind, damage_mult: f32) -> EffectDef {
        EffectDef {
            kind,
            duration_ms: 5000.0,
            damage_mult,
            damage_taken_mult: 1.0,
            armor_mult: 1.0,
            cooldown_reduction: 0.0,
            energy_cost_mult: 1.0,
            move_speed_mult: 1.0,
            requires_chill: None,
        }
    }

    #[test]
    fn test_reapply_refreshes_instead_of_duplicating() {
        let mut conds = ActiveConditions::new();
        assert!(conds.add_chill(ChillKind::Numb, 3000.0, 1, None));
        assert!(conds.add_chill(ChillKind::Numb, 1000.0, 2, None));

        assert_eq!(conds.chill_count(), 1, "Reapplying must not duplicate");
        let chill = conds.chills().next().unwrap();
        assert_eq!(
            chill.remaining_ms, 3000.0,
            "Duration should refresh to max(old, new)"
        );
        assert_eq!(chill.intensity, 3, "Intensity should add");
    }

    #[test]
    fn test_intensity_is_capped() {
        let mut conds = ActiveConditions::new();
        conds.add_chill(ChillKind::Shiver, 1000.0, 200, None);
        conds.add_chill(ChillKind::Shiver, 1000.0, 200, None);
        assert_eq!(conds.chills().next().unwrap().intensity, INTENSITY_CAP);
    }

    #[test]
    fn test_overflow_is_a_silent_drop() {
        let kinds = [
            EffectKind::Kindled,
            EffectKind::Tempered,
            EffectKind::Swiftstep,
            EffectKind::Keenminded,
            EffectKind::Thrifty,
            EffectKind::Exposed,
            EffectKind::Emboldened,
            EffectKind::Wearied,
            EffectKind::Frostbitten,
            EffectKind::Sureblade,
        ];
        assert!(kinds.len() > CONDITION_CAPACITY);

        let mut conds = ActiveConditions::new();
        for kind in &kinds[..CONDITION_CAPACITY] {
            assert!(conds.add_effect(&effect(*kind, 1.1), None));
        }

        // The array is full: new kinds are dropped, not grown into.
        assert!(!conds.add_effect(&effect(kinds[CONDITION_CAPACITY], 2.0), None));
        assert_eq!(conds.effect_count(), CONDITION_CAPACITY);

        // Restacking an existing kind still works at capacity.
        assert!(conds.add_effect(&effect(kinds[0], 3.0), None));
        assert_eq!(conds.effect_count(), CONDITION_CAPACITY);
    }

    #[test]
    fn test_expiry_compacts_in_order() {
        let mut conds = ActiveConditions::new();
        conds.add_chill(ChillKind::Numb, 1000.0, 1, None);
        conds.add_chill(ChillKind::Shiver, 3000.0, 1, None);
        conds.add_chill(ChillKind::Sapped, 5000.0, 1, None);

        conds.update(2000.0);

        assert_eq!(conds.chill_count(), 2);
        let kinds: Vec<ChillKind> = conds.chills().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ChillKind::Shiver, ChillKind::Sapped]);
    }

    #[test]
    fn test_aggregation_is_multiplicative() {
        let mut conds = ActiveConditions::new();
        conds.add_effect(&effect(EffectKind::Kindled, 1.5), None);
        conds.add_effect(&effect(EffectKind::Exposed, 0.8), None);

        let expected = 1.5 * 0.8;
        assert!((conds.damage_multiplier() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_chill_gate_blocks_effect() {
        let mut conds = ActiveConditions::new();
        let mut gated = effect(EffectKind::Kindled, 2.0);
        gated.requires_chill = Some(ChillKind::Numb);
        conds.add_effect(&gated, None);

        assert_eq!(conds.damage_multiplier(), 1.0, "Gate closed without Numb");

        conds.add_chill(ChillKind::Numb, 1000.0, 1, None);
        assert_eq!(conds.damage_multiplier(), 2.0, "Gate opens with Numb");
    }

    #[test]
    fn test_cooldown_reduction_stacks_on_remaining_side() {
        let mut conds = ActiveConditions::new();
        let mut a = effect(EffectKind::Keenminded, 1.0);
        a.cooldown_reduction = 0.2;
        let mut b = effect(EffectKind::Thrifty, 1.0);
        b.cooldown_reduction = 0.25;
        conds.add_effect(&a, None);
        conds.add_effect(&b, None);

        let expected = 1.0 - (0.8 * 0.75);
        assert!((conds.cooldown_reduction() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_consume_cozy_removes_one_entry() {
        let mut conds = ActiveConditions::new();
        conds.add_cozy(CozyKind::Blanketed, 8000.0, 1, Some(3));

        assert!(conds.consume_cozy(CozyKind::Blanketed));
        assert!(!conds.has_cozy(CozyKind::Blanketed));
        assert_eq!(conds.cozy_count(), 0);
        assert!(!conds.consume_cozy(CozyKind::Blanketed));
    }
}
