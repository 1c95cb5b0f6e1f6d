//! Data-Driven Skill Definitions
//!
//! Skill stats are defined in `assets/config/skills.ron` and loaded into an
//! immutable [`SkillBook`] at startup. Balance changes don't require
//! recompilation, and the book validates at load time that every skill id
//! the code knows about has a definition.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use super::conditions::{ChillKind, CozyKind, EffectDef};

/// Default path for the skill book asset.
pub const DEFAULT_SKILLS_PATH: &str = "assets/config/skills.ron";

/// Every skill id the engine knows about.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SkillId {
    // Hearth
    EmberLance,
    HearthGlow,
    KindleWard,
    EmberBurst,
    // Forge
    AnvilStrike,
    GritBreaker,
    ShieldOfCinders,
    MountainResolve,
    // Wander
    WaysongBolt,
    TravelersMend,
    TrickStep,
    ThousandPaths,
    // Pact
    BloodTithe,
    FrostToll,
    NeedleOfThaw,
    DebtOfWinter,
    // Cadence
    CarolingStrike,
    ChimeOfRest,
    MulledCourage,
    PerfectMeasure,
    // Shared utility
    BlanketWeave,
    EiderdownWrap,
    FinalEmber,
    WallOfSleet,
}

/// Broad skill category. Drives the Wander variety bonus, nothing else.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SkillKind {
    Strike,
    Bolt,
    Hex,
    Mend,
    Shout,
    Ward,
    Wall,
}

/// What a skill may legally target.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TargetKind {
    SelfCast,
    Enemy,
    Ally,
    Ground,
}

/// How a damaging skill travels. Direct delivery is subject to cover and
/// line-of-sight; lobbed delivery arcs over walls.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DeliveryKind {
    Direct,
    Lobbed,
}

fn default_intensity() -> u8 {
    1
}

/// A chill applied on hit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChillApplication {
    pub kind: ChillKind,
    /// Duration in milliseconds.
    pub duration_ms: f32,
    #[serde(default = "default_intensity")]
    pub intensity: u8,
}

/// A cozy granted on cast.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CozyApplication {
    pub kind: CozyKind,
    pub duration_ms: f32,
    #[serde(default = "default_intensity")]
    pub intensity: u8,
}

/// Complete skill configuration loaded from RON.
///
/// Most fields default to zero / empty so definitions only state what a
/// skill actually does.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Skill {
    /// Display name of the skill
    pub name: String,
    pub kind: SkillKind,
    pub target: TargetKind,
    #[serde(default = "default_delivery")]
    pub delivery: DeliveryKind,

    // === Casting ===
    /// Activation time in milliseconds (0 = instant)
    #[serde(default)]
    pub activation_ms: f32,
    /// Aftercast lockout in milliseconds
    #[serde(default)]
    pub aftercast_ms: f32,
    /// Recharge time in milliseconds
    #[serde(default)]
    pub recharge_ms: f32,
    /// Maximum range in world units
    #[serde(default)]
    pub range: f32,

    // === Costs ===
    #[serde(default)]
    pub energy_cost: f32,
    /// Forge grit stacks consumed on completion
    #[serde(default)]
    pub grit_cost: u8,
    /// Pact debt taken on completion
    #[serde(default)]
    pub credit_cost: f32,
    /// Cadence rhythm charges consumed on completion
    #[serde(default)]
    pub rhythm_cost: u8,
    /// Fraction of current warmth sacrificed on completion
    #[serde(default)]
    pub warmth_sacrifice_pct: f32,

    // === Damage & healing ===
    #[serde(default)]
    pub base_damage: f32,
    #[serde(default)]
    pub base_healing: f32,
    /// Armor penetration: fraction of the target's armor ignored (0.0-1.0)
    #[serde(default)]
    pub soak: f32,

    // === Conditional bonuses (pipeline stage 4) ===
    /// Extra multiplier while the target is below half warmth
    #[serde(default)]
    pub bonus_target_below_half: f32,
    /// Extra multiplier while the caster is above half warmth
    #[serde(default)]
    pub bonus_caster_above_half: f32,
    /// Flat damage added per rhythm charge consumed by this cast
    #[serde(default)]
    pub bonus_flat_per_rhythm: f32,

    // === Applications ===
    #[serde(default)]
    pub applies_chills: Vec<ChillApplication>,
    #[serde(default)]
    pub applies_cozies: Vec<CozyApplication>,
    #[serde(default)]
    pub applies_effects: Vec<EffectDef>,

    // === Ground walls ===
    #[serde(default)]
    pub wall_height: f32,
    #[serde(default)]
    pub wall_length: f32,

    // === Misc ===
    /// Energy refunded to the caster on completion
    #[serde(default)]
    pub grants_energy: f32,
    /// Elite skills: at most one may be equipped on a bar
    #[serde(default)]
    pub elite: bool,
}

fn default_delivery() -> DeliveryKind {
    DeliveryKind::Direct
}

impl Skill {
    /// Returns true if this skill deals direct damage
    pub fn is_damage(&self) -> bool {
        self.base_damage > 0.0
    }

    /// Returns true if this skill heals
    pub fn is_heal(&self) -> bool {
        self.base_healing > 0.0
    }

    /// Returns true if this skill raises terrain
    pub fn is_wall(&self) -> bool {
        self.wall_height > 0.0
    }
}

/// Errors from loading or validating the skill book.
#[derive(Debug, Error)]
pub enum SkillBookError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: ron::error::SpannedError,
    },
    #[error("missing skill definitions: {0:?}")]
    Missing(Vec<SkillId>),
}

/// Root structure for the skills.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct SkillsConfig {
    pub skills: HashMap<SkillId, Skill>,
}

/// Immutable registry of all skill definitions.
///
/// Loaded once at startup; combatants hold ids and look definitions up here.
#[derive(Debug)]
pub struct SkillBook {
    definitions: HashMap<SkillId, Skill>,
}

impl SkillBook {
    pub fn new(config: SkillsConfig) -> Self {
        Self {
            definitions: config.skills,
        }
    }

    pub fn get(&self, id: SkillId) -> Option<&Skill> {
        self.definitions.get(&id)
    }

    /// Get a definition, panicking if absent. Use only after `validate()`
    /// has passed at startup.
    pub fn get_unchecked(&self, id: SkillId) -> &Skill {
        self.definitions
            .get(&id)
            .unwrap_or_else(|| panic!("Skill {:?} not found in definitions", id))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn skill_ids(&self) -> impl Iterator<Item = &SkillId> {
        self.definitions.keys()
    }

    /// Check that every known skill id has a definition
    pub fn validate(&self) -> Result<(), Vec<SkillId>> {
        let expected = [
            SkillId::EmberLance,
            SkillId::HearthGlow,
            SkillId::KindleWard,
            SkillId::EmberBurst,
            SkillId::AnvilStrike,
            SkillId::GritBreaker,
            SkillId::ShieldOfCinders,
            SkillId::MountainResolve,
            SkillId::WaysongBolt,
            SkillId::TravelersMend,
            SkillId::TrickStep,
            SkillId::ThousandPaths,
            SkillId::BloodTithe,
            SkillId::FrostToll,
            SkillId::NeedleOfThaw,
            SkillId::DebtOfWinter,
            SkillId::CarolingStrike,
            SkillId::ChimeOfRest,
            SkillId::MulledCourage,
            SkillId::PerfectMeasure,
            SkillId::BlanketWeave,
            SkillId::EiderdownWrap,
            SkillId::FinalEmber,
            SkillId::WallOfSleet,
        ];

        let missing: Vec<SkillId> = expected
            .into_iter()
            .filter(|id| !self.definitions.contains_key(id))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }
}

/// Load and validate the skill book from a RON file.
pub fn load_skill_book(path: &Path) -> Result<SkillBook, SkillBookError> {
    let path_display = path.display().to_string();

    let contents = std::fs::read_to_string(path).map_err(|e| SkillBookError::Io {
        path: path_display.clone(),
        source: e,
    })?;

    let config: SkillsConfig = ron::from_str(&contents).map_err(|e| SkillBookError::Parse {
        path: path_display.clone(),
        source: e,
    })?;

    let book = SkillBook::new(config);
    book.validate().map_err(SkillBookError::Missing)?;

    info!(count = book.len(), path = %path_display, "loaded skill definitions");

    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_skill(kind: SkillKind) -> Skill {
        Skill {
            name: "Test".to_string(),
            kind,
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
            base_damage: 0.0,
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
    fn test_skill_classification() {
        let mut skill = bare_skill(SkillKind::Bolt);
        skill.base_damage = 20.0;
        assert!(skill.is_damage());
        assert!(!skill.is_heal());
        assert!(!skill.is_wall());

        let mut mend = bare_skill(SkillKind::Mend);
        mend.base_healing = 30.0;
        assert!(mend.is_heal());
    }

    #[test]
    fn test_ron_defaults_fill_omitted_fields() {
        let source = r#"(
            skills: {
                EmberLance: (
                    name: "Ember Lance",
                    kind: Bolt,
                    target: Enemy,
                    base_damage: 20.0,
                    range: 20.0,
                ),
            },
        )"#;

        let config: SkillsConfig = ron::from_str(source).unwrap();
        let book = SkillBook::new(config);
        assert_eq!(book.skill_ids().count(), 1);

        let skill = book.get(SkillId::EmberLance).unwrap();
        assert_eq!(skill.delivery, DeliveryKind::Direct);
        assert_eq!(skill.energy_cost, 0.0);
        assert_eq!(skill.soak, 0.0);
        assert!(skill.applies_chills.is_empty());
        assert!(!skill.elite);
        assert!(book.get(SkillId::WallOfSleet).is_none());
    }

    #[test]
    fn test_validate_reports_missing_ids() {
        let book = SkillBook::new(SkillsConfig {
            skills: HashMap::new(),
        });
        let missing = book.validate().unwrap_err();
        assert!(missing.contains(&SkillId::EmberLance));
        assert!(missing.contains(&SkillId::WallOfSleet));
    }
}
