//! Headless match execution
//!
//! Runs matches without any frontend, suitable for automated balance
//! testing. The runner drives every combatant with the same simple script
//! (approach the first living enemy, use the first usable skill), so match
//! outcomes measure the numbers, not the AI.

use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::combat::combatant::Combatant;
use crate::combat::economy::School;
use crate::combat::encounter::{Encounter, Intent, MovementIntent};
use crate::combat::log::CombatLogEventType;
use crate::combat::rng::GameRng;
use crate::combat::skillbar::{usability, SkillBar, SkillUsability};
use crate::combat::skills::{load_skill_book, SkillBookError, SkillId, TargetKind, DEFAULT_SKILLS_PATH};
use glam::Vec3;

use super::config::{HeadlessConfigError, HeadlessMatchConfig};

pub const MAX_TEAM_SIZE: usize = 4;

#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error(transparent)]
    Config(#[from] HeadlessConfigError),
    #[error(transparent)]
    Skills(#[from] SkillBookError),
    #[error("failed to save match log: {0}")]
    SaveLog(#[from] std::io::Error),
}

/// Result of a completed headless match
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The winning team (1 or 2), or None for a timeout draw
    pub winner: Option<u8>,
    /// Total match duration in seconds
    pub match_time: f32,
    pub team1_combatants: Vec<CombatantResult>,
    pub team2_combatants: Vec<CombatantResult>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

/// Statistics for a single combatant after the match
#[derive(Debug, Clone)]
pub struct CombatantResult {
    pub name: String,
    pub school: String,
    pub max_warmth: f32,
    /// Warmth remaining at match end (0 if dead)
    pub final_warmth: f32,
    pub survived: bool,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub healing_done: f32,
}

/// Default loadout for each school, left to right on the bar.
fn default_loadout(school: School) -> Vec<SkillId> {
    match school {
        School::Hearth => vec![
            SkillId::EmberLance,
            SkillId::HearthGlow,
            SkillId::KindleWard,
            SkillId::BlanketWeave,
            SkillId::EmberBurst,
        ],
        School::Forge => vec![
            SkillId::AnvilStrike,
            SkillId::GritBreaker,
            SkillId::ShieldOfCinders,
            SkillId::MountainResolve,
        ],
        School::Wander => vec![
            SkillId::WaysongBolt,
            SkillId::TravelersMend,
            SkillId::TrickStep,
            SkillId::WallOfSleet,
            SkillId::ThousandPaths,
        ],
        School::Pact => vec![
            SkillId::BloodTithe,
            SkillId::FrostToll,
            SkillId::NeedleOfThaw,
            SkillId::FinalEmber,
            SkillId::DebtOfWinter,
        ],
        School::Cadence => vec![
            SkillId::CarolingStrike,
            SkillId::ChimeOfRest,
            SkillId::MulledCourage,
            SkillId::EiderdownWrap,
            SkillId::PerfectMeasure,
        ],
    }
}

/// Pick this tick's orders for one combatant: chase the first living enemy
/// and fire the leftmost usable skill at them.
fn scripted_intent(encounter: &Encounter, index: usize) -> Intent {
    let me = &encounter.combatants[index];
    if !me.is_alive() {
        return Intent::default();
    }

    let Some(enemy) = encounter
        .combatants
        .iter()
        .find(|c| c.team != me.team && c.is_alive())
    else {
        return Intent::default();
    };

    let mut skill_slot = None;
    let mut skill_target = None;
    let mut ground_point = None;
    for slot in 0..crate::combat::constants::BAR_SLOTS {
        let check = usability(
            &me.bar,
            &me.cast,
            &encounter.book,
            slot,
            me.economy.pool.current,
            me.conditions.energy_cost_multiplier(),
        );
        let Some(id) = me.bar.slot(slot) else { continue };
        if check == SkillUsability::Usable {
            match encounter.book.get_unchecked(id).target {
                TargetKind::Ground => {
                    // Drop walls between us and the enemy.
                    ground_point = Some((me.position + enemy.position) * 0.5);
                }
                // The script has no ally heuristics; supportive skills go
                // on the caster.
                TargetKind::Ally | TargetKind::SelfCast => skill_target = Some(me.id),
                TargetKind::Enemy => skill_target = Some(enemy.id),
            }
            skill_slot = Some(slot);
            break;
        }
    }

    Intent {
        movement: MovementIntent::Approach(enemy.id),
        skill_slot,
        target: Some(enemy.id),
        skill_target,
        ground_point,
    }
}

/// Run a headless match to completion.
pub fn run_headless_match(config: &HeadlessMatchConfig) -> Result<MatchResult, HeadlessError> {
    let skills_path = config
        .skills_path
        .clone()
        .unwrap_or_else(|| DEFAULT_SKILLS_PATH.to_string());
    let book = load_skill_book(Path::new(&skills_path))?;
    let terrain = config.build_terrain()?;

    let rng = match config.random_seed {
        Some(seed) => {
            info!(seed, "using deterministic RNG");
            GameRng::from_seed(seed)
        }
        None => GameRng::from_entropy(),
    };

    let mut encounter = Encounter::new(book, terrain, rng);
    encounter.log.metadata.seed = config.random_seed;
    encounter.log.log(
        CombatLogEventType::MatchEvent,
        "Match started (headless mode)".to_string(),
    );

    let mut next_id = 0;
    for (team, names, spawn_x) in [(1u8, &config.team1, -15.0f32), (2u8, &config.team2, 15.0f32)] {
        for (i, name) in names.iter().enumerate() {
            let school = HeadlessMatchConfig::parse_school(name)?;
            let position = Vec3::new(spawn_x, 0.0, (i as f32 - 1.0) * 3.0);
            let mut combatant = Combatant::new(next_id, team, school, position);
            combatant.bar = SkillBar::from_skills(&default_loadout(school));
            encounter.add_combatant(combatant);
            next_id += 1;
        }
    }

    info!(
        team1 = config.team1.len(),
        team2 = config.team2.len(),
        arena = %config.arena,
        "headless match setup complete"
    );

    let dt = config.tick_ms / 1000.0;
    let mut elapsed = 0.0f32;
    let winner = loop {
        if let Some(team) = encounter.winner() {
            break Some(team);
        }
        if encounter.combatants.iter().all(|c| !c.is_alive()) {
            info!("both teams eliminated, declaring a draw");
            break None;
        }
        if elapsed >= config.max_duration_secs {
            info!(elapsed, "match timed out, declaring a draw");
            break None;
        }

        let intents: Vec<Intent> = (0..encounter.combatants.len())
            .map(|i| scripted_intent(&encounter, i))
            .collect();
        encounter.tick(&intents, dt);
        elapsed += dt;
    };

    match winner {
        Some(team) => {
            info!(team, "match ended");
            encounter.log.log(
                CombatLogEventType::MatchEvent,
                format!("Team {} wins", team),
            );
        }
        None => {
            encounter.log.log(
                CombatLogEventType::MatchEvent,
                "Match ended in a draw".to_string(),
            );
        }
    }

    encounter.log.metadata.duration_secs = elapsed;
    encounter.log.metadata.winner = winner;
    if let Some(path) = &config.output_path {
        encounter.log.save_to_file(Path::new(path))?;
        info!(path = %path, "match log saved");
    }

    let mut team1_combatants = Vec::new();
    let mut team2_combatants = Vec::new();
    for c in &encounter.combatants {
        let result = CombatantResult {
            name: c.name.clone(),
            school: c.school.name().to_string(),
            max_warmth: c.warmth.maximum,
            final_warmth: c.warmth.current,
            survived: c.is_alive(),
            damage_dealt: c.damage_dealt,
            damage_taken: c.damage_taken,
            healing_done: c.healing_done,
        };
        if c.team == 1 {
            team1_combatants.push(result);
        } else {
            team2_combatants.push(result);
        }
    }

    Ok(MatchResult {
        winner,
        match_time: elapsed,
        team1_combatants,
        team2_combatants,
        random_seed: config.random_seed,
    })
}
