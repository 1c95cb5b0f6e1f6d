//! Combat Orchestrator
//!
//! Owns the combatant roster, the shared RNG, the terrain, and the logs, and
//! advances the whole encounter one fixed tick at a time. All skill side
//! effects run here, in one fixed order, so no other module ever mutates two
//! combatants at once.
//!
//! Each tick runs in array-index order and in fixed passes (upkeep, cast
//! completion, intents, strikes, deaths). With a seeded RNG the whole match
//! is reproducible.

use glam::Vec3;
use tracing::debug;

use super::casting::CompletedCast;
use super::combatant::Combatant;
use super::constants::{BLOCKING_WALL_HEIGHT, STRIKE_RANGE};
use super::economy::SchoolState;
use super::events::{CombatEvent, DamageKind, VfxRequest};
use super::log::{CombatLog, CombatLogEventType};
use super::pipeline;
use super::rng::GameRng;
use super::skillbar::{usability, SkillUsability};
use super::skills::{DeliveryKind, SkillBook, TargetKind};
use super::terrain::Terrain;
use super::CombatantId;

/// Where a combatant wants to move this tick.
#[derive(Clone, Copy, Debug, Default)]
pub enum MovementIntent {
    #[default]
    Hold,
    /// Close toward another combatant.
    Approach(CombatantId),
    MoveTo(Vec3),
}

/// One combatant's orders for one tick. Indexed parallel to the roster.
#[derive(Clone, Copy, Debug, Default)]
pub struct Intent {
    pub movement: MovementIntent,
    /// Bar slot to use this tick, if any.
    pub skill_slot: Option<usize>,
    /// Strike/approach target.
    pub target: Option<CombatantId>,
    /// Target for the requested skill, when it differs from `target`
    /// (e.g. a mend aimed at an ally while striking an enemy).
    pub skill_target: Option<CombatantId>,
    /// Aim point for ground-targeted skills.
    pub ground_point: Option<Vec3>,
}

/// Outcome of asking to use a skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastAttempt {
    /// Activation began this tick.
    Started,
    /// Caster was busy or out of range; the request was remembered.
    Queued,
    Rejected(SkillUsability),
    TargetMissing,
    NoLineOfSight,
    /// Ground casts have no approach-then-cast; a far point is refused.
    OutOfRange,
}

/// A full encounter: roster, terrain, RNG, and telemetry.
pub struct Encounter {
    pub combatants: Vec<Combatant>,
    pub rng: GameRng,
    pub terrain: Box<dyn Terrain>,
    pub book: SkillBook,
    pub log: CombatLog,
    pub events: Vec<CombatEvent>,
    pub vfx: Vec<VfxRequest>,
}

/// Split borrows of two distinct roster entries.
fn pair_mut(
    combatants: &mut [Combatant],
    a: usize,
    b: usize,
) -> (&mut Combatant, &mut Combatant) {
    debug_assert_ne!(a, b, "pair_mut requires distinct indices");
    if a < b {
        let (left, right) = combatants.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = combatants.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

impl Encounter {
    pub fn new(book: SkillBook, terrain: Box<dyn Terrain>, rng: GameRng) -> Self {
        Self {
            combatants: Vec::new(),
            rng,
            terrain,
            book,
            log: CombatLog::default(),
            events: Vec::new(),
            vfx: Vec::new(),
        }
    }

    pub fn add_combatant(&mut self, combatant: Combatant) {
        self.log.register_combatant(
            combatant.id,
            &combatant.name,
            combatant.team,
            combatant.school.name(),
        );
        self.combatants.push(combatant);
    }

    pub fn index_of(&self, id: CombatantId) -> Option<usize> {
        self.combatants.iter().position(|c| c.id == id)
    }

    fn living_index_of(&self, id: CombatantId) -> Option<usize> {
        self.index_of(id).filter(|&i| self.combatants[i].is_alive())
    }

    /// The winning team, once only one side has anyone standing.
    pub fn winner(&self) -> Option<u8> {
        let mut living_team = None;
        for c in self.combatants.iter().filter(|c| c.is_alive()) {
            match living_team {
                None => living_team = Some(c.team),
                Some(team) if team != c.team => return None,
                Some(_) => {}
            }
        }
        living_team
    }

    // ========================================================================
    // Skill requests
    // ========================================================================

    /// Request a skill use against a combatant (or self). Busy or
    /// out-of-range casters get the request queued instead of rejected.
    pub fn try_start_cast(
        &mut self,
        caster_index: usize,
        slot: usize,
        target_id: Option<CombatantId>,
    ) -> CastAttempt {
        let caster = &self.combatants[caster_index];
        let check = usability(
            &caster.bar,
            &caster.cast,
            &self.book,
            slot,
            caster.economy.pool.current,
            caster.conditions.energy_cost_multiplier(),
        );
        match check {
            SkillUsability::Usable => {}
            SkillUsability::AlreadyCasting => {
                self.combatants[caster_index].cast.queue_skill(slot, target_id);
                return CastAttempt::Queued;
            }
            other => return CastAttempt::Rejected(other),
        }

        let Some(skill_id) = self.combatants[caster_index].bar.slot(slot) else {
            return CastAttempt::Rejected(SkillUsability::NoSkillEquipped);
        };
        let skill = self.book.get_unchecked(skill_id).clone();

        match skill.target {
            TargetKind::SelfCast => {
                let caster = &mut self.combatants[caster_index];
                let self_id = caster.id;
                caster.cast.start_cast(slot, &skill, Some(self_id));
                self.execute_if_instant(caster_index, &skill);
                CastAttempt::Started
            }
            TargetKind::Ground => CastAttempt::TargetMissing,
            TargetKind::Enemy | TargetKind::Ally => {
                let Some(target_index) =
                    target_id.and_then(|id| self.living_index_of(id))
                else {
                    return CastAttempt::TargetMissing;
                };
                let same_team = self.combatants[target_index].team
                    == self.combatants[caster_index].team;
                if skill.target == TargetKind::Enemy && same_team {
                    return CastAttempt::TargetMissing;
                }
                if skill.target == TargetKind::Ally && !same_team {
                    return CastAttempt::TargetMissing;
                }

                let caster_pos = self.combatants[caster_index].position;
                let target_pos = self.combatants[target_index].position;
                if caster_pos.distance(target_pos) > skill.range {
                    // Approach, then cast.
                    self.combatants[caster_index]
                        .cast
                        .queue_skill(slot, target_id);
                    return CastAttempt::Queued;
                }
                if skill.delivery == DeliveryKind::Direct
                    && skill.is_damage()
                    && self
                        .terrain
                        .wall_between(caster_pos, target_pos, BLOCKING_WALL_HEIGHT)
                {
                    return CastAttempt::NoLineOfSight;
                }

                self.combatants[caster_index]
                    .cast
                    .start_cast(slot, &skill, target_id);
                self.execute_if_instant(caster_index, &skill);
                CastAttempt::Started
            }
        }
    }

    /// Zero-activation skills skip the activating phase: the cast resolves
    /// inside the start request instead of on a later tick.
    fn execute_if_instant(&mut self, caster_index: usize, skill: &super::skills::Skill) {
        if skill.activation_ms > 0.0 {
            return;
        }
        if let Some(done) = self.combatants[caster_index].cast.update(0.0) {
            self.execute_skill(caster_index, done);
        }
    }

    /// Request a ground-targeted skill at a point.
    pub fn try_start_ground_cast(
        &mut self,
        caster_index: usize,
        slot: usize,
        point: Vec3,
    ) -> CastAttempt {
        let caster = &self.combatants[caster_index];
        let check = usability(
            &caster.bar,
            &caster.cast,
            &self.book,
            slot,
            caster.economy.pool.current,
            caster.conditions.energy_cost_multiplier(),
        );
        if check != SkillUsability::Usable {
            return CastAttempt::Rejected(check);
        }

        let Some(skill_id) = self.combatants[caster_index].bar.slot(slot) else {
            return CastAttempt::Rejected(SkillUsability::NoSkillEquipped);
        };
        let skill = self.book.get_unchecked(skill_id).clone();
        if skill.target != TargetKind::Ground {
            return CastAttempt::TargetMissing;
        }
        if self.combatants[caster_index].position.distance(point) > skill.range {
            return CastAttempt::OutOfRange;
        }

        self.combatants[caster_index]
            .cast
            .start_ground_cast(slot, &skill, point);
        self.execute_if_instant(caster_index, &skill);
        CastAttempt::Started
    }

    // ========================================================================
    // Skill execution
    // ========================================================================

    /// Run a finished activation's effects. All costs are deducted here, at
    /// completion; a cancelled cast never pays.
    fn execute_skill(&mut self, caster_index: usize, completed: CompletedCast) {
        let Some(skill_id) = self.combatants[caster_index].bar.slot(completed.slot) else {
            self.combatants[caster_index].cast.cancel_cast();
            return;
        };
        let skill = self.book.get_unchecked(skill_id).clone();

        // Re-resolve the target; a cast on a corpse fizzles without cost.
        let target_index = match skill.target {
            TargetKind::SelfCast => Some(caster_index),
            TargetKind::Ground => None,
            TargetKind::Enemy | TargetKind::Ally => {
                match completed.target.and_then(|id| self.living_index_of(id)) {
                    Some(i) => Some(i),
                    None => {
                        let caster = &mut self.combatants[caster_index];
                        caster.cast.interrupt();
                        self.events.push(CombatEvent::Interrupted { caster: caster.id });
                        return;
                    }
                }
            }
        };

        // Verify the costs are still payable before committing.
        let adjusted_cost = skill.energy_cost
            * self.combatants[caster_index]
                .conditions
                .energy_cost_multiplier();
        let caster = &mut self.combatants[caster_index];
        let can_pay_energy = caster.economy.can_afford(adjusted_cost)
            || matches!(caster.economy.state, SchoolState::Pact { .. });
        let can_pay_grit = caster.economy.grit() >= skill.grit_cost
            || !matches!(caster.economy.state, SchoolState::Forge { .. });
        if !can_pay_energy || !can_pay_grit {
            caster.cast.interrupt();
            self.events.push(CombatEvent::Interrupted { caster: caster.id });
            return;
        }

        // Commit: cooldown and aftercast start now.
        let cooldown_reduction = caster.conditions.cooldown_reduction();
        caster.cast.complete_cast(&skill, cooldown_reduction);

        // Deduct costs. Pact casters may overspend into debt.
        if !caster.economy.spend(adjusted_cost) {
            let available = caster.economy.pool.current;
            caster.economy.spend(available);
            caster.economy.add_debt(adjusted_cost - available);
        }
        caster.economy.spend_grit(skill.grit_cost);
        if skill.credit_cost > 0.0 {
            caster.economy.add_debt(skill.credit_cost);
        }
        if skill.warmth_sacrifice_pct > 0.0 {
            let sacrifice = caster.warmth.current * skill.warmth_sacrifice_pct;
            caster.warmth.current = (caster.warmth.current - sacrifice).max(1.0);
        }
        caster.economy.on_skill_use(skill.kind, skill.rhythm_cost);
        if skill.grants_energy > 0.0 {
            caster.economy.grant(skill.grants_energy);
        }

        let caster_id = caster.id;
        let caster_name = caster.name.clone();
        self.events.push(CombatEvent::SkillCast {
            caster: caster_id,
            target: target_index.map(|i| self.combatants[i].id),
            skill_name: skill.name.clone(),
            adjusted_cost,
        });
        self.log.log(
            CombatLogEventType::SkillUsed,
            format!("{} uses {}", caster_name, skill.name),
        );
        debug!(caster = caster_id, skill = %skill.name, "skill executed");

        match (skill.target, target_index) {
            (TargetKind::Enemy, Some(target_index)) => {
                self.resolve_offensive_skill(caster_index, target_index, &skill);
            }
            (TargetKind::Ally | TargetKind::SelfCast, Some(target_index)) => {
                self.resolve_supportive_skill(caster_index, target_index, &skill);
            }
            (TargetKind::Enemy | TargetKind::Ally | TargetKind::SelfCast, None) => {}
            (TargetKind::Ground, _) => {
                if let Some(point) = completed.ground_point {
                    if skill.is_wall() {
                        self.terrain.raise_wall(point, skill.wall_length, skill.wall_height);
                    }
                    self.vfx.push(VfxRequest::ImpactMarker { position: point });
                }
            }
        }
    }

    fn resolve_offensive_skill(
        &mut self,
        caster_index: usize,
        target_index: usize,
        skill: &super::skills::Skill,
    ) {
        let (outcome, caster_id, target_id, target_pos) = {
            let (caster, target) = pair_mut(&mut self.combatants, caster_index, target_index);
            let outcome =
                pipeline::resolve_damage(caster, target, skill, &mut self.rng, self.terrain.as_ref());
            self.vfx.push(VfxRequest::Projectile {
                start: caster.position,
                end: target.position,
                caster: caster.id,
                target: target.id,
            });
            (outcome, caster.id, target.id, target.position)
        };

        if outcome.missed {
            self.log.log(
                CombatLogEventType::Damage,
                format!("{} misses", skill.name),
            );
            return;
        }

        // A prevented death keeps the intended damage in the telemetry even
        // though warmth only dropped to 1.0.
        let (lost, recorded) = if outcome.blocked {
            (0.0, 0.0)
        } else {
            let (caster, target) = pair_mut(&mut self.combatants, caster_index, target_index);
            let applied = target.apply_damage(outcome.amount);
            caster.damage_dealt += applied.lost;
            let recorded = if applied.prevented_death {
                applied.intended
            } else {
                applied.lost
            };
            (applied.lost, recorded)
        };

        self.events.push(CombatEvent::Damage {
            caster: caster_id,
            target: target_id,
            amount: recorded,
            kind: DamageKind::Skill,
            missed: false,
            blocked: outcome.blocked,
        });
        self.log.log_damage(
            caster_id,
            target_id,
            recorded,
            Some(&skill.name),
            format!("{} hits for {:.1}", skill.name, recorded),
        );
        self.vfx.push(VfxRequest::DamageNumber {
            position: target_pos,
            amount: lost,
            blocked: outcome.blocked,
        });

        if !outcome.blocked {
            // Lifedrain-style skills heal the caster off an enemy hit.
            if skill.is_heal() {
                let healer = &self.combatants[caster_index];
                let amount = pipeline::resolve_healing(healer, healer, skill);
                let restored = self.combatants[caster_index].apply_healing(amount);
                self.combatants[caster_index].healing_done += restored;
                self.events.push(CombatEvent::Healing {
                    caster: caster_id,
                    target: caster_id,
                    amount: restored,
                });
                self.log.log_healing(
                    caster_id,
                    caster_id,
                    restored,
                    Some(&skill.name),
                    format!("{} restores {:.1} warmth", skill.name, restored),
                );
            }

            self.apply_skill_conditions(caster_index, target_index, skill);
            self.combatants[caster_index].economy.on_hit_landed();
        }

        if !self.combatants[target_index].is_alive() {
            self.handle_death(target_index, Some(caster_id));
        }
    }

    fn resolve_supportive_skill(
        &mut self,
        caster_index: usize,
        target_index: usize,
        skill: &super::skills::Skill,
    ) {
        let caster_id = self.combatants[caster_index].id;
        let target_id = self.combatants[target_index].id;

        if skill.is_heal() {
            let amount = pipeline::resolve_healing(
                &self.combatants[caster_index],
                &self.combatants[target_index],
                skill,
            );
            let restored = self.combatants[target_index].apply_healing(amount);
            self.combatants[caster_index].healing_done += restored;
            self.events.push(CombatEvent::Healing {
                caster: caster_id,
                target: target_id,
                amount: restored,
            });
            self.log.log_healing(
                caster_id,
                target_id,
                restored,
                Some(&skill.name),
                format!("{} restores {:.1} warmth", skill.name, restored),
            );
            self.vfx.push(VfxRequest::HealMarker {
                position: self.combatants[target_index].position,
                amount: restored,
            });
        }

        self.apply_skill_conditions(caster_index, target_index, skill);
    }

    /// Land a skill's chills, cozies, and effects. Offensive skills put
    /// chills and effects on the enemy and cozies on the caster; supportive
    /// skills put everything on the friendly target (chills on a friendly
    /// target are self-inflicted drawbacks).
    fn apply_skill_conditions(
        &mut self,
        caster_index: usize,
        target_index: usize,
        skill: &super::skills::Skill,
    ) {
        let caster_id = self.combatants[caster_index].id;
        let offensive = skill.target == TargetKind::Enemy;

        for chill in &skill.applies_chills {
            let target = &mut self.combatants[target_index];
            target
                .conditions
                .add_chill(chill.kind, chill.duration_ms, chill.intensity, Some(caster_id));
            let name = chill.kind.name();
            let target_id = target.id;
            self.events.push(CombatEvent::ConditionApplied {
                caster: caster_id,
                target: target_id,
                condition_name: name,
            });
            self.log.log(
                CombatLogEventType::ConditionApplied,
                format!("{} is afflicted by {}", self.combatants[target_index].name, name),
            );
        }

        let cozy_index = if offensive { caster_index } else { target_index };
        for cozy in &skill.applies_cozies {
            let bearer = &mut self.combatants[cozy_index];
            bearer
                .conditions
                .add_cozy(cozy.kind, cozy.duration_ms, cozy.intensity, Some(caster_id));
            let name = cozy.kind.name();
            let bearer_id = bearer.id;
            self.events.push(CombatEvent::ConditionApplied {
                caster: caster_id,
                target: bearer_id,
                condition_name: name,
            });
            self.log.log(
                CombatLogEventType::ConditionApplied,
                format!("{} is wrapped in {}", self.combatants[cozy_index].name, name),
            );
        }

        for effect in &skill.applies_effects {
            let target = &mut self.combatants[target_index];
            target.conditions.add_effect(effect, Some(caster_id));
            let name = effect.kind.name();
            let target_id = target.id;
            self.events.push(CombatEvent::ConditionApplied {
                caster: caster_id,
                target: target_id,
                condition_name: name,
            });
        }
    }

    fn handle_death(&mut self, victim_index: usize, killer: Option<CombatantId>) {
        let victim = &mut self.combatants[victim_index];
        victim.cast.force_idle();
        let victim_id = victim.id;
        let name = victim.name.clone();
        self.events.push(CombatEvent::Death {
            victim: victim_id,
            killer,
        });
        self.log
            .log_death(victim_id, killer, format!("{} succumbs to the cold", name));
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the encounter one fixed tick. `intents` is indexed parallel
    /// to the roster; missing entries mean "hold".
    pub fn tick(&mut self, intents: &[Intent], dt_secs: f32) {
        self.log.match_time += dt_secs;

        // Pass 1: upkeep, collect finished activations.
        let mut completed: Vec<(usize, CompletedCast)> = Vec::new();
        for (i, combatant) in self.combatants.iter_mut().enumerate() {
            if !combatant.is_alive() {
                continue;
            }
            combatant.conditions.update(dt_secs * 1000.0);
            combatant.warmth.update(dt_secs);
            combatant.economy.update(dt_secs);
            if let Some(done) = combatant.cast.update(dt_secs) {
                completed.push((i, done));
            }
            combatant.debug_validate();
        }

        // Pass 2: execute finished casts, in roster order.
        for (i, done) in completed {
            if self.combatants[i].is_alive() {
                self.execute_skill(i, done);
            }
        }

        // Pass 3: movement, new skill requests, queued retries.
        for i in 0..self.combatants.len() {
            if !self.combatants[i].is_alive() {
                continue;
            }
            let intent = intents.get(i).copied().unwrap_or_default();

            if let Some(id) = intent.target {
                self.combatants[i].target = Some(id);
            }

            self.apply_movement(i, intent.movement, dt_secs);

            if let Some(slot) = intent.skill_slot {
                if let Some(point) = intent.ground_point {
                    self.try_start_ground_cast(i, slot, point);
                } else {
                    let target = intent
                        .skill_target
                        .or(intent.target)
                        .or(self.combatants[i].target);
                    self.try_start_cast(i, slot, target);
                }
            } else if self.combatants[i].cast.is_idle() {
                // Approach-then-cast: replay the queued request.
                if let Some(queued) = self.combatants[i].cast.take_queued() {
                    self.try_start_cast(i, queued.slot, queued.target);
                    if self.combatants[i].cast.is_approaching()
                        && matches!(intent.movement, MovementIntent::Hold)
                    {
                        // Still out of range; close in when the intent
                        // didn't already move us.
                        self.chase_queued_target(i, queued.target, dt_secs);
                    }
                }
            }
        }

        // Pass 4: strikes. Casting blocks striking.
        for i in 0..self.combatants.len() {
            self.tick_strike(i, dt_secs);
        }
    }

    fn apply_movement(&mut self, index: usize, movement: MovementIntent, dt_secs: f32) {
        // Activation roots the caster; aftercast does not.
        if self.combatants[index].cast.is_activating() {
            return;
        }
        let destination = match movement {
            MovementIntent::Hold => return,
            MovementIntent::MoveTo(point) => point,
            MovementIntent::Approach(id) => match self.living_index_of(id) {
                Some(t) if t != index => self.combatants[t].position,
                _ => return,
            },
        };
        let combatant = &mut self.combatants[index];
        let step = combatant.effective_move_speed() * dt_secs;
        let to_dest = destination - combatant.position;
        let distance = to_dest.length();
        if distance <= f32::EPSILON {
            return;
        }
        let travel = step.min(distance);
        combatant.position += to_dest / distance * travel;
    }

    /// Close distance toward the target of a queued skill.
    fn chase_queued_target(
        &mut self,
        index: usize,
        target: Option<CombatantId>,
        dt_secs: f32,
    ) {
        if let Some(id) = target {
            self.apply_movement(index, MovementIntent::Approach(id), dt_secs);
        }
    }

    fn tick_strike(&mut self, index: usize, dt_secs: f32) {
        if !self.combatants[index].is_alive() {
            return;
        }
        self.combatants[index].strike_timer =
            (self.combatants[index].strike_timer - dt_secs).max(0.0);

        if !self.combatants[index].cast.is_idle() {
            return;
        }
        if self.combatants[index].strike_timer > 0.0 {
            return;
        }
        let Some(target_index) = self.combatants[index]
            .target
            .and_then(|id| self.living_index_of(id))
        else {
            return;
        };
        if target_index == index
            || self.combatants[target_index].team == self.combatants[index].team
        {
            return;
        }
        let distance = self.combatants[index]
            .position
            .distance(self.combatants[target_index].position);
        if distance > STRIKE_RANGE {
            return;
        }

        let (outcome, caster_id, target_id) = {
            let (caster, target) = pair_mut(&mut self.combatants, index, target_index);
            let outcome =
                pipeline::resolve_strike(caster, target, &mut self.rng, self.terrain.as_ref());
            (outcome, caster.id, target.id)
        };
        self.combatants[index].strike_timer = self.combatants[index].strike_interval;

        if outcome.missed {
            return;
        }
        let recorded = if outcome.blocked {
            0.0
        } else {
            let (caster, target) = pair_mut(&mut self.combatants, index, target_index);
            let applied = target.apply_damage(outcome.amount);
            caster.damage_dealt += applied.lost;
            caster.economy.on_hit_landed();
            if applied.prevented_death {
                applied.intended
            } else {
                applied.lost
            }
        };

        self.events.push(CombatEvent::Damage {
            caster: caster_id,
            target: target_id,
            amount: recorded,
            kind: DamageKind::Strike,
            missed: false,
            blocked: outcome.blocked,
        });
        self.log.log_damage(
            caster_id,
            target_id,
            recorded,
            None,
            format!("strike hits for {:.1}", recorded),
        );

        if !self.combatants[target_index].is_alive() {
            self.handle_death(target_index, Some(caster_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::economy::School;
    use crate::combat::skillbar::SkillBar;
    use crate::combat::skills::{
        Skill, SkillId, SkillKind, SkillsConfig,
    };
    use crate::combat::terrain::OpenField;
    use std::collections::HashMap;

    fn instant_bolt() -> Skill {
        Skill {
            name: "Test Bolt".to_string(),
            kind: SkillKind::Bolt,
            target: TargetKind::Enemy,
            delivery: DeliveryKind::Direct,
            activation_ms: 0.0,
            aftercast_ms: 0.0,
            recharge_ms: 2000.0,
            range: 20.0,
            energy_cost: 5.0,
            grit_cost: 0,
            credit_cost: 0.0,
            rhythm_cost: 0,
            warmth_sacrifice_pct: 0.0,
            base_damage: 20.0,
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

    fn timed_bolt() -> Skill {
        let mut skill = instant_bolt();
        skill.name = "Timed Bolt".to_string();
        skill.activation_ms = 500.0;
        skill
    }

    /// Slot 0 holds an instant bolt, slot 1 a 500 ms bolt.
    fn two_combatant_encounter() -> Encounter {
        let mut skills = HashMap::new();
        skills.insert(SkillId::EmberLance, instant_bolt());
        skills.insert(SkillId::WaysongBolt, timed_bolt());
        let book = SkillBook::new(SkillsConfig { skills });

        let mut encounter =
            Encounter::new(book, Box::new(OpenField), GameRng::from_seed(7));
        let mut a = Combatant::new(0, 0, School::Hearth, Vec3::ZERO);
        a.bar = SkillBar::from_skills(&[SkillId::EmberLance, SkillId::WaysongBolt]);
        let b = Combatant::new(1, 1, School::Hearth, Vec3::new(5.0, 0.0, 0.0));
        encounter.add_combatant(a);
        encounter.add_combatant(b);
        encounter
    }

    #[test]
    fn test_zero_activation_skill_executes_inside_the_request() {
        let mut encounter = two_combatant_encounter();
        let before = encounter.combatants[1].warmth.current;

        assert_eq!(
            encounter.try_start_cast(0, 0, Some(1)),
            CastAttempt::Started
        );

        assert!(
            encounter.combatants[1].warmth.current < before,
            "An instant bolt lands without waiting for a tick"
        );
        assert!(encounter.combatants[0].cast.cooldown(0) > 0.0);
        assert!(
            encounter.combatants[0].cast.is_idle(),
            "Zero aftercast returns straight to idle"
        );
    }

    #[test]
    fn test_energy_deducted_at_completion_not_start() {
        let mut encounter = two_combatant_encounter();
        let energy_before = encounter.combatants[0].economy.pool.current;

        encounter.try_start_cast(0, 1, Some(1));
        assert_eq!(
            encounter.combatants[0].economy.pool.current, energy_before,
            "Starting a cast must not deduct energy"
        );

        // 600 ms of ticking finishes the 500 ms activation; regen over the
        // window is far smaller than the 5.0 cost.
        encounter.tick(&[Intent::default(), Intent::default()], 0.6);
        assert!(
            encounter.combatants[0].economy.pool.current < energy_before,
            "Completion deducts the cost"
        );
    }

    #[test]
    fn test_cast_on_dead_target_fizzles_without_cost() {
        let mut encounter = two_combatant_encounter();
        encounter.try_start_cast(0, 1, Some(1));
        encounter.combatants[1].warmth.current = 0.0;

        let energy_before = encounter.combatants[0].economy.pool.current;
        encounter.tick(&[Intent::default(), Intent::default()], 0.6);

        assert!(
            encounter.combatants[0].economy.pool.current >= energy_before,
            "A fizzled cast pays nothing"
        );
        assert_eq!(
            encounter.combatants[0].cast.cooldown(1),
            0.0,
            "A fizzled cast triggers no cooldown"
        );
    }

    #[test]
    fn test_out_of_range_request_queues_and_approaches() {
        let mut encounter = two_combatant_encounter();
        encounter.combatants[1].position = Vec3::new(100.0, 0.0, 0.0);

        assert_eq!(
            encounter.try_start_cast(0, 0, Some(1)),
            CastAttempt::Queued
        );

        let start_x = encounter.combatants[0].position.x;
        // Several ticks of chasing.
        for _ in 0..20 {
            encounter.tick(&[Intent::default(), Intent::default()], 0.05);
        }
        assert!(
            encounter.combatants[0].position.x > start_x,
            "Queued caster should close the distance"
        );
    }

    #[test]
    fn test_winner_detection() {
        let mut encounter = two_combatant_encounter();
        assert_eq!(encounter.winner(), None);
        encounter.combatants[1].warmth.current = 0.0;
        assert_eq!(encounter.winner(), Some(0));
    }

    #[test]
    fn test_strikes_land_in_melee_range() {
        let mut encounter = two_combatant_encounter();
        encounter.combatants[0].target = Some(1);
        encounter.combatants[1].position = Vec3::new(1.0, 0.0, 0.0);
        let before = encounter.combatants[1].warmth.current;

        encounter.tick(&[Intent::default(), Intent::default()], 0.05);
        assert!(
            encounter.combatants[1].warmth.current < before,
            "A strike should land once the timer is ready"
        );
        assert!(encounter.combatants[0].strike_timer > 0.0);
    }
}
