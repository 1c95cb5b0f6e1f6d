//! Combat logging
//!
//! Records all combat events for display and post-match analysis. Entries
//! carry both a human-readable message and structured data so the balance
//! harness can aggregate without parsing strings. The whole log exports to
//! JSON alongside match metadata.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::CombatantId;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Timestamp in match time (seconds since match start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
    /// Structured payload for aggregation queries
    #[serde(default)]
    pub data: Option<StructuredEventData>,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatLogEventType {
    /// Damage dealt
    Damage,
    /// Healing done
    Healing,
    /// Skill used
    SkillUsed,
    /// Chill, cozy, or effect applied
    ConditionApplied,
    /// Combatant died
    Death,
    /// Match event (start, end, etc.)
    MatchEvent,
}

/// Structured payload attached to damage/healing/death entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredEventData {
    pub source: CombatantId,
    pub target: CombatantId,
    /// Warmth actually gained or lost
    #[serde(default)]
    pub amount: f32,
    /// Skill name, when the event came from one
    #[serde(default)]
    pub skill_name: Option<String>,
}

/// Per-combatant metadata written into the exported log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantMetadata {
    pub id: CombatantId,
    pub name: String,
    pub team: u8,
    pub school: String,
}

/// Match-level metadata for the exported log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchMetadata {
    pub seed: Option<u64>,
    pub duration_secs: f32,
    pub winner: Option<u8>,
    pub combatants: Vec<CombatantMetadata>,
}

/// The combat log storing all events of one match
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current match time
    pub match_time: f32,
    pub metadata: MatchMetadata,
}

impl CombatLog {
    /// Clear the log for a new match
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
        self.metadata = MatchMetadata::default();
    }

    pub fn register_combatant(&mut self, id: CombatantId, name: &str, team: u8, school: &str) {
        self.metadata.combatants.push(CombatantMetadata {
            id,
            name: name.to_string(),
            team,
            school: school.to_string(),
        });
    }

    /// Add a message-only entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
            data: None,
        });
    }

    pub fn log_damage(
        &mut self,
        source: CombatantId,
        target: CombatantId,
        amount: f32,
        skill_name: Option<&str>,
        message: String,
    ) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type: CombatLogEventType::Damage,
            message,
            data: Some(StructuredEventData {
                source,
                target,
                amount,
                skill_name: skill_name.map(str::to_string),
            }),
        });
    }

    pub fn log_healing(
        &mut self,
        source: CombatantId,
        target: CombatantId,
        amount: f32,
        skill_name: Option<&str>,
        message: String,
    ) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type: CombatLogEventType::Healing,
            message,
            data: Some(StructuredEventData {
                source,
                target,
                amount,
                skill_name: skill_name.map(str::to_string),
            }),
        });
    }

    pub fn log_death(&mut self, victim: CombatantId, killer: Option<CombatantId>, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type: CombatLogEventType::Death,
            message,
            data: Some(StructuredEventData {
                source: killer.unwrap_or(victim),
                target: victim,
                amount: 0.0,
                skill_name: None,
            }),
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Total damage dealt by one combatant over the match
    pub fn total_damage_dealt(&self, source: CombatantId) -> f32 {
        self.entries
            .iter()
            .filter(|e| e.event_type == CombatLogEventType::Damage)
            .filter_map(|e| e.data.as_ref())
            .filter(|d| d.source == source)
            .map(|d| d.amount)
            .sum()
    }

    /// Damage totals keyed by skill name (strikes group under "Strike")
    pub fn damage_by_skill(&self, source: CombatantId) -> HashMap<String, f32> {
        let mut totals = HashMap::new();
        for data in self
            .entries
            .iter()
            .filter(|e| e.event_type == CombatLogEventType::Damage)
            .filter_map(|e| e.data.as_ref())
            .filter(|d| d.source == source)
        {
            let key = data.skill_name.clone().unwrap_or_else(|| "Strike".to_string());
            *totals.entry(key).or_insert(0.0) += data.amount;
        }
        totals
    }

    /// Killing blows landed by one combatant
    pub fn killing_blows(&self, source: CombatantId) -> usize {
        self.entries
            .iter()
            .filter(|e| e.event_type == CombatLogEventType::Death)
            .filter_map(|e| e.data.as_ref())
            .filter(|d| d.source == source && d.target != source)
            .count()
    }

    /// Export the full log as pretty-printed JSON
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregation_queries() {
        let mut log = CombatLog::default();
        log.log_damage(1, 2, 25.0, Some("Ember Lance"), "hit".to_string());
        log.log_damage(1, 2, 15.0, Some("Ember Lance"), "hit".to_string());
        log.log_damage(1, 2, 8.0, None, "strike".to_string());
        log.log_damage(2, 1, 40.0, Some("Anvil Strike"), "hit".to_string());

        assert_eq!(log.total_damage_dealt(1), 48.0);
        assert_eq!(log.total_damage_dealt(2), 40.0);
        assert_eq!(log.filter_by_type(CombatLogEventType::Damage).len(), 4);
        assert!(log.filter_by_type(CombatLogEventType::Death).is_empty());

        let by_skill = log.damage_by_skill(1);
        assert_eq!(by_skill["Ember Lance"], 40.0);
        assert_eq!(by_skill["Strike"], 8.0);
    }

    #[test]
    fn test_killing_blows_count() {
        let mut log = CombatLog::default();
        log.log_death(2, Some(1), "died".to_string());
        log.log_death(3, None, "collapsed".to_string());

        assert_eq!(log.killing_blows(1), 1);
        assert_eq!(log.killing_blows(3), 0, "Unattributed deaths don't credit anyone");
    }

    #[test]
    fn test_entries_carry_match_time() {
        let mut log = CombatLog::default();
        log.match_time = 12.5;
        log.log(CombatLogEventType::MatchEvent, "halfway".to_string());
        assert_eq!(log.entries[0].timestamp, 12.5);
    }

    #[test]
    fn test_clear_resets_for_a_new_match() {
        let mut log = CombatLog::default();
        log.match_time = 30.0;
        log.register_combatant(1, "Hearth 1", 1, "Hearth");
        log.log(CombatLogEventType::MatchEvent, "over".to_string());

        log.clear();
        assert!(log.entries.is_empty());
        assert_eq!(log.match_time, 0.0);
        assert!(log.metadata.combatants.is_empty());
    }

    #[test]
    fn test_recent_preserves_order() {
        let mut log = CombatLog::default();
        for i in 0..5 {
            log.log(CombatLogEventType::MatchEvent, format!("event {}", i));
        }
        let recent: Vec<&str> = log.recent(2).iter().map(|e| e.message.as_str()).collect();
        assert_eq!(recent, vec!["event 3", "event 4"]);
    }
}
