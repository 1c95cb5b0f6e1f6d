//! Headless match simulation
//!
//! Runs full matches without any frontend: a JSON config describes the
//! teams, the runner drives the encounter with scripted intents on a fixed
//! tick, and the result comes back as plain data for balance analysis.

pub mod config;
pub mod runner;

pub use config::HeadlessMatchConfig;
pub use runner::{run_headless_match, CombatantResult, MatchResult};
