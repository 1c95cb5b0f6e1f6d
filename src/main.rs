//! Frostbound - deterministic skill-combat resolution engine
//!
//! The binary runs headless matches for balance testing; the library holds
//! the combat core.

use tracing_subscriber::EnvFilter;

use frostbound::cli;
use frostbound::headless::{run_headless_match, HeadlessMatchConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = cli::parse_args();

    let mut config = match HeadlessMatchConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid match config: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(path) = args.output {
        config.output_path = Some(path.display().to_string());
    }
    if let Some(duration) = args.max_duration {
        config.max_duration_secs = duration;
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }

    match run_headless_match(&config) {
        Ok(result) => {
            match result.winner {
                Some(team) => println!("Team {} wins after {:.1}s", team, result.match_time),
                None => println!("Draw after {:.1}s", result.match_time),
            }
            for (team, combatants) in [
                (1, &result.team1_combatants),
                (2, &result.team2_combatants),
            ] {
                println!("Team {}:", team);
                for c in combatants {
                    println!(
                        "  {:<16} {:>6.1}/{:<6.1} warmth  dealt {:>7.1}  taken {:>7.1}  healed {:>7.1}{}",
                        c.name,
                        c.final_warmth,
                        c.max_warmth,
                        c.damage_dealt,
                        c.damage_taken,
                        c.healing_done,
                        if c.survived { "" } else { "  (down)" },
                    );
                }
            }
        }
        Err(e) => {
            eprintln!("Match failed: {}", e);
            std::process::exit(1);
        }
    }
}
