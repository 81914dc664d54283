//! Loading coach configuration (program settings + optional concept and
//! exercise banks) from TOML.
//!
//! See `CoachConfig` for the expected schema. Everything is optional: with no
//! config file the server runs on defaults plus the built-in seed catalog.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{ConceptCategory, ExerciseCategory, QuickReview};
use crate::unlock::UnlockPolicy;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct CoachConfig {
    #[serde(default)]
    pub program: ProgramConfig,
    #[serde(default)]
    pub concepts: Vec<ConceptCfg>,
    #[serde(default)]
    pub exercises: Vec<ExerciseCfg>,
}

/// Program-wide constants. `total_days` bounds valid day parameters at the
/// API boundary; the engine itself never enforces it.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    pub total_days: u32,
    pub unlock_policy: UnlockPolicy,
    pub recommend_limit: usize,
    pub xp: XpConfig,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            total_days: 90,
            unlock_policy: UnlockPolicy::GroupGated,
            recommend_limit: 6,
            xp: XpConfig::default(),
        }
    }
}

/// XP awarded per difficulty tier.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct XpConfig {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
    pub expert: u32,
}

impl Default for XpConfig {
    fn default() -> Self {
        Self {
            easy: 5,
            medium: 10,
            hard: 15,
            expert: 25,
        }
    }
}

impl XpConfig {
    /// Default points for a 1-5 difficulty rating when an exercise entry
    /// doesn't carry explicit points.
    pub fn points_for_difficulty(&self, difficulty: u8) -> u32 {
        match difficulty {
            0..=1 => self.easy,
            2..=3 => self.medium,
            4 => self.hard,
            _ => self.expert,
        }
    }
}

/// Concept entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct ConceptCfg {
    pub id: String,
    pub name: String,
    pub category: ConceptCategory,
    pub introduced_on_day: u32,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub quick_review: Option<QuickReview>,
}

/// Exercise entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct ExerciseCfg {
    pub id: String,
    pub title: String,
    pub category: ExerciseCategory,
    pub day: u32,
    pub order: usize,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub points: Option<u32>,
    #[serde(default)]
    pub estimated_time: Option<u32>,
}

/// Attempt to load `CoachConfig` from COACH_CONFIG_PATH. On any parsing/IO
/// error, returns None.
pub fn load_coach_config_from_env() -> Option<CoachConfig> {
    let path = std::env::var("COACH_CONFIG_PATH").ok()?;
    match std::fs::read_to_string(&path) {
        Ok(s) => match toml::from_str::<CoachConfig>(&s) {
            Ok(cfg) => {
                info!(target: "coach_backend", %path, "Loaded coach config (TOML)");
                Some(cfg)
            }
            Err(e) => {
                error!(target: "coach_backend", %path, error = %e, "Failed to parse TOML config");
                None
            }
        },
        Err(e) => {
            error!(target: "coach_backend", %path, error = %e, "Failed to read TOML config file");
            None
        }
    }
}

// -------- Phases & progress --------

/// One phase of the program timeline.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Phase {
    pub number: u32,
    pub name: &'static str,
    pub color: &'static str,
}

const PHASES: [(u32, u32, Phase); 5] = [
    (1, 10, Phase { number: 1, name: "Survie", color: "danger" }),
    (11, 30, Phase { number: 2, name: "Autonomie", color: "warning" }),
    (31, 45, Phase { number: 3, name: "Piscine réelle", color: "primary" }),
    (46, 60, Phase { number: 4, name: "Approfondissement", color: "success" }),
    (61, 90, Phase { number: 5, name: "Expertise", color: "purple" }),
];

/// Phase a given day falls in. Days beyond the table map to the last phase.
pub fn current_phase(day: u32) -> Phase {
    for (start, end, phase) in PHASES.iter() {
        if day >= *start && day <= *end {
            return phase.clone();
        }
    }
    PHASES[PHASES.len() - 1].2.clone()
}

/// Rounded completion percentage, capped at 100.
pub fn progress_percent(current_day: u32, total_days: u32) -> u32 {
    if total_days == 0 {
        return 100;
    }
    let pct = (current_day as f64 / total_days as f64 * 100.0).round() as u32;
    pct.min(100)
}
