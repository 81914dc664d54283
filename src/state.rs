//! Application state: program config, static catalogs, and the completion
//! store.
//!
//! This module owns:
//!   - the concept catalog and exercise index (built once, read-only)
//!   - the program configuration (TOML or defaults)
//!   - the in-memory completion store
//!
//! The engine modules never touch this state directly; handlers pull what
//! they need out of it and pass values in.

use std::collections::HashMap;

use tracing::{info, instrument};

use crate::catalog::{ConceptCatalog, ExerciseIndex};
use crate::config::{load_coach_config_from_env, ProgramConfig};
use crate::store::MemoryStore;

pub struct AppState {
    pub program: ProgramConfig,
    pub catalog: ConceptCatalog,
    pub exercises: ExerciseIndex,
    pub store: MemoryStore,
}

impl AppState {
    /// Build state from env: load config, build catalogs, init the store.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        // Load TOML config if provided (program settings + optional banks).
        let cfg_opt = load_coach_config_from_env();
        let program = cfg_opt
            .as_ref()
            .map(|c| c.program.clone())
            .unwrap_or_default();

        let catalog = ConceptCatalog::build(cfg_opt.as_ref());
        let exercises = ExerciseIndex::build(cfg_opt.as_ref());

        // Inventory summary by category and by day.
        let mut concepts_by_category: HashMap<&'static str, usize> = HashMap::new();
        for c in catalog.all() {
            let key = match c.category {
                crate::domain::ConceptCategory::C => "c",
                crate::domain::ConceptCategory::Terminal => "terminal",
                crate::domain::ConceptCategory::Git => "git",
                crate::domain::ConceptCategory::Debug => "debug",
            };
            *concepts_by_category.entry(key).or_insert(0) += 1;
        }
        for (category, count) in concepts_by_category {
            info!(target: "progression", %category, count, "Startup concept inventory");
        }

        let mut exercises_by_day: HashMap<u32, usize> = HashMap::new();
        for e in exercises.all() {
            *exercises_by_day.entry(e.day).or_insert(0) += 1;
        }
        let mut days: Vec<_> = exercises_by_day.into_iter().collect();
        days.sort_unstable();
        for (day, count) in days {
            info!(target: "progression", day, count, "Startup exercise inventory");
        }

        info!(
            target: "coach_backend",
            total_days = program.total_days,
            unlock_policy = ?program.unlock_policy,
            concepts = catalog.len(),
            exercises = exercises.len(),
            "Coach state ready"
        );

        Self {
            program,
            catalog,
            exercises,
            store: MemoryStore::new(),
        }
    }
}
