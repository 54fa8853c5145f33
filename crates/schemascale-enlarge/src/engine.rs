use std::path::Path;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use schemascale_core::{Schema, validate_schema};

use crate::anchor::{choose_family_base, family_table_name};
use crate::config::ScaleConfig;
use crate::errors::EnlargeError;
use crate::generators::{make_entity_table, make_join_bridges, make_join_table, make_meta_table};
use crate::model::{EnlargementOutcome, Quota};
use crate::names::NameAllocator;
use crate::state::GenerationState;

/// Entry point for enlarging one schema.
///
/// The engine holds only configuration; every call to [`EnlargementEngine::run`]
/// builds a fresh random stream and generation state, so one engine can serve
/// a whole batch of databases.
#[derive(Debug, Clone)]
pub struct EnlargementEngine {
    config: ScaleConfig,
}

impl EnlargementEngine {
    pub fn new(config: ScaleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScaleConfig {
        &self.config
    }

    /// Grow `original` towards the configured table count.
    ///
    /// Identical inputs always produce an identical outcome. Collisions in the
    /// join, meta and bridge generators are skipped, so the created counts may
    /// fall short of the requested ones; running out of candidate words is an
    /// error.
    pub fn run(
        &self,
        original: &Schema,
        candidates: impl IntoIterator<Item = String>,
    ) -> Result<EnlargementOutcome, EnlargeError> {
        self.config.validate()?;
        validate_schema(original).map_err(|err| match err {
            schemascale_core::Error::InvalidSchema(message) => EnlargeError::InvalidSchema(message),
            other => EnlargeError::Core(other),
        })?;

        let config = &self.config;
        let requested = Quota::for_run(original.tables.len(), config);
        info!(
            db_id = %original.db_id,
            tables_original = original.tables.len(),
            target = config.target_total_tables,
            entity = requested.entity,
            join = requested.join,
            meta = requested.meta,
            level2 = config.is_level2(),
            "enlargement started"
        );

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut state = GenerationState::new(original);
        let mut names = NameAllocator::new(original.db_id.clone(), candidates);
        let mut created = Quota::default();

        for _ in 0..requested.entity {
            let word = names.next_fresh_name(&mut state.used_names)?;

            let family_base = if config.apply_family_generation
                && rng.random::<f64>() < config.orig_prob
            {
                choose_family_base(original, &mut rng)
            } else {
                None
            };

            match family_base {
                Some(base) => {
                    let family_name = family_table_name(&base.name, &word);
                    if state.used_names.claim(&family_name) {
                        make_entity_table(
                            &mut state,
                            original,
                            config,
                            &mut rng,
                            &family_name,
                            Some(base),
                        )?;
                    } else {
                        debug!(table = %family_name, "family name taken, using plain word");
                        make_entity_table(&mut state, original, config, &mut rng, &word, None)?;
                    }
                }
                None => make_entity_table(&mut state, original, config, &mut rng, &word, None)?,
            }
            created.entity += 1;
        }

        if config.apply_join_competition {
            let bridges = make_join_bridges(&mut state, original);
            debug!(db_id = %original.db_id, bridges, "bridge tables generated");
        }

        created.join = generate_joins(&mut state, &mut rng, requested.join);

        for _ in 0..requested.meta.max(0) {
            let word = names.next_fresh_name(&mut state.used_names)?;
            make_meta_table(&mut state, config, &mut rng, &word);
            created.meta += 1;
        }

        let outcome = EnlargementOutcome {
            schema: state.schema,
            requested,
            created,
            entity_tables: state.entity_tables,
            family_tables: state.family_tables,
            bridge_tables: state.bridge_tables,
            join_tables: state.join_tables,
            meta_tables: state.meta_tables,
            anchor_links_used: state.anchor_links_used,
        };

        if !outcome.quota_met() {
            warn!(
                db_id = %original.db_id,
                join_requested = requested.join,
                join_created = created.join,
                "join quota not met, pairs exhausted or colliding"
            );
        }
        info!(
            db_id = %original.db_id,
            tables_total = outcome.schema.tables.len(),
            synthetic = outcome.synthetic_count(),
            family = outcome.family_tables.len(),
            bridges = outcome.bridge_tables.len(),
            candidates_left = names.remaining(),
            "enlargement finished"
        );

        Ok(outcome)
    }
}

/// Pair every entity table with every other, shuffle once, and create join
/// tables until `wanted` succeed or the pairs run out.
fn generate_joins(state: &mut GenerationState, rng: &mut ChaCha8Rng, wanted: i64) -> i64 {
    let mut entities = state.entity_tables.clone();
    entities.sort();

    let mut pairs = Vec::new();
    for (idx, left) in entities.iter().enumerate() {
        for right in &entities[idx + 1..] {
            pairs.push((left.clone(), right.clone()));
        }
    }
    pairs.shuffle(rng);

    let mut created = 0;
    for (left, right) in &pairs {
        if created >= wanted {
            break;
        }
        if make_join_table(state, left, right) {
            created += 1;
        }
    }
    created
}

/// Read a ranked candidate word list (a JSON array of strings).
pub fn load_candidate_words(path: &Path) -> Result<Vec<String>, EnlargeError> {
    let contents = std::fs::read_to_string(path)?;
    let words: Vec<String> = serde_json::from_str(&contents)?;
    Ok(words)
}
