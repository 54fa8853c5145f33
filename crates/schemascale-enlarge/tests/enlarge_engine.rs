use std::collections::HashSet;
use std::path::PathBuf;

use schemascale_core::{Column, ForeignKey, Schema, Table, validate_references, validate_schema};
use schemascale_enlarge::{EnlargeError, EnlargementEngine, ScaleConfig, load_candidate_words};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/spider")
        .join(name)
}

fn concert_singer() -> (Schema, Vec<String>) {
    let schema = Schema::from_json_file(&fixture("concert_singer.json")).expect("load schema");
    let words =
        load_candidate_words(&fixture("concert_singer.candidates.json")).expect("load words");
    (schema, words)
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|word| word.to_string()).collect()
}

fn table(name: &str, extra: &[&str]) -> Table {
    let pk = format!("{name}_pk");
    let mut table = Table::new(name);
    table.columns.push(Column::new(pk.clone(), "int").primary_key(1));
    for column in extra {
        table.columns.push(Column::new(*column, "text"));
    }
    table.primary_keys = vec![pk];
    table
}

fn five_table_schema() -> Schema {
    let mut schema = Schema::new("synthetic", "five");
    schema.tables = vec![
        table("t1", &["c1"]),
        table("t2", &["c2", "c3"]),
        table("t3", &["c4"]),
        table("t4", &["c5", "c6", "c7"]),
        table("t5", &["c8"]),
    ];
    schema
}

#[test]
fn identical_inputs_give_identical_json() {
    let (schema, words) = concert_singer();
    let engine = EnlargementEngine::new(ScaleConfig::for_target(30, true));

    let first = engine.run(&schema, words.clone()).expect("first run");
    let second = engine.run(&schema, words).expect("second run");

    assert_eq!(
        first.schema.to_pretty_json().unwrap(),
        second.schema.to_pretty_json().unwrap()
    );
}

#[test]
fn different_seeds_diverge() {
    let (schema, words) = concert_singer();
    let left = EnlargementEngine::new(ScaleConfig::for_target(30, false))
        .run(&schema, words.clone())
        .unwrap();
    let right = EnlargementEngine::new(ScaleConfig {
        seed: 7,
        ..ScaleConfig::for_target(30, false)
    })
    .run(&schema, words)
    .unwrap();

    assert_ne!(
        left.schema.to_pretty_json().unwrap(),
        right.schema.to_pretty_json().unwrap()
    );
}

#[test]
fn enlarged_schema_is_structurally_valid() {
    let (schema, words) = concert_singer();
    let outcome = EnlargementEngine::new(ScaleConfig::for_target(30, true))
        .run(&schema, words)
        .unwrap();
    let enlarged = &outcome.schema;

    validate_schema(enlarged).expect("primary and foreign key columns exist");
    validate_references(enlarged).expect("referenced tables exist");

    let mut seen = HashSet::new();
    for table in &enlarged.tables {
        assert!(
            seen.insert(table.name.to_ascii_lowercase()),
            "duplicate table {}",
            table.name
        );
    }

    let original_columns: HashSet<String> = schema
        .column_names()
        .into_iter()
        .map(str::to_ascii_lowercase)
        .collect();
    for table in enlarged.tables_not_in(&schema) {
        assert!(
            !original_columns.contains(&table.name.to_ascii_lowercase()),
            "{} collides with an original column",
            table.name
        );
    }
}

#[test]
fn original_tables_stay_first_and_untouched() {
    let (schema, words) = concert_singer();
    let outcome = EnlargementEngine::new(ScaleConfig::for_target(30, false))
        .run(&schema, words)
        .unwrap();

    assert_eq!(outcome.schema.tables[..schema.tables.len()], schema.tables[..]);
    assert_eq!(outcome.schema.dataset, schema.dataset);
    assert_eq!(outcome.schema.db_id, schema.db_id);
}

#[test]
fn concert_singer_reaches_requested_counts() {
    let (schema, words) = concert_singer();
    let outcome = EnlargementEngine::new(ScaleConfig::for_target(30, false))
        .run(&schema, words)
        .unwrap();

    assert_eq!(outcome.requested.entity, 16);
    assert_eq!(outcome.requested.join, 6);
    assert_eq!(outcome.requested.meta, 4);
    assert_eq!(outcome.created.entity, 16);
    assert_eq!(outcome.created.meta, 4);
    assert!(outcome.created.join <= 6);
    assert!(outcome.synthetic_count() <= 26);
    assert_eq!(
        outcome.schema.tables.len(),
        schema.tables.len() + outcome.synthetic_count()
    );
    assert!(outcome.family_tables.is_empty());
    assert!(outcome.bridge_tables.is_empty());
}

#[test]
fn five_tables_to_ten_without_collisions_is_exact() {
    let schema = five_table_schema();
    let outcome = EnlargementEngine::new(ScaleConfig::for_target(10, false))
        .run(&schema, words(&["alpha", "bravo", "charlie", "delta", "echo"]))
        .unwrap();

    assert_eq!(outcome.requested.entity, 3);
    assert_eq!(outcome.requested.join, 1);
    assert_eq!(outcome.requested.meta, 1);
    assert_eq!(outcome.entity_tables, ["alpha", "bravo", "charlie"]);
    assert_eq!(outcome.join_tables.len(), 1);
    assert_eq!(outcome.meta_tables.len(), 1);
    assert!(outcome.meta_tables[0].starts_with("delta_"));
    assert_eq!(outcome.synthetic_count(), 5);
    assert_eq!(outcome.schema.tables.len(), 10);
    assert!(outcome.quota_met());
}

#[test]
fn join_needs_two_entities() {
    let schema = five_table_schema();
    let config = ScaleConfig {
        ratio_entity: 0.2,
        ratio_join: 0.2,
        ..ScaleConfig::for_target(10, false)
    };
    // 5 new tables: 1 entity, 1 join requested, 3 meta.
    let outcome = EnlargementEngine::new(config)
        .run(&schema, words(&["alpha", "bravo", "charlie", "delta"]))
        .unwrap();

    assert_eq!(outcome.requested.join, 1);
    assert_eq!(outcome.entity_tables.len(), 1);
    assert!(outcome.join_tables.is_empty());
    assert!(!outcome.quota_met());
    assert_eq!(outcome.meta_tables.len(), 3);
}

#[test]
fn target_at_or_below_original_is_unchanged() {
    let schema = five_table_schema();
    let outcome = EnlargementEngine::new(ScaleConfig::for_target(4, true))
        .run(&schema, Vec::new())
        .unwrap();

    assert_eq!(outcome.synthetic_count(), 0);
    // bridges still follow original foreign keys; this schema has none
    assert_eq!(outcome.schema, schema);
}

#[test]
fn family_members_reuse_base_columns() {
    let (schema, words) = concert_singer();
    let config = ScaleConfig {
        apply_family_generation: true,
        orig_prob: 1.0,
        ..ScaleConfig::for_target(20, false)
    };
    let outcome = EnlargementEngine::new(config).run(&schema, words).unwrap();

    assert_eq!(outcome.family_tables.len(), outcome.entity_tables.len());
    for name in &outcome.entity_tables {
        let base = schema
            .tables
            .iter()
            .filter(|table| {
                name.strip_prefix(table.name.as_str())
                    .is_some_and(|rest| rest.starts_with('_'))
            })
            .max_by_key(|table| table.name.len())
            .unwrap_or_else(|| panic!("{name} is not named after an original table"));
        let member = outcome.schema.table(name).unwrap();

        let reused: Vec<&Column> = member.columns[1..].iter().collect();
        if base.non_key_columns().next().is_some() {
            assert!(!reused.is_empty(), "{name} reuses nothing from {}", base.name);
        }
        for column in reused {
            let source = base.column(&column.name).expect("column comes from base");
            assert_eq!(column.declared_type, source.declared_type);
            assert!(!source.is_primary_key());
        }
    }
}

#[test]
fn single_foreign_key_gets_one_bridge() {
    let b = table("B", &["label"]);
    let mut a = table("A", &["b_ref"]);
    a.foreign_keys = vec![ForeignKey::new("B", "B_pk", "b_ref")];
    let mut schema = Schema::new("synthetic", "ab");
    schema.tables = vec![b, a];

    let config = ScaleConfig {
        apply_join_competition: true,
        ..ScaleConfig::for_target(6, false)
    };
    let outcome = EnlargementEngine::new(config)
        .run(&schema, words(&["alpha", "bravo", "charlie", "delta"]))
        .unwrap();

    assert_eq!(outcome.bridge_tables, ["A_B_bridge"]);
    let bridge = outcome.schema.table("A_B_bridge").unwrap();
    let referenced: Vec<&str> = bridge
        .foreign_keys
        .iter()
        .map(|fk| fk.source_table.as_str())
        .collect();
    assert_eq!(referenced, ["A", "B"]);
    assert!(outcome.entity_tables.contains(&"A_B_bridge".to_string()));
}

#[test]
fn short_candidate_list_is_fatal() {
    let (schema, _) = concert_singer();
    let err = EnlargementEngine::new(ScaleConfig::for_target(30, false))
        .run(&schema, words(&["venue", "arena", "singer", "Name"]))
        .unwrap_err();

    match err {
        EnlargeError::ExhaustedCandidates { db_id, allocated } => {
            assert_eq!(db_id, "concert_singer");
            assert_eq!(allocated, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_original_is_rejected() {
    let mut schema = five_table_schema();
    schema.tables[0].primary_keys = vec!["missing".to_string()];
    let err = EnlargementEngine::new(ScaleConfig::for_target(10, false))
        .run(&schema, words(&["alpha"]))
        .unwrap_err();
    assert!(matches!(err, EnlargeError::InvalidSchema(_)));
}

#[test]
fn anchor_links_stay_within_budget() {
    let (schema, words) = concert_singer();
    let config = ScaleConfig {
        entity_fk_prob: 1.0,
        max_anchor_links: 3,
        ..ScaleConfig::for_target(30, false)
    };
    let outcome = EnlargementEngine::new(config).run(&schema, words).unwrap();

    assert_eq!(outcome.anchor_links_used, 3);
    let anchored: Vec<&Table> = outcome
        .entity_tables
        .iter()
        .filter_map(|name| outcome.schema.table(name))
        .filter(|table| table.foreign_keys.iter().any(|fk| fk.source_table == "concert"))
        .collect();
    assert_eq!(anchored.len(), 3);
    validate_schema(&outcome.schema).unwrap();
}
