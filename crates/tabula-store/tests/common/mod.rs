//! Shared fixtures: a small vocabulary schema and its entities

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tabula_core::entity::{Entity, Field};
use tabula_core::entity_fields;
use tabula_core::schema::{Column, Index, SchemaRegistry, TableDefinition};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Word {
    pub id: Option<i64>,
    pub word: Option<String>,
    pub familiarity: Option<i64>,
    pub note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Word {
    const FIELDS: &'static [Field<Self>] = entity_fields!(Word {
        id => "id",
        word => "word",
        familiarity => "familiarity",
        note => "note",
        created_at => "created_at",
    });
}

impl Word {
    pub fn named(word: &str) -> Self {
        Self {
            word: Some(word.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct WordDefinition {
    pub id: Option<i64>,
    pub word_id: Option<i64>,
    pub definition: Option<String>,
}

impl Entity for WordDefinition {
    const FIELDS: &'static [Field<Self>] = entity_fields!(WordDefinition {
        id => "id",
        word_id => "word_id",
        definition => "definition",
    });
}

pub fn words_table() -> TableDefinition {
    TableDefinition::new("words")
        .description("Vocabulary entries")
        .column(Column::integer("id").primary_key().auto_increment())
        .column(Column::varchar("word", 64).not_null())
        .column(Column::integer("familiarity").not_null().default_expr("3"))
        .column(Column::text("note"))
        .column(Column::timestamp("created_at").default_expr("CURRENT_TIMESTAMP"))
        .index(Index::new("uq_words_word", ["word"]).unique())
}

pub fn word_definitions_table() -> TableDefinition {
    TableDefinition::new("word_definitions")
        .column(Column::integer("id").primary_key().auto_increment())
        .column(
            Column::integer("word_id")
                .not_null()
                .indexed()
                .references("words", "id"),
        )
        .column(Column::text("definition").not_null())
}

/// Registry with the dependent table registered first
pub fn vocab_registry() -> SchemaRegistry {
    let registry = SchemaRegistry::new();
    registry.register(word_definitions_table()).unwrap();
    registry.register(words_table()).unwrap();
    registry
}

/// In-memory database with foreign keys on and the vocabulary tables created
pub fn setup_test_db() -> (Connection, SchemaRegistry) {
    let mut conn = tabula_store::db::open_in_memory().unwrap();
    let registry = vocab_registry();
    tabula_store::initialize_all(&mut conn, &registry).unwrap();
    (conn, registry)
}
