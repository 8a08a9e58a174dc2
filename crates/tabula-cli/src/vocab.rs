//! Vocabulary tables and their entities

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabula_core::entity::{Entity, Field};
use tabula_core::entity_fields;
use tabula_core::errors::Result;
use tabula_core::schema::{Column, Index, SchemaRegistry, TableDefinition};

pub const WORDS: &str = "words";
pub const WORD_DEFINITIONS: &str = "word_definitions";
pub const QUESTIONS: &str = "questions";

/// Familiarity levels, least familiar first
pub const FAMILIARITY_LEVELS: &[&str] = &["red", "yellow", "green"];

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Word {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub familiarity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Word {
    const FIELDS: &'static [Field<Self>] = entity_fields!(Word {
        id => "id",
        word => "word",
        familiarity => "familiarity",
        created_at => "created_at",
    });
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct WordDefinition {
    pub id: Option<i64>,
    pub word_id: Option<i64>,
    pub part_of_speech: Option<String>,
    pub definition: Option<String>,
}

impl Entity for WordDefinition {
    const FIELDS: &'static [Field<Self>] = entity_fields!(WordDefinition {
        id => "id",
        word_id => "word_id",
        part_of_speech => "part_of_speech",
        definition => "definition",
    });
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: Option<i64>,
    pub word_id: Option<i64>,
    pub prompt: Option<String>,
    pub answer: Option<String>,
    pub times_correct: Option<i64>,
    pub last_asked_at: Option<DateTime<Utc>>,
}

impl Entity for Question {
    const FIELDS: &'static [Field<Self>] = entity_fields!(Question {
        id => "id",
        word_id => "word_id",
        prompt => "prompt",
        answer => "answer",
        times_correct => "times_correct",
        last_asked_at => "last_asked_at",
    });
}

pub fn words_table() -> TableDefinition {
    TableDefinition::new(WORDS)
        .description("Words being learned")
        .column(Column::integer("id").primary_key().auto_increment())
        .column(Column::varchar("word", 128).not_null())
        .column(Column::varchar("familiarity", 16).not_null().default_expr("'red'").indexed())
        .column(Column::timestamp("created_at").not_null().default_expr("CURRENT_TIMESTAMP"))
        .index(Index::new("uq_words_word", ["word"]).unique())
}

pub fn word_definitions_table() -> TableDefinition {
    TableDefinition::new(WORD_DEFINITIONS)
        .description("Meanings recorded for a word")
        .column(Column::integer("id").primary_key().auto_increment())
        .column(Column::integer("word_id").not_null().indexed().references(WORDS, "id"))
        .column(Column::varchar("part_of_speech", 32))
        .column(Column::text("definition").not_null())
}

pub fn questions_table() -> TableDefinition {
    TableDefinition::new(QUESTIONS)
        .description("Quiz questions about a word")
        .column(Column::integer("id").primary_key().auto_increment())
        .column(Column::integer("word_id").not_null().indexed().references(WORDS, "id"))
        .column(Column::text("prompt").not_null())
        .column(Column::text("answer"))
        .column(Column::integer("times_correct").not_null().default_expr("0"))
        .column(Column::timestamp("last_asked_at"))
}

/// Registry holding every vocabulary table
pub fn registry() -> Result<Arc<SchemaRegistry>> {
    let registry = SchemaRegistry::new();
    registry.register(words_table())?;
    registry.register(word_definitions_table())?;
    registry.register(questions_table())?;
    Ok(Arc::new(registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_store::{initialize_all, Peer, Select};

    #[test]
    fn test_entities_bind_to_their_tables() {
        let registry = registry().unwrap();
        Peer::<Word>::new(&registry, WORDS).unwrap();
        Peer::<WordDefinition>::new(&registry, WORD_DEFINITIONS).unwrap();
        Peer::<Question>::new(&registry, QUESTIONS).unwrap();
    }

    #[test]
    fn test_question_defaults() {
        let registry = registry().unwrap();
        let mut conn = tabula_store::db::open_in_memory().unwrap();
        initialize_all(&mut conn, &registry).unwrap();

        let words: Peer<Word> = Peer::new(&registry, WORDS).unwrap();
        let word_id = words
            .insert(
                &conn,
                &Word {
                    word: Some("ephemeral".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let questions: Peer<Question> = Peer::new(&registry, QUESTIONS).unwrap();
        questions
            .insert(
                &conn,
                &Question {
                    word_id: Some(word_id),
                    prompt: Some("Define 'ephemeral'".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let stored = questions.select(&conn, &Select::new()).unwrap();
        assert_eq!(stored[0].times_correct, Some(0));
        assert_eq!(stored[0].answer, None);

        let word = words.select(&conn, &Select::new()).unwrap();
        assert_eq!(word[0].familiarity.as_deref(), Some("red"));
    }
}
