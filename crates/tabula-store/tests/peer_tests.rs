// Integration tests for the generic repository
// Covers partial inserts, zero-vs-unset, all-rows update/delete, ordering,
// filter validation before any database call, and error context

mod common;

use common::*;
use tabula_core::entity::{Entity, Field};
use tabula_core::entity_fields;
use tabula_core::errors::{ErrorCategory, TabulaError};
use tabula_core::filter::SearchFilter;
use tabula_core::logging_facility::init_test_capture;
use tabula_store::{OrderBy, Peer, Select};

fn seed_words(conn: &rusqlite::Connection, peer: &Peer<Word>) -> Vec<i64> {
    [("apple", 1), ("banana", 2), ("cherry", 2), ("damson", 5)]
        .into_iter()
        .map(|(word, familiarity)| {
            peer.insert(
                conn,
                &Word {
                    word: Some(word.to_string()),
                    familiarity: Some(familiarity),
                    ..Default::default()
                },
            )
            .unwrap()
        })
        .collect()
}

fn words_of(entities: &[Word]) -> Vec<&str> {
    entities.iter().filter_map(|w| w.word.as_deref()).collect()
}

/// Maps only part of the words table
#[derive(Debug, Default, PartialEq)]
struct WordLabel {
    id: Option<i64>,
    word: Option<String>,
}

impl Entity for WordLabel {
    const FIELDS: &'static [Field<Self>] = entity_fields!(WordLabel {
        id => "id",
        word => "word",
    });
}

#[test]
fn test_partial_insert_leaves_only_unset_fields_empty() {
    // Given: A word with only `word` and `note` set
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();
    let entity = Word {
        word: Some("apple".to_string()),
        note: Some("fruit".to_string()),
        ..Default::default()
    };

    // When: We insert and read it back
    let id = peer.insert(&conn, &entity).unwrap();
    let found = peer
        .find_one(&conn, &SearchFilter::and().condition("id", "eq", id.to_string()))
        .unwrap()
        .unwrap();

    // Then: Set fields round-trip and omitted columns took their defaults
    assert_eq!(found.id, Some(id));
    assert_eq!(found.word.as_deref(), Some("apple"));
    assert_eq!(found.note.as_deref(), Some("fruit"));
    assert_eq!(found.familiarity, Some(3));
    assert!(found.created_at.is_some());
}

#[test]
fn test_nullable_column_never_set_stays_unset() {
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();

    peer.insert(&conn, &Word::named("apple")).unwrap();
    let all = peer.select(&conn, &Select::new()).unwrap();

    assert_eq!(all.len(), 1);
    assert_eq!(all[0].note, None);
}

#[test]
fn test_explicit_zero_is_written() {
    // Given: familiarity explicitly 0, while the column default is 3
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();
    let entity = Word {
        familiarity: Some(0),
        ..Word::named("apple")
    };

    // When: We insert it
    peer.insert(&conn, &entity).unwrap();

    // Then: Zero is stored, not the default
    let stored = peer.select(&conn, &Select::new()).unwrap();
    assert_eq!(stored[0].familiarity, Some(0));
}

#[test]
fn test_update_with_empty_filter_affects_all_rows() {
    // Given: Four words
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();
    seed_words(&conn, &peer);

    // When: We update with no conditions
    let patch = Word {
        note: Some("reviewed".to_string()),
        ..Default::default()
    };
    let affected = peer.update(&conn, &patch, &SearchFilter::default()).unwrap();

    // Then: Every row changed and unset fields were left alone
    assert_eq!(affected, 4);
    let all = peer.select(&conn, &Select::new()).unwrap();
    assert!(all.iter().all(|w| w.note.as_deref() == Some("reviewed")));
    assert_eq!(words_of(&all), vec!["apple", "banana", "cherry", "damson"]);
}

#[test]
fn test_update_only_matching_rows() {
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();
    seed_words(&conn, &peer);

    let patch = Word {
        familiarity: Some(4),
        ..Default::default()
    };
    let filter = SearchFilter::and().condition("familiarity", "eq", "2");
    assert_eq!(peer.update(&conn, &patch, &filter).unwrap(), 2);
    assert_eq!(
        peer.count(&conn, Some(&SearchFilter::and().condition("familiarity", "eq", "4")))
            .unwrap(),
        2
    );
}

#[test]
fn test_update_without_fields_is_rejected() {
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();
    seed_words(&conn, &peer);

    let err = peer.update_all(&conn, &Word::default()).unwrap_err();
    assert_eq!(
        err,
        TabulaError::EmptyWrite {
            table: "words".to_string()
        }
    );
}

#[test]
fn test_delete_with_empty_filter_affects_all_rows() {
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();
    seed_words(&conn, &peer);

    assert_eq!(peer.delete(&conn, &SearchFilter::default()).unwrap(), 4);
    assert_eq!(peer.count(&conn, None).unwrap(), 0);
}

#[test]
fn test_delete_with_set_operator() {
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();
    let ids = seed_words(&conn, &peer);

    let filter = SearchFilter::and().condition("id", "in", format!("[{}, {}]", ids[0], ids[2]));
    assert_eq!(peer.delete(&conn, &filter).unwrap(), 2);

    let left = peer.select(&conn, &Select::new()).unwrap();
    assert_eq!(words_of(&left), vec!["banana", "damson"]);
}

#[test]
fn test_or_filter_and_like() {
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();
    seed_words(&conn, &peer);

    let filter = SearchFilter::or()
        .condition("word", "like", "a%")
        .condition("familiarity", "ge_not_real_but_in_list", "5");
    assert!(matches!(
        peer.count(&conn, Some(&filter)),
        Err(TabulaError::UnsupportedOperator { position: 2, .. })
    ));

    let filter = SearchFilter::or()
        .condition("word", "like", "a%")
        .condition("familiarity", "eq", "5");
    let found = peer
        .select(&conn, &Select::new().filter(filter).order_by(OrderBy::asc("word")))
        .unwrap();
    assert_eq!(words_of(&found), vec!["apple", "damson"]);
}

#[test]
fn test_ordering_limit_and_offset() {
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();
    seed_words(&conn, &peer);

    let query = Select::new()
        .order_by(OrderBy::desc("familiarity"))
        .order_by(OrderBy::asc("word"))
        .limit(2)
        .offset(1);
    let page = peer.select(&conn, &query).unwrap();
    assert_eq!(words_of(&page), vec!["banana", "cherry"]);

    let tail = peer
        .select(&conn, &Select::new().order_by(OrderBy::asc("id")).offset(3))
        .unwrap();
    assert_eq!(words_of(&tail), vec!["damson"]);
}

#[test]
fn test_selected_columns_leave_other_fields_unset() {
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();
    seed_words(&conn, &peer);

    let rows = peer
        .select(&conn, &Select::new().columns(["word"]).limit(1))
        .unwrap();
    assert_eq!(rows[0].word.as_deref(), Some("apple"));
    assert_eq!(rows[0].id, None);
    assert_eq!(rows[0].familiarity, None);
}

#[test]
fn test_empty_column_list_selects_all_columns() {
    // Given: seeded words
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();
    seed_words(&conn, &peer);

    // When: selecting with an explicitly empty column list
    let rows = peer
        .select(
            &conn,
            &Select::new()
                .columns(Vec::<String>::new())
                .order_by(OrderBy::asc("id")),
        )
        .unwrap();

    // Then: every declared column is read back
    assert_eq!(words_of(&rows), vec!["apple", "banana", "cherry", "damson"]);
    assert!(rows[0].id.is_some());
    assert_eq!(rows[0].familiarity, Some(1));
    assert!(rows[0].created_at.is_some());
}

#[test]
fn test_maximal_limit_and_offset_are_accepted() {
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();
    seed_words(&conn, &peer);

    let all = peer
        .select(&conn, &Select::new().limit(u64::MAX))
        .unwrap();
    assert_eq!(all.len(), 4);

    let none = peer
        .select(&conn, &Select::new().offset(u64::MAX))
        .unwrap();
    assert!(none.is_empty());

    let both = peer
        .select(&conn, &Select::new().limit(u64::MAX).offset(u64::MAX))
        .unwrap();
    assert!(both.is_empty());
}

#[test]
fn test_unmapped_row_columns_are_skipped() {
    // Given: an entity mapping only id and word
    let (conn, registry) = setup_test_db();
    let words: Peer<Word> = Peer::new(&registry, "words").unwrap();
    let ids = seed_words(&conn, &words);
    let labels: Peer<WordLabel> = Peer::new(&registry, "words").unwrap();

    // When: selecting all declared columns through it
    let rows = labels
        .select(&conn, &Select::new().order_by(OrderBy::asc("id")))
        .unwrap();

    // Then: mapped fields are populated and the rest of the row is ignored
    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows[0],
        WordLabel {
            id: Some(ids[0]),
            word: Some("apple".to_string()),
        }
    );
    assert_eq!(rows[3].word.as_deref(), Some("damson"));
}

#[test]
fn test_unknown_columns_fail_before_database() {
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();

    let filter = SearchFilter::and().condition("spelling", "eq", "x");
    let err = peer.delete(&conn, &filter).unwrap_err();
    assert_eq!(
        err,
        TabulaError::UnknownColumn {
            table: "words".to_string(),
            column: "spelling".to_string(),
        }
    );

    let err = peer
        .select(&conn, &Select::new().order_by(OrderBy::asc("1; DROP TABLE words")))
        .unwrap_err();
    assert!(matches!(err, TabulaError::UnknownColumn { .. }));
    assert_eq!(peer.count(&conn, None).unwrap(), 0);
}

#[test]
fn test_malformed_filter_is_a_client_error() {
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();

    let filter = SearchFilter::new("XOR").condition("word", "eq", "apple");
    let err = peer.count(&conn, Some(&filter)).unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(err.category(), ErrorCategory::Filter);

    let filter = SearchFilter::and().condition("id", "in", "[]");
    assert!(matches!(
        peer.delete(&conn, &filter),
        Err(TabulaError::EmptyArrayValue { position: 1, .. })
    ));
}

#[test]
fn test_constraint_violations_carry_context() {
    let (conn, registry) = setup_test_db();
    let words: Peer<Word> = Peer::new(&registry, "words").unwrap();
    let definitions: Peer<WordDefinition> = Peer::new(&registry, "word_definitions").unwrap();
    words.insert(&conn, &Word::named("apple")).unwrap();

    let err = words.insert(&conn, &Word::named("apple")).unwrap_err();
    assert!(matches!(
        err,
        TabulaError::ConstraintViolation { ref table, ref op, .. } if table == "words" && op == "insert"
    ));

    let orphan = WordDefinition {
        word_id: Some(999),
        definition: Some("nothing".to_string()),
        ..Default::default()
    };
    let err = definitions.insert(&conn, &orphan).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Database);
}

#[test]
fn test_exists_and_find_one() {
    let (conn, registry) = setup_test_db();
    let peer: Peer<Word> = Peer::new(&registry, "words").unwrap();
    seed_words(&conn, &peer);

    assert!(peer
        .exists(&conn, &SearchFilter::and().condition("word", "eq", "cherry"))
        .unwrap());
    assert!(peer
        .find_one(&conn, &SearchFilter::and().condition("word", "eq", "fig"))
        .unwrap()
        .is_none());
}

#[test]
fn test_peer_binding_checks_table_and_mapping() {
    let registry = vocab_registry();

    let err = Peer::<Word>::new(&registry, "questions").unwrap_err();
    assert_eq!(
        err,
        TabulaError::TableNotFound {
            table: "questions".to_string()
        }
    );

    let err = Peer::<Word>::new(&registry, "word_definitions").unwrap_err();
    assert!(matches!(err, TabulaError::UnknownColumn { ref column, .. } if column == "word"));
}

#[test]
fn test_operations_are_logged_with_table() {
    let capture = init_test_capture();
    let (conn, registry) = setup_test_db();
    let peer: Peer<WordDefinition> = Peer::new(&registry, "word_definitions").unwrap();

    let _ = peer.count(&conn, None).unwrap();
    let _ = peer.delete(&conn, &SearchFilter::new("NAND").condition("id", "eq", "1"));

    let count_events = capture.events_for("count", "word_definitions");
    assert!(count_events.iter().any(|e| e.event.as_deref() == Some("end")));

    let delete_events = capture.events_for("delete", "word_definitions");
    let failure = delete_events
        .iter()
        .find(|e| e.event.as_deref() == Some("end_error"))
        .expect("delete failure should be logged");
    assert_eq!(
        failure.fields.get("err.code").map(String::as_str),
        Some("ERR_INVALID_LOGIC_OPERATOR")
    );
}
