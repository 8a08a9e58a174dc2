//! Identifier validation
//!
//! Table, column and index names are restricted to `[A-Za-z_][A-Za-z0-9_]*`
//! before they are quoted into SQL text.

use tabula_core::errors::{Result, TabulaError};

pub fn is_valid_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Fail with `InvalidIdentifier` unless `ident` is a plain identifier
pub fn check(kind: &str, ident: &str) -> Result<()> {
    if is_valid_identifier(ident) {
        Ok(())
    } else {
        Err(TabulaError::InvalidIdentifier {
            kind: kind.to_string(),
            ident: ident.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        for ident in ["words", "word_id", "_hidden", "t2"] {
            assert!(is_valid_identifier(ident), "{}", ident);
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        for ident in ["", "2words", "words;drop", "a b", "w.id", "\"id\"", "wörd"] {
            assert!(!is_valid_identifier(ident), "{}", ident);
        }
    }

    #[test]
    fn test_check_reports_kind() {
        let err = check("column", "id; DROP TABLE words").unwrap_err();
        assert_eq!(
            err,
            TabulaError::InvalidIdentifier {
                kind: "column".to_string(),
                ident: "id; DROP TABLE words".to_string(),
            }
        );
    }
}
