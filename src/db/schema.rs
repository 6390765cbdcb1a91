//! Schema definition for the notes database.
//!
//! The DDL lives in `schema.sql` at the repository root and is embedded at
//! build time. Every statement uses `IF NOT EXISTS`, which is what makes
//! re-running initialization against a populated database harmless.

pub const SCHEMA: &str = include_str!("../../schema.sql");

/// Individual DDL statements, split on the `;` delimiter.
pub fn statements() -> impl Iterator<Item = &'static str> {
    SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_one_statement_per_table() {
        let stmts: Vec<_> = statements().collect();
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].contains("users"));
        assert!(stmts[1].contains("notes"));
    }

    #[test]
    fn every_statement_is_idempotent() {
        for stmt in statements() {
            assert!(
                stmt.starts_with("CREATE TABLE IF NOT EXISTS"),
                "non-idempotent statement: {stmt}"
            );
        }
    }

    #[test]
    fn notes_reference_their_owner() {
        let notes = statements().nth(1).expect("notes DDL missing");
        assert!(notes.contains("FOREIGN KEY (user_id) REFERENCES users(id)"));
    }
}
