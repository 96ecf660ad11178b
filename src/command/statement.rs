use thiserror::Error;

use crate::common::{COLUMN_EMAIL_SIZE, COLUMN_USERNAME_SIZE};
use crate::row::Row;

/// Reasons a line of input could not be turned into a statement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrepareError {
    #[error("Syntax error. Could not parse statement.")]
    SyntaxError,

    #[error("ID must be positive.")]
    NegativeId,

    #[error("String is too long.")]
    StringTooLong,

    #[error("Unrecognized command '{0}'")]
    Unrecognized(String),
}

/// A validated statement, ready to run against a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

impl Statement {
    /// Parses and validates a statement.
    ///
    /// `insert <id> <username> <email>` yields a row whose id is non-negative
    /// and whose strings fit their columns; extra words are ignored.
    /// `select` yields a full-table scan.
    pub fn prepare(input: &str) -> Result<Statement, PrepareError> {
        if input.starts_with("insert") {
            return prepare_insert(input);
        }
        if input.starts_with("select") {
            return Ok(Statement::Select);
        }
        Err(PrepareError::Unrecognized(input.to_string()))
    }
}

fn prepare_insert(input: &str) -> Result<Statement, PrepareError> {
    let mut args = input.split_whitespace();

    if args.next() != Some("insert") {
        return Err(PrepareError::SyntaxError);
    }
    let (Some(id), Some(username), Some(email)) = (args.next(), args.next(), args.next()) else {
        return Err(PrepareError::SyntaxError);
    };

    let id: i64 = id.parse().map_err(|_| PrepareError::SyntaxError)?;
    if id < 0 {
        return Err(PrepareError::NegativeId);
    }
    let id = u32::try_from(id).map_err(|_| PrepareError::SyntaxError)?;

    if username.len() > COLUMN_USERNAME_SIZE || email.len() > COLUMN_EMAIL_SIZE {
        return Err(PrepareError::StringTooLong);
    }

    Ok(Statement::Insert(Row::new(id, username, email)))
}
