use crate::common::{MeowError, Result, RowId};
use crate::row::Row;
use crate::table::Table;

use super::Statement;

/// Outcome of a statement that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteResult {
    Inserted(RowId),
    Rows(Vec<Row>),
    TableFull,
}

/// Runs a statement against the table.
///
/// A full table is reported as `ExecuteResult::TableFull`; only fatal errors
/// come back as `Err`.
pub fn execute(statement: &Statement, table: &mut Table) -> Result<ExecuteResult> {
    match statement {
        Statement::Insert(row) => match table.insert(row) {
            Ok(row_id) => Ok(ExecuteResult::Inserted(row_id)),
            Err(MeowError::TableFull { .. }) => Ok(ExecuteResult::TableFull),
            Err(e) => Err(e),
        },
        Statement::Select => Ok(ExecuteResult::Rows(table.rows()?)),
    }
}
