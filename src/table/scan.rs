use std::iter::FusedIterator;

use crate::common::{Result, RowId};
use crate::row::Row;

use super::Table;

/// Iterator over the rows of a table in insertion order.
///
/// Pages are loaded as the scan reaches them. The scan stops after the first
/// error, and `rewind` starts it over from the first row.
pub struct Scan<'a> {
    table: &'a mut Table,
    next_row: usize,
    end_row: usize,
}

impl<'a> Scan<'a> {
    pub(crate) fn new(table: &'a mut Table) -> Self {
        let end_row = table.num_rows();
        Self {
            table,
            next_row: 0,
            end_row,
        }
    }

    /// Restarts the scan from the first row.
    pub fn rewind(&mut self) {
        self.next_row = 0;
        self.end_row = self.table.num_rows();
    }
}

impl Iterator for Scan<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row >= self.end_row {
            return None;
        }

        let row_id = RowId::new(self.next_row as u32);
        match self.table.read_row(row_id) {
            Ok(row) => {
                self.next_row += 1;
                Some(Ok(row))
            }
            Err(e) => {
                self.next_row = self.end_row;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end_row - self.next_row;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Scan<'_> {}

impl FusedIterator for Scan<'_> {}
