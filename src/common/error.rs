use thiserror::Error;

use super::types::PageId;

/// Storage engine error types.
///
/// `TableFull` is the only recoverable condition; every other variant means
/// the addressing invariants or the data file can no longer be trusted and
/// the caller should stop using the table.
#[derive(Error, Debug)]
pub enum MeowError {
    #[error("Table full: capacity of {capacity} rows reached")]
    TableFull { capacity: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page {page_id} out of bounds (max pages: {max_pages})")]
    PageOutOfBounds { page_id: PageId, max_pages: usize },

    #[error("Tried to flush page {0}, which was never loaded")]
    PageNotLoaded(PageId),

    #[error("Flush of {byte_count} bytes exceeds page size {page_size}")]
    FlushOutOfRange { byte_count: usize, page_size: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Data file holds {rows} rows, more than the table capacity of {capacity}")]
    FileTooLarge { rows: usize, capacity: usize },
}

impl MeowError {
    /// Returns true if the error leaves the table unusable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, MeowError::TableFull { .. })
    }
}

pub type Result<T> = std::result::Result<T, MeowError>;
