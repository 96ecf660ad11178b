mod config;
mod error;
mod types;

pub use config::*;
pub use error::{MeowError, Result};
pub use types::{PageId, RecordId, RowId, SlotId};
