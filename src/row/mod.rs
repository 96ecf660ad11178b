mod layout;
mod row;

pub use layout::{Field, RowLayout, USER_COLUMNS};
pub use row::Row;
