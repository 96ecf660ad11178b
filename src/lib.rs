//! meowdb - A page-oriented single-table storage engine in Rust
//!
//! The engine stores fixed-width user rows in a single data file. Pages are
//! cached in memory on first access, inserts only ever append, and data is
//! written back to the file when the table is closed.
//!
//! # Architecture
//!
//! The system is organized into several layers:
//!
//! - **Row** (`row`): Fixed-width record layout and codec
//!   - `RowLayout`: Column offsets computed from an ordered (name, width) list
//!   - `Row`: The (id, username, email) record and its byte serialization
//!
//! - **Storage Layer** (`storage`): Disk I/O
//!   - `Pager`: Lazily loads pages of the data file and flushes them on request
//!
//! - **Table** (`table`): Row addressing on top of the pager
//!   - `Table`: Append-only insert, capacity checks, open/close lifecycle
//!   - `Scan`: Full-table iterator in insertion order
//!
//! - **Command** (`command`): The shell front end
//!   - `MetaCommand`, `Statement`: Input parsing and validation
//!   - `execute`: Runs a statement against a table
//!
//! # Example
//!
//! ```rust,no_run
//! use meowdb::{Row, Table};
//!
//! let mut table = Table::open("users.db").unwrap();
//! table.insert(&Row::new(1, "ada", "ada@example.com")).unwrap();
//! table.close().unwrap();
//!
//! let mut table = Table::open("users.db").unwrap();
//! let rows = table.rows().unwrap();
//! assert_eq!(rows, vec![Row::new(1, "ada", "ada@example.com")]);
//! ```

pub mod command;
pub mod common;
pub mod row;
pub mod storage;
pub mod table;

// Re-export commonly used types at the crate root
pub use common::{Config, MeowError, PageId, Result, RowId};
pub use row::{Row, RowLayout};
pub use table::Table;
