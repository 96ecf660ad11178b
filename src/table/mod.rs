mod scan;
mod table;

pub use scan::Scan;
pub use table::Table;
