mod pager;

pub use pager::*;
