/// Size of a page in bytes (4 KB)
pub const PAGE_SIZE: usize = 4096;

/// Maximum number of pages a table may hold
pub const TABLE_MAX_PAGES: usize = 100;

/// Width of the `username` column in bytes
pub const COLUMN_USERNAME_SIZE: usize = 32;

/// Width of the `email` column in bytes
pub const COLUMN_EMAIL_SIZE: usize = 255;

/// Width of the `id` column in bytes
pub const COLUMN_ID_SIZE: usize = std::mem::size_of::<u32>();

/// Paging parameters for a table.
///
/// Both values shape the on-disk layout: a file written with one
/// configuration is not readable with another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Size of a page in bytes; the unit of disk I/O
    pub page_size: usize,

    /// Maximum number of pages the pager will hold
    pub max_pages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            max_pages: TABLE_MAX_PAGES,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
