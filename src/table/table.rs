use std::path::Path;

use tracing::{debug, info, warn};

use crate::common::{Config, MeowError, RecordId, Result, RowId};
use crate::row::{Row, RowLayout};
use crate::storage::Pager;

use super::Scan;

/// An append-only table of fixed-width rows stored in a single data file.
///
/// Rows are packed into pages in insertion order, `rows_per_page` to a page,
/// and never span two pages. Row `i` lives in page `i / rows_per_page` at
/// byte offset `(i % rows_per_page) * row_size`.
///
/// Inserts only touch in-memory pages; `close` is the single point where
/// data reaches the file.
///
/// # Example
///
/// ```rust,no_run
/// use meowdb::{Row, Table};
///
/// let mut table = Table::open("users.db").unwrap();
/// table.insert(&Row::new(1, "ada", "ada@example.com")).unwrap();
///
/// for row in table.scan() {
///     println!("{}", row.unwrap());
/// }
///
/// table.close().unwrap();
/// ```
pub struct Table {
    /// Page cache over the data file
    pager: Pager,
    /// Byte layout of a row
    layout: RowLayout,
    /// Number of rows in the table
    num_rows: usize,
    /// Whole rows that fit in one page
    rows_per_page: usize,
    /// Capacity of the table in rows
    max_rows: usize,
    /// Set by `insert`, cleared once `close` has persisted every page
    dirty: bool,
    /// Set once `close` has persisted every page
    closed: bool,
}

impl Table {
    /// Opens the table stored at `path` with the default page configuration,
    /// creating an empty data file if none exists.
    ///
    /// The file is page-structured: row `i` is stored at byte
    /// `(i / rows_per_page) * page_size + (i % rows_per_page) * row_size`,
    /// not at `i * row_size`, because every full page ends in unused bytes.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, Config::default())
    }

    /// Opens the table stored at `path` with the given page configuration.
    ///
    /// The row count is derived from the file length, page by page. A
    /// trailing partial row is ignored and will be overwritten by the next
    /// insert.
    ///
    /// Fails with `InvalidConfig` when a page cannot hold a row, when a page
    /// holds more rows than a slot id can address, or when the capacity
    /// exceeds the row id range.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: Config) -> Result<Self> {
        let layout = RowLayout::users();
        let rows_per_page = layout.rows_per_page(config.page_size);
        if rows_per_page == 0 || config.max_pages == 0 {
            return Err(MeowError::InvalidConfig(format!(
                "page size {} and max pages {} leave no room for a {}-byte row",
                config.page_size,
                config.max_pages,
                layout.row_size()
            )));
        }
        if rows_per_page > u16::MAX as usize {
            return Err(MeowError::InvalidConfig(format!(
                "page size {} holds {} rows, more than the {} slots a page can address",
                config.page_size,
                rows_per_page,
                u16::MAX
            )));
        }
        let max_rows = match rows_per_page.checked_mul(config.max_pages) {
            Some(rows) if rows <= u32::MAX as usize => rows,
            _ => {
                return Err(MeowError::InvalidConfig(format!(
                    "{} pages of {} rows exceed the {} addressable rows",
                    config.max_pages,
                    rows_per_page,
                    u32::MAX
                )))
            }
        };

        let pager = Pager::open(&path, &config)?;
        let num_rows = rows_in_file(
            pager.file_length(),
            config.page_size,
            layout.row_size(),
            rows_per_page,
        );

        if num_rows > max_rows {
            return Err(MeowError::FileTooLarge {
                rows: num_rows,
                capacity: max_rows,
            });
        }

        info!(
            path = %path.as_ref().display(),
            num_rows,
            rows_per_page,
            max_rows,
            "opened table"
        );

        Ok(Self {
            pager,
            layout,
            num_rows,
            rows_per_page,
            max_rows,
            dirty: false,
            closed: false,
        })
    }

    /// Returns the byte span of the given row, loading its page if needed.
    pub fn locate(&mut self, row_id: RowId) -> Result<&mut [u8]> {
        locate_in(
            &mut self.pager,
            self.rows_per_page,
            self.layout.row_size(),
            row_id,
        )
    }

    /// Appends a row to the end of the table.
    ///
    /// Returns `TableFull` and leaves the table unchanged once capacity is
    /// reached. The row stays in memory until `close`.
    pub fn insert(&mut self, row: &Row) -> Result<RowId> {
        if self.num_rows >= self.max_rows {
            return Err(MeowError::TableFull {
                capacity: self.max_rows,
            });
        }

        let row_id = RowId::new(self.num_rows as u32);
        let slot = locate_in(
            &mut self.pager,
            self.rows_per_page,
            self.layout.row_size(),
            row_id,
        )?;
        row.serialize(&self.layout, slot);

        self.num_rows += 1;
        self.dirty = true;
        debug!(row = row_id.as_u32(), id = row.id, "inserted row");
        Ok(row_id)
    }

    /// Returns an iterator over all rows in insertion order.
    pub fn scan(&mut self) -> Scan<'_> {
        Scan::new(self)
    }

    /// Collects every row of the table.
    pub fn rows(&mut self) -> Result<Vec<Row>> {
        self.scan().collect()
    }

    /// Reads a single row. The row must be below `num_rows`.
    pub(crate) fn read_row(&mut self, row_id: RowId) -> Result<Row> {
        let slot = locate_in(
            &mut self.pager,
            self.rows_per_page,
            self.layout.row_size(),
            row_id,
        )?;
        Ok(Row::deserialize(&self.layout, slot))
    }

    /// Persists every row and releases all page buffers.
    ///
    /// Full pages are written whole; the last page is written only up to its
    /// last row. Loaded pages past the last row are discarded unwritten.
    pub fn close(mut self) -> Result<()> {
        let page_size = self.pager.page_size();
        let full_pages = self.num_rows / self.rows_per_page;
        let tail_bytes = (self.num_rows % self.rows_per_page) * self.layout.row_size();

        for page_id in self.pager.loaded_pages() {
            let byte_count = match page_id.as_usize() {
                i if i < full_pages => page_size,
                i if i == full_pages => tail_bytes,
                _ => 0,
            };

            if byte_count > 0 {
                self.pager.flush_page(page_id, byte_count)?;
            }
            self.pager.release_page(page_id);
        }

        self.pager.sync()?;
        self.dirty = false;
        self.closed = true;

        info!(
            num_rows = self.num_rows,
            writes = self.pager.get_num_writes(),
            "closed table"
        );
        Ok(())
    }

    /// Returns `true` if rows were inserted that have not been persisted yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the number of rows in the table.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the maximum number of rows the table can hold.
    pub fn capacity(&self) -> usize {
        self.max_rows
    }

    /// Returns the number of rows stored per page.
    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Returns the row layout.
    pub fn layout(&self) -> &RowLayout {
        &self.layout
    }

    /// Returns the underlying pager.
    pub fn pager(&self) -> &Pager {
        &self.pager
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        if !self.closed && self.dirty {
            warn!(
                num_rows = self.num_rows,
                "table dropped without close, unsaved rows discarded"
            );
        }
    }
}

fn locate_in(
    pager: &mut Pager,
    rows_per_page: usize,
    row_size: usize,
    row_id: RowId,
) -> Result<&mut [u8]> {
    let RecordId { page_id, slot_id } = RecordId::locate(row_id, rows_per_page);
    let offset = slot_id.as_usize() * row_size;
    let page = pager.get_page(page_id)?;
    Ok(&mut page[offset..offset + row_size])
}

/// Number of whole rows in a data file of the given length.
///
/// Each page holds `rows_per_page` rows followed by unused tail bytes, so
/// rows are counted per page rather than as `file_length / row_size`.
fn rows_in_file(
    file_length: u64,
    page_size: usize,
    row_size: usize,
    rows_per_page: usize,
) -> usize {
    let full_pages = (file_length / page_size as u64) as usize;
    let tail = (file_length % page_size as u64) as usize;
    full_pages * rows_per_page + (tail / row_size).min(rows_per_page)
}
