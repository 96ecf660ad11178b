use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::common::{Config, MeowError, PageId, Result};

/// Pager maps page indices of a single data file to in-memory page buffers.
///
/// Each slot is either unloaded or owns a page-sized buffer. A slot is
/// populated lazily on first access, from disk if the page lies within the
/// file extent seen at open, zero-filled otherwise. Nothing is written back
/// until the owner asks for a flush.
pub struct Pager {
    /// The data file
    file: File,
    /// Path to the data file
    path: PathBuf,
    /// File length captured at open
    file_length: u64,
    /// Size of every page buffer in bytes
    page_size: usize,
    /// Upper bound on the number of page slots
    max_pages: usize,
    /// Page slots, grown on demand up to `max_pages`
    pages: Vec<Option<Box<[u8]>>>,
    /// Number of page reads performed
    num_reads: u32,
    /// Number of page writes performed
    num_writes: u32,
}

impl Pager {
    /// Opens the data file at `path` for reading and writing, creating it if
    /// it doesn't exist. No page is read until it is requested.
    pub fn open<P: AsRef<Path>>(path: P, config: &Config) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let file_length = file.metadata()?.len();

        debug!(
            path = %path.as_ref().display(),
            file_length,
            "opened data file"
        );

        Ok(Self {
            file,
            path: path.as_ref().to_path_buf(),
            file_length,
            page_size: config.page_size,
            max_pages: config.max_pages,
            pages: Vec::new(),
            num_reads: 0,
            num_writes: 0,
        })
    }

    /// Returns the buffer of the given page, loading it on first access.
    ///
    /// Requesting a page at or beyond `max_pages` is a fatal error.
    pub fn get_page(&mut self, page_id: PageId) -> Result<&mut [u8]> {
        let index = page_id.as_usize();
        if index >= self.max_pages {
            return Err(MeowError::PageOutOfBounds {
                page_id,
                max_pages: self.max_pages,
            });
        }

        if index >= self.pages.len() {
            self.pages.resize_with(index + 1, || None);
        }

        let page = match self.pages[index].take() {
            Some(page) => page,
            None => self.load_page(page_id)?,
        };

        Ok(&mut self.pages[index].insert(page)[..])
    }

    /// Writes the first `byte_count` bytes of a loaded page to its place in
    /// the data file.
    pub fn flush_page(&mut self, page_id: PageId, byte_count: usize) -> Result<()> {
        if byte_count > self.page_size {
            return Err(MeowError::FlushOutOfRange {
                byte_count,
                page_size: self.page_size,
            });
        }

        let page = self
            .pages
            .get(page_id.as_usize())
            .and_then(|slot| slot.as_deref())
            .ok_or(MeowError::PageNotLoaded(page_id))?;

        self.file
            .seek(SeekFrom::Start(page_id.file_offset(self.page_size)))?;
        self.file.write_all(&page[..byte_count])?;

        self.num_writes += 1;
        trace!(page = page_id.as_u32(), byte_count, "flushed page");
        Ok(())
    }

    /// Drops the buffer of a page without writing it.
    /// Returns true if the page was loaded.
    pub fn release_page(&mut self, page_id: PageId) -> bool {
        self.pages
            .get_mut(page_id.as_usize())
            .and_then(Option::take)
            .is_some()
    }

    /// Returns true if the page currently has a buffer.
    pub fn is_loaded(&self, page_id: PageId) -> bool {
        matches!(self.pages.get(page_id.as_usize()), Some(Some(_)))
    }

    /// Returns the IDs of all loaded pages in ascending order.
    pub fn loaded_pages(&self) -> Vec<PageId> {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| PageId::new(i as u32))
            .collect()
    }

    /// Number of pages, whole or partial, that existed on disk at open.
    pub fn pages_on_disk(&self) -> usize {
        self.file_length.div_ceil(self.page_size as u64) as usize
    }

    /// Forces written pages down to the storage device.
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Returns the file length captured at open.
    pub fn file_length(&self) -> u64 {
        self.file_length
    }

    /// Returns the page size in bytes.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the maximum number of pages.
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Returns the number of page reads performed.
    pub fn get_num_reads(&self) -> u32 {
        self.num_reads
    }

    /// Returns the number of page writes performed.
    pub fn get_num_writes(&self) -> u32 {
        self.num_writes
    }

    /// Returns the path to the data file.
    pub fn get_db_path(&self) -> &Path {
        &self.path
    }

    fn load_page(&mut self, page_id: PageId) -> Result<Box<[u8]>> {
        let mut page = vec![0u8; self.page_size].into_boxed_slice();

        if page_id.as_usize() < self.pages_on_disk() {
            self.file
                .seek(SeekFrom::Start(page_id.file_offset(self.page_size)))?;

            // The last page on disk may be partial; the rest stays zeroed
            let bytes_read = read_up_to(&mut self.file, &mut page)?;

            self.num_reads += 1;
            trace!(page = page_id.as_u32(), bytes_read, "loaded page from disk");
        } else {
            trace!(page = page_id.as_u32(), "allocated fresh page");
        }

        Ok(page)
    }
}

/// Reads until `buf` is full or the reader hits end of file.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
