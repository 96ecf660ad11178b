use std::ops::Range;

use crate::common::{COLUMN_EMAIL_SIZE, COLUMN_ID_SIZE, COLUMN_USERNAME_SIZE};

/// Ordered column descriptor of the users table: (name, width in bytes).
pub const USER_COLUMNS: [(&str, usize); 3] = [
    ("id", COLUMN_ID_SIZE),
    ("username", COLUMN_USERNAME_SIZE),
    ("email", COLUMN_EMAIL_SIZE),
];

/// A single fixed-width column of a row layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column name
    name: &'static str,

    /// Width of the column in bytes
    width: usize,

    /// Byte offset of the column from the start of the row
    offset: usize,
}

impl Field {
    /// Returns the column name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the column width in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the byte offset of the column within a row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the byte range the column occupies within a row.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.width
    }
}

/// Byte layout of a fixed-width row.
///
/// Columns are packed back to back in descriptor order with no padding,
/// delimiters or length prefixes, so every row has exactly `row_size` bytes.
///
/// ```text
/// +--------+------------------+----------------------------+
/// | id (4) | username (32)    | email (255)                |
/// +--------+------------------+----------------------------+
/// 0        4                  36                           291
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    /// Columns in storage order
    fields: Vec<Field>,

    /// Sum of all column widths
    row_size: usize,
}

impl RowLayout {
    /// Computes offsets and row size from an ordered list of (name, width).
    ///
    /// The row codec indexes columns by ordinal, so outside the crate only
    /// the users layout can be built.
    pub(crate) fn new(columns: &[(&'static str, usize)]) -> Self {
        let mut fields = Vec::with_capacity(columns.len());
        let mut offset = 0;

        for &(name, width) in columns {
            fields.push(Field {
                name,
                width,
                offset,
            });
            offset += width;
        }

        Self {
            fields,
            row_size: offset,
        }
    }

    /// Layout of the users table: id, username, email.
    pub fn users() -> Self {
        Self::new(&USER_COLUMNS)
    }

    /// Returns the total width of a row in bytes.
    pub fn row_size(&self) -> usize {
        self.row_size
    }

    /// Returns how many whole rows fit in a page of the given size.
    pub fn rows_per_page(&self, page_size: usize) -> usize {
        page_size / self.row_size
    }

    /// Returns the number of columns.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Returns the column at the given ordinal.
    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub(crate) fn column(&self, index: usize) -> &Field {
        &self.fields[index]
    }

    /// Returns the column with the given name.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns an iterator over all columns.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }
}

impl Default for RowLayout {
    fn default() -> Self {
        Self::users()
    }
}
