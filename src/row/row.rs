use std::fmt;

use bytes::{Buf, BufMut};

use super::RowLayout;

/// Ordinal of the `id` column in the users layout.
const ID: usize = 0;
/// Ordinal of the `username` column in the users layout.
const USERNAME: usize = 1;
/// Ordinal of the `email` column in the users layout.
const EMAIL: usize = 2;

/// A single row of the users table.
///
/// Length bounds on `username` and `email` are checked by whoever builds the
/// row (see `command::Statement::prepare`). The codec copies at most a
/// column's width and never reports an error.
///
/// ## Row Binary Format
///
/// ```text
/// +-------------+------------------------+------------------------+
/// | id (u32 LE) | username, zero padded  | email, zero padded     |
/// +-------------+------------------------+------------------------+
/// ```
///
/// A string that exactly fills its column is stored without a terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: String,
    pub email: String,
}

impl Row {
    /// Creates a new row.
    pub fn new(id: u32, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }

    /// Serializes the row into the first `layout.row_size()` bytes of `destination`.
    ///
    /// # Panics
    /// Panics if `destination` is shorter than a row.
    pub fn serialize(&self, layout: &RowLayout, destination: &mut [u8]) {
        let destination = &mut destination[..layout.row_size()];

        let mut id = &mut destination[layout.column(ID).range()];
        id.put_u32_le(self.id);

        write_padded(
            &mut destination[layout.column(USERNAME).range()],
            self.username.as_bytes(),
        );
        write_padded(
            &mut destination[layout.column(EMAIL).range()],
            self.email.as_bytes(),
        );
    }

    /// Deserializes a row from the first `layout.row_size()` bytes of `source`.
    ///
    /// # Panics
    /// Panics if `source` is shorter than a row.
    pub fn deserialize(layout: &RowLayout, source: &[u8]) -> Self {
        let source = &source[..layout.row_size()];

        let mut id = &source[layout.column(ID).range()];

        Self {
            id: id.get_u32_le(),
            username: read_padded(&source[layout.column(USERNAME).range()]),
            email: read_padded(&source[layout.column(EMAIL).range()]),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username, self.email)
    }
}

/// Copies as much of `src` as fits and zero-fills the rest of the column.
fn write_padded(mut column: &mut [u8], src: &[u8]) {
    let len = src.len().min(column.len());
    column.put_slice(&src[..len]);
    let padding = column.remaining_mut();
    column.put_bytes(0, padding);
}

/// Reads a column up to its first zero byte, or the whole column if it is full.
fn read_padded(column: &[u8]) -> String {
    let end = column.iter().position(|&b| b == 0).unwrap_or(column.len());
    String::from_utf8_lossy(&column[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{COLUMN_EMAIL_SIZE, COLUMN_USERNAME_SIZE};

    fn roundtrip(row: &Row) -> Row {
        let layout = RowLayout::users();
        let mut buf = vec![0xAAu8; layout.row_size()];
        row.serialize(&layout, &mut buf);
        Row::deserialize(&layout, &buf)
    }

    #[test]
    fn test_row_roundtrip() {
        let row = Row::new(1, "ada", "ada@example.com");
        assert_eq!(roundtrip(&row), row);
    }

    #[test]
    fn test_max_length_strings_roundtrip() {
        let row = Row::new(
            u32::MAX,
            "a".repeat(COLUMN_USERNAME_SIZE),
            "b".repeat(COLUMN_EMAIL_SIZE),
        );
        assert_eq!(roundtrip(&row), row);
    }

    #[test]
    fn test_empty_strings_roundtrip() {
        let row = Row::new(0, "", "");
        assert_eq!(roundtrip(&row), row);
    }

    #[test]
    fn test_byte_layout() {
        let layout = RowLayout::users();
        let mut buf = vec![0xFFu8; layout.row_size()];
        Row::new(0x0102_0304, "bob", "b@x").serialize(&layout, &mut buf);

        assert_eq!(&buf[0..4], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&buf[4..7], b"bob");
        assert!(buf[7..36].iter().all(|&b| b == 0));
        assert_eq!(&buf[36..39], b"b@x");
        assert!(buf[39..291].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_serialize_leaves_rest_of_span_untouched() {
        let layout = RowLayout::users();
        let mut buf = vec![0x5Au8; layout.row_size() + 8];
        Row::new(7, "x", "y").serialize(&layout, &mut buf);

        assert!(buf[layout.row_size()..].iter().all(|&b| b == 0x5A));
    }

    #[test]
    fn test_overlong_string_is_truncated_to_column() {
        let row = Row::new(2, "u".repeat(COLUMN_USERNAME_SIZE + 5), "e");
        let decoded = roundtrip(&row);

        assert_eq!(decoded.username, "u".repeat(COLUMN_USERNAME_SIZE));
        assert_eq!(decoded.email, "e");
    }

    #[test]
    fn test_default_layout_matches_users_columns() {
        let layout = RowLayout::default();
        assert_eq!(layout, RowLayout::users());

        let names: Vec<_> = layout.fields().map(|f| f.name()).collect();
        assert_eq!(names, vec!["id", "username", "email"]);
        assert!(layout.field(ID).unwrap().width() >= 4);

        let row = Row::new(9, "x", "y");
        let mut buf = vec![0u8; layout.row_size()];
        row.serialize(&layout, &mut buf);
        assert_eq!(Row::deserialize(&layout, &buf), row);
    }

    #[test]
    fn test_display() {
        let row = Row::new(1, "user1", "person1@example.com");
        assert_eq!(row.to_string(), "(1, user1, person1@example.com)");
    }
}
