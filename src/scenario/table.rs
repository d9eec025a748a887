//! Parsing of `Ldap entries:` step tables.
//!
//! The first row names the columns; every following row becomes one entry
//! named `cn=<cn>,<root DN>`. Every column, `cn` included, becomes an
//! attribute. A header repeated across columns yields a multi-valued
//! attribute, values kept in column order.

use crate::directory::DirectoryEntry;
use crate::error::TableError;

/// Column that names each entry.
pub const CN_COLUMN: &str = "cn";

/// Builds the distinguished name for an entry created under `root_dn`.
#[must_use]
pub fn entry_dn(cn: &str, root_dn: &str) -> String {
    format!("{CN_COLUMN}={cn},{root_dn}")
}

/// A validated entry table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTable {
    header: Vec<String>,
    cn_index: usize,
    rows: Vec<Vec<String>>,
}

impl EntryTable {
    /// Validates a raw table whose first row is the header.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if the table has no header, the header has no
    /// `cn` column, a row's width differs from the header, or a `cn` cell is
    /// empty.
    pub fn parse(table: &[Vec<String>]) -> Result<Self, TableError> {
        let Some((header, rows)) = table.split_first() else {
            return Err(TableError::Empty);
        };
        let cn_index = header
            .iter()
            .position(|column| column == CN_COLUMN)
            .ok_or_else(|| TableError::MissingCnColumn {
                columns: header.join(", "),
            })?;

        for (index, row) in rows.iter().enumerate() {
            let row_number = index + 1;
            if row.len() != header.len() {
                return Err(TableError::RaggedRow {
                    row: row_number,
                    expected: header.len(),
                    actual: row.len(),
                });
            }
            if row.get(cn_index).is_none_or(String::is_empty) {
                return Err(TableError::EmptyCn { row: row_number });
            }
        }

        Ok(Self {
            header: header.clone(),
            cn_index,
            rows: rows.to_vec(),
        })
    }

    /// Number of data rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has a header but no data rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Builds one entry per data row, in row order.
    pub fn entries<'a>(&'a self, root_dn: &'a str) -> impl Iterator<Item = DirectoryEntry> + 'a {
        self.rows.iter().map(move |row| self.row_entry(row, root_dn))
    }

    fn row_entry(&self, row: &[String], root_dn: &str) -> DirectoryEntry {
        let cn = row.get(self.cn_index).map_or("", String::as_str);
        let mut entry = DirectoryEntry::new(entry_dn(cn, root_dn));
        for (column, value) in self.header.iter().zip(row) {
            entry.push_value(column, value.as_str());
        }
        entry
    }
}
