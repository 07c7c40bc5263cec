pub mod cell;
pub mod codec;
pub mod header;
pub mod id;
pub mod record;
pub mod storage;
pub mod store;

pub use cell::Cell;
pub use header::HeaderMap;
pub use record::Record;
pub use storage::{MemoryStorage, TableStorage, WorkbookStorage};
pub use store::TableStore;

use serde::{Deserialize, Serialize};

/// Sheet row number of the first data row (the header is row 1).
pub const FIRST_DATA_ROW: usize = 2;

/// A named grid: one header row plus data rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, S>(name: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Index into `rows` for a sheet row number, if it addresses a data row.
    pub fn row_index(&self, sheet_row: usize) -> Option<usize> {
        sheet_row
            .checked_sub(FIRST_DATA_ROW)
            .filter(|idx| *idx < self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_rows_start_at_two() {
        let mut t = Table::new("ToneLibrary", ["Tone ID"]);
        t.rows.push(vec![Cell::from("T-01")]);
        assert_eq!(t.row_index(2), Some(0));
        assert_eq!(t.row_index(1), None);
        assert_eq!(t.row_index(0), None);
        assert_eq!(t.row_index(3), None);
    }

    #[test]
    fn yaml_without_rows_is_empty_table() {
        let t: Table = serde_yaml::from_str("name: Apps\ncolumns: [App Name]\n").unwrap();
        assert!(t.rows.is_empty());
    }
}
