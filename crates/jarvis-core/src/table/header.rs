use super::Table;
use crate::error::{JarvisError, Result};

/// Header name → zero-based column index for one table.
///
/// Derived from the header row on every operation, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    width: usize,
    entries: Vec<(String, usize)>,
}

impl HeaderMap {
    pub fn of(table: &Table) -> Self {
        Self::from_columns(&table.columns)
    }

    /// Blank headers are skipped; when two headers trim to the same name the
    /// right-most column wins.
    pub fn from_columns(columns: &[String]) -> Self {
        let mut entries: Vec<(String, usize)> = Vec::new();
        for (idx, raw) in columns.iter().enumerate() {
            let name = raw.trim();
            if name.is_empty() {
                continue;
            }
            entries.retain(|(n, _)| n != name);
            entries.push((name.to_string(), idx));
        }
        entries.sort_by_key(|(_, idx)| *idx);
        Self {
            width: columns.len(),
            entries,
        }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, idx)| *idx)
    }

    pub fn require(&self, table: &str, name: &str) -> Result<usize> {
        self.index_of(name).ok_or_else(|| JarvisError::HeaderNotFound {
            table: table.to_string(),
            header: name.to_string(),
        })
    }

    /// Number of header cells, blanks included.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mapped headers in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(n, idx)| (n.as_str(), *idx))
    }
}
