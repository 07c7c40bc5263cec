use super::cell::Cell;
use super::codec;
use super::header::HeaderMap;
use super::id::next_id;
use super::record::Record;
use super::storage::{mutate_with, TableStorage};
use super::Table;
use crate::entity::{EntitySpec, IdPolicy, KeyMatch, Stamp, StampFormat};
use crate::error::{JarvisError, Result};
use chrono::Utc;

/// CRUD over one entity's table.
pub struct TableStore<'a> {
    storage: &'a dyn TableStorage,
    spec: &'a EntitySpec,
}

impl<'a> TableStore<'a> {
    pub fn new(storage: &'a dyn TableStorage, spec: &'a EntitySpec) -> Self {
        Self { storage, spec }
    }

    /// Append a record, allocating its key per the entity's policy.
    ///
    /// Allocation, the duplicate check and the append run in one storage
    /// critical section.
    pub fn add(&self, mut record: Record) -> Result<Record> {
        let spec = self.spec;
        let stored = mutate_with(self.storage, spec.table, |table| {
            let map = HeaderMap::of(table);
            let key_idx = map.require(&table.name, spec.key_field)?;

            match &spec.id_policy {
                IdPolicy::Manual => {}
                IdPolicy::IfMissing { prefix, width } => {
                    if record.get(spec.key_field).map_or(true, Cell::is_empty) {
                        record.insert(spec.key_field, next_id(table, spec.key_field, prefix, *width)?);
                    }
                }
                IdPolicy::Always { prefix, width } => {
                    record.insert(spec.key_field, next_id(table, spec.key_field, prefix, *width)?);
                }
            }

            let key = match record.get(spec.key_field) {
                Some(cell) if !cell.is_empty() => cell.clone(),
                _ => {
                    return Err(JarvisError::MissingKey {
                        table: table.name.clone(),
                        field: spec.key_field.to_string(),
                    })
                }
            };

            if find_row(table, key_idx, &key, spec.key_match).is_some() {
                return Err(JarvisError::DuplicateKey {
                    table: table.name.clone(),
                    field: spec.key_field.to_string(),
                    key: key.to_string(),
                });
            }

            stamp(&mut record, &spec.stamps, |s| s.on.on_add());
            let row = codec::encode(&record, &map);
            let stored = codec::decode(&row, &map);
            table.rows.push(row);
            Ok(stored)
        })?;
        tracing::info!(table = spec.table, key = %stored.text(spec.key_field), "added row");
        Ok(stored)
    }

    pub fn get_by_key(&self, key: &Cell) -> Result<Option<Record>> {
        let table = self.storage.get(self.spec.table)?;
        let map = HeaderMap::of(&table);
        let key_idx = map.require(&table.name, self.spec.key_field)?;
        let found = find_row(&table, key_idx, key, self.spec.key_match)
            .map(|idx| codec::decode(&table.rows[idx], &map));
        if found.is_none() {
            tracing::warn!(table = self.spec.table, %key, "no row with key");
        }
        Ok(found)
    }

    /// Overwrite the fields named in `partial` on the first row matching `key`.
    pub fn update_by_key(&self, key: &Cell, mut partial: Record) -> Result<bool> {
        let spec = self.spec;
        let updated = mutate_with(self.storage, spec.table, |table| {
            let map = HeaderMap::of(table);
            let key_idx = map.require(&table.name, spec.key_field)?;
            let Some(idx) = find_row(table, key_idx, key, spec.key_match) else {
                return Ok(false);
            };
            stamp(&mut partial, &spec.stamps, |s| s.on.on_update());
            codec::apply(&mut table.rows[idx], &partial, &map);
            Ok(true)
        })?;
        if updated {
            tracing::info!(table = spec.table, %key, "updated row");
        } else {
            tracing::warn!(table = spec.table, %key, "no row to update");
        }
        Ok(updated)
    }

    pub fn delete_by_key(&self, key: &Cell) -> Result<bool> {
        let spec = self.spec;
        let deleted = mutate_with(self.storage, spec.table, |table| {
            let map = HeaderMap::of(table);
            let key_idx = map.require(&table.name, spec.key_field)?;
            Ok(match find_row(table, key_idx, key, spec.key_match) {
                Some(idx) => {
                    table.rows.remove(idx);
                    true
                }
                None => false,
            })
        })?;
        if deleted {
            tracing::info!(table = spec.table, %key, "deleted row");
        } else {
            tracing::warn!(table = spec.table, %key, "no row to delete");
        }
        Ok(deleted)
    }

    pub fn list_all(&self) -> Result<Vec<Record>> {
        let table = self.storage.get(self.spec.table)?;
        let map = HeaderMap::of(&table);
        Ok(table.rows.iter().map(|row| codec::decode(row, &map)).collect())
    }

    // -----------------------------------------------------------------------
    // Positional access (sheet row numbers, first data row is 2)
    // -----------------------------------------------------------------------

    pub fn get_row(&self, sheet_row: usize) -> Result<Record> {
        let table = self.storage.get(self.spec.table)?;
        let idx = row_index(&table, sheet_row)?;
        Ok(codec::decode(&table.rows[idx], &HeaderMap::of(&table)))
    }

    pub fn update_row(&self, sheet_row: usize, mut partial: Record) -> Result<Record> {
        let spec = self.spec;
        let stored = mutate_with(self.storage, spec.table, |table| {
            let idx = row_index(table, sheet_row)?;
            let map = HeaderMap::of(table);
            stamp(&mut partial, &spec.stamps, |s| s.on.on_update());
            codec::apply(&mut table.rows[idx], &partial, &map);
            Ok(codec::decode(&table.rows[idx], &map))
        })?;
        tracing::info!(table = spec.table, row = sheet_row, "updated row");
        Ok(stored)
    }

    /// Remove a row by sheet number and return what it held.
    pub fn delete_row(&self, sheet_row: usize) -> Result<Record> {
        let spec = self.spec;
        let removed = mutate_with(self.storage, spec.table, |table| {
            let idx = row_index(table, sheet_row)?;
            let row = table.rows.remove(idx);
            Ok(codec::decode(&row, &HeaderMap::of(table)))
        })?;
        tracing::info!(table = spec.table, row = sheet_row, "deleted row");
        Ok(removed)
    }
}

fn row_index(table: &Table, sheet_row: usize) -> Result<usize> {
    table
        .row_index(sheet_row)
        .ok_or_else(|| JarvisError::RowOutOfRange {
            table: table.name.clone(),
            row: sheet_row,
        })
}

/// First data row whose key cell matches `key`.
fn find_row(table: &Table, key_idx: usize, key: &Cell, how: KeyMatch) -> Option<usize> {
    let wanted = match how {
        KeyMatch::Exact => key.to_string(),
        KeyMatch::Date => key.date_key(),
    };
    table.rows.iter().position(|row| {
        let cell = row.get(key_idx).cloned().unwrap_or_default();
        let have = match how {
            KeyMatch::Exact => cell.to_string(),
            KeyMatch::Date => cell.date_key(),
        };
        !have.is_empty() && have == wanted
    })
}

/// Overwrite the selected stamp fields with the current time.
fn stamp(record: &mut Record, stamps: &[Stamp], select: impl Fn(&Stamp) -> bool) {
    let now = Utc::now();
    for s in stamps.iter().filter(|s| select(s)) {
        let cell = match s.format {
            StampFormat::DateTime => Cell::Date(now),
            StampFormat::Pattern(fmt) => Cell::Text(now.format(fmt).to_string()),
        };
        record.insert(s.field, cell);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
