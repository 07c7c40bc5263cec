use super::cell::Cell;
use super::header::HeaderMap;
use super::record::Record;

/// Lay a record out as a positional row sized to the header width.
///
/// Fields with no matching header are dropped.
pub fn encode(record: &Record, map: &HeaderMap) -> Vec<Cell> {
    let mut row = vec![Cell::empty(); map.width()];
    apply(&mut row, record, map);
    row
}

/// Read every mapped column of `row` into a record, in header order.
/// Cells past the end of a short row read as empty.
pub fn decode(row: &[Cell], map: &HeaderMap) -> Record {
    map.iter()
        .map(|(name, idx)| (name, row.get(idx).cloned().unwrap_or_default()))
        .collect()
}

/// Overwrite the mapped cells of `row` named in `partial`, leaving the rest.
pub fn apply(row: &mut Vec<Cell>, partial: &Record, map: &HeaderMap) {
    if row.len() < map.width() {
        row.resize(map.width(), Cell::empty());
    }
    for (field, cell) in partial.iter() {
        match map.index_of(field) {
            Some(idx) => row[idx] = cell.clone(),
            None => tracing::debug!(field, "dropping field with no matching header"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> HeaderMap {
        HeaderMap::from_columns(&[
            "Tone ID".to_string(),
            String::new(),
            "Tone Name".to_string(),
            "Active".to_string(),
        ])
    }

    #[test]
    fn encode_places_fields_and_drops_unknown() {
        let record = Record::new()
            .with("Active", true)
            .with("Tone ID", "T-01")
            .with("Mood", "dry");
        let row = encode(&record, &map());
        assert_eq!(
            row,
            vec![
                Cell::from("T-01"),
                Cell::empty(),
                Cell::empty(),
                Cell::Bool(true)
            ]
        );
    }

    #[test]
    fn decode_short_row_fills_empty() {
        let record = decode(&[Cell::from("T-02")], &map());
        let fields: Vec<_> = record.iter().map(|(n, c)| (n, c.to_string())).collect();
        assert_eq!(
            fields,
            vec![
                ("Tone ID", "T-02".to_string()),
                ("Tone Name", String::new()),
                ("Active", String::new()),
            ]
        );
    }

    #[test]
    fn apply_only_touches_named_fields() {
        let mut row = vec![Cell::from("T-03"), Cell::empty(), Cell::from("Wry")];
        apply(&mut row, &Record::new().with("Active", false), &map());
        assert_eq!(row.len(), 4);
        assert_eq!(row[2], Cell::from("Wry"));
        assert_eq!(row[3], Cell::Bool(false));
    }
}
