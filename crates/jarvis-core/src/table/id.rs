use super::header::HeaderMap;
use super::Table;
use crate::error::{JarvisError, Result};
use regex::Regex;

/// Next sequential key for `key_field`: `prefix` followed by `max + 1`
/// zero-padded to `width`. Keys are matched untrimmed against
/// `^prefix\d{width,}$`; shorter keys and keys with stray whitespace are
/// ignored. Keys past the padded range (`PH-1000`) stay in the sequence.
pub fn next_id(table: &Table, key_field: &str, prefix: &str, width: usize) -> Result<String> {
    let idx = HeaderMap::of(table).require(&table.name, key_field)?;
    let keys = table
        .rows
        .iter()
        .map(|row| row.get(idx).map(|c| c.to_string()).unwrap_or_default());
    next_id_in(keys, prefix, width)
}

pub fn next_id_in<I, S>(keys: I, prefix: &str, width: usize) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let pattern = format!("^{}([0-9]{{{width},}})$", regex::escape(prefix));
    let re = Regex::new(&pattern)
        .map_err(|e| JarvisError::InvalidPayload(format!("bad id pattern: {e}")))?;

    let max = keys
        .into_iter()
        .filter_map(|key| {
            re.captures(key.as_ref())
                .and_then(|c| c[1].parse::<u64>().ok())
        })
        .max()
        .unwrap_or(0);

    Ok(format!("{prefix}{:0width$}", max + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::cell::Cell;

    #[test]
    fn skips_gaps_and_junk() {
        let id = next_id_in(["PH-001", "PH-003", "junk"], "PH-", 3).unwrap();
        assert_eq!(id, "PH-004");
    }

    #[test]
    fn empty_table_starts_at_one() {
        let id = next_id_in(Vec::<String>::new(), "PH-", 3).unwrap();
        assert_eq!(id, "PH-001");
    }

    #[test]
    fn short_keys_are_ignored() {
        let id = next_id_in(["LIM-02", "LIM-7"], "LIM-", 3).unwrap();
        assert_eq!(id, "LIM-001");
    }

    #[test]
    fn keys_are_not_trimmed() {
        let id = next_id_in([" PH-005", "PH-002 ", "PH-001"], "PH-", 3).unwrap();
        assert_eq!(id, "PH-002");
    }

    #[test]
    fn prefix_is_literal() {
        let id = next_id_in(["RBXSESSION-009", "RB.SESSION-002"], "RB.SESSION-", 3).unwrap();
        assert_eq!(id, "RB.SESSION-003");
    }

    #[test]
    fn overflow_renders_unpadded() {
        let id = next_id_in(["TASK-999"], "TASK-", 3).unwrap();
        assert_eq!(id, "TASK-1000");
    }

    #[test]
    fn overflowed_keys_stay_in_sequence() {
        let id = next_id_in(["TASK-999", "TASK-1000"], "TASK-", 3).unwrap();
        assert_eq!(id, "TASK-1001");
    }

    #[test]
    fn scans_the_key_column() {
        let table = Table {
            name: "Build_Phases".into(),
            columns: vec!["Date".into(), "Phase".into()],
            rows: vec![
                vec![Cell::from("x"), Cell::from("PH-002")],
                vec![Cell::from("PH-009")],
            ],
        };
        assert_eq!(next_id(&table, "Phase", "PH-", 3).unwrap(), "PH-003");
    }

    #[test]
    fn missing_key_column_fails() {
        let table = Table::new("Build_Phases", ["Date"]);
        let err = next_id(&table, "Phase", "PH-", 3).unwrap_err();
        assert!(matches!(err, JarvisError::HeaderNotFound { .. }));
    }
}
