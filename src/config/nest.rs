//! Conversion of flattened dotted keys into nested tables.

use std::collections::BTreeMap;

use toml::{Table, Value};

use super::ConfigError;

/// Builds a nested table from `"tool.name"` style keys.
pub fn nest(flat: &BTreeMap<String, Value>) -> Result<Table, ConfigError> {
    let mut table = Table::new();
    for (key, value) in flat {
        let path: Vec<&str> = key.split('.').collect();
        insert_at_path(&mut table, &path, value.clone(), key)?;
    }
    Ok(table)
}

fn insert_at_path(
    table: &mut Table,
    path: &[&str],
    value: Value,
    key: &str,
) -> Result<(), ConfigError> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(());
    };

    if rest.is_empty() {
        if table.contains_key(*first) {
            return Err(ConfigError::KeyConflict(key.to_string()));
        }
        table.insert(first.to_string(), value);
        return Ok(());
    }

    let nested = table
        .entry(first.to_string())
        .or_insert(Value::Table(Table::new()));

    match nested {
        Value::Table(nested) => insert_at_path(nested, rest, value, key),
        _ => Err(ConfigError::KeyConflict(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_nests_dotted_keys() {
        let table = nest(&flat(&[
            ("verbose", Value::Boolean(true)),
            ("lint.limit", Value::Integer(5)),
            ("lint.paths", Value::String("src".into())),
        ]))
        .unwrap();

        assert_eq!(table["verbose"].as_bool(), Some(true));
        assert_eq!(table["lint"]["limit"].as_integer(), Some(5));
        assert_eq!(table["lint"]["paths"].as_str(), Some("src"));
    }

    #[test]
    fn test_scalar_parent_conflicts() {
        let result = nest(&flat(&[
            ("lint", Value::Boolean(true)),
            ("lint.limit", Value::Integer(5)),
        ]));
        assert!(matches!(result, Err(ConfigError::KeyConflict(k)) if k == "lint.limit"));
    }
}
