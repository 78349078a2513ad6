use toml::Value;

/// Collects override entries from environment variables with the given prefix.
pub fn env_overrides(prefix: &str, separator: &str) -> Vec<(String, Value)> {
    collect_overrides(std::env::vars(), prefix, separator)
}

/// Maps `{PREFIX}{SEP}A{SEP}B=value` pairs to `("a.b", value)` entries.
pub fn collect_overrides<I>(vars: I, prefix: &str, separator: &str) -> Vec<(String, Value)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let prefix_with_sep = format!("{prefix}{separator}");
    let mut entries = Vec::new();

    for (key, value) in vars {
        let Some(path_str) = key.strip_prefix(&prefix_with_sep) else {
            continue;
        };
        if path_str.is_empty() {
            continue;
        }

        let flattened = path_str
            .split(separator)
            .map(|s| s.to_lowercase())
            .collect::<Vec<_>>()
            .join(".");

        tracing::trace!(var = %key, key = %flattened, "collected override from environment");
        entries.push((flattened, coerce_value(&value)));
    }

    entries
}

fn coerce_value(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }

    if looks_like_integer(s) {
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
    }

    if s.contains('.') {
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
    }

    Value::String(s.to_string())
}

fn looks_like_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
