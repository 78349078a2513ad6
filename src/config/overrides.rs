use std::collections::BTreeMap;

use toml::Value;

use super::env::env_overrides;

/// Externally supplied values keyed by flattened option key.
///
/// Overrides win over an option's default but lose to an explicit value
/// that differs from the default. Boolean options never consult them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides(BTreeMap<String, Value>);

impl Overrides {
    /// Creates a new overrides builder.
    pub fn builder() -> OverridesBuilder {
        OverridesBuilder::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<BTreeMap<String, Value>> for Overrides {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A source in the override pipeline.
#[derive(Debug)]
enum OverrideSource {
    Entry { key: String, value: Value },
    Env { prefix: String, separator: String },
}

/// Builder for collecting overrides from several sources.
///
/// Sources are applied in registration order, so later sources win:
///
/// ```
/// use dragon_opts::Overrides;
///
/// // With STANDARDS__LINT__LIMIT=30 set, the env value would replace 20.
/// let overrides = Overrides::builder()
///     .with_value("lint.limit", 20)
///     .with_env("STANDARDS", "__")
///     .build();
///
/// assert!(overrides.get("lint.limit").is_some());
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct OverridesBuilder {
    sources: Vec<OverrideSource>,
}

impl OverridesBuilder {
    /// Adds a single override for a flattened key.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.sources.push(OverrideSource::Entry {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Reads overrides from environment variables with the given prefix.
    ///
    /// `PREFIX{sep}TOOL{sep}NAME` maps to key `tool.name`. Segments are
    /// lowercased; values are coerced to boolean, integer, float, or string.
    ///
    /// # Panics
    ///
    /// Panics if `separator` is empty.
    pub fn with_env(mut self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        let separator = separator.into();
        assert!(!separator.is_empty(), "separator must not be empty");
        self.sources.push(OverrideSource::Env {
            prefix: prefix.into(),
            separator,
        });
        self
    }

    pub fn build(self) -> Overrides {
        let mut merged = BTreeMap::new();

        for source in self.sources {
            match source {
                OverrideSource::Entry { key, value } => {
                    merged.insert(key, value);
                }
                OverrideSource::Env { prefix, separator } => {
                    merged.extend(env_overrides(&prefix, &separator));
                }
            }
        }

        tracing::debug!(count = merged.len(), "built overrides");
        Overrides(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_source_wins() {
        let overrides = Overrides::builder()
            .with_value("lint.limit", 20)
            .with_value("lint.limit", 30)
            .build();
        assert_eq!(overrides.get("lint.limit"), Some(&Value::Integer(30)));
        assert_eq!(overrides.len(), 1);
    }

    #[test]
    fn test_env_layered_over_values() {
        std::env::set_var("DRAGON_OPTS_LAYER_TEST__LINT__LIMIT", "40");
        let overrides = Overrides::builder()
            .with_value("lint.limit", 20)
            .with_value("lint.paths", "src")
            .with_env("DRAGON_OPTS_LAYER_TEST", "__")
            .build();
        std::env::remove_var("DRAGON_OPTS_LAYER_TEST__LINT__LIMIT");

        assert_eq!(overrides.get("lint.limit"), Some(&Value::Integer(40)));
        assert_eq!(overrides.get("lint.paths"), Some(&Value::String("src".into())));
    }

    #[test]
    fn test_from_iterator() {
        let overrides: Overrides = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(overrides.iter().count(), 2);
        assert!(!overrides.is_empty());
    }

    #[test]
    #[should_panic(expected = "separator must not be empty")]
    fn test_empty_separator_panics() {
        let _ = Overrides::builder().with_env("APP", "");
    }
}
