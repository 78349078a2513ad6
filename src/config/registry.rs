use std::cell::OnceCell;
use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use toml::Value;

use super::nest::nest;
use super::option::{ConfigOption, Namespace};
use super::overrides::Overrides;
use super::ConfigError;

/// Registry of declared options and the values assigned to them.
///
/// Each option resolves from three layers: its declared default, an
/// override supplied at construction, and an explicit value set through
/// [`set`](Self::set) or [`merge`](Self::merge). The resolved map is built
/// lazily on first read and rebuilt after any mutation.
///
/// ## Resolution
///
/// - Options with a boolean default resolve to `true` only when an explicit
///   value is present and is neither `false` nor the string `"false"`.
///   Overrides are never consulted for them.
/// - An explicit value equal to the default counts as not customized, so an
///   override still applies.
/// - Otherwise the explicit value wins, falling back to the default.
///
/// ## Example
///
/// ```
/// use dragon_opts::{ConfigOption, ConfigRegistry, Overrides, Value};
///
/// let overrides: Overrides = [("lint.limit", 20)].into_iter().collect();
/// let mut registry = ConfigRegistry::with_overrides(overrides);
/// registry.register(ConfigOption::new("limit", 10), "lint");
///
/// assert_eq!(registry.get("lint.limit")?, &Value::Integer(20));
///
/// registry.set("lint.limit", 5)?;
/// assert_eq!(registry.get("lint.limit")?, &Value::Integer(5));
/// # Ok::<(), dragon_opts::ConfigError>(())
/// ```
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    options: Vec<(Namespace, Vec<ConfigOption>)>,
    explicit: BTreeMap<String, Value>,
    overrides: Overrides,
    cache: OnceCell<BTreeMap<String, Value>>,
}

impl ConfigRegistry {
    /// Creates an empty registry without overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given overrides.
    ///
    /// Overrides are fixed for the lifetime of the registry.
    pub fn with_overrides(overrides: impl Into<Overrides>) -> Self {
        Self {
            overrides: overrides.into(),
            ..Self::default()
        }
    }

    /// Adds an option under `namespace`.
    ///
    /// Pass [`Namespace::Global`] (or `None::<&str>`) for bare keys. No
    /// uniqueness check is made. Namespaces are walked in the order they were
    /// first registered, so when two options share a flattened key the one
    /// visited last wins. Registration invalidates the resolved map so
    /// late options show up on the next read.
    pub fn register(&mut self, option: ConfigOption, namespace: impl Into<Namespace>) -> &mut Self {
        let namespace = namespace.into();
        tracing::trace!(key = %namespace.key(option.name()), "registering option");
        match self.options.iter_mut().find(|(ns, _)| *ns == namespace) {
            Some((_, options)) => options.push(option),
            None => self.options.push((namespace, vec![option])),
        }
        self.invalidate()
    }

    /// Adds every option under `namespace`, in order.
    pub fn register_many<I>(&mut self, options: I, namespace: impl Into<Namespace>) -> &mut Self
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        let namespace = namespace.into();
        for option in options {
            self.register(option, namespace.clone());
        }
        self
    }

    /// Returns the declared options grouped by namespace, namespaces in the
    /// order they were first registered.
    pub fn options(&self) -> &[(Namespace, Vec<ConfigOption>)] {
        &self.options
    }

    /// Returns the overrides this registry was created with.
    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    /// Assigns an explicit value to an existing option.
    ///
    /// Returns [`ConfigError::UnknownOption`] if `key` does not resolve.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, ConfigError> {
        let key = key.into();
        if !self.contains(&key) {
            return Err(ConfigError::UnknownOption(key));
        }

        tracing::trace!(key = %key, "setting explicit value");
        self.explicit.insert(key, value.into());
        Ok(self.invalidate())
    }

    /// Merges explicit values, replacing existing entries.
    ///
    /// Keys are not checked against declared options; values for unknown
    /// keys are kept but never resolved.
    pub fn merge<I, K, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let before = self.explicit.len();
        self.explicit
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        tracing::trace!(new_keys = self.explicit.len() - before, "merged explicit values");
        self.invalidate()
    }

    /// Returns whether `key` is a resolvable option key.
    pub fn contains(&self, key: &str) -> bool {
        self.dump().contains_key(key)
    }

    /// Returns the resolved value for `key`.
    pub fn get(&self, key: &str) -> Result<&Value, ConfigError> {
        self.dump()
            .get(key)
            .ok_or_else(|| ConfigError::UnknownOption(key.to_string()))
    }

    /// Returns the full resolved map, keys in ascending order.
    pub fn dump(&self) -> &BTreeMap<String, Value> {
        self.cache
            .get_or_init(|| resolve(&self.options, &self.explicit, &self.overrides))
    }

    /// Deserializes the resolved values into `T`.
    ///
    /// Dotted keys become nested tables, so `lint.limit` is read from
    /// field `limit` of field `lint`.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let table = nest(self.dump())?;
        Value::Table(table)
            .try_into()
            .map_err(ConfigError::Deserialize)
    }

    fn invalidate(&mut self) -> &mut Self {
        self.cache.take();
        self
    }
}

/// Builds the resolved map from the three input layers.
fn resolve(
    options: &[(Namespace, Vec<ConfigOption>)],
    explicit: &BTreeMap<String, Value>,
    overrides: &Overrides,
) -> BTreeMap<String, Value> {
    let mut resolved = BTreeMap::new();

    for (namespace, options) in options {
        for option in options {
            let key = namespace.key(option.name());
            let assigned = explicit.get(&key);

            let value = if option.is_bool() {
                Value::Boolean(is_enabled(assigned))
            } else {
                // An explicit value equal to the default is not a customization.
                match assigned {
                    Some(value) if value != option.default() => value.clone(),
                    _ => overrides
                        .get(&key)
                        .unwrap_or(option.default())
                        .clone(),
                }
            };

            resolved.insert(key, value);
        }
    }

    tracing::debug!(options = resolved.len(), "rebuilt resolved config");
    resolved
}

fn is_enabled(assigned: Option<&Value>) -> bool {
    match assigned {
        None | Some(Value::Boolean(false)) => false,
        Some(Value::String(s)) => s != "false",
        Some(_) => true,
    }
}
