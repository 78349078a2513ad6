//! Option declarations and the namespaces they are grouped under.

use serde::Deserialize;
use toml::Value;

/// A declared configuration setting.
///
/// The type of the default decides how the option resolves: options with a
/// boolean default always resolve to a boolean, whatever gets assigned.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawOption")]
pub struct ConfigOption {
    name: String,
    default: Value,
}

#[derive(Deserialize)]
struct RawOption {
    name: String,
    default: Value,
}

impl TryFrom<RawOption> for ConfigOption {
    type Error = String;

    fn try_from(raw: RawOption) -> Result<Self, Self::Error> {
        if raw.name.is_empty() {
            return Err("option name must not be empty".to_string());
        }
        Ok(Self {
            name: raw.name,
            default: raw.default,
        })
    }
}

impl ConfigOption {
    /// Creates a new option.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn new(name: impl Into<String>, default: impl Into<Value>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "option name must not be empty");
        Self {
            name,
            default: default.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> &Value {
        &self.default
    }

    pub fn is_bool(&self) -> bool {
        self.default.is_bool()
    }
}

/// Grouping for registered options.
///
/// `Global` options are keyed by their bare name, `Tool` options by
/// `"{tool}.{name}"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    #[default]
    Global,
    Tool(String),
}

impl Namespace {
    /// Returns the flattened key for an option name in this namespace.
    pub fn key(&self, name: &str) -> String {
        match self {
            Namespace::Global => name.to_string(),
            Namespace::Tool(tool) => format!("{tool}.{name}"),
        }
    }
}

impl From<&str> for Namespace {
    fn from(tool: &str) -> Self {
        Namespace::Tool(tool.to_string())
    }
}

impl From<String> for Namespace {
    fn from(tool: String) -> Self {
        Namespace::Tool(tool)
    }
}

impl<S: Into<String>> From<Option<S>> for Namespace {
    fn from(tool: Option<S>) -> Self {
        tool.map_or(Namespace::Global, |t| Namespace::Tool(t.into()))
    }
}
