use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::PrintError;

/// Log type used when a call names neither a type nor a file.
pub const NORMAL_TYPE: &str = "normal";

/// File the `normal` type writes to unless configured otherwise.
pub const NORMAL_FILE: &str = "logger.log";

/// Settings that a bypasser can override for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Setting {
    /// Replaces the rendered timestamp verbatim.
    Timestamp,
    /// Turns clever line splitting on or off.
    Splitter,
    Display,
    Write,
    /// Path of a file that receives every line of the types bound to `All`.
    #[serde(rename = "logall")]
    LogAll,
    /// Types skipped by `multiple(["*"])`; only the types matter.
    Files,
    /// Types mirrored into the `LogAll` file; only the types matter.
    All,
    Level,
    Check,
    /// Disables translation when bypassed.
    Translate,
}

impl Setting {
    pub const ALL: [Setting; 10] = [
        Setting::Timestamp,
        Setting::Splitter,
        Setting::Display,
        Setting::Write,
        Setting::LogAll,
        Setting::Files,
        Setting::All,
        Setting::Level,
        Setting::Check,
        Setting::Translate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Setting::Timestamp => "timestamp",
            Setting::Splitter => "splitter",
            Setting::Display => "display",
            Setting::Write => "write",
            Setting::LogAll => "logall",
            Setting::Files => "files",
            Setting::All => "all",
            Setting::Level => "level",
            Setting::Check => "check",
            Setting::Translate => "translate",
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Setting {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Setting::ALL
            .iter()
            .copied()
            .find(|setting| setting.as_str() == s)
            .ok_or_else(|| PrintError::InvalidConfigValueError {
                field: "bypassers.setting".to_string(),
                value: s.to_string(),
                reason: "Unknown setting".to_string(),
            })
    }
}

/// A level given to a call, either numeric or by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Level {
    Number(i64),
    Name(String),
}

impl From<i64> for Level {
    fn from(value: i64) -> Self {
        Level::Number(value)
    }
}

impl From<&str> for Level {
    fn from(value: &str) -> Self {
        Level::Name(value.to_string())
    }
}

impl FromStr for Level {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(n) => Level::Number(n),
            Err(_) => Level::Name(s.to_string()),
        })
    }
}

/// Python-style truthiness of a JSON value.
pub fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
