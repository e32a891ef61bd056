use crate::domain::model::{Level, NORMAL_TYPE};
use serde_json::Value;
use std::collections::BTreeMap;

/// Drops calls whose level is below a threshold; levels may be given by name.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelFilter {
    pub threshold: i64,
    pub default_level: i64,
    pub names: BTreeMap<String, i64>,
    pub default_name: String,
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self::new(0)
    }
}

impl LevelFilter {
    pub fn new(threshold: i64) -> Self {
        let mut names = BTreeMap::new();
        names.insert(NORMAL_TYPE.to_string(), 0);
        Self {
            threshold,
            default_level: 0,
            names,
            default_name: NORMAL_TYPE.to_string(),
        }
    }

    pub fn with_default_level(mut self, level: i64) -> Self {
        self.default_level = level;
        self
    }

    /// Register named levels. The default name is kept at 0 unless given here.
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self.names.entry(self.default_name.clone()).or_insert(0);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, level: i64) {
        self.names.insert(name.into(), level);
    }

    pub fn resolve_name(&self, name: &str) -> i64 {
        self.names
            .get(name)
            .or_else(|| self.names.get(&self.default_name))
            .copied()
            .unwrap_or(self.default_level)
    }

    pub fn resolve(&self, level: Option<&Level>) -> i64 {
        match level {
            None => self.default_level,
            Some(Level::Number(n)) => *n,
            Some(Level::Name(name)) => self.resolve_name(name),
        }
    }

    /// A bypassed level: a number or a level name.
    pub fn resolve_value(&self, value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(name) => Some(self.resolve_name(name)),
            _ => None,
        }
    }

    pub fn allows(&self, level: i64) -> bool {
        level >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filter() -> LevelFilter {
        LevelFilter::new(10).with_names([("debug", 0), ("info", 10), ("error", 40)])
    }

    #[test]
    fn test_numeric_levels() {
        let filter = filter();
        assert!(filter.allows(filter.resolve(Some(&Level::Number(10)))));
        assert!(!filter.allows(filter.resolve(Some(&Level::Number(9)))));
    }

    #[test]
    fn test_named_levels() {
        let filter = filter();
        assert_eq!(filter.resolve(Some(&Level::from("error"))), 40);
        assert_eq!(filter.resolve(Some(&Level::from("debug"))), 0);
        // 未知名稱使用預設名稱的等級
        assert_eq!(filter.resolve(Some(&Level::from("verbose"))), 0);
    }

    #[test]
    fn test_missing_level_uses_default() {
        let filter = filter().with_default_level(20);
        assert_eq!(filter.resolve(None), 20);
        assert!(filter.allows(filter.resolve(None)));
    }

    #[test]
    fn test_default_name_is_registered() {
        let filter = LevelFilter::new(0).with_default_name("plain");
        assert_eq!(filter.names.get("plain"), Some(&0));
        assert_eq!(filter.resolve_name("unknown"), 0);
    }

    #[test]
    fn test_resolve_bypassed_value() {
        let filter = filter();
        assert_eq!(filter.resolve_value(&json!(40)), Some(40));
        assert_eq!(filter.resolve_value(&json!("info")), Some(10));
        assert_eq!(filter.resolve_value(&json!(null)), None);
    }
}
