use crate::domain::model::{is_truthy, Setting};
use crate::utils::error::{PrintError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

/// Named values shared between the caller and a logger.
///
/// Clones share storage, so flipping a variable after the logger was built
/// changes which bypassers apply on the next call.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    inner: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        let mut map = self.inner.write().unwrap_or_else(|p| p.into_inner());
        map.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let map = self.inner.read().unwrap_or_else(|p| p.into_inner());
        map.get(name).cloned()
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        let mut map = self.inner.write().unwrap_or_else(|p| p.into_inner());
        map.remove(name)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let variables = Variables::new();
        for (k, v) in iter {
            variables.set(k, v);
        }
        variables
    }
}

/// Where a bypasser reads a value from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lookup {
    /// The value itself.
    Value(Value),
    /// A variable looked up at call time.
    Variable(String),
}

impl Lookup {
    fn get(&self, variables: &Variables) -> Option<Value> {
        match self {
            Lookup::Value(v) => Some(v.clone()),
            Lookup::Variable(name) => variables.get(name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binding {
    pub types: BTreeSet<String>,
    pub conditions: Vec<Lookup>,
    pub value: Option<Lookup>,
}

/// Settings overridden for one call, with the values to use instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bypassed(BTreeMap<Setting, Value>);

impl Bypassed {
    pub fn contains(&self, setting: Setting) -> bool {
        self.0.contains_key(&setting)
    }

    pub fn value(&self, setting: Setting) -> Option<&Value> {
        self.0.get(&setting)
    }

    pub fn flag(&self, setting: Setting) -> Option<bool> {
        self.value(setting).map(is_truthy)
    }

    /// Text of a bypassed value; `null` reads as the empty string.
    pub fn text(&self, setting: Setting) -> Option<String> {
        self.value(setting).map(|v| match v {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    pub fn insert(&mut self, setting: Setting, value: Value) {
        self.0.insert(setting, value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Table of bypassers, one binding per setting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bypassers {
    bindings: BTreeMap<Setting, Binding>,
}

impl Bypassers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register settings with an empty binding; existing bindings are kept.
    pub fn add(&mut self, settings: &[Setting]) {
        for setting in settings {
            self.bindings.entry(*setting).or_default();
        }
    }

    /// Merge a binding into `setting`: types and conditions are added,
    /// the value replaces the previous one when given.
    pub fn bind<I, S>(
        &mut self,
        setting: Setting,
        types: I,
        conditions: Vec<Lookup>,
        value: Option<Lookup>,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let binding = self.bindings.entry(setting).or_default();
        binding.types.extend(types.into_iter().map(Into::into));
        for condition in conditions {
            if !binding.conditions.contains(&condition) {
                binding.conditions.push(condition);
            }
        }
        if value.is_some() {
            binding.value = value;
        }
        self
    }

    pub fn binding(&self, setting: Setting) -> Option<&Binding> {
        self.bindings.get(&setting)
    }

    pub fn types(&self, setting: Setting) -> BTreeSet<String> {
        self.bindings
            .get(&setting)
            .map(|b| b.types.clone())
            .unwrap_or_default()
    }

    pub fn remove(&mut self, setting: Setting) -> Option<Binding> {
        self.bindings.remove(&setting)
    }

    pub fn settings(&self) -> impl Iterator<Item = Setting> + '_ {
        self.bindings.keys().copied()
    }

    pub fn contains(&self, setting: Setting) -> bool {
        self.bindings.contains_key(&setting)
    }

    /// Work out which settings are overridden for a call of `log_type`.
    ///
    /// A condition referring to an unknown variable counts as false, but the
    /// value of a triggered bypasser must resolve.
    pub fn evaluate(&self, log_type: &str, variables: &Variables) -> Result<Bypassed> {
        let mut bypassed = Bypassed::default();

        for (setting, binding) in &self.bindings {
            let Some(value) = &binding.value else {
                continue;
            };

            let triggered = binding
                .conditions
                .iter()
                .any(|c| c.get(variables).is_some_and(|v| is_truthy(&v)))
                || binding.types.contains(log_type);

            if !triggered {
                continue;
            }

            let resolved = value.get(variables).ok_or_else(|| match value {
                Lookup::Variable(name) => PrintError::UnknownVariable { name: name.clone() },
                Lookup::Value(_) => PrintError::config("bypasser value missing"),
            })?;

            tracing::trace!("Bypassing '{}' for type '{}' with {}", setting, log_type, resolved);
            bypassed.insert(*setting, resolved);
        }

        Ok(bypassed)
    }
}
