use crate::core::interpolate::{interpolate, FormatArgs};
use crate::domain::ports::Catalog;
use crate::utils::error::{PrintError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_LANGUAGE: &str = "English";
pub const DEFAULT_SHORT: &str = "en";
pub const DEFAULT_PATTERN: &str = "^[A-Z0-9_]+$";

/// Which key a catalog is organised by first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupOrder {
    #[default]
    Language,
    Line,
}

/// language -> key -> line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageCatalog {
    tables: BTreeMap<String, BTreeMap<String, String>>,
}

impl LanguageCatalog {
    pub fn new(tables: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        Self { tables }
    }

    pub fn insert(
        &mut self,
        language: impl Into<String>,
        key: impl Into<String>,
        line: impl Into<String>,
    ) -> &mut Self {
        self.tables
            .entry(language.into())
            .or_default()
            .insert(key.into(), line.into());
        self
    }
}

impl Catalog for LanguageCatalog {
    fn lookup(&self, key: &str, language: &str, main: &str) -> Option<String> {
        // 語言表不存在時退回主要語言；表內缺少的 key 不再退回
        let table = self
            .tables
            .get(language)
            .or_else(|| self.tables.get(main))?;
        table.get(key).cloned()
    }
}

/// key -> language -> line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineCatalog {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl LineCatalog {
    pub fn new(entries: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        Self { entries }
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        language: impl Into<String>,
        line: impl Into<String>,
    ) -> &mut Self {
        self.entries
            .entry(key.into())
            .or_default()
            .insert(language.into(), line.into());
        self
    }
}

impl Catalog for LineCatalog {
    fn lookup(&self, key: &str, language: &str, main: &str) -> Option<String> {
        let entry = self.entries.get(key)?;
        entry.get(language).or_else(|| entry.get(main)).cloned()
    }
}

/// Replaces message keys with catalog lines in the requested language.
#[derive(Clone)]
pub struct Translator {
    main: String,
    current: String,
    languages: BTreeMap<String, String>,
    check: bool,
    pattern: Regex,
    catalog: Arc<dyn Catalog>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("main", &self.main)
            .field("current", &self.current)
            .field("languages", &self.languages)
            .field("check", &self.check)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

impl Translator {
    pub fn new(catalog: impl Catalog + 'static) -> Result<Self> {
        let mut languages = BTreeMap::new();
        languages.insert(DEFAULT_LANGUAGE.to_string(), DEFAULT_SHORT.to_string());

        Ok(Self {
            main: DEFAULT_LANGUAGE.to_string(),
            current: DEFAULT_LANGUAGE.to_string(),
            languages,
            check: true,
            pattern: Regex::new(DEFAULT_PATTERN)?,
            catalog: Arc::new(catalog),
        })
    }

    /// Set the main language; the current language follows it.
    pub fn with_main(mut self, main: impl Into<String>) -> Self {
        self.main = main.into();
        self.current = self.main.clone();
        self
    }

    pub fn with_current(mut self, current: impl Into<String>) -> Self {
        self.current = current.into();
        self
    }

    /// Add languages (long name -> short code). Existing entries are kept,
    /// so `English -> en` survives unless explicitly given.
    pub fn with_languages<I, K, V>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (long, short) in languages {
            self.languages.insert(long.into(), short.into());
        }
        self
    }

    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.pattern = Regex::new(pattern)?;
        Ok(self)
    }

    pub fn main(&self) -> &str {
        &self.main
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn check(&self) -> bool {
        self.check
    }

    pub fn set_current(&mut self, language: impl Into<String>) {
        self.current = language.into();
    }

    pub fn short_name(&self, language: &str) -> Result<&str> {
        self.languages
            .get(language)
            .map(String::as_str)
            .ok_or_else(|| PrintError::UnknownLanguage {
                language: language.to_string(),
            })
    }

    pub fn is_key(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    fn translate_str(&self, line: &str, language: &str) -> Option<String> {
        if !self.is_key(line) {
            return None;
        }
        let found = self.catalog.lookup(line, language, &self.main);
        if found.is_none() {
            tracing::debug!("No {} translation for {}", language, line);
        }
        found.filter(|translated| translated != line)
    }

    fn translate_args(&self, args: &FormatArgs, language: &str) -> FormatArgs {
        let translate = |value: &Value| match value {
            Value::String(s) => self
                .translate_str(s, language)
                .map(Value::String)
                .unwrap_or_else(|| value.clone()),
            other => other.clone(),
        };

        FormatArgs {
            positional: args.positional.iter().map(translate).collect(),
            named: args
                .named
                .iter()
                .map(|(k, v)| (k.clone(), translate(v)))
                .collect(),
        }
    }

    /// Translate every message key in `lines` into `language`, then
    /// interpolate the translated lines with `args`. String arguments that
    /// are message keys are translated too.
    pub fn translate(&self, lines: &mut [String], language: &str, args: &FormatArgs) -> Result<()> {
        let args = self.translate_args(args, language);

        for line in lines.iter_mut() {
            if let Some(translated) = self.translate_str(line, language) {
                *line = interpolate(&translated, &args)?;
            }
        }
        Ok(())
    }
}
