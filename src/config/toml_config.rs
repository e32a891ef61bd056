use crate::adapters::{ConsoleOutput, Stream};
use crate::core::bypass::{Bypassers, Lookup, Variables};
use crate::core::level::LevelFilter;
use crate::core::logger::Logger;
use crate::core::printer::PrinterSettings;
use crate::core::translate::{
    LanguageCatalog, LineCatalog, LookupOrder, Translator, DEFAULT_LANGUAGE, DEFAULT_PATTERN,
};
use crate::domain::model::{Setting, NORMAL_TYPE};
use crate::domain::ports::Output;
use crate::utils::error::{PrintError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub printer: PrinterSettings,
    pub output: Option<OutputConfig>,
    /// log type -> file
    #[serde(default)]
    pub files: BTreeMap<String, String>,
    pub levels: Option<LevelsConfig>,
    pub translation: Option<TranslationConfig>,
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,
    #[serde(default)]
    pub bypassers: Vec<BypasserConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub stream: Stream,
    /// Directory relative log files are written to.
    pub base_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelsConfig {
    #[serde(default)]
    pub threshold: i64,
    #[serde(default)]
    pub default_level: i64,
    pub default_name: Option<String>,
    #[serde(default)]
    pub names: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    pub main: Option<String>,
    pub current: Option<String>,
    pub check: Option<bool>,
    pub pattern: Option<String>,
    #[serde(default)]
    pub order: LookupOrder,
    /// long name -> short code
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    /// `language -> key -> line`, or `key -> language -> line` with `order = "line"`
    #[serde(default)]
    pub catalog: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BypasserConfig {
    pub setting: Setting,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<Lookup>,
    pub value: Option<Lookup>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PrintError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PrintError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LOG_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_timestamp_format("printer.ts_format", &self.printer.ts_format)?;

        if let Some(width) = self.printer.width {
            validation::validate_range("printer.width", width, 1, 10_000)?;
        }

        if let Some(base_path) = self.output.as_ref().and_then(|o| o.base_path.as_deref()) {
            validation::validate_path("output.base_path", base_path)?;
        }

        for (log_type, file) in &self.files {
            validation::validate_non_empty_string("files", log_type)?;
            validation::validate_path(&format!("files.{}", log_type), file)?;
        }

        if let Some(translation) = &self.translation {
            if let Some(pattern) = &translation.pattern {
                validation::validate_pattern("translation.pattern", pattern)?;
            }

            // 目前語言必須是主要語言或已登記的語言
            let main = translation.main.as_deref().unwrap_or(DEFAULT_LANGUAGE);
            if let Some(current) = &translation.current {
                let known = current == main
                    || current == DEFAULT_LANGUAGE
                    || translation.languages.contains_key(current);
                if !known {
                    return Err(PrintError::InvalidConfigValueError {
                        field: "translation.current".to_string(),
                        value: current.clone(),
                        reason: "Language is not listed in translation.languages".to_string(),
                    });
                }
            }

            for (long, short) in &translation.languages {
                validation::validate_non_empty_string(&format!("translation.languages.{}", long), short)?;
            }
        }

        for bypasser in &self.bypassers {
            if let Some(Lookup::Variable(name)) = &bypasser.value {
                validation::validate_non_empty_string(
                    &format!("bypassers.{}.value", bypasser.setting),
                    name,
                )?;
            }
        }

        Ok(())
    }

    /// Console output described by `[output]`.
    pub fn console_output(&self) -> ConsoleOutput {
        let output = self.output.clone().unwrap_or_default();
        let console = ConsoleOutput::new(output.stream);
        match output.base_path {
            Some(base_path) => console.with_base_path(base_path),
            None => console,
        }
    }

    pub fn build_bypassers(&self) -> Bypassers {
        let mut bypassers = Bypassers::new();
        for bypasser in &self.bypassers {
            bypassers.bind(
                bypasser.setting,
                bypasser.types.iter().cloned(),
                bypasser.conditions.clone(),
                bypasser.value.clone(),
            );
        }
        bypassers
    }

    pub fn build_translator(&self) -> Result<Option<Translator>> {
        let Some(translation) = &self.translation else {
            return Ok(None);
        };

        let translator = match translation.order {
            LookupOrder::Language => Translator::new(LanguageCatalog::new(translation.catalog.clone())),
            LookupOrder::Line => Translator::new(LineCatalog::new(translation.catalog.clone())),
        }?;

        let mut translator = translator
            .with_main(translation.main.as_deref().unwrap_or(DEFAULT_LANGUAGE))
            .with_languages(translation.languages.clone())
            .with_check(translation.check.unwrap_or(true))
            .with_pattern(translation.pattern.as_deref().unwrap_or(DEFAULT_PATTERN))?;

        if let Some(current) = &translation.current {
            translator.set_current(current.clone());
        }
        Ok(Some(translator))
    }

    pub fn build_levels(&self) -> Option<LevelFilter> {
        self.levels.as_ref().map(|levels| {
            LevelFilter::new(levels.threshold)
                .with_default_level(levels.default_level)
                .with_default_name(levels.default_name.as_deref().unwrap_or(NORMAL_TYPE))
                .with_names(levels.names.clone())
        })
    }

    /// Build a logger writing to `output`.
    pub fn build_logger<O: Output>(&self, output: O) -> Result<Logger<O>> {
        let mut logger = Logger::new(output)
            .with_settings(self.printer.clone())
            .with_logfiles(self.files.clone())
            .with_bypassers(self.build_bypassers())
            .with_variables(self.variables.clone().into_iter().collect::<Variables>());

        if let Some(levels) = self.build_levels() {
            logger = logger.with_levels(levels);
        }
        if let Some(translator) = self.build_translator()? {
            logger = logger.with_translator(translator);
        }

        tracing::debug!(
            "Built logger with {} log files and {} bypassers",
            logger.logfiles().len(),
            self.bypassers.len()
        );
        Ok(logger)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryOutput;
    use crate::core::logger::LogOptions;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_CONFIG: &str = r#"
[printer]
separator = ", "
split = false
ts_format = ""

[output]
stream = "stderr"
base_path = "./logs"

[files]
error = "error.log"

[levels]
threshold = 10
[levels.names]
info = 10
debug = 0

[translation]
current = "French"
[translation.languages]
French = "fr"
[translation.catalog.English]
GREETING = "Hello"
[translation.catalog.French]
GREETING = "Bonjour"

[variables]
quiet = false

[[bypassers]]
setting = "display"
conditions = [{ variable = "quiet" }]
value = { value = false }
"#;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(FULL_CONFIG).unwrap();

        assert_eq!(config.printer.separator, ", ");
        assert!(!config.printer.split);
        assert!(config.printer.display);
        assert_eq!(config.files.get("error").unwrap(), "error.log");
        assert_eq!(config.levels.as_ref().unwrap().threshold, 10);
        assert_eq!(config.bypassers.len(), 1);
        assert_eq!(config.bypassers[0].setting, Setting::Display);
        assert_eq!(config.console_output().stream(), Stream::Stderr);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.printer, PrinterSettings::default());
        assert!(config.build_translator().unwrap().is_none());
        assert!(config.build_levels().is_none());
    }

    #[test]
    fn test_build_logger_wires_everything() {
        let config = TomlConfig::from_toml_str(FULL_CONFIG).unwrap();
        let logger = config.build_logger(MemoryOutput::new()).unwrap();

        assert_eq!(logger.logfiles().get("normal").unwrap(), "logger.log");

        let opts = LogOptions::new().level("info").write(false);
        logger.log(&[&"GREETING"], &opts).unwrap();
        assert_eq!(logger.output().screen(), "Bonjour\n");

        logger.variables().set("quiet", true);
        logger.log(&[&"GREETING"], &opts).unwrap();
        assert_eq!(logger.output().screen(), "Bonjour\n");

        logger.variables().set("quiet", false);
        logger.log(&[&"GREETING"], &opts.clone().level("debug")).unwrap();
        assert_eq!(logger.output().screen(), "Bonjour\n");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MODPRINT_TEST_LOG_DIR", "/tmp/modprint-logs");

        let toml_content = r#"
[output]
base_path = "${MODPRINT_TEST_LOG_DIR}"
[files]
audit = "${MODPRINT_TEST_UNSET_VAR}.log"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.output.unwrap().base_path.as_deref(),
            Some("/tmp/modprint-logs")
        );
        assert_eq!(config.files.get("audit").unwrap(), "${MODPRINT_TEST_UNSET_VAR}.log");

        std::env::remove_var("MODPRINT_TEST_LOG_DIR");
    }

    #[test]
    fn test_config_validation() {
        let bad_pattern = "[translation]\npattern = \"(\"\n";
        let config = TomlConfig::from_toml_str(bad_pattern).unwrap();
        assert!(config.validate().is_err());

        let bad_language = "[translation]\ncurrent = \"German\"\n";
        let config = TomlConfig::from_toml_str(bad_language).unwrap();
        assert!(matches!(
            config.validate(),
            Err(PrintError::InvalidConfigValueError { .. })
        ));

        let bad_width = "[printer]\nwidth = 0\n";
        let config = TomlConfig::from_toml_str(bad_width).unwrap();
        assert!(config.validate().is_err());

        let bad_format = "[printer]\nts_format = \"%Q\"\n";
        let config = TomlConfig::from_toml_str(bad_format).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_setting_is_rejected() {
        let content = "[[bypassers]]\nsetting = \"colour\"\n";
        assert!(TomlConfig::from_toml_str(content).is_err());
    }

    #[test]
    fn test_line_ordered_catalog() {
        let content = r#"
[translation]
order = "line"
current = "French"
[translation.languages]
French = "fr"
[translation.catalog.BYE]
English = "Goodbye"
French = "Au revoir"
"#;
        let config = TomlConfig::from_toml_str(content).unwrap();
        let translator = config.build_translator().unwrap().unwrap();
        assert_eq!(translator.current(), "French");

        let mut lines = vec!["BYE".to_string()];
        translator
            .translate(&mut lines, "French", &Default::default())
            .unwrap();
        assert_eq!(lines, vec!["Au revoir"]);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[files]\nerror = \"errors.log\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.files.get("error").unwrap(), "errors.log");
    }
}
