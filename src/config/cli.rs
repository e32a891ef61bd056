use crate::adapters::Stream;
use crate::config::toml_config::TomlConfig;
use crate::config::CliConfig;
use crate::core::interpolate::FormatArgs;
use crate::core::logger::LogOptions;
use crate::core::printer::PrintOptions;
use crate::domain::model::Level;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

/// Expand `\n`, `\t` and `\\`; any other backslash is kept as is.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

impl CliConfig {
    pub fn print_options(&self) -> PrintOptions {
        PrintOptions {
            sep: self.sep.as_deref().map(unescape),
            end: self.end.as_deref().map(unescape),
            split: self.no_split.then_some(false),
            width: self.width,
            use_utc: self.utc.then_some(true),
            ts_format: self.ts_format.clone(),
            print_ts: self.timestamp.then_some(true),
        }
    }

    /// Files are only written with `--write`.
    pub fn log_options(&self) -> Result<LogOptions> {
        let format = match &self.format_args {
            Some(json) => serde_json::from_str::<FormatArgs>(json)?,
            None => FormatArgs::default(),
        };

        Ok(LogOptions {
            log_type: self.log_type.clone(),
            file: self.file.clone(),
            level: self
                .level
                .as_deref()
                .map(|l| l.parse::<Level>().unwrap_or_else(|e| match e {})),
            display: self.no_display.then_some(false),
            write: Some(self.write),
            language: self.language.clone(),
            check: None,
            format,
            print: self.print_options(),
        })
    }

    /// The `--config` file, or defaults, with command line overrides applied.
    pub fn load_config(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        // --language 需要 [translation] 設定
        if self.language.is_some() {
            validation::validate_required_field("translation", &config.translation)?;
        }

        if self.stderr {
            config.output.get_or_insert_with(Default::default).stream = Stream::Stderr;
        }
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(width) = self.width {
            validation::validate_range("width", width, 1, 10_000)?;
        }
        if let Some(ts_format) = &self.ts_format {
            validation::validate_timestamp_format("ts_format", ts_format)?;
        }
        if let Some(file) = &self.file {
            validation::validate_path("file", file)?;
        }
        if let Some(log_type) = &self.log_type {
            validation::validate_non_empty_string("type", log_type)?;
        }
        validation::validate_positive_number("tabs", self.tabs, 1)?;
        Ok(())
    }
}
