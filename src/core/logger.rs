use crate::core::bypass::{Bypassed, Bypassers, Variables};
use crate::core::docstring::dedent;
use crate::core::interpolate::{repr_value, FormatArgs};
use crate::core::level::LevelFilter;
use crate::core::printer::{prefixed, PrintOptions, Printer, PrinterSettings};
use crate::core::translate::Translator;
use crate::domain::model::{Level, Setting, NORMAL_FILE, NORMAL_TYPE};
use crate::domain::ports::{Clock, Output};
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

/// Per-call options of a [`Logger`]. Unset fields use the logger's settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogOptions {
    pub log_type: Option<String>,
    pub file: Option<String>,
    pub level: Option<Level>,
    pub display: Option<bool>,
    pub write: Option<bool>,
    pub language: Option<String>,
    pub check: Option<bool>,
    /// Arguments interpolated into translated lines.
    pub format: FormatArgs,
    pub print: PrintOptions,
}

impl LogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_type(mut self, log_type: impl Into<String>) -> Self {
        self.log_type = Some(log_type.into());
        self
    }

    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn level(mut self, level: impl Into<Level>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn display(mut self, display: bool) -> Self {
        self.display = Some(display);
        self
    }

    pub fn write(mut self, write: bool) -> Self {
        self.write = Some(write);
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn check(mut self, check: bool) -> Self {
        self.check = Some(check);
        self
    }

    pub fn format(mut self, format: FormatArgs) -> Self {
        self.format = format;
        self
    }

    pub fn print(mut self, print: PrintOptions) -> Self {
        self.print = print;
        self
    }
}

/// `Call: name('a', 1, key=true)`
pub fn format_call(name: &str, args: &FormatArgs) -> String {
    let rendered: Vec<String> = args
        .positional
        .iter()
        .map(repr_value)
        .chain(
            args.named
                .iter()
                .map(|(key, value)| format!("{}={}", key, repr_value(value))),
        )
        .collect();
    format!("Call: {}({})", name, rendered.join(", "))
}

/// `fr` + `logs/app.log` -> `logs/fr_app.log`
fn language_file(short: &str, file: &str) -> String {
    let path = Path::new(file);
    match path.file_name().and_then(|name| name.to_str()) {
        Some(name) => path
            .with_file_name(format!("{}_{}", short, name))
            .to_string_lossy()
            .into_owned(),
        None => format!("{}_{}", short, file),
    }
}

/// A printer that also routes lines to files by log type.
pub struct Logger<O: Output> {
    printer: Printer<O>,
    logfiles: BTreeMap<String, String>,
    bypassers: Bypassers,
    variables: Variables,
    levels: Option<LevelFilter>,
    translator: Option<Translator>,
}

impl<O: Output + fmt::Debug> fmt::Debug for Logger<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("printer", &self.printer)
            .field("logfiles", &self.logfiles)
            .field("bypassers", &self.bypassers)
            .field("levels", &self.levels)
            .field("translator", &self.translator)
            .finish_non_exhaustive()
    }
}

/// Everything a single call resolved to.
struct Call<'a> {
    log_type: String,
    file: String,
    display: bool,
    write: bool,
    bypassed: Bypassed,
    options: &'a LogOptions,
}

impl<O: Output> Logger<O> {
    pub fn new(output: O) -> Self {
        let mut logfiles = BTreeMap::new();
        logfiles.insert(NORMAL_TYPE.to_string(), NORMAL_FILE.to_string());

        let mut bypassers = Bypassers::new();
        bypassers.add(&Setting::ALL);

        Self {
            printer: Printer::new(output),
            logfiles,
            bypassers,
            variables: Variables::new(),
            levels: None,
            translator: None,
        }
    }

    pub fn with_settings(mut self, settings: PrinterSettings) -> Self {
        self.printer = self.printer.with_settings(settings);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.printer = self.printer.with_clock(clock);
        self
    }

    /// Add log files by type. `normal` keeps `logger.log` unless given here.
    pub fn with_logfiles<I, K, V>(mut self, logfiles: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (log_type, file) in logfiles {
            self.logfiles.insert(log_type.into(), file.into());
        }
        self
    }

    /// Replace the bypassers; every setting stays registered.
    pub fn with_bypassers(mut self, mut bypassers: Bypassers) -> Self {
        bypassers.add(&Setting::ALL);
        self.bypassers = bypassers;
        self
    }

    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_levels(mut self, levels: LevelFilter) -> Self {
        self.levels = Some(levels);
        self
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn printer(&self) -> &Printer<O> {
        &self.printer
    }

    pub fn settings(&self) -> &PrinterSettings {
        self.printer.settings()
    }

    pub fn output(&self) -> &O {
        self.printer.output()
    }

    pub fn logfiles(&self) -> &BTreeMap<String, String> {
        &self.logfiles
    }

    pub fn bypassers(&self) -> &Bypassers {
        &self.bypassers
    }

    pub fn bypassers_mut(&mut self) -> &mut Bypassers {
        &mut self.bypassers
    }

    /// Shared handle; setting a variable affects the next call.
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn levels_mut(&mut self) -> Option<&mut LevelFilter> {
        self.levels.as_mut()
    }

    pub fn translator(&self) -> Option<&Translator> {
        self.translator.as_ref()
    }

    pub fn translator_mut(&mut self) -> Option<&mut Translator> {
        self.translator.as_mut()
    }

    /// Resolve the log type and file of a call.
    pub fn resolve(&self, options: &LogOptions) -> (String, String) {
        let log_type = match (&options.log_type, &options.file) {
            (Some(log_type), _) => log_type.clone(),
            (None, Some(file)) => self
                .logfiles
                .iter()
                .find(|(_, f)| *f == file)
                .map(|(t, _)| t.clone())
                .unwrap_or_else(|| NORMAL_TYPE.to_string()),
            (None, None) => NORMAL_TYPE.to_string(),
        };

        let file = options.file.clone().unwrap_or_else(|| {
            self.logfiles
                .get(&log_type)
                .or_else(|| self.logfiles.get(NORMAL_TYPE))
                .cloned()
                .unwrap_or_else(|| NORMAL_FILE.to_string())
        });

        (log_type, file)
    }

    pub fn log(&self, values: &[&dyn Display], options: &LogOptions) -> Result<()> {
        let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        self.log_strings(values, options)
    }

    /// Log values that are already strings; each one may be a message key.
    pub fn log_strings(&self, values: Vec<String>, options: &LogOptions) -> Result<()> {
        let (log_type, file) = self.resolve(options);
        let bypassed = self.bypassers.evaluate(&log_type, &self.variables)?;

        if let Some(levels) = &self.levels {
            let level = bypassed
                .value(Setting::Level)
                .and_then(|v| levels.resolve_value(v))
                .unwrap_or_else(|| levels.resolve(options.level.as_ref()));
            if !levels.allows(level) {
                tracing::trace!("Dropping '{}' call at level {}", log_type, level);
                return Ok(());
            }
        }

        let settings = self.printer.settings();
        let display = bypassed
            .flag(Setting::Display)
            .unwrap_or_else(|| options.display.unwrap_or(settings.display));
        let write = bypassed
            .flag(Setting::Write)
            .unwrap_or_else(|| options.write.unwrap_or(settings.write));

        let mut call = Call {
            log_type,
            file,
            display,
            write,
            bypassed,
            options,
        };
        let mut values = values;

        if let Some(translator) = &self.translator {
            let language = options.language.as_deref().unwrap_or(translator.current());
            let check = call
                .bypassed
                .flag(Setting::Check)
                .unwrap_or_else(|| options.check.unwrap_or(translator.check()));

            if !call.bypassed.contains(Setting::Translate) && check && language != translator.main() {
                let short = translator.short_name(language)?;
                let mut translated = values.clone();
                translator.translate(&mut translated, language, &options.format)?;

                let translated_file = language_file(short, &call.file);
                let main_file = std::mem::replace(&mut call.file, translated_file);
                self.emit(&translated, &call)?;

                // 主要語言的版本只寫入檔案
                call.file = main_file;
                call.display = call.bypassed.flag(Setting::Display).unwrap_or(false);
            }

            if check {
                translator.translate(&mut values, translator.main(), &options.format)?;
            }
        }

        self.emit(&values, &call)
    }

    fn emit(&self, values: &[String], call: &Call<'_>) -> Result<()> {
        let print = &call.options.print;
        let text = values.join(self.printer.separator(print));

        if call.display {
            self.printer.print_text(&text, print, &call.bypassed)?;
        }

        if !call.write {
            return Ok(());
        }

        let timestamp = self.printer.timestamp(print, &call.bypassed)?;
        let body: String = text
            .lines()
            .map(|line| prefixed(&timestamp, line) + "\n")
            .collect();
        self.printer.output().append_file(&call.file, &body)?;

        let logall = call
            .bypassed
            .text(Setting::LogAll)
            .filter(|path| !path.is_empty());
        if let Some(logall) = logall {
            let mirrored = self.bypassers.types(Setting::All).contains(&call.log_type)
                && self.logfiles.contains_key(&call.log_type);
            if mirrored {
                let body: String = text
                    .lines()
                    .map(|line| {
                        prefixed(&timestamp, &format!("type.{} - {}", call.log_type, line)) + "\n"
                    })
                    .collect();
                self.printer.output().append_file(&logall, &body)?;
            }
        }

        Ok(())
    }

    /// Log to several types. `["*"]` means every log type not bound to the
    /// `files` setting. Only the first type displays.
    pub fn multiple(
        &self,
        values: &[&dyn Display],
        types: &[&str],
        display: Option<bool>,
        options: &LogOptions,
    ) -> Result<()> {
        let targets: Vec<String> = match types {
            ["*"] => {
                let skipped = self.bypassers.types(Setting::Files);
                self.logfiles
                    .keys()
                    .filter(|t| !skipped.contains(*t))
                    .cloned()
                    .collect()
            }
            [] => {
                let mut options = options.clone();
                options.display = display.or(options.display);
                return self.log(values, &options);
            }
            types => types.iter().map(|t| t.to_string()).collect(),
        };

        let mut display = display.unwrap_or(self.settings().display);
        for log_type in targets {
            let mut options = options.clone();
            options.log_type = Some(log_type);
            options.display = Some(display);
            self.log(values, &options)?;
            display = false;
        }
        Ok(())
    }

    /// Only print to screen, as type `show` unless another type is given.
    pub fn show(&self, values: &[&dyn Display], options: &LogOptions) -> Result<()> {
        let mut options = options.clone();
        options.log_type.get_or_insert_with(|| "show".to_string());
        options.display.get_or_insert(true);
        options.write.get_or_insert(false);
        self.log(values, &options)
    }

    /// Dedent `text` and show it line by line.
    pub fn docstring(&self, text: &str, tabs: usize, options: &LogOptions) -> Result<()> {
        let mut options = options.clone();
        options.display.get_or_insert(true);
        options.write.get_or_insert(false);
        options.print.sep.get_or_insert_with(|| "\n".to_string());
        self.log_strings(dedent(text, tabs), &options)
    }

    /// Log a function call with its arguments.
    pub fn log_call(&self, name: &str, args: &FormatArgs, options: &LogOptions) -> Result<()> {
        self.log_strings(vec![format_call(name, args)], options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryOutput;
    use crate::core::bypass::Lookup;
    use crate::core::timestamp::FixedClock;
    use serde_json::json;

    fn logger() -> Logger<MemoryOutput> {
        Logger::new(MemoryOutput::new())
            .with_settings(PrinterSettings {
                split: false,
                ts_format: "%H:%M".to_string(),
                ..PrinterSettings::default()
            })
            .with_clock(FixedClock::parse("2024-03-05T21:07:09-05:00").unwrap())
            .with_logfiles([("error", "error.log"), ("debug", "debug.log")])
    }

    #[test]
    fn test_normal_file_is_always_present() {
        let logger = Logger::new(MemoryOutput::new()).with_logfiles([("normal", "main.log")]);
        assert_eq!(logger.logfiles().get("normal").unwrap(), "main.log");
        let logger = Logger::new(MemoryOutput::new());
        assert_eq!(logger.logfiles().get("normal").unwrap(), "logger.log");
    }

    #[test]
    fn test_resolve_type_and_file() {
        let logger = logger();
        assert_eq!(
            logger.resolve(&LogOptions::new()),
            ("normal".to_string(), "logger.log".to_string())
        );
        assert_eq!(
            logger.resolve(&LogOptions::new().file("error.log")),
            ("error".to_string(), "error.log".to_string())
        );
        assert_eq!(
            logger.resolve(&LogOptions::new().file("other.log")),
            ("normal".to_string(), "other.log".to_string())
        );
        assert_eq!(
            logger.resolve(&LogOptions::new().log_type("unknown")),
            ("unknown".to_string(), "logger.log".to_string())
        );
    }

    #[test]
    fn test_log_displays_and_writes() {
        let logger = logger();
        logger
            .log(&[&"disk", &"full"], &LogOptions::new().log_type("error"))
            .unwrap();
        assert_eq!(logger.output().screen(), "disk full\n");
        assert_eq!(logger.output().file("error.log").unwrap(), "21:07 disk full\n");
    }

    #[test]
    fn test_multiline_write_stamps_every_line() {
        let logger = logger();
        logger
            .log(&[&"a\nb"], &LogOptions::new().display(false))
            .unwrap();
        assert_eq!(logger.output().screen(), "");
        assert_eq!(logger.output().file("logger.log").unwrap(), "21:07 a\n21:07 b\n");
    }

    #[test]
    fn test_bypassed_timestamp_and_display() {
        let mut logger = logger();
        logger
            .bypassers_mut()
            .bind(Setting::Timestamp, ["debug"], vec![], Some(Lookup::Value(json!(null))))
            .bind(Setting::Display, ["debug"], vec![], Some(Lookup::Value(json!(false))));

        logger.log(&[&"trace"], &LogOptions::new().log_type("debug")).unwrap();
        assert_eq!(logger.output().screen(), "");
        assert_eq!(logger.output().file("debug.log").unwrap(), "trace\n");
    }

    #[test]
    fn test_logall_mirrors_bound_types() {
        let mut logger = logger();
        logger
            .bypassers_mut()
            .bind(Setting::LogAll, ["error", "debug"], vec![], Some(Lookup::Value(json!("all.log"))))
            .bind(Setting::All, ["error"], vec![], None);

        let opts = LogOptions::new().display(false);
        logger.log(&[&"boom"], &opts.clone().log_type("error")).unwrap();
        logger.log(&[&"noise"], &opts.log_type("debug")).unwrap();

        assert_eq!(
            logger.output().file("all.log").unwrap(),
            "21:07 type.error - boom\n"
        );
    }

    #[test]
    fn test_multiple_displays_once() {
        let logger = logger();
        logger
            .multiple(&[&"x"], &["error", "debug"], Some(true), &LogOptions::new())
            .unwrap();
        assert_eq!(logger.output().screen(), "x\n");
        assert!(logger.output().file("error.log").is_some());
        assert!(logger.output().file("debug.log").is_some());
    }

    #[test]
    fn test_multiple_star_skips_files_types() {
        let mut logger = logger();
        logger.bypassers_mut().bind(Setting::Files, ["debug"], vec![], None);
        logger
            .multiple(&[&"x"], &["*"], Some(false), &LogOptions::new())
            .unwrap();
        assert_eq!(
            logger.output().file_names(),
            vec!["error.log".to_string(), "logger.log".to_string()]
        );
    }

    #[test]
    fn test_show_never_writes() {
        let logger = logger();
        logger.show(&[&"look"], &LogOptions::new()).unwrap();
        assert_eq!(logger.output().screen(), "look\n");
        assert!(logger.output().file_names().is_empty());
    }

    #[test]
    fn test_levels_filter_calls() {
        let logger = logger().with_levels(LevelFilter::new(10).with_names([("info", 10), ("debug", 0)]));
        logger.log(&[&"hidden"], &LogOptions::new().level("debug")).unwrap();
        logger.log(&[&"shown"], &LogOptions::new().level("info")).unwrap();
        logger.log(&[&"missing"], &LogOptions::new()).unwrap();
        assert_eq!(logger.output().screen(), "shown\n");
    }

    #[test]
    fn test_bypassed_level() {
        let mut logger = logger().with_levels(LevelFilter::new(10));
        logger.bypassers_mut().bind(
            Setting::Level,
            Vec::<String>::new(),
            vec![Lookup::Variable("force".to_string())],
            Some(Lookup::Value(json!(99))),
        );
        logger.log(&[&"a"], &LogOptions::new().level(0)).unwrap();
        logger.variables().set("force", true);
        logger.log(&[&"b"], &LogOptions::new().level(0)).unwrap();
        assert_eq!(logger.output().screen(), "b\n");
    }

    #[test]
    fn test_docstring() {
        let logger = logger();
        logger
            .docstring("Title.\n\n    Body line.\n", 4, &LogOptions::new())
            .unwrap();
        assert_eq!(logger.output().screen(), "Title.\n\nBody line.\n");
        assert!(logger.output().file_names().is_empty());
    }

    #[test]
    fn test_log_call() {
        let logger = logger();
        let args = FormatArgs::new().arg("bar").arg(42).arg(7).named("fourth", 24);
        logger.log_call("foo", &args, &LogOptions::new().write(false)).unwrap();
        assert_eq!(logger.output().screen(), "Call: foo('bar', 42, 7, fourth=24)\n");
    }

    #[test]
    fn test_format_call_quotes_strings() {
        let args = FormatArgs::new().arg("it's").named("path", "C:\\tmp");
        assert_eq!(format_call("open", &args), "Call: open(\"it's\", path='C:\\\\tmp')");
    }

    #[test]
    fn test_language_file() {
        assert_eq!(language_file("fr", "app.log"), "fr_app.log");
        assert_eq!(language_file("fr", "logs/app.log"), "logs/fr_app.log");
    }
}
