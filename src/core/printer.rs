use crate::core::bypass::Bypassed;
use crate::core::splitter::split_lines;
use crate::core::timestamp::{SystemClock, Timestamper, DEFAULT_TS_FORMAT};
use crate::domain::model::Setting;
use crate::domain::ports::{Clock, Output};
use crate::utils::error::Result;
use crate::utils::terminal;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::sync::Arc;

/// Defaults used when a call does not override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterSettings {
    pub separator: String,
    pub ending: String,
    pub split: bool,
    /// Columns used by the splitter; the terminal width when unset.
    pub width: Option<usize>,
    pub use_utc: bool,
    pub ts_format: String,
    pub print_ts: bool,
    pub display: bool,
    pub write: bool,
}

impl Default for PrinterSettings {
    fn default() -> Self {
        Self {
            separator: " ".to_string(),
            ending: "\n".to_string(),
            split: true,
            width: None,
            use_utc: false,
            ts_format: DEFAULT_TS_FORMAT.to_string(),
            print_ts: false,
            display: true,
            write: true,
        }
    }
}

impl PrinterSettings {
    /// Settings that print exactly like `println!`: no splitting.
    pub fn plain() -> Self {
        Self {
            split: false,
            ..Self::default()
        }
    }
}

/// Per-call overrides; unset fields fall back to [`PrinterSettings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOptions {
    pub sep: Option<String>,
    pub end: Option<String>,
    pub split: Option<bool>,
    pub width: Option<usize>,
    pub use_utc: Option<bool>,
    pub ts_format: Option<String>,
    pub print_ts: Option<bool>,
}

impl PrintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sep(mut self, sep: impl Into<String>) -> Self {
        self.sep = Some(sep.into());
        self
    }

    pub fn end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn split(mut self, split: bool) -> Self {
        self.split = Some(split);
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn use_utc(mut self, use_utc: bool) -> Self {
        self.use_utc = Some(use_utc);
        self
    }

    pub fn ts_format(mut self, ts_format: impl Into<String>) -> Self {
        self.ts_format = Some(ts_format.into());
        self
    }

    pub fn print_ts(mut self, print_ts: bool) -> Self {
        self.print_ts = Some(print_ts);
        self
    }
}

/// Join values the way `print` does.
pub fn join_values(values: &[&dyn Display], sep: &str) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(&value.to_string());
    }
    out
}

/// `prefix + " " + line`, or just the line when the prefix is empty.
pub(crate) fn prefixed(prefix: &str, line: &str) -> String {
    if prefix.is_empty() {
        line.to_string()
    } else {
        format!("{} {}", prefix, line)
    }
}

pub struct Printer<O: Output> {
    settings: PrinterSettings,
    output: O,
    clock: Arc<dyn Clock>,
}

impl<O: Output + fmt::Debug> fmt::Debug for Printer<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Printer")
            .field("settings", &self.settings)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl<O: Output> Printer<O> {
    pub fn new(output: O) -> Self {
        Self {
            settings: PrinterSettings::default(),
            output,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_settings(mut self, settings: PrinterSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn settings(&self) -> &PrinterSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PrinterSettings {
        &mut self.settings
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn separator<'a>(&'a self, options: &'a PrintOptions) -> &'a str {
        options.sep.as_deref().unwrap_or(&self.settings.separator)
    }

    /// Rendered timestamp for this call. A bypassed `timestamp` is used verbatim.
    pub fn timestamp(&self, options: &PrintOptions, bypassed: &Bypassed) -> Result<String> {
        if let Some(text) = bypassed.text(Setting::Timestamp) {
            return Ok(text);
        }
        let use_utc = options.use_utc.unwrap_or(self.settings.use_utc);
        let format = options
            .ts_format
            .as_deref()
            .unwrap_or(&self.settings.ts_format);
        Timestamper::new(use_utc, format).stamp(self.clock.as_ref())
    }

    /// Render already joined text for the screen, ending included.
    pub fn render_text(&self, text: &str, options: &PrintOptions, bypassed: &Bypassed) -> Result<String> {
        let mut output = text.to_string();

        if options.print_ts.unwrap_or(self.settings.print_ts) {
            let ts = self.timestamp(options, bypassed)?;
            output = output
                .lines()
                .map(|line| prefixed(&ts, line))
                .collect::<Vec<_>>()
                .join("\n");
        }

        let split = bypassed
            .flag(Setting::Splitter)
            .unwrap_or_else(|| options.split.unwrap_or(self.settings.split));
        if split {
            let columns = options
                .width
                .or(self.settings.width)
                .unwrap_or_else(terminal::columns);
            output = split_lines(&output, columns);
        }

        output.push_str(options.end.as_deref().unwrap_or(&self.settings.ending));
        Ok(output)
    }

    pub fn render(&self, values: &[&dyn Display], options: &PrintOptions) -> Result<String> {
        let text = join_values(values, self.separator(options));
        self.render_text(&text, options, &Bypassed::default())
    }

    pub fn print(&self, values: &[&dyn Display], options: &PrintOptions) -> Result<()> {
        let rendered = self.render(values, options)?;
        self.output.write_screen(&rendered)
    }

    /// Print already joined text, honouring bypassed settings.
    pub fn print_text(&self, text: &str, options: &PrintOptions, bypassed: &Bypassed) -> Result<()> {
        let rendered = self.render_text(text, options, bypassed)?;
        self.output.write_screen(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryOutput;
    use crate::core::timestamp::FixedClock;
    use serde_json::json;

    fn printer() -> Printer<MemoryOutput> {
        Printer::new(MemoryOutput::new())
            .with_settings(PrinterSettings::plain())
            .with_clock(FixedClock::parse("2024-03-05T21:07:09-05:00").unwrap())
    }

    #[test]
    fn test_matches_println() {
        let p = printer();
        let rendered = p.render(&[&"a", &1, &2.5], &PrintOptions::new()).unwrap();
        assert_eq!(rendered, format!("{} {} {}\n", "a", 1, 2.5));
    }

    #[test]
    fn test_no_values_renders_ending() {
        let p = printer();
        assert_eq!(p.render(&[], &PrintOptions::new()).unwrap(), "\n");
        assert_eq!(p.render(&[], &PrintOptions::new().end("")).unwrap(), "");
    }

    #[test]
    fn test_custom_separator_and_ending() {
        let p = printer();
        let opts = PrintOptions::new().sep("").end("!");
        assert_eq!(p.render(&[&"a", &"b"], &opts).unwrap(), "ab!");
        let opts = PrintOptions::new().sep(", ").end("\r\n");
        assert_eq!(p.render(&[&"a", &"b"], &opts).unwrap(), "a, b\r\n");
    }

    #[test]
    fn test_timestamp_on_every_line() {
        let p = printer();
        let opts = PrintOptions::new().print_ts(true).ts_format("%H:%M");
        assert_eq!(
            p.render(&[&"one\ntwo"], &opts).unwrap(),
            "21:07 one\n21:07 two\n"
        );
    }

    #[test]
    fn test_split_uses_width() {
        let p = printer();
        let opts = PrintOptions::new().split(true).width(12);
        assert_eq!(
            p.render(&[&"the quick brown fox"], &opts).unwrap(),
            "the quick\nbrown fox\n"
        );
    }

    #[test]
    fn test_bypassed_splitter_wins() {
        let p = printer();
        let mut bypassed = Bypassed::default();
        bypassed.insert(Setting::Splitter, json!(false));
        let opts = PrintOptions::new().split(true).width(12);
        assert_eq!(
            p.render_text("the quick brown fox", &opts, &bypassed).unwrap(),
            "the quick brown fox\n"
        );
    }

    #[test]
    fn test_bypassed_timestamp_is_verbatim() {
        let p = printer();
        let mut bypassed = Bypassed::default();
        bypassed.insert(Setting::Timestamp, json!("[now]"));
        let opts = PrintOptions::new().print_ts(true);
        assert_eq!(p.render_text("x", &opts, &bypassed).unwrap(), "[now] x\n");
    }

    #[test]
    fn test_print_writes_screen() {
        let p = printer();
        p.print(&[&"hello"], &PrintOptions::new()).unwrap();
        assert_eq!(p.output().screen(), "hello\n");
    }
}
