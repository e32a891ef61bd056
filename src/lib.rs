pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

use std::fmt::Display;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::toml_config::TomlConfig;

pub use crate::adapters::{ConsoleOutput, MemoryOutput, Stream};
pub use crate::core::bypass::{Bypassers, Lookup, Variables};
pub use crate::core::interpolate::{interpolate, FormatArgs};
pub use crate::core::level::LevelFilter;
pub use crate::core::logger::{LogOptions, Logger};
pub use crate::core::printer::{PrintOptions, Printer, PrinterSettings};
pub use crate::core::timestamp::{FixedClock, SystemClock};
pub use crate::core::translate::{LanguageCatalog, LineCatalog, Translator};
pub use crate::domain::model::{Level, Setting};
pub use crate::utils::error::{PrintError, Result};

/// Print `values` to stdout exactly like `println!` would.
pub fn print(values: &[&dyn Display]) -> Result<()> {
    print_with(values, &PrintOptions::default())
}

pub fn print_with(values: &[&dyn Display], options: &PrintOptions) -> Result<()> {
    Printer::new(ConsoleOutput::stdout())
        .with_settings(PrinterSettings::plain())
        .print(values, options)
}

/// `nprint!(a, b, c)` prints its arguments separated by spaces.
///
/// Write errors are discarded.
#[macro_export]
macro_rules! nprint {
    () => {{
        let _ = $crate::print(&[]);
    }};
    ($($value:expr),+ $(,)?) => {{
        let _ = $crate::print(&[$(&$value as &dyn ::std::fmt::Display),+]);
    }};
}
