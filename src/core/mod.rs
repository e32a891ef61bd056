pub mod bypass;
pub mod docstring;
pub mod format_spec;
pub mod interpolate;
pub mod level;
pub mod logger;
pub mod printer;
pub mod splitter;
pub mod timestamp;
pub mod translate;

pub use crate::domain::model::{Level, Setting};
pub use crate::domain::ports::{Catalog, Clock, Output};
pub use crate::utils::error::Result;
