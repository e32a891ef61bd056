// Adapters layer: concrete implementations of the Output port and input readers.

pub mod console;
pub mod memory;
pub mod reader;

pub use console::{ConsoleOutput, Stream};
pub use memory::MemoryOutput;
pub use reader::{log_lines, read_all};
