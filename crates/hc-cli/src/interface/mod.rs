//! Terminal interface for interactive chat.

mod readline;

pub use readline::{ReadlineInterface, StatusPrinter};
