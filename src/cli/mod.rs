pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ViewArgs};
pub use commands::{init_logging, run, view_request};
