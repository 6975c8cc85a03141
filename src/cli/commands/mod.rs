//! Command implementations.

mod cancel;
mod clear;
mod completions;
mod dispatcher;
mod recover;
mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
