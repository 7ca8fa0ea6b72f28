//! Library side of the `hrec` command.

pub mod commands;
pub mod logging;
pub mod output;
