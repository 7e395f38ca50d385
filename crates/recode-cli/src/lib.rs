//! Library side of the `recode` command-line tool.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
