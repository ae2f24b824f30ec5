pub mod cli;
pub mod config;
pub mod error;
pub mod git_ref;
pub mod logging;
pub mod payload;
pub mod sink;
