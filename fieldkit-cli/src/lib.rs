//! fieldkit - command-line front end for the fieldkit form engine.
//!
//! Each subcommand lives in its own module and renders to a `String`, so
//! `main.rs` only parses arguments, loads settings and prints.

pub mod change;
pub mod cli;
pub mod fields;
pub mod input;
pub mod output;
pub mod validate;
pub mod visible;

pub use cli::{Cli, Commands, OutputFormat};
