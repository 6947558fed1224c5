//! Tooling
//!
//! Command-line front end over the library: check a sitemap, print it, and
//! resolve fragments for a simulated subject.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
