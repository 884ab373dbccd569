//! Command implementations for the CLI
//!
//! - start: run the pricing server
//! - estimate: price a single request from a file or stdin
//! - watch: debounce a stream of requests from stdin
//! - test: validate the configuration
//! - config: display the configuration

pub mod config;
pub mod estimate;
pub mod start;
pub mod watch;
