//! Structured logging to a rotating file.
//!
//! Plugin output goes to the terminal pane, so logs are written to
//! `bibshelf.log` in the plugin data directory instead:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → bibshelf.log
//! ```
//!
//! The file rotates at 10 MB and keeps 3 backups.
//!
//! # Configuration
//!
//! The level comes from the `trace_level` option (default `"info"`) and
//! accepts any `EnvFilter` directive, e.g. `"bibshelf=debug"`.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`file_writer`]: Rotating file writer

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
