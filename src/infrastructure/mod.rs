//! Infrastructure layer for filesystem and environment interactions.
//!
//! Zellij plugins run in a sandbox where the host working directory is
//! mounted under `/host`. Library folders are read through that mount, while
//! paths handed to host commands (opener, editor) must be host-side.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir, host_relative, strip_host_prefix};
