//! Document library access.
//!
//! The library is a directory tree in which every folder holding an
//! `info.yaml` file is one document. Access goes through the
//! [`DocumentStore`] trait so the worker does not depend on the on-disk
//! layout.
//!
//! # Modules
//!
//! - [`backend`]: The [`DocumentStore`] trait
//! - [`folder`]: [`FolderLibrary`], the directory-tree implementation

pub mod backend;
pub mod folder;

pub use backend::DocumentStore;
pub use folder::FolderLibrary;
