//! Utility functions

pub mod paths;

pub use paths::{display_relative, normalize_lexically, normalize_path, resolve_path};
