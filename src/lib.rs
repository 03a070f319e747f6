//! repo-extract: interactively pick repository files into one text dump
//!
//! This library provides the traversal engine, prompt protocol, and session
//! controller behind the `repo-extract` command.

pub mod cli;
pub mod config;
pub mod domain;
pub mod fetch;
pub mod prompt;
pub mod render;
pub mod session;
pub mod traverse;
pub mod utils;
