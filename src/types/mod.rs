//! Core type definitions for ward.
//!
//! - [`config`] - Workspace configuration and the on-disk config file

pub mod config;

pub use config::{ConfigError, ConfigFile, WorkspaceConfig};
