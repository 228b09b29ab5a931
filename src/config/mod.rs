// src/config/mod.rs

//! Configuration loading and validation for flw.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate the raw values before they become a [`ConfigFile`] (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, EachSection, FlowSection, LogSection, RawConfigFile};
pub use validate::validate_config;
