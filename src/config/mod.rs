// src/config/mod.rs
//! Service configuration (TOML file + environment overrides).

pub mod service;

pub use service::{ClientConfig, ServiceConfig};
