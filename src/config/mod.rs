//! Rules configuration for registry-gate.
//!
//! This module defines the Config struct holding the host and organization
//! lists that drive submission checks. Built-in defaults describe the public
//! library registry; an optional YAML file can override any of them.
//! Unknown fields are ignored for forward compatibility.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
