//! Domain primitives shared across the publication platform.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the reconciler, the CDN clients, and any future
//! CLI tooling alike.

pub mod error;
pub mod paths;
pub mod selection;
pub mod types;
pub mod validation;
