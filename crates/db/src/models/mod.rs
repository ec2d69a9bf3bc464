//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts where this subsystem writes

pub mod cdn_setting;
pub mod content_item;
pub mod snapshot;
pub mod tenant;
