//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod cdn_setting_repo;
pub mod content_item_repo;
pub mod snapshot_repo;
pub mod tenant_repo;

pub use cdn_setting_repo::CdnSettingRepo;
pub use content_item_repo::ContentItemRepo;
pub use snapshot_repo::SnapshotRepo;
pub use tenant_repo::TenantRepo;
