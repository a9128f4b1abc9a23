//! Platform integration: storage permissions, delivery, URL handoff.

pub mod delivery;
pub mod opener;
pub mod permission;

pub use delivery::{DeliveryError, DeliverySink, SaveToFolder};
pub use opener::{SystemOpener, UrlOpener};
pub use permission::{PermissionGate, PermissionStatus, StoragePermissions};
