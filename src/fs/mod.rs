//! File system utilities: naming, MIME resolution, path management.

pub mod mime;
pub mod naming;
pub mod paths;

pub use mime::mime_for_filename;
pub use naming::{file_name_from_url, sanitize_filename};
pub use paths::{app_cache_dir, default_save_dir};
