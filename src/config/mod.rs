//! Configuration management
//!
//! - **options**: the file-backed option schema and command-line overrides
//! - **store**: the write-once store bound to the storage root

pub mod options;
pub mod store;

pub use options::{ConfigOverrides, OptionValue};
pub use store::ConfigStore;
