//! Data model: cached entities, label enumerations, configuration.

pub mod config;
pub mod labels;
pub mod set;

pub use config::Config;
pub use labels::{ALL_CLASSES, CLASS_SLUGS, Expansion, Quality, class_slug};
pub use set::{ItemSet, SetItem};
