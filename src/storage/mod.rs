//! Persistence layer: the disk-backed set store.

pub mod store;

pub use store::SetStore;
