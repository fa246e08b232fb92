//! Hydration pipeline: index fetch, batched enrichment, classification,
//! periodic persistence.

pub mod hydrate;

pub use hydrate::{HydrationReport, Hydrator, ItemFailure, RunOutcome, RunState};
