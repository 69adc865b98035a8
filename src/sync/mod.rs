//! Keeps the two presentational views coherent with the segment store.

pub mod coordinator;

pub use coordinator::{SyncCoordinator, ViewUpdate};
