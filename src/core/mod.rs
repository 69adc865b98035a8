//! Core types for the chapter timeline engine.
//!
//! This module provides the segment data model, the segment store that
//! owns the single authoritative timeline, and the whole-second time
//! representation everything else is built on.

pub mod segment;
pub mod store;
pub mod time;

// Re-export core data structures for easier access.
pub use segment::{Segment, SegmentId};
pub use store::{ExternalRange, SegmentEvent, SegmentStore, StoreError, TimelineConfig};
pub use time::{Time, ZERO};
