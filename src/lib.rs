//! Chapterline: slice a video's duration into an ordered, contiguous set
//! of titled chapters and export them as YouTube-style chapter
//! timestamps.
//!
//! The engine lives in [`core`] (segment model and the invariant-keeping
//! store), [`sync`] (change-notification fan-out between the two
//! presentational views), and [`chapters`] (timestamp text exchange).
//! [`ui`] hosts the egui surfaces.

pub mod chapters;
pub mod core;
pub mod sync;
pub mod ui;
