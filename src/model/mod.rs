//! Data model shared by readers and the outline pipeline.
//!
//! Readers produce [`Fragment`]s; the pipeline consumes them and emits a
//! [`DocumentResult`] made of [`OutlineItem`]s.

mod fragment;
mod outline;

pub use fragment::{size_from_key, size_key, BoundingBox, FontFlags, Fragment};
pub use outline::{DocumentResult, HeadingLevel, OutlineItem};
