//! A headless waterfall layout engine for scrollable lists.
//!
//! For overlay utilities (portals, tooltips, floating positions), see the
//! `waterfall-overlay` crate.
//!
//! This crate focuses on the core algorithms needed to render tall,
//! uneven-height lists at interactive frame rates: sync/async item height
//! resolution, shortest-column packing, inclusive visible-range tests, and
//! rate-limited bottom-of-content detection.
//!
//! It is UI-agnostic. A DOM/GUI layer is expected to provide:
//! - container size (and padding/scrollbar) measurements
//! - scroll offsets, with timestamps for everything time-driven
//! - elements to apply each visible item's emitted style to
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod columns;
mod geometry;
mod heights;
mod options;
mod segments;
mod state;
mod throttle;
mod types;
mod waterfall;

#[cfg(test)]
mod tests;

pub use columns::{COLUMN_TRANSITION_MS, width_per_column};
pub use geometry::{Padding, PaddingError, scrollbar_width};
pub use heights::{
    AsyncHeightFn, HeightError, HeightFuture, HeightProducer, HeightSlot, SyncHeightFn,
};
pub use options::{OnChangeCallback, OnEndCallback, WaterfallOptions};
pub use segments::{FetchMode, FetchMoreCallback, SegmentOptions, SegmentWindow, SegmentedList};
pub use state::{LayoutFrame, ViewportState};
pub use throttle::Throttle;
pub use types::{ItemPlacement, Phase, Rect, ScrollerType, Size};
pub use waterfall::Waterfall;
