//! Overlay utilities for the `waterfall` crate.
//!
//! The `waterfall` crate is UI-agnostic and focuses on layout math and state. This crate
//! provides the headless machinery for elements floating above a list:
//!
//! - Portal registry (owned two-layer mount points with explicit release)
//! - Tooltip controller (trigger actions, multi-content selection, manual close)
//! - Floating positioning seam with a placement + offset solver
//! - Enter/exit transition tracking with per-phase styles
//!
//! This crate is intentionally framework-agnostic (no DOM or renderer bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod floating;
mod key;
mod portal;
mod tooltip;
mod transition;
mod trigger;


pub use floating::{
    Alignment, FloatingOptions, FloatingPosition, FloatingState, OffsetSolver, Placement,
    PositionSolver, Side, Strategy,
};
pub use key::PortalKey;
pub use portal::{PortalNode, PortalRegistry};
pub use tooltip::{ContentConfig, Tooltip, TooltipOptions};
pub use transition::{FloatStyle, TransitionPhase, TransitionStyles, TransitionTracker};
pub use trigger::{PointerKind, TriggerAction, TriggerBinding};
