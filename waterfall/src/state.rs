use alloc::vec::Vec;

use crate::types::{ItemPlacement, Phase};

/// A lightweight, serializable snapshot of the current viewport geometry.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    /// Current scroll offset. Negative inputs clamp to 0.
    pub scroll_top: f64,
    /// Effective viewport width, pinned or measured.
    pub width: f64,
    /// Effective viewport height, pinned or measured.
    pub height: f64,
    /// Distance of the list top from the scroller top (window mode).
    pub offset_top: f64,
}

/// A serializable snapshot of the most recent layout pass.
///
/// This is useful for driving a renderer from outside the engine without
/// coupling it to any specific UI framework. With `feature = "serde"`, this
/// type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutFrame {
    pub phase: Phase,
    /// Every item placement, in index order.
    pub placements: Vec<ItemPlacement>,
    /// Indices inside the visible band, in index order.
    pub visible: Vec<usize>,
    /// Raw per-column accumulators, each carrying one trailing gap.
    pub column_heights: Vec<f64>,
    /// Height of the content box.
    pub content_height: f64,
    /// Width of one column.
    pub width_per_column: f64,
}
