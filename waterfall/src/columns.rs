//! Shortest-column shelf packing.

use alloc::vec::Vec;

use crate::geometry::{Padding, argmax, argmin};
use crate::types::ItemPlacement;

/// How long items animate `left` after a column-count change, in milliseconds.
pub const COLUMN_TRANSITION_MS: u64 = 100;

/// Width of one column inside the container's horizontal space.
///
/// Single-column lists get the full padded width; multi-column lists share
/// it after subtracting inter-column gaps and the scrollbar.
pub fn width_per_column(
    container_width: f64,
    columns: usize,
    space_x: f64,
    padding: Padding,
    scrollbar_width: f64,
) -> f64 {
    let inner = container_width - padding.horizontal();
    if columns <= 1 {
        return inner;
    }
    let gaps = (columns - 1) as f64 * space_x;
    (inner - gaps - scrollbar_width) / columns as f64
}

/// Inputs for one packing pass.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PackInput<'a> {
    pub heights: &'a [f64],
    pub columns: usize,
    pub space_x: f64,
    pub space_y: f64,
    pub container_width: f64,
    pub padding: Padding,
    pub scrollbar_width: f64,
}

/// Output of a packing pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct PackedLayout {
    /// One placement per item, in index order, `animate_left` cleared.
    pub placements: Vec<ItemPlacement>,
    /// Raw per-column accumulators, each carrying one trailing vertical gap.
    /// Length is `min(columns, item_count)`.
    pub accumulators: Vec<f64>,
    /// Tallest accumulator minus its trailing gap, clamped to 0.
    pub content_height: f64,
}

/// Packs items into columns.
///
/// The first `columns` items fill the first row left to right; every later
/// item lands in the currently shortest column (first such column on ties).
/// Pure in its inputs, so repeated runs place identically.
pub(crate) fn pack(input: PackInput<'_>) -> PackedLayout {
    let item_count = input.heights.len();
    if item_count == 0 {
        return PackedLayout::default();
    }
    let columns = input.columns.max(1);
    let width = width_per_column(
        input.container_width,
        columns,
        input.space_x,
        input.padding,
        input.scrollbar_width,
    );

    let mut placements = Vec::with_capacity(item_count);
    let mut accumulators: Vec<f64> = Vec::with_capacity(columns.min(item_count));
    for (index, &height) in input.heights.iter().enumerate() {
        let column = if index < columns {
            accumulators.push(0.0);
            index
        } else {
            argmin(&accumulators).unwrap_or(0)
        };
        let top = accumulators[column];
        accumulators[column] += height + input.space_y;
        placements.push(ItemPlacement {
            index,
            column,
            top,
            left: column as f64 * (width + input.space_x),
            width,
            height,
            animate_left: false,
        });
    }

    let tallest = argmax(&accumulators).map_or(0.0, |column| accumulators[column]);
    PackedLayout {
        placements,
        accumulators,
        content_height: (tallest - input.space_y).max(0.0),
    }
}
