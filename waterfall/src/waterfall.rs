use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::columns::{self, COLUMN_TRANSITION_MS, PackInput};
use crate::heights::{HeightCache, HeightError, HeightProducer, HeightSlot, HeightTasks};
use crate::throttle::Throttle;
use crate::{ItemPlacement, LayoutFrame, Phase, ScrollerType, ViewportState, WaterfallOptions};

/// A headless waterfall layout engine.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects.
/// - Your adapter drives it by providing viewport geometry, scroll offsets,
///   and timestamps; the engine never reads a clock.
/// - Rendering is exposed through [`ItemPlacement`]s and the visible index
///   subset; apply [`ItemPlacement::css`] to each mounted item.
///
/// Every state change re-runs the same pipeline: resolve heights, pack
/// columns, recompute the visible subset, check for bottom proximity.
#[derive(Debug)]
pub struct Waterfall {
    options: WaterfallOptions,
    scroll_top: f64,
    measured_width: f64,
    measured_height: f64,
    offset_top: f64,
    now_ms: u64,

    heights: HeightCache,
    tasks: HeightTasks,
    frame: LayoutFrame,
    end_throttle: Throttle,

    // Column assignment of the last settled layout; placements that differ
    // from it animate `left` while a transition window is open.
    settled_columns: Vec<usize>,
    settled_column_count: usize,
    transition_started_ms: Option<u64>,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl Waterfall {
    /// Creates a new engine from options and runs the first layout pass.
    ///
    /// `options.initial_scroll_top` is applied immediately; the viewport
    /// falls back to pinned `width`/`height` until measured sizes arrive via
    /// [`Waterfall::set_measured_size`].
    pub fn new(options: WaterfallOptions) -> Self {
        wdebug!(
            item_count = options.item_count,
            columns = options.columns,
            "Waterfall::new"
        );
        let mut w = Self {
            scroll_top: options.initial_scroll_top.max(0.0),
            measured_width: 0.0,
            measured_height: 0.0,
            offset_top: 0.0,
            now_ms: 0,
            heights: HeightCache::new(),
            tasks: HeightTasks::new(),
            frame: LayoutFrame::default(),
            end_throttle: Throttle::new(options.end_throttle_ms),
            settled_columns: Vec::new(),
            settled_column_count: options.columns.max(1),
            transition_started_ms: None,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
            options,
        };
        w.heights.resize(w.options.item_count);
        w.relayout();
        w
    }

    pub fn options(&self) -> &WaterfallOptions {
        &self.options
    }

    /// Replaces the options wholesale and re-runs the pipeline.
    ///
    /// Resolved heights survive unless the item count drops to zero; a
    /// column-count change opens the left-transition window.
    pub fn set_options(&mut self, options: WaterfallOptions) {
        let prev_item_count = self.options.item_count;
        let prev_columns = self.options.columns;
        let prev_end_throttle = self.options.end_throttle_ms;
        self.options = options;
        wtrace!(
            item_count = self.options.item_count,
            columns = self.options.columns,
            "Waterfall::set_options"
        );

        if self.options.end_throttle_ms != prev_end_throttle {
            self.end_throttle.set_interval_ms(self.options.end_throttle_ms);
        }
        if self.options.item_count != prev_item_count {
            self.apply_item_count();
        }
        if self.options.columns != prev_columns {
            self.open_transition_window(self.now_ms);
        }

        self.relayout();
        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to
    /// `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut WaterfallOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&Waterfall) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    pub fn set_on_end(&mut self, on_end: Option<impl Fn() + Send + Sync + 'static>) {
        self.options.on_end = on_end.map(|f| Arc::new(f) as _);
        self.notify();
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// Recommended for adapters: a typical frame may update measured size,
    /// scroll offset, and item count together. Without batching, each setter
    /// may trigger `on_change`, which can be expensive if the callback
    /// drives rendering.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    pub fn item_count(&self) -> usize {
        self.options.item_count
    }

    pub fn set_item_count(&mut self, item_count: usize) {
        if self.options.item_count == item_count {
            return;
        }
        wdebug!(
            from = self.options.item_count,
            to = item_count,
            "item count changed"
        );
        self.options.item_count = item_count;
        self.apply_item_count();
        self.relayout();
        self.notify();
    }

    pub fn columns(&self) -> usize {
        self.options.columns
    }

    /// Changes the column count and opens the left-transition window.
    ///
    /// For [`COLUMN_TRANSITION_MS`] after the change, items that land in a
    /// different column than before carry `animate_left`; the next event
    /// past the window settles the layout and clears the flags.
    pub fn set_columns(&mut self, columns: usize, now_ms: u64) {
        self.now_ms = now_ms;
        if self.options.columns == columns {
            return;
        }
        wdebug!(from = self.options.columns, to = columns, "columns changed");
        self.options.columns = columns;
        self.open_transition_window(now_ms);
        self.relayout();
        self.notify();
    }

    /// Swaps the height producer.
    ///
    /// Only indices still unresolved are consulted again; resolved heights
    /// are immutable until the cache resets.
    pub fn set_producer(&mut self, producer: HeightProducer) {
        if producer.same_source(&self.options.producer) {
            return;
        }
        self.options.producer = producer;
        self.relayout();
        self.notify();
    }

    /// Supplies the measured size of the list container.
    pub fn set_measured_size(&mut self, width: f64, height: f64) {
        if self.measured_width == width && self.measured_height == height {
            return;
        }
        self.measured_width = width;
        self.measured_height = height;
        self.relayout();
        self.notify();
    }

    /// Distance of the list top from the scroller top, for
    /// [`ScrollerType::Window`] lists that start below other content.
    pub fn set_offset_top(&mut self, offset_top: f64) {
        if self.offset_top == offset_top {
            return;
        }
        self.offset_top = offset_top;
        self.relayout();
        self.notify();
    }

    /// Applies a scroll notification. Negative offsets clamp to 0.
    pub fn apply_scroll_event(&mut self, scroll_top: f64, now_ms: u64) {
        self.now_ms = now_ms;
        let scroll_top = scroll_top.max(0.0);
        if self.scroll_top == scroll_top {
            self.settle_transition();
            return;
        }
        wtrace!(scroll_top, now_ms, "scroll");
        self.scroll_top = scroll_top;
        self.relayout();
        self.notify();
    }

    /// Frame pulse. Advances engine time so an elapsed column-transition
    /// window settles even when no other event arrives.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        self.settle_transition();
    }

    /// Polls in-flight height tasks and applies completions.
    ///
    /// Returns the number of heights applied. A non-zero return means the
    /// pipeline ran and `on_change` fired. Failures are final: the slot
    /// becomes [`HeightSlot::Failed`] and lays out at height 0.
    pub fn poll_heights(&mut self, now_ms: u64) -> usize {
        self.now_ms = now_ms;
        let completed = self.tasks.poll_completed();
        if completed.is_empty() {
            self.settle_transition();
            return 0;
        }
        let mut applied = 0;
        for (index, result) in completed {
            if !self.heights.slot(index).is_pending() {
                continue;
            }
            match result {
                Ok(height) => {
                    wtrace!(index, height, "height resolved");
                    self.heights.set(index, HeightSlot::Resolved(height));
                }
                Err(error) => {
                    self.heights.set(index, HeightSlot::Failed);
                    warn_height_failure(index, &error);
                }
            }
            applied += 1;
        }
        if applied > 0 {
            self.relayout();
            self.notify();
        }
        applied
    }

    /// Number of height resolutions still in flight.
    pub fn pending_heights(&self) -> usize {
        self.tasks.len()
    }

    pub fn height_slot(&self, index: usize) -> HeightSlot {
        self.heights.slot(index)
    }

    pub fn phase(&self) -> Phase {
        self.frame.phase
    }

    /// Every item placement from the current frame, in index order.
    pub fn placements(&self) -> &[ItemPlacement] {
        &self.frame.placements
    }

    /// Indices inside the visible band, in index order.
    pub fn visible_indices(&self) -> &[usize] {
        &self.frame.visible
    }

    /// Clones of the placements inside the visible band.
    pub fn visible_items(&self) -> Vec<ItemPlacement> {
        self.frame
            .visible
            .iter()
            .map(|&index| self.frame.placements[index].clone())
            .collect()
    }

    /// Inline style for the item at `index`, using the configured unit.
    pub fn item_css(&self, index: usize) -> Option<String> {
        self.frame
            .placements
            .get(index)
            .map(|placement| placement.css(&self.options.unit))
    }

    /// Height of the content box (the inner spacer element).
    pub fn content_height(&self) -> f64 {
        self.frame.content_height
    }

    pub fn width_per_column(&self) -> f64 {
        self.frame.width_per_column
    }

    /// Raw per-column accumulators, each carrying one trailing gap.
    pub fn column_heights(&self) -> &[f64] {
        &self.frame.column_heights
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn offset_top(&self) -> f64 {
        self.offset_top
    }

    /// Returns a lightweight snapshot of the current viewport state.
    pub fn viewport_state(&self) -> ViewportState {
        ViewportState {
            scroll_top: self.scroll_top,
            width: self.viewport_width(),
            height: self.viewport_height(),
            offset_top: self.offset_top,
        }
    }

    /// Returns a snapshot of the most recent layout pass.
    pub fn layout_frame(&self) -> LayoutFrame {
        self.frame.clone()
    }

    fn viewport_width(&self) -> f64 {
        self.options.width.unwrap_or(self.measured_width)
    }

    fn viewport_height(&self) -> f64 {
        self.options.height.unwrap_or(self.measured_height)
    }

    fn apply_item_count(&mut self) {
        if self.options.item_count == 0 {
            self.heights.clear();
            self.tasks.clear();
        } else {
            self.heights.resize(self.options.item_count);
            self.tasks.cancel_from(self.options.item_count);
        }
    }

    fn open_transition_window(&mut self, now_ms: u64) {
        if self.options.columns.max(1) != self.settled_column_count {
            self.transition_started_ms = Some(now_ms);
        }
    }

    fn transition_active(&self) -> bool {
        match self.transition_started_ms {
            Some(started) => self.now_ms.saturating_sub(started) < COLUMN_TRANSITION_MS,
            None => false,
        }
    }

    /// Re-lays out if an open column-transition window has elapsed, so the
    /// baseline updates and `animate_left` flags clear.
    fn settle_transition(&mut self) {
        if self.transition_started_ms.is_some() && !self.transition_active() {
            self.relayout();
            self.notify();
        }
    }

    /// Runs one full pipeline pass: resolve, pack, visibility, end check.
    fn relayout(&mut self) {
        debug_assert_eq!(self.heights.len(), self.options.item_count);
        self.resolve_heights();

        let heights = self.heights.layout_heights();
        let packed = columns::pack(PackInput {
            heights: &heights,
            columns: self.options.columns,
            space_x: self.options.space_x,
            space_y: self.options.space_y,
            container_width: self.viewport_width(),
            padding: self.options.padding,
            scrollbar_width: self.options.scrollbar_width,
        });

        let mut placements = packed.placements;
        if self.transition_active() {
            for placement in &mut placements {
                let moved = self
                    .settled_columns
                    .get(placement.index)
                    .is_some_and(|&column| column != placement.column);
                placement.animate_left = moved;
            }
        } else {
            self.transition_started_ms = None;
            self.settled_columns = placements.iter().map(|p| p.column).collect();
            self.settled_column_count = self.options.columns.max(1);
        }

        let visible = self.compute_visible(&placements);
        self.frame = LayoutFrame {
            phase: self.derive_phase(),
            placements,
            visible,
            column_heights: packed.accumulators,
            content_height: packed.content_height,
            width_per_column: columns::width_per_column(
                self.viewport_width(),
                self.options.columns.max(1),
                self.options.space_x,
                self.options.padding,
                self.options.scrollbar_width,
            ),
        };

        self.check_end();
    }

    fn resolve_heights(&mut self) {
        let producer = self.options.producer.clone();
        for index in 0..self.options.item_count {
            if !self.heights.slot(index).is_unresolved() {
                continue;
            }
            match &producer {
                HeightProducer::Fixed(height) => {
                    self.heights.set(index, HeightSlot::Resolved(*height));
                }
                HeightProducer::Sync(f) => {
                    let height = f(index);
                    self.heights.set(index, HeightSlot::Resolved(height));
                }
                HeightProducer::Async(f) => {
                    self.heights.set(index, HeightSlot::Pending);
                    self.tasks.spawn(index, f(index));
                }
            }
        }
    }

    /// Inclusive band test against the viewport, widened by `overscan`.
    fn compute_visible(&self, placements: &[ItemPlacement]) -> Vec<usize> {
        let view = self.viewport_height();
        let overscan = self.options.overscan;
        let scroll = self.scroll_top;
        placements
            .iter()
            .filter(|p| match self.options.scroller {
                ScrollerType::SelfScroll => {
                    scroll - overscan <= p.top + p.height && scroll + view + overscan >= p.top
                }
                ScrollerType::Window => {
                    p.top + self.offset_top <= scroll + view + overscan
                        && p.top + p.height + self.offset_top >= scroll - overscan
                }
            })
            .map(|p| p.index)
            .collect()
    }

    fn derive_phase(&self) -> Phase {
        if self.options.item_count == 0 {
            Phase::Idle
        } else if self.heights.has_pending() {
            Phase::Measuring
        } else {
            Phase::LaidOut
        }
    }

    /// Fires `on_end` when the shortest column's content is within
    /// `end_offset` of the viewport bottom, at most once per throttle
    /// window.
    fn check_end(&mut self) {
        if self.options.item_count == 0 {
            return;
        }
        let Some(on_end) = self.options.on_end.clone() else {
            return;
        };
        let Some(min_column) = self
            .frame
            .column_heights
            .iter()
            .copied()
            .reduce(f64::min)
        else {
            return;
        };
        let bottom = match self.options.scroller {
            ScrollerType::SelfScroll => self.scroll_top + self.viewport_height(),
            ScrollerType::Window => self.scroll_top - self.offset_top + self.viewport_height(),
        };
        if bottom + self.options.end_offset >= min_column && self.end_throttle.try_fire(self.now_ms)
        {
            wtrace!(
                scroll_top = self.scroll_top,
                min_column,
                "scroll end reached"
            );
            on_end();
        }
    }
}

#[cfg(feature = "tracing")]
fn warn_height_failure(index: usize, error: &HeightError) {
    tracing::warn!(target: "waterfall", index, error = %error, "height resolution failed");
}

#[cfg(not(feature = "tracing"))]
fn warn_height_failure(_index: usize, _error: &HeightError) {}
