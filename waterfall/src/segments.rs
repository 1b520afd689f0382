//! Fixed-item-height segments stacked in one scroller.
//!
//! Unlike the waterfall, segment windows are O(1) arithmetic: every item in
//! a segment shares one height, so the visible index range falls out of the
//! scroll offset directly. Hosts measure each segment's `offset_top` and
//! feed scroll events; the list answers index windows and drives load-more.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::throttle::Throttle;

/// A callback fired when a segment wants more data.
pub type FetchMoreCallback = Arc<dyn Fn() + Send + Sync>;

/// When segments request more data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchMode {
    /// Scroll events fetch for the current segment through the shared
    /// throttle; the bottom waypoint only advances the cursor.
    #[default]
    OnScroll,
    /// The bottom waypoint fetches for its own segment directly.
    OnBottom,
}

/// Configuration for one fixed-extent segment.
#[derive(Clone)]
pub struct SegmentOptions {
    pub item_count: usize,
    /// Height shared by every item in this segment.
    pub item_height: f64,
    /// Vertical gap between items.
    pub render_gap: f64,
    /// Extra items kept mounted above and below the window.
    pub boundary: usize,
    pub fetch_more: Option<FetchMoreCallback>,
}

impl SegmentOptions {
    pub fn new(item_count: usize, item_height: f64) -> Self {
        Self {
            item_count,
            item_height,
            render_gap: 0.0,
            boundary: 0,
            fetch_more: None,
        }
    }

    pub fn with_render_gap(mut self, render_gap: f64) -> Self {
        self.render_gap = render_gap;
        self
    }

    pub fn with_boundary(mut self, boundary: usize) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_fetch_more(mut self, fetch_more: Option<impl Fn() + Send + Sync + 'static>) -> Self {
        self.fetch_more = fetch_more.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for SegmentOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SegmentOptions")
            .field("item_count", &self.item_count)
            .field("item_height", &self.item_height)
            .field("render_gap", &self.render_gap)
            .field("boundary", &self.boundary)
            .finish_non_exhaustive()
    }
}

/// Half-open index window of one segment: render `start..end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentWindow {
    pub start: usize,
    pub end: usize,
}

impl SegmentWindow {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

#[derive(Debug)]
struct Segment {
    options: SegmentOptions,
    /// Distance from the scroller top; `None` until the host measures it,
    /// and an unmeasured segment renders nothing.
    offset_top: Option<f64>,
    bottom_in_band: bool,
}

/// A vertical stack of fixed-item-height segments sharing one scroller.
#[derive(Debug)]
pub struct SegmentedList {
    segments: Vec<Segment>,
    fetch_mode: FetchMode,
    scroll_top: f64,
    viewport_height: f64,
    current_segment: usize,
    fetch_throttle: Throttle,
}

impl Default for SegmentedList {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentedList {
    /// Creates an empty list. Defaults: [`FetchMode::OnScroll`], 2000 ms
    /// fetch throttle.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            fetch_mode: FetchMode::OnScroll,
            scroll_top: 0.0,
            viewport_height: 0.0,
            current_segment: 0,
            fetch_throttle: Throttle::new(2000),
        }
    }

    pub fn with_fetch_mode(mut self, fetch_mode: FetchMode) -> Self {
        self.fetch_mode = fetch_mode;
        self
    }

    pub fn with_fetch_throttle_ms(mut self, interval_ms: u64) -> Self {
        self.fetch_throttle = Throttle::new(interval_ms);
        self
    }

    /// Appends a segment and returns its index.
    pub fn push_segment(&mut self, options: SegmentOptions) -> usize {
        wdebug!(
            segment = self.segments.len(),
            item_count = options.item_count,
            "segment added"
        );
        self.segments.push(Segment {
            options,
            offset_top: None,
            bottom_in_band: false,
        });
        self.segments.len() - 1
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Segment the fetch cursor points at.
    pub fn current_segment(&self) -> usize {
        self.current_segment
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    /// Supplies a segment's measured distance from the scroller top.
    pub fn set_offset_top(&mut self, segment: usize, offset_top: f64) {
        if let Some(seg) = self.segments.get_mut(segment) {
            seg.offset_top = Some(offset_top);
        }
    }

    pub fn set_item_count(&mut self, segment: usize, item_count: usize) {
        if let Some(seg) = self.segments.get_mut(segment) {
            seg.options.item_count = item_count;
        }
    }

    /// Vertical extent of a segment: `count*height + (count-1)*gap`, 0 when
    /// empty.
    pub fn segment_extent(&self, segment: usize) -> f64 {
        self.segments.get(segment).map_or(0.0, |seg| {
            let count = seg.options.item_count;
            if count == 0 {
                return 0.0;
            }
            count as f64 * seg.options.item_height + (count - 1) as f64 * seg.options.render_gap
        })
    }

    /// Top of item `index` inside its segment's content box.
    pub fn item_top(&self, segment: usize, index: usize) -> f64 {
        self.segments.get(segment).map_or(0.0, |seg| {
            index as f64 * (seg.options.item_height + seg.options.render_gap)
        })
    }

    /// Index window of a segment for the current scroll position.
    ///
    /// Empty until the segment's `offset_top` is measured. The window is
    /// widened by the segment's `boundary` on both ends and clamped to the
    /// item count.
    pub fn window(&self, segment: usize) -> SegmentWindow {
        let Some(seg) = self.segments.get(segment) else {
            return SegmentWindow::default();
        };
        let Some(offset_top) = seg.offset_top else {
            return SegmentWindow::default();
        };
        let count = seg.options.item_count;
        if count == 0 {
            return SegmentWindow::default();
        }
        let step = seg.options.item_height + seg.options.render_gap;
        if step <= 0.0 {
            return SegmentWindow {
                start: 0,
                end: count,
            };
        }
        let local = self.scroll_top - offset_top;
        let span = local + self.viewport_height;
        if span <= 0.0 {
            // Segment is entirely below the viewport.
            return SegmentWindow::default();
        }
        let end = ((span / step) as usize + 1 + seg.options.boundary).min(count);
        let start = if local <= 0.0 {
            0
        } else {
            ((local / step) as usize).saturating_sub(seg.options.boundary)
        };
        SegmentWindow {
            start: start.min(end),
            end,
        }
    }

    /// Applies a scroll notification.
    ///
    /// Runs every segment's bottom waypoint (edge-triggered on the bottom
    /// edge entering the viewport band) and then the scroll-driven fetch
    /// path when the mode asks for it.
    pub fn apply_scroll_event(&mut self, scroll_top: f64, now_ms: u64) {
        self.scroll_top = scroll_top.max(0.0);
        let band_top = self.scroll_top;
        let band_bottom = self.scroll_top + self.viewport_height;

        for i in 0..self.segments.len() {
            let extent = self.segment_extent(i);
            let Some(offset_top) = self.segments[i].offset_top else {
                self.segments[i].bottom_in_band = false;
                continue;
            };
            let bottom_edge = offset_top + extent;
            let in_band = bottom_edge >= band_top && bottom_edge <= band_bottom;
            let entered = in_band && !self.segments[i].bottom_in_band;
            self.segments[i].bottom_in_band = in_band;
            if !entered {
                continue;
            }
            wtrace!(segment = i, "segment bottom entered viewport");
            self.current_segment = i;
            if self.fetch_mode == FetchMode::OnBottom {
                if let Some(fetch) = self.segments[i].options.fetch_more.clone() {
                    fetch();
                }
            }
        }

        if self.fetch_mode == FetchMode::OnScroll && self.fetch_throttle.try_fire(now_ms) {
            let fetch = self
                .segments
                .get(self.current_segment)
                .and_then(|seg| seg.options.fetch_more.clone());
            if let Some(fetch) = fetch {
                wtrace!(segment = self.current_segment, "scroll fetch");
                fetch();
            }
        }
    }
}
