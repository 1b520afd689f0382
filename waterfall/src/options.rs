use alloc::string::String;
use alloc::sync::Arc;

use crate::geometry::Padding;
use crate::heights::HeightProducer;
use crate::types::ScrollerType;
use crate::waterfall::Waterfall;

/// A callback fired after every state-changing layout pass.
pub type OnChangeCallback = Arc<dyn Fn(&Waterfall) + Send + Sync>;

/// A callback fired when scrolling approaches the content's bottom edge.
///
/// Firing is rate limited by `end_throttle_ms`; a condition that persists
/// across throttle windows fires again in the next window.
pub type OnEndCallback = Arc<dyn Fn() + Send + Sync>;

/// Configuration for [`crate::Waterfall`].
///
/// This type is designed to be cheap to clone: callbacks and the height
/// producer are stored in `Arc`s so hosts can update a few fields and call
/// `Waterfall::set_options` without reallocating closures.
pub struct WaterfallOptions {
    pub item_count: usize,
    /// Where item heights come from.
    pub producer: HeightProducer,
    /// Column count. `0` behaves as a single column.
    pub columns: usize,
    /// Horizontal gap between columns.
    pub space_x: f64,
    /// Vertical gap between stacked items.
    pub space_y: f64,
    /// Pinned viewport width. When `None`, the measured width is used.
    pub width: Option<f64>,
    /// Pinned viewport height. When `None`, the measured height is used.
    pub height: Option<f64>,
    /// Container padding. Parse CSS shorthand with [`Padding::parse`].
    pub padding: Padding,
    /// Unit appended to emitted style lengths.
    pub unit: String,
    /// Distance from the bottom edge at which `on_end` fires.
    pub end_offset: f64,
    /// Who owns scrolling: the list element itself, or the window.
    pub scroller: ScrollerType,
    /// Extra pixel band added to both ends of the visible range.
    pub overscan: f64,
    /// Width reserved for a vertical scrollbar in multi-column width math.
    pub scrollbar_width: f64,
    /// Minimum gap between `on_end` fires.
    pub end_throttle_ms: u64,
    /// Scroll offset applied at construction.
    pub initial_scroll_top: f64,
    pub on_end: Option<OnEndCallback>,
    pub on_change: Option<OnChangeCallback>,
}

impl Clone for WaterfallOptions {
    fn clone(&self) -> Self {
        Self {
            item_count: self.item_count,
            producer: self.producer.clone(),
            columns: self.columns,
            space_x: self.space_x,
            space_y: self.space_y,
            width: self.width,
            height: self.height,
            padding: self.padding,
            unit: self.unit.clone(),
            end_offset: self.end_offset,
            scroller: self.scroller,
            overscan: self.overscan,
            scrollbar_width: self.scrollbar_width,
            end_throttle_ms: self.end_throttle_ms,
            initial_scroll_top: self.initial_scroll_top,
            on_end: self.on_end.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

impl WaterfallOptions {
    /// Creates options for `item_count` items whose heights come from
    /// `producer`.
    ///
    /// Defaults: single column, `20.0` gaps, `"px"` unit, `150.0` end
    /// offset, self-scroll, `250` ms end throttle.
    pub fn new(item_count: usize, producer: HeightProducer) -> Self {
        Self {
            item_count,
            producer,
            columns: 1,
            space_x: 20.0,
            space_y: 20.0,
            width: None,
            height: None,
            padding: Padding::ZERO,
            unit: String::from("px"),
            end_offset: 150.0,
            scroller: ScrollerType::SelfScroll,
            overscan: 0.0,
            scrollbar_width: 0.0,
            end_throttle_ms: 250,
            initial_scroll_top: 0.0,
            on_end: None,
            on_change: None,
        }
    }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_space_x(mut self, space_x: f64) -> Self {
        self.space_x = space_x;
        self
    }

    pub fn with_space_y(mut self, space_y: f64) -> Self {
        self.space_y = space_y;
        self
    }

    /// Pins the viewport width instead of using measured sizes.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Pins the viewport height instead of using measured sizes.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_end_offset(mut self, end_offset: f64) -> Self {
        self.end_offset = end_offset;
        self
    }

    pub fn with_scroller(mut self, scroller: ScrollerType) -> Self {
        self.scroller = scroller;
        self
    }

    /// Pixel band added to both ends of the visible range.
    pub fn with_overscan(mut self, overscan: f64) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_scrollbar_width(mut self, scrollbar_width: f64) -> Self {
        self.scrollbar_width = scrollbar_width;
        self
    }

    pub fn with_end_throttle_ms(mut self, end_throttle_ms: u64) -> Self {
        self.end_throttle_ms = end_throttle_ms;
        self
    }

    pub fn with_initial_scroll_top(mut self, initial_scroll_top: f64) -> Self {
        self.initial_scroll_top = initial_scroll_top;
        self
    }

    pub fn with_on_end(mut self, on_end: Option<impl Fn() + Send + Sync + 'static>) -> Self {
        self.on_end = on_end.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&Waterfall) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for WaterfallOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WaterfallOptions")
            .field("item_count", &self.item_count)
            .field("producer", &self.producer)
            .field("columns", &self.columns)
            .field("space_x", &self.space_x)
            .field("space_y", &self.space_y)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("padding", &self.padding)
            .field("unit", &self.unit)
            .field("end_offset", &self.end_offset)
            .field("scroller", &self.scroller)
            .field("overscan", &self.overscan)
            .field("scrollbar_width", &self.scrollbar_width)
            .field("end_throttle_ms", &self.end_throttle_ms)
            .field("initial_scroll_top", &self.initial_scroll_top)
            .finish_non_exhaustive()
    }
}
