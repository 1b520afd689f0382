//! Core data types shared by the waterfall engine.

use alloc::format;
use alloc::string::String;

/// How the list element is scrolled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollerType {
    /// The list owns its scroll container and reads its own scroll offset.
    #[default]
    SelfScroll,
    /// The surrounding window scrolls; offsets arrive from the page.
    Window,
}

/// Lifecycle phase of the layout pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// The item sequence is empty.
    #[default]
    Idle,
    /// At least one item height is still being produced.
    Measuring,
    /// Every item has a resolved height and placements are current.
    LaidOut,
}

/// An axis-aligned rectangle in layout space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// A width/height pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Resolved absolute position of one item inside the waterfall.
///
/// `top`/`left` are relative to the list content box. `animate_left` is set
/// while the item is moving to a different column after a column-count
/// change, so hosts can attach a left transition for that window.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemPlacement {
    /// Index of the item in the data set.
    pub index: usize,
    /// Column the item was packed into.
    pub column: usize,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    /// True while the item is transitioning to a new column.
    pub animate_left: bool,
}

impl ItemPlacement {
    /// Bottom edge of the item, `top + height`.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// The item's box as a [`Rect`].
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    /// Inline style for the item wrapper.
    ///
    /// `unit` is appended to every length, e.g. `"px"`.
    pub fn css(&self, unit: &str) -> String {
        let mut style = format!(
            "position:absolute;box-sizing:border-box;top:{top}{u};left:{left}{u};width:{width}{u};height:{height}{u}",
            top = self.top,
            left = self.left,
            width = self.width,
            height = self.height,
            u = unit,
        );
        if self.animate_left {
            style.push_str(";transition:left 0.1s linear");
        }
        style
    }
}
