use alloc::format;
use alloc::string::String;

use waterfall::{Rect, Size};

/// Side of the reference rect a floating element attaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Cross-axis alignment along the attached side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    Start,
    End,
}

/// Where to place the floating element relative to its reference.
///
/// The bare variants center on their side; `*Start`/`*End` align the leading
/// or trailing edges instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Placement {
    Top,
    TopStart,
    TopEnd,
    #[default]
    Bottom,
    BottomStart,
    BottomEnd,
    Left,
    LeftStart,
    LeftEnd,
    Right,
    RightStart,
    RightEnd,
}

impl Placement {
    pub fn side(self) -> Side {
        match self {
            Placement::Top | Placement::TopStart | Placement::TopEnd => Side::Top,
            Placement::Bottom | Placement::BottomStart | Placement::BottomEnd => Side::Bottom,
            Placement::Left | Placement::LeftStart | Placement::LeftEnd => Side::Left,
            Placement::Right | Placement::RightStart | Placement::RightEnd => Side::Right,
        }
    }

    pub fn alignment(self) -> Option<Alignment> {
        match self {
            Placement::TopStart
            | Placement::BottomStart
            | Placement::LeftStart
            | Placement::RightStart => Some(Alignment::Start),
            Placement::TopEnd
            | Placement::BottomEnd
            | Placement::LeftEnd
            | Placement::RightEnd => Some(Alignment::End),
            _ => None,
        }
    }
}

/// CSS positioning scheme the computed coordinates assume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Coordinates are relative to the nearest positioned ancestor.
    #[default]
    Absolute,
    /// Coordinates are relative to the viewport.
    Fixed,
}

impl Strategy {
    pub fn css_position(self) -> &'static str {
        match self {
            Strategy::Absolute => "absolute",
            Strategy::Fixed => "fixed",
        }
    }
}

/// How to position a floating element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatingOptions {
    pub placement: Placement,
    pub strategy: Strategy,
    /// Distance in pixels between the reference and the floating element,
    /// applied along the main axis away from the reference.
    pub offset: f64,
}

impl FloatingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }
}

/// Computed top-left corner for the floating element.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatingPosition {
    pub x: f64,
    pub y: f64,
    pub strategy: Strategy,
}

impl FloatingPosition {
    /// Inline style placing the element at the computed coordinates.
    pub fn css(&self) -> String {
        format!(
            "position:{};left:{}px;top:{}px",
            self.strategy.css_position(),
            self.x,
            self.y
        )
    }
}

/// Positioning seam: maps a reference rect and a floating size to
/// coordinates.
///
/// [`OffsetSolver`] covers plain placement + offset; hosts with collision
/// handling (flip, shift, arrow) implement this themselves.
pub trait PositionSolver {
    fn compute(&self, reference: Rect, floating: Size, options: &FloatingOptions) -> FloatingPosition;
}

/// Placement-and-offset solver with no collision handling.
#[derive(Clone, Copy, Debug, Default)]
pub struct OffsetSolver;

impl PositionSolver for OffsetSolver {
    fn compute(&self, reference: Rect, floating: Size, options: &FloatingOptions) -> FloatingPosition {
        let side = options.placement.side();
        let common_x = reference.x + reference.width / 2.0 - floating.width / 2.0;
        let common_y = reference.y + reference.height / 2.0 - floating.height / 2.0;
        let (mut x, mut y) = match side {
            Side::Top => (common_x, reference.y - floating.height - options.offset),
            Side::Bottom => (common_x, reference.bottom() + options.offset),
            Side::Left => (reference.x - floating.width - options.offset, common_y),
            Side::Right => (reference.right() + options.offset, common_y),
        };
        if let Some(alignment) = options.placement.alignment() {
            // Slide along the cross axis so the start (or end) edges line up.
            let shift = match side {
                Side::Top | Side::Bottom => reference.width / 2.0 - floating.width / 2.0,
                Side::Left | Side::Right => reference.height / 2.0 - floating.height / 2.0,
            };
            let shift = match alignment {
                Alignment::Start => -shift,
                Alignment::End => shift,
            };
            match side {
                Side::Top | Side::Bottom => x += shift,
                Side::Left | Side::Right => y += shift,
            }
        }
        FloatingPosition {
            x,
            y,
            strategy: options.strategy,
        }
    }
}

/// Tracks the inputs of one floating element and its last computed position.
///
/// Measurements arrive piecemeal from the host (reference rect from the
/// anchor, size from the floating element itself); `update` recomputes once
/// both are known.
#[derive(Clone, Copy, Debug, Default)]
pub struct FloatingState {
    reference: Option<Rect>,
    floating_size: Option<Size>,
    options: FloatingOptions,
    position: Option<FloatingPosition>,
}

impl FloatingState {
    pub fn new(options: FloatingOptions) -> Self {
        Self {
            reference: None,
            floating_size: None,
            options,
            position: None,
        }
    }

    pub fn options(&self) -> &FloatingOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: FloatingOptions) {
        self.options = options;
    }

    pub fn set_reference(&mut self, reference: Rect) {
        self.reference = Some(reference);
    }

    pub fn set_floating_size(&mut self, size: Size) {
        self.floating_size = Some(size);
    }

    /// Recomputes the position if both measurements are in.
    pub fn update(&mut self, solver: &impl PositionSolver) -> Option<FloatingPosition> {
        if let (Some(reference), Some(size)) = (self.reference, self.floating_size) {
            self.position = Some(solver.compute(reference, size, &self.options));
        }
        self.position
    }

    /// Last position computed by [`FloatingState::update`].
    pub fn position(&self) -> Option<FloatingPosition> {
        self.position
    }
}
