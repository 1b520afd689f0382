//! Padding parsing and small layout arithmetic helpers.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// Per-side padding of the list container, in layout units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Combined left + right padding.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Combined top + bottom padding.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Parses a CSS-style shorthand such as `"10px"` or `"10px 20px"`.
    ///
    /// Accepts one to four whitespace-separated components, each a number
    /// with an optional `unit` suffix. The empty string parses to
    /// [`Padding::ZERO`].
    pub fn parse(value: &str, unit: &str) -> Result<Self, PaddingError> {
        let mut components: Vec<f64> = Vec::new();
        for raw in value.split_whitespace() {
            components.push(parse_component(raw, unit)?);
        }
        match components[..] {
            [] => Ok(Self::ZERO),
            [all] => Ok(Self::uniform(all)),
            [vertical, horizontal] => Ok(Self {
                top: vertical,
                right: horizontal,
                bottom: vertical,
                left: horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top,
                right: horizontal,
                bottom,
                left: horizontal,
            }),
            [top, right, bottom, left] => Ok(Self {
                top,
                right,
                bottom,
                left,
            }),
            _ => Err(PaddingError::TooManyComponents(components.len())),
        }
    }
}

fn parse_component(raw: &str, unit: &str) -> Result<f64, PaddingError> {
    let digits = if !unit.is_empty() && raw.ends_with(unit) {
        &raw[..raw.len() - unit.len()]
    } else {
        raw.trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
    };
    digits
        .parse::<f64>()
        .map_err(|_| PaddingError::InvalidComponent(raw.to_string()))
}

/// Error from [`Padding::parse`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaddingError {
    /// A component was not a number with an optional unit suffix.
    InvalidComponent(String),
    /// More than four components were supplied.
    TooManyComponents(usize),
}

impl fmt::Display for PaddingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidComponent(raw) => write!(f, "invalid padding component `{raw}`"),
            Self::TooManyComponents(count) => {
                write!(f, "padding shorthand has {count} components, expected at most 4")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PaddingError {}

/// Index of the smallest value, the first occurrence winning ties.
///
/// `NaN` entries never win.
pub(crate) fn argmin(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, min)) if value >= min => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

/// Index of the largest value, the first occurrence winning ties.
///
/// `NaN` entries never win.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, max)) if value <= max => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

/// Horizontal space consumed by a vertical scrollbar, measured as the
/// difference between an element's offset and client widths.
pub fn scrollbar_width(offset_width: f64, client_width: f64) -> f64 {
    (offset_width - client_width).max(0.0)
}
