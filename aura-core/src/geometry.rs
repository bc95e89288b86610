//! Geometry primitives for overlay manipulation.
//!
//! Pure functions only: a drag is the start position offset by the
//! pointer delta, and a corner resize keeps the aspect ratio captured
//! at the start of the gesture. All coordinates are in document space
//! (origin at the top-left of the canvas content area).

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// A point (or offset) in document space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate in pixels.
    pub x: f32,
    /// Vertical coordinate in pixels.
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width divided by height, or `None` for a degenerate size.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width > 0.0 && self.height > 0.0 {
            Some(self.width / self.height)
        } else {
            None
        }
    }
}

/// One of the four corner resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    /// Top-left handle.
    Tl,
    /// Top-right handle.
    Tr,
    /// Bottom-left handle.
    Bl,
    /// Bottom-right handle.
    Br,
}

impl Corner {
    /// All four corners, in handle render order.
    pub const ALL: [Corner; 4] = [Corner::Tl, Corner::Tr, Corner::Bl, Corner::Br];

    /// Short handle name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Corner::Tl => "tl",
            Corner::Tr => "tr",
            Corner::Bl => "bl",
            Corner::Br => "br",
        }
    }

    /// Whether the handle sits on the left edge.
    #[must_use]
    pub fn is_left(self) -> bool {
        matches!(self, Corner::Tl | Corner::Bl)
    }

    /// Whether the handle sits on the top edge.
    #[must_use]
    pub fn is_top(self) -> bool {
        matches!(self, Corner::Tl | Corner::Tr)
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Corner {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tl" => Ok(Corner::Tl),
            "tr" => Ok(Corner::Tr),
            "bl" => Ok(Corner::Bl),
            "br" => Ok(Corner::Br),
            other => Err(EditorError::InvalidHandle(other.to_string())),
        }
    }
}

/// Position reached by dragging from `start` while the pointer moved
/// from `start_pointer` to `pointer`.
#[must_use]
pub fn drag_position(start: Point, start_pointer: Point, pointer: Point) -> Point {
    start + (pointer - start_pointer)
}

/// Result of a corner resize step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOutcome {
    /// New top-left position.
    pub position: Point,
    /// New size, aspect-locked to the start size.
    pub size: Size,
}

/// Aspect-locked corner resize.
///
/// The dominant axis of pointer movement drives the resize; the other
/// dimension is derived from the aspect ratio of `start_size`. Left and
/// top handles move the origin so the opposite edge stays anchored.
///
/// Returns `None` when `start_size` is degenerate.
#[must_use]
pub fn corner_resize(
    corner: Corner,
    start_position: Point,
    start_size: Size,
    delta: Point,
) -> Option<ResizeOutcome> {
    let aspect = start_size.aspect_ratio()?;

    let mut width = if corner.is_left() {
        start_size.width - delta.x
    } else {
        start_size.width + delta.x
    };
    let mut height = if corner.is_top() {
        start_size.height - delta.y
    } else {
        start_size.height + delta.y
    };

    if delta.x.abs() > delta.y.abs() {
        height = width / aspect;
    } else {
        width = height * aspect;
    }

    let x = if corner.is_left() {
        start_position.x + (start_size.width - width)
    } else {
        start_position.x
    };
    let y = if corner.is_top() {
        start_position.y + (start_size.height - height)
    } else {
        start_position.y
    };

    Some(ResizeOutcome {
        position: Point::new(x, y),
        size: Size::new(width, height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_drag_position() {
        let p = drag_position(
            Point::new(100.0, 100.0),
            Point::new(10.0, 10.0),
            Point::new(30.0, 5.0),
        );
        assert_eq!(p, Point::new(120.0, 95.0));
    }

    #[test]
    fn test_bottom_right_width_dominant() {
        let out = corner_resize(
            Corner::Br,
            Point::new(10.0, 10.0),
            Size::new(200.0, 100.0),
            Point::new(40.0, 5.0),
        )
        .expect("resize");
        assert!(approx(out.size.width, 240.0));
        assert!(approx(out.size.height, 120.0));
        assert_eq!(out.position, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_bottom_right_height_dominant() {
        let out = corner_resize(
            Corner::Br,
            Point::ZERO,
            Size::new(200.0, 100.0),
            Point::new(5.0, 50.0),
        )
        .expect("resize");
        assert!(approx(out.size.height, 150.0));
        assert!(approx(out.size.width, 300.0));
    }

    #[test]
    fn test_top_left_anchors_bottom_right() {
        let start = Point::new(50.0, 50.0);
        let size = Size::new(100.0, 100.0);
        let out = corner_resize(Corner::Tl, start, size, Point::new(-20.0, -10.0)).expect("resize");
        assert!(approx(out.size.width, 120.0));
        assert!(approx(out.size.height, 120.0));
        assert!(approx(out.position.x + out.size.width, 150.0));
        assert!(approx(out.position.y + out.size.height, 150.0));
    }

    #[test]
    fn test_top_right_keeps_left_edge() {
        let out = corner_resize(
            Corner::Tr,
            Point::new(0.0, 100.0),
            Size::new(150.0, 75.0),
            Point::new(30.0, 0.0),
        )
        .expect("resize");
        assert!(approx(out.position.x, 0.0));
        assert!(approx(out.size.width, 180.0));
        assert!(approx(out.size.height, 90.0));
        assert!(approx(out.position.y + out.size.height, 175.0));
    }

    #[test]
    fn test_degenerate_start_size() {
        assert!(corner_resize(Corner::Br, Point::ZERO, Size::new(0.0, 10.0), Point::ZERO).is_none());
    }

    #[test]
    fn test_corner_parse() {
        assert_eq!("bl".parse::<Corner>().expect("parse"), Corner::Bl);
        assert!("middle".parse::<Corner>().is_err());
    }
}
