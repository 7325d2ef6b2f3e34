//! Shared value model for the reactive core.
//!
//! Parameter values are a closed set of variants. Feature code matches on
//! [`ParamValue`] exhaustively; there is no open trait hierarchy to extend,
//! which keeps snapshotting, equality and serialization trivial.

use serde::{Deserialize, Serialize};

/// Opaque handle to a native image buffer.
///
/// The core never inspects buffer contents; handles are minted by the
/// embedding application's buffer provider and only ever tracked, transferred
/// and released here.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BufferId(pub u64);

impl BufferId {
    /// Sentinel for "no buffer".
    pub const INVALID: BufferId = BufferId(u64::MAX);

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0 != u64::MAX
    }
}

impl std::fmt::Debug for BufferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "BufferId({})", self.0)
        } else {
            write!(f, "BufferId(INVALID)")
        }
    }
}

/// Monotone counter identifying one scheduling event.
///
/// Every accepted edit of a watched parameter advances the generation; a run
/// whose generation no longer matches the latest one is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    pub const ZERO: Generation = Generation(0);

    #[inline]
    pub fn next(self) -> Generation {
        Generation(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen {}", self.0)
    }
}

/// RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Region {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Returns the same region with left <= right and top <= bottom.
    pub fn normalized(&self) -> Region {
        Region {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }
}

/// Discriminant of a [`ParamValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    Number,
    Integer,
    Toggle,
    Choice,
    Color,
    Points,
    Region,
    Image,
}

impl ParamKind {
    pub fn name(&self) -> &'static str {
        match self {
            ParamKind::Number => "number",
            ParamKind::Integer => "integer",
            ParamKind::Toggle => "toggle",
            ParamKind::Choice => "choice",
            ParamKind::Color => "color",
            ParamKind::Points => "points",
            ParamKind::Region => "region",
            ParamKind::Image => "image",
        }
    }
}

/// A parameter's value. Closed set; every control kind the application
/// offers maps onto one of these variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    /// Continuous numeric control (sliders, number boxes).
    Number(f64),
    /// Discrete numeric control (integer sliders, kernel sizes).
    Integer(i64),
    /// Checkbox.
    Toggle(bool),
    /// Index into a static choice list (dropdown selection).
    Choice(usize),
    /// Color picker.
    Color(Rgba),
    /// Ordered point list (corner pickers, polygon controls).
    Points(Vec<Point>),
    /// Rectangle selection (crop controls).
    Region(Region),
    /// Reference to a loaded image buffer.
    Image(BufferId),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Number(_) => ParamKind::Number,
            ParamValue::Integer(_) => ParamKind::Integer,
            ParamValue::Toggle(_) => ParamKind::Toggle,
            ParamValue::Choice(_) => ParamKind::Choice,
            ParamValue::Color(_) => ParamKind::Color,
            ParamValue::Points(_) => ParamKind::Points,
            ParamValue::Region(_) => ParamKind::Region,
            ParamValue::Image(_) => ParamKind::Image,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_toggle(&self) -> Option<bool> {
        match self {
            ParamValue::Toggle(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<usize> {
        match self {
            ParamValue::Choice(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgba> {
        match self {
            ParamValue::Color(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_points(&self) -> Option<&[Point]> {
        match self {
            ParamValue::Points(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_region(&self) -> Option<Region> {
        match self {
            ParamValue::Region(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<BufferId> {
        match self {
            ParamValue::Image(v) => Some(*v),
            _ => None,
        }
    }

    /// Equality rule used by change detection.
    ///
    /// Floats compare by bit pattern, so a NaN written twice is "the same
    /// value" and does not re-fire notifications.
    pub fn same_as(&self, other: &ParamValue) -> bool {
        match (self, other) {
            (ParamValue::Number(a), ParamValue::Number(b)) => bits_eq(*a, *b),
            (ParamValue::Integer(a), ParamValue::Integer(b)) => a == b,
            (ParamValue::Toggle(a), ParamValue::Toggle(b)) => a == b,
            (ParamValue::Choice(a), ParamValue::Choice(b)) => a == b,
            (ParamValue::Color(a), ParamValue::Color(b)) => a == b,
            (ParamValue::Points(a), ParamValue::Points(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(p, q)| bits_eq(p.x, q.x) && bits_eq(p.y, q.y))
            }
            (ParamValue::Region(a), ParamValue::Region(b)) => {
                bits_eq(a.left, b.left)
                    && bits_eq(a.top, b.top)
                    && bits_eq(a.right, b.right)
                    && bits_eq(a.bottom, b.bottom)
            }
            (ParamValue::Image(a), ParamValue::Image(b)) => a == b,
            _ => false,
        }
    }
}

#[inline]
fn bits_eq(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits()
}
