//! Colors used to paint change masks.

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black, the color of unchanged pixels.
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    /// Channel triple in overlay order.
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Pixels where a feature appeared.
pub const ADDED_COLOR: Rgb = Rgb::new(0, 255, 0);

/// Pixels where a feature disappeared.
pub const REMOVED_COLOR: Rgb = Rgb::new(255, 0, 0);
