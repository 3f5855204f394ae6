//! Fixed palettes for compound highlighting. Channels are expressed as
//! floating point values in `[0, 1]` so plotting frontends can use them
//! directly.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn channels(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// Renders the color as `#rrggbb`, scaling each channel by 255.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.channels().map(|channel| {
            let scaled = (channel.clamp(0.0, 1.0) * 255.0).round();
            scaled as u8
        });
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl From<[f64; 3]> for Rgb {
    fn from([r, g, b]: [f64; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [f64; 3] {
    fn from(color: Rgb) -> Self {
        color.channels()
    }
}

/// Default compound palette, based on seaborn's `color_palette()`.
pub const DEFAULT_PALETTE: [Rgb; 5] = [
    Rgb::new(0.9, 0.0, 0.04),
    Rgb::new(0.54, 0.16, 0.8),
    Rgb::new(1.0, 0.48, 0.0),
    Rgb::new(0.94, 0.29, 0.75),
    Rgb::new(0.1, 0.78, 0.21),
];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PaletteError {
    #[error("palette must contain at least one color")]
    Empty,
    #[error("color {index} has channel value {value} outside [0, 1]")]
    ChannelOutOfRange { index: usize, value: f64 },
    #[error("colors {first} and {second} are identical")]
    Duplicate { first: usize, second: usize },
}

/// An ordered, validated set of distinct colors. Slot order is the
/// allocation order used by the assigner.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }

        for (index, color) in colors.iter().enumerate() {
            if let Some(value) = color
                .channels()
                .into_iter()
                .find(|value| !(0.0..=1.0).contains(value))
            {
                return Err(PaletteError::ChannelOutOfRange { index, value });
            }
        }

        for (second, color) in colors.iter().enumerate() {
            if let Some(first) = colors[..second].iter().position(|other| other == color) {
                return Err(PaletteError::Duplicate { first, second });
            }
        }

        Ok(Self { colors })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn slot(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rgb> {
        self.colors.iter()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.to_vec(),
        }
    }
}
