//! Paints and external image references.
//!
//! Layout never looks inside a paint; it only needs paints to compare and hash
//! so that strokes and fills can be used as cache keys.

use std::sync::Arc;

use pane_core::hash::StructuralHash;

/// RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit RGBA values.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`, with or without the `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::from_rgba8(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::from_rgba8(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)?,
            )),
            _ => None,
        }
    }

    /// Convert to 8-bit RGBA tuple.
    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        let scale = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (scale(self.r), scale(self.g), scale(self.b), scale(self.a))
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not opaque.
    pub fn to_hex(&self) -> String {
        let (r, g, b, a) = self.to_rgba8();
        if a == 255 {
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        }
    }

    pub(crate) fn hash_into(&self, state: StructuralHash) -> StructuralHash {
        state
            .f64(self.r as f64)
            .f64(self.g as f64)
            .f64(self.b as f64)
            .f64(self.a as f64)
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A color stop of a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    /// Position along the gradient (0.0 to 1.0)
    pub offset: f64,
    pub color: Color,
}

impl Stop {
    pub const fn new(offset: f64, color: Color) -> Self {
        Self { offset, color }
    }
}

/// A linear gradient.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearGradient {
    /// Angle in degrees (0 = left to right, 90 = bottom to top)
    pub angle: f64,
    pub stops: Vec<Stop>,
}

impl LinearGradient {
    /// Left to right.
    pub fn horizontal(stops: Vec<Stop>) -> Self {
        Self { angle: 0.0, stops }
    }

    /// Top to bottom.
    pub fn vertical(stops: Vec<Stop>) -> Self {
        Self { angle: 270.0, stops }
    }
}

/// A radial gradient.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadialGradient {
    /// Center X position (0.0 to 1.0, relative to bounds)
    pub center_x: f64,
    /// Center Y position (0.0 to 1.0, relative to bounds)
    pub center_y: f64,
    /// Radius (1.0 = extend to the edge)
    pub radius: f64,
    pub stops: Vec<Stop>,
}

impl RadialGradient {
    /// Centered circular gradient.
    pub fn circle(stops: Vec<Stop>) -> Self {
        Self {
            center_x: 0.5,
            center_y: 0.5,
            radius: 1.0,
            stops,
        }
    }
}

/// Anything a fill or stroke can be painted with.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Paint {
    Color(Color),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
}

impl Paint {
    pub const TRANSPARENT: Paint = Paint::Color(Color::TRANSPARENT);
    pub const BLACK: Paint = Paint::Color(Color::BLACK);

    /// Structural hash of the paint, mixed into `state`.
    pub fn hash_into(&self, state: StructuralHash) -> StructuralHash {
        let hash_stops = |state: StructuralHash, stops: &[Stop]| {
            stops.iter().fold(state.word(stops.len() as u64), |state, stop| {
                stop.color.hash_into(state.f64(stop.offset))
            })
        };
        match self {
            Paint::Color(color) => color.hash_into(state.word(1)),
            Paint::LinearGradient(gradient) => {
                hash_stops(state.word(2).f64(gradient.angle), &gradient.stops)
            }
            Paint::RadialGradient(gradient) => hash_stops(
                state
                    .word(3)
                    .f64(gradient.center_x)
                    .f64(gradient.center_y)
                    .f64(gradient.radius),
                &gradient.stops,
            ),
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::TRANSPARENT
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Color(color)
    }
}

/// Load state of an external image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageState {
    #[default]
    Loading,
    Loaded,
    /// Loading failed; layers using this image are skipped
    Failed,
}

/// Reference to an image decoded elsewhere.
///
/// Only the intrinsic size and load state matter here. A failed or still
/// loading image makes the layer that uses it drop out of drawing and tiling.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Image {
    pub url: String,
    /// Intrinsic width in pixels (0 until loaded)
    pub width: f64,
    /// Intrinsic height in pixels (0 until loaded)
    pub height: f64,
    pub state: ImageState,
}

impl Image {
    /// A successfully decoded image.
    pub fn loaded(url: impl Into<String>, width: f64, height: f64) -> Arc<Self> {
        Arc::new(Self {
            url: url.into(),
            width,
            height,
            state: ImageState::Loaded,
        })
    }

    /// An image still being fetched.
    pub fn loading(url: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            url: url.into(),
            width: 0.0,
            height: 0.0,
            state: ImageState::Loading,
        })
    }

    /// An image that could not be loaded.
    pub fn failed(url: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            url: url.into(),
            width: 0.0,
            height: 0.0,
            state: ImageState::Failed,
        })
    }

    /// Loaded with a non-empty size.
    pub fn is_loaded(&self) -> bool {
        self.state == ImageState::Loaded && self.width > 0.0 && self.height > 0.0
    }

    pub(crate) fn hash_into(&self, state: StructuralHash) -> StructuralHash {
        let state = self
            .url
            .bytes()
            .fold(state.word(self.url.len() as u64), |state, byte| {
                state.word(byte as u64)
            });
        state
            .f64(self.width)
            .f64(self.height)
            .word(self.state as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let color = Color::from_hex("#FF8000").unwrap();
        assert!((color.r - 1.0).abs() < 0.001);
        assert!((color.g - 128.0 / 255.0).abs() < 0.001);
        assert_eq!(color.to_hex(), "#FF8000");

        let translucent = Color::from_hex("00000080").unwrap();
        assert_eq!(translucent.to_hex(), "#00000080");
    }

    #[test]
    fn test_invalid_hex() {
        assert!(Color::from_hex("#FFF").is_none());
        assert!(Color::from_hex("#GG0000").is_none());
        assert!(Color::from_hex("#ÿÿÿ").is_none());
    }

    #[test]
    fn test_paint_hash_distinguishes_variants() {
        let color = Paint::Color(Color::WHITE);
        let gradient = Paint::LinearGradient(LinearGradient::horizontal(vec![
            Stop::new(0.0, Color::WHITE),
            Stop::new(1.0, Color::BLACK),
        ]));
        let h = |paint: &Paint| paint.hash_into(StructuralHash::new()).finish();
        assert_ne!(h(&color), h(&gradient));
        assert_eq!(h(&color), h(&Paint::Color(Color::WHITE)));
    }

    #[test]
    fn test_image_states() {
        assert!(Image::loaded("a.png", 10.0, 10.0).is_loaded());
        assert!(!Image::loading("a.png").is_loaded());
        assert!(!Image::failed("a.png").is_loaded());
        assert!(!Image::loaded("empty.png", 0.0, 10.0).is_loaded());
    }
}
