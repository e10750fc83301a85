//! Background fills and images.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use glam::DVec2;
use pane_core::hash::StructuralHash;
use pane_core::{BackgroundPosition, BackgroundSize, Bounds, CornerRadii, Insets, Side};

use crate::paint::{Image, Paint};

/// A rounded rectangle filled with a paint, inset from the region edges.
///
/// Negative insets make the fill extend outside the region.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "BackgroundFillRepr", into = "BackgroundFillRepr")
)]
pub struct BackgroundFill {
    fill: Paint,
    radii: CornerRadii,
    insets: Insets,
    hash: u64,
}

impl BackgroundFill {
    /// Missing arguments default to a transparent paint, square corners and no insets.
    pub fn new(fill: Option<Paint>, radii: Option<CornerRadii>, insets: Option<Insets>) -> Self {
        let fill = fill.unwrap_or_default();
        let radii = radii.unwrap_or_default();
        let insets = insets.unwrap_or_default();
        let hash = fill
            .hash_into(StructuralHash::new())
            .word(radii.cached_hash())
            .word(insets.cached_hash())
            .finish();
        Self {
            fill,
            radii,
            insets,
            hash,
        }
    }

    /// Fill the whole region with `paint`.
    pub fn paint(paint: impl Into<Paint>) -> Self {
        Self::new(Some(paint.into()), None, None)
    }

    pub fn fill(&self) -> &Paint {
        &self.fill
    }

    pub fn radii(&self) -> &CornerRadii {
        &self.radii
    }

    pub fn insets(&self) -> &Insets {
        &self.insets
    }

    pub fn cached_hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for BackgroundFill {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.insets == other.insets
            && self.radii == other.radii
            && self.fill == other.fill
    }
}

impl Hash for BackgroundFill {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// How a background image tiles along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BackgroundRepeat {
    #[default]
    Repeat,
    /// Repeat whole tiles only, spreading the leftover as gaps
    Space,
    /// Repeat whole tiles only, scaling them to fit
    Round,
    NoRepeat,
}

/// An image drawn behind the region content.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "BackgroundImageRepr", into = "BackgroundImageRepr")
)]
pub struct BackgroundImage {
    image: Arc<Image>,
    repeat_x: BackgroundRepeat,
    repeat_y: BackgroundRepeat,
    position: BackgroundPosition,
    size: BackgroundSize,
    hash: u64,
}

impl BackgroundImage {
    /// Missing arguments default to repeat on both axes, top-left, intrinsic size.
    pub fn new(
        image: Arc<Image>,
        repeat_x: Option<BackgroundRepeat>,
        repeat_y: Option<BackgroundRepeat>,
        position: Option<BackgroundPosition>,
        size: Option<BackgroundSize>,
    ) -> Self {
        let repeat_x = repeat_x.unwrap_or_default();
        let repeat_y = repeat_y.unwrap_or_default();
        let position = position.unwrap_or_default();
        let size = size.unwrap_or_default();
        let hash = image
            .hash_into(StructuralHash::new())
            .word(repeat_x as u64)
            .word(repeat_y as u64)
            .word(position.cached_hash())
            .word(size.cached_hash())
            .finish();
        Self {
            image,
            repeat_x,
            repeat_y,
            position,
            size,
            hash,
        }
    }

    pub fn image(&self) -> &Arc<Image> {
        &self.image
    }

    pub fn repeat_x(&self) -> BackgroundRepeat {
        self.repeat_x
    }

    pub fn repeat_y(&self) -> BackgroundRepeat {
        self.repeat_y
    }

    pub fn position(&self) -> &BackgroundPosition {
        &self.position
    }

    pub fn size(&self) -> &BackgroundSize {
        &self.size
    }

    pub fn cached_hash(&self) -> u64 {
        self.hash
    }

    /// Size of one tile when drawn into a `width` x `height` area.
    ///
    /// `None` when the image is not loaded; the layer is then skipped.
    pub fn tile_size(&self, width: f64, height: f64) -> Option<DVec2> {
        if !self.image.is_loaded() {
            return None;
        }
        let image_w = self.image.width;
        let image_h = self.image.height;
        let size = &self.size;

        if size.is_cover() {
            let scale = (width / image_w).max(height / image_h);
            return Some(DVec2::new(image_w * scale, image_h * scale));
        }
        if size.is_contain() {
            let scale = (width / image_w).min(height / image_h);
            return Some(DVec2::new(
                (scale * image_w).ceil(),
                (scale * image_h).ceil(),
            ));
        }

        let w = if size.is_width_as_percentage() && size.width() >= 0.0 {
            size.width() * width
        } else {
            size.width()
        };
        let h = if size.is_height_as_percentage() && size.height() >= 0.0 {
            size.height() * height
        } else {
            size.height()
        };

        let tile = if w >= 0.0 && h >= 0.0 {
            DVec2::new(w, h)
        } else if w >= 0.0 {
            DVec2::new(w, image_h * (w / image_w))
        } else if h >= 0.0 {
            DVec2::new(image_w * (h / image_h), h)
        } else {
            DVec2::new(image_w, image_h)
        };
        Some(tile)
    }

    /// Top-left corner of the anchor tile of size `tile` in a `width` x `height` area.
    ///
    /// Percentage positions line up the same fraction of tile and area, so 50%
    /// centers the tile. Positions from the right or bottom side are mirrored.
    pub fn tile_origin(&self, width: f64, height: f64, tile: DVec2) -> DVec2 {
        if self.size.is_cover() {
            return DVec2::ZERO;
        }
        let pos = &self.position;

        let x = match (pos.horizontal_side(), pos.is_horizontal_as_percentage()) {
            (Side::Right, true) => {
                let fraction = 1.0 - pos.horizontal_position();
                fraction * width - fraction * tile.x
            }
            (Side::Right, false) => width - tile.x - pos.horizontal_position(),
            (_, true) => pos.horizontal_position() * width - pos.horizontal_position() * tile.x,
            (_, false) => pos.horizontal_position(),
        };
        let y = match (pos.vertical_side(), pos.is_vertical_as_percentage()) {
            (Side::Bottom, true) => {
                let fraction = 1.0 - pos.vertical_position();
                fraction * height - fraction * tile.y
            }
            (Side::Bottom, false) => height - tile.y - pos.vertical_position(),
            (_, true) => pos.vertical_position() * height - pos.vertical_position() * tile.y,
            (_, false) => pos.vertical_position(),
        };
        DVec2::new(x, y)
    }

    /// Bounds of the anchor tile, or `None` when the image is not loaded.
    pub fn tile_bounds(&self, width: f64, height: f64) -> Option<Bounds> {
        let tile = self.tile_size(width, height)?;
        let origin = self.tile_origin(width, height, tile);
        Some(Bounds::from_vecs(origin, tile))
    }
}

impl PartialEq for BackgroundImage {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.repeat_x == other.repeat_x
            && self.repeat_y == other.repeat_y
            && self.position == other.position
            && self.size == other.size
            && (Arc::ptr_eq(&self.image, &other.image) || self.image == other.image)
    }
}

impl Hash for BackgroundImage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

/// Ordered fills painted first to last, then ordered images.
///
/// A background never adds to the region insets. Fills with negative insets
/// paint outside the region, which shows up in [`Background::outsets`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "BackgroundRepr", into = "BackgroundRepr"))]
pub struct Background {
    fills: Vec<BackgroundFill>,
    images: Vec<BackgroundImage>,
    outsets: Insets,
    fill_percentage_based: bool,
    hash: u64,
}

impl Background {
    /// No fills, no images.
    pub const EMPTY: Background = Background {
        fills: Vec::new(),
        images: Vec::new(),
        outsets: Insets::EMPTY,
        fill_percentage_based: false,
        hash: StructuralHash::new().word(0).word(0).finish(),
    };

    pub fn new(fills: Vec<BackgroundFill>, images: Vec<BackgroundImage>) -> Self {
        let outsets = fills.iter().fold(Insets::EMPTY, |outsets, fill| {
            outsets.max(&fill.insets.map(|inset| -inset))
        });
        let fill_percentage_based = fills.iter().any(|fill| fill.radii.has_percent_based_radii());

        let hash = fills
            .iter()
            .fold(StructuralHash::new().word(fills.len() as u64), |state, fill| {
                state.word(fill.hash)
            });
        let hash = images
            .iter()
            .fold(hash.word(images.len() as u64), |state, image| {
                state.word(image.hash)
            })
            .finish();

        Self {
            fills,
            images,
            outsets,
            fill_percentage_based,
            hash,
        }
    }

    /// A single fill covering the whole region.
    pub fn fill(paint: impl Into<Paint>) -> Self {
        Self::new(vec![BackgroundFill::paint(paint)], Vec::new())
    }

    pub fn fills(&self) -> &[BackgroundFill] {
        &self.fills
    }

    pub fn images(&self) -> &[BackgroundImage] {
        &self.images
    }

    pub fn is_empty(&self) -> bool {
        self.fills.is_empty() && self.images.is_empty()
    }

    /// How far fills extend outside the region, per side, never negative.
    pub fn outsets(&self) -> &Insets {
        &self.outsets
    }

    /// Whether any fill has percentage corner radii.
    pub fn is_fill_percentage_based(&self) -> bool {
        self.fill_percentage_based
    }

    /// Image layers that can actually be drawn.
    pub fn drawable_images(&self) -> impl Iterator<Item = &BackgroundImage> {
        self.images.iter().filter(|image| image.image.is_loaded())
    }

    pub fn cached_hash(&self) -> u64 {
        self.hash
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl PartialEq for Background {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.fills == other.fills && self.images == other.images
    }
}

impl Hash for Background {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct BackgroundFillRepr {
    fill: Option<Paint>,
    radii: Option<CornerRadii>,
    insets: Option<Insets>,
}

#[cfg(feature = "serde")]
impl From<BackgroundFillRepr> for BackgroundFill {
    fn from(repr: BackgroundFillRepr) -> Self {
        BackgroundFill::new(repr.fill, repr.radii, repr.insets)
    }
}

#[cfg(feature = "serde")]
impl From<BackgroundFill> for BackgroundFillRepr {
    fn from(fill: BackgroundFill) -> Self {
        Self {
            fill: Some(fill.fill),
            radii: Some(fill.radii),
            insets: Some(fill.insets),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct BackgroundImageRepr {
    image: Arc<Image>,
    repeat_x: Option<BackgroundRepeat>,
    repeat_y: Option<BackgroundRepeat>,
    position: Option<BackgroundPosition>,
    size: Option<BackgroundSize>,
}

#[cfg(feature = "serde")]
impl From<BackgroundImageRepr> for BackgroundImage {
    fn from(repr: BackgroundImageRepr) -> Self {
        BackgroundImage::new(
            repr.image,
            repr.repeat_x,
            repr.repeat_y,
            repr.position,
            repr.size,
        )
    }
}

#[cfg(feature = "serde")]
impl From<BackgroundImage> for BackgroundImageRepr {
    fn from(image: BackgroundImage) -> Self {
        Self {
            image: image.image,
            repeat_x: Some(image.repeat_x),
            repeat_y: Some(image.repeat_y),
            position: Some(image.position),
            size: Some(image.size),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct BackgroundRepr {
    #[serde(default)]
    fills: Vec<BackgroundFill>,
    #[serde(default)]
    images: Vec<BackgroundImage>,
}

#[cfg(feature = "serde")]
impl From<BackgroundRepr> for Background {
    fn from(repr: BackgroundRepr) -> Self {
        Background::new(repr.fills, repr.images)
    }
}

#[cfg(feature = "serde")]
impl From<Background> for BackgroundRepr {
    fn from(background: Background) -> Self {
        Self {
            fills: background.fills,
            images: background.images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    fn image_layer(size: BackgroundSize, position: BackgroundPosition) -> BackgroundImage {
        BackgroundImage::new(
            Image::loaded("tile.png", 40.0, 20.0),
            None,
            None,
            Some(position),
            Some(size),
        )
    }

    #[test]
    fn test_fill_defaults() {
        let fill = BackgroundFill::new(None, None, None);
        assert_eq!(fill.fill(), &Paint::TRANSPARENT);
        assert_eq!(fill.radii(), &CornerRadii::EMPTY);
        assert_eq!(fill.insets(), &Insets::EMPTY);
    }

    #[test]
    fn test_empty_background() {
        let background = Background::new(Vec::new(), Vec::new());
        assert_eq!(background, Background::EMPTY);
        assert!(background.is_empty());
        assert_eq!(background.outsets(), &Insets::EMPTY);
    }

    #[test]
    fn test_outsets_from_negative_fill_insets() {
        let background = Background::new(
            vec![
                BackgroundFill::paint(Color::WHITE),
                BackgroundFill::new(None, None, Some(Insets::new(-3.0, 2.0, -1.0, 0.0))),
                BackgroundFill::new(None, None, Some(Insets::new(-1.0, -4.0, 0.0, 0.0))),
            ],
            Vec::new(),
        );
        assert_eq!(background.outsets(), &Insets::new(3.0, 4.0, 1.0, 0.0));
    }

    #[test]
    fn test_drawable_images_skip_failed() {
        let background = Background::new(
            Vec::new(),
            vec![
                BackgroundImage::new(Image::failed("missing.png"), None, None, None, None),
                BackgroundImage::new(Image::loaded("ok.png", 8.0, 8.0), None, None, None, None),
            ],
        );
        let drawable: Vec<_> = background.drawable_images().collect();
        assert_eq!(drawable.len(), 1);
        assert_eq!(drawable[0].image().url, "ok.png");
    }

    #[test]
    fn test_tile_size_not_loaded() {
        let layer = BackgroundImage::new(Image::loading("slow.png"), None, None, None, None);
        assert!(layer.tile_size(100.0, 100.0).is_none());
        assert!(layer.tile_bounds(100.0, 100.0).is_none());
    }

    #[test]
    fn test_tile_size_auto() {
        let layer = image_layer(BackgroundSize::DEFAULT, BackgroundPosition::DEFAULT);
        assert_eq!(layer.tile_size(100.0, 100.0), Some(DVec2::new(40.0, 20.0)));
    }

    #[test]
    fn test_tile_size_contain_and_cover() {
        // Image is 40x20 in a 100x100 area
        let contain = image_layer(BackgroundSize::contain(), BackgroundPosition::DEFAULT);
        assert_eq!(contain.tile_size(100.0, 100.0), Some(DVec2::new(100.0, 50.0)));

        let cover = image_layer(BackgroundSize::cover(), BackgroundPosition::DEFAULT);
        assert_eq!(cover.tile_size(100.0, 100.0), Some(DVec2::new(200.0, 100.0)));
    }

    #[test]
    fn test_tile_size_one_side_auto() {
        let size = BackgroundSize::exact(80.0, BackgroundSize::AUTO).unwrap();
        let layer = image_layer(size, BackgroundPosition::DEFAULT);
        assert_eq!(layer.tile_size(100.0, 100.0), Some(DVec2::new(80.0, 40.0)));
    }

    #[test]
    fn test_tile_origin_center() {
        let layer = image_layer(BackgroundSize::DEFAULT, BackgroundPosition::CENTER);
        let bounds = layer.tile_bounds(100.0, 100.0).unwrap();
        assert!((bounds.x - 30.0).abs() < 0.001);
        assert!((bounds.y - 40.0).abs() < 0.001);
    }

    #[test]
    fn test_tile_origin_from_right() {
        let position =
            BackgroundPosition::new(Side::Right, 10.0, false, Side::Bottom, 5.0, false).unwrap();
        let layer = image_layer(BackgroundSize::DEFAULT, position);
        let bounds = layer.tile_bounds(100.0, 100.0).unwrap();
        assert!((bounds.x - 50.0).abs() < 0.001);
        assert!((bounds.y - 75.0).abs() < 0.001);
    }
}
