//! Border images: a nine-slice image drawn around the region edges.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use pane_core::hash::StructuralHash;
use pane_core::{BorderWidths, Insets, Side};

use crate::paint::Image;

/// How the edge slices of a border image fill their side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderRepeat {
    #[default]
    Stretch,
    Repeat,
    Round,
    Space,
}

/// A border layer drawn from slices of an image.
///
/// The image is cut into nine regions by `slices`; the corner and edge regions
/// are drawn `widths` wide around the region, inset by `insets`. When `filled`
/// is set the middle region is drawn too.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "BorderImageRepr", into = "BorderImageRepr")
)]
pub struct BorderImage {
    image: Arc<Image>,
    widths: BorderWidths,
    insets: Insets,
    slices: BorderWidths,
    filled: bool,
    repeat_x: BorderRepeat,
    repeat_y: BorderRepeat,
    inner_edge: Insets,
    outer_edge: Insets,
    hash: u64,
}

impl BorderImage {
    /// Missing arguments default to one unit wide, no insets, full-size slices
    /// and stretching on both axes.
    pub fn new(
        image: Arc<Image>,
        widths: Option<BorderWidths>,
        insets: Option<Insets>,
        slices: Option<BorderWidths>,
        filled: bool,
        repeat_x: Option<BorderRepeat>,
        repeat_y: Option<BorderRepeat>,
    ) -> Self {
        let widths = widths.unwrap_or_default();
        let insets = insets.unwrap_or_default();
        let slices = slices.unwrap_or(BorderWidths::FULL);
        let repeat_x = repeat_x.unwrap_or_default();
        let repeat_y = repeat_y.unwrap_or_default();

        let width = |side: Side| {
            if widths.is_auto(side) {
                slices.literal(side)
            } else {
                widths.literal(side)
            }
        };
        let inner_edge = Insets::new(
            insets.top() + width(Side::Top),
            insets.right() + width(Side::Right),
            insets.bottom() + width(Side::Bottom),
            insets.left() + width(Side::Left),
        );
        let outer_edge = insets.map(|inset| (-inset).max(0.0));

        let hash = image
            .hash_into(StructuralHash::new())
            .word(widths.cached_hash())
            .word(insets.cached_hash())
            .word(slices.cached_hash())
            .bool(filled)
            .word(repeat_x as u64)
            .word(repeat_y as u64)
            .finish();

        Self {
            image,
            widths,
            insets,
            slices,
            filled,
            repeat_x,
            repeat_y,
            inner_edge,
            outer_edge,
            hash,
        }
    }

    pub fn image(&self) -> &Arc<Image> {
        &self.image
    }

    pub fn widths(&self) -> &BorderWidths {
        &self.widths
    }

    pub fn insets(&self) -> &Insets {
        &self.insets
    }

    pub fn slices(&self) -> &BorderWidths {
        &self.slices
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub fn repeat_x(&self) -> BorderRepeat {
        self.repeat_x
    }

    pub fn repeat_y(&self) -> BorderRepeat {
        self.repeat_y
    }

    pub fn inner_edge(&self) -> &Insets {
        &self.inner_edge
    }

    pub fn outer_edge(&self) -> &Insets {
        &self.outer_edge
    }

    pub fn cached_hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for BorderImage {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.widths == other.widths
            && self.insets == other.insets
            && self.slices == other.slices
            && self.filled == other.filled
            && self.repeat_x == other.repeat_x
            && self.repeat_y == other.repeat_y
            && (Arc::ptr_eq(&self.image, &other.image) || self.image == other.image)
    }
}

impl Hash for BorderImage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct BorderImageRepr {
    image: Arc<Image>,
    widths: Option<BorderWidths>,
    insets: Option<Insets>,
    slices: Option<BorderWidths>,
    #[serde(default)]
    filled: bool,
    repeat_x: Option<BorderRepeat>,
    repeat_y: Option<BorderRepeat>,
}

#[cfg(feature = "serde")]
impl From<BorderImageRepr> for BorderImage {
    fn from(r: BorderImageRepr) -> Self {
        BorderImage::new(
            r.image, r.widths, r.insets, r.slices, r.filled, r.repeat_x, r.repeat_y,
        )
    }
}

#[cfg(feature = "serde")]
impl From<BorderImage> for BorderImageRepr {
    fn from(b: BorderImage) -> Self {
        Self {
            image: b.image,
            widths: Some(b.widths),
            insets: Some(b.insets),
            slices: Some(b.slices),
            filled: b.filled,
            repeat_x: Some(b.repeat_x),
            repeat_y: Some(b.repeat_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Arc<Image> {
        Image::loaded("frame.png", 30.0, 30.0)
    }

    #[test]
    fn test_edges_from_widths_and_insets() {
        let image = BorderImage::new(
            frame(),
            Some(BorderWidths::new(4.0, 3.0, 2.0, 1.0).unwrap()),
            Some(Insets::new(1.0, -2.0, 0.0, 0.0)),
            None,
            false,
            None,
            None,
        );
        assert_eq!(image.inner_edge(), &Insets::new(5.0, 1.0, 2.0, 1.0));
        assert_eq!(image.outer_edge(), &Insets::new(0.0, 2.0, 0.0, 0.0));
    }

    #[test]
    fn test_auto_width_uses_slice() {
        let image = BorderImage::new(
            frame(),
            Some(BorderWidths::uniform(BorderWidths::AUTO).unwrap()),
            None,
            Some(BorderWidths::new(10.0, 10.0, 6.0, 6.0).unwrap()),
            true,
            None,
            None,
        );
        assert_eq!(image.inner_edge(), &Insets::new(10.0, 10.0, 6.0, 6.0));
    }

    #[test]
    fn test_auto_width_with_percent_slice_is_zero() {
        let image = BorderImage::new(
            frame(),
            Some(BorderWidths::uniform(BorderWidths::AUTO).unwrap()),
            None,
            None,
            false,
            None,
            None,
        );
        assert_eq!(image.inner_edge(), &Insets::EMPTY);
    }

    #[test]
    fn test_defaults() {
        let image = BorderImage::new(frame(), None, None, None, false, None, None);
        assert_eq!(image.widths(), &BorderWidths::DEFAULT);
        assert_eq!(image.slices(), &BorderWidths::FULL);
        assert_eq!(image.repeat_x(), BorderRepeat::Stretch);
        assert_eq!(image.inner_edge(), &Insets::uniform(1.0));
    }
}
