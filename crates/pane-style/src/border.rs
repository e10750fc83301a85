//! Borders: ordered stroke and image layers aggregated into insets and outsets.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use pane_core::hash::StructuralHash;
use pane_core::Insets;
use tracing::trace;

use crate::border_image::BorderImage;
use crate::interpolate::Interpolatable;
use crate::paint::ImageState;
use crate::stroke::BorderStroke;

/// The border of a region.
///
/// `insets` is how far in from the region edge the innermost layer edge lies
/// and `outsets` how far out drawing may reach. Both are the per-side maximum
/// over all layers, never negative, computed once at construction.
///
/// Strokes and images both count for geometry, except images that failed to
/// load. For drawing, strokes are replaced by the images as soon as one image
/// has loaded.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "BorderRepr", into = "BorderRepr"))]
pub struct Border {
    strokes: Vec<BorderStroke>,
    images: Vec<BorderImage>,
    insets: Insets,
    outsets: Insets,
    hash: u64,
}

impl Border {
    /// No layers, zero insets and outsets.
    pub const EMPTY: Border = Border {
        strokes: Vec::new(),
        images: Vec::new(),
        insets: Insets::EMPTY,
        outsets: Insets::EMPTY,
        hash: StructuralHash::new().word(0).word(0).finish(),
    };

    /// Border from stroke and image layers, innermost layer first.
    pub fn new(strokes: Vec<BorderStroke>, images: Vec<BorderImage>) -> Self {
        let mut insets = Insets::EMPTY;
        let mut outsets = Insets::EMPTY;
        for stroke in &strokes {
            insets = insets.max(stroke.inner_edge());
            outsets = outsets.max(stroke.outer_edge());
        }
        for image in images.iter().filter(|i| i.image().state != ImageState::Failed) {
            insets = insets.max(image.inner_edge());
            outsets = outsets.max(image.outer_edge());
        }

        let hash = strokes
            .iter()
            .fold(StructuralHash::new().word(strokes.len() as u64), |state, s| {
                state.word(s.cached_hash())
            });
        let hash = images
            .iter()
            .fold(hash.word(images.len() as u64), |state, i| {
                state.word(i.cached_hash())
            })
            .finish();

        Self {
            strokes,
            images,
            insets,
            outsets,
            hash,
        }
    }

    /// Border made of stroke layers only.
    pub fn from_strokes(strokes: Vec<BorderStroke>) -> Self {
        Self::new(strokes, Vec::new())
    }

    /// Stroke layers in drawing order.
    pub fn strokes(&self) -> &[BorderStroke] {
        &self.strokes
    }

    /// Image layers in drawing order.
    pub fn images(&self) -> &[BorderImage] {
        &self.images
    }

    /// True when there are no layers.
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.images.is_empty()
    }

    /// Space the border takes inside the region, per side.
    pub fn insets(&self) -> &Insets {
        &self.insets
    }

    /// How far the border may draw outside the region, per side.
    pub fn outsets(&self) -> &Insets {
        &self.outsets
    }

    /// Strokes to draw: none once any border image has loaded.
    pub fn drawable_strokes(&self) -> &[BorderStroke] {
        if self.images.iter().any(|image| image.image().is_loaded()) {
            &[]
        } else {
            &self.strokes
        }
    }

    /// Image layers that can actually be drawn.
    pub fn drawable_images(&self) -> impl Iterator<Item = &BorderImage> {
        self.images.iter().filter(|image| image.image().is_loaded())
    }

    pub fn cached_hash(&self) -> u64 {
        self.hash
    }

    /// Border at fraction `t` of the way from `start` to `end`.
    ///
    /// Layers are interpolated pairwise; the result has as many layers as `end`,
    /// with extra `end` layers taken as they are. When the result equals an
    /// endpoint that endpoint is returned instead of a new allocation.
    pub fn interpolate(start: &Arc<Border>, end: &Arc<Border>, t: f64) -> Arc<Border> {
        if t <= 0.0 {
            return Arc::clone(start);
        }
        if t >= 1.0 {
            return Arc::clone(end);
        }

        let strokes = interpolate_layers(&start.strokes, &end.strokes, t);
        let images = interpolate_layers(&start.images, &end.images, t);

        if strokes == start.strokes && images == start.images {
            trace!(t, "border interpolation collapsed to start");
            return Arc::clone(start);
        }
        if strokes == end.strokes && images == end.images {
            trace!(t, "border interpolation collapsed to end");
            return Arc::clone(end);
        }
        Arc::new(Border::new(strokes, images))
    }
}

fn interpolate_layers<T: Interpolatable + Clone>(start: &[T], end: &[T], t: f64) -> Vec<T> {
    end.iter()
        .enumerate()
        .map(|(i, to)| match start.get(i) {
            Some(from) => from.interpolate(to, t),
            None => to.clone(),
        })
        .collect()
}

impl Default for Border {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl PartialEq for Border {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.strokes == other.strokes && self.images == other.images
    }
}

impl Hash for Border {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct BorderRepr {
    #[serde(default)]
    strokes: Vec<BorderStroke>,
    #[serde(default)]
    images: Vec<BorderImage>,
}

#[cfg(feature = "serde")]
impl From<BorderRepr> for Border {
    fn from(repr: BorderRepr) -> Self {
        Border::new(repr.strokes, repr.images)
    }
}

#[cfg(feature = "serde")]
impl From<Border> for BorderRepr {
    fn from(border: Border) -> Self {
        Self {
            strokes: border.strokes,
            images: border.images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{Color, Image};
    use crate::stroke::{BorderStrokeStyle, StrokeType};
    use pane_core::BorderWidths;

    fn stroke(stroke_type: StrokeType, widths: BorderWidths) -> BorderStroke {
        BorderStroke::new(
            Some(Color::BLACK.into()),
            Some(BorderStrokeStyle::solid().with_stroke_type(stroke_type)),
            None,
            Some(widths),
            None,
        )
    }

    #[test]
    fn test_empty_border() {
        let border = Border::new(Vec::new(), Vec::new());
        assert_eq!(border, Border::EMPTY);
        assert_eq!(border.insets(), &Insets::EMPTY);
        assert_eq!(border.outsets(), &Insets::EMPTY);
    }

    #[test]
    fn test_stroke_and_image_aggregation() {
        // Centered 2 wide gives an inner edge of 1 on top, the image gives 4
        let border = Border::new(
            vec![stroke(
                StrokeType::Centered,
                BorderWidths::new(2.0, 2.0, 2.0, 2.0).unwrap(),
            )],
            vec![BorderImage::new(
                Image::loaded("frame.png", 12.0, 12.0),
                Some(BorderWidths::new(4.0, 1.0, 1.0, 1.0).unwrap()),
                Some(Insets::EMPTY),
                None,
                false,
                None,
                None,
            )],
        );
        assert!((border.insets().top() - 4.0).abs() < 0.001);
        assert!((border.insets().right() - 1.0).abs() < 0.001);
        assert_eq!(border.outsets(), &Insets::uniform(1.0));
    }

    #[test]
    fn test_loaded_image_hides_strokes() {
        let strokes = vec![stroke(StrokeType::Inside, BorderWidths::DEFAULT)];
        let loaded = BorderImage::new(
            Image::loaded("frame.png", 9.0, 9.0),
            None,
            None,
            None,
            false,
            None,
            None,
        );
        let failed = BorderImage::new(
            Image::failed("broken.png"),
            None,
            None,
            None,
            false,
            None,
            None,
        );

        let with_loaded = Border::new(strokes.clone(), vec![loaded]);
        assert!(with_loaded.drawable_strokes().is_empty());
        assert_eq!(with_loaded.insets(), &Insets::uniform(1.0));

        let with_failed = Border::new(strokes, vec![failed]);
        assert_eq!(with_failed.drawable_strokes().len(), 1);
        assert_eq!(with_failed.drawable_images().count(), 0);
    }

    #[test]
    fn test_interpolate_endpoints() {
        let start = Arc::new(Border::from_strokes(vec![stroke(
            StrokeType::Inside,
            BorderWidths::uniform(2.0).unwrap(),
        )]));
        let end = Arc::new(Border::from_strokes(vec![stroke(
            StrokeType::Inside,
            BorderWidths::uniform(6.0).unwrap(),
        )]));

        assert!(Arc::ptr_eq(&Border::interpolate(&start, &end, 0.0), &start));
        assert!(Arc::ptr_eq(&Border::interpolate(&start, &end, -1.0), &start));
        assert!(Arc::ptr_eq(&Border::interpolate(&start, &end, 1.0), &end));

        let middle = Border::interpolate(&start, &end, 0.5);
        assert!((middle.insets().top() - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_interpolate_same_reuses_start() {
        let start = Arc::new(Border::from_strokes(vec![stroke(
            StrokeType::Inside,
            BorderWidths::uniform(2.0).unwrap(),
        )]));
        let end = Arc::new(Border::clone(&start));
        assert!(Arc::ptr_eq(&Border::interpolate(&start, &end, 0.3), &start));
    }

    #[test]
    fn test_interpolate_uses_end_length() {
        let start = Arc::new(Border::from_strokes(vec![stroke(
            StrokeType::Inside,
            BorderWidths::uniform(2.0).unwrap(),
        )]));
        let end = Arc::new(Border::from_strokes(vec![
            stroke(StrokeType::Inside, BorderWidths::uniform(4.0).unwrap()),
            stroke(StrokeType::Outside, BorderWidths::uniform(8.0).unwrap()),
        ]));

        let middle = Border::interpolate(&start, &end, 0.5);
        assert_eq!(middle.strokes().len(), 2);
        assert_eq!(middle.strokes()[1], end.strokes()[1]);
        assert!((middle.insets().top() - 3.0).abs() < 0.001);
        assert!((middle.outsets().top() - 8.0).abs() < 0.001);
    }
}
