//! Interpolation between style values for animated transitions.
//!
//! Continuous values are blended linearly. Values that cannot be blended, such
//! as enums or radii with different percentage flags, switch from the start to
//! the end value halfway through.

use pane_core::{BorderWidths, Corner, CornerRadii, Insets, Side};

use crate::border_image::BorderImage;
use crate::paint::{Color, LinearGradient, Paint, RadialGradient, Stop};
use crate::stroke::{BorderStroke, BorderStrokeStyle, DashArray};

/// A value that can be blended with another value of the same type.
pub trait Interpolatable: Sized {
    /// Value at fraction `t` of the way from `self` to `end`.
    fn interpolate(&self, end: &Self, t: f64) -> Self;
}

/// Start value before the midpoint, end value from it on.
pub fn discrete<T: Clone>(start: &T, end: &T, t: f64) -> T {
    if t < 0.5 {
        start.clone()
    } else {
        end.clone()
    }
}

impl Interpolatable for f64 {
    fn interpolate(&self, end: &Self, t: f64) -> Self {
        self + (end - self) * t
    }
}

impl Interpolatable for f32 {
    fn interpolate(&self, end: &Self, t: f64) -> Self {
        (*self as f64).interpolate(&(*end as f64), t) as f32
    }
}

impl Interpolatable for Insets {
    fn interpolate(&self, end: &Self, t: f64) -> Self {
        Insets::new(
            self.top().interpolate(&end.top(), t),
            self.right().interpolate(&end.right(), t),
            self.bottom().interpolate(&end.bottom(), t),
            self.left().interpolate(&end.left(), t),
        )
    }
}

impl Interpolatable for CornerRadii {
    fn interpolate(&self, end: &Self, t: f64) -> Self {
        let flags = |c: Corner| (c.horizontal_as_percentage, c.vertical_as_percentage);
        let from = self.corners();
        let to = end.corners();
        if from.iter().zip(to.iter()).any(|(a, b)| flags(*a) != flags(*b)) {
            return discrete(self, end, t);
        }

        let blend = |a: Corner, b: Corner| Corner {
            horizontal: a.horizontal.interpolate(&b.horizontal, t).max(0.0),
            vertical: a.vertical.interpolate(&b.vertical, t).max(0.0),
            ..a
        };
        CornerRadii::from_corners(
            blend(from[0], to[0]),
            blend(from[1], to[1]),
            blend(from[2], to[2]),
            blend(from[3], to[3]),
        )
        .unwrap_or_else(|_| discrete(self, end, t))
    }
}

impl Interpolatable for BorderWidths {
    fn interpolate(&self, end: &Self, t: f64) -> Self {
        let mut widths = [0.0; 4];
        let mut as_percentage = [false; 4];
        for (i, side) in Side::ALL.into_iter().enumerate() {
            let blendable = self.is_percentage(side) == end.is_percentage(side)
                && !self.is_auto(side)
                && !end.is_auto(side);
            if !blendable {
                return discrete(self, end, t);
            }
            widths[i] = self.side(side).interpolate(&end.side(side), t).max(0.0);
            as_percentage[i] = self.is_percentage(side);
        }
        BorderWidths::from_parts(widths, as_percentage).unwrap_or_else(|_| discrete(self, end, t))
    }
}

impl Interpolatable for Color {
    fn interpolate(&self, end: &Self, t: f64) -> Self {
        let channel = |a: f32, b: f32| a.interpolate(&b, t).clamp(0.0, 1.0);
        Color::rgba(
            channel(self.r, end.r),
            channel(self.g, end.g),
            channel(self.b, end.b),
            channel(self.a, end.a),
        )
    }
}

fn interpolate_stops(start: &[Stop], end: &[Stop], t: f64) -> Vec<Stop> {
    start
        .iter()
        .zip(end.iter())
        .map(|(a, b)| Stop::new(a.offset.interpolate(&b.offset, t), a.color.interpolate(&b.color, t)))
        .collect()
}

impl Interpolatable for Paint {
    fn interpolate(&self, end: &Self, t: f64) -> Self {
        match (self, end) {
            (Paint::Color(a), Paint::Color(b)) => Paint::Color(a.interpolate(b, t)),
            (Paint::LinearGradient(a), Paint::LinearGradient(b))
                if a.stops.len() == b.stops.len() =>
            {
                Paint::LinearGradient(LinearGradient {
                    angle: a.angle.interpolate(&b.angle, t),
                    stops: interpolate_stops(&a.stops, &b.stops, t),
                })
            }
            (Paint::RadialGradient(a), Paint::RadialGradient(b))
                if a.stops.len() == b.stops.len() =>
            {
                Paint::RadialGradient(RadialGradient {
                    center_x: a.center_x.interpolate(&b.center_x, t),
                    center_y: a.center_y.interpolate(&b.center_y, t),
                    radius: a.radius.interpolate(&b.radius, t),
                    stops: interpolate_stops(&a.stops, &b.stops, t),
                })
            }
            _ => discrete(self, end, t),
        }
    }
}

impl Interpolatable for BorderStrokeStyle {
    fn interpolate(&self, end: &Self, t: f64) -> Self {
        if self == end {
            return self.clone();
        }
        let template = discrete(self, end, t);
        let dash_array: DashArray = if self.dash_array().len() == end.dash_array().len() {
            self.dash_array()
                .iter()
                .zip(end.dash_array())
                .map(|(a, b)| a.interpolate(b, t).max(0.0))
                .collect()
        } else {
            template.dash_array().iter().copied().collect()
        };
        BorderStrokeStyle::rebuilt(
            &template,
            self.miter_limit().interpolate(&end.miter_limit(), t),
            self.dash_offset().interpolate(&end.dash_offset(), t),
            dash_array,
        )
    }
}

impl Interpolatable for BorderStroke {
    fn interpolate(&self, end: &Self, t: f64) -> Self {
        if self == end {
            return self.clone();
        }
        let paints = std::array::from_fn(|i| self.paints()[i].interpolate(&end.paints()[i], t));
        let styles = std::array::from_fn(|i| self.styles()[i].interpolate(&end.styles()[i], t));
        BorderStroke::from_parts(
            paints,
            styles,
            self.radii().interpolate(end.radii(), t),
            self.widths().interpolate(end.widths(), t),
            self.insets().interpolate(end.insets(), t),
        )
    }
}

impl Interpolatable for BorderImage {
    fn interpolate(&self, end: &Self, t: f64) -> Self {
        if self == end {
            return self.clone();
        }
        let template = discrete(self, end, t);
        BorderImage::new(
            template.image().clone(),
            Some(self.widths().interpolate(end.widths(), t)),
            Some(self.insets().interpolate(end.insets(), t)),
            Some(self.slices().interpolate(end.slices(), t)),
            template.is_filled(),
            Some(template.repeat_x()),
            Some(template.repeat_y()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Image;
    use crate::stroke::StrokeType;

    #[test]
    fn test_f64_lerp() {
        assert!((2.0_f64.interpolate(&6.0, 0.25) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_insets_lerp() {
        let mid = Insets::uniform(0.0).interpolate(&Insets::new(2.0, 4.0, 6.0, 8.0), 0.5);
        assert_eq!(mid, Insets::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_radii_flags_mismatch_is_discrete() {
        let literal = CornerRadii::uniform(4.0).unwrap();
        let percent = CornerRadii::uniform_percent(0.5).unwrap();
        assert_eq!(literal.interpolate(&percent, 0.4), literal);
        assert_eq!(literal.interpolate(&percent, 0.6), percent);
    }

    #[test]
    fn test_radii_lerp() {
        let a = CornerRadii::uniform(4.0).unwrap();
        let b = CornerRadii::uniform(8.0).unwrap();
        assert_eq!(a.interpolate(&b, 0.5), CornerRadii::uniform(6.0).unwrap());
    }

    #[test]
    fn test_widths_auto_is_discrete() {
        let auto = BorderWidths::uniform(BorderWidths::AUTO).unwrap();
        let two = BorderWidths::uniform(2.0).unwrap();
        assert_eq!(auto.interpolate(&two, 0.2), auto);
        assert_eq!(auto.interpolate(&two, 0.7), two);
    }

    #[test]
    fn test_color_lerp() {
        let mid = Color::BLACK.interpolate(&Color::WHITE, 0.5);
        assert!((mid.r - 0.5).abs() < 0.001);
        assert!((mid.a - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_paint_kind_change_is_discrete() {
        let color = Paint::Color(Color::WHITE);
        let gradient = Paint::LinearGradient(LinearGradient::horizontal(vec![Stop::new(
            0.0,
            Color::BLACK,
        )]));
        assert_eq!(color.interpolate(&gradient, 0.49), color);
        assert_eq!(color.interpolate(&gradient, 0.5), gradient);
    }

    #[test]
    fn test_style_enums_switch_at_half() {
        let inside = BorderStrokeStyle::solid().with_stroke_type(StrokeType::Inside);
        let outside = BorderStrokeStyle::solid().with_stroke_type(StrokeType::Outside);
        assert_eq!(inside.interpolate(&outside, 0.3).stroke_type(), StrokeType::Inside);
        assert_eq!(inside.interpolate(&outside, 0.8).stroke_type(), StrokeType::Outside);
    }

    #[test]
    fn test_border_image_widths_blend() {
        let image = Image::loaded("frame.png", 9.0, 9.0);
        let thin = BorderImage::new(
            image.clone(),
            Some(BorderWidths::uniform(2.0).unwrap()),
            None,
            None,
            false,
            None,
            None,
        );
        let thick = BorderImage::new(
            image,
            Some(BorderWidths::uniform(6.0).unwrap()),
            None,
            None,
            false,
            None,
            None,
        );
        let mid = thin.interpolate(&thick, 0.5);
        assert_eq!(mid.inner_edge(), &Insets::uniform(4.0));
    }
}
