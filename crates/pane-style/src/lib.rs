//! Border and background model for the pane layout engine.
//!
//! Everything here is immutable once built and safe to share between regions:
//! - Paints, colors and external image references
//! - Background fills and images, with tile geometry for images
//! - Border strokes and border images, aggregated into a [`Border`] whose
//!   insets and outsets feed the layout of the owning region
//! - Interpolation between styles for animated transitions

pub mod background;
pub mod border;
pub mod border_image;
pub mod interpolate;
pub mod paint;
pub mod stroke;

pub use background::*;
pub use border::*;
pub use border_image::*;
pub use interpolate::Interpolatable;
pub use paint::*;
pub use stroke::*;
