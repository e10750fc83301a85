//! Core value types for the pane layout engine.
//!
//! This crate provides the immutable geometry shared by the style model and the
//! layout algorithms:
//! - Insets, bounds and alignment enums
//! - Corner radii and border widths with percentage flags
//! - Background position and size
//! - Structural hashing used by every value type
//! - Error types

pub mod errors;
pub mod geometry;
pub mod hash;
pub mod position;
pub mod radii;
pub mod widths;

pub use errors::*;
pub use geometry::*;
pub use position::*;
pub use radii::*;
pub use widths::*;
