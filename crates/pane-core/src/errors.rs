//! Error types for the pane engine.

use crate::geometry::Side;
use thiserror::Error;

/// Construction-time rejection of a value type.
///
/// These are programmer errors: a value is either built valid or not built at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("{field} cannot be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} cannot be anchored to the {side:?} side")]
    InvalidSide { field: &'static str, side: Side },
}

impl ValueError {
    /// Reject negative values of `field`.
    pub fn check_non_negative(field: &'static str, value: f64) -> Result<f64, ValueError> {
        if value < 0.0 {
            Err(ValueError::Negative { field, value })
        } else {
            Ok(value)
        }
    }

    /// Reject NaN and infinite values of `field`.
    pub fn check_finite(field: &'static str, value: f64) -> Result<f64, ValueError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ValueError::NotFinite { field, value })
        }
    }
}

/// Result alias for value construction.
pub type ValueResult<T> = Result<T, ValueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_message() {
        let err = ValueError::check_non_negative("radius", -2.0).unwrap_err();
        assert_eq!(err.to_string(), "radius cannot be negative, got -2");
    }

    #[test]
    fn test_zero_is_not_negative() {
        assert_eq!(ValueError::check_non_negative("width", 0.0), Ok(0.0));
    }

    #[test]
    fn test_invalid_side_message() {
        let err = ValueError::InvalidSide {
            field: "horizontal side",
            side: Side::Top,
        };
        assert_eq!(
            err.to_string(),
            "horizontal side cannot be anchored to the Top side"
        );
    }
}
