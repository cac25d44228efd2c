// src/error.rs

use thiserror::Error;

/// Construction-time validation failures. Nothing inside a running simulation
/// returns one of these; runtime constraint violations are clamped instead.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{pool} population must contain at least one trader")]
    EmptyPopulation { pool: &'static str },

    #[error("{field}: range [{min}, {max}] is empty or inverted")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must be strictly positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must lie in [0, 1], got {value}")]
    InvalidProbability { field: &'static str, value: f64 },

    #[error("lookback of {lookback} ticks exceeds rolling window capacity {capacity}")]
    LookbackExceedsWindow { lookback: usize, capacity: usize },

    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> ConfigResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub(crate) fn ensure_range(field: &'static str, min: f64, max: f64) -> ConfigResult<()> {
    if min.is_finite() && max.is_finite() && min < max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { field, min, max })
    }
}

pub(crate) fn ensure_probability(field: &'static str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_check_rejects_zero_and_nan() {
        assert!(ensure_positive("x", 1.0).is_ok());
        assert!(matches!(
            ensure_positive("x", 0.0),
            Err(ConfigError::NonPositive { field: "x", .. })
        ));
        assert!(ensure_positive("x", f64::NAN).is_err());
    }

    #[test]
    fn range_check_requires_strict_ordering() {
        assert!(ensure_range("cash", 1.0, 2.0).is_ok());
        assert!(ensure_range("cash", 2.0, 2.0).is_err());
        assert!(ensure_range("cash", 3.0, 2.0).is_err());
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = ensure_range("noise.start_cash", 5.0, 1.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "noise.start_cash: range [5, 1] is empty or inverted"
        );
    }
}
