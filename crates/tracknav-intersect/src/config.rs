//! Settings of the iterative (helix) intersectors.

use serde::{Deserialize, Serialize};

use crate::error::{IntersectError, Result};

/// Newton-Raphson settings for helix intersections.
///
/// `tolerance` is a path length in the detector's length unit (mm), so it
/// has to be rescaled together with the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonConfig {
    /// Convergence threshold on successive path estimates.
    pub tolerance: f64,
    /// Hard cap on iterations per root.
    pub max_iterations: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 1000,
        }
    }
}

impl NewtonConfig {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance > 0.0) {
            return Err(IntersectError::InvalidConfig(format!(
                "newton tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(IntersectError::InvalidConfig(
                "newton iteration cap must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = NewtonConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_iterations, 1000);
    }

    #[test]
    fn test_rejects_bad_settings() {
        let zero_iter = NewtonConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(zero_iter.validate().is_err());
        let bad_tol = NewtonConfig {
            tolerance: f64::NAN,
            ..Default::default()
        };
        assert!(bad_tol.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let cfg: NewtonConfig = toml::from_str("tolerance = 1e-6").unwrap();
        assert_eq!(cfg.tolerance, 1e-6);
        assert_eq!(cfg.max_iterations, 1000);
    }
}
