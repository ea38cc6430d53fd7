//! Navigation settings.

use serde::{Deserialize, Serialize};
use tracknav_grid::SearchWindow;
use tracknav_intersect::NewtonConfig;

use crate::error::{NavigationError, Result};

/// Tolerances and limits of the navigator.
///
/// Lengths are in the detector's unit (mm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Distance below which the track counts as on a surface.
    pub on_surface_tolerance: f64,
    /// Tolerance of the mask inside tests.
    pub mask_tolerance: f64,
    /// Candidates farther away than this are ignored.
    pub path_limit: f64,
    /// Neighborhood, in bins below and above, of surface grid lookups.
    pub search_window: [usize; 2],
    /// Settings of the helix intersectors.
    pub newton: NewtonConfig,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            on_surface_tolerance: 1e-3,
            mask_tolerance: 15e-3,
            path_limit: f64::INFINITY,
            search_window: [0, 0],
            newton: NewtonConfig::default(),
        }
    }
}

impl NavigationConfig {
    /// Parse settings from TOML; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.on_surface_tolerance > 0.0) {
            return Err(NavigationError::InvalidConfig(
                "on_surface_tolerance must be positive".into(),
            ));
        }
        if !(self.mask_tolerance >= 0.0) {
            return Err(NavigationError::InvalidConfig(
                "mask_tolerance must not be negative".into(),
            ));
        }
        if !(self.path_limit > 0.0) {
            return Err(NavigationError::InvalidConfig(
                "path_limit must be positive".into(),
            ));
        }
        self.newton.validate()?;
        Ok(())
    }

    /// Surface grid neighborhood as a search window.
    pub fn window(&self) -> SearchWindow {
        SearchWindow::Bins(self.search_window)
    }
}
