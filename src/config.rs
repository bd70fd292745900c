//! Viewer configuration
//!
//! [`ViewerConfig`] gathers every knob the viewer reads at startup. Values come
//! from [`Default`], builder-style setters and a small set of environment
//! overrides applied by [`ViewerConfig::apply_env`].

use std::time::Duration;

use crate::error::ConfigError;
use crate::simulation::GridDims;

/// Environment variable toggling vsync (`1`/`true`/`on` or `0`/`false`/`off`)
pub const ENV_VSYNC: &str = "LIFEVIEW_VSYNC";
/// Environment variable overriding the grid size, formatted `WIDTHxHEIGHT`
pub const ENV_GRID: &str = "LIFEVIEW_GRID";
/// Environment variable overriding the simulation step rate in hertz
pub const ENV_STEP_HZ: &str = "LIFEVIEW_STEP_HZ";
/// Environment variable toggling device validation layers
pub const ENV_DEBUG_LAYERS: &str = "LIFEVIEW_DEBUG_LAYERS";

/// Startup configuration for the viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub grid_width: u32,
    pub grid_height: u32,
    /// Wall-clock time between simulation steps
    pub step_interval: Duration,
    /// Seeds are drawn uniformly from `0..seed_max`
    pub seed_max: i32,
    /// Screen pixels per grid cell at startup
    pub initial_scale: f32,
    /// Number of swapchain image slots (frames in flight)
    pub swapchain_images: u32,
    pub vsync: bool,
    pub debug_layers: bool,
    /// Start with the simulation running
    pub start_playing: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Game Of Life".to_string(),
            window_width: 1920,
            window_height: 1280,
            grid_width: 1024,
            grid_height: 1024,
            step_interval: Duration::from_nanos(1_000_000_000 / 60),
            seed_max: 100,
            initial_scale: 2.0,
            swapchain_images: 3,
            vsync: false,
            debug_layers: cfg!(debug_assertions),
            start_playing: true,
        }
    }
}

impl ViewerConfig {
    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    pub fn with_window(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the simulation rate in steps per second
    pub fn with_step_rate(mut self, hz: f64) -> Result<Self, ConfigError> {
        self.step_interval = step_interval_from_hz(hz)?;
        Ok(self)
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_seed_max(mut self, seed_max: i32) -> Self {
        self.seed_max = seed_max;
        self
    }

    pub fn grid(&self) -> GridDims {
        GridDims::new(self.grid_width, self.grid_height)
    }

    /// Number of cells in the grid
    pub fn cell_count(&self) -> usize {
        self.grid_width as usize * self.grid_height as usize
    }

    /// Checks the invariants the rest of the viewer relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        // Brush centres are i32 cell coordinates; the kernels index cells in u32.
        let bytes = self.cell_count() as u64 * std::mem::size_of::<i32>() as u64;
        if self.cell_count() > i32::MAX as usize || bytes > u32::MAX as u64 {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.swapchain_images == 0 {
            return Err(ConfigError::NoSwapchainImages);
        }
        if self.seed_max <= 0 {
            return Err(ConfigError::InvalidSeedRange(self.seed_max));
        }
        Ok(())
    }

    /// Applies overrides from the process environment
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup. Unparseable values are
    /// logged and ignored.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_VSYNC) {
            match parse_flag(&raw) {
                Some(vsync) => self.vsync = vsync,
                None => log::warn!("ignoring {ENV_VSYNC}={raw:?}: expected a boolean"),
            }
        }

        if let Some(raw) = lookup(ENV_DEBUG_LAYERS) {
            match parse_flag(&raw) {
                Some(debug) => self.debug_layers = debug,
                None => log::warn!("ignoring {ENV_DEBUG_LAYERS}={raw:?}: expected a boolean"),
            }
        }

        if let Some(raw) = lookup(ENV_GRID) {
            match parse_grid(&raw) {
                Some((w, h)) => {
                    self.grid_width = w;
                    self.grid_height = h;
                }
                None => log::warn!("ignoring {ENV_GRID}={raw:?}: expected WIDTHxHEIGHT"),
            }
        }

        if let Some(raw) = lookup(ENV_STEP_HZ) {
            match raw.trim().parse::<f64>().map(step_interval_from_hz) {
                Ok(Ok(interval)) => self.step_interval = interval,
                _ => log::warn!("ignoring {ENV_STEP_HZ}={raw:?}: expected a positive rate"),
            }
        }

        self
    }
}

fn step_interval_from_hz(hz: f64) -> Result<Duration, ConfigError> {
    if !hz.is_finite() || hz <= 0.0 {
        return Err(ConfigError::InvalidStepRate(hz));
    }
    Ok(Duration::from_secs_f64(1.0 / hz))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn parse_grid(raw: &str) -> Option<(u32, u32)> {
    let (w, h) = raw.trim().split_once(['x', 'X'])?;
    let w = w.trim().parse().ok()?;
    let h = h.trim().parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.cell_count(), 1024 * 1024);
        assert!(!config.vsync);
    }

    #[test]
    fn test_env_overrides() {
        let config = ViewerConfig::default().apply_overrides(lookup(&[
            (ENV_VSYNC, "on"),
            (ENV_GRID, "64x32"),
            (ENV_STEP_HZ, "10"),
        ]));

        assert!(config.vsync);
        assert_eq!((config.grid_width, config.grid_height), (64, 32));
        assert_eq!(config.step_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let config = ViewerConfig::default().apply_overrides(lookup(&[
            (ENV_VSYNC, "maybe"),
            (ENV_GRID, "0x10"),
            (ENV_STEP_HZ, "-5"),
        ]));

        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_validate_rejects_empty_grid() {
        let config = ViewerConfig::default().with_grid(0, 16);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGrid {
                width: 0,
                height: 16
            })
        );
    }

    #[test]
    fn test_step_rate_must_be_positive() {
        assert!(ViewerConfig::default().with_step_rate(0.0).is_err());
        assert!(ViewerConfig::default().with_step_rate(f64::NAN).is_err());
        let config = ViewerConfig::default().with_step_rate(4.0).unwrap();
        assert_eq!(config.step_interval, Duration::from_millis(250));
    }
}
