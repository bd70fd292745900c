//! 2D pan/zoom camera over the cell grid
//!
//! `scale` is screen pixels per grid cell. The grid centre sits at the screen
//! centre when `offset` is zero; `offset` is the grid-space point shifted to
//! the screen centre relative to the grid centre. Forward transform:
//!
//! ```text
//! grid = (window - 0.5 * display) / scale + offset + 0.5 * grid_dims
//! ```
//!
//! The camera does not validate `scale`; zero or negative zoom is the
//! caller's responsibility.

use cgmath::Vector2;

use crate::simulation::GridDims;

/// Zoom change per scroll line
pub const ZOOM_PER_SCROLL: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    /// Pan, in grid cells
    pub offset: Vector2<f32>,
    /// Screen pixels per grid cell
    pub scale: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl Camera2D {
    pub fn new(scale: f32) -> Self {
        Self {
            offset: Vector2::new(0.0, 0.0),
            scale,
        }
    }

    /// Maps a window position (pixels, origin top-left) to continuous grid
    /// coordinates for a display of `display` pixels.
    pub fn window_to_grid(
        &self,
        window: Vector2<f32>,
        display: Vector2<f32>,
        grid: GridDims,
    ) -> Vector2<f32> {
        (window - display * 0.5) / self.scale + self.offset + grid.as_vec2() * 0.5
    }

    /// Inverse of [`window_to_grid`](Self::window_to_grid)
    pub fn grid_to_window(
        &self,
        cell: Vector2<f32>,
        display: Vector2<f32>,
        grid: GridDims,
    ) -> Vector2<f32> {
        (cell - self.offset - grid.as_vec2() * 0.5) * self.scale + display * 0.5
    }

    /// Pans so content moves with a pointer drag of `delta` screen pixels.
    pub fn pan_pixels(&mut self, delta: Vector2<f32>) {
        self.offset -= delta / self.scale;
    }

    /// Applies `lines` of scroll to the zoom.
    pub fn zoom(&mut self, lines: f32) {
        self.scale += lines * ZOOM_PER_SCROLL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const GRID: GridDims = GridDims {
        width: 1024,
        height: 1024,
    };

    fn close(a: Vector2<f32>, b: Vector2<f32>) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn test_screen_centre_maps_to_grid_centre() {
        let camera = Camera2D::new(2.0);
        let display = Vector2::new(1920.0, 1280.0);
        let g = camera.window_to_grid(display * 0.5, display, GRID);
        assert!(close(g, Vector2::new(512.0, 512.0)));
    }

    #[test]
    fn test_offset_and_scale() {
        let camera = Camera2D {
            offset: Vector2::new(10.0, -4.0),
            scale: 4.0,
        };
        let display = Vector2::new(800.0, 600.0);
        let g = camera.window_to_grid(Vector2::new(0.0, 0.0), display, GRID);
        // (-400 / 4 + 10 + 512, -300 / 4 - 4 + 512)
        assert!(close(g, Vector2::new(422.0, 433.0)));
    }

    #[test]
    fn test_transform_tracks_display_size() {
        let camera = Camera2D::new(1.0);
        let a = camera.window_to_grid(
            Vector2::new(100.0, 100.0),
            Vector2::new(200.0, 200.0),
            GRID,
        );
        let b = camera.window_to_grid(
            Vector2::new(200.0, 200.0),
            Vector2::new(400.0, 400.0),
            GRID,
        );
        assert!(close(a, b));
    }

    #[test]
    fn test_transform_is_pure_and_invertible() {
        let mut rng = StdRng::seed_from_u64(42);
        let display = Vector2::new(1280.0, 720.0);

        for _ in 0..200 {
            let camera = Camera2D {
                offset: Vector2::new(
                    rng.random_range(-500.0..500.0),
                    rng.random_range(-500.0..500.0),
                ),
                scale: rng.random_range(0.25..16.0),
            };
            let p = Vector2::new(rng.random_range(0.0..1280.0), rng.random_range(0.0..720.0));

            let first = camera.window_to_grid(p, display, GRID);
            let second = camera.window_to_grid(p, display, GRID);
            assert_eq!(first, second);

            let back = camera.grid_to_window(first, display, GRID);
            assert!(close(back, p), "{p:?} -> {first:?} -> {back:?}");
        }
    }

    #[test]
    fn test_pan_moves_content_with_pointer() {
        let mut camera = Camera2D::new(2.0);
        let display = Vector2::new(640.0, 480.0);
        let anchor = Vector2::new(300.0, 200.0);
        let before = camera.window_to_grid(anchor, display, GRID);

        let drag = Vector2::new(40.0, -20.0);
        camera.pan_pixels(drag);

        let after = camera.window_to_grid(anchor + drag, display, GRID);
        assert!(close(before, after));
    }

    #[test]
    fn test_zoom_accepts_degenerate_scale() {
        let mut camera = Camera2D::new(0.1);
        camera.zoom(-3.0);
        assert!(camera.scale < 0.0);
    }
}
