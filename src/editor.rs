//! Live editing of the cell grid
//!
//! While the paint button is held, every frame maps the pointer into grid
//! space through the camera and sets a 3x3 brush of cells to [`ALIVE`] in the
//! current buffer. Brush offsets are applied to the flat cell index, so a
//! brush touching the left or right edge continues on the neighbouring row;
//! only indices outside the grid are dropped.

use cgmath::Vector2;

use crate::gfx::camera::Camera2D;
use crate::gfx::resources::Extent;
use crate::simulation::{GridDims, SimulationState, ALIVE};

/// Half-width of the square brush
const BRUSH_RADIUS: i64 = 1;

/// Distinct linear indices covered by the brush centred on `center`, sorted
/// ascending. Indices outside `0..cell_count` are skipped. On grids narrower
/// than the brush, offsets from different rows can land on the same cell.
pub fn brush_indices(center: (i32, i32), width: u32, cell_count: usize) -> Vec<usize> {
    let (cx, cy) = (center.0 as i64, center.1 as i64);
    let width = width as i64;
    let mut indices = Vec::with_capacity(9);

    for dy in -BRUSH_RADIUS..=BRUSH_RADIUS {
        for dx in -BRUSH_RADIUS..=BRUSH_RADIUS {
            let idx = width * (cy + dy) + cx + dx;
            if (0..cell_count as i64).contains(&idx) {
                indices.push(idx as usize);
            }
        }
    }
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Applies the brush to a host copy of the grid.
pub fn paint_cells(cells: &mut [i32], center: (i32, i32), width: u32) {
    for idx in brush_indices(center, width, cells.len()) {
        cells[idx] = ALIVE;
    }
}

/// Collapses ascending indices into `(start, len)` runs of consecutive cells.
pub fn contiguous_runs(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &idx in indices {
        match runs.last_mut() {
            Some((start, len)) if *start + *len == idx => *len += 1,
            _ => runs.push((idx, 1)),
        }
    }
    runs
}

/// Pointer-driven painter for the device-side grid
#[derive(Debug, Clone)]
pub struct InteractiveEditor {
    value: i32,
}

impl Default for InteractiveEditor {
    fn default() -> Self {
        Self { value: ALIVE }
    }
}

impl InteractiveEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid cell under a window position.
    pub fn target_cell(
        camera: &Camera2D,
        pointer: Vector2<f32>,
        display: Extent,
        grid: GridDims,
    ) -> (i32, i32) {
        let g = camera.window_to_grid(pointer, display.as_vec2(), grid);
        (g.x.floor() as i32, g.y.floor() as i32)
    }

    /// Paints the brush under `pointer` into the current buffer and returns the
    /// number of cells written.
    ///
    /// Writes go through the queue, so they land after every step already
    /// submitted and before the next one, and the very next draw shows them.
    pub fn paint(
        &self,
        queue: &wgpu::Queue,
        state: &SimulationState,
        camera: &Camera2D,
        pointer: Vector2<f32>,
        display: Extent,
    ) -> usize {
        let dims = state.dims();
        let center = Self::target_cell(camera, pointer, display, dims);
        let indices = brush_indices(center, dims.width, dims.cell_count());

        for (start, len) in contiguous_runs(&indices) {
            state.fill_current(queue, start, len, self.value);
        }
        indices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{PingPong, UpdateScheduler};
    use std::time::{Duration, Instant};

    fn cell(x: usize, y: usize, width: usize) -> usize {
        y * width + x
    }

    #[test]
    fn test_interior_brush_is_three_by_three() {
        let indices = brush_indices((5, 5), 10, 100);
        assert_eq!(indices, vec![44, 45, 46, 54, 55, 56, 64, 65, 66]);
    }

    #[test]
    fn test_out_of_range_neighbours_are_skipped() {
        // Top-left corner: the row above is negative, the left neighbour
        // wraps to the end of the previous row, which is also negative.
        assert_eq!(brush_indices((0, 0), 4, 16), vec![0, 1, 3, 4, 5]);
        // Bottom-right corner: everything past the last cell is dropped.
        assert_eq!(brush_indices((3, 3), 4, 16), vec![10, 11, 12, 14, 15]);
        // Entirely off the grid.
        assert!(brush_indices((-10, -10), 4, 16).is_empty());
    }

    #[test]
    fn test_paint_touches_only_brush_cells() {
        let mut cells = vec![7; 64];
        paint_cells(&mut cells, (2, 6), 8);

        let painted = brush_indices((2, 6), 8, 64);
        for (idx, &value) in cells.iter().enumerate() {
            if painted.contains(&idx) {
                assert_eq!(value, ALIVE, "cell {idx}");
            } else {
                assert_eq!(value, 7, "cell {idx}");
            }
        }
    }

    #[test]
    fn test_narrow_grid_brush_is_distinct_and_sorted() {
        // Width 2: the offsets of neighbouring rows overlap.
        let indices = brush_indices((0, 0), 2, 4);
        assert_eq!(indices, vec![0, 1, 2, 3]);

        let indices = brush_indices((0, 1), 1, 3);
        assert_eq!(indices, vec![0, 1, 2]);

        // Runs cover each painted cell exactly once, so the count paint
        // reports matches the cells it wrote.
        for width in 1..=4u32 {
            let count = (width * 3) as usize;
            for cy in 0..3 {
                let indices = brush_indices((0, cy), width, count);
                assert!(indices.windows(2).all(|w| w[0] < w[1]), "width {width}");
                let covered: usize = contiguous_runs(&indices).iter().map(|&(_, len)| len).sum();
                assert_eq!(covered, indices.len(), "width {width}");
            }
        }
    }

    #[test]
    fn test_runs_merge_consecutive_indices() {
        assert_eq!(
            contiguous_runs(&[0, 1, 3, 4, 5, 9]),
            vec![(0, 2), (3, 3), (9, 1)]
        );
        assert!(contiguous_runs(&[]).is_empty());
    }

    #[test]
    fn test_target_cell_floors_grid_position() {
        let camera = Camera2D::new(2.0);
        let grid = GridDims::new(4, 4);
        let display = Extent::new(8, 8);
        // Screen centre is grid (2, 2); one pixel left is grid x = 1.5.
        assert_eq!(
            InteractiveEditor::target_cell(&camera, Vector2::new(3.0, 4.0), display, grid),
            (1, 2)
        );
    }

    #[test]
    fn test_paint_then_identity_step_on_small_grid() {
        let width = 4;
        let mut grid = PingPong::new(vec![0; 16], vec![0; 16]);

        paint_cells(grid.current_mut(), (1, 1), width as u32);

        for y in 0..=2 {
            for x in 0..=2 {
                assert_eq!(grid.current()[cell(x, y, width)], ALIVE);
            }
        }
        assert_eq!(grid.current()[cell(3, 3, width)], 0);
        let painted = grid.current().clone();

        let interval = Duration::from_millis(16);
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(interval, start);
        assert!(!scheduler.tick(start + interval / 2, true));
        assert!(scheduler.tick(start + interval * 3 / 2, true));

        // Identity rule: next = current
        let (current, next) = grid.split_mut();
        next.copy_from_slice(current);
        assert_eq!(grid.read_index(), 0);
        grid.swap();

        assert_eq!(grid.read_index(), 1);
        assert_eq!(grid.current(), &painted);
    }
}
