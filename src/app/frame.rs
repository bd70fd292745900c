//! Per-frame stage sequence
//!
//! [`run_frame`] decides which stages a frame runs and in which order. The
//! stages themselves sit behind [`FrameStages`], implemented by the GPU
//! context for real frames and by host-side doubles in tests.

use std::time::Instant;

use cgmath::Vector2;

use super::events::{RunState, ViewerEvent};
use crate::error::Result;
use crate::simulation::UpdateScheduler;

/// The device work of one frame, split where the sequence branches
pub trait FrameStages {
    /// Presentable image held for the duration of a frame
    type Image;

    /// Acquires the next presentable image and its swapchain slot. `None`
    /// skips the frame.
    fn acquire(&mut self) -> Result<Option<(usize, Self::Image)>>;

    /// Waits on the slot's previous frame and sizes per-frame resources to
    /// `image`. Returning `false` skips the rest of the frame before any grid
    /// state changes.
    fn prepare(&mut self, slot: usize, image: &Self::Image) -> bool;

    /// Paints under the window position `pointer`.
    fn paint(&mut self, pointer: Vector2<f32>, image: &Self::Image);

    /// Records one rule step and swaps the buffer roles.
    fn step(&mut self);

    /// Records the draw, the blit and the UI overlay. Returns the control
    /// pressed in the settings panel, if any.
    fn draw(&mut self, slot: usize, image: &Self::Image, run: &RunState) -> Option<ViewerEvent>;

    /// Submits the frame and presents `image`.
    fn present(&mut self, slot: usize, image: Self::Image) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Nothing was recorded or presented
    Skipped,
    Presented {
        stepped: bool,
        pressed: Option<ViewerEvent>,
    },
}

/// Runs one frame.
///
/// Painting is gated only by the paint button, stepping only by the
/// scheduler. Both happen after the frame's resources are in place, so a
/// skipped frame never leaves the grid half updated.
///
/// # Arguments
/// * `stages` - Device work for this frame
/// * `run` - Pointer and play state after this frame's events
/// * `scheduler` - Step gate, ticked once per non-skipped frame
/// * `now` - Frame timestamp
pub fn run_frame<S: FrameStages>(
    stages: &mut S,
    run: &RunState,
    scheduler: &mut UpdateScheduler,
    now: Instant,
) -> Result<FrameOutcome> {
    let Some((slot, image)) = stages.acquire()? else {
        return Ok(FrameOutcome::Skipped);
    };
    if !stages.prepare(slot, &image) {
        return Ok(FrameOutcome::Skipped);
    }

    if run.painting {
        stages.paint(run.pointer, &image);
    }

    let stepped = scheduler.tick(now, run.playing);
    if stepped {
        stages.step();
    }

    let pressed = stages.draw(slot, &image, run);
    stages.present(slot, image)?;

    Ok(FrameOutcome::Presented { stepped, pressed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::paint_cells;
    use crate::simulation::{PingPong, ALIVE};
    use std::time::Duration;

    const WIDTH: u32 = 4;
    const INTERVAL: Duration = Duration::from_millis(10);

    /// Host-side frame stages over a 4x4 grid with an identity rule
    struct HostStages {
        grid: PingPong<Vec<i32>>,
        acquire_ok: bool,
        prepare_ok: bool,
        calls: Vec<&'static str>,
    }

    impl HostStages {
        fn new() -> Self {
            Self {
                grid: PingPong::new(vec![0; 16], vec![0; 16]),
                acquire_ok: true,
                prepare_ok: true,
                calls: Vec::new(),
            }
        }
    }

    impl FrameStages for HostStages {
        type Image = ();

        fn acquire(&mut self) -> Result<Option<(usize, ())>> {
            self.calls.push("acquire");
            Ok(self.acquire_ok.then_some((0, ())))
        }

        fn prepare(&mut self, _slot: usize, _image: &()) -> bool {
            self.calls.push("prepare");
            self.prepare_ok
        }

        fn paint(&mut self, pointer: Vector2<f32>, _image: &()) {
            self.calls.push("paint");
            let center = (pointer.x.floor() as i32, pointer.y.floor() as i32);
            paint_cells(self.grid.current_mut(), center, WIDTH);
        }

        fn step(&mut self) {
            self.calls.push("step");
            let (current, next) = self.grid.split_mut();
            next.copy_from_slice(current);
            self.grid.swap();
        }

        fn draw(&mut self, _slot: usize, _image: &(), _run: &RunState) -> Option<ViewerEvent> {
            self.calls.push("draw");
            None
        }

        fn present(&mut self, _slot: usize, _image: ()) -> Result<()> {
            self.calls.push("present");
            Ok(())
        }
    }

    fn painting_at(x: f32, y: f32, playing: bool) -> RunState {
        let mut run = RunState::new(playing);
        run.pointer = Vector2::new(x, y);
        run.painting = true;
        run
    }

    #[test]
    fn test_failed_acquire_skips_whole_frame() {
        let mut stages = HostStages::new();
        stages.acquire_ok = false;
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(INTERVAL, start);
        let run = painting_at(1.5, 1.5, true);

        let outcome = run_frame(&mut stages, &run, &mut scheduler, start + INTERVAL * 5).unwrap();

        assert_eq!(outcome, FrameOutcome::Skipped);
        assert_eq!(stages.calls, ["acquire"]);
        assert!(stages.grid.current().iter().all(|&c| c == 0));
        assert_eq!(stages.grid.read_index(), 0);
        assert_eq!(scheduler.steps(), 0);
    }

    #[test]
    fn test_failed_prepare_leaves_grid_untouched() {
        let mut stages = HostStages::new();
        stages.prepare_ok = false;
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(INTERVAL, start);
        let run = painting_at(1.5, 1.5, true);

        let outcome = run_frame(&mut stages, &run, &mut scheduler, start + INTERVAL * 5).unwrap();

        assert_eq!(outcome, FrameOutcome::Skipped);
        assert_eq!(stages.calls, ["acquire", "prepare"]);
        assert_eq!(stages.grid.read_index(), 0);
        assert_eq!(scheduler.steps(), 0);
    }

    #[test]
    fn test_painting_applies_while_paused() {
        let mut stages = HostStages::new();
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(INTERVAL, start);
        let run = painting_at(1.5, 1.5, false);

        let outcome = run_frame(&mut stages, &run, &mut scheduler, start + INTERVAL * 5).unwrap();

        assert_eq!(
            outcome,
            FrameOutcome::Presented {
                stepped: false,
                pressed: None
            }
        );
        assert_eq!(stages.calls, ["acquire", "prepare", "paint", "draw", "present"]);
        assert_eq!(stages.grid.current()[0], ALIVE);
        assert_eq!(stages.grid.current()[10], ALIVE);
        assert_eq!(stages.grid.current()[15], 0);
        assert_eq!(stages.grid.read_index(), 0);
    }

    #[test]
    fn test_roles_swap_only_on_granted_steps() {
        let mut stages = HostStages::new();
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(INTERVAL, start);
        let run = RunState::new(true);

        let frame = INTERVAL / 3;
        let mut swaps = 0;
        for i in 1..=30u32 {
            let before = stages.grid.read_index();
            let outcome = run_frame(&mut stages, &run, &mut scheduler, start + frame * i).unwrap();
            let FrameOutcome::Presented { stepped, .. } = outcome else {
                panic!("frame {i} was skipped");
            };

            assert_eq!(stages.grid.read_index() != before, stepped, "frame {i}");
            swaps += stepped as u32;
        }

        assert!(swaps > 0 && swaps < 30);
        assert_eq!(swaps as u64, scheduler.steps());
    }

    #[test]
    fn test_step_follows_paint_in_same_frame() {
        let mut stages = HostStages::new();
        let start = Instant::now();
        let mut scheduler = UpdateScheduler::new(INTERVAL, start);
        let run = painting_at(1.5, 1.5, true);

        run_frame(&mut stages, &run, &mut scheduler, start + INTERVAL * 3 / 2).unwrap();

        assert_eq!(
            stages.calls,
            ["acquire", "prepare", "paint", "step", "draw", "present"]
        );
        // The identity step carried the painted cells into the new current buffer.
        assert_eq!(stages.grid.read_index(), 1);
        assert_eq!(stages.grid.current()[5], ALIVE);
    }
}
