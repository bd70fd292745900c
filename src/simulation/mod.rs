//! Simulation system
//!
//! The grid state, the fixed-rate step gate and the compute kernel that
//! advances the automaton. The rule itself is WGSL executed on the device;
//! this module only fixes the data it reads and writes and when it runs.

pub mod kernel;
pub mod scheduler;
pub mod seed;
pub mod state;

pub use kernel::RuleKernel;
pub use scheduler::UpdateScheduler;
pub use state::{PingPong, SimulationState};

/// Value a painted cell receives
pub const ALIVE: i32 = 1;

/// Fixed grid dimensions, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub width: u32,
    pub height: u32,
}

impl GridDims {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_vec2(&self) -> cgmath::Vector2<f32> {
        cgmath::Vector2::new(self.width as f32, self.height as f32)
    }
}

/// Grid dimensions as laid out for the kernels' uniform block
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GridUniform {
    pub dims: [u32; 2],
    pub _padding: [u32; 2],
}

impl From<GridDims> for GridUniform {
    fn from(dims: GridDims) -> Self {
        Self {
            dims: [dims.width, dims.height],
            _padding: [0; 2],
        }
    }
}
