//! Double-buffered simulation state
//!
//! The grid lives in two equally sized cell buffers. One is read by the rule
//! kernel and the draw pass ("current"), the other receives the next
//! generation ("next"). After every step the roles flip; no cell data is ever
//! copied between the two.

use rand::Rng;
use wgpu::util::DeviceExt;

use super::{seed, GridDims};

/// Two values with alternating read/write roles
///
/// `PingPong` holds the role bookkeeping independent of what the two slots
/// contain, so the swap discipline is the same for device buffers and for
/// host-side copies.
#[derive(Debug, Clone)]
pub struct PingPong<T> {
    slots: [T; 2],
    read: usize,
}

impl<T> PingPong<T> {
    /// Slot 0 starts as the read side.
    pub fn new(first: T, second: T) -> Self {
        Self {
            slots: [first, second],
            read: 0,
        }
    }

    /// Index (0 or 1) of the slot currently read
    pub fn read_index(&self) -> usize {
        self.read
    }

    /// Index (0 or 1) of the slot currently written
    pub fn write_index(&self) -> usize {
        1 - self.read
    }

    pub fn current(&self) -> &T {
        &self.slots[self.read]
    }

    pub fn current_mut(&mut self) -> &mut T {
        &mut self.slots[self.read]
    }

    pub fn next(&self) -> &T {
        &self.slots[1 - self.read]
    }

    /// Borrows both slots at once: `(current, next)`.
    pub fn split_mut(&mut self) -> (&T, &mut T) {
        let [a, b] = &mut self.slots;
        if self.read == 0 {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Flips the read/write roles.
    pub fn swap(&mut self) {
        self.read = 1 - self.read;
    }

    /// Both slots in storage order, independent of role.
    pub fn slots(&self) -> &[T; 2] {
        &self.slots
    }
}

/// Device-side cell grid with ping-pong roles
///
/// Owns both cell buffers exclusively. The rule kernel and the draw pass
/// borrow them through [`current_buffer`](Self::current_buffer) and
/// [`next_buffer`](Self::next_buffer); host edits go through the queue so they
/// are ordered with respect to every submitted step.
pub struct SimulationState {
    dims: GridDims,
    buffers: PingPong<wgpu::Buffer>,
    generation: u64,
}

impl SimulationState {
    /// Allocates both buffers at grid size and seeds each one independently
    /// from `0..seed_max`.
    pub fn new<R: Rng + ?Sized>(
        device: &wgpu::Device,
        dims: GridDims,
        seed_max: i32,
        rng: &mut R,
    ) -> Self {
        let make = |label: &str, rng: &mut R| {
            let cells = seed::random_cells(dims.cell_count(), seed_max, rng);
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&cells),
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_DST
                    | wgpu::BufferUsages::COPY_SRC,
            })
        };

        let a = make("Cell Buffer A", rng);
        let b = make("Cell Buffer B", rng);

        Self {
            dims,
            buffers: PingPong::new(a, b),
            generation: 0,
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn current_buffer(&self) -> &wgpu::Buffer {
        self.buffers.current()
    }

    pub fn next_buffer(&self) -> &wgpu::Buffer {
        self.buffers.next()
    }

    /// Which of the two buffers is currently read
    pub fn read_index(&self) -> usize {
        self.buffers.read_index()
    }

    /// Buffers in storage order, for building per-role bind groups
    pub fn buffers(&self) -> &[wgpu::Buffer; 2] {
        self.buffers.slots()
    }

    /// Number of completed steps since the last reseed
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Flips read/write roles after a step has been recorded.
    pub fn swap(&mut self) {
        self.buffers.swap();
        self.generation += 1;
    }

    /// Replaces the grid with `cells` in both buffers and restarts the
    /// generation count.
    ///
    /// Queue writes execute before the next submission and after every earlier
    /// one, so this never overlaps an in-flight step.
    pub fn reseed(&mut self, queue: &wgpu::Queue, cells: &[i32]) {
        debug_assert_eq!(cells.len(), self.dims.cell_count());
        for buffer in self.buffers.slots() {
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(cells));
        }
        self.generation = 0;
    }

    /// Writes `len` copies of `value` into the current buffer starting at cell `start`.
    pub fn fill_current(&self, queue: &wgpu::Queue, start: usize, len: usize, value: i32) {
        if len == 0 {
            return;
        }
        let run = vec![value; len];
        let offset = (start * std::mem::size_of::<i32>()) as wgpu::BufferAddress;
        queue.write_buffer(self.current_buffer(), offset, bytemuck::cast_slice(&run));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_alternate_strictly() {
        let mut state = PingPong::new("A", "B");

        for step in 0..8 {
            let expected = if step % 2 == 0 { "A" } else { "B" };
            assert_eq!(*state.current(), expected, "read role at step {step}");
            assert_eq!(state.read_index(), step % 2);
            assert_eq!(state.write_index(), 1 - step % 2);
            state.swap();
        }
    }

    #[test]
    fn test_written_buffer_is_read_next_step() {
        let mut state = PingPong::new(vec![0; 4], vec![0; 4]);

        for step in 1..=5 {
            let (_, next) = state.split_mut();
            next.fill(step);
            state.swap();
            assert!(state.current().iter().all(|&c| c == step));
        }
    }

    #[test]
    fn test_swap_never_copies() {
        let mut state = PingPong::new(vec![1, 2, 3], vec![4, 5, 6]);
        let before: Vec<*const i32> = state.slots().iter().map(|v| v.as_ptr()).collect();

        state.swap();
        state.swap();
        state.swap();

        let after: Vec<*const i32> = state.slots().iter().map(|v| v.as_ptr()).collect();
        assert_eq!(before, after);
        assert_eq!(state.current(), &vec![4, 5, 6]);
    }

    #[test]
    fn test_slots_cover_both_roles_after_any_swap() {
        // Reseeding writes every slot, so neither role can keep an old generation.
        let mut state = PingPong::new("A", "B");

        for _ in 0..3 {
            let slots = state.slots();
            assert!(slots.contains(state.current()));
            assert!(slots.contains(state.next()));
            assert_ne!(state.current(), state.next());
            state.swap();
        }
    }

    #[test]
    fn test_split_mut_matches_roles() {
        let mut state = PingPong::new(10, 20);
        state.swap();
        let (current, next) = state.split_mut();
        assert_eq!(*current, 20);
        *next = 30;
        assert_eq!(*state.next(), 30);
        *state.current_mut() += 1;
        assert_eq!(*state.current(), 21);
    }
}
