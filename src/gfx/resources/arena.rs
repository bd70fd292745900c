//! Per-frame transient resource arena
//!
//! Resources created for a single frame (bind groups naming that frame's
//! buffers and images) are parked in the slot of the swapchain image they were
//! recorded for, together with the fence of the submission that uses them.
//! Before a slot is reused its fence is waited on and the parked resources are
//! released, so nothing is freed while the device may still read it.

/// Transient resources of one swapchain slot
struct ArenaSlot<T, F> {
    resources: Vec<T>,
    fence: Option<F>,
}

impl<T, F> Default for ArenaSlot<T, F> {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            fence: None,
        }
    }
}

/// Ring of per-slot transient resources sized to the swapchain image count
pub struct FrameArena<T, F> {
    slots: Vec<ArenaSlot<T, F>>,
}

impl<T, F> FrameArena<T, F> {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: (0..slot_count.max(1)).map(|_| ArenaSlot::default()).collect(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Prepares `slot` for a new frame: waits on the fence of the frame that
    /// last used it, then releases that frame's resources. Returns how many
    /// resources were released.
    pub fn begin(&mut self, slot: usize, wait: impl FnOnce(F)) -> usize {
        let len = self.slots.len();
        let entry = &mut self.slots[slot % len];
        if let Some(fence) = entry.fence.take() {
            wait(fence);
        }
        let released = entry.resources.len();
        entry.resources.clear();
        released
    }

    /// Keeps `resource` alive until `slot` is next retired.
    pub fn park(&mut self, slot: usize, resource: T) {
        let len = self.slots.len();
        self.slots[slot % len].resources.push(resource);
    }

    /// Records the submission that uses `slot`'s parked resources.
    pub fn seal(&mut self, slot: usize, fence: F) {
        let len = self.slots.len();
        self.slots[slot % len].fence = Some(fence);
    }

    /// Releases everything. The caller must have drained the device.
    pub fn retire_all(&mut self) {
        for entry in &mut self.slots {
            entry.fence = None;
            entry.resources.clear();
        }
    }

    /// Resources currently parked across all slots
    pub fn live(&self) -> usize {
        self.slots.iter().map(|entry| entry.resources.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_waits_for_its_own_fence() {
        let mut arena: FrameArena<&str, u64> = FrameArena::new(3);
        let mut waited = Vec::new();

        for frame in 0..6u64 {
            let slot = (frame % 3) as usize;
            arena.begin(slot, |fence| waited.push(fence));
            arena.park(slot, "bind group");
            arena.seal(slot, frame);
        }

        // Frames 3, 4, 5 reuse slots 0, 1, 2 and wait on frames 0, 1, 2.
        assert_eq!(waited, vec![0, 1, 2]);
        assert_eq!(arena.live(), 3);
    }

    #[test]
    fn test_begin_releases_previous_frame() {
        let mut arena: FrameArena<String, u64> = FrameArena::new(2);
        arena.begin(0, |_| {});
        arena.park(0, "draw".to_string());
        arena.park(0, "blit".to_string());
        arena.seal(0, 10);

        assert_eq!(arena.begin(0, |fence| assert_eq!(fence, 10)), 2);
        assert_eq!(arena.live(), 0);
    }

    #[test]
    fn test_unsealed_slot_does_not_wait() {
        let mut arena: FrameArena<u8, u64> = FrameArena::new(2);
        arena.park(1, 7);
        let released = arena.begin(1, |_| panic!("no submission to wait for"));
        assert_eq!(released, 1);
    }

    #[test]
    fn test_retire_all_clears_fences() {
        let mut arena: FrameArena<u8, u64> = FrameArena::new(2);
        arena.park(0, 1);
        arena.seal(0, 1);
        arena.park(1, 2);
        arena.seal(1, 2);

        arena.retire_all();

        assert_eq!(arena.live(), 0);
        arena.begin(0, |_| panic!("fence should have been retired"));
        arena.begin(1, |_| panic!("fence should have been retired"));
    }
}
