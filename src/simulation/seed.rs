//! Initial cell distributions

use rand::Rng;

/// Draws `count` cells uniformly from `0..seed_max`.
///
/// A non-positive `seed_max` yields an all-zero grid.
pub fn random_cells<R: Rng + ?Sized>(count: usize, seed_max: i32, rng: &mut R) -> Vec<i32> {
    if seed_max <= 0 {
        return vec![0; count];
    }
    (0..count).map(|_| rng.random_range(0..seed_max)).collect()
}

/// An all-dead grid
pub fn cleared_cells(count: usize) -> Vec<i32> {
    vec![0; count]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_random_cells_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let cells = random_cells(4096, 100, &mut rng);
        assert_eq!(cells.len(), 4096);
        assert!(cells.iter().all(|&c| (0..100).contains(&c)));
        // A uniform draw over 0..100 on 4096 cells hits more than one value.
        assert!(cells.iter().any(|&c| c != cells[0]));
    }

    #[test]
    fn test_degenerate_range_is_empty_grid() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_cells(9, 0, &mut rng), cleared_cells(9));
    }
}
