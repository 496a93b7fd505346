use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::BallConfig;
use crate::math::{vec3, Vec3};

/// Picks drop positions for new balls: random x in the drop range, fixed height, z = 0.
pub struct DropSpawner {
    rng: ChaCha8Rng,
    x_min: f32,
    x_max: f32,
    height: f32,
}

impl DropSpawner {
    pub fn new(config: &BallConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            rng,
            x_min: config.drop_x_min,
            x_max: config.drop_x_max,
            height: config.drop_height,
        }
    }

    pub fn next_position(&mut self) -> Vec3 {
        let x = self.rng.gen_range(self.x_min..self.x_max);
        vec3(x, self.height, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_stay_in_drop_range() {
        let config = BallConfig::default();
        let mut spawner = DropSpawner::new(&config, Some(42));
        for _ in 0..1000 {
            let p = spawner.next_position();
            assert!(p.x >= config.drop_x_min && p.x < config.drop_x_max);
            assert_eq!(p.y, config.drop_height);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let config = BallConfig::default();
        let mut a = DropSpawner::new(&config, Some(7));
        let mut b = DropSpawner::new(&config, Some(7));
        for _ in 0..20 {
            assert_eq!(a.next_position(), b.next_position());
        }
    }

    #[test]
    fn positions_vary() {
        let mut spawner = DropSpawner::new(&BallConfig::default(), Some(1));
        let first = spawner.next_position();
        assert!((0..20).any(|_| spawner.next_position() != first));
    }
}
