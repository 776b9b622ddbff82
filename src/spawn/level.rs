//! Distance-scaled creature levels

use rand::Rng;

use crate::core::config::SpawnConfig;
use crate::core::types::Vec2;

pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 100;
const BASE_LEVEL: f32 = 2.0;

/// Level for a creature spawning at `position`.
///
/// Grows by one every `level_distance_scale` tiles from the world origin,
/// jittered by up to `level_variance` either way.
pub fn level_for<R: Rng + ?Sized>(position: Vec2, tile_size: f32, config: &SpawnConfig, rng: &mut R) -> u32 {
    let distance = position.length();
    let jitter = if config.level_variance > 0.0 {
        rng.gen_range(-config.level_variance..=config.level_variance)
    } else {
        0.0
    };
    let raw = BASE_LEVEL + distance / (tile_size * config.level_distance_scale) + jitter;
    raw.clamp(MIN_LEVEL as f32, MAX_LEVEL as f32).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_level_near_origin_is_low() {
        let config = SpawnConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let level = level_for(Vec2::new(0.0, 0.0), 32.0, &config, &mut rng);
            assert!((1..=4).contains(&level), "level {}", level);
        }
    }

    #[test]
    fn test_level_grows_with_distance() {
        let config = SpawnConfig {
            level_variance: 0.0,
            ..SpawnConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // 500 tiles out: 2 + 10
        let far = Vec2::new(500.0 * 32.0, 0.0);
        assert_eq!(level_for(far, 32.0, &config, &mut rng), 12);
    }

    #[test]
    fn test_level_is_capped() {
        let config = SpawnConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let edge = Vec2::new(1.0e7, 1.0e7);
        assert_eq!(level_for(edge, 32.0, &config, &mut rng), MAX_LEVEL);
    }
}
