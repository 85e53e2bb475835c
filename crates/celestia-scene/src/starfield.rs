//! Uniform sampling of star positions inside a spherical shell.

use glam::Vec3;
use rand::Rng;

/// Lowest per-star drift speed (radians per tick).
pub const MIN_DRIFT_SPEED: f32 = 0.0007;
/// Width of the drift speed band; speeds lie in `[MIN, MIN + SPAN)`.
pub const DRIFT_SPEED_SPAN: f32 = 0.0007;

/// Inner and outer radius of the star shell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShellBounds {
    pub r_min: f32,
    pub r_max: f32,
}

impl ShellBounds {
    /// Orders the radii and clamps negatives to zero.
    pub fn new(a: f32, b: f32) -> Self {
        let (a, b) = (a.max(0.0), b.max(0.0));
        Self {
            r_min: a.min(b),
            r_max: a.max(b),
        }
    }

    /// Whether `p` lies in the shell, with `epsilon` slack on both radii.
    pub fn contains(&self, p: Vec3, epsilon: f32) -> bool {
        let r2 = p.length_squared();
        let lo = (self.r_min - epsilon).max(0.0);
        let hi = self.r_max + epsilon;
        r2 >= lo * lo && r2 <= hi * hi
    }
}

/// Star positions with their parallel drift speeds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StarSample {
    pub positions: Vec<Vec3>,
    pub speeds: Vec<f32>,
}

/// Sample `count` points in `bounds`.
///
/// The polar angle is drawn as `acos(2u - 1)` so points are uniform over
/// the sphere's surface instead of bunching at the poles.
pub fn sample_starfield<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    bounds: ShellBounds,
) -> StarSample {
    let mut positions = Vec::with_capacity(count);
    let mut speeds = Vec::with_capacity(count);
    let depth = bounds.r_max - bounds.r_min;

    for _ in 0..count {
        let r = (bounds.r_min + rng.random::<f32>() * depth).min(bounds.r_max);
        let theta = rng.random::<f32>() * std::f32::consts::TAU;
        let phi = (2.0 * rng.random::<f32>() - 1.0).acos();

        positions.push(Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        ));
        speeds.push(MIN_DRIFT_SPEED + rng.random::<f32>() * DRIFT_SPEED_SPAN);
    }

    StarSample { positions, speeds }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_exact_count_and_bounds() {
        let bounds = ShellBounds::new(34.0, 64.0);
        for count in [1, 7, 350, 2000] {
            let sample = sample_starfield(&mut rng(count as u64), count, bounds);
            assert_eq!(sample.positions.len(), count);
            assert_eq!(sample.speeds.len(), count);
            for p in &sample.positions {
                assert!(bounds.contains(*p, 1e-3), "star {p} outside shell");
            }
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let sample = sample_starfield(&mut rng(0), 0, ShellBounds::new(30.0, 60.0));
        assert!(sample.positions.is_empty());
        assert!(sample.speeds.is_empty());
    }

    #[test]
    fn test_speeds_in_band() {
        let sample = sample_starfield(&mut rng(5), 1000, ShellBounds::new(34.0, 64.0));
        for s in &sample.speeds {
            assert!(*s >= MIN_DRIFT_SPEED && *s < MIN_DRIFT_SPEED + DRIFT_SPEED_SPAN + 1e-7);
        }
        let distinct = sample
            .speeds
            .windows(2)
            .filter(|w| (w[0] - w[1]).abs() > 1e-7)
            .count();
        assert!(distinct > 900, "speeds should vary per star");
    }

    #[test]
    fn test_no_polar_clustering() {
        // Uniform on the sphere means cos(phi) is uniform in [-1, 1], so half
        // the points have |z/r| < 0.5. Uniform phi would give about two thirds.
        let sample = sample_starfield(&mut rng(21), 20_000, ShellBounds::new(1.0, 1.0));
        let equatorial = sample
            .positions
            .iter()
            .filter(|p| (p.z / p.length()).abs() < 0.5)
            .count() as f32
            / 20_000.0;
        assert!((equatorial - 0.5).abs() < 0.02, "equatorial fraction {equatorial}");
    }

    #[test]
    fn test_hemispheres_balanced() {
        let sample = sample_starfield(&mut rng(8), 10_000, ShellBounds::new(34.0, 64.0));
        let mean = sample.positions.iter().copied().sum::<Vec3>() / 10_000.0;
        assert!(mean.length() < 1.5, "mean position {mean} is biased");
    }

    #[test]
    fn test_degenerate_shell() {
        let bounds = ShellBounds::new(40.0, 40.0);
        let sample = sample_starfield(&mut rng(1), 64, bounds);
        for p in &sample.positions {
            assert!((p.length() - 40.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_bounds_are_ordered_and_clamped() {
        assert_eq!(
            ShellBounds::new(64.0, 34.0),
            ShellBounds {
                r_min: 34.0,
                r_max: 64.0
            }
        );
        assert_eq!(ShellBounds::new(-5.0, 10.0).r_min, 0.0);
    }

    #[test]
    fn test_deterministic_per_seed() {
        let bounds = ShellBounds::new(34.0, 64.0);
        assert_eq!(
            sample_starfield(&mut rng(42), 50, bounds),
            sample_starfield(&mut rng(42), 50, bounds)
        );
    }
}
