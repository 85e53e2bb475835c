//! Procedural planet surface texture.
//!
//! A two-circle radial gradient suggests a lit sphere; a few dozen soft,
//! translucent blotches on top read as cloud and relief. Everything is
//! composited in floating point and quantised once at the end so the
//! gradient does not band.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Size the layout constants below are expressed in.
pub const REFERENCE_SIZE: f32 = 256.0;

/// Number of blotches overlaid on the gradient.
pub const BLOTCH_COUNT: usize = 29;

const GRADIENT_STOPS: [(f32, u32); 4] = [
    (0.00, 0xc5eaff),
    (0.30, 0x1c64a9),
    (0.75, 0x0b2348),
    (1.00, 0x141634),
];

const BLOTCH_PALETTE: [u32; 4] = [0xc3e0ff, 0x238be3, 0x2896b7, 0xf6fafe];

/// Start circle: centre and radius as fractions of the texture size.
const INNER_CIRCLE: (f32, f32, f32) = (0.55, 0.50, 0.21);
/// End circle.
const OUTER_CIRCLE: (f32, f32, f32) = (0.52, 0.47, 0.49);

/// An sRGB-encoded RGBA8 raster, row-major from the top-left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanetTexture {
    pub size: u32,
    pub pixels: Vec<u8>,
}

impl PlanetTexture {
    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let i = (y as usize * self.size as usize + x as usize) * 4;
        self.pixels.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Generate a `size × size` planet texture from `seed`.
pub fn generate_planet_texture(size: u32, seed: u64) -> PlanetTexture {
    paint_planet_texture(size, &mut ChaCha8Rng::seed_from_u64(seed))
}

/// Generate a planet texture drawing randomness from `rng`.
pub fn paint_planet_texture<R: Rng + ?Sized>(size: u32, rng: &mut R) -> PlanetTexture {
    if size == 0 {
        return PlanetTexture {
            size: 0,
            pixels: Vec::new(),
        };
    }

    let extent = size as f32;
    let side = size as usize;
    let gradient = ConicalGradient::for_size(extent);
    let mut canvas: Vec<Vec3> = (0..side * side)
        .map(|i| {
            let p = Vec2::new((i % side) as f32 + 0.5, (i / side) as f32 + 0.5);
            gradient.color_at(p)
        })
        .collect();

    let scale = extent / REFERENCE_SIZE;
    for _ in 0..BLOTCH_COUNT {
        let blotch = Blotch::random(rng, extent, scale);
        blotch.composite(&mut canvas, side);
    }

    let pixels = canvas
        .iter()
        .flat_map(|c| [quantize(c.x), quantize(c.y), quantize(c.z), 255])
        .collect();

    PlanetTexture { size, pixels }
}

/// Canvas-style two-point conical gradient between two circles.
#[derive(Clone, Copy, Debug)]
struct ConicalGradient {
    c0: Vec2,
    r0: f32,
    c1: Vec2,
    r1: f32,
}

impl ConicalGradient {
    fn for_size(extent: f32) -> Self {
        Self {
            c0: Vec2::new(INNER_CIRCLE.0, INNER_CIRCLE.1) * extent,
            r0: INNER_CIRCLE.2 * extent,
            c1: Vec2::new(OUTER_CIRCLE.0, OUTER_CIRCLE.1) * extent,
            r1: OUTER_CIRCLE.2 * extent,
        }
    }

    /// Gradient parameter at `p`: the largest ω whose interpolated circle has
    /// a non-negative radius and passes through `p`.
    fn parameter_at(&self, p: Vec2) -> f32 {
        let cd = self.c1 - self.c0;
        let dr = self.r1 - self.r0;
        let pd = p - self.c0;

        let a = cd.dot(cd) - dr * dr;
        let b = pd.dot(cd) + self.r0 * dr;
        let c = pd.dot(pd) - self.r0 * self.r0;
        let valid = |w: f32| w.is_finite() && self.r0 + w * dr >= 0.0;

        if a.abs() < f32::EPSILON {
            let w = c / (2.0 * b);
            return if valid(w) { w } else { 1.0 };
        }

        let disc = b * b - a * c;
        if disc < 0.0 {
            // Outside the cone entirely; pad with the last stop.
            return 1.0;
        }
        let root = disc.sqrt();
        let (w1, w2) = ((b + root) / a, (b - root) / a);
        let (hi, lo) = if w1 >= w2 { (w1, w2) } else { (w2, w1) };
        if valid(hi) {
            hi
        } else if valid(lo) {
            lo
        } else {
            1.0
        }
    }

    fn color_at(&self, p: Vec2) -> Vec3 {
        sample_stops(self.parameter_at(p))
    }
}

/// Piecewise-linear stop interpolation, padded outside [0, 1].
fn sample_stops(t: f32) -> Vec3 {
    let (first_at, first) = GRADIENT_STOPS[0];
    if t <= first_at {
        return hex_color(first);
    }
    for pair in GRADIENT_STOPS.windows(2) {
        let ((t0, c0), (t1, c1)) = (pair[0], pair[1]);
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            return hex_color(c0).lerp(hex_color(c1), f);
        }
    }
    hex_color(GRADIENT_STOPS[GRADIENT_STOPS.len() - 1].1)
}

#[derive(Clone, Copy, Debug)]
struct Blotch {
    center: Vec2,
    radius: f32,
    alpha: f32,
    color: Vec3,
}

impl Blotch {
    fn random<R: Rng + ?Sized>(rng: &mut R, extent: f32, scale: f32) -> Self {
        let alpha = 0.04 + rng.random::<f32>() * 0.09;
        let radius = (20.0 + rng.random::<f32>() * 36.0) * scale;
        let span = (extent - radius).max(0.0);
        let corner = Vec2::new(rng.random::<f32>() * span, rng.random::<f32>() * span);
        let color = hex_color(BLOTCH_PALETTE[rng.random_range(0..BLOTCH_PALETTE.len())]);
        Self {
            center: corner + Vec2::splat(radius / 2.0),
            radius,
            alpha,
            color,
        }
    }

    /// Source-over blend with a one-pixel anti-aliased rim.
    fn composite(&self, canvas: &mut [Vec3], side: usize) {
        let reach = self.radius + 1.0;
        let max = side as f32 - 1.0;
        let x0 = (self.center.x - reach).floor().clamp(0.0, max) as usize;
        let x1 = (self.center.x + reach).ceil().clamp(0.0, max) as usize;
        let y0 = (self.center.y - reach).floor().clamp(0.0, max) as usize;
        let y1 = (self.center.y + reach).ceil().clamp(0.0, max) as usize;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (self.radius - p.distance(self.center) + 0.5).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    let Some(dst) = canvas.get_mut(y * side + x) else {
                        continue;
                    };
                    *dst = dst.lerp(self.color, self.alpha * coverage);
                }
            }
        }
    }
}

fn hex_color(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32,
        ((hex >> 8) & 0xff) as f32,
        (hex & 0xff) as f32,
    ) / 255.0
}

fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_size_has_opaque_corners() {
        let texture = generate_planet_texture(256, 7);
        assert_eq!(texture.size, 256);
        assert_eq!(texture.pixels.len(), 256 * 256 * 4);
        for (x, y) in [(0, 0), (255, 0), (0, 255), (255, 255)] {
            let pixel = texture.pixel(x, y).unwrap();
            assert_eq!(pixel[3], 255, "corner ({x}, {y}) is transparent");
        }
    }

    #[test]
    fn test_zero_size_is_empty() {
        let texture = generate_planet_texture(0, 1);
        assert!(texture.is_empty());
        assert_eq!(texture.pixel(0, 0), None);
    }

    #[test]
    fn test_same_seed_same_texture() {
        assert_eq!(generate_planet_texture(64, 11), generate_planet_texture(64, 11));
        assert_ne!(generate_planet_texture(64, 11), generate_planet_texture(64, 12));
    }

    #[test]
    fn test_gradient_pads_first_stop_inside_start_circle() {
        let gradient = ConicalGradient::for_size(REFERENCE_SIZE);
        let t = gradient.parameter_at(gradient.c0);
        assert!(t <= 0.0);
        assert_eq!(gradient.color_at(gradient.c0), hex_color(0xc5eaff));
    }

    #[test]
    fn test_gradient_pads_last_stop_at_corner() {
        let gradient = ConicalGradient::for_size(REFERENCE_SIZE);
        assert!(gradient.parameter_at(Vec2::new(0.5, 0.5)) >= 1.0);
        assert_eq!(gradient.color_at(Vec2::new(0.5, 0.5)), hex_color(0x141634));
    }

    #[test]
    fn test_gradient_parameter_increases_outward() {
        let gradient = ConicalGradient::for_size(REFERENCE_SIZE);
        // Zero-radius circle of the cone; every level circle encloses it.
        let apex = gradient.c0
            - (gradient.c1 - gradient.c0) * (gradient.r0 / (gradient.r1 - gradient.r0));
        let mut previous = f32::NEG_INFINITY;
        for step in 0..8 {
            let p = apex + Vec2::new(0.0, 10.0 + step as f32 * 14.0);
            let t = gradient.parameter_at(p);
            assert!(t >= previous, "gradient parameter decreased at step {step}");
            previous = t;
        }
    }

    #[test]
    fn test_stop_interpolation_midpoint() {
        let mid = sample_stops(0.15);
        let expected = hex_color(0xc5eaff).lerp(hex_color(0x1c64a9), 0.5);
        assert!((mid - expected).length() < 1e-6);
    }

    #[test]
    fn test_blotch_alpha_and_radius_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            let blotch = Blotch::random(&mut rng, REFERENCE_SIZE, 1.0);
            assert!((0.04..0.13).contains(&blotch.alpha));
            assert!((20.0..56.0).contains(&blotch.radius));
            assert!(blotch.center.x >= blotch.radius / 2.0);
            assert!(blotch.center.x <= REFERENCE_SIZE - blotch.radius / 2.0);
        }
    }

    #[test]
    fn test_blotch_blends_toward_its_color() {
        let mut canvas = vec![Vec3::ZERO; 16 * 16];
        let blotch = Blotch {
            center: Vec2::new(8.0, 8.0),
            radius: 4.0,
            alpha: 0.1,
            color: Vec3::ONE,
        };
        blotch.composite(&mut canvas, 16);
        let inside = canvas[8 * 16 + 8];
        assert!((inside.x - 0.1).abs() < 1e-6);
        assert_eq!(canvas[0], Vec3::ZERO);

        blotch.composite(&mut canvas, 16);
        let twice = canvas[8 * 16 + 8];
        assert!((twice.x - 0.19).abs() < 1e-6, "overlaps should accumulate");
    }

    #[test]
    fn test_small_sizes_stay_in_bounds() {
        for size in [1, 2, 5, 17] {
            let texture = generate_planet_texture(size, 99);
            assert_eq!(texture.pixels.len(), (size * size * 4) as usize);
        }
    }

    #[test]
    fn test_pixel_lookup_on_huge_raster_does_not_overflow() {
        // 70000² · 4 does not fit in u32.
        let texture = PlanetTexture {
            size: 70_000,
            pixels: vec![0; 16],
        };
        assert_eq!(texture.pixel(69_999, 69_999), None);
        assert_eq!(texture.pixel(1, 0), Some([0; 4]));
        assert_eq!(texture.pixel(70_000, 0), None);
    }

    #[test]
    fn test_blotch_near_far_edge_of_wide_canvas() {
        let side = 70_000;
        let mut canvas = vec![Vec3::ZERO; side * 4];
        let blotch = Blotch {
            center: Vec2::new(side as f32 - 2.0, 1.0),
            radius: 1.5,
            alpha: 0.5,
            color: Vec3::ONE,
        };
        blotch.composite(&mut canvas, side);
        assert!(canvas[side - 2].x > 0.0);
        assert_eq!(canvas[0], Vec3::ZERO);
    }
}
