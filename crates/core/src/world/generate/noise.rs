use crate::{
    util::{uniform, NumRange},
    world::grid::{GridMap, GridPoint},
};
use noise::{NoiseFn, Perlin};
use rand::Rng;

/// A 2D coherent noise field over the grid, with values in [0,1].
///
/// Several fields are built from the same underlying Perlin function during a
/// run (terrain, tree density). Each one samples a different region of that
/// function, picked by a random offset, so the fields are independent of each
/// other.
#[derive(Clone, Debug)]
pub struct NoiseField {
    noise_fn: Perlin,
    /// Multiplier on cell coordinates before sampling
    scale: f64,
    x_offset: f64,
    y_offset: f64,
}

impl NoiseField {
    /// The output range of Perlin noise. Used to map samples onto [0,1].
    const NOISE_FN_OUTPUT_RANGE: NumRange<f64> = NumRange::new(-1.0, 1.0);

    /// Create a field with offsets drawn from `[-offset_range, offset_range]`
    pub fn new(
        noise_fn: Perlin,
        scale: f64,
        offset_range: f64,
        rng: &mut impl Rng,
    ) -> Self {
        let x_offset = uniform(rng, -offset_range, offset_range);
        let y_offset = uniform(rng, -offset_range, offset_range);
        Self::with_offset(noise_fn, scale, x_offset, y_offset)
    }

    pub fn with_offset(
        noise_fn: Perlin,
        scale: f64,
        x_offset: f64,
        y_offset: f64,
    ) -> Self {
        Self {
            noise_fn,
            scale,
            x_offset,
            y_offset,
        }
    }

    /// Sample the field at arbitrary (not necessarily integer) coordinates
    pub fn sample_at(&self, x: f64, y: f64) -> f64 {
        let raw = self.noise_fn.get([
            x * self.scale + self.x_offset,
            y * self.scale + self.y_offset,
        ]);
        // Perlin can overshoot its nominal range slightly, so clamp
        NumRange::normal_range()
            .clamp(Self::NOISE_FN_OUTPUT_RANGE.normalize(raw))
    }

    /// Sample the field at the given cell
    pub fn sample(&self, point: GridPoint) -> f64 {
        self.sample_at(f64::from(point.x), f64::from(point.y))
    }

    /// Sample every cell of a grid of the given size
    pub fn to_map(&self, size: u16) -> GridMap<f64> {
        GridMap::from_fn(size, |point| self.sample(point))
    }
}

/// Edge falloff for a cell. 0 at the center of the world, rising to 1 at the
/// edges. The curve stays low for most of the interior then climbs steeply
/// near the border, which is what gives the land its island shape.
pub fn falloff(point: GridPoint, size: u16) -> f64 {
    let size = f64::from(size);
    let xv = f64::from(point.x) / size * 2.0 - 1.0;
    let yv = f64::from(point.y) / size * 2.0 - 1.0;
    let v = xv.abs().max(yv.abs());

    let a = v.powi(3);
    let b = (2.2 - 2.2 * v).powi(3);
    a / (a + b)
}

/// Falloff values for every cell of a grid of the given size
pub fn falloff_map(size: u16) -> GridMap<f64> {
    GridMap::from_fn(size, |point| falloff(point, size))
}
