use derive_more::Display;
use rand::{
    distributions::uniform::{SampleRange, SampleUniform, UniformSampler},
    Rng, RngCore,
};
use std::{
    fmt::{Debug, Display},
    ops,
};

/// A macro to measure the evaluation time of an expression. Wraps an
/// expression, logs how long it took to evaluate, and returns its value.
#[macro_export]
macro_rules! timed {
    ($label:expr, $ex:expr) => {
        $crate::timed!($label, log::Level::Debug, $ex)
    };
    ($label:expr, $log_level:expr, $ex:expr) => {{
        let now = std::time::Instant::now();
        let value = $ex;
        let elapsed = now.elapsed();
        log::log!($log_level, "{} took {} ms", $label, elapsed.as_millis());
        value
    }};
}

/// A type of value that we can create ranges of, where a range has a min and
/// max.
pub trait Rangeable:
    Copy
    + Debug
    + Display
    + PartialOrd
    + ops::Add<Self, Output = Self>
    + ops::Sub<Self, Output = Self>
    + ops::Mul<Self, Output = Self>
    + ops::Div<Self, Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
}

impl Rangeable for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }
}

/// A range between two numeric values, inclusive on both ends.
#[derive(Copy, Clone, Debug, Display, PartialEq)]
#[display(fmt = "[{}, {}]", min, max)]
pub struct NumRange<T: Rangeable> {
    pub min: T,
    pub max: T,
}

impl<T: Rangeable> NumRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Build a range from two bounds given in either order. The smaller one
    /// becomes the min.
    pub fn between(a: T, b: T) -> Self {
        if a <= b {
            Self::new(a, b)
        } else {
            Self::new(b, a)
        }
    }

    /// Get a [0,1] range for this type.
    pub fn normal_range() -> Self {
        Self::new(T::zero(), T::one())
    }

    /// Max minus min
    pub fn span(&self) -> T {
        self.max - self.min
    }

    /// Check if a value is in this range. Ranges are inclusive on both ends.
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Map a value from this range to the target range. If the span of this
    /// range is zero there's no meaningful mapping, so we return the
    /// **minimum** of the target range.
    pub fn map_to(&self, dest_range: &Self, value: T) -> T {
        let span = self.span();
        if span > T::zero() {
            let normalized = (value - self.min) / span;
            dest_range.min + (normalized * dest_range.span())
        } else {
            dest_range.min
        }
    }

    /// Map a value from this range to the range [0, 1]
    pub fn normalize(&self, value: T) -> T {
        self.map_to(&Self::normal_range(), value)
    }

    /// Force a value into this range.
    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

// allow generating samples in the range
impl<T: Rangeable + SampleUniform> SampleRange<T> for NumRange<T> {
    #[inline]
    fn sample_single<R: RngCore + ?Sized>(self, rng: &mut R) -> T {
        T::Sampler::sample_single_inclusive(self.min, self.max, rng)
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

/// Draw a float uniformly between two bounds, inclusive on both ends. The
/// bounds can be given in either order, and equal bounds just return that
/// value.
pub fn uniform(rng: &mut impl Rng, a: f64, b: f64) -> f64 {
    rng.gen_range(NumRange::between(a, b))
}

/// Roll a die that comes up true with the given chance. Chances at or below
/// zero never hit, at or above one always hit.
pub fn chance(rng: &mut impl Rng, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_map_to() {
        let source = NumRange::new(-1.0, 1.0);
        assert_approx_eq!(source.normalize(-1.0), 0.0);
        assert_approx_eq!(source.normalize(0.0), 0.5);
        assert_approx_eq!(source.normalize(1.0), 1.0);
        assert_approx_eq!(
            source.map_to(&NumRange::new(10.0, 20.0), 0.5),
            17.5
        );

        // Zero span falls back to the target min
        let empty = NumRange::new(3.0, 3.0);
        assert_approx_eq!(empty.map_to(&NumRange::new(1.0, 2.0), 3.0), 1.0);
    }

    #[test]
    fn test_clamp() {
        let range = NumRange::new(0.0, 1.0);
        assert_eq!(range.clamp(-0.5), 0.0);
        assert_eq!(range.clamp(0.25), 0.25);
        assert_eq!(range.clamp(1.5), 1.0);
        assert!(range.contains(1.0));
        assert!(!range.contains(1.01));
    }

    #[test]
    fn test_uniform() {
        let mut rng = Pcg64::seed_from_u64(7);
        for _ in 0..1000 {
            let v = uniform(&mut rng, 1.0, 4.0);
            assert!((1.0..=4.0).contains(&v), "{} out of range", v);

            // Reversed bounds are tolerated
            let v = uniform(&mut rng, 1.0, 0.2);
            assert!((0.2..=1.0).contains(&v), "{} out of range", v);
        }
        assert_eq!(uniform(&mut rng, 2.0, 2.0), 2.0);
    }

    #[test]
    fn test_chance() {
        let mut rng = Pcg64::seed_from_u64(7);
        assert!((0..100).all(|_| !chance(&mut rng, 0.0)));
        assert!((0..100).all(|_| chance(&mut rng, 1.0)));
    }
}
