//! Seams between world generation and the systems around it. Generation
//! needs to ask a few questions it can't answer by itself (how high is the
//! ground here? is something already standing here?) and needs to tell
//! interested parties what happened. Each of those is a trait, with a default
//! implementation that's good enough when nothing external is plugged in.

use crate::world::{
    graph::{GridGraph, PathGraph},
    object::{Layer, LayerMask},
};
use fnv::FnvBuildHasher;
use nalgebra::Point3;
use std::collections::HashMap;

/// Resolves the height of the terrain surface at a point in world space.
/// Implementations should return 0.0 when there's no surface to hit, rather
/// than failing.
pub trait HeightQuery {
    fn terrain_height_at(&self, x: f64, z: f64) -> f64;
}

/// A perfectly flat surface at a constant height. Generated land has no
/// relief, so this is what the default pipeline uses.
#[derive(Copy, Clone, Debug, Default)]
pub struct FlatTerrain {
    pub height: f64,
}

impl HeightQuery for FlatTerrain {
    fn terrain_height_at(&self, _x: f64, _z: f64) -> f64 {
        self.height
    }
}

impl<F: Fn(f64, f64) -> f64> HeightQuery for F {
    fn terrain_height_at(&self, x: f64, z: f64) -> f64 {
        self(x, z)
    }
}

/// Tracks placed instances as spheres, so that new placements can be
/// rejected if they would overlap something already in the world.
pub trait SpatialQuery {
    /// Would a sphere of `radius` at `position` overlap any registered
    /// sphere on one of the `mask` layers?
    fn has_collision_near(
        &self,
        position: Point3<f64>,
        radius: f64,
        mask: LayerMask,
    ) -> bool;

    /// Register a placed instance
    fn insert(&mut self, position: Point3<f64>, radius: f64, layer: Layer);
}

#[derive(Copy, Clone, Debug)]
struct Sphere {
    center: Point3<f64>,
    radius: f64,
    layer: Layer,
}

/// A [SpatialQuery] that hashes spheres into square buckets on the
/// horizontal plane. Queries only look at the buckets that could possibly
/// hold an overlapping sphere.
#[derive(Clone, Debug)]
pub struct SpatialHash {
    bucket_size: f64,
    buckets: HashMap<(i64, i64), Vec<Sphere>, FnvBuildHasher>,
    /// Largest radius registered so far. Any sphere that overlaps a query
    /// has its center within `query radius + max_radius`.
    max_radius: f64,
    len: usize,
}

impl SpatialHash {
    const DEFAULT_BUCKET_SIZE: f64 = 2.0;

    pub fn new(bucket_size: f64) -> Self {
        Self {
            bucket_size,
            buckets: HashMap::default(),
            max_radius: 0.0,
            len: 0,
        }
    }

    /// Number of registered spheres
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bucket_coord(&self, value: f64) -> i64 {
        (value / self.bucket_size).floor() as i64
    }
}

impl Default for SpatialHash {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BUCKET_SIZE)
    }
}

impl SpatialQuery for SpatialHash {
    fn has_collision_near(
        &self,
        position: Point3<f64>,
        radius: f64,
        mask: LayerMask,
    ) -> bool {
        let reach = radius + self.max_radius;
        let (min_x, max_x) = (
            self.bucket_coord(position.x - reach),
            self.bucket_coord(position.x + reach),
        );
        let (min_z, max_z) = (
            self.bucket_coord(position.z - reach),
            self.bucket_coord(position.z + reach),
        );

        (min_x..=max_x)
            .flat_map(|bx| (min_z..=max_z).map(move |bz| (bx, bz)))
            .filter_map(|key| self.buckets.get(&key))
            .flatten()
            .any(|sphere| {
                mask.contains(sphere.layer)
                    && nalgebra::distance(&sphere.center, &position)
                        < sphere.radius + radius
            })
    }

    fn insert(&mut self, position: Point3<f64>, radius: f64, layer: Layer) {
        let key = (
            self.bucket_coord(position.x),
            self.bucket_coord(position.z),
        );
        self.buckets.entry(key).or_default().push(Sphere {
            center: position,
            radius,
            layer,
        });
        self.max_radius = self.max_radius.max(radius);
        self.len += 1;
    }
}

/// Receives notifications about milestones in generation. This is how
/// outside systems (UI messages, spawning the player controller, etc.) hear
/// about the result without generation knowing anything about them. Every
/// method has a no-op default.
pub trait GenerationEvents {
    fn camp_placed(&mut self, _position: &Point3<f64>) {}

    fn player_spawned(&mut self, _position: &Point3<f64>) {}

    /// Called once if generation fails, with the error that's about to be
    /// returned
    fn generation_failed(&mut self, _error: &anyhow::Error) {}
}

/// A [GenerationEvents] that ignores everything
#[derive(Copy, Clone, Debug, Default)]
pub struct NoEvents;

impl GenerationEvents for NoEvents {}

/// Everything outside of world generation that generation talks to. The
/// [Default] implementation wires up the in-crate implementations.
pub struct Collaborators {
    pub height: Box<dyn HeightQuery>,
    pub spatial: Box<dyn SpatialQuery>,
    pub graph: Box<dyn PathGraph>,
    pub events: Box<dyn GenerationEvents>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            height: Box::new(FlatTerrain::default()),
            spatial: Box::new(SpatialHash::default()),
            graph: Box::new(GridGraph::default()),
            events: Box::new(NoEvents),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_terrain() {
        let terrain = FlatTerrain { height: 2.5 };
        assert_eq!(terrain.terrain_height_at(10.0, -3.0), 2.5);

        let sloped = |x: f64, z: f64| x + z;
        assert_eq!(sloped.terrain_height_at(1.0, 2.0), 3.0);
    }

    #[test]
    fn test_spatial_hash_overlap() {
        let mut index = SpatialHash::default();
        let nature = Layer::Camp | Layer::Nature;
        index.insert(Point3::new(10.0, 0.0, 10.0), 0.5, Layer::Nature);
        assert_eq!(index.len(), 1);

        // Sum of radii is 0.75, so 0.7 away overlaps, 0.8 doesn't
        assert!(index.has_collision_near(
            Point3::new(10.7, 0.0, 10.0),
            0.25,
            nature
        ));
        assert!(!index.has_collision_near(
            Point3::new(10.8, 0.0, 10.0),
            0.25,
            nature
        ));
        // Touching exactly isn't an overlap
        assert!(!index.has_collision_near(
            Point3::new(10.0, 0.0, 11.0),
            0.5,
            nature
        ));
    }

    #[test]
    fn test_spatial_hash_across_buckets() {
        let mut index = SpatialHash::new(1.0);
        // A big sphere in one bucket reaches well into its neighbors
        index.insert(Point3::new(0.5, 0.0, 0.5), 2.5, Layer::Camp);
        assert!(index.has_collision_near(
            Point3::new(2.9, 0.0, 0.5),
            0.25,
            LayerMask::from(Layer::Camp)
        ));
        assert!(index.has_collision_near(
            Point3::new(-1.5, 0.0, -1.0),
            0.25,
            LayerMask::from(Layer::Camp)
        ));
    }

    #[test]
    fn test_spatial_hash_mask() {
        let mut index = SpatialHash::default();
        index.insert(Point3::new(0.0, 0.0, 0.0), 1.0, Layer::Effect);
        let position = Point3::new(0.0, 0.0, 0.0);
        assert!(!index.has_collision_near(
            position,
            1.0,
            Layer::Camp | Layer::Nature
        ));
        assert!(index.has_collision_near(
            position,
            1.0,
            LayerMask::from(Layer::Effect)
        ));
    }
}
