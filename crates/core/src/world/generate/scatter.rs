//! Scattering of decorations over open land. Every decoration goes through
//! [place_object], which does the rejection sampling against the spatial
//! index. Nothing in here touches cell occupancy, only the spatial index.

use crate::{
    util::{chance, uniform},
    world::{
        generate::{noise::NoiseField, Generate, WorldBuilder},
        grid::{scan, GridPoint},
        object::{LayerMask, ObjectKind, PlacedObject},
    },
};
use log::{debug, info, warn};
use nalgebra::Point3;
use rand::{seq::SliceRandom, Rng};

/// How a single instance gets positioned relative to its cell
#[derive(Copy, Clone, Debug)]
pub(super) struct Placement {
    pub kind: ObjectKind,
    /// Max random offset from the cell along each horizontal axis. Zero means
    /// the object sits exactly on the cell.
    pub jitter: f64,
    /// Extra height above the terrain surface
    pub lift: f64,
}

impl Placement {
    /// Small decorations get nudged around within their cell
    pub const NATURE_JITTER: f64 = 0.4;

    pub fn new(kind: ObjectKind, jitter: f64) -> Self {
        Self {
            kind,
            jitter,
            lift: 0.0,
        }
    }
}

/// Try to place a single object near the given cell. The candidate position
/// is rejected if it overlaps anything on the layers in the kind's collision
/// mask. Rejected placements are dropped, not retried. Returns `true` if the
/// object was placed.
pub(super) fn place_object(
    world: &mut WorldBuilder,
    placement: Placement,
    cell: GridPoint,
) -> bool {
    let Placement { kind, jitter, lift } = placement;
    let (mut x, mut z) = (f64::from(cell.x), f64::from(cell.y));
    if jitter > 0.0 {
        x += uniform(&mut world.rng, -jitter, jitter);
        z += uniform(&mut world.rng, -jitter, jitter);
    }
    let height = world.collaborators.height.terrain_height_at(x, z) + lift;
    let position = Point3::new(x, height, z);

    let radius = kind.collision_radius();
    let mask = kind.collision_mask();
    if mask != LayerMask::NONE
        && world
            .collaborators
            .spatial
            .has_collision_near(position, radius, mask)
    {
        debug!("Rejected {} at {} (collision)", kind, position);
        return false;
    }

    let variants = kind.variants(&world.config.assets);
    let variant = match variants.choose(&mut world.rng) {
        Some(variant) => variant.clone(),
        None => return false,
    };
    let rotation = uniform(&mut world.rng, 0.0, 360.0);
    let scale = world.rng.gen_range(kind.scale_range());

    // Zero-radius objects can't block anything, so they stay out of the index
    if radius > 0.0 {
        world
            .collaborators
            .spatial
            .insert(position, radius, kind.layer());
    }
    world.objects.push(PlacedObject {
        kind,
        variant,
        position,
        rotation,
        scale,
    });
    true
}

/// Check that a kind has at least one asset variant to pick from, and warn if
/// it doesn't. Kinds without variants get skipped.
pub(super) fn has_variants(world: &WorldBuilder, kind: ObjectKind) -> bool {
    let has_variants = !kind.variants(&world.config.assets).is_empty();
    if !has_variants {
        warn!("No asset variants configured for {}, skipping it", kind);
    }
    has_variants
}

/// All cells that decorations may go on, in scan order
pub(super) fn open_cells(world: &WorldBuilder) -> Vec<GridPoint> {
    scan(world.grid.size())
        .filter(|point| world.grid.is_open_land(*point))
        .collect()
}

/// Lays down a carpet of grass everywhere there's open land. Ground cover
/// doesn't collide with anything and nothing collides with it.
#[derive(Copy, Clone, Debug)]
pub struct GroundCoverGenerator;

impl GroundCoverGenerator {
    const JITTER: f64 = 0.5;
    /// Keeps the carpet from z-fighting with the terrain
    const LIFT: f64 = 0.1;
}

impl Generate for GroundCoverGenerator {
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()> {
        let config = world.config.scatter.ground_cover;
        if !config.enabled || !has_variants(world, ObjectKind::GroundCover) {
            return Ok(());
        }

        let placement = Placement {
            kind: ObjectKind::GroundCover,
            jitter: Self::JITTER,
            lift: Self::LIFT,
        };
        let mut placed = 0;
        for cell in open_cells(world) {
            let count =
                uniform(&mut world.rng, 1.0, config.density * 10.0).floor();
            for _ in 0..(count as usize) {
                if place_object(world, placement, cell) {
                    placed += 1;
                }
            }
        }

        info!("Placed {} ground cover instances", placed);
        Ok(())
    }
}

/// Places trees in clumps. A dedicated noise field makes some areas dense
/// forest and others mostly clear.
#[derive(Copy, Clone, Debug)]
pub struct TreeGenerator;

impl Generate for TreeGenerator {
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()> {
        if !has_variants(world, ObjectKind::Tree) {
            return Ok(());
        }

        let config = world.config.scatter;
        let noise = NoiseField::new(
            world.noise_fn.clone(),
            config.tree_noise_scale,
            world.config.terrain.offset_range,
            &mut world.rng,
        );
        let placement = Placement::new(ObjectKind::Tree, 0.0);

        let mut placed = 0;
        for cell in open_cells(world) {
            let threshold = uniform(&mut world.rng, 0.0, config.tree_density);
            if noise.sample(cell) < threshold
                && place_object(world, placement, cell)
            {
                world.grid.mark_tree(cell);
                placed += 1;
            }
        }

        info!("Placed {} trees", placed);
        Ok(())
    }
}

/// Scatters the small stuff: grass tufts, flowers, small plants and rocks.
#[derive(Copy, Clone, Debug)]
pub struct NatureGenerator;

impl NatureGenerator {
    /// Grass attempts per cell scale with `grass_density` times this
    const GRASS_FACTOR: f64 = 5.0;
}

impl Generate for NatureGenerator {
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()> {
        let config = world.config.scatter;
        let grass = has_variants(world, ObjectKind::Grass);
        // The rolls for each kind, paired with whether that kind is enabled
        let extras = [
            (ObjectKind::Flower, config.flower_spawn_chance),
            (ObjectKind::SmallPlant, config.small_plant_spawn_chance),
            (ObjectKind::Rock, config.rock_spawn_chance),
        ]
        .map(|(kind, chance)| (kind, chance, has_variants(world, kind)));
        let max_grass = config.grass_density
            * Self::GRASS_FACTOR
            * config.grass_spawn_multiplier;

        let mut placed = 0;
        for cell in open_cells(world) {
            let count = uniform(&mut world.rng, 1.0, max_grass).floor();
            if grass {
                let placement =
                    Placement::new(ObjectKind::Grass, Placement::NATURE_JITTER);
                for _ in 0..(count as usize) {
                    if place_object(world, placement, cell) {
                        placed += 1;
                    }
                }
            }

            for (kind, spawn_chance, enabled) in extras {
                if chance(&mut world.rng, spawn_chance)
                    && enabled
                    && place_object(
                        world,
                        Placement::new(kind, Placement::NATURE_JITTER),
                        cell,
                    )
                {
                    placed += 1;
                }
            }
        }

        info!("Placed {} nature elements", placed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Seed, WorldConfig},
        world::{
            collaborator::Collaborators,
            grid::Cell,
            object::Layer,
        },
    };

    fn builder(size: u16) -> WorldBuilder {
        let mut config = WorldConfig::default();
        config.seed = Seed::Int(1234);
        config.size = size;
        WorldBuilder::new(config, Collaborators::default())
    }

    fn count(world: &WorldBuilder, kind: ObjectKind) -> usize {
        world.objects.iter().filter(|obj| obj.kind == kind).count()
    }

    #[test]
    fn test_place_object_rejects_overlap() {
        let mut world = builder(10);
        let cell = GridPoint::new(4, 4);
        world.collaborators.spatial.insert(
            Point3::new(4.0, 0.0, 4.0),
            1.0,
            Layer::Nature,
        );

        let tree = Placement::new(ObjectKind::Tree, 0.0);
        assert!(!place_object(&mut world, tree, cell));
        assert!(place_object(&mut world, tree, GridPoint::new(7, 7)));
        // The tree we just placed now blocks the same spot
        assert!(!place_object(&mut world, tree, GridPoint::new(7, 7)));
        assert_eq!(count(&world, ObjectKind::Tree), 1);
    }

    #[test]
    fn test_ground_cover_ignores_collisions() {
        let mut world = builder(10);
        world.collaborators.spatial.insert(
            Point3::new(4.0, 0.0, 4.0),
            5.0,
            Layer::Camp,
        );
        let placement = Placement {
            kind: ObjectKind::GroundCover,
            jitter: 0.5,
            lift: 0.1,
        };
        for _ in 0..10 {
            assert!(place_object(&mut world, placement, GridPoint::new(4, 4)));
        }

        for object in &world.objects {
            assert!((3.5..=4.5).contains(&object.position.x));
            assert!((3.5..=4.5).contains(&object.position.z));
            assert!((object.position.y - 0.1).abs() < 1e-9);
            assert_eq!(object.scale, 0.5);
        }
    }

    #[test]
    fn test_placed_attributes() {
        let mut world = builder(20);
        NatureGenerator.generate(&mut world).unwrap();
        assert!(!world.objects.is_empty());

        let assets = world.config.assets.clone();
        for object in &world.objects {
            assert!(object.kind.variants(&assets).contains(&object.variant));
            assert!((0.0..=360.0).contains(&object.rotation));
            assert!(object.kind.scale_range().contains(object.scale));
        }
    }

    #[test]
    fn test_trees_mark_cells() {
        let mut world = builder(30);
        world.config.scatter.tree_density = 1.0;
        TreeGenerator.generate(&mut world).unwrap();

        let trees = count(&world, ObjectKind::Tree);
        assert!(trees > 0);
        assert_eq!(world.grid.count(Cell::has_tree), trees);
        for object in &world.objects {
            let cell = GridPoint::new(
                object.position.x as u16,
                object.position.z as u16,
            );
            assert!(world.grid.cell(cell).unwrap().has_tree());
        }
    }

    #[test]
    fn test_nothing_on_closed_cells() {
        let mut world = builder(6);
        for point in scan(6) {
            if point.x < 3 {
                world.grid.mark_water(point);
            } else {
                world.grid.mark_occupied(point);
            }
        }
        GroundCoverGenerator.generate(&mut world).unwrap();
        TreeGenerator.generate(&mut world).unwrap();
        NatureGenerator.generate(&mut world).unwrap();
        assert!(world.objects.is_empty());
    }

    #[test]
    fn test_empty_variants_skip_kind() {
        let mut world = builder(10);
        world.config.assets.grass.clear();
        world.config.scatter.rock_spawn_chance = 1.0;
        GroundCoverGenerator.generate(&mut world).unwrap();
        NatureGenerator.generate(&mut world).unwrap();

        assert_eq!(count(&world, ObjectKind::GroundCover), 0);
        assert_eq!(count(&world, ObjectKind::Grass), 0);
        assert!(count(&world, ObjectKind::Rock) > 0);
    }
}
