use crate::world::{
    generate::{
        noise::{falloff_map, NoiseField},
        Generate, WorldBuilder,
    },
    grid::{scan, Grid},
};
use log::info;

/// Generates the land/water mask. Terrain noise is pushed down towards the
/// edges of the world by a falloff curve, and anything that ends up below
/// the water level is water. This gives roughly one island in the middle of
/// the world, surrounded by ocean.
#[derive(Copy, Clone, Debug)]
pub struct TerrainGenerator;

impl Generate for TerrainGenerator {
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()> {
        let config = world.config.terrain;
        let size = world.grid.size();
        let noise = NoiseField::new(
            world.noise_fn.clone(),
            config.noise_scale,
            config.offset_range,
            &mut world.rng,
        );

        *world.grid.noise_map_mut() = noise.to_map(size);
        *world.grid.falloff_map_mut() = falloff_map(size);

        let water = classify(&mut world.grid, config.water_level);
        info!(
            "Classified {} of {} cells as water",
            water,
            world.grid.cells().len()
        );
        Ok(())
    }
}

/// Mark every cell whose noise minus falloff is below the water level as
/// water, using the maps already stored on the grid. Returns the number of
/// water cells afterwards.
pub fn classify(grid: &mut Grid, water_level: f64) -> usize {
    for point in scan(grid.size()) {
        let noise = grid.noise_map().get(point).copied().unwrap_or(0.0);
        let falloff = grid.falloff_map().get(point).copied().unwrap_or(0.0);
        if noise - falloff < water_level {
            grid.mark_water(point);
        }
    }
    grid.count(|cell| cell.is_water())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Seed, WorldConfig},
        world::{
            collaborator::Collaborators,
            generate::river::RiverGenerator,
            grid::{GridMap, GridPoint},
        },
    };

    #[test]
    fn test_single_water_cell() {
        let mut grid = Grid::new(10);
        *grid.noise_map_mut() = GridMap::from_fn(10, |point| {
            if point == GridPoint::new(0, 0) {
                0.1
            } else {
                0.9
            }
        });
        *grid.falloff_map_mut() = GridMap::filled(10, 0.0);

        assert_eq!(classify(&mut grid, 0.5), 1);
        assert!(grid.cell(GridPoint::new(0, 0)).unwrap().is_water());
        assert!(!grid.cell(GridPoint::new(1, 0)).unwrap().is_water());
    }

    #[test]
    fn test_single_water_cell_survives_zero_rivers() {
        let mut config = WorldConfig::default();
        config.seed = Seed::Int(9);
        config.size = 10;
        config.river.count = 0;
        config.river.edge_margin = 2;
        let mut world = WorldBuilder::new(config, Collaborators::default());

        *world.grid.noise_map_mut() = GridMap::from_fn(10, |point| {
            if point == GridPoint::new(0, 0) {
                0.1
            } else {
                0.9
            }
        });
        *world.grid.falloff_map_mut() = GridMap::filled(10, 0.0);
        assert_eq!(classify(&mut world.grid, 0.5), 1);
        let classified = world.grid.cells().clone();

        RiverGenerator.generate(&mut world).unwrap();
        assert_eq!(world.rivers, 0);
        assert_eq!(world.grid.cells(), &classified);
        assert!(world.grid.cell(GridPoint::new(0, 0)).unwrap().is_water());
    }

    #[test]
    fn test_falloff_drowns_land() {
        // Same noise everywhere, so only the falloff decides
        let mut grid = Grid::new(10);
        *grid.noise_map_mut() = GridMap::filled(10, 0.8);
        *grid.falloff_map_mut() = falloff_map(10);
        classify(&mut grid, 0.4);

        assert!(!grid.cell(GridPoint::new(5, 5)).unwrap().is_water());
        assert!(grid.cell(GridPoint::new(0, 0)).unwrap().is_water());
        assert!(grid.cell(GridPoint::new(0, 5)).unwrap().is_water());
    }

    #[test]
    fn test_boundary_is_land() {
        // Exactly at the water level isn't below it
        let mut grid = Grid::new(2);
        *grid.noise_map_mut() = GridMap::filled(2, 0.5);
        *grid.falloff_map_mut() = GridMap::filled(2, 0.0);
        assert_eq!(classify(&mut grid, 0.5), 0);
    }
}
