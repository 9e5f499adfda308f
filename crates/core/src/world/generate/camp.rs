use crate::{
    config::CampConfig,
    world::{
        generate::{Generate, WorldBuilder},
        grid::{Grid, GridPoint},
        object::{ObjectKind, PlacedObject},
    },
};
use derive_more::Display;
use log::{debug, info};
use nalgebra::Point3;
use rand::Rng;

/// Ways that placing a structure can fail. Either of these aborts generation,
/// since a world without a camp isn't playable.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum PlacementError {
    /// The footprint plus the margin on both sides is bigger than the world,
    /// so there's no position to even try
    #[display(
        fmt = "camp of size {} with margin {} does not fit in a world of \
               size {}",
        footprint,
        margin,
        size
    )]
    CampDoesNotFit { footprint: u16, margin: u16, size: u16 },

    /// Every attempt landed on water or an occupied cell
    #[display(fmt = "no valid camp position found in {} attempts", attempts)]
    CampNotFound { attempts: u32 },
}

impl std::error::Error for PlacementError {}

/// Places the camp: a square footprint of land, kept away from the edges of
/// the world. This must run before anything else is placed, since the camp
/// footprint reserves its cells.
#[derive(Copy, Clone, Debug)]
pub struct CampGenerator;

impl Generate for CampGenerator {
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()> {
        let config = &world.config.camp;
        let center = place_camp(&world.grid, config, &mut world.rng)?;
        let half = config.size / 2;

        for point in footprint(center, half) {
            world.grid.mark_occupied(point);
        }

        let x = f64::from(center.x);
        let z = f64::from(center.y);
        let height = world.collaborators.height.terrain_height_at(x, z);
        let position = Point3::new(x, height, z);

        world.collaborators.spatial.insert(
            position,
            f64::from(half),
            ObjectKind::Camp.layer(),
        );
        world.objects.push(PlacedObject {
            kind: ObjectKind::Camp,
            variant: config.asset.clone(),
            position,
            rotation: 0.0,
            scale: ObjectKind::Camp.scale_range().min,
        });
        world.collaborators.events.camp_placed(&position);
        world.camp = Some(position);

        info!("Placed camp at {}", center);
        Ok(())
    }
}

/// All cells in the square of the given half-width around a center, row by
/// row. The caller has to make sure the square fits on the grid.
fn footprint(center: GridPoint, half: u16) -> impl Iterator<Item = GridPoint> {
    (center.y - half..=center.y + half).flat_map(move |y| {
        (center.x - half..=center.x + half).map(move |x| GridPoint::new(x, y))
    })
}

/// Find a center for the camp by trying random positions until one has a
/// footprint of nothing but open land. The grid isn't modified. Centers are
/// drawn from `[half + margin, size - half - margin)` on each axis, which
/// keeps the whole footprint at least `margin` cells from every edge.
pub fn place_camp(
    grid: &Grid,
    config: &CampConfig,
    rng: &mut impl Rng,
) -> Result<GridPoint, PlacementError> {
    let half = config.size / 2;
    let low = u32::from(half) + u32::from(config.boundary_margin);
    let high = u32::from(grid.size())
        .saturating_sub(u32::from(half))
        .saturating_sub(u32::from(config.boundary_margin));
    if low >= high {
        return Err(PlacementError::CampDoesNotFit {
            footprint: config.size,
            margin: config.boundary_margin,
            size: grid.size(),
        });
    }

    for attempt in 1..=config.max_attempts {
        // Both bounds come from u16 values, so the casts are lossless
        let center = GridPoint::new(
            rng.gen_range(low..high) as u16,
            rng.gen_range(low..high) as u16,
        );
        if footprint(center, half).all(|point| grid.is_open_land(point)) {
            debug!("Camp site {} found on attempt {}", center, attempt);
            return Ok(center);
        }
    }

    Err(PlacementError::CampNotFound {
        attempts: config.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::grid::{scan, Cell};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn camp_config(size: u16, margin: u16) -> CampConfig {
        CampConfig {
            size,
            boundary_margin: margin,
            ..Default::default()
        }
    }

    #[test]
    fn test_only_one_position() {
        let grid = Grid::new(5);
        let center = place_camp(
            &grid,
            &camp_config(3, 1),
            &mut Pcg64::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(center, GridPoint::new(2, 2));

        let cells: Vec<GridPoint> = footprint(center, 1).collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells.first(), Some(&GridPoint::new(1, 1)));
        assert_eq!(cells.last(), Some(&GridPoint::new(3, 3)));
    }

    #[test]
    fn test_footprint_avoids_water() {
        let mut grid = Grid::new(20);
        // Flood everything except a 5x5 square centered on (12, 7), which
        // leaves 9 valid centers for a 3x3 camp
        for point in scan(20) {
            let dx = i32::from(point.x) - 12;
            let dy = i32::from(point.y) - 7;
            if dx.abs() > 2 || dy.abs() > 2 {
                grid.mark_water(point);
            }
        }

        let center = place_camp(
            &grid,
            &camp_config(3, 2),
            &mut Pcg64::seed_from_u64(5),
        )
        .unwrap();
        assert!((11..=13).contains(&center.x), "bad center {}", center);
        assert!((6..=8).contains(&center.y), "bad center {}", center);
        assert!(footprint(center, 1).all(|point| grid.is_open_land(point)));
    }

    #[test]
    fn test_all_water() {
        let mut grid = Grid::new(10);
        for point in scan(10) {
            grid.mark_water(point);
        }
        assert_eq!(grid.count(Cell::is_water), 100);

        let result = place_camp(
            &grid,
            &CampConfig {
                max_attempts: 20,
                ..camp_config(3, 1)
            },
            &mut Pcg64::seed_from_u64(0),
        );
        assert_eq!(result, Err(PlacementError::CampNotFound { attempts: 20 }));
    }

    #[test]
    fn test_does_not_fit() {
        let grid = Grid::new(6);
        let result = place_camp(
            &grid,
            &camp_config(5, 1),
            &mut Pcg64::seed_from_u64(0),
        );
        assert_eq!(
            result,
            Err(PlacementError::CampDoesNotFit {
                footprint: 5,
                margin: 1,
                size: 6
            })
        );
    }
}
