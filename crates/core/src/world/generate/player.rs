use crate::world::{
    generate::{Generate, WorldBuilder},
    grid::{Grid, GridPoint},
};
use anyhow::anyhow;
use log::{error, info};
use nalgebra::Point3;

/// How far above the ground the player spawns, so they don't clip into it
const SPAWN_LIFT: f64 = 1.0;

/// Spawns the player as far from the camp as possible, so that getting back
/// to it is the whole journey.
#[derive(Copy, Clone, Debug)]
pub struct PlayerGenerator;

impl Generate for PlayerGenerator {
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()> {
        let camp = world
            .camp
            .ok_or_else(|| anyhow!("camp must be placed before the player"))?;

        match find_player_spawn(&world.grid, &camp) {
            Some(cell) => {
                let x = f64::from(cell.x);
                let z = f64::from(cell.y);
                let height = world.collaborators.height.terrain_height_at(x, z);
                let position = Point3::new(x, height + SPAWN_LIFT, z);

                world.collaborators.events.player_spawned(&position);
                world.player = Some(position);
                info!("Player spawns at {}", cell);
            }
            // The world is still usable without a spawn point, so carry on
            None => error!("No open land to spawn the player on"),
        }
        Ok(())
    }
}

/// Find the open land cell farthest from the camp, measured on the horizontal
/// plane. The whole grid is scanned and the first of equally distant cells
/// wins, so the result only depends on the grid. `None` if there is no open
/// land at all.
pub fn find_player_spawn(
    grid: &Grid,
    camp: &Point3<f64>,
) -> Option<GridPoint> {
    let mut best: Option<(GridPoint, f64)> = None;
    for (point, cell) in grid.cells().iter() {
        if !cell.is_open_land() {
            continue;
        }

        let dx = f64::from(point.x) - camp.x;
        let dz = f64::from(point.y) - camp.z;
        let distance = (dx * dx + dz * dz).sqrt();
        match best {
            Some((_, best_distance)) if distance <= best_distance => {}
            _ => best = Some((point, distance)),
        }
    }
    best.map(|(point, _)| point)
}
