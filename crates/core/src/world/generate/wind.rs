use crate::{
    util::chance,
    world::{
        generate::{
            scatter::{has_variants, open_cells, place_object, Placement},
            Generate, WorldBuilder,
        },
        object::ObjectKind,
    },
};
use log::info;

/// Sprinkles ambient wind effects over open land. These don't do anything
/// besides look nice, but they still can't overlap trees or plants.
#[derive(Copy, Clone, Debug)]
pub struct WindGenerator;

impl Generate for WindGenerator {
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()> {
        if !has_variants(world, ObjectKind::Wind) {
            return Ok(());
        }

        let spawn_chance = world.config.scatter.wind_spawn_chance;
        let placement =
            Placement::new(ObjectKind::Wind, Placement::NATURE_JITTER);
        let mut placed = 0;
        for cell in open_cells(world) {
            if chance(&mut world.rng, spawn_chance)
                && place_object(world, placement, cell)
            {
                placed += 1;
            }
        }

        info!("Placed {} wind effects", placed);
        Ok(())
    }
}
