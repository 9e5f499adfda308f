mod camp;
mod noise;
mod player;
mod river;
mod scatter;
mod terrain;
mod wind;

pub use self::camp::PlacementError;

use crate::{
    config::WorldConfig,
    timed,
    world::{
        collaborator::Collaborators,
        generate::{
            camp::CampGenerator,
            player::PlayerGenerator,
            river::RiverGenerator,
            scatter::{GroundCoverGenerator, NatureGenerator, TreeGenerator},
            terrain::TerrainGenerator,
            wind::WindGenerator,
        },
        grid::Grid,
        object::PlacedObject,
        World,
    },
};
use ::noise::{Perlin, Seedable};
use anyhow::{anyhow, Context};
use log::info;
use nalgebra::Point3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::fmt::Debug;

/// A container for generating a new world. This applies a series of generators
/// in sequence to create the world. These fields are public to allow for
/// disjoint borrowing of multiple fields at once.
pub struct WorldBuilder {
    /// This config determinisitically controls world generation, meaning two
    /// worlds with the same config will always be identical (provided they
    /// were generated on the same version of the code, with the same
    /// collaborators).
    ///
    /// This is public to allow for disjoint borrowing, but please **do not
    /// mutate the config**.
    pub config: WorldConfig,

    /// RNG provider. Every random draw in generation comes from here.
    pub rng: Pcg64,

    /// The shared Perlin function. Each noise field samples a different region
    /// of it, see [noise::NoiseField].
    pub noise_fn: Perlin,

    /// All the cells in the world. Cells get mutated during generation, but
    /// the grid never changes size.
    pub grid: Grid,

    /// Everything generation talks to that lives outside of it
    pub collaborators: Collaborators,

    /// Camp position. Populated by [CampGenerator], and guaranteed to be
    /// populated after that.
    pub camp: Option<Point3<f64>>,

    /// Player spawn position. Populated by [PlayerGenerator], if there's
    /// anywhere to spawn.
    pub player: Option<Point3<f64>>,

    /// Number of rivers actually carved
    pub rivers: usize,

    /// Every object placed so far, in placement order
    pub objects: Vec<PlacedObject>,
}

impl WorldBuilder {
    pub fn new(config: WorldConfig, collaborators: Collaborators) -> Self {
        let mut rng = Pcg64::seed_from_u64(config.seed.to_u64());
        // One Perlin function per run. Fields built from it are decorrelated
        // by their offsets, not by their seeds.
        let noise_fn = Perlin::new().set_seed(rng.gen());
        let grid = timed!("World initialization", Grid::new(config.size));

        info!("Initialized world with {} cells", grid.cells().len());
        Self {
            config,
            rng,
            noise_fn,
            grid,
            collaborators,
            camp: None,
            player: None,
            rivers: 0,
            objects: Vec::new(),
        }
    }

    /// Generate a world by running a series of generation steps sequentially.
    /// Must be run from a blank slate.
    pub fn generate_world(&mut self) -> anyhow::Result<()> {
        // Run each generation step. The order is very important!
        self.apply_generator(TerrainGenerator)?;
        self.apply_generator(RiverGenerator)?;
        self.apply_generator(CampGenerator)?;
        self.apply_generator(PlayerGenerator)?;
        self.apply_generator(GroundCoverGenerator)?;
        self.apply_generator(TreeGenerator)?;
        self.apply_generator(NatureGenerator)?;
        self.apply_generator(WindGenerator)?;
        Ok(())
    }

    /// Finalize this builder into a [World]. Returns an error if generation
    /// didn't get far enough to place the camp.
    pub fn finish(self) -> anyhow::Result<World> {
        let camp = self
            .camp
            .ok_or_else(|| anyhow!("camp not initialized"))?;
        Ok(World {
            config: self.config,
            grid: self.grid,
            camp,
            player: self.player,
            rivers: self.rivers,
            objects: self.objects,
        })
    }

    /// A helper to run a generation step on this builder.
    fn apply_generator(
        &mut self,
        generator: impl Debug + Generate,
    ) -> anyhow::Result<()> {
        timed!(&format!("{:?}", generator), generator.generate(self))
            .with_context(|| format!("error in {:?}", generator))
    }
}

/// A type that generates some sort of data for the world. Generators run in a
/// fixed sequence, each one reading what the previous ones produced and
/// adding its own data on top.
trait Generate {
    /// Apply some generation step to the given world. This can mutate the
    /// grid's cells and add placed objects, but can never resize the grid.
    /// Recoverable problems (a river with no path, an object that doesn't
    /// fit) are logged and skipped. An error from here means the world can't
    /// be completed at all.
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()>;
}
