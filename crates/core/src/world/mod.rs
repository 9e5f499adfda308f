pub mod collaborator;
mod generate;
pub mod graph;
pub mod grid;
pub mod object;

pub use self::{
    generate::PlacementError,
    grid::{Cell, Grid, GridMap, GridPoint},
    object::{Layer, LayerMask, ObjectKind, PlacedObject},
};

use crate::{
    timed,
    world::{collaborator::Collaborators, generate::WorldBuilder},
    WorldConfig,
};
use anyhow::{ensure, Context};
use log::info;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A fully generated world. Contains the final grid, everything that was
/// placed on it, and the configuration that was used to generate it.
///
/// ## Serialization
/// Worlds can be serialized and deserialized through multiple formats: JSON and
/// binary. The intermediate noise and falloff maps are not serialized, only
/// the final cell states.
///
/// ### JSON Format
/// The JSON format is fairly self-explanatory. All fields and enum values use
/// snake casing. Positions are `[x, y, z]` arrays, where Y is the vertical
/// axis, X is the grid column and Z is the grid row.
///
/// ### Binary Format
/// Worlds can be saved and exported in a binary format via [World::to_bin] and
/// reloaded via [World::from_bin]. Currently the binary format is
/// [CBOR](https://cbor.io/), but that is subject to change so beware of that if
/// you write other programs that load the format.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct World {
    /// The config used to generate this world. World generation is
    /// deterministic based on world config, and once the world has been
    /// generated, the config can never change.
    config: WorldConfig,

    /// Final state of every cell
    grid: Grid,

    /// Position of the camp's center
    camp: Point3<f64>,

    /// Where the player spawns. `None` if there was no open land left to
    /// spawn on.
    player: Option<Point3<f64>>,

    /// Number of rivers that were carved
    rivers: usize,

    /// Every placed object, including the camp, in placement order
    objects: Vec<PlacedObject>,
}

impl World {
    /// Get a reference to the config that defines this world.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Get the final grid of cells
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn camp(&self) -> Point3<f64> {
        self.camp
    }

    pub fn player(&self) -> Option<Point3<f64>> {
        self.player
    }

    pub fn rivers(&self) -> usize {
        self.rivers
    }

    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    /// Iterate over all placed objects of one kind
    pub fn objects_of(
        &self,
        kind: ObjectKind,
    ) -> impl Iterator<Item = &PlacedObject> {
        self.objects.iter().filter(move |object| object.kind == kind)
    }

    /// Generate a new world with the given config, using the default
    /// [Collaborators]. This operation could take several seconds, depending
    /// on the world size. Returns an error if the given config is invalid, or
    /// if the camp couldn't be placed (see [PlacementError]).
    pub fn generate(config: WorldConfig) -> anyhow::Result<Self> {
        Self::generate_with(config, Collaborators::default())
    }

    /// Generate a new world with the given config, talking to the given
    /// collaborators instead of the defaults. If generation fails after it
    /// has started, the event sink hears about it before the error is
    /// returned.
    pub fn generate_with(
        config: WorldConfig,
        collaborators: Collaborators,
    ) -> anyhow::Result<Self> {
        info!("Generating world with config {:#?}", config);

        config.validate().context("invalid config")?;
        ensure!(
            config.camp.size % 2 == 1,
            "invalid config: camp size must be odd, but was {}",
            config.camp.size
        );

        let mut builder = WorldBuilder::new(config, collaborators);
        let result = timed!(
            "World generation",
            log::Level::Info,
            builder.generate_world()
        );
        if let Err(err) = &result {
            builder.collaborators.events.generation_failed(err);
        }
        result?;
        builder.finish()
    }

    /// Deserialize a world from JSON. A world can be serialized into JSON with
    /// [World::to_json]. Will fail if the input is malformed.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("error deserializing world")
    }

    /// Serializes this world into JSON. This is a recoverable format, which can
    /// be loaded back into a [World] with [World::from_json].
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("error serializing world")
    }

    /// Deserialize a world from binary format. A world can be serialized into
    /// binary with [World::to_bin]. See the struct-level [World] documentation
    /// for a description of the binary format. Will fail if the input is
    /// malformed.
    #[cfg(feature = "bin")]
    pub fn from_bin(read: impl std::io::Read) -> anyhow::Result<Self> {
        serde_cbor::from_reader(read).context("error deserializing world")
    }

    /// Serializes this world into a binary format. This is a recoverable
    /// format, which can be loaded back into a [World] with [World::from_bin].
    /// See the struct-level [World] documentation for a description of the
    /// binary format.
    #[cfg(feature = "bin")]
    pub fn to_bin(&self) -> anyhow::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        serde_cbor::to_writer(&mut buffer, self)
            .context("error serializing world")?;
        Ok(buffer)
    }
}
