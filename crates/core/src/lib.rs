//! Isle is a procedural island generator. This crate contains all the core
//! generation logic: a noise-shaped land/water mask, rivers carved across it
//! by pathfinding, and then a camp, a player spawn point and a scattering of
//! trees, plants and wind effects. Presentation layers (meshes, rendering,
//! physics) are left to whoever consumes the [World].
//!
//! ```no_run
//! use isle::{World, WorldConfig};
//!
//! let config = WorldConfig {
//!     size: 50,
//!     ..Default::default()
//! };
//! let world = World::generate(config).unwrap();
//! println!("{} objects placed", world.objects().len());
//! // From here you can display/use the world however you like.
//! ```
//!
//! Generation can fail if the island leaves no room for the camp, so real
//! callers should handle the error rather than unwrapping it.
//!
//! See [WorldConfig] for details on how the world generation can be
//! customized, and [Collaborators] for how to plug in your own terrain
//! height, collision and pathfinding systems.

mod config;
mod util;
mod world;

pub use crate::{
    config::{
        AssetConfig, CampConfig, GroundCoverConfig, RiverConfig, ScatterConfig,
        Seed, TerrainConfig, WorldConfig,
    },
    util::NumRange,
    world::{
        collaborator::{
            Collaborators, FlatTerrain, GenerationEvents, HeightQuery,
            NoEvents, SpatialHash, SpatialQuery,
        },
        graph::{GraphNode, GridGraph, PathGraph},
        Cell, Grid, GridMap, GridPoint, Layer, LayerMask, ObjectKind,
        PlacedObject, PlacementError, World,
    },
};
