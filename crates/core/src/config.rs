mod seed;

pub use seed::Seed;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Configuration that defines a world gen process. Two worlds generated with
/// the same config will always be identical.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WorldConfig {
    /// RNG seed to use for all randomized processes during world gen. See
    /// [Seed] for the accepted formats.
    pub seed: Seed,

    /// Width and height of the square world, in cells.
    #[validate(range(min = 1, max = 4096))]
    pub size: u16,

    /// Config for land/water classification
    #[validate]
    pub terrain: TerrainConfig,

    /// Config for river carving
    #[validate]
    pub river: RiverConfig,

    /// Config for the camp structure
    #[validate]
    pub camp: CampConfig,

    /// Config for scattered decorations (trees, plants, wind, etc.)
    #[validate]
    pub scatter: ScatterConfig,

    /// Names of the asset variants available for each decoration kind
    pub assets: AssetConfig,
}

/// Configuration for the noise + falloff land mask.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TerrainConfig {
    /// Any cell whose noise value, minus its falloff value, is below this
    /// becomes water. Higher values mean less land.
    #[validate(range(min = 0.0, max = 1.0), custom = "finite")]
    pub water_level: f64,

    /// Multiplier applied to cell coordinates before sampling noise. Smaller
    /// values give smoother, larger landforms.
    #[validate(range(min = 0.0, max = 10.0), custom = "finite")]
    pub noise_scale: f64,

    /// Noise offsets are drawn from `[-offset_range, offset_range]` for each
    /// noise field, so that independent fields don't line up.
    #[validate(range(min = 0.0, max = 1e6), custom = "finite")]
    pub offset_range: f64,
}

/// Configuration for river carving.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RiverConfig {
    /// Number of rivers to attempt. Some attempts may be skipped, so this is
    /// an upper bound on the number of rivers that actually get carved.
    pub count: u16,

    /// Rivers start and end this many cells away from the corners of the
    /// world, along the bottom and top rows respectively.
    pub edge_margin: u16,

    /// Chance that each step of a river also floods one neighboring cell,
    /// which makes river widths vary.
    #[validate(range(min = 0.0, max = 1.0), custom = "finite")]
    pub deviation_chance: f64,
}

/// Configuration for the camp, the one structure placed in the world.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CampConfig {
    /// Side length of the square camp footprint, in cells. Must be odd so
    /// the footprint has a center cell.
    #[validate(range(min = 1))]
    pub size: u16,

    /// Minimum number of cells between the camp footprint and the world edge
    pub boundary_margin: u16,

    /// Number of random positions to try before giving up
    #[validate(range(min = 1, max = 1000))]
    pub max_attempts: u32,

    /// Asset name recorded for the placed camp
    pub asset: String,
}

/// Configuration for decorations scattered over open land.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ScatterConfig {
    /// Coordinate multiplier for the tree density noise field
    #[validate(range(min = 0.0, max = 10.0), custom = "finite")]
    pub tree_noise_scale: f64,

    /// A cell gets a tree when its tree noise is below a random draw from
    /// `[0, tree_density]`, so higher values mean more trees.
    #[validate(range(min = 0.0, max = 10.0), custom = "finite")]
    pub tree_density: f64,

    /// Base density of grass tufts per cell
    #[validate(range(min = 0.0, max = 10.0), custom = "finite")]
    pub grass_density: f64,

    /// Extra scaling on the grass tuft count
    #[validate(range(min = 0.0, max = 10.0), custom = "finite")]
    pub grass_spawn_multiplier: f64,

    #[validate(range(min = 0.0, max = 1.0), custom = "finite")]
    pub flower_spawn_chance: f64,

    #[validate(range(min = 0.0, max = 1.0), custom = "finite")]
    pub small_plant_spawn_chance: f64,

    #[validate(range(min = 0.0, max = 1.0), custom = "finite")]
    pub rock_spawn_chance: f64,

    #[validate(range(min = 0.0, max = 1.0), custom = "finite")]
    pub wind_spawn_chance: f64,

    /// Dense, non-colliding grass carpet laid down before everything else
    #[validate]
    pub ground_cover: GroundCoverConfig,
}

/// Configuration for the ground cover pass.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GroundCoverConfig {
    /// This step can be disabled to keep the object count down
    pub enabled: bool,

    /// Each cell gets `floor(uniform(1, density * 10))` ground cover tufts
    #[validate(range(min = 0.0, max = 10.0), custom = "finite")]
    pub density: f64,
}

/// Asset variant names for each decoration kind. Every placed object picks one
/// variant at random from its list. An empty list disables that kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub trees: Vec<String>,
    pub grass: Vec<String>,
    pub flowers: Vec<String>,
    pub small_plants: Vec<String>,
    pub rocks: Vec<String>,
    pub wind: Vec<String>,
}

/// Range checks let NaN through, since every comparison against it is false
fn finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite"))
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            // Danger! This means the default will vary between calls!
            seed: Seed::random(),
            size: 100,
            terrain: TerrainConfig::default(),
            river: RiverConfig::default(),
            camp: CampConfig::default(),
            scatter: ScatterConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            water_level: 0.4,
            noise_scale: 0.1,
            offset_range: 10000.0,
        }
    }
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            count: 5,
            edge_margin: 16,
            deviation_chance: 0.3,
        }
    }
}

impl Default for CampConfig {
    fn default() -> Self {
        Self {
            size: 5,
            boundary_margin: 10,
            max_attempts: 1000,
            asset: "camp".into(),
        }
    }
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            tree_noise_scale: 0.05,
            tree_density: 0.5,
            grass_density: 0.8,
            grass_spawn_multiplier: 1.0,
            flower_spawn_chance: 0.2,
            small_plant_spawn_chance: 0.1,
            rock_spawn_chance: 0.15,
            wind_spawn_chance: 0.05,
            ground_cover: GroundCoverConfig::default(),
        }
    }
}

impl Default for GroundCoverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            density: 0.8,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        fn names(names: &[&str]) -> Vec<String> {
            names.iter().map(|name| (*name).to_owned()).collect()
        }

        Self {
            trees: names(&["oak", "pine", "birch"]),
            grass: names(&["grass_short", "grass_tall"]),
            flowers: names(&["flower_red", "flower_yellow"]),
            small_plants: names(&["fern", "bush"]),
            rocks: names(&["rock_small", "rock_large"]),
            wind: names(&["wind_gust"]),
        }
    }
}
