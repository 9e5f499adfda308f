use crate::{config::AssetConfig, util::NumRange};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::ops;
use strum::{Display, EnumIter};

/// The different kinds of objects that generation can place in the world.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    EnumIter,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ObjectKind {
    /// The base camp. There is exactly one per world.
    Camp,
    /// Dense grass carpet. Purely visual, doesn't collide with anything.
    GroundCover,
    Tree,
    Grass,
    Flower,
    SmallPlant,
    Rock,
    /// Ambient wind effect
    Wind,
}

impl ObjectKind {
    /// The layer that placed instances of this kind live on
    pub fn layer(self) -> Layer {
        match self {
            Self::Camp => Layer::Camp,
            Self::GroundCover => Layer::Ground,
            Self::Tree
            | Self::Grass
            | Self::Flower
            | Self::SmallPlant
            | Self::Rock => Layer::Nature,
            Self::Wind => Layer::Effect,
        }
    }

    /// Layers that an instance of this kind may not overlap with. A
    /// candidate position is rejected if it overlaps anything on these
    /// layers.
    pub fn collision_mask(self) -> LayerMask {
        match self {
            Self::Camp
            | Self::Tree
            | Self::Grass
            | Self::Flower
            | Self::SmallPlant
            | Self::Rock
            | Self::Wind => Layer::Camp | Layer::Nature,
            Self::GroundCover => LayerMask::NONE,
        }
    }

    /// Radius of the sphere this kind occupies, for collision purposes. The
    /// camp's radius depends on its footprint so it isn't fixed here.
    pub fn collision_radius(self) -> f64 {
        match self {
            Self::Camp | Self::GroundCover => 0.0,
            Self::Tree => 0.5,
            Self::Grass
            | Self::Flower
            | Self::SmallPlant
            | Self::Rock
            | Self::Wind => 0.25,
        }
    }

    /// Range of uniform scale factors applied to instances of this kind
    pub fn scale_range(self) -> NumRange<f64> {
        match self {
            Self::Camp => NumRange::new(1.0, 1.0),
            Self::GroundCover => NumRange::new(0.5, 0.5),
            Self::Tree => NumRange::new(0.8, 1.2),
            Self::Grass
            | Self::Flower
            | Self::SmallPlant
            | Self::Rock
            | Self::Wind => NumRange::new(0.8, 1.5),
        }
    }

    /// Asset variants available for this kind. The camp has a single asset,
    /// which is configured separately, so it returns an empty list here.
    pub fn variants(self, assets: &AssetConfig) -> &[String] {
        match self {
            Self::Camp => &[],
            Self::GroundCover | Self::Grass => assets.grass.as_slice(),
            Self::Tree => assets.trees.as_slice(),
            Self::Flower => assets.flowers.as_slice(),
            Self::SmallPlant => assets.small_plants.as_slice(),
            Self::Rock => assets.rocks.as_slice(),
            Self::Wind => assets.wind.as_slice(),
        }
    }
}

/// A collision layer. Every placed instance lives on exactly one layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Camp,
    Nature,
    Ground,
    Effect,
}

impl Layer {
    fn bit(self) -> u8 {
        match self {
            Self::Camp => 1 << 0,
            Self::Nature => 1 << 1,
            Self::Ground => 1 << 2,
            Self::Effect => 1 << 3,
        }
    }
}

/// A set of [Layer]s
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerMask(u8);

impl LayerMask {
    pub const NONE: Self = Self(0);

    pub fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }
}

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        Self(layer.bit())
    }
}

impl ops::BitOr<Layer> for Layer {
    type Output = LayerMask;

    fn bitor(self, rhs: Layer) -> LayerMask {
        LayerMask(self.bit() | rhs.bit())
    }
}

impl ops::BitOr<Layer> for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: Layer) -> LayerMask {
        LayerMask(self.0 | rhs.bit())
    }
}

/// A single object instance placed during generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub kind: ObjectKind,
    /// Name of the asset variant to display for this object
    pub variant: String,
    /// Position in world space. X and Z are grid coordinates, Y is height.
    pub position: Point3<f64>,
    /// Rotation about the vertical axis, in degrees
    pub rotation: f64,
    pub scale: f64,
}
