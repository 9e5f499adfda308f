use derive_more::Display;
use fnv::FnvHasher;
use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    convert::TryInto,
    fmt,
    hash::{Hash, Hasher},
};

/// The seed that drives every random draw of a generation run. The same seed
/// (with the same config) always produces the same island.
///
/// Seeds can be given as integers or as arbitrary text. Numeric text (e.g.
/// `"1234"`) is parsed into an integer, anything else is kept as text and
/// hashed with FNV when the RNG is seeded. That lets people share memorable
/// seeds like `"treasure island"`.
///
/// Seeds always serialize as **strings**. JSON and TOML can't reliably hold
/// a full `u64`, and the string form parses back into the same value.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Seed {
    /// An integer seed, used directly
    Int(u64),
    /// Free text, hashed into a `u64` before use
    Text(String),
}

impl Seed {
    /// Pick a fresh random seed. Two calls will (almost certainly) differ.
    pub fn random() -> Self {
        Self::Int(rand::random())
    }

    /// The `u64` value that the run's RNG gets seeded with
    pub fn to_u64(&self) -> u64 {
        match self {
            Self::Int(seed) => *seed,
            Self::Text(text) => {
                let mut hasher = FnvHasher::default();
                text.hash(&mut hasher);
                hasher.finish()
            }
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self::random()
    }
}

impl From<u64> for Seed {
    fn from(seed: u64) -> Self {
        Self::Int(seed)
    }
}

impl From<&str> for Seed {
    fn from(seed_str: &str) -> Self {
        match seed_str.parse::<u64>() {
            Ok(seed) => Self::Int(seed),
            Err(_) => Self::Text(seed_str.into()),
        }
    }
}

impl Serialize for Seed {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Seed {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        // Integers and strings are both accepted, so no type hint
        deserializer.deserialize_any(SeedVisitor)
    }
}

/// Implements one integer visit method, rejecting values outside `u64`
macro_rules! impl_visit_int {
    ($fname:ident, $type:ty) => {
        fn $fname<E>(self, value: $type) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value
                .try_into()
                .map(Seed::Int)
                .map_err(|_| E::custom(format!("u64 out of range: {}", value)))
        }
    };
}

struct SeedVisitor;

impl<'de> Visitor<'de> for SeedVisitor {
    type Value = Seed;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a positive integer or string")
    }

    impl_visit_int!(visit_u8, u8);
    impl_visit_int!(visit_u16, u16);
    impl_visit_int!(visit_u32, u32);
    impl_visit_int!(visit_u64, u64);
    impl_visit_int!(visit_u128, u128);
    impl_visit_int!(visit_i8, i8);
    impl_visit_int!(visit_i16, i16);
    impl_visit_int!(visit_i32, i32);
    impl_visit_int!(visit_i64, i64);
    impl_visit_int!(visit_i128, i128);

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(value.into())
    }
}
