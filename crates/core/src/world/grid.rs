use derive_more::Display;
use serde::{Deserialize, Serialize};

/// The integer coordinate of a single cell. `x` runs along the columns and
/// `y` along the rows. In world space, `x` maps to the X axis and `y` maps to
/// the Z axis, since Y is vertical.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct GridPoint {
    pub x: u16,
    pub y: u16,
}

impl GridPoint {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Offset this point by a signed amount. Returns `None` if either
    /// coordinate would go negative. This doesn't know about the grid size,
    /// so the result still needs a bounds check.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = i32::from(self.x) + dx;
        let y = i32::from(self.y) + dy;
        if x < 0 || y < 0 || x > i32::from(u16::MAX) || y > i32::from(u16::MAX)
        {
            None
        } else {
            Some(Self::new(x as u16, y as u16))
        }
    }
}

/// A dense square map of values, one per cell. Values are stored row-major,
/// so iteration goes row by row (`y` outer, `x` inner). Every access is
/// bounds-checked; coordinates never wrap around.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawGridMap<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct GridMap<T> {
    size: u16,
    values: Vec<T>,
}

/// Unchecked serialized form of [GridMap]. Loading goes through this so that
/// a map whose value count doesn't match its size is rejected up front.
#[derive(Deserialize)]
struct RawGridMap<T> {
    size: u16,
    values: Vec<T>,
}

impl<T> TryFrom<RawGridMap<T>> for GridMap<T> {
    type Error = String;

    fn try_from(raw: RawGridMap<T>) -> Result<Self, Self::Error> {
        let expected = usize::from(raw.size) * usize::from(raw.size);
        if raw.values.len() == expected {
            Ok(Self {
                size: raw.size,
                values: raw.values,
            })
        } else {
            Err(format!(
                "grid of size {} needs {} values, got {}",
                raw.size,
                expected,
                raw.values.len()
            ))
        }
    }
}

impl<T: Clone> GridMap<T> {
    /// Create a map with every cell set to the same value
    pub fn filled(size: u16, value: T) -> Self {
        let len = usize::from(size) * usize::from(size);
        Self {
            size,
            values: vec![value; len],
        }
    }
}

impl<T> GridMap<T> {
    /// Create a map by calling a function for every cell, in scan order
    pub fn from_fn(size: u16, mut f: impl FnMut(GridPoint) -> T) -> Self {
        let values = scan(size).map(&mut f).collect();
        Self { size, values }
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    /// Total number of cells in this map
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, point: GridPoint) -> bool {
        point.x < self.size && point.y < self.size
    }

    fn index(&self, point: GridPoint) -> Option<usize> {
        if self.contains(point) {
            Some(usize::from(point.y) * usize::from(self.size)
                + usize::from(point.x))
        } else {
            None
        }
    }

    pub fn get(&self, point: GridPoint) -> Option<&T> {
        self.index(point).map(|i| &self.values[i])
    }

    pub fn get_mut(&mut self, point: GridPoint) -> Option<&mut T> {
        match self.index(point) {
            Some(i) => Some(&mut self.values[i]),
            None => None,
        }
    }

    /// Iterate over every cell in scan order
    pub fn iter(&self) -> impl Iterator<Item = (GridPoint, &T)> {
        scan(self.size).zip(self.values.iter())
    }
}

impl<T> Default for GridMap<T> {
    fn default() -> Self {
        Self {
            size: 0,
            values: Vec::new(),
        }
    }
}

/// Iterate over every point in a square of the given size, row by row
pub fn scan(size: u16) -> impl Iterator<Item = GridPoint> {
    (0..size).flat_map(move |y| (0..size).map(move |x| GridPoint::new(x, y)))
}

/// The state of a single grid cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    is_water: bool,
    is_occupied: bool,
    has_tree: bool,
}

impl Cell {
    /// Is this cell water, either from the initial land mask or a river?
    pub fn is_water(&self) -> bool {
        self.is_water
    }

    /// Is this cell reserved by a structure (i.e. the camp footprint)?
    pub fn is_occupied(&self) -> bool {
        self.is_occupied
    }

    /// Has a tree been placed on this cell?
    pub fn has_tree(&self) -> bool {
        self.has_tree
    }

    /// Open land: not water and not reserved by a structure. Only open cells
    /// are eligible for the player and for scattered decorations.
    pub fn is_open_land(&self) -> bool {
        !self.is_water && !self.is_occupied
    }
}

/// The shared cell array that every generation phase reads and writes. Also
/// holds the intermediate noise and falloff maps that terrain classification
/// is derived from.
///
/// The only mutations available enforce the cell invariants: water never
/// turns back into land, and occupied cells never turn into water.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid {
    cells: GridMap<Cell>,
    #[serde(skip)]
    noise_map: GridMap<f64>,
    #[serde(skip)]
    falloff_map: GridMap<f64>,
}

impl Grid {
    /// Allocate a new grid of all land, with zeroed noise/falloff maps
    pub fn new(size: u16) -> Self {
        Self {
            cells: GridMap::filled(size, Cell::default()),
            noise_map: GridMap::filled(size, 0.0),
            falloff_map: GridMap::filled(size, 0.0),
        }
    }

    pub fn size(&self) -> u16 {
        self.cells.size()
    }

    pub fn contains(&self, point: GridPoint) -> bool {
        self.cells.contains(point)
    }

    pub fn cell(&self, point: GridPoint) -> Option<&Cell> {
        self.cells.get(point)
    }

    pub fn cells(&self) -> &GridMap<Cell> {
        &self.cells
    }

    /// Raw terrain noise per cell, in [0,1]
    pub fn noise_map(&self) -> &GridMap<f64> {
        &self.noise_map
    }

    pub fn noise_map_mut(&mut self) -> &mut GridMap<f64> {
        &mut self.noise_map
    }

    /// Edge falloff per cell, in [0,1]
    pub fn falloff_map(&self) -> &GridMap<f64> {
        &self.falloff_map
    }

    pub fn falloff_map_mut(&mut self) -> &mut GridMap<f64> {
        &mut self.falloff_map
    }

    /// Is the cell at this point open land? Out of bounds points are not.
    pub fn is_open_land(&self, point: GridPoint) -> bool {
        self.cell(point).map_or(false, Cell::is_open_land)
    }

    /// Flood a cell. Returns `true` if the cell was land and is now water.
    /// Occupied cells are never flooded, and out of bounds points are
    /// ignored.
    pub fn mark_water(&mut self, point: GridPoint) -> bool {
        match self.cells.get_mut(point) {
            Some(cell) if !cell.is_occupied && !cell.is_water => {
                cell.is_water = true;
                true
            }
            _ => false,
        }
    }

    /// Reserve a cell for a structure. Returns `false` if the point is out of
    /// bounds.
    pub fn mark_occupied(&mut self, point: GridPoint) -> bool {
        match self.cells.get_mut(point) {
            Some(cell) => {
                cell.is_occupied = true;
                true
            }
            None => false,
        }
    }

    /// Record that a tree stands on this cell
    pub fn mark_tree(&mut self, point: GridPoint) -> bool {
        match self.cells.get_mut(point) {
            Some(cell) => {
                cell.has_tree = true;
                true
            }
            None => false,
        }
    }

    /// Count the cells matching a predicate
    pub fn count(&self, predicate: impl Fn(&Cell) -> bool) -> usize {
        self.cells.iter().filter(|(_, cell)| predicate(cell)).count()
    }
}
