use isle::{GridPoint, World};

/// Render a top-down text preview of a world, one character per cell and one
/// line per row.
///
/// - `@` player spawn
/// - `#` camp
/// - `~` water
/// - `T` tree
/// - `.` open land
pub fn render_map(world: &World) -> String {
    let grid = world.grid();
    let size = grid.size();
    let player = world
        .player()
        .map(|p| GridPoint::new(p.x.round() as u16, p.z.round() as u16));

    let mut map =
        String::with_capacity(usize::from(size) * (usize::from(size) + 1));
    for (point, cell) in grid.cells().iter() {
        let c = if Some(point) == player {
            '@'
        } else if cell.is_occupied() {
            '#'
        } else if cell.is_water() {
            '~'
        } else if cell.has_tree() {
            'T'
        } else {
            '.'
        };
        map.push(c);
        if point.x + 1 == size {
            map.push('\n');
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use isle::{RiverConfig, Seed, TerrainConfig, WorldConfig};

    #[test]
    fn test_render_map() {
        let world = World::generate(WorldConfig {
            seed: Seed::Int(4),
            size: 40,
            terrain: TerrainConfig {
                water_level: 0.2,
                ..Default::default()
            },
            river: RiverConfig {
                count: 1,
                edge_margin: 5,
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();
        let map = render_map(&world);

        let lines: Vec<&str> = map.lines().collect();
        assert_eq!(lines.len(), 40);
        assert!(lines.iter().all(|line| line.chars().count() == 40));
        assert_eq!(map.matches('#').count(), 25);
        assert_eq!(map.matches('@').count(), 1);
        assert!(map.contains('~'));
    }
}
