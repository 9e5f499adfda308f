use crate::{
    util::chance,
    world::{
        generate::{Generate, WorldBuilder},
        graph::GraphNode,
        grid::{Grid, GridPoint},
    },
};
use log::{debug, error, info, warn};
use rand::Rng;
use std::ops::Range;

/// Carves rivers from the top edge of the world to the bottom edge. Each river
/// follows the shortest path through the path graph, flooding every cell it
/// passes over, and occasionally spills into a neighboring cell so that the
/// river doesn't have a constant width.
#[derive(Copy, Clone, Debug)]
pub struct RiverGenerator;

impl Generate for RiverGenerator {
    fn generate(&self, world: &mut WorldBuilder) -> anyhow::Result<()> {
        let config = world.config.river;
        let size = world.grid.size();
        let graph = world.collaborators.graph.as_mut();

        // Without a graph there's nothing to route through. That's not worth
        // killing the whole world over, so just go without rivers.
        if let Err(err) = graph.build_graph(size) {
            error!("Failed to build river graph, skipping rivers: {:#}", err);
            return Ok(());
        }

        let (start_band, end_band) = river_bands(size, config.edge_margin);
        if start_band.is_empty() || end_band.is_empty() {
            warn!(
                "Edge margin {} leaves no room for rivers in a world of size \
                 {}, skipping {} river(s)",
                config.edge_margin, size, config.count
            );
            return Ok(());
        }

        for i in 0..config.count {
            let start_index = world.rng.gen_range(start_band.clone());
            let end_index = world.rng.gen_range(end_band.clone());
            let nodes = (graph.node(start_index), graph.node(end_index));
            let (start, end) = match nodes {
                (Some(start), Some(end)) => (start, end),
                _ => {
                    warn!(
                        "River {}: no graph node for {} or {}, skipping",
                        i, start_index, end_index
                    );
                    continue;
                }
            };

            let path = match graph.compute_shortest_path(start, end) {
                Some(path) => path,
                None => {
                    warn!(
                        "River {}: no path from {} to {}, skipping",
                        i, start.position, end.position
                    );
                    continue;
                }
            };

            let flooded = carve_path(
                &mut world.grid,
                &path,
                config.deviation_chance,
                &mut world.rng,
            );
            debug!(
                "River {}: {} -> {}, {} steps, {} cells flooded",
                i,
                start.position,
                end.position,
                path.len(),
                flooded
            );
            world.rivers += 1;
        }

        info!("Carved {} river(s)", world.rivers);
        Ok(())
    }
}

/// Node index ranges that rivers start and end in. Rivers start in the first
/// row and end in the last, staying `margin` cells away from the corners.
/// Either range may be empty if the margin is too big for the world.
fn river_bands(size: u16, margin: u16) -> (Range<usize>, Range<usize>) {
    let size = usize::from(size);
    let margin = usize::from(margin);
    let last_row = size * size.saturating_sub(1);
    (
        margin..size.saturating_sub(margin),
        (last_row + margin)..(size * size).saturating_sub(margin),
    )
}

/// Flood every cell along a path. After the first node, each step has a
/// chance to also flood one random neighbor. Nodes off the grid or on an
/// occupied cell are skipped entirely. Returns the number of cells that
/// were land before and are water now.
pub fn carve_path(
    grid: &mut Grid,
    path: &[GraphNode],
    deviation_chance: f64,
    rng: &mut impl Rng,
) -> usize {
    let max = i32::from(grid.size()) - 1;
    let mut flooded = 0;

    for (i, node) in path.iter().enumerate() {
        let position = node.position;
        match grid.cell(position) {
            Some(cell) if !cell.is_occupied() => {}
            _ => continue,
        }

        if i > 0 && chance(rng, deviation_chance) {
            let dx: i32 = rng.gen_range(-1..=1);
            let dy: i32 = rng.gen_range(-1..=1);
            let neighbor = GridPoint::new(
                (i32::from(position.x) + dx).clamp(0, max) as u16,
                (i32::from(position.y) + dy).clamp(0, max) as u16,
            );
            // Refuses occupied and already-flooded cells on its own
            if grid.mark_water(neighbor) {
                flooded += 1;
            }
        }

        if grid.mark_water(position) {
            flooded += 1;
        }
    }

    flooded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Seed, WorldConfig},
        world::{
            collaborator::Collaborators,
            graph::{GridGraph, PathGraph},
            grid::Cell,
        },
    };
    use anyhow::bail;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn straight_path(graph: &GridGraph, size: u16, x: u16) -> Vec<GraphNode> {
        let size = usize::from(size);
        (0..size)
            .map(|y| graph.node(y * size + usize::from(x)).unwrap())
            .collect()
    }

    #[test]
    fn test_bands() {
        let (start, end) = river_bands(100, 16);
        assert_eq!(start, 16..84);
        assert_eq!(end, 9916..9984);

        let (start, _) = river_bands(10, 5);
        assert!(start.is_empty());
    }

    #[test]
    fn test_carve_without_deviation() {
        let graph = GridGraph::with_size(8).unwrap();
        let path = straight_path(&graph, 8, 3);
        let mut grid = Grid::new(8);

        assert_eq!(
            carve_path(&mut grid, &path, 0.0, &mut Pcg64::seed_from_u64(1)),
            8
        );
        assert_eq!(grid.count(Cell::is_water), 8);
        for node in &path {
            assert!(grid.cell(node.position).unwrap().is_water());
        }
    }

    #[test]
    fn test_carve_is_deterministic() {
        let graph = GridGraph::with_size(16).unwrap();
        let start = graph.node(3).unwrap();
        let end = graph.node(250).unwrap();
        let path = graph.compute_shortest_path(start, end).unwrap();

        let carve = |seed| {
            let mut grid = Grid::new(16);
            carve_path(&mut grid, &path, 0.3, &mut Pcg64::seed_from_u64(seed));
            grid
        };
        assert_eq!(carve(7).cells(), carve(7).cells());
    }

    #[test]
    fn test_carve_skips_occupied() {
        let graph = GridGraph::with_size(5).unwrap();
        let path = straight_path(&graph, 5, 2);
        let mut grid = Grid::new(5);
        // Wall off the whole middle row, so deviations can't hit it either
        for x in 0..5 {
            grid.mark_occupied(GridPoint::new(x, 2));
        }

        carve_path(&mut grid, &path, 1.0, &mut Pcg64::seed_from_u64(3));
        for x in 0..5 {
            let cell = grid.cell(GridPoint::new(x, 2)).unwrap();
            assert!(!cell.is_water(), "occupied cell ({}, 2) flooded", x);
        }
        assert!(grid.cell(GridPoint::new(2, 0)).unwrap().is_water());
        assert!(grid.cell(GridPoint::new(2, 4)).unwrap().is_water());
    }

    /// A graph that can never be built
    struct BrokenGraph;

    impl PathGraph for BrokenGraph {
        fn build_graph(&mut self, _size: u16) -> anyhow::Result<()> {
            bail!("no graph today")
        }

        fn node(&self, _index: usize) -> Option<GraphNode> {
            None
        }

        fn compute_shortest_path(
            &self,
            _start: GraphNode,
            _end: GraphNode,
        ) -> Option<Vec<GraphNode>> {
            None
        }
    }

    fn builder(count: u16, collaborators: Collaborators) -> WorldBuilder {
        let mut config = WorldConfig::default();
        config.seed = Seed::Int(42);
        config.size = 40;
        config.river.count = count;
        config.river.edge_margin = 4;
        WorldBuilder::new(config, collaborators)
    }

    #[test]
    fn test_broken_graph_means_no_rivers() {
        let mut world = builder(
            3,
            Collaborators {
                graph: Box::new(BrokenGraph),
                ..Default::default()
            },
        );
        RiverGenerator.generate(&mut world).unwrap();
        assert_eq!(world.rivers, 0);
        assert_eq!(world.grid.count(Cell::is_water), 0);
    }

    #[test]
    fn test_zero_rivers_leave_grid_alone() {
        let mut world = builder(0, Collaborators::default());
        RiverGenerator.generate(&mut world).unwrap();
        assert_eq!(world.rivers, 0);
        assert_eq!(world.grid.count(Cell::is_water), 0);
    }

    #[test]
    fn test_rivers_cross_the_world() {
        let mut world = builder(2, Collaborators::default());
        RiverGenerator.generate(&mut world).unwrap();
        assert_eq!(world.rivers, 2);

        // Every row has at least one water cell
        for y in 0..40 {
            assert!(
                (0..40).any(|x| world
                    .grid
                    .cell(GridPoint::new(x, y))
                    .unwrap()
                    .is_water()),
                "row {} has no water",
                y
            );
        }
    }
}
