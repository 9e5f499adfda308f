use crate::world::grid::GridPoint;
use anyhow::bail;
use pathfinding::prelude::astar;

/// A node in a pathfinding graph, tied to the grid cell it sits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GraphNode {
    /// Index of this node within its graph
    pub index: usize,
    /// The grid cell this node maps to
    pub position: GridPoint,
}

/// A graph over the grid that rivers are routed through.
pub trait PathGraph {
    /// (Re)build the graph to cover a `size × size` grid. Any failure here
    /// means the graph can't be used at all.
    fn build_graph(&mut self, size: u16) -> anyhow::Result<()>;

    /// Look up a node by index. `None` if the graph hasn't been built or the
    /// index is out of range.
    fn node(&self, index: usize) -> Option<GraphNode>;

    /// Find the shortest path from `start` to `end`, including both
    /// endpoints. This blocks until the search finishes. `None` if there is
    /// no path.
    fn compute_shortest_path(
        &self,
        start: GraphNode,
        end: GraphNode,
    ) -> Option<Vec<GraphNode>>;
}

/// A uniform-cost graph where every cell is a node connected to its 8
/// neighbors. Terrain is ignored entirely, so any two nodes are connected.
/// Nodes are indexed row by row, the same as [GridMap](super::GridMap).
#[derive(Clone, Debug, Default)]
pub struct GridGraph {
    size: Option<u16>,
}

impl GridGraph {
    fn point_to_node(&self, point: GridPoint) -> Option<GraphNode> {
        let size = self.size?;
        if point.x < size && point.y < size {
            Some(GraphNode {
                index: usize::from(point.y) * usize::from(size)
                    + usize::from(point.x),
                position: point,
            })
        } else {
            None
        }
    }

    fn neighbors(&self, node: &GraphNode) -> Vec<(GraphNode, u32)> {
        let mut neighbors = Vec::with_capacity(8);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(neighbor) = node
                    .position
                    .offset(dx, dy)
                    .and_then(|point| self.point_to_node(point))
                {
                    neighbors.push((neighbor, 1));
                }
            }
        }
        neighbors
    }
}

/// Number of diagonal-or-straight steps between two points. This is the
/// exact cost between two nodes on an 8-connected uniform grid, so it's an
/// admissible A* heuristic.
fn chebyshev_distance(a: GridPoint, b: GridPoint) -> u32 {
    let dx = (i32::from(a.x) - i32::from(b.x)).unsigned_abs();
    let dy = (i32::from(a.y) - i32::from(b.y)).unsigned_abs();
    dx.max(dy)
}

impl PathGraph for GridGraph {
    fn build_graph(&mut self, size: u16) -> anyhow::Result<()> {
        if size == 0 {
            bail!("cannot build a graph over an empty grid");
        }
        self.size = Some(size);
        Ok(())
    }

    fn node(&self, index: usize) -> Option<GraphNode> {
        let size = usize::from(self.size?);
        if index < size * size {
            self.point_to_node(GridPoint::new(
                (index % size) as u16,
                (index / size) as u16,
            ))
        } else {
            None
        }
    }

    fn compute_shortest_path(
        &self,
        start: GraphNode,
        end: GraphNode,
    ) -> Option<Vec<GraphNode>> {
        // Make sure both nodes actually belong to this graph
        let start = self.point_to_node(start.position)?;
        let end = self.point_to_node(end.position)?;

        astar(
            &start,
            |node| self.neighbors(node),
            |node| chebyshev_distance(node.position, end.position),
            |node| *node == end,
        )
        .map(|(path, _cost)| path)
    }
}

impl GridGraph {
    /// Build a graph in one step
    pub fn with_size(size: u16) -> anyhow::Result<Self> {
        let mut graph = Self::default();
        graph.build_graph(size)?;
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbuilt_graph_has_no_nodes() {
        let graph = GridGraph::default();
        assert_eq!(graph.node(0), None);
        assert!(GridGraph::default().build_graph(0).is_err());
    }

    #[test]
    fn test_node_lookup() {
        let graph = GridGraph::with_size(4).unwrap();
        assert_eq!(
            graph.node(6),
            Some(GraphNode {
                index: 6,
                position: GridPoint::new(2, 1)
            })
        );
        assert_eq!(graph.node(15).unwrap().position, GridPoint::new(3, 3));
        assert_eq!(graph.node(16), None);
    }

    #[test]
    fn test_shortest_path() {
        let graph = GridGraph::with_size(10).unwrap();
        let start = graph.node(2).unwrap(); // (2, 0)
        let end = graph.node(9 * 10 + 6).unwrap(); // (6, 9)
        let path = graph.compute_shortest_path(start, end).unwrap();

        // Diagonal moves cost the same as straight ones, so the path length
        // is the larger of the two axis distances, plus the start node
        assert_eq!(path.len(), 10);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        for pair in path.windows(2) {
            assert_eq!(
                chebyshev_distance(pair[0].position, pair[1].position),
                1,
                "nodes {:?} and {:?} aren't adjacent",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_path_to_self() {
        let graph = GridGraph::with_size(3).unwrap();
        let node = graph.node(4).unwrap();
        assert_eq!(graph.compute_shortest_path(node, node), Some(vec![node]));
    }
}
