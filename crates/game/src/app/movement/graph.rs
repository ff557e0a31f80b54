/// Dense row-major arena of tile nodes, one per map cell, built once per
/// session. Node indices are stable; passability mutation never touches
/// identity.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TileGraph {
    width: u32,
    height: u32,
    nodes: Vec<TileNode>,
}

impl TileGraph {
    pub(crate) fn from_map(map: &MapGrid) -> Self {
        let width = map.width();
        let height = map.height();
        let mut nodes = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let index = nodes.len();
                let node_type = if map.is_blocked(x, y) {
                    TileNodeType::Impassable
                } else {
                    TileNodeType::Normal
                };
                nodes.push(TileNode {
                    x,
                    y,
                    index,
                    node_type,
                });
            }
        }
        Self {
            width,
            height,
            nodes,
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node_index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub(crate) fn node(&self, index: usize) -> Option<&TileNode> {
        self.nodes.get(index)
    }

    /// Positions are clamped to the map extent before lookups, so an
    /// out-of-bounds coordinate here is a caller bug.
    pub(crate) fn node_at(&self, x: u32, y: u32) -> Option<&TileNode> {
        let index = self.node_index(x, y);
        debug_assert!(index.is_some(), "tile lookup out of bounds: ({x}, {y})");
        index.and_then(|index| self.nodes.get(index))
    }

    pub(crate) fn change_node_type(&mut self, index: usize, node_type: TileNodeType) {
        debug_assert!(index < self.nodes.len(), "node index out of range: {index}");
        if let Some(node) = self.nodes.get_mut(index) {
            node.node_type = node_type;
        }
    }

    pub(crate) fn is_passable(&self, index: usize) -> bool {
        self.nodes
            .get(index)
            .map(|node| node.node_type == TileNodeType::Normal)
            .unwrap_or(false)
    }

    fn neighbors(&self, index: usize) -> [Option<usize>; 4] {
        let Some(node) = self.nodes.get(index) else {
            return [None; 4];
        };
        let north = if node.y < self.height.saturating_sub(1) {
            self.node_index(node.x, node.y + 1)
        } else {
            None
        };
        let east = if node.x < self.width.saturating_sub(1) {
            self.node_index(node.x + 1, node.y)
        } else {
            None
        };
        let south = if node.y > 0 {
            self.node_index(node.x, node.y - 1)
        } else {
            None
        };
        let west = if node.x > 0 {
            self.node_index(node.x - 1, node.y)
        } else {
            None
        };
        [north, east, south, west]
    }
}

#[cfg(test)]
mod graph_tests {
    use super::*;

    fn open_map(width: u32, height: u32) -> MapGrid {
        let cells = (width * height) as usize;
        MapGrid::new(width, height, vec![false; cells], vec![false; cells]).expect("map")
    }

    #[test]
    fn from_map_creates_one_node_per_cell() {
        let graph = TileGraph::from_map(&open_map(4, 3));
        assert_eq!(graph.node_count(), 12);
        let node = graph.node_at(3, 2).expect("node");
        assert_eq!((node.x, node.y), (3, 2));
        assert_eq!(node.index, graph.node_index(3, 2).expect("index"));
        assert_eq!(node.node_type, TileNodeType::Normal);
    }

    #[test]
    fn blocked_cells_become_impassable_nodes() {
        let map = MapGrid::new(
            2,
            1,
            vec![false, true],
            vec![false, false],
        )
        .expect("map");
        let graph = TileGraph::from_map(&map);
        assert!(graph.is_passable(0));
        assert!(!graph.is_passable(1));
    }

    #[test]
    fn change_node_type_mutates_state_but_not_identity() {
        let mut graph = TileGraph::from_map(&open_map(3, 3));
        let index = graph.node_index(1, 1).expect("index");
        graph.change_node_type(index, TileNodeType::Impassable);
        let node = graph.node(index).expect("node");
        assert_eq!(node.node_type, TileNodeType::Impassable);
        assert_eq!((node.x, node.y, node.index), (1, 1, index));
    }

    #[test]
    fn node_index_rejects_out_of_extent_coordinates() {
        let graph = TileGraph::from_map(&open_map(3, 3));
        assert_eq!(graph.node_index(3, 0), None);
        assert_eq!(graph.node_index(0, 3), None);
    }

    #[test]
    fn neighbors_are_four_connected_and_bounded() {
        let graph = TileGraph::from_map(&open_map(3, 3));
        let corner = graph.node_index(0, 0).expect("index");
        let neighbor_count = graph
            .neighbors(corner)
            .iter()
            .filter(|neighbor| neighbor.is_some())
            .count();
        assert_eq!(neighbor_count, 2);

        let center = graph.node_index(1, 1).expect("index");
        let neighbor_count = graph
            .neighbors(center)
            .iter()
            .filter(|neighbor| neighbor.is_some())
            .count();
        assert_eq!(neighbor_count, 4);
    }
}
