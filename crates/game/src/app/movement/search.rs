#[derive(Debug, Clone, Copy)]
struct OpenNode {
    index: usize,
    f_cost: u32,
    insertion_order: u64,
}

// Equal f-cost frontier entries resolve by insertion order into the open
// set, keeping expansion stable and reproducible.
fn pick_best_open_node_index(open: &[OpenNode]) -> usize {
    let mut best_index = 0usize;
    for index in 1..open.len() {
        let current = open[index];
        let best = open[best_index];
        if (current.f_cost, current.insertion_order) < (best.f_cost, best.insertion_order) {
            best_index = index;
        }
    }
    best_index
}

fn manhattan_distance(ax: u32, ay: u32, bx: u32, by: u32) -> u32 {
    ax.abs_diff(bx).saturating_add(ay.abs_diff(by))
}

fn reconstruct_node_path(
    parent: &[Option<usize>],
    start_index: usize,
    goal_index: usize,
) -> Option<TilePath> {
    let mut cursor = goal_index;
    let mut indices = vec![cursor];

    while cursor != start_index {
        let next = parent.get(cursor).and_then(|value| *value)?;
        cursor = next;
        indices.push(cursor);
    }
    indices.reverse();
    Some(TilePath::from_indices(indices))
}

impl TileGraph {
    /// Deterministic A* over the node arena: Manhattan heuristic, unit edge
    /// cost, 4-connected. The start node's own passability is not checked
    /// (a mover can stand on a tile that was sealed under it); expansion
    /// only enters passable nodes.
    pub(crate) fn find_path_nodes(
        &self,
        start_index: usize,
        goal_index: usize,
    ) -> Option<TilePath> {
        let start = self.node(start_index)?;
        let goal = self.node(goal_index)?;

        if start_index == goal_index {
            return Some(TilePath::from_indices(vec![start_index]));
        }

        let node_count = self.node_count();
        let mut closed = vec![false; node_count];
        let mut best_g = vec![u32::MAX; node_count];
        let mut parent = vec![None::<usize>; node_count];
        let mut open = Vec::new();
        let mut next_insertion = 0u64;

        let start_h = manhattan_distance(start.x, start.y, goal.x, goal.y);
        open.push(OpenNode {
            index: start_index,
            f_cost: start_h,
            insertion_order: next_insertion,
        });
        next_insertion = next_insertion.saturating_add(1);
        best_g[start_index] = 0;

        while !open.is_empty() {
            let best_index = pick_best_open_node_index(&open);
            let current = open.swap_remove(best_index);
            if closed[current.index] {
                continue;
            }
            closed[current.index] = true;

            if current.index == goal_index {
                return reconstruct_node_path(&parent, start_index, goal_index);
            }

            let current_g = best_g[current.index];
            for neighbor in self.neighbors(current.index) {
                let Some(neighbor_index) = neighbor else {
                    continue;
                };
                if closed[neighbor_index] || !self.is_passable(neighbor_index) {
                    continue;
                }

                let tentative_g = current_g.saturating_add(1);
                if tentative_g >= best_g[neighbor_index] {
                    continue;
                }

                best_g[neighbor_index] = tentative_g;
                parent[neighbor_index] = Some(current.index);
                let Some(neighbor_node) = self.node(neighbor_index) else {
                    continue;
                };
                let h_cost =
                    manhattan_distance(neighbor_node.x, neighbor_node.y, goal.x, goal.y);
                open.push(OpenNode {
                    index: neighbor_index,
                    f_cost: tentative_g.saturating_add(h_cost),
                    insertion_order: next_insertion,
                });
                next_insertion = next_insertion.saturating_add(1);
            }
        }

        None
    }

    /// Resolves the search for one intent. When the requested goal tile is
    /// itself impassable the goal is flipped passable for a provisional
    /// search, the second-to-last node of that path becomes the effective
    /// destination (the intent target is rewritten to it), the flip is
    /// reverted and the search reruns against the substitute. An empty path
    /// means no route exists.
    pub(crate) fn search_for_intent(
        &mut self,
        position: Vec2,
        intent: &mut MovementIntent,
    ) -> TilePath {
        let Some(start_index) =
            self.node_index(position.x.floor() as u32, position.y.floor() as u32)
        else {
            return TilePath::default();
        };
        let Some(mut goal_index) = self.node_index(
            intent.target.x.floor() as u32,
            intent.target.y.floor() as u32,
        ) else {
            return TilePath::default();
        };

        if !self.is_passable(goal_index) {
            self.change_node_type(goal_index, TileNodeType::Normal);
            let provisional = self.find_path_nodes(start_index, goal_index);
            self.change_node_type(goal_index, TileNodeType::Impassable);

            let Some(provisional) = provisional else {
                return TilePath::default();
            };
            if provisional.len() < 2 {
                return TilePath::default();
            }
            let effective_index = provisional.nodes()[provisional.len() - 2];
            let Some(effective) = self.node(effective_index) else {
                return TilePath::default();
            };
            intent.target = Vec2 {
                x: effective.x as f32,
                y: effective.y as f32,
            };
            goal_index = effective_index;
        }

        self.find_path_nodes(start_index, goal_index)
            .unwrap_or_default()
    }
}
