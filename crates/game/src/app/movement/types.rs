#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TileNodeType {
    Normal,
    Impassable,
}

/// One cell of the traversability grid. Identity (`x`, `y`, `index`) is
/// fixed for the session; only `node_type` mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TileNode {
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) index: usize,
    pub(crate) node_type: TileNodeType,
}

/// Ordered waypoint sequence from a path search, stored as arena indices
/// into the tile graph. Indices stay valid to read after node-state
/// mutation, so a cached path never dangles even when it goes stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TilePath {
    node_indices: Vec<usize>,
}

impl TilePath {
    pub(crate) fn from_indices(node_indices: Vec<usize>) -> Self {
        Self { node_indices }
    }

    pub(crate) fn nodes(&self) -> &[usize] {
        &self.node_indices
    }

    pub(crate) fn len(&self) -> usize {
        self.node_indices.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.node_indices.is_empty()
    }
}

/// Pending destination for one mover plus the path cached for it.
/// `path: None` means the search has not run yet; `Some` with no nodes
/// means the search ran and found no route (the request stays pending
/// without re-running the search every tick).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MovementIntent {
    target: Vec2,
    path: Option<TilePath>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MovementPhase {
    Idle,
    PathPending,
    Following,
    Arrived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DoorEventKind {
    Opened,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DoorEvent {
    kind: DoorEventKind,
    entity_id: EntityId,
}

#[derive(Default)]
pub(crate) struct DoorEventQueue {
    events: Vec<DoorEvent>,
}

impl DoorEventQueue {
    fn enqueue(&mut self, event: DoorEvent) {
        self.events.push(event);
    }

    fn drain_current_tick(&mut self) -> Vec<DoorEvent> {
        std::mem::take(&mut self.events)
    }
}
