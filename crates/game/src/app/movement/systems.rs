/// Per-tick movement host: owns the tile graph, the map's roof visibility,
/// the pending intents and the inbound door event queue. All mutation and
/// search run on one logical thread inside `tick`.
pub(crate) struct MovementSim {
    graph: TileGraph,
    map: MapGrid,
    intents_by_entity: HashMap<EntityId, MovementIntent>,
    door_events: DoorEventQueue,
}

impl MovementSim {
    pub(crate) fn new(map: MapGrid) -> Self {
        let graph = TileGraph::from_map(&map);
        Self {
            graph,
            map,
            intents_by_entity: HashMap::new(),
            door_events: DoorEventQueue::default(),
        }
    }

    pub(crate) fn map(&self) -> &MapGrid {
        &self.map
    }

    pub(crate) fn roof_visible(&self) -> bool {
        self.map.roof_visible()
    }

    pub(crate) fn movement_phase(&self, world: &World, entity_id: EntityId) -> MovementPhase {
        let Some(intent) = self.intents_by_entity.get(&entity_id) else {
            return MovementPhase::Idle;
        };
        let Some(entity) = world.find_entity(entity_id) else {
            return MovementPhase::Idle;
        };
        match &intent.path {
            None => MovementPhase::PathPending,
            Some(path) if path.is_empty() => MovementPhase::PathPending,
            Some(_) => {
                if within_stop_precision(entity.position, intent.target) {
                    MovementPhase::Arrived
                } else {
                    MovementPhase::Following
                }
            }
        }
    }

    /// Sets a mover's destination, superseding any pending intent and its
    /// cached path. Requests for unknown entities, non-movers or points
    /// outside the map extent are logged and dropped.
    pub(crate) fn request_destination(
        &mut self,
        world: &World,
        entity_id: EntityId,
        x: f32,
        y: f32,
    ) -> bool {
        let Some(entity) = world.find_entity(entity_id) else {
            warn!(entity_id = entity_id.0, "destination request for unknown entity dropped");
            return false;
        };
        if !entity.role.is_mover() {
            warn!(name = %entity.name, "destination request for non-mover dropped");
            return false;
        }
        if self.map.tile_of(Vec2 { x, y }).is_none() {
            warn!(name = %entity.name, x, y, "destination outside the map extent dropped");
            return false;
        }

        self.intents_by_entity.insert(
            entity_id,
            MovementIntent {
                target: Vec2 { x, y },
                path: None,
            },
        );
        true
    }

    pub(crate) fn notify_door_toggled(&mut self, entity_id: EntityId, kind: DoorEventKind) {
        self.door_events.enqueue(DoorEvent { kind, entity_id });
    }

    pub(crate) fn tick(&mut self, world: &mut World, fixed_dt_seconds: f32) {
        self.apply_door_events(world);
        self.process_movers(world);
        self.integrate_positions(world, fixed_dt_seconds);
        self.couple_roof_visibility(world);
    }

    pub(crate) fn has_pending_movement(&self) -> bool {
        !self.intents_by_entity.is_empty()
    }

    // Both event kinds toggle: the interaction layer alternates them, and a
    // door's marker is the single source of truth for its node state.
    fn apply_door_events(&mut self, world: &mut World) {
        for event in self.door_events.drain_current_tick() {
            let Some(entity) = world.find_entity_mut(event.entity_id) else {
                debug!(entity_id = event.entity_id.0, "door event for unknown entity ignored");
                continue;
            };
            if entity.role != EntityRole::Door {
                debug!(name = %entity.name, "door event for non-door entity ignored");
                continue;
            }
            let Some((tile_x, tile_y)) = self.map.tile_of(entity.position) else {
                continue;
            };
            let Some(node_index) = self.graph.node_index(tile_x, tile_y) else {
                continue;
            };

            if entity.impassable {
                entity.impassable = false;
                self.graph.change_node_type(node_index, TileNodeType::Normal);
            } else {
                entity.impassable = true;
                self.graph.change_node_type(node_index, TileNodeType::Impassable);
            }
            info!(
                name = %entity.name,
                kind = ?event.kind,
                passable = !entity.impassable,
                "door toggled"
            );
        }
    }

    fn process_movers(&mut self, world: &mut World) {
        let mut mover_ids: Vec<EntityId> = self.intents_by_entity.keys().copied().collect();
        mover_ids.sort_by_key(|id| id.0);

        for entity_id in mover_ids {
            let Some(entity) = world.find_entity_mut(entity_id) else {
                self.intents_by_entity.remove(&entity_id);
                continue;
            };
            let Some(mut intent) = self.intents_by_entity.remove(&entity_id) else {
                continue;
            };

            if intent.path.is_none() {
                let path = self.graph.search_for_intent(entity.position, &mut intent);
                if path.is_empty() {
                    info!(name = %entity.name, "no route to destination, request stays pending");
                } else {
                    info!(
                        name = %entity.name,
                        target_x = intent.target.x,
                        target_y = intent.target.y,
                        nodes = path.len(),
                        "path built"
                    );
                }
                intent.path = Some(path);
            }

            if within_stop_precision(entity.position, intent.target) {
                entity.velocity.x = 0.0;
                entity.velocity.y = 0.0;
                debug!(name = %entity.name, "arrived, intent cleared");
                // Intent stays removed: ARRIVED collapses to IDLE this tick.
            } else {
                steer_along_path(&self.graph, entity, &intent);
                self.intents_by_entity.insert(entity_id, intent);
            }
        }
    }

    // Integration runs for every entity each tick regardless of movement
    // state; only followers carry nonzero velocity. Clamping preserves the
    // positions-never-leave-the-map invariant.
    fn integrate_positions(&self, world: &mut World, fixed_dt_seconds: f32) {
        for entity in world.entities_mut() {
            entity.position.x += entity.velocity.x * fixed_dt_seconds;
            entity.position.y += entity.velocity.y * fixed_dt_seconds;
            entity.position = self.map.clamp_point(entity.position);
        }
    }

    fn couple_roof_visibility(&mut self, world: &World) {
        for entity in world.entities() {
            if entity.role != EntityRole::Player {
                continue;
            }
            let Some((tile_x, tile_y)) = self.map.tile_of(entity.position) else {
                continue;
            };
            let covered = self.map.has_roof_at(tile_x, tile_y);
            self.map.set_roof_visible(!covered);
        }
    }
}

fn within_stop_precision(position: Vec2, target: Vec2) -> bool {
    (position.x - target.x).abs() < STOP_PRECISION
        && (position.y - target.y).abs() < STOP_PRECISION
}

// Finds the path node under the mover's current tile and steers toward the
// node after it: normalized sin/cos of the delta scaled by the configured
// speed, with a per-axis snap once the remaining delta drops inside the
// stop precision (prevents oscillating over a waypoint).
fn steer_along_path(graph: &TileGraph, entity: &mut Entity, intent: &MovementIntent) {
    let Some(path) = intent.path.as_ref() else {
        return;
    };
    let Some(current_index) = graph.node_index(
        entity.position.x.floor() as u32,
        entity.position.y.floor() as u32,
    ) else {
        return;
    };

    let nodes = path.nodes();
    for i in 0..nodes.len().saturating_sub(1) {
        if nodes[i] != current_index {
            continue;
        }
        let Some(next) = graph.node(nodes[i + 1]) else {
            continue;
        };
        let next_x = next.x as f32;
        let next_y = next.y as f32;

        let delta_x = (next_x - entity.position.x).abs();
        let delta_y = (next_y - entity.position.y).abs();
        let distance = (delta_x * delta_x + delta_y * delta_y).sqrt();
        if distance == 0.0 {
            continue;
        }

        let cos = delta_x / distance;
        let sin = delta_y / distance;
        entity.velocity.x = entity.velocity.speed * cos;
        entity.velocity.y = entity.velocity.speed * sin;

        if delta_x > STOP_PRECISION {
            if next_x < entity.position.x {
                entity.velocity.x = -entity.velocity.x;
            }
        } else {
            entity.position.x = next_x;
            entity.velocity.x = 0.0;
        }

        if delta_y > STOP_PRECISION {
            if next_y < entity.position.y {
                entity.velocity.y = -entity.velocity.y;
            }
        } else {
            entity.position.y = next_y;
            entity.velocity.y = 0.0;
        }
    }
}
