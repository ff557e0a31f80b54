use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRole {
    Player,
    Npc,
    Door,
}

impl EntityRole {
    pub fn is_mover(self) -> bool {
        matches!(self, Self::Player | Self::Npc)
    }
}

/// Continuous velocity plus the configured walk speed scalar. The movement
/// layer writes `x`/`y` every tick; `speed` only changes at spawn time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub role: EntityRole,
    pub position: Vec2,
    pub velocity: Velocity,
    pub impassable: bool,
}

#[derive(Debug, Default)]
pub struct World {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
}

impl World {
    pub fn spawn(&mut self, name: &str, role: EntityRole, position: Vec2, speed: f32) -> EntityId {
        let id = self.allocator.allocate();
        self.entities.push(Entity {
            id,
            name: name.to_string(),
            role,
            position,
            velocity: Velocity {
                x: 0.0,
                y: 0.0,
                speed,
            },
            impassable: false,
        });
        debug!(name, role = ?role, "entity spawned");
        id
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }
}
