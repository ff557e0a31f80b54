use serde::{Deserialize, Serialize};
use tracing::info;
use world::{EntityId, EntityRole, MapDescription, Vec2, World};

use super::movement::{DoorEventKind, MovementSim};

pub(crate) type ScenarioResult<T> = Result<T, String>;

const DEFAULT_WALK_SPEED: f32 = 3.0;

fn default_speed() -> f32 {
    DEFAULT_WALK_SPEED
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SpawnRole {
    Player,
    Npc,
    Door,
}

impl SpawnRole {
    fn to_entity_role(self) -> EntityRole {
        match self {
            Self::Player => EntityRole::Player,
            Self::Npc => EntityRole::Npc,
            Self::Door => EntityRole::Door,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SpawnRecord {
    pub(crate) name: String,
    pub(crate) role: SpawnRole,
    pub(crate) x: f32,
    pub(crate) y: f32,
    #[serde(default = "default_speed")]
    pub(crate) speed: f32,
    #[serde(default)]
    pub(crate) starts_closed: bool,
    #[serde(default)]
    pub(crate) destination: Option<DestinationRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct DestinationRecord {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

/// Session setup as data: the static map description plus the entities to
/// spawn, with optional initial destinations and door states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Scenario {
    pub(crate) map: MapDescription,
    #[serde(default)]
    pub(crate) spawns: Vec<SpawnRecord>,
}

pub(crate) fn parse_scenario_json(raw: &str) -> ScenarioResult<Scenario> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, Scenario>(&mut deserializer) {
        Ok(scenario) => Ok(scenario),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse scenario json: {source}"))
            } else {
                Err(format!("parse scenario json at {path}: {source}"))
            }
        }
    }
}

/// Spawns every record into the world, enqueues door-closed toggles and
/// initial destinations on the sim. Returns the player's id when one was
/// declared.
pub(crate) fn spawn_scenario(
    world: &mut World,
    sim: &mut MovementSim,
    scenario: &Scenario,
) -> Option<EntityId> {
    let mut player_id = None;

    for record in &scenario.spawns {
        let id = world.spawn(
            &record.name,
            record.role.to_entity_role(),
            Vec2 {
                x: record.x,
                y: record.y,
            },
            record.speed,
        );
        if record.role == SpawnRole::Player {
            player_id = Some(id);
        }
        if record.role == SpawnRole::Door && record.starts_closed {
            sim.notify_door_toggled(id, DoorEventKind::Closed);
        }
        if let Some(destination) = record.destination {
            sim.request_destination(world, id, destination.x, destination.y);
        }
    }

    info!(
        entity_count = world.entity_count(),
        player = player_id.is_some(),
        "scenario spawned"
    );
    player_id
}
