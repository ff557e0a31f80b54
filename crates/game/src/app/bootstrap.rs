use std::fs;

use tracing::info;
use tracing_subscriber::EnvFilter;
use world::{EntityId, MapGrid, World};

use super::loop_runner::SimConfig;
use super::movement::MovementSim;
use super::scenario::{self, ScenarioResult};

const SCENARIO_PATH_ENV_VAR: &str = "ISOWALK_SCENARIO";

/// Built-in session used when no scenario file is supplied: a walled
/// courtyard with a roofed hut, a door into it, and a player walking
/// from the gate to the hut interior.
const DEMO_SCENARIO: &str = r#"{
    "map": {
        "width": 12,
        "height": 12,
        "blocked_cells": [
            { "x": 6, "y": 4 }, { "x": 7, "y": 4 }, { "x": 8, "y": 4 },
            { "x": 6, "y": 5 },                     { "x": 8, "y": 5 },
            { "x": 6, "y": 6 },                     { "x": 8, "y": 6 }
        ],
        "roof_cells": [
            { "x": 6, "y": 4 }, { "x": 7, "y": 4 }, { "x": 8, "y": 4 },
            { "x": 6, "y": 5 }, { "x": 7, "y": 5 }, { "x": 8, "y": 5 },
            { "x": 6, "y": 6 }, { "x": 7, "y": 6 }, { "x": 8, "y": 6 }
        ]
    },
    "spawns": [
        { "name": "player", "role": "player", "x": 1.0, "y": 1.0,
          "destination": { "x": 7.0, "y": 5.0 } },
        { "name": "hut_door", "role": "door", "x": 7.0, "y": 6.0, "speed": 0.0 },
        { "name": "villager", "role": "npc", "x": 10.0, "y": 1.0, "speed": 2.0,
          "destination": { "x": 1.0, "y": 10.0 } }
    ]
}"#;

pub(crate) struct AppWiring {
    pub(crate) config: SimConfig,
    pub(crate) world: World,
    pub(crate) sim: MovementSim,
    pub(crate) player_id: Option<EntityId>,
}

pub(crate) fn build_app() -> ScenarioResult<AppWiring> {
    init_tracing();
    info!("=== Isowalk Startup ===");

    let raw = load_scenario_source()?;
    let scenario = scenario::parse_scenario_json(&raw)?;
    let map = MapGrid::from_description(&scenario.map)
        .map_err(|error| format!("build map grid: {error}"))?;

    let mut sim = MovementSim::new(map);
    let mut world = World::default();
    let player_id = scenario::spawn_scenario(&mut world, &mut sim, &scenario);

    info!(
        map_width = sim.map().width(),
        map_height = sim.map().height(),
        "world ready"
    );

    Ok(AppWiring {
        config: SimConfig::default(),
        world,
        sim,
        player_id,
    })
}

fn load_scenario_source() -> ScenarioResult<String> {
    match std::env::var(SCENARIO_PATH_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => {
            info!(path = %path, "loading scenario file");
            fs::read_to_string(&path)
                .map_err(|error| format!("read scenario file {path}: {error}"))
        }
        _ => Ok(DEMO_SCENARIO.to_string()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
