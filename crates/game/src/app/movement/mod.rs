use std::collections::HashMap;

use tracing::{debug, info, warn};
use world::{Entity, EntityId, EntityRole, MapGrid, Vec2, World};

const STOP_PRECISION: f32 = 0.1;

include!("types.rs");
include!("graph.rs");
include!("search.rs");
include!("systems.rs");
