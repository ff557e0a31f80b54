use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::entity::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map extent must be nonzero, got {width}x{height}")]
    EmptyExtent { width: u32, height: u32 },
    #[error("cell count mismatch: expected {expected}, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
    #[error("cell ({x}, {y}) lies outside the {width}x{height} map extent")]
    CellOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Static grid description for one play session: per-cell passability and
/// roof-layer membership. The grid never changes shape after construction;
/// only the roof layer's visibility flag is mutable.
#[derive(Debug, Clone, PartialEq)]
pub struct MapGrid {
    width: u32,
    height: u32,
    blocked: Vec<bool>,
    roof: Vec<bool>,
    roof_visible: bool,
}

impl MapGrid {
    pub fn new(
        width: u32,
        height: u32,
        blocked: Vec<bool>,
        roof: Vec<bool>,
    ) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::EmptyExtent { width, height });
        }
        let expected = width as usize * height as usize;
        if blocked.len() != expected {
            return Err(MapError::CellCountMismatch {
                expected,
                actual: blocked.len(),
            });
        }
        if roof.len() != expected {
            return Err(MapError::CellCountMismatch {
                expected,
                actual: roof.len(),
            });
        }
        Ok(Self {
            width,
            height,
            blocked,
            roof,
            roof_visible: true,
        })
    }

    pub fn from_description(description: &MapDescription) -> Result<Self, MapError> {
        let width = description.width;
        let height = description.height;
        if width == 0 || height == 0 {
            return Err(MapError::EmptyExtent { width, height });
        }
        let cell_count = width as usize * height as usize;
        let mut blocked = vec![false; cell_count];
        let mut roof = vec![false; cell_count];
        for cell in &description.blocked_cells {
            let index = cell_index(width, height, *cell)?;
            blocked[index] = true;
        }
        for cell in &description.roof_cells {
            let index = cell_index(width, height, *cell)?;
            roof[index] = true;
        }
        debug!(
            width,
            height,
            blocked_cells = description.blocked_cells.len(),
            roof_cells = description.roof_cells.len(),
            "map grid built"
        );
        Self::new(width, height, blocked, roof)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn is_blocked(&self, x: u32, y: u32) -> bool {
        self.index_of(x, y)
            .and_then(|index| self.blocked.get(index))
            .copied()
            .unwrap_or(true)
    }

    pub fn has_roof_at(&self, x: u32, y: u32) -> bool {
        self.index_of(x, y)
            .and_then(|index| self.roof.get(index))
            .copied()
            .unwrap_or(false)
    }

    /// Tile under a continuous position, flooring each axis. `None` when the
    /// position lies outside the map extent.
    pub fn tile_of(&self, position: Vec2) -> Option<(u32, u32)> {
        let tile_x = position.x.floor() as i64;
        let tile_y = position.y.floor() as i64;
        if tile_x < 0 || tile_y < 0 {
            return None;
        }
        let tile_x = tile_x as u32;
        let tile_y = tile_y as u32;
        if tile_x >= self.width || tile_y >= self.height {
            return None;
        }
        Some((tile_x, tile_y))
    }

    /// Clamps a continuous position into the map extent. Tile coordinates
    /// double as positions here, so the valid range per axis is
    /// `0.0..=(extent - 1)`.
    pub fn clamp_point(&self, position: Vec2) -> Vec2 {
        let max_x = self.width.saturating_sub(1) as f32;
        let max_y = self.height.saturating_sub(1) as f32;
        Vec2 {
            x: position.x.clamp(0.0, max_x),
            y: position.y.clamp(0.0, max_y),
        }
    }

    pub fn roof_visible(&self) -> bool {
        self.roof_visible
    }

    pub fn set_roof_visible(&mut self, visible: bool) {
        self.roof_visible = visible;
    }
}

fn cell_index(width: u32, height: u32, cell: CellRef) -> Result<usize, MapError> {
    if cell.x >= width || cell.y >= height {
        return Err(MapError::CellOutOfBounds {
            x: cell.x,
            y: cell.y,
            width,
            height,
        });
    }
    Ok(cell.y as usize * width as usize + cell.x as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDescription {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub blocked_cells: Vec<CellRef>,
    #[serde(default)]
    pub roof_cells: Vec<CellRef>,
}

impl MapDescription {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
