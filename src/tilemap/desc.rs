use super::{Tile, TileMap};
use crate::display::ColorKey;
use crate::error::FrameResult;
use crate::util::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How to build one tile of the set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileDesc {
    Solid {
        color: u32,
    },
    Checker {
        a: u32,
        b: u32,
        #[serde(default = "default_cell")]
        cell: u32,
    },
}

fn default_cell() -> u32 {
    4
}

/// Serializable description of a tilemap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMapDesc {
    #[serde(default)]
    pub name: String,
    pub rows: u32,
    pub cols: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tiles: Vec<TileDesc>,
    /// Row-major tile indices
    pub map: Vec<u16>,
    #[serde(default)]
    pub transparent_key: Option<ColorKey>,
}

impl TileMapDesc {
    /// Build the validated map and its tile images
    pub fn build(&self) -> FrameResult<TileMap> {
        let tile_set = self
            .tiles
            .iter()
            .map(|t| match *t {
                TileDesc::Solid { color } => Tile::solid(self.tile_width, self.tile_height, color),
                TileDesc::Checker { a, b, cell } => {
                    Tile::checker(self.tile_width, self.tile_height, a, b, cell)
                },
            })
            .collect::<FrameResult<Vec<_>>>()?;
        TileMap::new(
            self.rows,
            self.cols,
            self.tile_width,
            self.tile_height,
            self.map.clone(),
            tile_set,
        )
    }

    pub fn from_json(json: &str) -> FrameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a description from a JSON file
    pub fn load(path: impl AsRef<Path>) -> FrameResult<Self> {
        let path = path.as_ref();
        let desc = Self::from_json(&fs::read_to_string(path)?)?;
        tracing::info!(
            path = %path.display(),
            rows = desc.rows,
            cols = desc.cols,
            "loaded tilemap description"
        );
        Ok(desc)
    }

    /// Save to a JSON file (pretty-printed)
    pub fn save(&self, path: impl AsRef<Path>) -> FrameResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Bordered map with scattered feature tiles, reproducible from `seed`
    ///
    /// Uses six tiles: four plain ground colours, then two checker tiles.
    /// Borders use tile 1, every eighth diagonal tile 4, every fifth grid
    /// point tile 5, the rest a random pick from 0..4.
    pub fn generate(rows: u32, cols: u32, tile_size: u32, seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        let mut map = Vec::with_capacity(rows as usize * cols as usize);
        for y in 0..rows {
            for x in 0..cols {
                let index = if x == 0 || y == 0 || x + 1 == cols || y + 1 == rows {
                    1
                } else if (x + y) % 8 == 0 {
                    4
                } else if x % 5 == 0 && y % 5 == 0 {
                    5
                } else {
                    (rng.next_u32() % 4) as u16
                };
                map.push(index);
            }
        }

        Self {
            name: "generated".into(),
            rows,
            cols,
            tile_width: tile_size,
            tile_height: tile_size,
            tiles: vec![
                TileDesc::Solid { color: 0xFF22_8B22 },
                TileDesc::Solid { color: 0xFF8B_4513 },
                TileDesc::Solid { color: 0xFF41_69E1 },
                TileDesc::Solid { color: 0xFFDC_143C },
                TileDesc::Checker {
                    a: 0xFFFF_D700,
                    b: 0xFFFF_8C00,
                    cell: 4,
                },
                TileDesc::Checker {
                    a: 0xFF93_70DB,
                    b: 0xFF4B_0082,
                    cell: 4,
                },
            ],
            map,
            transparent_key: None,
        }
    }
}
