//! Level layouts and where they come from
//!
//! A level is a plain-text grid, one file per level (`<level>.txt`). The top
//! row maps to world y = 54 and each character is one unit cell:
//! `x` obstacle, `k` key, `e` exit, `s` spark, anything else empty.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::WORLD_HEIGHT;

/// Columns scanned per row (0..=96)
pub const MAX_COLUMNS: usize = 97;
/// Rows scanned per file (y = 54 down to 0)
pub const MAX_ROWS: usize = 55;

/// Entities of one level, in world space and file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub obstacles: Vec<Vec2>,
    pub key: Option<Vec2>,
    pub exit: Option<Vec2>,
    pub sparks: Vec<Vec2>,
}

impl LevelLayout {
    /// No obstacles, no key, no exit
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a level grid. Unknown characters are empty cells; when a key or
    /// exit appears more than once the last one wins.
    pub fn parse(text: &str) -> Self {
        let mut layout = Self::empty();
        for (row, line) in text.lines().take(MAX_ROWS).enumerate() {
            for (col, cell) in line.bytes().take(MAX_COLUMNS).enumerate() {
                let pos = cell_center(col, row);
                match cell {
                    b'x' => layout.obstacles.push(pos),
                    b'k' => layout.key = Some(pos),
                    b'e' => layout.exit = Some(pos),
                    b's' => layout.sparks.push(pos),
                    _ => {}
                }
            }
        }
        layout
    }

    /// Level 0 never has a key or exit
    fn idle(mut self) -> Self {
        self.key = None;
        self.exit = None;
        self
    }
}

/// World-space center of a grid cell
#[inline]
pub fn cell_center(col: usize, row: usize) -> Vec2 {
    Vec2::new(col as f32 + 0.5, WORLD_HEIGHT - row as f32 - 0.5)
}

/// Something that can produce the layout for a level number
pub trait LevelSource {
    /// Load a level. Never fails: missing levels come back empty.
    fn load(&self, level: u32) -> LevelLayout;
}

/// Levels read from `<dir>/<level>.txt`
#[derive(Debug, Clone)]
pub struct DirLevelSource {
    dir: PathBuf,
}

impl DirLevelSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, level: u32) -> PathBuf {
        self.dir.join(format!("{level}.txt"))
    }
}

impl LevelSource for DirLevelSource {
    fn load(&self, level: u32) -> LevelLayout {
        let path = self.path_for(level);
        let layout = match std::fs::read_to_string(&path) {
            Ok(text) => LevelLayout::parse(&text),
            Err(e) => {
                log::warn!("Level file {} unavailable ({}), using empty level", path.display(), e);
                LevelLayout::empty()
            }
        };
        if level == 0 { layout.idle() } else { layout }
    }
}

/// Levels held in memory, keyed by level number
#[derive(Debug, Clone, Default)]
pub struct StaticLevels {
    levels: BTreeMap<u32, String>,
}

impl StaticLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a level grid
    pub fn with_level(mut self, level: u32, grid: impl Into<String>) -> Self {
        self.levels.insert(level, grid.into());
        self
    }

    /// Levels bundled into the binary
    pub fn bundled() -> Self {
        Self::new()
            .with_level(0, include_str!("../../levels/0.txt"))
            .with_level(1, include_str!("../../levels/1.txt"))
            .with_level(2, include_str!("../../levels/2.txt"))
            .with_level(3, include_str!("../../levels/3.txt"))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl LevelSource for StaticLevels {
    fn load(&self, level: u32) -> LevelLayout {
        let layout = match self.levels.get(&level) {
            Some(text) => LevelLayout::parse(text),
            None => {
                log::warn!("No level {} bundled, using empty level", level);
                LevelLayout::empty()
            }
        };
        if level == 0 { layout.idle() } else { layout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_maps_cells_to_world() {
        let layout = LevelLayout::parse("x.k\n..e\ns");
        assert_eq!(layout.obstacles, vec![Vec2::new(0.5, 53.5)]);
        assert_eq!(layout.key, Some(Vec2::new(2.5, 53.5)));
        assert_eq!(layout.exit, Some(Vec2::new(2.5, 52.5)));
        assert_eq!(layout.sparks, vec![Vec2::new(0.5, 51.5)]);
    }

    #[test]
    fn test_parse_keeps_file_order() {
        let layout = LevelLayout::parse("..x\nx..");
        assert_eq!(
            layout.obstacles,
            vec![Vec2::new(2.5, 53.5), Vec2::new(0.5, 52.5)]
        );
    }

    #[test]
    fn test_parse_limits_columns_and_rows() {
        let wide = "x".repeat(200);
        let layout = LevelLayout::parse(&wide);
        assert_eq!(layout.obstacles.len(), MAX_COLUMNS);

        let tall = "x\n".repeat(100);
        let layout = LevelLayout::parse(&tall);
        assert_eq!(layout.obstacles.len(), MAX_ROWS);
        assert_eq!(layout.obstacles.last().map(|p| p.y), Some(-0.5));
    }

    #[test]
    fn test_last_key_wins() {
        let layout = LevelLayout::parse("k..k");
        assert_eq!(layout.key, Some(Vec2::new(3.5, 53.5)));
    }

    #[test]
    fn test_static_missing_level_is_empty() {
        let levels = StaticLevels::new();
        assert_eq!(levels.load(7), LevelLayout::empty());
    }

    #[test]
    fn test_level_zero_has_no_key_or_exit() {
        let levels = StaticLevels::new().with_level(0, "xke");
        let layout = levels.load(0);
        assert_eq!(layout.obstacles.len(), 1);
        assert!(layout.key.is_none());
        assert!(layout.exit.is_none());
    }

    #[test]
    fn test_dir_missing_file_is_empty() {
        let source = DirLevelSource::new("/nonexistent/keyshot-levels");
        assert_eq!(source.load(1), LevelLayout::empty());
    }

    #[test]
    fn test_dir_reads_level_files() {
        let dir = std::env::temp_dir().join(format!("keyshot-levels-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create level dir");
        let grid = "x.k\r\n..e\r\ns\r\n";
        std::fs::write(dir.join("0.txt"), grid).expect("write level 0");
        std::fs::write(dir.join("1.txt"), grid).expect("write level 1");

        let source = DirLevelSource::new(&dir);
        let level = source.load(1);
        assert_eq!(level.obstacles, vec![Vec2::new(0.5, 53.5)]);
        assert_eq!(level.key, Some(Vec2::new(2.5, 53.5)));
        assert_eq!(level.exit, Some(Vec2::new(2.5, 52.5)));
        assert_eq!(level.sparks, vec![Vec2::new(0.5, 51.5)]);

        let idle = source.load(0);
        assert_eq!(idle.obstacles, level.obstacles);
        assert_eq!(idle.sparks, level.sparks);
        assert!(idle.key.is_none());
        assert!(idle.exit.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_bundled_levels_are_playable() {
        let levels = StaticLevels::bundled();
        assert_eq!(levels.len(), 4);
        for n in 1..=3 {
            let layout = levels.load(n);
            assert!(layout.key.is_some(), "level {n} has a key");
            assert!(layout.exit.is_some(), "level {n} has an exit");
            assert!(!layout.obstacles.is_empty());
        }
    }
}
