//! Grid module - owns the tile board and resolves moves
//!
//! The grid is a `width x height` board stored as a flat row-major vector.
//! Coordinates are `(row, col)` with row 0 at the top and col 0 at the left.
//!
//! A move resolves every line parallel to the move direction independently.
//! Each line is scanned from the far edge (the side tiles travel towards) back
//! to the near edge. A tile either merges into the last tile placed in the line,
//! or is placed in the next free slot. A tile produced by a merge never merges
//! again within the same move.

use tracing::debug;

use crate::error::CoreError;
use crate::rng::SimpleRng;
use crate::types::{
    CellPos, Direction, Level, TileId, DEFAULT_LEVEL_TWO_PERCENT, DEFAULT_SEED_TILES, EMPTY_LEVEL,
    MAX_BOARD_CELLS, MAX_BOARD_SIDE, MAX_LEVEL,
};

/// Validate requested board dimensions.
///
/// Non-positive sides are `InvalidDimension`; sides past [`MAX_BOARD_SIDE`] or
/// boards past [`MAX_BOARD_CELLS`] cells are `DimensionTooLarge`.
pub fn check_dimensions(width: i64, height: i64) -> Result<(u16, u16), CoreError> {
    if width <= 0 || height <= 0 {
        return Err(CoreError::InvalidDimension { width, height });
    }
    let too_large = CoreError::DimensionTooLarge {
        width,
        height,
        max_side: MAX_BOARD_SIDE,
        max_cells: MAX_BOARD_CELLS,
    };
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(too_large);
    };
    if w > MAX_BOARD_SIDE || h > MAX_BOARD_SIDE || w as usize * h as usize > MAX_BOARD_CELLS {
        return Err(too_large);
    }
    Ok((w, h))
}

/// A numbered tile occupying one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub level: Level,
    pub pos: CellPos,
}

/// How many tiles a fresh board gets and how spawn levels are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnPolicy {
    /// Tiles placed by `create_map` (at least one is always placed).
    pub seed_tiles: u16,
    /// Chance in percent that a spawned tile starts at level 2 instead of 1.
    pub level_two_percent: u8,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self {
            seed_tiles: DEFAULT_SEED_TILES,
            level_two_percent: DEFAULT_LEVEL_TWO_PERCENT,
        }
    }
}

/// A tile sliding from one cell to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileMove {
    pub tile: TileId,
    pub from: CellPos,
    pub to: CellPos,
}

/// Two equal tiles combined into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileMerge {
    /// Tile that stays on the board (the one nearer the far edge).
    pub survivor: TileId,
    /// Tile removed from the board.
    pub consumed: TileId,
    pub cell: CellPos,
    /// Level of the survivor after the merge.
    pub level: Level,
}

/// Everything an effective move changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
    pub moves: Vec<TileMove>,
    pub merges: Vec<TileMerge>,
    /// `None` when no empty cell was left for the post-move spawn.
    pub spawned: Option<Tile>,
}

impl MergeResult {
    pub fn merge_count(&self) -> usize {
        self.merges.len()
    }

    pub fn has_merges(&self) -> bool {
        !self.merges.is_empty()
    }

    /// The post-move spawn could not be placed.
    pub fn board_full(&self) -> bool {
        self.spawned.is_none()
    }
}

/// Result of [`TileGrid::apply_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing slid and nothing merged; no tile was spawned.
    NoChange,
    Changed(MergeResult),
}

impl MoveOutcome {
    pub fn is_change(&self) -> bool {
        matches!(self, MoveOutcome::Changed(_))
    }

    pub fn merge_result(&self) -> Option<&MergeResult> {
        match self {
            MoveOutcome::NoChange => None,
            MoveOutcome::Changed(result) => Some(result),
        }
    }
}

/// The tile board of one session.
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: u16,
    height: u16,
    /// Row-major cells (`row * width + col`).
    cells: Vec<Option<Tile>>,
    next_id: u32,
    rng: SimpleRng,
    policy: SpawnPolicy,
}

impl TileGrid {
    fn empty(width: u16, height: u16, policy: SpawnPolicy, seed: u32) -> Result<Self, CoreError> {
        check_dimensions(width as i64, height as i64)?;
        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
            next_id: 1,
            rng: SimpleRng::new(seed),
            policy,
        })
    }

    /// Allocate an empty board and place the initial tiles.
    pub fn create_map(
        width: u16,
        height: u16,
        policy: SpawnPolicy,
        seed: u32,
    ) -> Result<Self, CoreError> {
        let mut grid = Self::empty(width, height, policy, seed)?;
        let seed_count = (policy.seed_tiles.max(1) as usize).min(grid.cells.len());
        for _ in 0..seed_count {
            grid.spawn_tile()?;
        }
        debug!(width, height, seed_count, "created tile grid");
        Ok(grid)
    }

    /// Build a board from row-major levels (`0` = empty). No tiles are spawned.
    pub fn from_levels(
        width: u16,
        height: u16,
        levels: &[Level],
        policy: SpawnPolicy,
        seed: u32,
    ) -> Result<Self, CoreError> {
        let mut grid = Self::empty(width, height, policy, seed)?;
        if levels.len() != grid.cells.len() {
            return Err(CoreError::InvalidDimension {
                width: width as i64,
                height: (levels.len() / width as usize) as i64,
            });
        }
        for (idx, &level) in levels.iter().enumerate() {
            if level == EMPTY_LEVEL {
                continue;
            }
            if level > MAX_LEVEL {
                return Err(CoreError::InvalidLevel(level));
            }
            let id = grid.alloc_id();
            grid.cells[idx] = Some(Tile {
                id,
                level,
                pos: CellPos::from_index(idx, width),
            });
        }
        Ok(grid)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn policy(&self) -> SpawnPolicy {
        self.policy
    }

    /// Tile at `pos`, `None` if empty or out of bounds.
    pub fn tile_at(&self, pos: CellPos) -> Option<Tile> {
        if pos.row >= self.height || pos.col >= self.width {
            return None;
        }
        self.cells[pos.index(self.width)]
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.len() - self.tile_count()
    }

    /// Row-major levels, `0` for empty cells.
    pub fn levels(&self) -> Vec<Level> {
        self.cells
            .iter()
            .map(|cell| cell.map_or(EMPTY_LEVEL, |tile| tile.level))
            .collect()
    }

    fn alloc_id(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Place a new low-level tile on a random empty cell.
    pub fn spawn_tile(&mut self) -> Result<Tile, CoreError> {
        let empty: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(idx, _)| idx)
            .collect();

        let Some(idx) = self.rng.pick(&empty) else {
            return Err(CoreError::BoardFull);
        };

        let level = self.rng.spawn_level(self.policy.level_two_percent);
        let tile = Tile {
            id: self.alloc_id(),
            level,
            pos: CellPos::from_index(idx, self.width),
        };
        self.cells[idx] = Some(tile);
        Ok(tile)
    }

    /// Number of lines a move in `direction` resolves.
    fn line_count(&self, direction: Direction) -> u16 {
        if direction.is_vertical() {
            self.width
        } else {
            self.height
        }
    }

    /// Cells of one line, ordered from the far edge to the near edge.
    fn line_cells(&self, direction: Direction, line: u16) -> Vec<CellPos> {
        match direction {
            Direction::Left => (0..self.width).map(|col| CellPos::new(line, col)).collect(),
            Direction::Right => (0..self.width)
                .rev()
                .map(|col| CellPos::new(line, col))
                .collect(),
            Direction::Up => (0..self.height).map(|row| CellPos::new(row, line)).collect(),
            Direction::Down => (0..self.height)
                .rev()
                .map(|row| CellPos::new(row, line))
                .collect(),
        }
    }

    /// Slide and merge one line, recording transitions into `result`.
    fn resolve_line(&mut self, slots: &[CellPos], result: &mut MergeResult) {
        let width = self.width;
        let tiles: Vec<Tile> = slots
            .iter()
            .filter_map(|pos| self.cells[pos.index(width)].take())
            .collect();

        let mut write = 0usize;
        let mut last_merged = false;

        for tile in tiles {
            if write > 0 && !last_merged {
                let target = slots[write - 1];
                let target_idx = target.index(width);
                if let Some(prev) = self.cells[target_idx] {
                    if prev.level == tile.level && tile.level < MAX_LEVEL {
                        let level = prev.level + 1;
                        self.cells[target_idx] = Some(Tile { level, ..prev });
                        result.moves.push(TileMove {
                            tile: tile.id,
                            from: tile.pos,
                            to: target,
                        });
                        result.merges.push(TileMerge {
                            survivor: prev.id,
                            consumed: tile.id,
                            cell: target,
                            level,
                        });
                        last_merged = true;
                        continue;
                    }
                }
            }

            let dest = slots[write];
            if dest != tile.pos {
                result.moves.push(TileMove {
                    tile: tile.id,
                    from: tile.pos,
                    to: dest,
                });
            }
            self.cells[dest.index(width)] = Some(Tile { pos: dest, ..tile });
            write += 1;
            last_merged = false;
        }
    }

    /// Slide every tile towards `direction`, merge equal neighbours and spawn.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        let mut result = MergeResult::default();

        for line in 0..self.line_count(direction) {
            let slots = self.line_cells(direction, line);
            self.resolve_line(&slots, &mut result);
        }

        if result.moves.is_empty() && result.merges.is_empty() {
            debug!(direction = direction.as_str(), "move changed nothing");
            return MoveOutcome::NoChange;
        }

        result.spawned = self.spawn_tile().ok();
        if result.spawned.is_none() {
            debug!("no empty cell left after move");
        }

        debug!(
            direction = direction.as_str(),
            moved = result.moves.len(),
            merged = result.merges.len(),
            "move resolved"
        );
        MoveOutcome::Changed(result)
    }

    /// Whether any direction would change the board.
    pub fn has_valid_moves(&self) -> bool {
        if self.cells.iter().any(|cell| cell.is_none()) {
            return true;
        }

        for row in 0..self.height {
            for col in 0..self.width {
                let Some(tile) = self.tile_at(CellPos::new(row, col)) else {
                    continue;
                };
                if tile.level >= MAX_LEVEL {
                    continue;
                }
                let right = self.tile_at(CellPos::new(row, col + 1));
                let below = self.tile_at(CellPos::new(row + 1, col));
                if [right, below]
                    .iter()
                    .flatten()
                    .any(|other| other.level == tile.level)
                {
                    return true;
                }
            }
        }

        false
    }
}
