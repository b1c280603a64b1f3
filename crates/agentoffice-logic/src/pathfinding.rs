//! BFS pathfinding over the office walkability grid.
//!
//! `WalkGrid` is a row-major boolean matrix (`true` = walkable). `find_path`
//! runs a breadth-first search with a fixed neighbour order (up, down, left,
//! right), so ties between equally short routes always resolve the same way.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Neighbour visitation order: up, down, left, right.
const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// A tile coordinate. Signed so that out-of-bounds requests can be expressed
/// (and rejected) without wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn offset(self, dc: i32, dr: i32) -> Self {
        Self::new(self.col + dc, self.row + dr)
    }

    /// Orthogonal neighbours in visitation order.
    pub fn neighbors(self) -> [Cell; 4] {
        NEIGHBOR_OFFSETS.map(|(dc, dr)| self.offset(dc, dr))
    }
}

/// Facing direction of a character or chair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// Direction of travel from one cell to the next. Horizontal movement
    /// wins; a zero move reports `Up`.
    pub fn toward(from: Cell, to: Cell) -> Self {
        if to.col > from.col {
            Direction::Right
        } else if to.col < from.col {
            Direction::Left
        } else if to.row > from.row {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Rectangular walkability matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkGrid {
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl WalkGrid {
    /// All-walkable grid.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![true; cols * rows],
        }
    }

    /// Build from explicit rows; short rows are padded as blocked.
    pub fn from_rows(rows: &[Vec<bool>]) -> Self {
        let cols = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut grid = Self {
            cols,
            rows: rows.len(),
            cells: vec![false; cols * rows.len()],
        };
        for (r, row) in rows.iter().enumerate() {
            for (c, &walkable) in row.iter().enumerate() {
                grid.cells[r * cols + c] = walkable;
            }
        }
        grid
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.col >= 0
            && cell.row >= 0
            && (cell.col as usize) < self.cols
            && (cell.row as usize) < self.rows
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.row as usize * self.cols + cell.col as usize)
    }

    /// Out-of-bounds cells are never walkable.
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.cells[i])
    }

    /// Set a cell; out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: Cell, walkable: bool) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = walkable;
        }
    }

    /// Mark a `w × h` rectangle unwalkable, clipped to the grid.
    pub fn block_area(&mut self, col: i32, row: i32, w: i32, h: i32) {
        for r in row..row + h {
            for c in col..col + w {
                self.set(Cell::new(c, r), false);
            }
        }
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|&&w| w).count()
    }

    /// Iterate all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, bool)> + '_ {
        self.cells.iter().enumerate().map(|(i, &w)| {
            let cell = Cell::new((i % self.cols) as i32, (i / self.cols) as i32);
            (cell, w)
        })
    }
}

/// Shortest path from `start` to `end`, excluding `start` and including `end`.
///
/// Returns an empty vec when start equals end, when `end` is out of bounds or
/// not walkable, or when no route exists. Callers treat empty as "no movement".
pub fn find_path(grid: &WalkGrid, start: Cell, end: Cell) -> Vec<Cell> {
    if start == end {
        return Vec::new();
    }
    let (Some(start_idx), Some(end_idx)) = (grid.index(start), grid.index(end)) else {
        return Vec::new();
    };
    if !grid.cells[end_idx] {
        return Vec::new();
    }

    let mut came_from: Vec<Option<usize>> = vec![None; grid.cells.len()];
    let mut visited = vec![false; grid.cells.len()];
    let mut queue = VecDeque::new();
    visited[start_idx] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let current_idx = current.row as usize * grid.cols + current.col as usize;
        for next in current.neighbors() {
            let Some(next_idx) = grid.index(next) else {
                continue;
            };
            if visited[next_idx] || !grid.cells[next_idx] {
                continue;
            }
            came_from[next_idx] = Some(current_idx);
            if next_idx == end_idx {
                return reconstruct(grid, &came_from, start_idx, end_idx);
            }
            visited[next_idx] = true;
            queue.push_back(next);
        }
    }

    Vec::new()
}

fn reconstruct(grid: &WalkGrid, came_from: &[Option<usize>], start: usize, end: usize) -> Vec<Cell> {
    let mut path = Vec::new();
    let mut node = end;
    while node != start {
        path.push(Cell::new((node % grid.cols) as i32, (node / grid.cols) as i32));
        match came_from[node] {
            Some(prev) => node = prev,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Every walkable cell reachable from `from` (including `from` when walkable).
pub fn reachable_cells(grid: &WalkGrid, from: Cell) -> Vec<Cell> {
    let Some(from_idx) = grid.index(from) else {
        return Vec::new();
    };
    let mut visited = vec![false; grid.cells.len()];
    let mut queue = VecDeque::new();
    let mut out = Vec::new();
    visited[from_idx] = true;
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        if grid.is_walkable(current) {
            out.push(current);
        }
        for next in current.neighbors() {
            let Some(next_idx) = grid.index(next) else {
                continue;
            };
            if !visited[next_idx] && grid.cells[next_idx] {
                visited[next_idx] = true;
                queue.push_back(next);
            }
        }
    }

    out
}
