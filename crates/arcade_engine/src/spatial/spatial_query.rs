//! Broad-phase interface for collision detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.2:
//! "Spatial partitioning schemes... allow us to quickly cull out pairs of
//! objects that cannot possibly be colliding."
//!
//! A broad phase only proposes candidate pairs. It may propose pairs that do
//! not overlap, but it must never miss a pair that does; the narrow phase in
//! [`crate::physics::CollisionDetector`] makes the final call.

use crate::foundation::math::Rect;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Broad-phase collision culling strategy
pub trait BroadPhase {
    /// Candidate index pairs `(i, j)` with `i < j`, sorted and without duplicates
    fn candidate_pairs(&mut self, boxes: &[Rect]) -> Vec<(usize, usize)>;

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}

/// Checks every pair. Fine for the handful of entities an arcade scene holds.
#[derive(Debug, Default, Clone, Copy)]
pub struct BruteForce;

impl BroadPhase for BruteForce {
    fn candidate_pairs(&mut self, boxes: &[Rect]) -> Vec<(usize, usize)> {
        let n = boxes.len();
        (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))).collect()
    }

    fn name(&self) -> &'static str {
        "brute_force"
    }
}

/// Uniform grid: boxes sharing at least one cell become candidates
#[derive(Debug, Clone)]
pub struct UniformGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl UniformGrid {
    /// Smallest accepted cell size
    pub const MIN_CELL_SIZE: f32 = 1.0;

    /// Create a grid with square cells of `cell_size` units
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: if cell_size.is_finite() { cell_size.max(Self::MIN_CELL_SIZE) } else { Self::MIN_CELL_SIZE },
            cells: HashMap::new(),
        }
    }

    /// Cell edge length
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn cell_of(&self, value: f32) -> i32 {
        (value / self.cell_size).floor() as i32
    }
}

impl BroadPhase for UniformGrid {
    fn candidate_pairs(&mut self, boxes: &[Rect]) -> Vec<(usize, usize)> {
        self.cells.clear();
        for (index, rect) in boxes.iter().enumerate() {
            let (x0, x1) = (self.cell_of(rect.x), self.cell_of(rect.right()));
            let (y0, y1) = (self.cell_of(rect.y), self.cell_of(rect.bottom()));
            for cx in x0..=x1 {
                for cy in y0..=y1 {
                    self.cells.entry((cx, cy)).or_default().push(index);
                }
            }
        }

        let mut pairs = BTreeSet::new();
        for members in self.cells.values() {
            for (k, &i) in members.iter().enumerate() {
                for &j in &members[k + 1..] {
                    pairs.insert((i.min(j), i.max(j)));
                }
            }
        }
        pairs.into_iter().collect()
    }

    fn name(&self) -> &'static str {
        "uniform_grid"
    }
}

/// Configurable broad-phase selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BroadPhaseKind {
    /// [`BruteForce`]
    BruteForce,
    /// [`UniformGrid`] with the given cell size
    UniformGrid {
        /// Cell edge length in world units
        cell_size: f32,
    },
}

impl Default for BroadPhaseKind {
    fn default() -> Self {
        Self::UniformGrid { cell_size: 128.0 }
    }
}

impl BroadPhaseKind {
    /// Build the configured strategy
    pub fn build(self) -> Box<dyn BroadPhase> {
        match self {
            Self::BruteForce => Box::new(BruteForce),
            Self::UniformGrid { cell_size } => Box::new(UniformGrid::new(cell_size)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlapping_pairs(boxes: &[Rect]) -> Vec<(usize, usize)> {
        BruteForce
            .candidate_pairs(boxes)
            .into_iter()
            .filter(|&(i, j)| boxes[i].intersects(&boxes[j]))
            .collect()
    }

    #[test]
    fn test_brute_force_lists_every_pair() {
        let boxes = vec![Rect::default(); 4];
        assert_eq!(BruteForce.candidate_pairs(&boxes).len(), 6);
    }

    #[test]
    fn test_grid_never_misses_an_overlap() {
        let boxes = vec![
            Rect::new(0.0, 0.0, 64.0, 64.0),
            Rect::new(50.0, 50.0, 32.0, 32.0),
            Rect::new(500.0, 500.0, 10.0, 10.0),
            Rect::new(-40.0, -40.0, 45.0, 45.0),
            Rect::new(120.0, 0.0, 400.0, 20.0),
            Rect::new(300.0, 10.0, 5.0, 5.0),
        ];
        let mut grid = UniformGrid::new(32.0);
        let candidates = grid.candidate_pairs(&boxes);
        for pair in overlapping_pairs(&boxes) {
            assert!(candidates.contains(&pair), "grid missed {pair:?}");
        }
    }

    #[test]
    fn test_grid_culls_distant_boxes() {
        let boxes = vec![Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(1000.0, 1000.0, 10.0, 10.0)];
        assert!(UniformGrid::new(64.0).candidate_pairs(&boxes).is_empty());
    }

    #[test]
    fn test_grid_pairs_are_unique_and_sorted() {
        // Both boxes span the same four cells
        let boxes = vec![Rect::new(10.0, 10.0, 40.0, 40.0), Rect::new(12.0, 12.0, 40.0, 40.0)];
        assert_eq!(UniformGrid::new(32.0).candidate_pairs(&boxes), vec![(0, 1)]);
    }

    #[test]
    fn test_kind_builds_strategy() {
        assert_eq!(BroadPhaseKind::BruteForce.build().name(), "brute_force");
        assert_eq!(BroadPhaseKind::default().build().name(), "uniform_grid");
        assert_eq!(UniformGrid::new(-3.0).cell_size(), UniformGrid::MIN_CELL_SIZE);
    }
}
