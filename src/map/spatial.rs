use crate::geo::Bounds;
use glam::DVec2;
use std::collections::HashMap;

/// Spatial index over department bounding boxes.
///
/// Each department is indexed into every cell its bbox overlaps, so a point
/// query never misses a department but may return ones whose polygons do not
/// contain the point (eliminated by the caller's exact test).
pub struct FeatureGrid {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl FeatureGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
        }
    }

    #[inline(always)]
    fn to_cell(&self, p: DVec2) -> (i32, i32) {
        let x = (p.x / self.cell_size).floor() as i32;
        let y = (p.y / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Build from per-feature bounds; `None` entries (no geometry) are skipped
    /// but still consume an index
    pub fn build(bounds: impl Iterator<Item = Option<Bounds>>, cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (idx, b) in bounds.enumerate() {
            let Some(b) = b else { continue };
            let min_cell = grid.to_cell(b.min);
            let max_cell = grid.to_cell(b.max);
            for y in min_cell.1..=max_cell.1 {
                for x in min_cell.0..=max_cell.0 {
                    grid.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        grid
    }

    /// Candidate feature indices for a point, in ascending order
    #[inline(always)]
    pub fn query_point(&self, p: DVec2) -> &[usize] {
        self.cells
            .get(&self.to_cell(p))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(x0: f64, y0: f64, x1: f64, y1: f64) -> Option<Bounds> {
        Some(Bounds {
            min: DVec2::new(x0, y0),
            max: DVec2::new(x1, y1),
        })
    }

    #[test]
    fn test_query_point_candidates() {
        let grid = FeatureGrid::build(
            [bounds(-77.0, -12.0, -76.0, -11.0), None, bounds(-76.5, -12.0, -75.0, -11.0)].into_iter(),
            0.5,
        );
        assert_eq!(grid.query_point(DVec2::new(-76.2, -11.7)), &[0, 2]);
        assert_eq!(grid.query_point(DVec2::new(-75.2, -11.7)), &[2]);
        assert!(grid.query_point(DVec2::new(-70.0, -15.0)).is_empty());
    }
}
