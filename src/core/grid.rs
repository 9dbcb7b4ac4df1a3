use crate::core::particle::{Particle, DIM};
use std::collections::HashMap;

/// Integer cell coordinates `(cx, cy)` of a grid cell.
pub type CellKey = (i32, i32);

/// Uniform spatial grid for broad-phase collision culling.
///
/// Cells are sized to exactly the collision diameter (`2 * radius`), which
/// guarantees that any two particles whose centers are within collision range
/// occupy the same cell or cells in each other's 3x3 Moore neighborhood. The
/// narrow-phase scan relies on that guarantee; the cell size must not change
/// independently of the radius.
///
/// The grid stores particle indices, never particle data, and is rebuilt from
/// scratch every step. Buckets are cleared rather than dropped across
/// rebuilds so the steady state allocates nothing; cells vacated by every
/// particle keep an empty bucket, which lookups skip naturally.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    half_extent: f32,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl SpatialGrid {
    /// Create an empty grid over the square domain `[-half_extent, half_extent]^2`
    /// with diameter-sized cells. Inputs are validated by `Simulation::new`.
    pub fn new(radius: f32, half_extent: f32) -> Self {
        Self {
            cell_size: 2.0 * radius,
            half_extent,
            cells: HashMap::new(),
        }
    }

    /// Cell size in world units (the collision diameter).
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell coordinates for a world position: `floor((pos + half) / cell_size)`.
    #[inline]
    pub fn key_for(&self, r: &[f32; DIM]) -> CellKey {
        let cx = ((r[0] + self.half_extent) / self.cell_size).floor() as i32;
        let cy = ((r[1] + self.half_extent) / self.cell_size).floor() as i32;
        (cx, cy)
    }

    /// Rebuild the grid from the current particle positions.
    ///
    /// Iterates the store in index order, so every bucket holds ascending
    /// particle indices; the narrow phase's `j > i` dedup depends on indices
    /// being comparable, and the in-order insertion keeps the scan order
    /// reproducible.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        for (i, p) in particles.iter().enumerate() {
            let key = self.key_for(&p.r);
            self.cells.entry(key).or_default().push(i);
        }
    }

    /// Particle indices in the given cell; empty slice if the cell is vacant.
    #[inline]
    pub fn cell(&self, key: CellKey) -> &[usize] {
        self.cells.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Number of currently occupied (non-empty) cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.values().filter(|b| !b.is_empty()).count()
    }
}
