use crate::error::{Error, Result};

/// Fixed spatial dimension (2D).
pub const DIM: usize = 2;

/// A disc particle in the 2D collision kernel.
///
/// Fields:
/// - `r`: position [x, y]
/// - `v`: velocity [vx, vy]
///
/// Particles carry no identifier: their index in the simulation's particle
/// store is their identity, and that index is the tie-break key for collision
/// pair deduplication. The store never grows or shrinks after construction,
/// so indices are stable for the simulation's lifetime. Radius is uniform
/// across all particles and lives on the simulation, not here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position (x, y).
    pub r: [f32; DIM],
    /// Velocity (vx, vy).
    pub v: [f32; DIM],
}

impl Particle {
    /// Create a new particle after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if any component is NaN/inf.
    pub fn new(r: [f32; DIM], v: [f32; DIM]) -> Result<Self> {
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self { r, v })
    }

    /// Returns the particle's speed: |v|.
    #[inline]
    pub fn speed(&self) -> f32 {
        let vsq: f32 = self.v.iter().map(|&c| c * c).sum();
        vsq.sqrt()
    }

    /// Returns the particle's kinetic energy for unit mass: 1/2 |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        let vsq: f32 = self.v.iter().map(|&c| c * c).sum();
        0.5 * vsq
    }

    /// Set position (validated as finite).
    pub fn set_position(&mut self, r: [f32; DIM]) -> Result<()> {
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        self.r = r;
        Ok(())
    }

    /// Set velocity (validated as finite).
    pub fn set_velocity(&mut self, v: [f32; DIM]) -> Result<()> {
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        self.v = v;
        Ok(())
    }
}
