use crate::core::particle::DIM;
use crate::core::{Particle, SpatialGrid};
use crate::error::{Error, Result};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::TAU;

/// Speed given to every particle at initialization; only the direction is
/// randomized.
const INITIAL_SPEED: f32 = 80.0;

/// Peak-to-peak bound of the per-axis velocity jitter applied after a pair
/// resolution (each component gets a uniform sample in [-0.005, 0.005]).
const PERTURBATION: f32 = 0.01;

/// Nominal x-offset substituted for the center delta when two centers
/// coincide exactly, so the collision normal stays defined.
const COINCIDENT_NUDGE: f32 = 1e-3;

/// Fixed-timestep 2D collision simulation over a square domain
/// `[-half_extent, half_extent]^2` with hard walls.
///
/// One `step` runs Integrate -> BuildIndex -> DetectAndResolve to completion
/// before returning; the particle store is only read between steps. All
/// randomness (initial placement and post-resolution jitter) draws from one
/// seedable generator owned by the simulation, so seeded runs are
/// reproducible.
#[derive(Debug)]
pub struct Simulation {
    radius: f32,
    half_extent: f32,
    dt: f32,
    pub particles: Vec<Particle>,
    grid: SpatialGrid,
    rng: StdRng,
}

impl Simulation {
    /// Create a new simulation with `num_particles` discs of uniform `radius`
    /// inside `[-half_extent, half_extent]^2`, stepped by the fixed timestep
    /// `dt` unless a step override is given.
    ///
    /// Positions are sampled uniformly in the radius-inset box
    /// `[-half_extent + radius, half_extent - radius]` per axis, so the wall
    /// containment invariant holds from step 0. Initial overlaps are allowed;
    /// they resolve through the normal collision path. Velocities are a
    /// uniform random direction at a fixed speed.
    pub fn new(
        num_particles: usize,
        radius: f32,
        half_extent: f32,
        dt: f32,
        seed: Option<u64>,
    ) -> Result<Self> {
        if num_particles == 0 {
            return Err(Error::InvalidParam("num_particles must be > 0".into()));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !half_extent.is_finite() || half_extent <= radius {
            return Err(Error::InvalidParam(
                "half_extent must be finite and > radius (domain must contain a particle)".into(),
            ));
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(Error::InvalidParam("dt must be finite and > 0".into()));
        }

        let mut rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };

        let mut particles: Vec<Particle> = Vec::with_capacity(num_particles);
        let lo = -half_extent + radius;
        let hi = half_extent - radius;
        for _ in 0..num_particles {
            let r = [rng.random_range(lo..=hi), rng.random_range(lo..=hi)];
            let angle: f32 = rng.random_range(0.0..TAU);
            let v = [angle.cos() * INITIAL_SPEED, angle.sin() * INITIAL_SPEED];
            particles.push(Particle::new(r, v)?);
        }

        Ok(Self {
            radius,
            half_extent,
            dt,
            particles,
            grid: SpatialGrid::new(radius, half_extent),
            rng,
        })
    }

    /// Number of particles (constant for the simulation's lifetime).
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Uniform particle radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Domain half-extent.
    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// Fixed timestep supplied at construction.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Positions as a Vec of fixed-size arrays.
    pub fn positions(&self) -> Vec<[f32; DIM]> {
        self.particles.iter().map(|p| p.r).collect()
    }

    /// Velocities as a Vec of fixed-size arrays.
    pub fn velocities(&self) -> Vec<[f32; DIM]> {
        self.particles.iter().map(|p| p.v).collect()
    }

    /// Total kinetic energy for unit particle mass (diagnostic).
    ///
    /// The velocity-swap collision response conserves this exactly; the
    /// post-resolution jitter perturbs it by a bounded, tiny amount.
    pub fn kinetic_energy(&self) -> f32 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Advance one step with the given timestep:
    /// integrate motion, rebuild the spatial index, detect and resolve pairs.
    pub fn step(&mut self, dt: f32) {
        self.integrate(dt);
        self.grid.rebuild(&self.particles);
        self.detect_and_resolve();
    }

    /// Advance one step with the timestep supplied at construction.
    pub fn step_fixed(&mut self) {
        self.step(self.dt);
    }

    /// Advance `steps` steps with the timestep supplied at construction.
    pub fn run(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step_fixed();
        }
    }

    // ============ Internal sub-steps ============

    /// Move every particle by `v * dt`, then reflect off the four walls,
    /// per axis: snap the position to the contact plane and negate the
    /// velocity component. Axes are independent, so processing order over
    /// particles does not affect the result.
    fn integrate(&mut self, dt: f32) {
        let half = self.half_extent;
        let radius = self.radius;
        for p in &mut self.particles {
            for k in 0..DIM {
                p.r[k] += p.v[k] * dt;
                if p.r[k] - radius < -half {
                    p.r[k] = -half + radius;
                    p.v[k] = -p.v[k];
                } else if p.r[k] + radius > half {
                    p.r[k] = half - radius;
                    p.v[k] = -p.v[k];
                }
            }
        }
    }

    /// Narrow phase: for each particle in ascending index order, scan the 3x3
    /// Moore neighborhood of its cell and resolve every overlapping pair
    /// `(i, j)` with `j > i` immediately, in discovery order.
    ///
    /// The grid is built once per step and deliberately left stale while
    /// resolutions move particles; an overlap that an earlier resolution
    /// reintroduces with an already-scanned particle is left for the next
    /// step. Resolution is therefore a pairwise, not global, separation
    /// guarantee.
    fn detect_and_resolve(&mut self) {
        let min_dist = 2.0 * self.radius;
        let min_dist_sq = min_dist * min_dist;
        for i in 0..self.particles.len() {
            let (cx, cy) = self.grid.key_for(&self.particles[i].r);
            for nx in (cx - 1)..=(cx + 1) {
                for ny in (cy - 1)..=(cy + 1) {
                    for &j in self.grid.cell((nx, ny)) {
                        // Skip self and already-considered unordered pairs.
                        if j <= i {
                            continue;
                        }
                        let dx = self.particles[j].r[0] - self.particles[i].r[0];
                        let dy = self.particles[j].r[1] - self.particles[i].r[1];
                        if dx * dx + dy * dy < min_dist_sq {
                            resolve_pair(&mut self.particles, &mut self.rng, i, j, min_dist);
                        }
                    }
                }
            }
        }
    }
}

// ============ Utility helpers ============

/// Resolve an overlapping pair: push both centers apart by half the overlap
/// along the contact normal, swap the two velocities in full (the equal-mass
/// elastic head-on approximation, kept deliberately instead of a
/// normal-projected impulse), then jitter both velocities to break the
/// degenerate lockstep cycle of exactly mirrored re-collisions.
fn resolve_pair(particles: &mut [Particle], rng: &mut StdRng, i: usize, j: usize, min_dist: f32) {
    let mut dx = particles[j].r[0] - particles[i].r[0];
    let mut dy = particles[j].r[1] - particles[i].r[1];
    let mut dist_sq = dx * dx + dy * dy;

    if dist_sq == 0.0 {
        // Coincident centers: substitute a nominal delta to define a normal.
        dx = COINCIDENT_NUDGE;
        dy = 0.0;
        dist_sq = dx * dx + dy * dy;
    }

    let dist = dist_sq.sqrt();
    let nx = dx / dist;
    let ny = dy / dist;

    // Positional correction: equal split, no net center-of-mass drift.
    let overlap = 0.5 * (min_dist - dist);
    particles[i].r[0] -= nx * overlap;
    particles[i].r[1] -= ny * overlap;
    particles[j].r[0] += nx * overlap;
    particles[j].r[1] += ny * overlap;

    let vi = particles[i].v;
    particles[i].v = particles[j].v;
    particles[j].v = vi;

    for k in 0..DIM {
        particles[i].v[k] += (rng.random::<f32>() - 0.5) * PERTURBATION;
        particles[j].v[k] += (rng.random::<f32>() - 0.5) * PERTURBATION;
    }
}
