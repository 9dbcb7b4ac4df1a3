use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

pub mod core;
pub mod error;

use crate::core::particle::DIM;
use crate::core::Simulation;

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// CollideSim Python-facing wrapper around the Rust simulation core.
///
/// API:
/// - __new__(num_particles, half_extent, radius=1.0, dt=1/60, seed=None)
/// - step(dt=None)
/// - run(steps, dt=None)
/// - get_positions() -> np.ndarray, shape (N, 2)
/// - get_velocities() -> np.ndarray, shape (N, 2)
#[pyclass]
pub struct CollideSim {
    sim: Simulation,
}

#[pymethods]
impl CollideSim {
    /// Initialize a new 2D collision simulation in the square domain
    /// [-half_extent, half_extent]^2 with hard walls.
    ///
    /// Parameters
    /// - num_particles: number of particles (int, > 0)
    /// - half_extent: domain half-extent (float, > radius)
    /// - radius: uniform disc radius (float, > 0)
    /// - dt: fixed timestep in seconds (float, > 0)
    /// - seed: RNG seed (int) for reproducibility; None for nondeterministic
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (num_particles, half_extent, radius=1.0, dt=1.0 / 60.0, seed=None))]
    fn new(
        num_particles: usize,
        half_extent: f32,
        radius: f32,
        dt: f32,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let sim = Simulation::new(num_particles, radius, half_extent, dt, seed).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Advance the simulation one step (releases the GIL during computation).
    ///
    /// Parameters
    /// - dt: timestep override; defaults to the fixed timestep supplied at
    ///   construction.
    #[pyo3(signature = (dt=None))]
    fn step(&mut self, py: Python<'_>, dt: Option<f32>) -> PyResult<()> {
        let dt = dt.unwrap_or(self.sim.dt());
        py.detach(|| self.sim.step(dt));
        Ok(())
    }

    /// Advance the simulation `steps` steps (releases the GIL during computation).
    #[pyo3(signature = (steps, dt=None))]
    fn run(&mut self, py: Python<'_>, steps: usize, dt: Option<f32>) -> PyResult<()> {
        let dt = dt.unwrap_or(self.sim.dt());
        py.detach(|| {
            for _ in 0..steps {
                self.sim.step(dt);
            }
        });
        Ok(())
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float32.
    fn get_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f32>>> {
        let n = self.sim.num_particles();
        let mut arr = Array2::<f32>::zeros((n, DIM));
        for (i, p) in self.sim.particles.iter().enumerate() {
            for k in 0..DIM {
                arr[[i, k]] = p.r[k];
            }
        }
        let pyarr = arr.into_pyarray(py);
        Ok(pyarr.to_owned().into())
    }

    /// Return velocities as a NumPy array of shape (N, 2), dtype=float32.
    fn get_velocities<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f32>>> {
        let n = self.sim.num_particles();
        let mut arr = Array2::<f32>::zeros((n, DIM));
        for (i, p) in self.sim.particles.iter().enumerate() {
            for k in 0..DIM {
                arr[[i, k]] = p.v[k];
            }
        }
        let pyarr = arr.into_pyarray(py);
        Ok(pyarr.to_owned().into())
    }

    /// Set all particle positions from a NumPy array of shape (N, 2), dtype=float32.
    /// Values must be finite; caller is responsible for keeping them inside the domain.
    fn set_positions<'py>(&mut self, positions: PyReadonlyArray2<'py, f32>) -> PyResult<()> {
        let arr = positions.as_array();
        let n = self.sim.num_particles();
        if arr.ndim() != 2 || arr.shape()[0] != n || arr.shape()[1] != DIM {
            return Err(py_err(format!(
                "positions must have shape ({}, {}), got {:?}",
                n,
                DIM,
                arr.shape()
            )));
        }
        for i in 0..n {
            let mut r = [0.0_f32; DIM];
            for k in 0..DIM {
                r[k] = arr[[i, k]];
            }
            self.sim.particles[i].set_position(r).map_err(py_err)?;
        }
        Ok(())
    }

    /// Set all particle velocities from a NumPy array of shape (N, 2), dtype=float32.
    /// Values must be finite.
    fn set_velocities<'py>(&mut self, velocities: PyReadonlyArray2<'py, f32>) -> PyResult<()> {
        let arr = velocities.as_array();
        let n = self.sim.num_particles();
        if arr.ndim() != 2 || arr.shape()[0] != n || arr.shape()[1] != DIM {
            return Err(py_err(format!(
                "velocities must have shape ({}, {}), got {:?}",
                n,
                DIM,
                arr.shape()
            )));
        }
        for i in 0..n {
            let mut v = [0.0_f32; DIM];
            for k in 0..DIM {
                v[k] = arr[[i, k]];
            }
            self.sim.particles[i].set_velocity(v).map_err(py_err)?;
        }
        Ok(())
    }

    /// Number of particles.
    #[getter]
    fn num_particles(&self) -> usize {
        self.sim.num_particles()
    }

    /// Uniform disc radius.
    #[getter]
    fn radius(&self) -> f32 {
        self.sim.radius()
    }

    /// Domain half-extent.
    #[getter]
    fn half_extent(&self) -> f32 {
        self.sim.half_extent()
    }

    /// Fixed timestep supplied at construction.
    #[getter]
    fn dt(&self) -> f32 {
        self.sim.dt()
    }

    /// Total kinetic energy for unit particle mass (diagnostic).
    fn get_kinetic_energy(&self) -> f32 {
        self.sim.kinetic_energy()
    }
}

/// The collidesim Python module entry point.
#[pymodule]
fn collidesim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<CollideSim>()?;
    Ok(())
}
