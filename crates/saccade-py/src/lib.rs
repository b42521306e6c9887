use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use saccade_core::{EnvConfig, PatchLibrary, SaccadeEnv as CoreEnv};

/// Minimal PyO3 module exposing saccade-core to Python.
#[pyfunction]
fn version() -> &'static str {
    "0.1.0"
}

#[pyclass(name = "SaccadeEnv")]
struct PySaccadeEnv {
    inner: CoreEnv,
}

#[pymethods]
impl PySaccadeEnv {
    #[new]
    #[pyo3(signature = (patches, patch_size, num_box_per_side = 4, seq_len = 100, num_active_patches = 2, seed = 0))]
    fn new(
        patches: Vec<Vec<u8>>,
        patch_size: usize,
        num_box_per_side: usize,
        seq_len: usize,
        num_active_patches: usize,
        seed: u64,
    ) -> PyResult<Self> {
        let library = PatchLibrary::from_bitmaps(patch_size, patches)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let config = EnvConfig {
            patch_size,
            num_box_per_side,
            seq_len,
            num_active_patches,
            seed,
            ..EnvConfig::default()
        };
        let inner = CoreEnv::new(library, config)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    #[getter]
    fn action_count(&self) -> usize {
        self.inner.action_count()
    }

    fn reset(&mut self) -> (Vec<u8>, Vec<f32>) {
        let obs = self.inner.reset();
        (obs.central, obs.peripheral)
    }

    /// Returns ((central, peripheral), reward, done).
    fn step(&mut self, action: usize) -> PyResult<((Vec<u8>, Vec<f32>), f32, bool)> {
        let outcome = self
            .inner
            .step(action)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok((
            (outcome.observation.central, outcome.observation.peripheral),
            outcome.reward,
            outcome.done,
        ))
    }
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_class::<PySaccadeEnv>()?;
    Ok(())
}
