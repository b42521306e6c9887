mod dynamics;
pub mod episode;
#[cfg(test)]
mod tests;

pub use episode::*;

use crate::canvas::Canvas;
use crate::config::{ConfigError, EnvConfig};
use crate::patch::{Patch, PatchLibrary, PatchLibraryError};
use crate::vision::FoveationGrid;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::{error::Error, fmt};

/// Mutable per-patch motion state. `position` is the real-valued top-left
/// corner of the patch; it is truncated to integer pixels only at
/// compositing time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatchState {
    pub position: [f64; 2],
    pub velocity: [f64; 2],
}

/// What the agent sees after a reset or step: the full-resolution fovea box
/// and the per-box mean surround, both from the same canvas snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub central: Vec<u8>,
    pub peripheral: Vec<f32>,
}

/// Side information returned alongside each step.
#[derive(Clone, Debug)]
pub struct StepInfo {
    pub canvas: Canvas,
}

#[derive(Clone, Debug)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f32,
    pub done: bool,
    pub info: StepInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvInitError {
    Config(ConfigError),
    Library(PatchLibraryError),
    PatchSizeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for EnvInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvInitError::Config(e) => write!(f, "{}", e),
            EnvInitError::Library(e) => write!(f, "{}", e),
            EnvInitError::PatchSizeMismatch { expected, actual } => write!(
                f,
                "patch library side ({actual}) must match config patch_size ({expected})"
            ),
        }
    }
}

impl Error for EnvInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EnvInitError::Config(e) => Some(e),
            EnvInitError::Library(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EnvInitError {
    fn from(err: ConfigError) -> Self {
        EnvInitError::Config(err)
    }
}

impl From<PatchLibraryError> for EnvInitError {
    fn from(err: PatchLibraryError) -> Self {
        EnvInitError::Library(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    InvalidAction { action: usize, loc_size: usize },
    NonFiniteState,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::InvalidAction { action, loc_size } => {
                write!(f, "invalid action {action}, expected 0..{loc_size}")
            }
            StepError::NonFiniteState => {
                write!(f, "patch state became non-finite")
            }
        }
    }
}

impl Error for StepError {}

/// Saccade visual environment: moving patches bounce inside a bounded
/// canvas, the agent picks a foveation box each step and receives central
/// plus peripheral vision of the composite image.
#[derive(Debug)]
pub struct SaccadeEnv {
    pub(crate) config: EnvConfig,
    pub(crate) library: PatchLibrary,
    pub(crate) grid: FoveationGrid,
    pub(crate) patches: Vec<Patch>,
    pub(crate) states: Vec<PatchState>,
    pub(crate) loc: usize,
    pub(crate) step_count: usize,
    pub(crate) canvas: Canvas,
    pub(crate) central: Vec<u8>,
    pub(crate) peripheral: Vec<f32>,
    pub(crate) rng: ChaCha12Rng,
}

impl SaccadeEnv {
    /// Constant shaping reward emitted every step; the environment carries
    /// no task-specific success signal.
    pub const STEP_REWARD: f32 = 1.0;

    pub fn new(library: PatchLibrary, config: EnvConfig) -> Result<Self, EnvInitError> {
        config.validate()?;
        if library.is_empty() {
            return Err(EnvInitError::Library(PatchLibraryError::NoPatches));
        }
        if library.side() != config.patch_size {
            return Err(EnvInitError::PatchSizeMismatch {
                expected: config.patch_size,
                actual: library.side(),
            });
        }

        let grid = FoveationGrid::new(config.canvas_size, config.num_box_per_side);
        let canvas = Canvas::new(config.canvas_size);
        let rng = ChaCha12Rng::seed_from_u64(config.seed);
        let mut env = Self {
            config,
            library,
            grid,
            patches: Vec::new(),
            states: Vec::new(),
            loc: 0,
            step_count: 0,
            canvas,
            central: Vec::new(),
            peripheral: Vec::new(),
            rng,
        };
        env.reset_state();
        env.refresh_observation();
        Ok(env)
    }

    /// Start a new episode: redraw patches, velocities, positions, and the
    /// initial foveation index from the environment's own RNG.
    pub fn reset(&mut self) -> Observation {
        self.reset_state();
        self.refresh_observation();
        self.observation()
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn grid(&self) -> FoveationGrid {
        self.grid
    }

    /// Discrete action count, `num_box_per_side` squared.
    pub fn action_count(&self) -> usize {
        self.grid.loc_count()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn central_vision(&self) -> &[u8] {
        &self.central
    }

    pub fn peripheral_vision(&self) -> &[f32] {
        &self.peripheral
    }

    /// Current foveation index.
    pub fn foveation(&self) -> usize {
        self.loc
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub(crate) fn observation(&self) -> Observation {
        Observation {
            central: self.central.clone(),
            peripheral: self.peripheral.clone(),
        }
    }

    pub(crate) fn refresh_observation(&mut self) {
        self.rebuild_canvas();
        self.central = self.grid.central(&self.canvas, self.loc);
        self.peripheral = self.grid.peripheral(&self.canvas);
    }
}
