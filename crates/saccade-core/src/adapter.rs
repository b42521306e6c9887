use crate::config::EnvConfig;
use crate::env::{SaccadeEnv, StepError, StepInfo};

/// Statically declared observation/action shapes, computed once from
/// configuration rather than introspected from a live environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpaceMetadata {
    /// `(box_side, box_side)`, u8 intensities in [0, 255].
    pub central_shape: (usize, usize),
    /// `(num_box_per_side, num_box_per_side)`, f32 mean intensities.
    pub peripheral_shape: (usize, usize),
    /// Discrete action count, `num_box_per_side` squared.
    pub action_count: usize,
}

impl SpaceMetadata {
    pub fn from_config(config: &EnvConfig) -> Self {
        let box_side = config.box_side();
        let n = config.num_box_per_side;
        Self {
            central_shape: (box_side, box_side),
            peripheral_shape: (n, n),
            action_count: config.loc_size(),
        }
    }

    pub fn central_len(&self) -> usize {
        self.central_shape.0 * self.central_shape.1
    }

    pub fn peripheral_len(&self) -> usize {
        self.peripheral_shape.0 * self.peripheral_shape.1
    }
}

/// Flattened observation with episode-boundary flags, the shape RL driver
/// loops consume.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatObservation {
    pub central: Vec<u8>,
    pub peripheral: Vec<f32>,
    pub is_first: bool,
    pub is_last: bool,
    pub is_terminal: bool,
}

/// Thin wrapper around `SaccadeEnv` exposing only the episode API plus
/// static shape metadata. No decision logic lives here.
pub struct SaccadeAdapter {
    env: SaccadeEnv,
    metadata: SpaceMetadata,
}

impl SaccadeAdapter {
    pub fn new(env: SaccadeEnv) -> Self {
        let metadata = SpaceMetadata::from_config(env.config());
        Self { env, metadata }
    }

    pub fn metadata(&self) -> SpaceMetadata {
        self.metadata
    }

    pub fn reset(&mut self) -> FlatObservation {
        let obs = self.env.reset();
        FlatObservation {
            central: obs.central,
            peripheral: obs.peripheral,
            is_first: true,
            is_last: false,
            is_terminal: false,
        }
    }

    pub fn step(
        &mut self,
        action: usize,
    ) -> Result<(FlatObservation, f32, bool, StepInfo), StepError> {
        let outcome = self.env.step(action)?;
        let flat = FlatObservation {
            central: outcome.observation.central,
            peripheral: outcome.observation.peripheral,
            is_first: false,
            is_last: outcome.done,
            is_terminal: outcome.done,
        };
        Ok((flat, outcome.reward, outcome.done, outcome.info))
    }

    pub fn env(&self) -> &SaccadeEnv {
        &self.env
    }
}
