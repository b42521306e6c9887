use super::{Observation, SaccadeEnv, StepError};
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Per-step sample collected by `run_episode`.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StepRecord {
    pub step: usize,
    pub foveation: usize,
    pub reward: f32,
    pub canvas_mean: f32,
    pub canvas_max: u8,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EpisodeSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub sample_every: usize,
    pub total_reward: f32,
    pub samples: Vec<StepRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeError {
    InvalidSampleEvery,
    Step(StepError),
}

impl fmt::Display for EpisodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            EpisodeError::Step(e) => write!(f, "{}", e),
        }
    }
}

impl Error for EpisodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EpisodeError::Step(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StepError> for EpisodeError {
    fn from(err: StepError) -> Self {
        EpisodeError::Step(err)
    }
}

impl SaccadeEnv {
    /// Reset and step until the episode terminates, letting `policy` choose
    /// each foveation index from the latest observation. Samples a record
    /// every `sample_every` steps plus the terminal step.
    pub fn run_episode<P>(
        &mut self,
        mut policy: P,
        sample_every: usize,
    ) -> Result<EpisodeSummary, EpisodeError>
    where
        P: FnMut(&Observation, usize) -> usize,
    {
        if sample_every == 0 {
            return Err(EpisodeError::InvalidSampleEvery);
        }

        let loc_size = self.action_count();
        let mut observation = self.reset();
        let mut samples = Vec::new();
        let mut total_reward = 0.0f32;
        let mut steps = 0usize;
        loop {
            let action = policy(&observation, loc_size);
            let outcome = self.step(action)?;
            steps += 1;
            total_reward += outcome.reward;
            if steps.is_multiple_of(sample_every) || outcome.done {
                samples.push(StepRecord {
                    step: steps,
                    foveation: action,
                    reward: outcome.reward,
                    canvas_mean: outcome.info.canvas.mean(),
                    canvas_max: outcome.info.canvas.max(),
                });
            }
            observation = outcome.observation;
            if outcome.done {
                break;
            }
        }
        Ok(EpisodeSummary {
            schema_version: 1,
            steps,
            sample_every,
            total_reward,
            samples,
        })
    }
}
