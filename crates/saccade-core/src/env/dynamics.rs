use super::{PatchState, SaccadeEnv, StepError, StepInfo, StepOutcome};
use rand::Rng;
use std::f64::consts::PI;

/// Overshoot tolerance on the lower bound before a velocity sign flip.
const LOWER_BOUND: f64 = -2.0;
/// Overshoot tolerance past `lims` on the upper bound.
const UPPER_MARGIN: f64 = 1.0;

impl SaccadeEnv {
    pub(crate) fn reset_state(&mut self) {
        let lims = self.config.lims();
        self.patches.clear();
        self.states.clear();
        for _ in 0..self.config.num_active_patches {
            // Draw with replacement; integer speed 1..=4, direction uniform
            // in [-pi, pi].
            let index = self.rng.random_range(0..self.library.len());
            let direction = PI * (self.rng.random::<f64>() * 2.0 - 1.0);
            let speed = self.rng.random_range(1..5) as f64;
            let position = [
                self.rng.random::<f64>() * lims,
                self.rng.random::<f64>() * lims,
            ];
            self.patches.push(self.library.get(index).clone());
            self.states.push(PatchState {
                position,
                velocity: [speed * direction.cos(), speed * direction.sin()],
            });
        }
        self.loc = self.rng.random_range(0..self.grid.loc_count());
        self.step_count = 0;
    }

    /// Advance the simulation by one foveation choice.
    ///
    /// Patches reflect off the canvas bounds with a small overshoot
    /// tolerance; the reflected velocity is what updates the position this
    /// same step. The episode is done once the step count exceeds
    /// `seq_len`, so it runs `seq_len + 1` steps in total.
    pub fn step(&mut self, action: usize) -> Result<StepOutcome, StepError> {
        let loc_size = self.grid.loc_count();
        if action >= loc_size {
            return Err(StepError::InvalidAction { action, loc_size });
        }

        let lims = self.config.lims();
        for state in &mut self.states {
            for axis in 0..2 {
                let next = state.position[axis] + state.velocity[axis];
                if next < LOWER_BOUND || next > lims + UPPER_MARGIN {
                    state.velocity[axis] = -state.velocity[axis];
                }
                state.position[axis] += state.velocity[axis];
            }
            if !state.position.iter().all(|v| v.is_finite())
                || !state.velocity.iter().all(|v| v.is_finite())
            {
                return Err(StepError::NonFiniteState);
            }
        }

        self.loc = action;
        self.step_count += 1;
        let done = self.step_count > self.config.seq_len;

        self.refresh_observation();
        Ok(StepOutcome {
            observation: self.observation(),
            reward: Self::STEP_REWARD,
            done,
            info: StepInfo {
                canvas: self.canvas.clone(),
            },
        })
    }

    /// Recomposite all active patches onto a cleared canvas. Positions are
    /// truncated to integer pixels and clamped into `[0, lims]` per axis; a
    /// reflected patch may transiently sit slightly outside before the
    /// clamp pulls it back.
    pub(crate) fn rebuild_canvas(&mut self) {
        self.canvas.clear();
        let lims = self.config.lims();
        for (patch, state) in self.patches.iter().zip(&self.states) {
            let row = state.position[0].trunc().clamp(0.0, lims) as usize;
            let col = state.position[1].trunc().clamp(0.0, lims) as usize;
            self.canvas.blit_add(patch, row, col);
        }
    }
}
