use super::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

fn uniform_library(side: usize, intensity: u8) -> PatchLibrary {
    PatchLibrary::new(side, vec![Patch::filled(side, intensity)]).unwrap()
}

fn small_env(seq_len: usize, seed: u64) -> SaccadeEnv {
    let config = EnvConfig {
        canvas_size: 64,
        patch_size: 28,
        num_box_per_side: 4,
        seq_len,
        num_active_patches: 2,
        seed,
    };
    SaccadeEnv::new(uniform_library(28, 200), config).unwrap()
}

#[test]
fn construction_rejects_mismatched_patch_size() {
    let config = EnvConfig::default();
    let err = SaccadeEnv::new(uniform_library(4, 10), config).unwrap_err();
    assert_eq!(
        err,
        EnvInitError::PatchSizeMismatch {
            expected: 28,
            actual: 4,
        }
    );
}

#[test]
fn construction_rejects_invalid_config() {
    let config = EnvConfig {
        num_box_per_side: 5,
        ..EnvConfig::default()
    };
    let err = SaccadeEnv::new(uniform_library(28, 200), config).unwrap_err();
    assert!(matches!(err, EnvInitError::Config(ConfigError::CanvasNotDivisible { .. })));
}

#[test]
fn reset_initializes_within_bounds() {
    let mut env = small_env(100, 42);
    for _ in 0..20 {
        env.reset();
        assert_eq!(env.states.len(), 2);
        assert_eq!(env.patches.len(), 2);
        assert!(env.foveation() < env.action_count());
        assert_eq!(env.step_count(), 0);
        let lims = env.config().lims();
        for state in &env.states {
            for axis in 0..2 {
                assert!((0.0..=lims).contains(&state.position[axis]));
                // Integer speed 1..=4 gives velocity magnitude in [1, 4].
                assert!(state.velocity[axis].abs() <= 4.0);
            }
            let speed = (state.velocity[0].powi(2) + state.velocity[1].powi(2)).sqrt();
            assert!((1.0..=4.0 + 1e-9).contains(&speed));
            assert!((speed - speed.round()).abs() < 1e-9, "speed is an integer");
        }
    }
}

#[test]
fn fixed_seed_runs_are_identical() {
    let mut a = small_env(100, 1234);
    let mut b = small_env(100, 1234);
    let obs_a = a.reset();
    let obs_b = b.reset();
    assert_eq!(obs_a, obs_b);

    let mut action_rng = ChaCha12Rng::seed_from_u64(9);
    for _ in 0..50 {
        let action = action_rng.random_range(0..a.action_count());
        let out_a = a.step(action).unwrap();
        let out_b = b.step(action).unwrap();
        assert_eq!(out_a.observation, out_b.observation);
        assert_eq!(out_a.info.canvas, out_b.info.canvas);
        assert_eq!(out_a.done, out_b.done);
    }
}

#[test]
fn observation_shapes_hold_for_all_reachable_states() {
    let mut env = small_env(30, 5);
    let obs = env.reset();
    assert_eq!(obs.central.len(), 16 * 16);
    assert_eq!(obs.peripheral.len(), 4 * 4);

    let mut action_rng = ChaCha12Rng::seed_from_u64(11);
    loop {
        let action = action_rng.random_range(0..env.action_count());
        let outcome = env.step(action).unwrap();
        assert_eq!(outcome.observation.central.len(), 16 * 16);
        assert_eq!(outcome.observation.peripheral.len(), 4 * 4);
        assert!(outcome
            .observation
            .peripheral
            .iter()
            .all(|v| (0.0..=255.0).contains(v)));
        assert_eq!(env.foveation(), action);
        if outcome.done {
            break;
        }
    }
}

#[test]
fn episode_terminates_after_seq_len_plus_one_steps() {
    let seq_len = 10;
    let mut env = small_env(seq_len, 3);
    env.reset();
    for step in 1..=seq_len {
        let outcome = env.step(0).unwrap();
        assert!(!outcome.done, "not done at step {step}");
    }
    let outcome = env.step(0).unwrap();
    assert!(outcome.done, "done exactly at step seq_len + 1");
    assert_eq!(env.step_count(), seq_len + 1);
}

#[test]
fn reward_is_constant() {
    let mut env = small_env(5, 8);
    env.reset();
    loop {
        let outcome = env.step(2).unwrap();
        assert_eq!(outcome.reward, 1.0);
        if outcome.done {
            break;
        }
    }
}

#[test]
fn velocity_reflects_at_upper_bound() {
    let mut env = small_env(100, 0);
    env.reset();
    let lims = env.config().lims();

    // Driving past lims + 1 flips the sign; the reflected velocity moves the
    // patch this same step.
    env.states.truncate(1);
    env.patches.truncate(1);
    env.states[0] = PatchState {
        position: [lims + 0.5, 10.0],
        velocity: [1.0, 0.0],
    };
    env.step(0).unwrap();
    assert_eq!(env.states[0].velocity[0], -1.0);
    assert_eq!(env.states[0].position[0], lims - 0.5);
    assert_eq!(env.states[0].position[1], 10.0);
}

#[test]
fn velocity_reflects_at_lower_bound() {
    let mut env = small_env(100, 0);
    env.reset();
    env.states.truncate(1);
    env.patches.truncate(1);
    env.states[0] = PatchState {
        position: [-1.5, 10.0],
        velocity: [-1.0, 2.0],
    };
    env.step(0).unwrap();
    assert_eq!(env.states[0].velocity[0], 1.0);
    assert_eq!(env.states[0].position[0], -0.5);
    // The other axis is untouched by the reflection.
    assert_eq!(env.states[0].velocity[1], 2.0);
    assert_eq!(env.states[0].position[1], 12.0);
}

#[test]
fn overshoot_within_tolerance_does_not_reflect() {
    let mut env = small_env(100, 0);
    env.reset();
    let lims = env.config().lims();
    env.states.truncate(1);
    env.patches.truncate(1);
    env.states[0] = PatchState {
        position: [lims + 0.5, 10.0],
        velocity: [0.25, 0.0],
    };
    env.step(0).unwrap();
    assert_eq!(env.states[0].velocity[0], 0.25);
    assert_eq!(env.states[0].position[0], lims + 0.75);
}

#[test]
fn overlapping_patches_sum_then_saturate() {
    let mut env = small_env(100, 0);
    env.reset();
    env.patches = vec![Patch::filled(28, 200), Patch::filled(28, 200)];
    env.states = vec![
        PatchState {
            position: [0.0, 0.0],
            velocity: [0.0, 0.0],
        },
        PatchState {
            position: [0.0, 0.0],
            velocity: [0.0, 0.0],
        },
    ];
    env.refresh_observation();
    // min(255, 200 + 200) at every overlapped cell.
    assert_eq!(env.canvas().get(0, 0), 255);
    assert_eq!(env.canvas().get(27, 27), 255);
    assert_eq!(env.canvas().get(28, 28), 0);

    env.patches = vec![Patch::filled(28, 100), Patch::filled(28, 50)];
    env.refresh_observation();
    assert_eq!(env.canvas().get(0, 0), 150);
}

#[test]
fn compositing_clamps_positions_into_lims() {
    let mut env = small_env(100, 0);
    env.reset();
    let lims = env.config().lims();
    env.patches.truncate(1);
    env.states.truncate(1);
    // A reflected patch can transiently sit slightly outside [0, lims]; the
    // compositing clamp must still keep the blit in bounds.
    env.states[0] = PatchState {
        position: [lims + 0.9, -1.5],
        velocity: [0.0, 0.0],
    };
    env.refresh_observation();
    let last = env.config().canvas_size - 1;
    assert_eq!(env.canvas().get(last, 0), 200);
    assert_eq!(env.canvas().get(last, 28), 0);
}

#[test]
fn central_and_peripheral_match_known_scene() {
    // N = 4, 64x64 canvas, one uniform-200 patch at (0, 0), fovea box 0.
    let mut env = small_env(100, 0);
    env.reset();
    env.patches.truncate(1);
    env.states.truncate(1);
    env.states[0] = PatchState {
        position: [0.0, 0.0],
        velocity: [0.0, 0.0],
    };
    env.loc = 0;
    env.refresh_observation();

    // Box 0 (16x16) lies fully inside the 28x28 patch.
    assert!(env.central_vision().iter().all(|&v| v == 200));
    let peripheral = env.peripheral_vision();
    assert_eq!(peripheral[0], 200.0);
    // Box 5 covers rows/cols 16..32, the patch only reaches 28: 144 of 256
    // cells are lit.
    assert_eq!(peripheral[5], 200.0 * 144.0 / 256.0);
    // Box 15 is empty.
    assert_eq!(peripheral[15], 0.0);
}

#[test]
fn invalid_action_is_an_error() {
    let mut env = small_env(100, 0);
    env.reset();
    let err = env.step(16).unwrap_err();
    assert_eq!(
        err,
        StepError::InvalidAction {
            action: 16,
            loc_size: 16,
        }
    );
    // The failed step must not advance the episode.
    assert_eq!(env.step_count(), 0);
}

#[test]
fn non_finite_state_fails_fast() {
    let mut env = small_env(100, 0);
    env.reset();
    env.states[0].velocity[0] = f64::NAN;
    let err = env.step(0).unwrap_err();
    assert_eq!(err, StepError::NonFiniteState);
}

#[test]
fn run_episode_collects_samples_and_rewards() {
    let mut env = small_env(10, 21);
    let summary = env.run_episode(|_, loc_size| loc_size - 1, 4).unwrap();
    assert_eq!(summary.steps, 11);
    assert_eq!(summary.total_reward, 11.0);
    // Steps 4 and 8 plus the terminal step 11.
    let sampled: Vec<usize> = summary.samples.iter().map(|s| s.step).collect();
    assert_eq!(sampled, vec![4, 8, 11]);
    assert!(summary.samples.iter().all(|s| s.foveation == 15));
}

#[test]
fn run_episode_rejects_zero_sample_every() {
    let mut env = small_env(10, 21);
    let err = env.run_episode(|_, _| 0, 0).unwrap_err();
    assert_eq!(err, EpisodeError::InvalidSampleEvery);
}

#[test]
fn episode_summary_round_trips_through_json() {
    let mut env = small_env(6, 33);
    let summary = env.run_episode(|_, _| 3, 2).unwrap();
    let json = serde_json::to_string(&summary).unwrap();
    let back: EpisodeSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(back.schema_version, 1);
    assert_eq!(back.steps, summary.steps);
    assert_eq!(back.total_reward, summary.total_reward);
    assert_eq!(back.samples.len(), summary.samples.len());
}
