//! Saccade visual environment for reinforcement-learning research.
//!
//! Moving grayscale patches bounce inside a bounded canvas; each step the
//! agent picks a discrete foveation box and receives full-resolution
//! central vision of that box plus per-box mean peripheral vision of the
//! whole canvas.

pub mod adapter;
pub mod canvas;
pub mod config;
pub mod env;
pub mod patch;
pub mod render;
pub mod vision;

pub use adapter::{FlatObservation, SaccadeAdapter, SpaceMetadata};
pub use config::EnvConfig;
pub use env::{Observation, SaccadeEnv, StepOutcome};
pub use patch::{Patch, PatchLibrary};
