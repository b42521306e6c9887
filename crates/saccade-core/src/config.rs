use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Environment construction parameters.
///
/// The canvas is a square `canvas_size × canvas_size` grid partitioned into
/// `num_box_per_side × num_box_per_side` equal foveation boxes, so
/// `canvas_size` must divide evenly. Patches are square
/// `patch_size × patch_size` bitmaps and must fit inside the canvas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    pub canvas_size: usize,
    pub patch_size: usize,
    pub num_box_per_side: usize,
    /// Episode length bound. The episode terminates once the step count
    /// exceeds this value, i.e. after `seq_len + 1` steps.
    pub seq_len: usize,
    pub num_active_patches: usize,
    pub seed: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            canvas_size: 64,
            patch_size: 28,
            num_box_per_side: 4,
            seq_len: 100,
            num_active_patches: 2,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroCanvasSize,
    ZeroBoxesPerSide,
    CanvasNotDivisible {
        canvas_size: usize,
        num_box_per_side: usize,
    },
    ZeroPatchSize,
    PatchTooLarge {
        patch_size: usize,
        canvas_size: usize,
    },
    ZeroActivePatches,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCanvasSize => write!(f, "canvas_size must be positive"),
            ConfigError::ZeroBoxesPerSide => write!(f, "num_box_per_side must be positive"),
            ConfigError::CanvasNotDivisible {
                canvas_size,
                num_box_per_side,
            } => write!(
                f,
                "canvas_size ({canvas_size}) must be divisible by num_box_per_side ({num_box_per_side})"
            ),
            ConfigError::ZeroPatchSize => write!(f, "patch_size must be positive"),
            ConfigError::PatchTooLarge {
                patch_size,
                canvas_size,
            } => write!(
                f,
                "patch_size ({patch_size}) must not exceed canvas_size ({canvas_size})"
            ),
            ConfigError::ZeroActivePatches => write!(f, "num_active_patches must be positive"),
        }
    }
}

impl Error for ConfigError {}

impl EnvConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_size == 0 {
            return Err(ConfigError::ZeroCanvasSize);
        }
        if self.num_box_per_side == 0 {
            return Err(ConfigError::ZeroBoxesPerSide);
        }
        if !self.canvas_size.is_multiple_of(self.num_box_per_side) {
            return Err(ConfigError::CanvasNotDivisible {
                canvas_size: self.canvas_size,
                num_box_per_side: self.num_box_per_side,
            });
        }
        if self.patch_size == 0 {
            return Err(ConfigError::ZeroPatchSize);
        }
        if self.patch_size > self.canvas_size {
            return Err(ConfigError::PatchTooLarge {
                patch_size: self.patch_size,
                canvas_size: self.canvas_size,
            });
        }
        if self.num_active_patches == 0 {
            return Err(ConfigError::ZeroActivePatches);
        }
        Ok(())
    }

    /// Maximum valid top-left position for a patch on either axis.
    pub fn lims(&self) -> f64 {
        (self.canvas_size - self.patch_size) as f64
    }

    /// Side length of one foveation box in pixels.
    pub fn box_side(&self) -> usize {
        self.canvas_size / self.num_box_per_side
    }

    /// Number of foveation locations, i.e. the discrete action count.
    pub fn loc_size(&self) -> usize {
        self.num_box_per_side * self.num_box_per_side
    }
}
