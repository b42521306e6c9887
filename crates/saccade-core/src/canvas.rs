use crate::patch::Patch;

/// Square grayscale composite image, row-major, intensities in [0, 255].
///
/// Rebuilt from scratch every step: patches are blitted additively at their
/// truncated integer positions, with per-cell saturation at 255.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    size: usize,
    data: Vec<u8>,
}

impl Canvas {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.size + col]
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Add `patch` into the canvas with its top-left corner at
    /// `(row, col)`. Overlapping contributions sum and saturate at 255.
    /// The caller guarantees the patch fits within bounds.
    pub fn blit_add(&mut self, patch: &Patch, row: usize, col: usize) {
        debug_assert!(row + patch.side() <= self.size);
        debug_assert!(col + patch.side() <= self.size);
        for r in 0..patch.side() {
            let base = (row + r) * self.size + col;
            for c in 0..patch.side() {
                let cell = &mut self.data[base + c];
                *cell = cell.saturating_add(patch.get(r, c));
            }
        }
    }

    /// Mean intensity over the whole canvas.
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.data.iter().map(|&v| v as u64).sum();
        sum as f32 / self.data.len() as f32
    }

    /// Maximum intensity over the whole canvas.
    pub fn max(&self) -> u8 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}
