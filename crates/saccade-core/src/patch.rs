use std::{error::Error, fmt};

/// Immutable square grayscale bitmap, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patch {
    side: usize,
    data: Vec<u8>,
}

impl Patch {
    pub fn new(side: usize, data: Vec<u8>) -> Result<Self, PatchLibraryError> {
        if data.len() != side * side {
            return Err(PatchLibraryError::BadBitmapLength {
                expected: side * side,
                actual: data.len(),
            });
        }
        Ok(Self { side, data })
    }

    /// Uniform-intensity bitmap, mostly useful for tests and synthetic data.
    pub fn filled(side: usize, intensity: u8) -> Self {
        Self {
            side,
            data: vec![intensity; side * side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.side + col]
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Collection of same-sized patches the environment samples from at reset.
#[derive(Clone, Debug)]
pub struct PatchLibrary {
    side: usize,
    patches: Vec<Patch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchLibraryError {
    NoPatches,
    BadBitmapLength { expected: usize, actual: usize },
    SideMismatch { index: usize, expected: usize, actual: usize },
}

impl fmt::Display for PatchLibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchLibraryError::NoPatches => write!(f, "no patches available"),
            PatchLibraryError::BadBitmapLength { expected, actual } => write!(
                f,
                "bitmap length ({actual}) must equal side * side ({expected})"
            ),
            PatchLibraryError::SideMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "patch {index} has side {actual}, library expects {expected}"
            ),
        }
    }
}

impl Error for PatchLibraryError {}

impl PatchLibrary {
    pub fn new(side: usize, patches: Vec<Patch>) -> Result<Self, PatchLibraryError> {
        if patches.is_empty() {
            return Err(PatchLibraryError::NoPatches);
        }
        for (index, patch) in patches.iter().enumerate() {
            if patch.side() != side {
                return Err(PatchLibraryError::SideMismatch {
                    index,
                    expected: side,
                    actual: patch.side(),
                });
            }
        }
        Ok(Self { side, patches })
    }

    /// Build a library from raw row-major bitmaps, each `side * side` long.
    pub fn from_bitmaps(side: usize, bitmaps: Vec<Vec<u8>>) -> Result<Self, PatchLibraryError> {
        if bitmaps.is_empty() {
            return Err(PatchLibraryError::NoPatches);
        }
        let patches = bitmaps
            .into_iter()
            .map(|data| Patch::new(side, data))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(side, patches)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn get(&self, index: usize) -> &Patch {
        &self.patches[index]
    }
}
