use crate::canvas::Canvas;

/// Partition of the canvas into `boxes_per_side × boxes_per_side` equal
/// square boxes with row-major linear indexing. Box `loc` covers rows
/// `(loc / n) * side ..` and columns `(loc % n) * side ..`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoveationGrid {
    boxes_per_side: usize,
    box_side: usize,
}

impl FoveationGrid {
    /// The caller guarantees `canvas_size` divides evenly by
    /// `boxes_per_side` (enforced by `EnvConfig::validate`).
    pub fn new(canvas_size: usize, boxes_per_side: usize) -> Self {
        debug_assert!(boxes_per_side > 0 && canvas_size.is_multiple_of(boxes_per_side));
        Self {
            boxes_per_side,
            box_side: canvas_size / boxes_per_side,
        }
    }

    pub fn boxes_per_side(&self) -> usize {
        self.boxes_per_side
    }

    pub fn box_side(&self) -> usize {
        self.box_side
    }

    pub fn loc_count(&self) -> usize {
        self.boxes_per_side * self.boxes_per_side
    }

    /// Top-left `(row, col)` pixel of box `loc`.
    pub fn box_origin(&self, loc: usize) -> (usize, usize) {
        debug_assert!(loc < self.loc_count());
        (
            (loc / self.boxes_per_side) * self.box_side,
            (loc % self.boxes_per_side) * self.box_side,
        )
    }

    /// Full-resolution pixel content of box `loc`, row-major,
    /// `box_side * box_side` long.
    pub fn central(&self, canvas: &Canvas, loc: usize) -> Vec<u8> {
        let (row0, col0) = self.box_origin(loc);
        let mut out = Vec::with_capacity(self.box_side * self.box_side);
        for r in 0..self.box_side {
            for c in 0..self.box_side {
                out.push(canvas.get(row0 + r, col0 + c));
            }
        }
        out
    }

    /// Per-box arithmetic mean intensity over every box, row-major,
    /// `boxes_per_side * boxes_per_side` long. Means are kept as f32,
    /// never rounded.
    pub fn peripheral(&self, canvas: &Canvas) -> Vec<f32> {
        let cells_per_box = (self.box_side * self.box_side) as f32;
        let mut out = Vec::with_capacity(self.loc_count());
        for loc in 0..self.loc_count() {
            let (row0, col0) = self.box_origin(loc);
            let mut sum: u64 = 0;
            for r in 0..self.box_side {
                for c in 0..self.box_side {
                    sum += canvas.get(row0 + r, col0 + c) as u64;
                }
            }
            out.push(sum as f32 / cells_per_box);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::Patch;

    #[test]
    fn box_origins_are_row_major() {
        let grid = FoveationGrid::new(64, 4);
        assert_eq!(grid.box_side(), 16);
        assert_eq!(grid.loc_count(), 16);
        assert_eq!(grid.box_origin(0), (0, 0));
        assert_eq!(grid.box_origin(3), (0, 48));
        assert_eq!(grid.box_origin(4), (16, 0));
        assert_eq!(grid.box_origin(15), (48, 48));
    }

    #[test]
    fn central_extracts_exact_box_content() {
        let mut canvas = Canvas::new(8);
        canvas.blit_add(&Patch::filled(2, 90), 4, 6);
        let grid = FoveationGrid::new(8, 2);

        // Box 3 covers rows 4..8, cols 4..8; the patch sits at its (0, 2).
        let central = grid.central(&canvas, 3);
        assert_eq!(central.len(), 16);
        assert_eq!(central[2], 90);
        assert_eq!(central[3], 90);
        assert_eq!(central[4 + 2], 90);
        assert_eq!(central[0], 0);

        // The other boxes are untouched.
        assert!(grid.central(&canvas, 0).iter().all(|&v| v == 0));
    }

    #[test]
    fn peripheral_is_per_box_mean() {
        let mut canvas = Canvas::new(8);
        canvas.blit_add(&Patch::filled(4, 100), 0, 0);
        let grid = FoveationGrid::new(8, 2);
        let peripheral = grid.peripheral(&canvas);
        assert_eq!(peripheral, vec![100.0, 0.0, 0.0, 0.0]);

        // A partial fill yields a fractional, unrounded mean.
        let mut canvas = Canvas::new(8);
        canvas.blit_add(&Patch::filled(2, 100), 0, 0);
        let peripheral = grid.peripheral(&canvas);
        assert_eq!(peripheral[0], 400.0 / 16.0);
    }
}
