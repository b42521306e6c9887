use crate::canvas::Canvas;
use crate::env::SaccadeEnv;
use crate::vision::FoveationGrid;

/// Side length of the composed frame in pixels.
pub const WINDOW_SIZE: usize = 108;
/// Grey fill behind all blits.
pub const BACKGROUND: [u8; 3] = [100, 100, 100];
/// Outline color of the foveation highlight rectangle.
pub const FOCUS_COLOR: [u8; 3] = [255, 0, 0];

/// Row offset of the central and peripheral thumbnails below the canvas.
const THUMB_ROW: usize = 72;
/// Column offset of the central thumbnail.
const CENTRAL_COL: usize = 10;
/// Column offset of the peripheral thumbnail, past the central one.
const PERIPHERAL_COL_GAP: usize = 30;

/// RGB byte buffer, row-major. Pure data, no display dependency; writes
/// outside the frame are clipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> [u8; 3] {
        let i = (row * self.width + col) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn set(&mut self, row: usize, col: usize, rgb: [u8; 3]) {
        if row >= self.height || col >= self.width {
            return;
        }
        let i = (row * self.width + col) * 3;
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    pub fn fill(&mut self, rgb: [u8; 3]) {
        for pixel in self.data.chunks_exact_mut(3) {
            pixel.copy_from_slice(&rgb);
        }
    }

    fn blit_gray(&mut self, pixels: &[u8], side: usize, row0: usize, col0: usize) {
        for r in 0..side {
            for c in 0..side {
                let v = pixels[r * side + c];
                self.set(row0 + r, col0 + c, [v, v, v]);
            }
        }
    }

    /// 1-pixel-wide rectangle outline.
    fn stroke_rect(&mut self, row0: usize, col0: usize, side: usize, rgb: [u8; 3]) {
        for c in 0..side {
            self.set(row0, col0 + c, rgb);
            self.set(row0 + side - 1, col0 + c, rgb);
        }
        for r in 0..side {
            self.set(row0 + r, col0, rgb);
            self.set(row0 + r, col0 + side - 1, rgb);
        }
    }
}

/// Compose the debug frame: full canvas at the top-left, central-vision
/// thumbnail and peripheral thumbnail (scaled up to one grid box) below it,
/// and a red outline around the currently foveated box.
pub fn compose_frame(
    canvas: &Canvas,
    central: &[u8],
    peripheral: &[f32],
    loc: usize,
    grid: FoveationGrid,
) -> Frame {
    let mut frame = Frame::new(WINDOW_SIZE, WINDOW_SIZE);
    frame.fill(BACKGROUND);

    frame.blit_gray(canvas.data(), canvas.size(), 0, 0);

    let box_side = grid.box_side();
    frame.blit_gray(central, box_side, THUMB_ROW, CENTRAL_COL);

    // Nearest-neighbor upscale of the N x N peripheral grid to one box.
    let n = grid.boxes_per_side();
    for r in 0..box_side {
        for c in 0..box_side {
            let v = peripheral[(r * n / box_side) * n + c * n / box_side];
            let v = v.round().clamp(0.0, 255.0) as u8;
            frame.set(
                THUMB_ROW + r,
                PERIPHERAL_COL_GAP + box_side + c,
                [v, v, v],
            );
        }
    }

    let (row0, col0) = grid.box_origin(loc);
    frame.stroke_rect(row0, col0, box_side, FOCUS_COLOR);
    frame
}

/// Compose a frame from the environment's current artifacts.
pub fn render_env(env: &SaccadeEnv) -> Frame {
    compose_frame(
        env.canvas(),
        env.central_vision(),
        env.peripheral_vision(),
        env.foveation(),
        env.grid(),
    )
}
