//! Pointer heat field: a coarse square grid that gates the cover reveal.

use crate::foundation::{
    core::Canvas,
    error::{MosaicError, MosaicResult},
};

/// Cells per axis when none is configured.
pub const DEFAULT_RESOLUTION: usize = 96;
/// Injection radius in field cells (exclusive).
pub const RADIUS: i64 = 8;
/// Peak value added at the injection center.
pub const PEAK: f32 = 0.5;
/// Multiplier applied per decay tick.
pub const DECAY: f32 = 0.95;
/// Values below this snap to zero on decay.
pub const SNAP: f32 = 0.01;
/// A pitch cell is revealed when its field value is strictly above this.
pub const REVEAL_THRESHOLD: f32 = 0.1;

/// Binary reveal gate.
pub fn reveals(value: f32) -> bool {
    value > REVEAL_THRESHOLD
}

#[derive(Clone, Debug)]
pub struct HeatField {
    res: usize,
    /// Row-major, values in `[0, 1]`.
    values: Vec<f32>,
    active: bool,
    max_value: f32,
}

impl HeatField {
    pub fn new(res: usize) -> MosaicResult<Self> {
        if res == 0 {
            return Err(MosaicError::validation("heat field resolution must be > 0"));
        }
        Ok(Self {
            res,
            values: vec![0.0; res * res],
            active: false,
            max_value: 0.0,
        })
    }

    pub fn resolution(&self) -> usize {
        self.res
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    /// Field cell containing pixel coordinate `p` along an axis of length `extent`.
    pub fn field_coord(&self, p: f32, extent: u32) -> i64 {
        if extent == 0 {
            return 0;
        }
        (p / extent as f32 * self.res as f32).floor() as i64
    }

    /// Inject heat around a pointer position given in canvas pixels.
    pub fn inject(&mut self, px: f32, py: f32, canvas: Canvas) {
        let cx = self.field_coord(px, canvas.width);
        let cy = self.field_coord(py, canvas.height);
        self.inject_field(cx, cy);
    }

    /// Inject heat centered on field cell `(cx, cy)`. The center may lie outside the field.
    pub fn inject_field(&mut self, cx: i64, cy: i64) {
        self.active = true;
        let res = self.res as i64;
        for j in -RADIUS..=RADIUS {
            for i in -RADIUS..=RADIUS {
                let (fx, fy) = (cx + i, cy + j);
                if fx < 0 || fx >= res || fy < 0 || fy >= res {
                    continue;
                }
                let d = ((i * i + j * j) as f32).sqrt();
                if d >= RADIUS as f32 {
                    continue;
                }
                let idx = fy as usize * self.res + fx as usize;
                let v = (self.values[idx] + PEAK * (1.0 - d / RADIUS as f32)).min(1.0);
                self.values[idx] = v;
                self.max_value = self.max_value.max(v);
            }
        }
    }

    /// One decay tick. Returns `false` when the field was already idle and nothing was scanned.
    pub fn decay(&mut self) -> bool {
        if !self.active && self.max_value <= 0.0 {
            return false;
        }

        let mut max = 0.0f32;
        for v in &mut self.values {
            *v *= DECAY;
            if *v < SNAP {
                *v = 0.0;
            }
            max = max.max(*v);
        }
        self.max_value = max;
        if max == 0.0 {
            self.active = false;
        }
        true
    }

    /// Value at field cell `(fx, fy)`; zero outside the field.
    pub fn value_at(&self, fx: i64, fy: i64) -> f32 {
        let res = self.res as i64;
        if fx < 0 || fx >= res || fy < 0 || fy >= res {
            return 0.0;
        }
        self.values[fy as usize * self.res + fx as usize]
    }

    /// Value of the field cell that pixel `(x, y)` maps to.
    pub fn value_for_pixel(&self, x: u32, y: u32, canvas: Canvas) -> f32 {
        self.value_at(
            self.field_coord(x as f32, canvas.width),
            self.field_coord(y as f32, canvas.height),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mosaic/heat.rs"]
mod tests;
