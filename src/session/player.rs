use std::time::Duration;

use crate::{
    encode::sink::{FrameIndex, FrameSink, SinkConfig},
    foundation::error::{MosaicError, MosaicResult},
    session::{clock::ManualClock, preview::Preview},
};

/// Scripted playback parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerOpts {
    pub frames: u32,
    pub fps: u32,
    /// Pointer waypoints in canvas pixels, visited at even spacing over the run.
    pub path: Vec<(f32, f32)>,
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            frames: 60,
            fps: 30,
            path: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayReport {
    pub frames: u32,
    pub scrambles: usize,
    pub max_revealed_cells: usize,
}

/// Linear interpolation along `path` at `t` in `[0, 1]`.
pub fn pointer_on_path(path: &[(f32, f32)], t: f32) -> Option<(f32, f32)> {
    match path {
        [] => None,
        [only] => Some(*only),
        _ => {
            let segments = (path.len() - 1) as f32;
            let pos = t.clamp(0.0, 1.0) * segments;
            let i = (pos.floor() as usize).min(path.len() - 2);
            let f = pos - i as f32;
            let (x0, y0) = path[i];
            let (x1, y1) = path[i + 1];
            Some((x0 + (x1 - x0) * f, y0 + (y1 - y0) * f))
        }
    }
}

/// Drives a manually clocked preview frame by frame and hands each visible frame to a sink.
#[derive(Clone, Debug)]
pub struct Player {
    opts: PlayerOpts,
}

impl Player {
    pub fn new(opts: PlayerOpts) -> MosaicResult<Self> {
        if opts.frames == 0 {
            return Err(MosaicError::validation("frames must be > 0"));
        }
        if opts.fps == 0 {
            return Err(MosaicError::validation("fps must be > 0"));
        }
        Ok(Self { opts })
    }

    pub fn opts(&self) -> &PlayerOpts {
        &self.opts
    }

    #[tracing::instrument(skip_all, fields(frames = self.opts.frames, fps = self.opts.fps))]
    pub fn run(
        &self,
        preview: &mut Preview<ManualClock>,
        sink: &mut dyn FrameSink,
    ) -> MosaicResult<PlayReport> {
        if !preview.has_image() {
            return Err(MosaicError::validation("no image loaded"));
        }

        let step = Duration::from_secs(1) / self.opts.fps;
        let last = self.opts.frames.saturating_sub(1).max(1) as f32;
        let canvas = preview.canvas();
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.opts.fps,
        })?;

        let mut report = PlayReport::default();
        for i in 0..self.opts.frames {
            if let Some((x, y)) = pointer_on_path(&self.opts.path, i as f32 / last) {
                preview.pointer_move(x, y);
            }
            preview.clock().advance(step);
            let pump = preview.pump()?;
            report.scrambles += pump.scrambles;
            if let Some(engine) = preview.engine() {
                let revealed = engine.revealed_cells().len();
                report.max_revealed_cells = report.max_revealed_cells.max(revealed);
            }

            sink.push_frame(FrameIndex::from(i), &preview.visible().to_frame())?;
            report.frames += 1;
        }
        sink.end()?;

        tracing::debug!(frames = report.frames, scrambles = report.scrambles, "playback finished");
        Ok(report)
    }
}
