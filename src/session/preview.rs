use std::sync::Arc;

use crate::{
    assets::{
        decode::{SourceImage, decode_source},
        fonts::FontBook,
    },
    export::{plain_text::to_plain_text, raster::encode_png, standalone::generate_standalone_html},
    foundation::{core::Canvas, error::MosaicResult},
    mosaic::{
        engine::{Engine, EngineOpts},
        heat,
    },
    render::surface::Surface,
    session::{
        clock::{Clock, SystemClock},
        scheduler::{AnimationScheduler, DEFAULT_REFRESH_HZ, ScheduledTick, Tick},
    },
    settings::Settings,
};

/// Host-side options for a [`Preview`].
#[derive(Clone, Debug)]
pub struct PreviewOpts {
    pub canvas: Canvas,
    /// Compositor loop rate.
    pub refresh_hz: u32,
    pub heat_resolution: usize,
    pub seed: Option<u64>,
    pub fonts: Arc<FontBook>,
}

impl Default for PreviewOpts {
    fn default() -> Self {
        Self {
            canvas: Canvas::DEFAULT,
            refresh_hz: DEFAULT_REFRESH_HZ,
            heat_resolution: heat::DEFAULT_RESOLUTION,
            seed: None,
            fonts: FontBook::system(),
        }
    }
}

/// Everything that can mutate a preview. All of it goes through [`Preview::dispatch`].
#[derive(Clone, Debug)]
pub enum Event {
    LoadImage(Vec<u8>),
    RemoveImage,
    UpdateSettings(Settings),
    /// Pointer position in canvas pixels.
    PointerMove { x: f32, y: f32 },
    SetScrambleEnabled(bool),
    Tick(ScheduledTick),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Frame { revealed_cells: usize },
    Scrambled,
    /// Scramble suppressed by pointer heat or the toggle.
    Skipped,
    /// Tick from a torn-down generation.
    Stale,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpReport {
    pub frames: usize,
    pub scrambles: usize,
    pub skipped: usize,
    pub stale: usize,
}

/// Headless stand-in for the interactive preview: one visible surface, at most one live engine.
pub struct Preview<C: Clock = SystemClock> {
    clock: C,
    opts: PreviewOpts,
    settings: Settings,
    source: Option<SourceImage>,
    engine: Option<Engine>,
    scheduler: AnimationScheduler,
    visible: Surface,
    scramble_enabled: bool,
}

impl<C: Clock> Preview<C> {
    pub fn new(clock: C, settings: Settings, opts: PreviewOpts) -> MosaicResult<Self> {
        settings.validate()?;
        let visible = Surface::new(opts.canvas)?;
        let scheduler = AnimationScheduler::new(opts.refresh_hz);
        Ok(Self {
            clock,
            opts,
            settings,
            source: None,
            engine: None,
            scheduler,
            visible,
            scramble_enabled: true,
        })
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn canvas(&self) -> Canvas {
        self.opts.canvas
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.engine.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.scheduler.generation()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// The surface the compositor draws into.
    pub fn visible(&self) -> &Surface {
        &self.visible
    }

    /// Single serialized entry point for pointer input, configuration and timer ticks.
    pub fn dispatch(&mut self, event: Event) -> MosaicResult<()> {
        match event {
            Event::LoadImage(bytes) => {
                self.load_image(&bytes)?;
            }
            Event::RemoveImage => self.remove_image(),
            Event::UpdateSettings(settings) => self.update_settings(settings)?,
            Event::PointerMove { x, y } => self.pointer_move(x, y),
            Event::SetScrambleEnabled(enabled) => self.set_scramble_enabled(enabled),
            Event::Tick(tick) => {
                self.run_tick(tick)?;
            }
        }
        Ok(())
    }

    /// Replace the image. Non-image bytes are ignored and return `false`.
    pub fn load_image(&mut self, bytes: &[u8]) -> MosaicResult<bool> {
        let Some(source) = decode_source(bytes)? else {
            tracing::info!(len = bytes.len(), "ignoring non-image input");
            return Ok(false);
        };
        self.load_source(source)?;
        Ok(true)
    }

    /// Replace the image with an already decoded one.
    ///
    /// The new engine is built before anything is torn down; on error the previous image, engine
    /// and timers are left as they were.
    pub fn load_source(&mut self, source: SourceImage) -> MosaicResult<()> {
        let mut engine = self.build_engine(&source, &self.settings)?;
        engine.compose(&mut self.visible)?;
        self.teardown();
        self.source = Some(source);
        self.install(engine);
        Ok(())
    }

    pub fn remove_image(&mut self) {
        self.teardown();
        self.source = None;
        self.visible.fill([0, 0, 0, 0]);
    }

    /// Swap the settings snapshot. A live engine is torn down and rebuilt from scratch.
    pub fn update_settings(&mut self, settings: Settings) -> MosaicResult<()> {
        settings.validate()?;
        let Some(source) = self.source.as_ref() else {
            self.settings = settings;
            return Ok(());
        };
        let mut engine = self.build_engine(source, &settings)?;
        engine.compose(&mut self.visible)?;
        self.teardown();
        self.settings = settings;
        self.install(engine);
        Ok(())
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if let Some(engine) = self.engine.as_mut() {
            engine.inject_pointer(x, y);
        }
    }

    pub fn set_scramble_enabled(&mut self, enabled: bool) {
        self.scramble_enabled = enabled;
        if let Some(engine) = self.engine.as_mut() {
            engine.set_scramble_enabled(enabled);
        }
    }

    /// Run every tick due at the clock's current time.
    pub fn pump(&mut self) -> MosaicResult<PumpReport> {
        let mut report = PumpReport::default();
        for tick in self.scheduler.due(self.clock.now()) {
            match self.run_tick(tick)? {
                TickOutcome::Frame { .. } => report.frames += 1,
                TickOutcome::Scrambled => report.scrambles += 1,
                TickOutcome::Skipped => report.skipped += 1,
                TickOutcome::Stale => report.stale += 1,
            }
        }
        Ok(report)
    }

    pub fn run_tick(&mut self, tick: ScheduledTick) -> MosaicResult<TickOutcome> {
        if !self.scheduler.is_current(&tick) {
            tracing::trace!(generation = tick.generation, "dropping stale tick");
            return Ok(TickOutcome::Stale);
        }
        let Some(engine) = self.engine.as_mut() else {
            return Ok(TickOutcome::Stale);
        };

        match tick.tick {
            Tick::Frame => {
                let frame = engine.compose(&mut self.visible)?;
                Ok(TickOutcome::Frame {
                    revealed_cells: frame.revealed_cells,
                })
            }
            Tick::Scramble => Ok(match engine.scramble_tick()? {
                Some(_) => TickOutcome::Scrambled,
                None => TickOutcome::Skipped,
            }),
        }
    }

    /// PNG of the visible surface, or `None` without an image.
    pub fn export_png(&self) -> MosaicResult<Option<Vec<u8>>> {
        if self.engine.is_none() {
            return Ok(None);
        }
        encode_png(&self.visible).map(Some)
    }

    pub fn export_plain_text(&self) -> Option<String> {
        self.engine.as_ref().map(|e| to_plain_text(e.grid()))
    }

    pub fn export_standalone(&self) -> MosaicResult<Option<String>> {
        let Some(source) = self.source.as_ref() else {
            return Ok(None);
        };
        generate_standalone_html(source, &self.settings, self.opts.canvas).map(Some)
    }

    fn teardown(&mut self) {
        let was_live = self.engine.take().is_some();
        self.scheduler.stop();
        if was_live {
            tracing::debug!(generation = self.scheduler.generation(), "engine torn down");
        }
    }

    fn build_engine(&self, source: &SourceImage, settings: &Settings) -> MosaicResult<Engine> {
        let mut engine = Engine::new(
            source,
            settings.clone(),
            self.opts.canvas,
            EngineOpts {
                heat_resolution: self.opts.heat_resolution,
                seed: self.opts.seed,
                fonts: self.opts.fonts.clone(),
            },
        )?;
        engine.set_scramble_enabled(self.scramble_enabled);
        Ok(engine)
    }

    fn install(&mut self, engine: Engine) {
        self.engine = Some(engine);
        let generation = self.scheduler.start(self.clock.now());
        tracing::debug!(generation, "engine started");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/preview.rs"]
mod tests;
