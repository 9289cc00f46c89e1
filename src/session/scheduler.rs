use std::time::Duration;

/// Period of the glyph scramble timer.
pub const SCRAMBLE_PERIOD: Duration = Duration::from_millis(100);
/// Refresh rate assumed for the compositor loop when none is configured.
pub const DEFAULT_REFRESH_HZ: u32 = 60;

/// Fixed-period timer. Missed periods are coalesced into one firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    period: Duration,
    next_due: Duration,
}

impl Timer {
    /// First firing one period after `start`.
    pub fn new(period: Duration, start: Duration) -> Self {
        Self {
            period,
            next_due: start + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_due(&self) -> Duration {
        self.next_due
    }

    /// Fire at most once if due at `now`, returning the due time that fired.
    pub fn poll(&mut self, now: Duration) -> Option<Duration> {
        if now < self.next_due {
            return None;
        }
        let due = self.next_due;
        self.next_due += self.period;
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        Some(due)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tick {
    /// Periodic glyph scramble. Ordered first so ties scramble before the frame is drawn.
    Scramble,
    /// Compositor frame.
    Frame,
}

/// A due tick stamped with the generation that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTick {
    pub generation: u64,
    pub tick: Tick,
    pub due: Duration,
}

/// The compositor loop and the scramble timer of one engine generation.
///
/// Both timers start and stop together. Every start or stop bumps the generation, so ticks
/// collected for an earlier generation can be recognised and dropped.
#[derive(Debug)]
pub struct AnimationScheduler {
    frame_period: Duration,
    scramble_period: Duration,
    generation: u64,
    timers: Option<(Timer, Timer)>,
}

impl AnimationScheduler {
    pub fn new(refresh_hz: u32) -> Self {
        Self::with_periods(
            Duration::from_secs(1) / refresh_hz.max(1),
            SCRAMBLE_PERIOD,
        )
    }

    pub fn with_periods(frame_period: Duration, scramble_period: Duration) -> Self {
        Self {
            frame_period,
            scramble_period,
            generation: 0,
            timers: None,
        }
    }

    pub fn frame_period(&self) -> Duration {
        self.frame_period
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.timers.is_some()
    }

    /// Arm both timers at `now` under a fresh generation.
    pub fn start(&mut self, now: Duration) -> u64 {
        self.generation += 1;
        self.timers = Some((
            Timer::new(self.frame_period, now),
            Timer::new(self.scramble_period, now),
        ));
        self.generation
    }

    /// Disarm both timers. Outstanding ticks become stale.
    pub fn stop(&mut self) {
        if self.timers.take().is_some() {
            self.generation += 1;
        }
    }

    pub fn is_current(&self, tick: &ScheduledTick) -> bool {
        self.timers.is_some() && tick.generation == self.generation
    }

    /// Collect every tick due at `now`, ordered by due time then [`Tick`] order.
    pub fn due(&mut self, now: Duration) -> Vec<ScheduledTick> {
        let generation = self.generation;
        let Some((frame, scramble)) = self.timers.as_mut() else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity(2);
        if let Some(due) = scramble.poll(now) {
            out.push(ScheduledTick {
                generation,
                tick: Tick::Scramble,
                due,
            });
        }
        if let Some(due) = frame.poll(now) {
            out.push(ScheduledTick {
                generation,
                tick: Tick::Frame,
                due,
            });
        }
        out.sort_by_key(|t| (t.due, t.tick));
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scheduler.rs"]
mod tests;
